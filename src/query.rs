/// Sort order for list endpoints, by creation time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

impl Order {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Pagination parameters for list endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListQuery {
    pub limit: u32,
    pub order: Order,
}

impl ListQuery {
    pub fn new(limit: u32, order: Order) -> Self {
        Self { limit, order }
    }

    /// Defaults for assistant listings: newest first, up to 100.
    pub fn assistants() -> Self {
        Self::new(100, Order::Desc)
    }

    /// Defaults for thread messages: oldest first, up to 25.
    pub fn messages() -> Self {
        Self::new(25, Order::Asc)
    }

    /// Defaults for vector stores and their files: newest first, up to 20.
    pub fn vector_stores() -> Self {
        Self::new(20, Order::Desc)
    }

    pub(crate) fn pairs(&self) -> [(&'static str, String); 2] {
        [
            ("limit", self.limit.to_string()),
            ("order", self.order.as_str().to_owned()),
        ]
    }
}
