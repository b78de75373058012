/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum SolomonError {
    /// Network or request execution error from `reqwest`, surfaced after
    /// the retry budget is spent.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    /// Non-success HTTP status with the best message extracted from the body.
    ///
    /// `Display` renders the message alone so it can be shown to a user as is.
    #[error("{message}")]
    Http { status: u16, message: String },
    /// Response decoding or shape validation error.
    #[error("decode error: {0}")]
    Decode(String),
    /// A credential required by the endpoint was not configured.
    #[error("missing required credentials: {0}")]
    Credentials(String),
    /// A required argument was empty or malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl SolomonError {
    /// Upstream HTTP status code, when the error came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Transport(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` for `401 Unauthorized` responses.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

#[cfg(test)]
mod tests {
    use super::SolomonError;

    #[test]
    fn http_error_displays_message_only() {
        let err = SolomonError::Http {
            status: 404,
            message: "not found".to_owned(),
        };
        assert_eq!(err.to_string(), "not found");
        assert_eq!(err.status(), Some(404));
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn non_http_errors_have_no_status() {
        assert_eq!(SolomonError::Decode("bad".to_owned()).status(), None);
        assert_eq!(SolomonError::Credentials("token".to_owned()).status(), None);
    }
}
