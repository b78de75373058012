use std::fmt;

/// Production API root used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://55gdlc2st8.execute-api.us-east-1.amazonaws.com/api/v2";

/// Header carrying the workspace-scoped consumer key.
pub const CONSUMER_KEY_HEADER: &str = "solomon-consumer-key";

/// Caller-owned credentials attached to authenticated requests.
///
/// The access token authenticates the user; the consumer key selects the
/// workspace (tenant) the request runs against.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub access_token: Option<String>,
    pub consumer_key: Option<String>,
}

impl Credentials {
    pub fn new(access_token: impl Into<String>, consumer_key: impl Into<String>) -> Self {
        Self {
            access_token: Some(access_token.into()),
            consumer_key: Some(consumer_key.into()),
        }
    }

    /// Credentials holding only an access token, before a workspace is picked.
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: Some(access_token.into()),
            consumer_key: None,
        }
    }

    pub(crate) fn authorization(&self) -> Option<String> {
        self.access_token
            .as_deref()
            .filter(|token| !token.trim().is_empty())
            .map(normalize_bearer_authorization)
    }

    pub(crate) fn consumer_key(&self) -> Option<&str> {
        self.consumer_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |value: &Option<String>| value.as_ref().map(|_| "<redacted>");
        f.debug_struct("Credentials")
            .field("access_token", &redact(&self.access_token))
            .field("consumer_key", &redact(&self.consumer_key))
            .finish()
    }
}

pub(crate) fn normalize_bearer_authorization(token: &str) -> String {
    let trimmed = token.trim();
    let prefix = trimmed.get(..7);
    if prefix.is_some_and(|value| value.eq_ignore_ascii_case("bearer ")) {
        trimmed.to_owned()
    } else {
        format!("Bearer {trimmed}")
    }
}
