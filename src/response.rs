use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use crate::{Result, SolomonError};

/// Decoded body of a successful response.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    /// Body of an `application/json` response.
    Json(JsonValue),
    /// Raw body of any other content type.
    Text(String),
}

impl Payload {
    pub fn as_json(&self) -> Option<&JsonValue> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Json(_) => None,
        }
    }

    /// Deserializes a JSON payload into `T`.
    pub fn deserialize<T: DeserializeOwned>(self) -> Result<T> {
        match self {
            Self::Json(value) => serde_json::from_value(value)
                .map_err(|err| SolomonError::Decode(format!("unexpected response shape: {err}"))),
            Self::Text(body) => Err(SolomonError::Decode(format!(
                "expected JSON response, got text: {body}"
            ))),
        }
    }
}

pub(crate) fn is_json(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|value| value.contains("application/json"))
}

/// Decodes a 2xx body according to its declared content type.
///
/// An empty JSON body decodes to `null`.
pub(crate) fn decode_payload(content_type: Option<&str>, body: String) -> Result<Payload> {
    if !is_json(content_type) {
        return Ok(Payload::Text(body));
    }
    if body.trim().is_empty() {
        return Ok(Payload::Json(JsonValue::Null));
    }
    serde_json::from_str(&body)
        .map(Payload::Json)
        .map_err(|err| SolomonError::Decode(format!("invalid JSON response: {err}; body: {body}")))
}

/// Best-effort human-readable message for a non-2xx response.
///
/// JSON bodies yield `detail`, then `message`; other bodies yield the raw
/// text. Anything else falls back to `HTTP error! status: <code>`.
pub(crate) fn error_message(status: StatusCode, content_type: Option<&str>, body: &str) -> String {
    let fallback = || format!("HTTP error! status: {}", status.as_u16());

    if is_json(content_type) {
        let Ok(value) = serde_json::from_str::<JsonValue>(body) else {
            return fallback();
        };
        return ["detail", "message"]
            .into_iter()
            .find_map(|key| message_field(&value, key))
            .unwrap_or_else(fallback);
    }

    if body.is_empty() {
        fallback()
    } else {
        body.to_owned()
    }
}

fn message_field(value: &JsonValue, key: &str) -> Option<String> {
    match value.get(key)? {
        JsonValue::Null | JsonValue::Bool(false) => None,
        JsonValue::Number(number) if number.as_f64() == Some(0.0) => None,
        JsonValue::String(text) if text.is_empty() => None,
        JsonValue::String(text) => Some(text.clone()),
        // validation errors carry structured details
        other => Some(other.to_string()),
    }
}
