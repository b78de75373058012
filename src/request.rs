use std::{borrow::Cow, time::Duration};

use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    multipart, Method, Url,
};

use crate::{Result, SolomonError};

/// Immutable description of a single HTTP call.
///
/// [`send`](crate::send) borrows the descriptor and replays it on every
/// attempt, so bodies are kept in owned, re-buildable form.
#[derive(Clone, Debug)]
pub struct RequestDescriptor {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Option<RequestBody>,
    timeout: Option<Duration>,
}

/// Request payload.
#[derive(Clone, Debug, PartialEq)]
pub enum RequestBody {
    /// Serialized JSON, sent with `Content-Type: application/json`.
    Json(String),
    /// Raw text sent as is.
    Text(String),
    /// Multipart form data; the transport picks the boundary.
    Form(FormData),
}

/// Owned multipart form that can be materialized once per attempt.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormData {
    parts: Vec<(String, FormPart)>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum FormPart {
    Text(String),
    File {
        file_name: String,
        bytes: Vec<u8>,
        mime: Option<String>,
    },
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push((name.into(), FormPart::Text(value.into())));
        self
    }

    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
        mime: Option<String>,
    ) -> Self {
        self.parts.push((
            name.into(),
            FormPart::File {
                file_name: file_name.into(),
                bytes: bytes.into(),
                mime,
            },
        ));
        self
    }

    pub fn parts(&self) -> &[(String, FormPart)] {
        &self.parts
    }

    fn to_multipart(&self) -> Result<multipart::Form> {
        let mut form = multipart::Form::new();
        for (name, part) in &self.parts {
            form = match part {
                FormPart::Text(value) => form.text(name.clone(), value.clone()),
                FormPart::File {
                    file_name,
                    bytes,
                    mime,
                } => {
                    let mut file = multipart::Part::bytes(bytes.clone()).file_name(file_name.clone());
                    if let Some(mime) = mime {
                        file = file.mime_str(mime).map_err(|err| {
                            SolomonError::InvalidArgument(format!("invalid mime type '{mime}': {err}"))
                        })?;
                    }
                    form.part(name.clone(), file)
                }
            };
        }
        Ok(form)
    }
}

impl RequestDescriptor {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
            timeout: None,
        }
    }

    /// Parses `url` and creates a descriptor for it.
    pub fn parse(method: Method, url: &str) -> Result<Self> {
        let url = Url::parse(url)
            .map_err(|err| SolomonError::InvalidArgument(format!("invalid url '{url}': {err}")))?;
        Ok(Self::new(method, url))
    }

    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: Url) -> Self {
        Self::new(Method::POST, url)
    }

    /// Sets a header, replacing any previous value under the same name.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Serializes `body` as the JSON payload.
    pub fn json<T: serde::Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        let encoded = serde_json::to_string(body)
            .map_err(|err| SolomonError::Decode(format!("could not encode request body: {err}")))?;
        self.body = Some(RequestBody::Json(encoded));
        Ok(self)
    }

    pub fn text(mut self, body: impl Into<String>) -> Self {
        self.body = Some(RequestBody::Text(body.into()));
        self
    }

    pub fn form(mut self, form: FormData) -> Self {
        self.body = Some(RequestBody::Form(form));
        self
    }

    /// Transport timeout applied to each attempt.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> Option<&RequestBody> {
        self.body.as_ref()
    }

    pub fn timeout_duration(&self) -> Option<Duration> {
        self.timeout
    }

    /// Borrows `self` when a timeout is already set, otherwise clones it
    /// with `timeout` filled in.
    pub(crate) fn with_default_timeout(&self, timeout: Duration) -> Cow<'_, RequestDescriptor> {
        match self.timeout {
            Some(_) => Cow::Borrowed(self),
            None => Cow::Owned(self.clone().timeout(timeout)),
        }
    }

    pub(crate) fn to_request(&self, http: &reqwest::Client) -> Result<reqwest::RequestBuilder> {
        let mut builder = http
            .request(self.method.clone(), self.url.clone())
            .headers(self.headers.clone());

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        builder = match &self.body {
            None => builder,
            Some(RequestBody::Json(json)) => builder
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(json.clone()),
            Some(RequestBody::Text(text)) => builder.body(text.clone()),
            Some(RequestBody::Form(form)) => builder.multipart(form.to_multipart()?),
        };

        Ok(builder)
    }
}

#[cfg(test)]
mod tests {
    use std::{borrow::Cow, time::Duration};

    use reqwest::{
        header::{HeaderValue, ACCEPT},
        Method,
    };
    use serde_json::json;

    use super::{FormData, FormPart, RequestBody, RequestDescriptor};
    use crate::SolomonError;

    #[test]
    fn header_names_are_unique() {
        let descriptor = RequestDescriptor::parse(Method::GET, "https://api.test/x")
            .expect("must parse")
            .header(ACCEPT, HeaderValue::from_static("text/plain"))
            .header(ACCEPT, HeaderValue::from_static("application/json"));

        assert_eq!(descriptor.headers().get_all(ACCEPT).iter().count(), 1);
        assert_eq!(descriptor.headers()[ACCEPT], "application/json");
    }

    #[test]
    fn json_body_is_serialized_once() {
        let descriptor = RequestDescriptor::parse(Method::POST, "https://api.test/x")
            .expect("must parse")
            .json(&json!({"role": "user"}))
            .expect("must encode");

        assert_eq!(
            descriptor.body(),
            Some(&RequestBody::Json("{\"role\":\"user\"}".to_owned()))
        );
    }

    #[test]
    fn parse_rejects_relative_url() {
        let err = RequestDescriptor::parse(Method::GET, "/relative").expect_err("must fail");
        assert!(matches!(err, SolomonError::InvalidArgument(_)));
    }

    #[test]
    fn form_keeps_part_order() {
        let form = FormData::new()
            .file("file", "notes.txt", b"hello".to_vec(), None)
            .text("purpose", "assistants");

        assert_eq!(form.parts()[0].0, "file");
        assert!(matches!(form.parts()[0].1, FormPart::File { .. }));
        assert_eq!(
            form.parts()[1],
            ("purpose".to_owned(), FormPart::Text("assistants".to_owned()))
        );
    }

    #[test]
    fn invalid_mime_is_rejected_when_building() {
        let descriptor = RequestDescriptor::parse(Method::POST, "https://api.test/upload")
            .expect("must parse")
            .form(FormData::new().file("file", "a.bin", vec![0u8], Some("not a mime".to_owned())));

        let err = descriptor
            .to_request(&reqwest::Client::new())
            .expect_err("must fail");
        assert!(matches!(err, SolomonError::InvalidArgument(_)));
    }

    #[test]
    fn default_timeout_fills_only_a_missing_timeout() {
        let bare = RequestDescriptor::parse(Method::GET, "https://api.test/x").expect("must parse");
        let filled = bare.with_default_timeout(Duration::from_millis(50));
        assert!(matches!(filled, Cow::Owned(_)));
        assert_eq!(filled.timeout_duration(), Some(Duration::from_millis(50)));

        let explicit = bare.timeout(Duration::from_secs(5));
        let kept = explicit.with_default_timeout(Duration::from_millis(50));
        assert!(matches!(kept, Cow::Borrowed(_)));
        assert_eq!(kept.timeout_duration(), Some(Duration::from_secs(5)));
    }
}
