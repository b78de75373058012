use std::{fmt, time::Duration};

use reqwest::{
    header::{HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CACHE_CONTROL, PRAGMA},
    Method, Url,
};

use crate::{
    config::CONSUMER_KEY_HEADER,
    decode::{decode_messages, filter_assistants},
    transport,
    wire::{
        CodeInterpreterFiles, ConsumerKeyEnvelope, CreateMessageRequest, DataEnvelope,
        FileSearchStores, ModifyAssistantRequest, RunThreadRequest, SignInRequest,
        ThreadsEnvelope, ToolResourcesRequest, ToolSpec, WorkspacesEnvelope,
    },
    Assistant, AssistantDetails, AssistantMode, AssistantTool, ClientOptions, Credentials,
    FileObject, FileUpload, FormData, ListQuery, Message, Payload, RequestDescriptor, Result,
    SignInResponse, SolomonError, Thread, UserInfo, VectorStore, VectorStoreFile,
    DEFAULT_BASE_URL,
};

/// Which credentials a request carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Scope {
    /// No credentials.
    Public,
    /// Access token only.
    Bearer,
    /// Access token, bypassing intermediary caches.
    BearerNoCache,
    /// Consumer key only.
    ConsumerKey,
    /// Access token and consumer key.
    Full,
}

#[derive(Clone)]
/// HTTP client for the Solomon assistant platform API.
///
/// Configuration is fixed at construction; the `with_*` methods return a new
/// client sharing the same connection pool.
pub struct SolomonClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Credentials,
    options: ClientOptions,
}

impl fmt::Debug for SolomonClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolomonClient")
            .field("base_url", &self.base_url)
            .field("credentials", &self.credentials)
            .field("options", &self.options)
            .finish()
    }
}

impl Default for SolomonClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl SolomonClient {
    /// Creates an unauthenticated client for `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            credentials: Credentials::default(),
            options: ClientOptions::default(),
        }
    }

    /// Creates a client from environment variables.
    ///
    /// Reads:
    /// - `SOLOMON_BASE_URL` — API root, optional (defaults to [`DEFAULT_BASE_URL`])
    /// - `SOLOMON_ACCESS_TOKEN` — access token (Bearer prefix optional)
    /// - `SOLOMON_CONSUMER_KEY` — workspace consumer key, optional
    ///
    /// Returns an error if the access token is missing or empty.
    ///
    /// **Not available on `wasm32` targets** — environment variables do not
    /// exist in browser runtimes.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use solomon_http::SolomonClient;
    ///
    /// let client = SolomonClient::from_env().expect("missing SOLOMON_* env vars");
    /// ```
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> std::result::Result<Self, String> {
        let token = std::env::var("SOLOMON_ACCESS_TOKEN")
            .map_err(|_| "missing SOLOMON_ACCESS_TOKEN environment variable".to_owned())?;
        if token.trim().is_empty() {
            return Err("SOLOMON_ACCESS_TOKEN is set but empty".to_owned());
        }

        let base_url = std::env::var("SOLOMON_BASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
        let consumer_key = std::env::var("SOLOMON_CONSUMER_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        Ok(Self::new(base_url).with_credentials(Credentials {
            access_token: Some(token),
            consumer_key,
        }))
    }

    /// Replaces the credentials attached to authenticated calls.
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Sets the access token, keeping the consumer key.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.credentials.access_token = Some(token.into());
        self
    }

    /// Sets the consumer key, e.g. after switching workspace.
    pub fn with_consumer_key(mut self, key: impl Into<String>) -> Self {
        self.credentials.consumer_key = Some(key.into());
        self
    }

    /// Applies client options such as timeout and retry behavior.
    pub fn with_options(mut self, opts: ClientOptions) -> Self {
        self.options = opts;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Sends an arbitrary descriptor with this client's retry policy.
    ///
    /// Descriptors without their own timeout get `options().timeout_ms`.
    pub async fn send(&self, descriptor: &RequestDescriptor) -> Result<Payload> {
        let descriptor = descriptor.with_default_timeout(self.request_timeout());
        transport::send(&self.http, &descriptor, &self.options.retry).await
    }

    /// Exchanges email and password for an access token.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SignInResponse> {
        let descriptor = self
            .descriptor(Method::POST, self.url(&["signin"])?, Scope::Public)?
            .json(&SignInRequest { email, password })?;
        let response: SignInResponse = self.send(&descriptor).await?.deserialize()?;

        if response.access_token.is_empty() {
            return Err(SolomonError::Decode("invalid response from server".to_owned()));
        }
        Ok(response)
    }

    pub async fn user_info(&self) -> Result<UserInfo> {
        let descriptor = self.descriptor(Method::GET, self.url(&["me"])?, Scope::Bearer)?;
        self.send(&descriptor).await?.deserialize()
    }

    /// Fetches the user's default consumer key; `None` when none is assigned.
    pub async fn consumer_key(&self) -> Result<Option<String>> {
        let descriptor =
            self.descriptor(Method::GET, self.url(&["consumer-key"])?, Scope::Bearer)?;
        match self.send(&descriptor).await {
            Ok(payload) => Ok(non_empty(
                payload.deserialize::<ConsumerKeyEnvelope>()?.solomon_consumer_key,
            )),
            Err(SolomonError::Http { status: 404, .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Invalidates the session upstream. Failures are logged and ignored so
    /// the caller can always clear its local session.
    pub async fn logout(&self) {
        if let Err(_err) = self.try_logout().await {
            #[cfg(feature = "tracing")]
            tracing::warn!(error = %_err, "logout request failed, proceeding with local logout");
        }
    }

    async fn try_logout(&self) -> Result<()> {
        let descriptor = self.descriptor(Method::POST, self.url(&["logout"])?, Scope::Bearer)?;
        self.send(&descriptor).await.map(drop)
    }

    /// Lists the names of workspaces the user belongs to.
    pub async fn list_workspaces(&self) -> Result<Vec<String>> {
        let descriptor =
            self.descriptor(Method::GET, self.url(&["workspaces"])?, Scope::BearerNoCache)?;
        let envelope: WorkspacesEnvelope = self.send(&descriptor).await?.deserialize()?;
        Ok(envelope.workspace_names)
    }

    /// Resolves the consumer key of a workspace.
    pub async fn workspace_key(&self, workspace_name: &str) -> Result<Option<String>> {
        require("workspace name", workspace_name)?;
        let descriptor = self.descriptor(
            Method::GET,
            self.url(&["workspace-key", workspace_name])?,
            Scope::BearerNoCache,
        )?;
        let envelope: ConsumerKeyEnvelope = self.send(&descriptor).await?.deserialize()?;
        Ok(non_empty(envelope.solomon_consumer_key))
    }

    pub async fn list_assistants(
        &self,
        mode: AssistantMode,
        query: ListQuery,
    ) -> Result<Vec<Assistant>> {
        let mut url = self.url(&["assistant", "list_assistants"])?;
        url.query_pairs_mut()
            .append_pair("order", query.order.as_str())
            .append_pair("limit", &query.limit.to_string());

        let descriptor = self.descriptor(Method::GET, url, Scope::Full)?;
        let envelope: DataEnvelope<Assistant> = self.send(&descriptor).await?.deserialize()?;
        Ok(filter_assistants(mode, envelope.data))
    }

    pub async fn assistant_details(&self, assistant_id: &str) -> Result<AssistantDetails> {
        require("assistant id", assistant_id)?;
        let descriptor =
            self.descriptor(Method::GET, self.url(&["assistant", assistant_id])?, Scope::Full)?;
        self.send(&descriptor).await?.deserialize()
    }

    /// Files attached to the assistant's code interpreter, looked up one by one.
    pub async fn assistant_files(&self, assistant_id: &str) -> Result<Vec<FileObject>> {
        let details = self.assistant_details(assistant_id).await?;
        let mut files = Vec::with_capacity(details.code_interpreter_file_ids().len());
        for file_id in details.code_interpreter_file_ids() {
            files.push(self.file_details(file_id).await?);
        }
        Ok(files)
    }

    /// Vector stores attached to the assistant's file search tool.
    pub async fn assistant_vector_stores(&self, assistant_id: &str) -> Result<Vec<VectorStore>> {
        let details = self.assistant_details(assistant_id).await?;
        let ids = details.vector_store_ids();
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let stores = self.list_vector_stores(ListQuery::vector_stores()).await?;
        Ok(stores
            .into_iter()
            .filter(|store| ids.contains(&store.id))
            .collect())
    }

    /// Grants the assistant file search and code interpreter, attaching
    /// `file_id` to the code interpreter.
    pub async fn modify_assistant(
        &self,
        assistant_id: &str,
        file_id: &str,
        name: Option<&str>,
    ) -> Result<Payload> {
        require("assistant id", assistant_id)?;
        let payload = ModifyAssistantRequest {
            name: name.filter(|name| !name.is_empty()),
            tools: vec![
                ToolSpec {
                    kind: AssistantTool::FileSearch,
                },
                ToolSpec {
                    kind: AssistantTool::CodeInterpreter,
                },
            ],
            tool_resources: ToolResourcesRequest {
                code_interpreter: CodeInterpreterFiles {
                    file_ids: vec![file_id],
                },
                file_search: FileSearchStores {
                    file_ids: None,
                    vector_store_ids: Vec::new(),
                },
            },
        };

        let descriptor = self
            .descriptor(
                Method::POST,
                self.url(&["assistant", "modify_assistant", assistant_id])?,
                Scope::Full,
            )?
            .json(&payload)?;
        self.send(&descriptor).await
    }

    /// Threads owned by the current workspace.
    pub async fn list_threads(&self) -> Result<Vec<Thread>> {
        let key = self.require_consumer_key()?;
        let descriptor =
            self.descriptor(Method::GET, self.url(&["thread", "threads", key])?, Scope::Full)?;
        let envelope: ThreadsEnvelope<Thread> = self.send(&descriptor).await?.deserialize()?;
        Ok(envelope.threads)
    }

    /// Threads of the assistant builder. The consumer key travels in the path only.
    pub async fn list_builder_threads(&self) -> Result<Vec<Thread>> {
        let key = self.require_consumer_key()?;
        let descriptor = self.descriptor(
            Method::GET,
            self.url(&["assistant-builder-thread", "threads", key])?,
            Scope::Public,
        )?;
        let envelope: ThreadsEnvelope<Thread> = self.send(&descriptor).await?.deserialize()?;
        Ok(envelope.threads)
    }

    /// Appends a user message to a thread.
    pub async fn add_message(&self, thread_id: &str, content: &str) -> Result<Payload> {
        require("thread id", thread_id)?;
        require("message content", content)?;
        let descriptor = self
            .descriptor(
                Method::POST,
                self.url(&["messages", "create_message", "threads", thread_id, "messages"])?,
                Scope::Full,
            )?
            .json(&CreateMessageRequest {
                role: "user",
                content,
            })?;
        self.send(&descriptor).await
    }

    pub async fn list_messages(&self, thread_id: &str, query: ListQuery) -> Result<Vec<Message>> {
        require("thread id", thread_id)?;
        let mut url =
            self.url(&["messages", "list_messages", "threads", thread_id, "messages"])?;
        url.query_pairs_mut().extend_pairs(query.pairs());

        let descriptor = self.descriptor(Method::GET, url, Scope::Full)?;
        decode_messages(self.send(&descriptor).await?)
    }

    /// Runs the assistant on the thread and returns the resulting conversation.
    pub async fn run_thread(&self, thread_id: &str, assistant_id: &str) -> Result<Vec<Message>> {
        require("thread id", thread_id)?;
        require("assistant id", assistant_id)?;
        let descriptor = self
            .descriptor(
                Method::POST,
                self.url(&["runs", "run_thread_and_list_messages"])?,
                Scope::Full,
            )?
            .json(&RunThreadRequest {
                thread_id,
                assistant_id,
            })?;
        decode_messages(self.send(&descriptor).await?)
    }

    pub async fn upload_file(&self, upload: FileUpload) -> Result<FileObject> {
        require("file name", &upload.file_name)?;
        let form = FormData::new()
            .file("file", upload.file_name, upload.bytes, upload.mime)
            .text("purpose", upload.purpose);
        let descriptor = self
            .descriptor(Method::POST, self.url(&["files", "upload"])?, Scope::ConsumerKey)?
            .form(form);
        self.send(&descriptor).await?.deserialize()
    }

    pub async fn file_details(&self, file_id: &str) -> Result<FileObject> {
        require("file id", file_id)?;
        let descriptor =
            self.descriptor(Method::GET, self.url(&["files", file_id])?, Scope::ConsumerKey)?;
        self.send(&descriptor).await?.deserialize()
    }

    pub async fn list_vector_stores(&self, query: ListQuery) -> Result<Vec<VectorStore>> {
        let mut url = self.url(&["vector_stores", "list_vector_stores"])?;
        url.query_pairs_mut().extend_pairs(query.pairs());

        let descriptor = self.descriptor(Method::GET, url, Scope::ConsumerKey)?;
        let envelope: DataEnvelope<VectorStore> = self.send(&descriptor).await?.deserialize()?;
        Ok(envelope.data)
    }

    pub async fn list_vector_store_files(
        &self,
        store_id: &str,
        query: ListQuery,
    ) -> Result<Vec<VectorStoreFile>> {
        require("vector store id", store_id)?;
        let mut url = self.url(&[
            "vector_stores",
            "list_vector_store_files",
            store_id,
            "files",
        ])?;
        url.query_pairs_mut().extend_pairs(query.pairs());

        let descriptor = self.descriptor(Method::GET, url, Scope::ConsumerKey)?;
        let envelope: DataEnvelope<VectorStoreFile> =
            self.send(&descriptor).await?.deserialize()?;
        Ok(envelope.data)
    }

    /// Joins `segments` onto the base URL, percent-encoding each one.
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|err| {
            SolomonError::InvalidArgument(format!("invalid base url '{}': {err}", self.base_url))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                SolomonError::InvalidArgument(format!(
                    "base url '{}' cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.options.timeout_ms)
    }

    fn descriptor(&self, method: Method, url: Url, scope: Scope) -> Result<RequestDescriptor> {
        let mut descriptor = RequestDescriptor::new(method, url)
            .timeout(self.request_timeout())
            .header(ACCEPT, HeaderValue::from_static("application/json"));

        if matches!(scope, Scope::Bearer | Scope::BearerNoCache | Scope::Full) {
            let authorization = self
                .credentials
                .authorization()
                .ok_or_else(|| SolomonError::Credentials("access token".to_owned()))?;
            descriptor = descriptor.header(AUTHORIZATION, header_value("access token", &authorization)?);
        }

        if matches!(scope, Scope::ConsumerKey | Scope::Full) {
            let key = self.require_consumer_key()?;
            descriptor = descriptor.header(
                HeaderName::from_static(CONSUMER_KEY_HEADER),
                header_value("consumer key", key)?,
            );
        }

        if scope == Scope::BearerNoCache {
            descriptor = descriptor
                .header(CACHE_CONTROL, HeaderValue::from_static("no-cache"))
                .header(PRAGMA, HeaderValue::from_static("no-cache"));
        }

        Ok(descriptor)
    }

    fn require_consumer_key(&self) -> Result<&str> {
        self.credentials
            .consumer_key()
            .ok_or_else(|| SolomonError::Credentials("consumer key".to_owned()))
    }
}

fn require(what: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SolomonError::InvalidArgument(format!("{what} is required")));
    }
    Ok(())
}

fn header_value(what: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|_| {
        SolomonError::Credentials(format!("{what} contains characters not allowed in a header"))
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}
