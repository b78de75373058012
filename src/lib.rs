//! `solomon-http` is an async HTTP client for the Solomon assistant platform API.
//!
//! Every call goes through a resilient request core ([`send`]) that retries
//! transport failures with exponential backoff, turns error responses into
//! [`SolomonError::Http`] with the upstream message, and decodes bodies by
//! content type into a [`Payload`].
//!
//! [`SolomonClient`] wraps the platform endpoints:
//! - sign-in and account: [`SolomonClient::sign_in`], [`SolomonClient::user_info`]
//! - workspaces: [`SolomonClient::list_workspaces`], [`SolomonClient::workspace_key`]
//! - chat: [`SolomonClient::list_threads`], [`SolomonClient::add_message`],
//!   [`SolomonClient::run_thread`]
//! - files: [`SolomonClient::upload_file`], [`SolomonClient::list_vector_stores`]

mod client;
mod config;
mod decode;
mod error;
mod options;
mod query;
mod request;
mod response;
mod transport;
mod types;
mod wire;

pub use client::SolomonClient;
pub use config::{Credentials, CONSUMER_KEY_HEADER, DEFAULT_BASE_URL};
pub use error::SolomonError;
pub use options::{ClientOptions, RetryPolicy};
pub use query::{ListQuery, Order};
pub use request::{FormData, FormPart, RequestBody, RequestDescriptor};
pub use response::Payload;
pub use transport::send;
pub use types::{
    Assistant, AssistantDetails, AssistantMetadata, AssistantMode, AssistantNames, AssistantTool,
    AssistantToolResources, CodeInterpreterResources, FileCounts, FileObject, FileSearchResources,
    FileUpload, Message, SignInResponse, Thread, UserInfo, VectorStore, VectorStoreFile,
    ASSISTANT_BUILDER_NAME,
};

/// Re-exported so descriptors can be built without a direct `reqwest` dependency.
pub use reqwest::{header, Method, Url};

pub type Result<T> = std::result::Result<T, SolomonError>;
