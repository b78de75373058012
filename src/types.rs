use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Name of the assistant that backs builder mode.
pub const ASSISTANT_BUILDER_NAME: &str = "Assistant Builder";

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct SignInResponse {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Which assistants a listing should return.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssistantMode {
    /// Every assistant in the workspace.
    Workforce,
    /// Only the assistant-builder assistant.
    Builder,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Assistant {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub metadata: Option<AssistantMetadata>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct AssistantMetadata {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// Assistant record including the files and vector stores attached to its tools.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct AssistantDetails {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tool_resources: Option<AssistantToolResources>,
}

impl AssistantDetails {
    /// Files attached to the code interpreter tool.
    pub fn code_interpreter_file_ids(&self) -> &[String] {
        self.tool_resources
            .as_ref()
            .and_then(|resources| resources.code_interpreter.as_ref())
            .map(|code| code.file_ids.as_slice())
            .unwrap_or_default()
    }

    /// Vector stores attached to the file search tool.
    pub fn vector_store_ids(&self) -> &[String] {
        self.tool_resources
            .as_ref()
            .and_then(|resources| resources.file_search.as_ref())
            .map(|search| search.vector_store_ids.as_slice())
            .unwrap_or_default()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct AssistantToolResources {
    #[serde(default)]
    pub code_interpreter: Option<CodeInterpreterResources>,
    #[serde(default)]
    pub file_search: Option<FileSearchResources>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct CodeInterpreterResources {
    #[serde(default)]
    pub file_ids: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct FileSearchResources {
    #[serde(default)]
    pub file_ids: Option<Vec<String>>,
    #[serde(default)]
    pub vector_store_ids: Vec<String>,
}

/// Tools an assistant can be granted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssistantTool {
    CodeInterpreter,
    Retrieval,
    FileSearch,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Thread {
    pub thread_id: String,
    #[serde(default)]
    pub thread_name: Option<String>,
}

/// A chat message flattened to its first text block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub role: String,
    pub value: String,
    pub created_at: i64,
    pub assistant_id: Option<String>,
    /// Display name, filled by [`AssistantNames::annotate`].
    pub assistant_name: Option<String>,
}

/// Assistant id to display name lookup built from a listing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssistantNames {
    names: HashMap<String, String>,
}

impl AssistantNames {
    pub fn from_assistants<'a, I>(assistants: I) -> Self
    where
        I: IntoIterator<Item = &'a Assistant>,
    {
        Self {
            names: assistants
                .into_iter()
                .map(|assistant| (assistant.id.clone(), assistant.name.clone()))
                .collect(),
        }
    }

    /// Display name for `assistant_id`, falling back to the id itself.
    pub fn name_for<'a>(&'a self, assistant_id: &'a str) -> &'a str {
        self.names
            .get(assistant_id)
            .map(String::as_str)
            .unwrap_or(assistant_id)
    }

    /// Fills `assistant_name` for every message that has an `assistant_id`.
    pub fn annotate(&self, messages: &mut [Message]) {
        for message in messages {
            message.assistant_name = message
                .assistant_id
                .as_deref()
                .map(|id| self.name_for(id).to_owned());
        }
    }
}

/// File to attach through `/files/upload`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub mime: Option<String>,
    pub purpose: String,
}

impl FileUpload {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
            mime: None,
            purpose: "assistants".to_owned(),
        }
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    pub fn with_purpose(mut self, purpose: impl Into<String>) -> Self {
        self.purpose = purpose.into();
        self
    }
}

/// File record returned by upload and lookup endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct FileObject {
    pub id: String,
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub bytes: u64,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub purpose: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct VectorStore {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub usage_bytes: u64,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub file_counts: FileCounts,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct FileCounts {
    #[serde(default)]
    pub in_progress: u64,
    #[serde(default)]
    pub completed: u64,
    #[serde(default)]
    pub failed: u64,
    #[serde(default)]
    pub cancelled: u64,
    #[serde(default)]
    pub total: u64,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct VectorStoreFile {
    pub id: String,
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub usage_bytes: u64,
    #[serde(default)]
    pub vector_store_id: String,
    #[serde(default)]
    pub status: String,
    /// Upstream error description, either a string or a `{code, message}` object.
    #[serde(default)]
    pub last_error: Option<serde_json::Value>,
}
