use serde::{Deserialize, Serialize};

use crate::AssistantTool;

#[derive(Debug, Serialize)]
pub struct SignInRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct CreateMessageRequest<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

#[derive(Debug, Serialize)]
pub struct RunThreadRequest<'a> {
    pub thread_id: &'a str,
    pub assistant_id: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ModifyAssistantRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
    pub tools: Vec<ToolSpec>,
    pub tool_resources: ToolResourcesRequest<'a>,
}

#[derive(Debug, Serialize)]
pub struct ToolSpec {
    #[serde(rename = "type")]
    pub kind: AssistantTool,
}

#[derive(Debug, Serialize)]
pub struct ToolResourcesRequest<'a> {
    pub code_interpreter: CodeInterpreterFiles<'a>,
    pub file_search: FileSearchStores,
}

#[derive(Debug, Serialize)]
pub struct CodeInterpreterFiles<'a> {
    pub file_ids: Vec<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct FileSearchStores {
    pub file_ids: Option<Vec<String>>,
    pub vector_store_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct DataEnvelope<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub struct ThreadsEnvelope<T> {
    #[serde(default = "Vec::new")]
    pub threads: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub struct WorkspacesEnvelope {
    #[serde(default)]
    pub workspace_names: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ConsumerKeyEnvelope {
    #[serde(default)]
    pub solomon_consumer_key: Option<String>,
}
