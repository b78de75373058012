use std::fs;

use serde::Deserialize;
use solomon_http::{AssistantMode, Credentials, ListQuery, SolomonClient, DEFAULT_BASE_URL};

#[derive(Debug, Deserialize)]
struct SecretsFile {
    #[serde(rename = "SOLOMON_BASE_URL")]
    solomon_base_url: Option<String>,
    #[serde(rename = "SOLOMON_ACCESS_TOKEN")]
    solomon_access_token: Option<String>,
    #[serde(rename = "SOLOMON_CONSUMER_KEY")]
    solomon_consumer_key: Option<String>,
}

fn load_live_client() -> Result<SolomonClient, String> {
    if let Ok(client) = SolomonClient::from_env() {
        return Ok(client);
    }

    let content = fs::read_to_string("secrets.json")
        .map_err(|_| "SOLOMON_ACCESS_TOKEN env or secrets.json is required".to_owned())?;
    let parsed: SecretsFile = serde_json::from_str(&content)
        .map_err(|err| format!("secrets.json could not be parsed: {err}"))?;

    let token = parsed
        .solomon_access_token
        .ok_or_else(|| "missing SOLOMON_ACCESS_TOKEN in secrets.json".to_owned())?;
    let base_url = parsed
        .solomon_base_url
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());

    Ok(SolomonClient::new(base_url).with_credentials(Credentials {
        access_token: Some(token),
        consumer_key: parsed.solomon_consumer_key,
    }))
}

#[tokio::test]
async fn live_workspace_and_thread_listing() {
    let client = match load_live_client() {
        Ok(client) => client,
        Err(_) => {
            eprintln!("skipping live test: credentials not found in env or secrets.json");
            return;
        }
    };

    let user = client.user_info().await.expect("user info must load");
    assert!(!user.id.is_empty());

    let workspaces = client.list_workspaces().await.expect("workspaces must load");

    let client = if client.credentials().consumer_key.is_some() {
        client
    } else {
        let Some(first) = workspaces.first() else {
            eprintln!("skipping thread listing: account has no workspaces");
            return;
        };
        let key = client
            .workspace_key(first)
            .await
            .expect("workspace key must load")
            .expect("workspace must have a consumer key");
        client.with_consumer_key(key)
    };

    client
        .list_assistants(AssistantMode::Workforce, ListQuery::assistants())
        .await
        .expect("assistants must load");
    client.list_threads().await.expect("threads must load");
}
