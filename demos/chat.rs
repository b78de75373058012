use solomon_http::{AssistantMode, AssistantNames, ListQuery, SolomonClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let email = std::env::var("SOLOMON_EMAIL")?;
    let password = std::env::var("SOLOMON_PASSWORD")?;

    let client = SolomonClient::default();
    let session = client.sign_in(&email, &password).await?;
    let client = client.with_access_token(session.access_token);

    let workspaces = client.list_workspaces().await?;
    let workspace = workspaces
        .first()
        .ok_or_else(|| anyhow::anyhow!("account has no workspaces"))?;
    let key = client
        .workspace_key(workspace)
        .await?
        .ok_or_else(|| anyhow::anyhow!("workspace {workspace} has no consumer key"))?;
    let client = client.with_consumer_key(key);

    let assistants = client
        .list_assistants(AssistantMode::Workforce, ListQuery::assistants())
        .await?;
    let assistant = assistants
        .first()
        .ok_or_else(|| anyhow::anyhow!("workspace has no assistants"))?;
    let names = AssistantNames::from_assistants(&assistants);

    let threads = client.list_threads().await?;
    let thread = threads
        .first()
        .ok_or_else(|| anyhow::anyhow!("workspace has no threads"))?;

    client.add_message(&thread.thread_id, "Hello!").await?;
    let mut messages = client.run_thread(&thread.thread_id, &assistant.id).await?;
    names.annotate(&mut messages);

    for message in messages {
        let speaker = message.assistant_name.unwrap_or(message.role);
        println!("{speaker}: {}", message.value);
    }

    client.logout().await;
    Ok(())
}
