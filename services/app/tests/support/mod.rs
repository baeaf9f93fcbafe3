use std::sync::Arc;

use app::App;
use client::{ApiClient, ClientConfig, MemoryTokenStore, TokenStore};
use common::models::Role;
use mock_api::MockServer;

/// An app talking to `server`, with an in-memory token store
pub fn app_for(server: &MockServer) -> anyhow::Result<(App, Arc<MemoryTokenStore>)> {
    let tokens = Arc::new(MemoryTokenStore::new());
    let api = ApiClient::new(&ClientConfig::with_api_url(server.url()), tokens.clone())?;
    Ok((App::new(api), tokens))
}

/// A mounted app already signed in as a freshly seeded user
#[allow(dead_code)]
pub async fn signed_in(
    server: &MockServer,
    username: &str,
    role: Role,
) -> anyhow::Result<(App, Arc<MemoryTokenStore>)> {
    server.seed_user(username, "secret1", role).await?;
    let (app, tokens) = app_for(server)?;
    tokens.set(&server.token_for(username)?)?;
    app.mount().await;
    anyhow::ensure!(app.session().user().is_some(), "session did not resolve");
    Ok((app, tokens))
}
