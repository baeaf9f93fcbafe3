//! Ephemeral mock server for integration tests

use std::net::SocketAddr;

use anyhow::Result;
use common::models::{Chapter, Manga, Role, UpdateManga, User};
use tokio::net::TcpListener;
use tracing::info;

use crate::{jwt::JwtService, routes::create_router, state::AppState, store::REGISTRATION_KEY};

/// A running mock API bound to a local port. The server task lives until
/// the runtime shuts down.
#[derive(Clone)]
pub struct MockServer {
    addr: SocketAddr,
    state: AppState,
}

impl MockServer {
    /// Serve a fresh, empty store on `127.0.0.1:0`
    pub async fn spawn() -> Result<Self> {
        let state = AppState::new(JwtService::new("mock-api-test-secret"));
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let app = create_router(state.clone());

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("Mock API stopped: {}", e);
            }
        });

        info!("Mock API listening on {}", addr);
        Ok(Self { addr, state })
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub async fn seed_user(&self, username: &str, password: &str, role: Role) -> Result<User> {
        let email = format!("{}@example.com", username);
        Ok(self
            .state
            .store
            .lock()
            .await
            .create_user(username, &email, password, role)?)
    }

    pub async fn seed_manga(&self, title: &str, published: bool) -> Result<Manga> {
        let mut store = self.state.store.lock().await;
        let manga = store.create_manga(title, Some(format!("About {}", title)), None);
        let update = UpdateManga {
            is_published: Some(published),
            ..Default::default()
        };
        Ok(store.update_manga(manga.id, update)?)
    }

    pub async fn seed_chapter(
        &self,
        manga_id: i64,
        chapter_number: i32,
        title: Option<&str>,
        pages: &[&str],
    ) -> Result<Chapter> {
        Ok(self.state.store.lock().await.upsert_chapter(
            manga_id,
            chapter_number,
            title.map(str::to_string),
            pages.iter().map(|p| p.to_string()).collect(),
        )?)
    }

    pub async fn set_registration(&self, enabled: bool) {
        let value = if enabled { "true" } else { "false" };
        self.state
            .store
            .lock()
            .await
            .set_config(REGISTRATION_KEY, value);
    }

    /// Make every upload of `chapter_number` fail with a 500
    pub async fn fail_uploads_of(&self, chapter_number: i32) {
        self.state
            .store
            .lock()
            .await
            .fail_uploads_of(chapter_number);
    }

    /// Make `GET /api/admin/users` fail with a 500
    pub async fn fail_user_list(&self) {
        self.state.store.lock().await.fail_user_list();
    }

    pub fn token_for(&self, username: &str) -> Result<String> {
        self.state.jwt_service.generate_access_token(username)
    }

    pub fn expired_token_for(&self, username: &str) -> Result<String> {
        self.state.jwt_service.generate_expired_token(username)
    }

    /// `METHOD /path` of every request received so far
    pub async fn requests(&self) -> Vec<String> {
        self.state.store.lock().await.requests().to_vec()
    }

    /// Number of requests whose line starts with `prefix`
    pub async fn count_requests(&self, prefix: &str) -> usize {
        self.requests()
            .await
            .iter()
            .filter(|line| line.starts_with(prefix))
            .count()
    }

    pub async fn manga_ids(&self) -> Vec<i64> {
        self.state.store.lock().await.manga_ids()
    }

    pub async fn manga(&self, id: i64) -> Option<Manga> {
        self.state.store.lock().await.manga_detail(id).ok()
    }
}
