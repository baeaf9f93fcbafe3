//! Typed API groups

mod admin;
mod auth;
mod chapters;
mod manga;

use std::sync::Arc;

pub use admin::AdminApi;
pub use auth::AuthApi;
pub use chapters::{ChapterApi, page_filename};
pub use manga::{ChapterUpload, MangaApi};

use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::http::HttpClient;
use crate::token_store::TokenStore;

/// Entry point to the manga API
#[derive(Clone)]
pub struct ApiClient {
    http: HttpClient,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(config: &ClientConfig, tokens: Arc<dyn TokenStore>) -> ClientResult<Self> {
        Ok(Self {
            http: HttpClient::new(config, tokens)?,
        })
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        self.http.tokens()
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(&self.http)
    }

    pub fn manga(&self) -> MangaApi<'_> {
        MangaApi::new(&self.http)
    }

    pub fn chapters(&self) -> ChapterApi<'_> {
        ChapterApi::new(&self.http)
    }

    pub fn admin(&self) -> AdminApi<'_> {
        AdminApi::new(&self.http)
    }
}
