//! HTTP client for the manga API
//!
//! Wraps `reqwest` with bearer-token handling backed by a persisted token
//! store, and exposes the API as typed groups: [`api::AuthApi`],
//! [`api::MangaApi`], [`api::ChapterApi`] and [`api::AdminApi`].
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use client::{ApiClient, ClientConfig, FileTokenStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::from_env()?;
//!     let tokens = Arc::new(FileTokenStore::new(&config.session_file));
//!     let api = ApiClient::new(&config, tokens)?;
//!     for manga in api.manga().list().await? {
//!         println!("{}", manga.title);
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cancel;
pub mod config;
pub mod error;
pub mod http;
pub mod token_store;

pub use api::{ApiClient, ChapterUpload, page_filename};
pub use cancel::{CancelSource, CancelToken};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};
