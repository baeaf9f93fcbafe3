//! In-memory stand-in for the manga API
//!
//! Implements the HTTP contract the reader client consumes, backed by a
//! process-local store. Integration tests spawn it on an ephemeral port via
//! [`MockServer::spawn`]; `main.rs` serves it for local development.

pub mod error;
pub mod jwt;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;
pub mod store;

pub use routes::create_router;
pub use server::MockServer;
pub use state::AppState;
