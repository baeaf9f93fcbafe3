//! Application state shared across handlers

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{jwt::JwtService, store::Store};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<Store>>,
    pub jwt_service: JwtService,
}

impl AppState {
    pub fn new(jwt_service: JwtService) -> Self {
        Self {
            store: Arc::new(Mutex::new(Store::default())),
            jwt_service,
        }
    }
}
