//! Middleware for bearer token validation and request recording

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use common::models::User;
use tracing::{debug, error};

use crate::{error::MockError, state::AppState};

/// Authenticated user, inserted into request extensions
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    /// Reject non-admins
    pub fn require_admin(&self) -> Result<&User, MockError> {
        if self.0.is_admin() {
            Ok(&self.0)
        } else {
            Err(MockError::Forbidden("Admin access required".to_string()))
        }
    }
}

/// Extract and validate the bearer token from the Authorization header
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, MockError> {
    let unauthorized = || MockError::Unauthorized("Could not validate credentials".to_string());

    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or_else(unauthorized)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(unauthorized)?;

    let claims = state.jwt_service.validate_token(token).map_err(|e| {
        error!("Failed to validate token: {}", e);
        unauthorized()
    })?;

    let user = state
        .store
        .lock()
        .await
        .user_by_name(&claims.sub)
        .ok_or_else(unauthorized)?;

    if !user.is_active {
        return Err(MockError::BadRequest("Inactive user".to_string()));
    }

    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}

/// Record `METHOD /path` of every request
pub async fn record_request(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let line = format!("{} {}", req.method(), req.uri().path());
    debug!("{}", line);
    state.store.lock().await.record_request(line);
    next.run(req).await
}
