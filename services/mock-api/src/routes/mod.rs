//! Mock API routes

mod admin;
mod auth;
mod chapters;
mod manga;

use axum::{
    Json, Router, middleware,
    response::IntoResponse,
    routing::{get, post, put},
};

use crate::{
    middleware::{auth_middleware, record_request},
    state::AppState,
};

/// Create the router for the mock API
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/password", put(auth::change_password))
        .route("/api/auth/account", axum::routing::delete(auth::delete_account))
        .route("/api/manga", post(manga::create_manga))
        .route(
            "/api/manga/:id",
            put(manga::update_manga).delete(manga::delete_manga),
        )
        .route("/api/manga/:id/upload", post(manga::upload_chapter))
        .route(
            "/api/admin/users",
            get(admin::list_users).post(admin::create_user),
        )
        .route(
            "/api/admin/users/:id",
            put(admin::update_user).delete(admin::delete_user),
        )
        .route("/api/admin/users/:id/password", put(admin::reset_password))
        .route("/api/admin/stats", get(admin::stats))
        .route(
            "/api/admin/config",
            get(admin::get_config).put(admin::update_config),
        )
        .route(
            "/api/admin/config/registration",
            get(admin::registration_status).put(admin::toggle_registration),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/register-allowed", get(auth::registration_allowed))
        .route("/api/manga", get(manga::list_manga))
        .route("/api/manga/:id", get(manga::get_manga))
        .route("/api/manga/:id/chapters", get(manga::get_chapters))
        .route("/api/chapters/:id/pages", get(chapters::get_pages))
        .route("/api/chapters/:id/pages/:filename", get(chapters::get_page))
        .merge(protected_routes)
        .layer(middleware::from_fn_with_state(state.clone(), record_request))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "mock-api"
    }))
}
