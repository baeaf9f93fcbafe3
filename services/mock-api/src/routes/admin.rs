//! `/api/admin` handlers

use std::collections::BTreeMap;

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use common::models::{
    AdminStats, ConfigEntry, MessageResponse, NewUser, PasswordReset, RegistrationStatus, Role,
    UpdateUser, User,
};
use serde::Deserialize;
use tracing::info;

use crate::{
    error::{MockError, MockResult},
    middleware::CurrentUser,
    state::AppState,
    store::REGISTRATION_KEY,
};

#[derive(Debug, Deserialize)]
pub struct RegistrationQuery {
    pub enabled: bool,
}

pub async fn list_users(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> MockResult<Json<Vec<User>>> {
    current.require_admin()?;
    Ok(Json(state.store.lock().await.users()?))
}

pub async fn create_user(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<NewUser>,
) -> MockResult<(StatusCode, Json<User>)> {
    current.require_admin()?;
    let user = state.store.lock().await.create_user(
        &payload.username,
        &payload.email,
        &payload.password,
        payload.role.unwrap_or_default(),
    )?;
    info!("Admin created user {}", user.username);
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn update_user(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(update): Json<UpdateUser>,
) -> MockResult<Json<User>> {
    let admin = current.require_admin()?;
    if id == admin.id && update.role.is_some_and(|r| r != Role::Admin) {
        return Err(MockError::BadRequest(
            "Cannot remove your own admin role".to_string(),
        ));
    }
    Ok(Json(state.store.lock().await.update_user(
        id,
        update.role,
        update.is_active,
    )?))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> MockResult<Json<MessageResponse>> {
    let admin = current.require_admin()?;
    if id == admin.id {
        return Err(MockError::BadRequest("Cannot delete yourself".to_string()));
    }
    state.store.lock().await.delete_user(id)?;
    Ok(Json(MessageResponse {
        message: "User deleted successfully".to_string(),
    }))
}

pub async fn reset_password(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<PasswordReset>,
) -> MockResult<Json<MessageResponse>> {
    current.require_admin()?;
    state
        .store
        .lock()
        .await
        .set_password(id, &payload.new_password)?;
    Ok(Json(MessageResponse {
        message: "Password reset successfully".to_string(),
    }))
}

pub async fn stats(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> MockResult<Json<AdminStats>> {
    current.require_admin()?;
    Ok(Json(state.store.lock().await.stats()))
}

pub async fn get_config(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> MockResult<Json<BTreeMap<String, String>>> {
    current.require_admin()?;
    Ok(Json(state.store.lock().await.config()))
}

pub async fn update_config(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(entry): Query<ConfigEntry>,
) -> MockResult<Json<ConfigEntry>> {
    current.require_admin()?;
    state.store.lock().await.set_config(&entry.key, &entry.value);
    Ok(Json(entry))
}

pub async fn registration_status(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> MockResult<Json<RegistrationStatus>> {
    current.require_admin()?;
    Ok(Json(RegistrationStatus {
        registration_enabled: state.store.lock().await.registration_enabled(),
    }))
}

pub async fn toggle_registration(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<RegistrationQuery>,
) -> MockResult<Json<RegistrationStatus>> {
    current.require_admin()?;
    let value = if query.enabled { "true" } else { "false" };
    state.store.lock().await.set_config(REGISTRATION_KEY, value);
    info!("Registration set to {}", value);
    Ok(Json(RegistrationStatus {
        registration_enabled: query.enabled,
    }))
}
