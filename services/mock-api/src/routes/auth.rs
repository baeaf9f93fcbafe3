//! `/api/auth` handlers

use axum::{Extension, Form, Json, extract::State};
use common::models::{
    LoginCredentials, MessageResponse, NewUser, PasswordChange, RegistrationAllowed, Role, Token,
    User,
};
use tracing::{error, info};

use crate::{
    error::{MockError, MockResult},
    middleware::CurrentUser,
    state::AppState,
};

pub async fn login(
    State(state): State<AppState>,
    Form(credentials): Form<LoginCredentials>,
) -> MockResult<Json<Token>> {
    info!("Login attempt for user: {}", credentials.username);

    let user = state
        .store
        .lock()
        .await
        .check_password(&credentials.username, &credentials.password)
        .ok_or_else(|| MockError::Unauthorized("Incorrect username or password".to_string()))?;

    if !user.is_active {
        return Err(MockError::BadRequest("Inactive user".to_string()));
    }

    let access_token = state
        .jwt_service
        .generate_access_token(&user.username)
        .map_err(|e| {
            error!("Failed to generate access token: {}", e);
            MockError::Internal("Internal server error".to_string())
        })?;

    Ok(Json(Token {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<NewUser>,
) -> MockResult<Json<User>> {
    let mut store = state.store.lock().await;
    if !store.registration_enabled() {
        return Err(MockError::Forbidden(
            "Registration is closed. Please contact an administrator.".to_string(),
        ));
    }

    // Registration always creates regular users
    let user = store.create_user(&payload.username, &payload.email, &payload.password, Role::User)?;
    info!("Registered user {}", user.username);
    Ok(Json(user))
}

pub async fn me(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<User> {
    Json(user)
}

pub async fn registration_allowed(State(state): State<AppState>) -> Json<RegistrationAllowed> {
    Json(RegistrationAllowed {
        registration_allowed: state.store.lock().await.registration_enabled(),
    })
}

pub async fn change_password(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<PasswordChange>,
) -> MockResult<Json<MessageResponse>> {
    let mut store = state.store.lock().await;
    if store
        .check_password(&user.username, &payload.current_password)
        .is_none()
    {
        return Err(MockError::BadRequest("Incorrect current password".to_string()));
    }

    store.set_password(user.id, &payload.new_password)?;
    Ok(Json(MessageResponse {
        message: "Password changed successfully".to_string(),
    }))
}

pub async fn delete_account(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> MockResult<Json<MessageResponse>> {
    state.store.lock().await.delete_user(user.id)?;
    info!("User {} deleted their account", user.username);
    Ok(Json(MessageResponse {
        message: "Account deleted successfully".to_string(),
    }))
}
