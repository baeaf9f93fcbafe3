//! Authentication endpoints

use common::models::{
    LoginCredentials, MessageResponse, NewUser, PasswordChange, RegistrationAllowed, Token, User,
};
use tracing::info;

use crate::error::ClientResult;
use crate::http::HttpClient;

/// `/api/auth` endpoints
pub struct AuthApi<'a> {
    http: &'a HttpClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(http: &'a HttpClient) -> Self {
        Self { http }
    }

    /// Exchange credentials for a bearer token (form-encoded)
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<Token> {
        info!("Login attempt for user: {}", username);
        let credentials = LoginCredentials {
            username: username.to_string(),
            password: password.to_string(),
        };
        self.http.post_form("/api/auth/login", &credentials).await
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> ClientResult<User> {
        info!("Registering user: {}", username);
        let payload = NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role: None,
        };
        self.http.post("/api/auth/register", &payload).await
    }

    /// Identity behind the stored token
    pub async fn me(&self) -> ClientResult<User> {
        self.http.get("/api/auth/me").await
    }

    pub async fn registration_allowed(&self) -> ClientResult<bool> {
        let status: RegistrationAllowed = self.http.get("/api/auth/register-allowed").await?;
        Ok(status.registration_allowed)
    }

    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> ClientResult<MessageResponse> {
        let payload = PasswordChange {
            current_password: current_password.to_string(),
            new_password: new_password.to_string(),
        };
        self.http.put("/api/auth/password", &payload).await
    }

    pub async fn delete_account(&self) -> ClientResult<MessageResponse> {
        info!("Deleting own account");
        self.http.delete("/api/auth/account").await
    }
}
