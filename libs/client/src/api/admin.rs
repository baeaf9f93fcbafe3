//! Admin endpoints. The server enforces the admin role; nothing here
//! checks it.

use std::collections::BTreeMap;

use common::models::{
    AdminStats, ConfigEntry, MessageResponse, NewUser, PasswordReset, RegistrationStatus, Role,
    UpdateUser, User,
};
use tracing::info;

use crate::error::ClientResult;
use crate::http::HttpClient;

/// `/api/admin` endpoints
pub struct AdminApi<'a> {
    http: &'a HttpClient,
}

impl<'a> AdminApi<'a> {
    pub(crate) fn new(http: &'a HttpClient) -> Self {
        Self { http }
    }

    pub async fn users(&self) -> ClientResult<Vec<User>> {
        self.http.get("/api/admin/users").await
    }

    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> ClientResult<User> {
        info!("Creating user {} with role {}", username, role);
        let payload = NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role: Some(role),
        };
        self.http.post("/api/admin/users", &payload).await
    }

    pub async fn update_user(&self, user_id: i64, update: &UpdateUser) -> ClientResult<User> {
        info!("Updating user {}: {:?}", user_id, update);
        self.http
            .put(&format!("/api/admin/users/{}", user_id), update)
            .await
    }

    pub async fn delete_user(&self, user_id: i64) -> ClientResult<MessageResponse> {
        info!("Deleting user {}", user_id);
        self.http
            .delete(&format!("/api/admin/users/{}", user_id))
            .await
    }

    pub async fn reset_password(
        &self,
        user_id: i64,
        new_password: &str,
    ) -> ClientResult<MessageResponse> {
        info!("Resetting password of user {}", user_id);
        let payload = PasswordReset {
            new_password: new_password.to_string(),
        };
        self.http
            .put(&format!("/api/admin/users/{}/password", user_id), &payload)
            .await
    }

    pub async fn stats(&self) -> ClientResult<AdminStats> {
        self.http.get("/api/admin/stats").await
    }

    pub async fn config(&self) -> ClientResult<BTreeMap<String, String>> {
        self.http.get("/api/admin/config").await
    }

    pub async fn update_config(&self, key: &str, value: &str) -> ClientResult<ConfigEntry> {
        info!("Setting site config {}={}", key, value);
        self.http
            .put_query("/api/admin/config", &[("key", key), ("value", value)])
            .await
    }

    pub async fn registration_status(&self) -> ClientResult<bool> {
        let status: RegistrationStatus = self.http.get("/api/admin/config/registration").await?;
        Ok(status.registration_enabled)
    }

    pub async fn set_registration(&self, enabled: bool) -> ClientResult<bool> {
        info!("Setting registration to {}", enabled);
        let status: RegistrationStatus = self
            .http
            .put_query("/api/admin/config/registration", &[("enabled", enabled)])
            .await?;
        Ok(status.registration_enabled)
    }
}
