//! User management

use std::fmt;

use client::{ApiClient, CancelToken, ClientError, ClientResult};
use common::models::{Role, UpdateUser, User};
use common::validation::{validate_email, validate_password, validate_username};
use tracing::{info, warn};

/// "Create user" dialog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateUserForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl CreateUserForm {
    fn validate(&self) -> Result<(), String> {
        validate_username(self.username.trim())?;
        validate_email(self.email.trim())?;
        validate_password(&self.password)
    }
}

/// User list as seen by an admin. Role, status and deletion controls are
/// disabled on the admin's own row.
#[derive(Debug, Clone, PartialEq)]
pub struct UserAdmin {
    acting_user_id: i64,
    users: Vec<User>,
    pub error: Option<String>,
    pub success: Option<String>,
}

impl UserAdmin {
    pub async fn load(api: &ApiClient, cancel: &CancelToken, acting: &User) -> ClientResult<Self> {
        let users = cancel.run(api.admin().users()).await?;
        Ok(Self {
            acting_user_id: acting.id,
            users,
            error: None,
            success: None,
        })
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn user(&self, user_id: i64) -> Option<&User> {
        self.users.iter().find(|u| u.id == user_id)
    }

    /// Whether role, status and deletion controls are enabled for `user_id`
    pub fn can_modify(&self, user_id: i64) -> bool {
        user_id != self.acting_user_id
    }

    /// Reload the list after a change the server already accepted. A
    /// failure here is shown but does not undo the change's success.
    async fn refresh(&mut self, api: &ApiClient) {
        match api.admin().users().await {
            Ok(users) => self.users = users,
            Err(e) => {
                warn!("Failed to reload users: {}", e);
                self.error = Some(e.user_message("Failed to reload users"));
            }
        }
    }

    fn guard_self(&self, user_id: i64) -> ClientResult<()> {
        if self.can_modify(user_id) {
            Ok(())
        } else {
            Err(ClientError::Validation(
                "You cannot modify your own account here".to_string(),
            ))
        }
    }

    fn settle<T>(&mut self, result: ClientResult<T>, fallback: &str) -> ClientResult<T> {
        match &result {
            Ok(_) => self.error = None,
            Err(e) => self.error = Some(e.user_message(fallback)),
        }
        result
    }

    async fn update(
        &mut self,
        api: &ApiClient,
        user_id: i64,
        update: UpdateUser,
    ) -> ClientResult<User> {
        self.success = None;
        let result = match self.guard_self(user_id) {
            Ok(()) => api.admin().update_user(user_id, &update).await,
            Err(e) => Err(e),
        };
        let user = self.settle(result, "Failed to update user")?;
        self.refresh(api).await;
        Ok(user)
    }

    pub async fn set_role(
        &mut self,
        api: &ApiClient,
        user_id: i64,
        role: Role,
    ) -> ClientResult<User> {
        let update = UpdateUser {
            role: Some(role),
            is_active: None,
        };
        self.update(api, user_id, update).await
    }

    pub async fn set_active(
        &mut self,
        api: &ApiClient,
        user_id: i64,
        active: bool,
    ) -> ClientResult<User> {
        let update = UpdateUser {
            role: None,
            is_active: Some(active),
        };
        self.update(api, user_id, update).await
    }

    pub async fn delete(&mut self, api: &ApiClient, user_id: i64) -> ClientResult<()> {
        self.success = None;
        let result = match self.guard_self(user_id) {
            Ok(()) => api.admin().delete_user(user_id).await,
            Err(e) => Err(e),
        };
        let response = self.settle(result, "Failed to delete user")?;
        self.success = Some(response.message);
        self.refresh(api).await;
        Ok(())
    }

    /// Set a new password for any user, the acting admin included
    pub async fn reset_password(
        &mut self,
        api: &ApiClient,
        user_id: i64,
        new_password: &str,
    ) -> ClientResult<()> {
        self.success = None;
        let result = match validate_password(new_password) {
            Ok(()) => api.admin().reset_password(user_id, new_password).await,
            Err(message) => Err(ClientError::Validation(message)),
        };
        let response = self.settle(result, "Failed to reset password")?;
        self.success = Some(response.message);
        Ok(())
    }

    pub async fn create(&mut self, api: &ApiClient, form: &CreateUserForm) -> ClientResult<User> {
        self.success = None;
        let result = match form.validate() {
            Ok(()) => {
                api.admin()
                    .create_user(
                        form.username.trim(),
                        form.email.trim(),
                        &form.password,
                        form.role,
                    )
                    .await
            }
            Err(message) => Err(ClientError::Validation(message)),
        };
        let user = self.settle(result, "Failed to create user")?;
        info!("Created user {}", user.username);
        self.refresh(api).await;
        Ok(user)
    }
}

impl fmt::Display for UserAdmin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<6} {:<20} {:<30} {:<6} {}", "ID", "USERNAME", "EMAIL", "ROLE", "STATUS")?;
        for user in &self.users {
            let status = if user.is_active { "active" } else { "disabled" };
            let marker = if self.can_modify(user.id) { "" } else { " (you)" };
            writeln!(
                f,
                "{:<6} {:<20} {:<30} {:<6} {}{}",
                user.id,
                user.username,
                user.email,
                user.role.as_str(),
                status,
                marker
            )?;
        }
        Ok(())
    }
}
