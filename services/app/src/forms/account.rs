use common::models::User;
use common::validation::validate_new_password;
use tracing::info;

use crate::session::SessionStore;

/// Account settings: password change and account deletion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountSettings {
    pub user: Option<User>,
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
    pub error: Option<String>,
    pub success: Option<String>,
    confirm_delete: bool,
}

impl AccountSettings {
    pub fn new(user: Option<User>) -> Self {
        Self {
            user,
            ..Default::default()
        }
    }

    pub async fn change_password(&mut self, session: &SessionStore) -> bool {
        self.error = None;
        self.success = None;

        if let Err(message) = validate_new_password(&self.new_password, &self.confirm_password) {
            self.error = Some(message);
            return false;
        }

        match session
            .api()
            .auth()
            .change_password(&self.current_password, &self.new_password)
            .await
        {
            Ok(response) => {
                info!("Password changed");
                self.current_password.clear();
                self.new_password.clear();
                self.confirm_password.clear();
                self.success = Some(response.message);
                true
            }
            Err(e) => {
                if e.is_unauthorized() {
                    session.expire();
                }
                self.error = Some(e.user_message("Failed to change password"));
                false
            }
        }
    }

    /// First click on "delete account"
    pub fn request_delete(&mut self) {
        self.confirm_delete = true;
    }

    pub fn cancel_delete(&mut self) {
        self.confirm_delete = false;
    }

    pub fn is_confirming_delete(&self) -> bool {
        self.confirm_delete
    }

    /// Delete the account. Does nothing unless deletion was requested first.
    pub async fn confirm_delete(&mut self, session: &SessionStore) -> bool {
        self.error = None;

        if !self.confirm_delete {
            return false;
        }

        match session.api().auth().delete_account().await {
            Ok(_) => {
                self.confirm_delete = false;
                session.account_deleted();
                true
            }
            Err(e) => {
                if e.is_unauthorized() {
                    session.expire();
                }
                self.error = Some(e.user_message("Failed to delete account"));
                false
            }
        }
    }
}
