use client::ApiClient;
use common::validation::{validate_email, validate_password, validate_username};
use tracing::{info, warn};

use crate::navigation::Route;
use crate::session::SessionStore;

/// Self-service registration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    /// Whether the site accepts registrations at all
    pub allowed: bool,
    pub error: Option<String>,
}

impl RegisterForm {
    /// Ask the API whether registration is open. An unreachable API reads
    /// as closed.
    pub async fn load(api: &ApiClient) -> Self {
        let allowed = match api.auth().registration_allowed().await {
            Ok(allowed) => allowed,
            Err(e) => {
                warn!("Failed to check registration status: {}", e);
                false
            }
        };

        Self {
            allowed,
            ..Default::default()
        }
    }

    fn validate(&self) -> Result<(), String> {
        validate_username(self.username.trim())?;
        validate_email(self.email.trim())?;
        validate_password(&self.password)
    }

    /// Create the account and sign in with it
    pub async fn submit(&mut self, session: &SessionStore) -> bool {
        self.error = None;

        if !self.allowed {
            self.error = Some("Registration is currently disabled".to_string());
            return false;
        }

        if let Err(message) = self.validate() {
            self.error = Some(message);
            return false;
        }

        let auth = session.api().auth();
        let username = self.username.trim();
        if let Err(e) = auth
            .register(username, self.email.trim(), &self.password)
            .await
        {
            self.error = Some(e.user_message("Registration failed"));
            return false;
        }
        info!("Registered {}", username);

        let token = match auth.login(username, &self.password).await {
            Ok(token) => token,
            Err(e) => {
                self.error = Some(e.user_message("Login failed"));
                return false;
            }
        };

        if let Err(e) = session.login(&token.access_token).await {
            self.error = Some(e.user_message("Login failed"));
            return false;
        }

        self.password.clear();
        session.navigator().push(Route::Library);
        true
    }
}
