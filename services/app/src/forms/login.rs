use tracing::info;

use crate::navigation::Route;
use crate::session::SessionStore;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub error: Option<String>,
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exchange the credentials for a token and start the session. On
    /// success navigates to the library.
    pub async fn submit(&mut self, session: &SessionStore) -> bool {
        self.error = None;

        if self.username.trim().is_empty() || self.password.is_empty() {
            self.error = Some("Username and password are required".to_string());
            return false;
        }

        let token = match session
            .api()
            .auth()
            .login(self.username.trim(), &self.password)
            .await
        {
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

        if session.user().is_none() {
            self.error = Some("Login failed".to_string());
            return false;
        }

        info!("Logged in as {}", self.username.trim());
        self.password.clear();
        session.navigator().push(Route::Library);
        true
    }
}
