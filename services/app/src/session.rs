//! Session store
//!
//! Holds the signed-in user and whether the session has been resolved yet.
//! State is published through a watch channel; the only writers are the
//! methods on [`SessionStore`].

use std::sync::Arc;

use client::{ApiClient, ClientResult};
use common::models::User;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::navigation::{Navigator, Route};

/// Snapshot of the session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub user: Option<User>,
    /// True until the first identity check has finished
    pub loading: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            user: None,
            loading: true,
        }
    }
}

impl SessionState {
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(User::is_admin)
    }
}

#[derive(Clone)]
pub struct SessionStore {
    api: ApiClient,
    navigator: Navigator,
    state: Arc<watch::Sender<SessionState>>,
}

impl SessionStore {
    pub fn new(api: ApiClient, navigator: Navigator) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            api,
            navigator,
            state: Arc::new(state),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    fn publish(&self, user: Option<User>) {
        self.state.send_replace(SessionState {
            user,
            loading: false,
        });
    }

    fn forget_token(&self) {
        if let Err(e) = self.api.tokens().remove() {
            warn!("Failed to remove stored token: {}", e);
        }
    }

    /// Resolve the stored token into a user. Any failure clears the token
    /// and leaves the session signed out.
    pub async fn check_auth(&self) {
        let token = match self.api.tokens().get() {
            Ok(token) => token,
            Err(e) => {
                warn!("Failed to read stored token: {}", e);
                None
            }
        };

        if token.is_none() {
            debug!("No stored token");
            self.publish(None);
            return;
        }

        match self.api.auth().me().await {
            Ok(user) => {
                info!("Session resolved for {}", user.username);
                self.publish(Some(user));
            }
            Err(e) => {
                info!("Stored token rejected: {}", e);
                self.forget_token();
                self.publish(None);
            }
        }
    }

    /// Persist `token` for one day, then resolve it
    pub async fn login(&self, token: &str) -> ClientResult<()> {
        self.api.tokens().set(token)?;
        self.check_auth().await;
        Ok(())
    }

    /// Clear the session and go to the login screen
    pub fn logout(&self) {
        info!("Logging out");
        self.forget_token();
        self.publish(None);
        self.navigator.push(Route::Login);
    }

    /// The API answered 401 mid-session
    pub fn expire(&self) {
        if self.state.borrow().user.is_some() {
            info!("Session expired");
        }
        self.forget_token();
        self.publish(None);
    }

    /// The account behind the session no longer exists
    pub fn account_deleted(&self) {
        info!("Account deleted, clearing session");
        self.forget_token();
        self.publish(None);
        self.navigator.push(Route::Library);
    }

    /// Wait for the first identity check to finish
    pub async fn settled(&self) -> SessionState {
        let mut rx = self.subscribe();
        match rx.wait_for(|state| !state.loading).await {
            Ok(state) => state.clone(),
            Err(_) => self.snapshot(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use client::{ClientConfig, MemoryTokenStore, TokenStore};

    fn offline_store() -> (SessionStore, Arc<MemoryTokenStore>) {
        let tokens = Arc::new(MemoryTokenStore::new());
        // Nothing listens here; only token-less paths are exercised
        let config = ClientConfig::with_api_url("http://127.0.0.1:9");
        let api = ApiClient::new(&config, tokens.clone()).unwrap();
        (SessionStore::new(api, Navigator::default()), tokens)
    }

    #[test]
    fn starts_loading() {
        let (session, _) = offline_store();
        assert!(session.is_loading());
        assert!(session.user().is_none());
    }

    #[tokio::test]
    async fn check_auth_without_token_settles_signed_out() {
        let (session, _) = offline_store();
        session.check_auth().await;

        let state = session.snapshot();
        assert!(!state.loading);
        assert!(state.user.is_none());
    }

    #[tokio::test]
    async fn unreachable_api_clears_token() {
        let (session, tokens) = offline_store();
        tokens.set("stale").unwrap();

        session.check_auth().await;
        assert!(session.user().is_none());
        assert!(tokens.get().unwrap().is_none());
    }

    #[tokio::test]
    async fn logout_clears_token_and_navigates_to_login() {
        let (session, tokens) = offline_store();
        tokens.set("abc").unwrap();

        session.logout();
        assert!(tokens.get().unwrap().is_none());
        assert!(session.user().is_none());
        assert_eq!(session.navigator().current(), Route::Login);
    }

    #[tokio::test]
    async fn subscribers_see_updates() {
        let (session, _) = offline_store();
        let mut rx = session.subscribe();
        session.expire();
        rx.changed().await.unwrap();
        assert!(!rx.borrow().loading);
    }
}
