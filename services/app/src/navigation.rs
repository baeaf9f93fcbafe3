//! Routes and navigation history
//!
//! Every navigation cancels the requests issued for the previous route and
//! hands out a fresh [`CancelToken`] for the new one.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use client::{CancelSource, CancelToken};
use tracing::debug;

use crate::guard::Access;

/// Screens of the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    Library,
    Manga(i64),
    Read(i64),
    Settings,
    Admin,
    AdminUpload,
    AdminUsers,
    AdminSettings,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Library => "/".to_string(),
            Route::Manga(id) => format!("/manga/{}", id),
            Route::Read(chapter_id) => format!("/read/{}", chapter_id),
            Route::Settings => "/settings".to_string(),
            Route::Admin => "/admin".to_string(),
            Route::AdminUpload => "/admin/upload".to_string(),
            Route::AdminUsers => "/admin/users".to_string(),
            Route::AdminSettings => "/admin/settings".to_string(),
        }
    }

    pub fn parse(path: &str) -> Option<Route> {
        let segments: Vec<&str> = path
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match segments.as_slice() {
            [] => Some(Route::Library),
            ["login"] => Some(Route::Login),
            ["register"] => Some(Route::Register),
            ["manga", id] => id.parse().ok().map(Route::Manga),
            ["read", id] => id.parse().ok().map(Route::Read),
            ["settings"] => Some(Route::Settings),
            ["admin"] => Some(Route::Admin),
            ["admin", "upload"] => Some(Route::AdminUpload),
            ["admin", "users"] => Some(Route::AdminUsers),
            ["admin", "settings"] => Some(Route::AdminSettings),
            _ => None,
        }
    }

    /// Who may see this route
    pub fn access(&self) -> Access {
        match self {
            Route::Login | Route::Register => Access::Public,
            Route::Library | Route::Manga(_) | Route::Read(_) | Route::Settings => {
                Access::Authenticated
            }
            Route::Admin | Route::AdminUpload | Route::AdminUsers | Route::AdminSettings => {
                Access::Admin
            }
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

struct NavState {
    history: Vec<Route>,
    cancel: CancelSource,
}

/// Shared navigation handle
#[derive(Clone)]
pub struct Navigator {
    inner: Arc<Mutex<NavState>>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Route::Library)
    }
}

impl Navigator {
    pub fn new(initial: Route) -> Self {
        Self {
            inner: Arc::new(Mutex::new(NavState {
                history: vec![initial],
                cancel: CancelSource::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, NavState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn supersede(state: &mut NavState) -> CancelToken {
        state.cancel.cancel();
        state.cancel = CancelSource::new();
        state.cancel.token()
    }

    pub fn current(&self) -> Route {
        let state = self.lock();
        state.history.last().copied().unwrap_or(Route::Library)
    }

    pub fn history(&self) -> Vec<Route> {
        self.lock().history.clone()
    }

    /// Token of the current route's requests
    pub fn token(&self) -> CancelToken {
        self.lock().cancel.token()
    }

    /// Navigate to `route`, keeping the current one in history
    pub fn push(&self, route: Route) -> CancelToken {
        debug!("Navigating to {}", route);
        let mut state = self.lock();
        state.history.push(route);
        Self::supersede(&mut state)
    }

    /// Navigate to `route`, replacing the current entry (redirects)
    pub fn replace(&self, route: Route) -> CancelToken {
        debug!("Redirecting to {}", route);
        let mut state = self.lock();
        state.history.pop();
        state.history.push(route);
        Self::supersede(&mut state)
    }

    /// Go back one entry. The first entry is never popped.
    pub fn back(&self) -> Route {
        let mut state = self.lock();
        if state.history.len() > 1 {
            state.history.pop();
            Self::supersede(&mut state);
        }
        state.history.last().copied().unwrap_or(Route::Library)
    }
}
