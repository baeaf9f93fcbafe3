//! Navigation bar

use crate::navigation::Route;
use crate::session::SessionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavLink {
    Library,
    Login,
    Register,
    Settings,
    Admin,
    Logout,
}

impl NavLink {
    pub fn label(&self) -> &'static str {
        match self {
            NavLink::Library => "Library",
            NavLink::Login => "Login",
            NavLink::Register => "Register",
            NavLink::Settings => "Settings",
            NavLink::Admin => "Admin",
            NavLink::Logout => "Logout",
        }
    }

    /// Target route. Logout is an action, not a route.
    pub fn route(&self) -> Option<Route> {
        match self {
            NavLink::Library => Some(Route::Library),
            NavLink::Login => Some(Route::Login),
            NavLink::Register => Some(Route::Register),
            NavLink::Settings => Some(Route::Settings),
            NavLink::Admin => Some(Route::Admin),
            NavLink::Logout => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavBar {
    pub username: Option<String>,
    pub links: Vec<NavLink>,
}

impl NavBar {
    pub fn for_session(state: &SessionState) -> Self {
        if state.loading {
            return Self {
                username: None,
                links: vec![NavLink::Library],
            };
        }

        match &state.user {
            Some(user) => {
                let mut links = vec![NavLink::Library];
                if user.is_admin() {
                    links.push(NavLink::Admin);
                }
                links.extend([NavLink::Settings, NavLink::Logout]);
                Self {
                    username: Some(user.username.clone()),
                    links,
                }
            }
            None => Self {
                username: None,
                links: vec![NavLink::Library, NavLink::Login, NavLink::Register],
            },
        }
    }
}
