//! Route guard
//!
//! One guard decides, for every route, whether the current session may see
//! it. Role checks here only shape the interface; the API enforces access.

use common::models::User;
use tracing::info;

use crate::navigation::Route;
use crate::session::SessionState;

/// Access level required by a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    Admin,
}

/// Guard decision
#[derive(Debug, Clone, PartialEq)]
pub enum GuardOutcome {
    /// Session not settled yet; show a placeholder
    Loading,
    /// Render the route. Carries the signed-in user, if any.
    Allow(Option<User>),
    /// Render nothing and go to the given route instead
    Redirect(Route),
}

/// Evaluate `access` against the session
pub fn evaluate(access: Access, session: &SessionState) -> GuardOutcome {
    if access == Access::Public {
        return GuardOutcome::Allow(session.user.clone());
    }

    if session.loading {
        return GuardOutcome::Loading;
    }

    match (&session.user, access) {
        (None, _) => {
            info!("No session, redirecting to login");
            GuardOutcome::Redirect(Route::Login)
        }
        (Some(user), Access::Admin) if !user.is_admin() => {
            info!("User {} is not an admin, redirecting", user.username);
            GuardOutcome::Redirect(Route::Library)
        }
        (Some(user), _) => GuardOutcome::Allow(Some(user.clone())),
    }
}

/// Evaluate the access level of `route`
pub fn check(route: Route, session: &SessionState) -> GuardOutcome {
    evaluate(route.access(), session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use common::models::Role;

    fn user(role: Role) -> User {
        User {
            id: 1,
            username: "reader".to_string(),
            email: "reader@example.com".to_string(),
            role,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn settled(user: Option<User>) -> SessionState {
        SessionState {
            user,
            loading: false,
        }
    }

    const PROTECTED: [Route; 8] = [
        Route::Library,
        Route::Manga(1),
        Route::Read(1),
        Route::Settings,
        Route::Admin,
        Route::AdminUpload,
        Route::AdminUsers,
        Route::AdminSettings,
    ];

    #[test]
    fn loading_session_shows_placeholder() {
        let state = SessionState {
            user: None,
            loading: true,
        };
        for route in PROTECTED {
            assert_eq!(check(route, &state), GuardOutcome::Loading);
        }
    }

    #[test]
    fn anonymous_visitors_are_sent_to_login() {
        for route in PROTECTED {
            assert_eq!(
                check(route, &settled(None)),
                GuardOutcome::Redirect(Route::Login)
            );
        }
    }

    #[test]
    fn regular_users_are_kept_out_of_admin() {
        let state = settled(Some(user(Role::User)));
        assert_eq!(
            check(Route::AdminUsers, &state),
            GuardOutcome::Redirect(Route::Library)
        );
        assert!(matches!(
            check(Route::Library, &state),
            GuardOutcome::Allow(Some(_))
        ));
    }

    #[test]
    fn admins_pass_everywhere() {
        let state = settled(Some(user(Role::Admin)));
        for route in PROTECTED {
            assert!(matches!(check(route, &state), GuardOutcome::Allow(Some(_))));
        }
    }

    #[test]
    fn public_routes_render_while_loading() {
        let state = SessionState {
            user: None,
            loading: true,
        };
        assert_eq!(check(Route::Login, &state), GuardOutcome::Allow(None));
    }
}
