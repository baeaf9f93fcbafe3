//! Application shell
//!
//! [`App`] owns the session and navigation state and turns a route into a
//! [`Screen`]. Protected routes go through the guard before any request for
//! their data is made.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use client::{ApiClient, CancelToken, ClientConfig, ClientError, ClientResult, FileTokenStore};
use common::models::User;
use tracing::{debug, info, warn};

use crate::admin::{Dashboard, SiteSettings, UploadForm, UserAdmin};
use crate::forms::{AccountSettings, LoginForm, RegisterForm};
use crate::guard::{self, GuardOutcome};
use crate::nav::NavBar;
use crate::navigation::{Navigator, Route};
use crate::session::SessionStore;
use crate::views::{LibraryView, MangaView, ReadView};

/// What a route renders to
#[derive(Debug)]
pub enum Screen {
    /// Session not resolved yet
    Loading,
    /// The guard sent the visitor elsewhere; nothing was rendered
    Redirect(Route),
    /// The route was left before its data arrived
    Cancelled,
    Failed { route: Route, message: String },
    Login(LoginForm),
    Register(RegisterForm),
    Library(LibraryView),
    Manga(MangaView),
    Read(ReadView),
    Account(AccountSettings),
    Dashboard(Dashboard),
    Upload(UploadForm),
    Users(UserAdmin),
    Settings(SiteSettings),
}

#[derive(Clone)]
pub struct App {
    session: SessionStore,
    mounted: Arc<AtomicBool>,
}

impl App {
    pub fn new(api: ApiClient) -> Self {
        let navigator = Navigator::default();
        Self {
            session: SessionStore::new(api, navigator),
            mounted: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Build an app whose token persists in the configured session file
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        let tokens = Arc::new(FileTokenStore::new(&config.session_file));
        Ok(Self::new(ApiClient::new(config, tokens)?))
    }

    pub fn api(&self) -> &ApiClient {
        self.session.api()
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn navigator(&self) -> &Navigator {
        self.session.navigator()
    }

    pub fn nav_bar(&self) -> NavBar {
        NavBar::for_session(&self.session.snapshot())
    }

    /// Resolve the stored session. Only the first call does anything.
    pub async fn mount(&self) {
        if self.mounted.swap(true, Ordering::SeqCst) {
            debug!("Already mounted");
            return;
        }
        self.session.check_auth().await;
    }

    /// Navigate to `route` and render it
    pub async fn open(&self, route: Route) -> Screen {
        let cancel = self.navigator().push(route);
        self.render(route, cancel).await
    }

    /// Navigate to `route` and run its guard without loading anything, for
    /// actions that have no screen of their own
    pub fn authorize(&self, route: Route) -> GuardOutcome {
        self.navigator().push(route);
        self.guard(route)
    }

    fn guard(&self, route: Route) -> GuardOutcome {
        let outcome = guard::check(route, &self.session.snapshot());
        if let GuardOutcome::Redirect(target) = outcome {
            self.navigator().replace(target);
        }
        outcome
    }

    async fn render(&self, route: Route, cancel: CancelToken) -> Screen {
        let user = match self.guard(route) {
            GuardOutcome::Loading => return Screen::Loading,
            GuardOutcome::Redirect(target) => return Screen::Redirect(target),
            GuardOutcome::Allow(user) => user,
        };

        match self.load(route, &cancel, user).await {
            Ok(screen) => screen,
            Err(e) => self.fail(route, e),
        }
    }

    async fn load(
        &self,
        route: Route,
        cancel: &CancelToken,
        user: Option<User>,
    ) -> ClientResult<Screen> {
        let api = self.api();
        let screen = match route {
            Route::Login => Screen::Login(LoginForm::new()),
            Route::Register => Screen::Register(RegisterForm::load(api).await),
            Route::Library => Screen::Library(LibraryView::load(api, cancel).await?),
            Route::Manga(id) => Screen::Manga(MangaView::load(api, cancel, id).await?),
            Route::Read(chapter_id) => Screen::Read(ReadView::load(api, cancel, chapter_id).await?),
            Route::Settings => Screen::Account(AccountSettings::new(user)),
            Route::Admin => Screen::Dashboard(Dashboard::load(api, cancel).await?),
            Route::AdminUpload => Screen::Upload(UploadForm::new()),
            Route::AdminUsers => {
                let Some(acting) = user else {
                    return Err(ClientError::Unauthorized("Not authenticated".to_string()));
                };
                Screen::Users(UserAdmin::load(api, cancel, &acting).await?)
            }
            Route::AdminSettings => Screen::Settings(SiteSettings::load(api, cancel).await?),
        };
        Ok(screen)
    }

    fn fail(&self, route: Route, error: ClientError) -> Screen {
        match error {
            ClientError::Cancelled => {
                debug!("Load of {} cancelled", route);
                Screen::Cancelled
            }
            e if e.is_unauthorized() => {
                self.handle_error(&e);
                Screen::Redirect(Route::Login)
            }
            e => {
                warn!("Failed to load {}: {}", route, e);
                Screen::Failed {
                    route,
                    message: e.user_message(fallback_message(route)),
                }
            }
        }
    }

    /// React to an error from any call made on behalf of the session. A 401
    /// ends the session and sends the visitor to login.
    pub fn handle_error(&self, error: &ClientError) {
        if error.is_unauthorized() {
            info!("Request rejected, session is no longer valid");
            self.session.expire();
            self.navigator().replace(Route::Login);
        }
    }

    pub fn logout(&self) {
        self.session.logout();
    }
}

fn fallback_message(route: Route) -> &'static str {
    match route {
        Route::Library => "Failed to load manga",
        Route::Manga(_) => "Manga not found",
        Route::Read(_) => "Failed to load chapter",
        Route::Admin => "Failed to load stats",
        Route::AdminUsers => "Failed to load users",
        Route::AdminSettings => "Failed to load settings",
        _ => "Something went wrong",
    }
}
