//! Manga reader client application
//!
//! Session handling, route guarding and the screens of the manga reader,
//! driven by the `manga-reader` command line front end.

pub mod admin;
pub mod app;
pub mod cli;
pub mod forms;
pub mod guard;
pub mod nav;
pub mod navigation;
pub mod reader;
pub mod session;
pub mod views;

pub use app::{App, Screen};
pub use guard::{Access, GuardOutcome};
pub use navigation::{Navigator, Route};
pub use session::{SessionState, SessionStore};
