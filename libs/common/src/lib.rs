//! Common library for the manga reader client
//!
//! This crate holds the wire models exchanged with the manga API, the
//! helpers that turn API error payloads into readable messages, and the
//! input validation shared by the forms.

pub mod error;
pub mod models;
pub mod validation;

pub use error::{ErrorPayload, error_message};
