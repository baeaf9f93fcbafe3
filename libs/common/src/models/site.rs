//! Site configuration and admin payloads

use serde::{Deserialize, Serialize};

/// Public registration switch, as seen by anonymous visitors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationAllowed {
    pub registration_allowed: bool,
}

/// Registration switch, as seen by admins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationStatus {
    pub registration_enabled: bool,
}

/// A single site configuration entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
}

/// Admin dashboard counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AdminStats {
    pub total_users: u64,
    pub total_manga: u64,
    pub published_manga: u64,
    pub total_chapters: u64,
}

/// Generic `{"message": ...}` acknowledgement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
