//! Manga model and related payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::chapter::Chapter;

/// Manga entity. `chapters` is only populated by the detail endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manga {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub is_published: bool,
    #[serde(with = "super::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub uploaded_by: Option<i64>,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
}

/// Library listing entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MangaSummary {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    #[serde(with = "super::timestamp")]
    pub created_at: DateTime<Utc>,
}

/// New manga creation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewManga {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Partial manga update
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct UpdateManga {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_published: Option<bool>,
}

impl UpdateManga {
    pub fn publish() -> Self {
        Self {
            is_published: Some(true),
            ..Default::default()
        }
    }
}
