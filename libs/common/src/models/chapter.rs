//! Chapter model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Chapter entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub id: i64,
    pub manga_id: i64,
    pub chapter_number: i32,
    pub title: Option<String>,
    #[serde(with = "super::timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Chapter {
    /// Display label, e.g. `Chapter 3: The Return`
    pub fn label(&self) -> String {
        match self.title.as_deref().filter(|t| !t.is_empty()) {
            Some(title) => format!("Chapter {}: {}", self.chapter_number, title),
            None => format!("Chapter {}", self.chapter_number),
        }
    }
}

/// Page listing of a chapter. Each entry is a URL path whose last segment is
/// the page filename.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterPages {
    pub pages: Vec<String>,
    pub total: usize,
}
