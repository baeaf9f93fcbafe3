use std::fmt;

use client::{ApiClient, CancelToken, ClientResult};
use common::models::MangaSummary;
use tracing::debug;

use crate::navigation::Route;

/// Published manga
#[derive(Debug, Clone, PartialEq)]
pub struct LibraryView {
    pub manga: Vec<MangaSummary>,
}

impl LibraryView {
    pub async fn load(api: &ApiClient, cancel: &CancelToken) -> ClientResult<Self> {
        let manga = cancel.run(api.manga().list()).await?;
        debug!("Library holds {} manga", manga.len());
        Ok(Self { manga })
    }

    pub fn is_empty(&self) -> bool {
        self.manga.is_empty()
    }

    /// Where selecting the manga at `index` leads
    pub fn route_of(&self, index: usize) -> Option<Route> {
        self.manga.get(index).map(|m| Route::Manga(m.id))
    }
}

impl fmt::Display for LibraryView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.manga.is_empty() {
            return writeln!(f, "No manga available yet.");
        }

        writeln!(f, "Library")?;
        for manga in &self.manga {
            writeln!(f, "  [{}] {}", manga.id, manga.title)?;
            if let Some(description) = manga.description.as_deref().filter(|d| !d.is_empty()) {
                writeln!(f, "       {}", description)?;
            }
        }
        Ok(())
    }
}
