use std::fmt;

use client::{ApiClient, CancelToken, ClientResult};
use common::models::{Chapter, Manga};

use crate::navigation::Route;

/// Manga detail with its chapters in reading order
#[derive(Debug, Clone, PartialEq)]
pub struct MangaView {
    pub manga: Manga,
    pub chapters: Vec<Chapter>,
}

impl MangaView {
    pub async fn load(api: &ApiClient, cancel: &CancelToken, manga_id: i64) -> ClientResult<Self> {
        let mut manga = cancel.run(api.manga().get(manga_id)).await?;
        let mut chapters = std::mem::take(&mut manga.chapters);
        chapters.sort_by_key(|c| c.chapter_number);
        Ok(Self { manga, chapters })
    }

    pub fn read_route(&self, index: usize) -> Option<Route> {
        self.chapters.get(index).map(|c| Route::Read(c.id))
    }

    /// First chapter, if any
    pub fn start_reading(&self) -> Option<Route> {
        self.read_route(0)
    }
}

impl fmt::Display for MangaView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.manga.title)?;
        if let Some(description) = self.manga.description.as_deref().filter(|d| !d.is_empty()) {
            writeln!(f, "{}", description)?;
        }
        writeln!(f)?;

        if self.chapters.is_empty() {
            return writeln!(f, "No chapters yet.");
        }

        writeln!(f, "Chapters")?;
        for chapter in &self.chapters {
            writeln!(f, "  [{}] {}", chapter.id, chapter.label())?;
        }
        Ok(())
    }
}
