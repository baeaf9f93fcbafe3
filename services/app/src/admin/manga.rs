//! Editing and deleting existing manga

use client::{ApiClient, ClientError, ClientResult};
use common::models::{Manga, UpdateManga};
use common::validation::validate_title;
use tracing::info;

/// Edit form over one manga. Only fields that differ from the loaded
/// record are sent.
#[derive(Debug, Clone, PartialEq)]
pub struct MangaEditor {
    original: Manga,
    pub title: String,
    pub description: String,
    pub cover_image: String,
    pub is_published: bool,
    pub error: Option<String>,
    confirm_delete: bool,
}

impl MangaEditor {
    pub fn new(manga: Manga) -> Self {
        Self {
            title: manga.title.clone(),
            description: manga.description.clone().unwrap_or_default(),
            cover_image: manga.cover_image.clone().unwrap_or_default(),
            is_published: manga.is_published,
            original: manga,
            error: None,
            confirm_delete: false,
        }
    }

    pub async fn load(api: &ApiClient, manga_id: i64) -> ClientResult<Self> {
        Ok(Self::new(api.manga().get(manga_id).await?))
    }

    pub fn manga(&self) -> &Manga {
        &self.original
    }

    /// Fields changed since loading
    pub fn changes(&self) -> UpdateManga {
        fn changed(new: &str, old: Option<&str>) -> Option<String> {
            (new != old.unwrap_or_default()).then(|| new.to_string())
        }

        UpdateManga {
            title: (self.title.trim() != self.original.title)
                .then(|| self.title.trim().to_string()),
            description: changed(&self.description, self.original.description.as_deref()),
            cover_image: changed(&self.cover_image, self.original.cover_image.as_deref()),
            is_published: (self.is_published != self.original.is_published)
                .then_some(self.is_published),
        }
    }

    pub async fn save(&mut self, api: &ApiClient) -> ClientResult<()> {
        self.error = None;

        if let Err(message) = validate_title(&self.title) {
            self.error = Some(message.clone());
            return Err(ClientError::Validation(message));
        }

        let update = self.changes();
        if update == UpdateManga::default() {
            return Ok(());
        }

        match api.manga().update(self.original.id, &update).await {
            Ok(manga) => {
                info!("Updated manga {}", manga.id);
                *self = Self::new(manga);
                Ok(())
            }
            Err(e) => {
                self.error = Some(e.user_message("Failed to update manga"));
                Err(e)
            }
        }
    }

    pub fn request_delete(&mut self) {
        self.confirm_delete = true;
    }

    pub fn cancel_delete(&mut self) {
        self.confirm_delete = false;
    }

    /// Delete the manga and its chapters. Requires [`request_delete`] first.
    ///
    /// [`request_delete`]: MangaEditor::request_delete
    pub async fn delete(&mut self, api: &ApiClient) -> ClientResult<bool> {
        self.error = None;
        if !self.confirm_delete {
            return Ok(false);
        }

        match api.manga().delete(self.original.id).await {
            Ok(_) => {
                info!("Deleted manga {}", self.original.id);
                self.confirm_delete = false;
                Ok(true)
            }
            Err(e) => {
                self.error = Some(e.user_message("Failed to delete manga"));
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn manga() -> Manga {
        Manga {
            id: 5,
            title: "Tides".to_string(),
            description: Some("Sea stories".to_string()),
            cover_image: None,
            is_published: true,
            created_at: Utc::now(),
            uploaded_by: Some(1),
            chapters: Vec::new(),
        }
    }

    #[test]
    fn untouched_editor_has_no_changes() {
        let editor = MangaEditor::new(manga());
        assert_eq!(editor.changes(), UpdateManga::default());
    }

    #[test]
    fn only_edited_fields_are_sent() {
        let mut editor = MangaEditor::new(manga());
        editor.title = " Low Tides ".to_string();
        editor.is_published = false;

        let update = editor.changes();
        assert_eq!(update.title.as_deref(), Some("Low Tides"));
        assert_eq!(update.is_published, Some(false));
        assert_eq!(update.description, None);
        assert_eq!(update.cover_image, None);
    }

    #[test]
    fn clearing_description_sends_empty_string() {
        let mut editor = MangaEditor::new(manga());
        editor.description.clear();
        assert_eq!(editor.changes().description.as_deref(), Some(""));
    }
}
