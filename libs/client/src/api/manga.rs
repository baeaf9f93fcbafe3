//! Manga endpoints

use common::models::{Chapter, Manga, MangaSummary, MessageResponse, NewManga, UpdateManga};
use reqwest::multipart::{Form, Part};
use tracing::info;

use crate::error::ClientResult;
use crate::http::HttpClient;

/// A chapter archive to upload
#[derive(Debug, Clone, PartialEq)]
pub struct ChapterUpload {
    pub chapter_number: i32,
    pub title: Option<String>,
    pub file_name: String,
    pub data: Vec<u8>,
}

impl ChapterUpload {
    fn into_form(self) -> ClientResult<Form> {
        let file = Part::bytes(self.data)
            .file_name(self.file_name)
            .mime_str("application/zip")?;

        let mut form = Form::new().text("chapter_number", self.chapter_number.to_string());
        if let Some(title) = self.title.filter(|t| !t.is_empty()) {
            form = form.text("chapter_title", title);
        }
        Ok(form.part("file", file))
    }
}

/// `/api/manga` endpoints
pub struct MangaApi<'a> {
    http: &'a HttpClient,
}

impl<'a> MangaApi<'a> {
    pub(crate) fn new(http: &'a HttpClient) -> Self {
        Self { http }
    }

    /// Published manga
    pub async fn list(&self) -> ClientResult<Vec<MangaSummary>> {
        self.http.get("/api/manga").await
    }

    /// Manga with its chapters
    pub async fn get(&self, id: i64) -> ClientResult<Manga> {
        self.http.get(&format!("/api/manga/{}", id)).await
    }

    pub async fn create(&self, title: &str, description: Option<&str>) -> ClientResult<Manga> {
        info!("Creating manga: {}", title);
        let payload = NewManga {
            title: title.to_string(),
            description: description.map(str::to_string),
        };
        self.http.post("/api/manga", &payload).await
    }

    pub async fn update(&self, id: i64, update: &UpdateManga) -> ClientResult<Manga> {
        self.http.put(&format!("/api/manga/{}", id), update).await
    }

    pub async fn delete(&self, id: i64) -> ClientResult<MessageResponse> {
        info!("Deleting manga {}", id);
        self.http.delete(&format!("/api/manga/{}", id)).await
    }

    pub async fn chapters(&self, id: i64) -> ClientResult<Vec<Chapter>> {
        self.http.get(&format!("/api/manga/{}/chapters", id)).await
    }

    /// Upload one chapter archive (multipart)
    pub async fn upload_chapter(&self, manga_id: i64, upload: ChapterUpload) -> ClientResult<Chapter> {
        info!(
            "Uploading chapter {} of manga {} ({} bytes)",
            upload.chapter_number,
            manga_id,
            upload.data.len()
        );
        let form = upload.into_form()?;
        self.http
            .post_multipart(&format!("/api/manga/{}/upload", manga_id), form)
            .await
    }
}
