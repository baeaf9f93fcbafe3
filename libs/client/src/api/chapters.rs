//! Chapter page endpoints

use common::models::ChapterPages;

use crate::error::ClientResult;
use crate::http::HttpClient;

/// Last path segment of a page URL, which is the page filename
pub fn page_filename(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or_default()
}

/// `/api/chapters` endpoints
pub struct ChapterApi<'a> {
    http: &'a HttpClient,
}

impl<'a> ChapterApi<'a> {
    pub(crate) fn new(http: &'a HttpClient) -> Self {
        Self { http }
    }

    pub async fn pages(&self, chapter_id: i64) -> ClientResult<ChapterPages> {
        self.http
            .get(&format!("/api/chapters/{}/pages", chapter_id))
            .await
    }

    /// Absolute URL of a page image. The filename is sent as one path
    /// segment, so `#`, `?` and `%` in it are escaped.
    pub fn page_url(&self, chapter_id: i64, filename: &str) -> ClientResult<String> {
        let chapter = chapter_id.to_string();
        let url = self
            .http
            .segments_url(&["api", "chapters", &chapter, "pages", filename])?;
        Ok(url.into())
    }

    /// Page image bytes
    pub async fn page(&self, chapter_id: i64, filename: &str) -> ClientResult<Vec<u8>> {
        let url = self.page_url(chapter_id, filename)?;
        let builder = self.http.request(reqwest::Method::GET, &url)?;
        self.http.send_bytes(builder).await
    }
}
