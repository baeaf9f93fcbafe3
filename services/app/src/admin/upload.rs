//! Manga upload
//!
//! Creating a manga is a saga of sequential API calls: create the manga
//! (unpublished), upload each chapter archive in order, then publish. If
//! any step after creation fails, the manga is deleted again so no
//! half-finished entry is left behind.

use std::path::Path;

use client::{ApiClient, ChapterUpload, ClientError};
use common::models::{Manga, UpdateManga};
use common::validation::validate_title;
use thiserror::Error;
use tracing::{error, info, warn};

/// Chapter archive chosen for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterFile {
    pub name: String,
    pub data: Vec<u8>,
}

impl ChapterFile {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    pub async fn read(path: &Path) -> std::io::Result<Self> {
        let data = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "chapter.zip".to_string());
        Ok(Self { name, data })
    }
}

/// One chapter row of the upload form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterDraft {
    pub number: i32,
    pub title: String,
    pub file: Option<ChapterFile>,
}

impl ChapterDraft {
    pub fn new(number: i32) -> Self {
        Self {
            number,
            title: String::new(),
            file: None,
        }
    }
}

/// Saga step that completed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SagaStep {
    CreatedManga { manga_id: i64 },
    UploadedChapter { chapter_number: i32, chapter_id: i64 },
    Published { manga_id: i64 },
}

/// Saga step that can fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SagaStage {
    CreateManga,
    UploadChapter(i32),
    Publish,
}

/// Outcome of the compensating delete
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rollback {
    /// Nothing was created
    NotNeeded,
    /// The partially created manga was deleted
    Completed,
    /// The partially created manga could not be deleted
    Failed(String),
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Please upload at least one chapter")]
    NoChapterFiles,

    #[error("{0}")]
    Invalid(String),

    #[error("{message}")]
    Failed {
        stage: SagaStage,
        message: String,
        completed: Vec<SagaStep>,
        rollback: Rollback,
        #[source]
        source: ClientError,
    },
}

/// Successful upload
#[derive(Debug, Clone, PartialEq)]
pub struct UploadReport {
    pub manga: Manga,
    pub steps: Vec<SagaStep>,
}

impl UploadReport {
    pub fn chapters_uploaded(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s, SagaStep::UploadedChapter { .. }))
            .count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadForm {
    pub title: String,
    pub description: String,
    chapters: Vec<ChapterDraft>,
    pub error: Option<String>,
    pub success: Option<String>,
}

impl Default for UploadForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            chapters: vec![ChapterDraft::new(1)],
            error: None,
            success: None,
        }
    }
}

impl UploadForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chapters(&self) -> &[ChapterDraft] {
        &self.chapters
    }

    pub fn chapter_mut(&mut self, index: usize) -> Option<&mut ChapterDraft> {
        self.chapters.get_mut(index)
    }

    /// Append a row numbered one past the current row count
    pub fn add_chapter(&mut self) -> &mut ChapterDraft {
        let number = self.chapters.len() as i32 + 1;
        self.chapters.push(ChapterDraft::new(number));
        let last = self.chapters.len() - 1;
        &mut self.chapters[last]
    }

    /// Remove a row. The last remaining row is never removed.
    pub fn remove_chapter(&mut self, index: usize) -> bool {
        if self.chapters.len() <= 1 || index >= self.chapters.len() {
            return false;
        }
        self.chapters.remove(index);
        true
    }

    fn reset(&mut self) {
        *self = Self {
            success: self.success.take(),
            ..Self::default()
        };
    }

    fn validate(&self) -> Result<(), UploadError> {
        if !self.chapters.iter().any(|c| c.file.is_some()) {
            return Err(UploadError::NoChapterFiles);
        }
        validate_title(&self.title).map_err(UploadError::Invalid)
    }

    /// Run the upload saga. Rows without a file are skipped. On success the
    /// form is reset.
    pub async fn submit(&mut self, api: &ApiClient) -> Result<UploadReport, UploadError> {
        self.error = None;
        self.success = None;

        let result = match self.validate() {
            Ok(()) => self.run_saga(api).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(report) => {
                self.success = Some(format!(
                    "Manga \"{}\" uploaded with {} chapter(s)",
                    report.manga.title,
                    report.chapters_uploaded()
                ));
                self.reset();
                Ok(report)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    async fn run_saga(&self, api: &ApiClient) -> Result<UploadReport, UploadError> {
        let manga_api = api.manga();
        let description = Some(self.description.trim()).filter(|d| !d.is_empty());

        let manga = manga_api
            .create(self.title.trim(), description)
            .await
            .map_err(|source| UploadError::Failed {
                stage: SagaStage::CreateManga,
                message: source.user_message("Upload failed"),
                completed: Vec::new(),
                rollback: Rollback::NotNeeded,
                source,
            })?;
        info!("Created manga {} ({})", manga.title, manga.id);

        let mut steps = vec![SagaStep::CreatedManga { manga_id: manga.id }];

        for draft in &self.chapters {
            let Some(file) = &draft.file else {
                continue;
            };

            let upload = ChapterUpload {
                chapter_number: draft.number,
                title: Some(draft.title.trim().to_string()).filter(|t| !t.is_empty()),
                file_name: file.name.clone(),
                data: file.data.clone(),
            };

            match manga_api.upload_chapter(manga.id, upload).await {
                Ok(chapter) => steps.push(SagaStep::UploadedChapter {
                    chapter_number: chapter.chapter_number,
                    chapter_id: chapter.id,
                }),
                Err(source) => {
                    let stage = SagaStage::UploadChapter(draft.number);
                    return Err(compensate(api, manga.id, stage, steps, source).await);
                }
            }
        }

        let manga = match manga_api.update(manga.id, &UpdateManga::publish()).await {
            Ok(manga) => manga,
            Err(source) => {
                return Err(compensate(api, manga.id, SagaStage::Publish, steps, source).await);
            }
        };
        steps.push(SagaStep::Published { manga_id: manga.id });
        info!("Published manga {}", manga.id);

        Ok(UploadReport { manga, steps })
    }
}

/// Delete the partially created manga and describe the failure
async fn compensate(
    api: &ApiClient,
    manga_id: i64,
    stage: SagaStage,
    completed: Vec<SagaStep>,
    source: ClientError,
) -> UploadError {
    warn!(
        "Upload failed at {:?}: {}, rolling back manga {}",
        stage, source, manga_id
    );

    let rollback = match api.manga().delete(manga_id).await {
        Ok(_) => Rollback::Completed,
        Err(e) => {
            error!("Failed to roll back manga {}: {}", manga_id, e);
            Rollback::Failed(e.to_string())
        }
    };

    UploadError::Failed {
        stage,
        message: source.user_message("Upload failed"),
        completed,
        rollback,
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_one_row() {
        let form = UploadForm::new();
        assert_eq!(form.chapters().len(), 1);
        assert_eq!(form.chapters()[0].number, 1);
    }

    #[test]
    fn added_rows_are_numbered_by_count() {
        let mut form = UploadForm::new();
        form.add_chapter();
        form.add_chapter();
        assert_eq!(
            form.chapters().iter().map(|c| c.number).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );

        assert!(form.remove_chapter(0));
        assert_eq!(form.add_chapter().number, 3);
    }

    #[test]
    fn last_row_cannot_be_removed() {
        let mut form = UploadForm::new();
        assert!(!form.remove_chapter(0));
        form.add_chapter();
        assert!(!form.remove_chapter(5));
        assert!(form.remove_chapter(1));
        assert!(!form.remove_chapter(0));
        assert_eq!(form.chapters().len(), 1);
    }

    #[test]
    fn missing_files_rejected_before_title() {
        let form = UploadForm::new();
        assert!(matches!(form.validate(), Err(UploadError::NoChapterFiles)));
    }

    #[test]
    fn blank_title_rejected() {
        let mut form = UploadForm::new();
        form.title = "   ".to_string();
        form.chapter_mut(0).unwrap().file = Some(ChapterFile::new("c1.zip", vec![1]));
        match form.validate() {
            Err(UploadError::Invalid(message)) => assert_eq!(message, "Title is required"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn report_counts_chapters() {
        let report = UploadReport {
            manga: Manga {
                id: 1,
                title: "T".to_string(),
                description: None,
                cover_image: None,
                is_published: true,
                created_at: chrono::Utc::now(),
                uploaded_by: None,
                chapters: Vec::new(),
            },
            steps: vec![
                SagaStep::CreatedManga { manga_id: 1 },
                SagaStep::UploadedChapter { chapter_number: 1, chapter_id: 4 },
                SagaStep::UploadedChapter { chapter_number: 2, chapter_id: 5 },
                SagaStep::Published { manga_id: 1 },
            ],
        };
        assert_eq!(report.chapters_uploaded(), 2);
    }
}
