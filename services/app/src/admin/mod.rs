//! Admin screens

mod manga;
mod settings;
mod upload;
mod users;

pub use manga::MangaEditor;
pub use settings::{Notice, SiteSettings};
pub use upload::{
    ChapterDraft, ChapterFile, Rollback, SagaStage, SagaStep, UploadError, UploadForm,
    UploadReport,
};
pub use users::{CreateUserForm, UserAdmin};

use std::fmt;

use client::{ApiClient, CancelToken, ClientResult};
use common::models::AdminStats;

/// Admin landing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard {
    pub stats: AdminStats,
}

impl Dashboard {
    pub async fn load(api: &ApiClient, cancel: &CancelToken) -> ClientResult<Self> {
        let stats = cancel.run(api.admin().stats()).await?;
        Ok(Self { stats })
    }
}

impl fmt::Display for Dashboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Admin dashboard")?;
        writeln!(f, "  Users:           {}", self.stats.total_users)?;
        writeln!(f, "  Manga:           {}", self.stats.total_manga)?;
        writeln!(f, "  Published manga: {}", self.stats.published_manga)?;
        writeln!(f, "  Chapters:        {}", self.stats.total_chapters)
    }
}
