use std::fmt;
use std::path::{Component, Path, PathBuf};

use client::{ApiClient, CancelToken, ClientResult};
use tracing::{info, warn};

use crate::reader::{ReadingMode, Reader};

/// `filename` if it names a plain file directly inside the target directory
fn local_name(filename: &str) -> Option<&str> {
    let mut components = Path::new(filename).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Some(filename),
        _ => None,
    }
}

/// A chapter opened in the reader
#[derive(Debug, Clone, PartialEq)]
pub struct ReadView {
    pub reader: Reader,
}

impl ReadView {
    pub async fn load(
        api: &ApiClient,
        cancel: &CancelToken,
        chapter_id: i64,
    ) -> ClientResult<Self> {
        let pages = cancel.run(api.chapters().pages(chapter_id)).await?;
        Ok(Self {
            reader: Reader::new(chapter_id, pages.pages),
        })
    }

    /// Fetch every page image into `dir`, named after the page filename
    pub async fn download(
        &self,
        api: &ApiClient,
        cancel: &CancelToken,
        dir: &Path,
    ) -> anyhow::Result<Vec<PathBuf>> {
        tokio::fs::create_dir_all(dir).await?;

        let chapter_id = self.reader.chapter_id();
        let mut written = Vec::with_capacity(self.reader.page_count());
        for index in 0..self.reader.page_count() {
            let Some(page) = self.reader.page_filename(index) else {
                continue;
            };
            let Some(filename) = local_name(page) else {
                warn!("Skipping page {} with unusable name {:?}", index + 1, page);
                continue;
            };
            let bytes = cancel.run(api.chapters().page(chapter_id, filename)).await?;
            let path = dir.join(filename);
            tokio::fs::write(&path, bytes).await?;
            written.push(path);
        }

        info!("Saved {} pages of chapter {}", written.len(), chapter_id);
        Ok(written)
    }
}

impl fmt::Display for ReadView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reader = &self.reader;
        if reader.is_empty() {
            return writeln!(f, "This chapter has no pages.");
        }

        writeln!(f, "Chapter {} ({} mode)", reader.chapter_id(), reader.mode())?;
        for index in reader.visible_pages() {
            if let Some(url) = reader.page_url(index) {
                writeln!(f, "  {}", url)?;
            }
        }
        if reader.mode() == ReadingMode::Manga {
            writeln!(f, "Page {}", reader.position())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_plain_names_are_written() {
        assert_eq!(local_name("001.jpg"), Some("001.jpg"));
        assert_eq!(local_name(".hidden.png"), Some(".hidden.png"));
        for name in ["", ".", "..", "/etc/passwd"] {
            assert_eq!(local_name(name), None, "{name:?} accepted");
        }
    }
}
