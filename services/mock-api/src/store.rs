//! In-memory records backing the mock API

use std::collections::{BTreeMap, HashSet};

use chrono::Utc;
use common::models::{AdminStats, Chapter, Manga, MangaSummary, Role, UpdateManga, User};

use crate::error::{MockError, MockResult};

/// Config key holding the public registration switch
pub const REGISTRATION_KEY: &str = "registration_enabled";

#[derive(Debug, Clone)]
struct UserRecord {
    user: User,
    password: String,
}

#[derive(Debug, Clone)]
struct ChapterRecord {
    chapter: Chapter,
    pages: Vec<String>,
}

/// Process-local data store
#[derive(Debug, Default)]
pub struct Store {
    last_id: i64,
    users: BTreeMap<i64, UserRecord>,
    manga: BTreeMap<i64, Manga>,
    chapters: BTreeMap<i64, ChapterRecord>,
    config: BTreeMap<String, String>,
    requests: Vec<String>,
    failing_uploads: HashSet<i32>,
    failing_user_list: bool,
}

impl Store {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    pub fn record_request(&mut self, line: String) {
        self.requests.push(line);
    }

    /// `METHOD /path` of every request received so far
    pub fn requests(&self) -> &[String] {
        &self.requests
    }

    pub fn fail_uploads_of(&mut self, chapter_number: i32) {
        self.failing_uploads.insert(chapter_number);
    }

    pub fn fail_user_list(&mut self) {
        self.failing_user_list = true;
    }

    // Users

    pub fn create_user(
        &mut self,
        username: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> MockResult<User> {
        if self.users.values().any(|r| r.user.username == username) {
            return Err(MockError::BadRequest("Username already registered".to_string()));
        }
        if self.users.values().any(|r| r.user.email == email) {
            return Err(MockError::BadRequest("Email already registered".to_string()));
        }

        let user = User {
            id: self.next_id(),
            username: username.to_string(),
            email: email.to_string(),
            role,
            is_active: true,
            created_at: Utc::now(),
        };
        self.users.insert(
            user.id,
            UserRecord {
                user: user.clone(),
                password: password.to_string(),
            },
        );
        Ok(user)
    }

    pub fn users(&self) -> MockResult<Vec<User>> {
        if self.failing_user_list {
            return Err(MockError::Internal("Failed to list users".to_string()));
        }
        Ok(self.users.values().map(|r| r.user.clone()).collect())
    }

    pub fn user(&self, id: i64) -> MockResult<User> {
        self.users
            .get(&id)
            .map(|r| r.user.clone())
            .ok_or_else(|| MockError::not_found("User"))
    }

    pub fn user_by_name(&self, username: &str) -> Option<User> {
        self.users
            .values()
            .find(|r| r.user.username == username)
            .map(|r| r.user.clone())
    }

    pub fn check_password(&self, username: &str, password: &str) -> Option<User> {
        self.users
            .values()
            .find(|r| r.user.username == username && r.password == password)
            .map(|r| r.user.clone())
    }

    pub fn update_user(
        &mut self,
        id: i64,
        role: Option<Role>,
        is_active: Option<bool>,
    ) -> MockResult<User> {
        let record = self
            .users
            .get_mut(&id)
            .ok_or_else(|| MockError::not_found("User"))?;
        if let Some(role) = role {
            record.user.role = role;
        }
        if let Some(is_active) = is_active {
            record.user.is_active = is_active;
        }
        Ok(record.user.clone())
    }

    pub fn set_password(&mut self, id: i64, password: &str) -> MockResult<()> {
        let record = self
            .users
            .get_mut(&id)
            .ok_or_else(|| MockError::not_found("User"))?;
        record.password = password.to_string();
        Ok(())
    }

    pub fn delete_user(&mut self, id: i64) -> MockResult<()> {
        self.users
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| MockError::not_found("User"))
    }

    // Manga

    pub fn create_manga(
        &mut self,
        title: &str,
        description: Option<String>,
        uploaded_by: Option<i64>,
    ) -> Manga {
        let manga = Manga {
            id: self.next_id(),
            title: title.to_string(),
            description,
            cover_image: None,
            is_published: false,
            created_at: Utc::now(),
            uploaded_by,
            chapters: Vec::new(),
        };
        self.manga.insert(manga.id, manga.clone());
        manga
    }

    pub fn published_manga(&self) -> Vec<MangaSummary> {
        self.manga
            .values()
            .filter(|m| m.is_published)
            .map(|m| MangaSummary {
                id: m.id,
                title: m.title.clone(),
                description: m.description.clone(),
                cover_image: m.cover_image.clone(),
                created_at: m.created_at,
            })
            .collect()
    }

    /// Manga record without its chapters, published or not
    pub fn manga(&self, id: i64) -> MockResult<Manga> {
        self.manga
            .get(&id)
            .cloned()
            .ok_or_else(|| MockError::not_found("Manga"))
    }

    /// Manga with chapters populated
    pub fn manga_detail(&self, id: i64) -> MockResult<Manga> {
        let mut manga = self.manga(id)?;
        manga.chapters = self.chapters_of(id);
        Ok(manga)
    }

    pub fn manga_ids(&self) -> Vec<i64> {
        self.manga.keys().copied().collect()
    }

    pub fn update_manga(&mut self, id: i64, update: UpdateManga) -> MockResult<Manga> {
        let manga = self
            .manga
            .get_mut(&id)
            .ok_or_else(|| MockError::not_found("Manga"))?;
        if let Some(title) = update.title {
            manga.title = title;
        }
        if let Some(description) = update.description {
            manga.description = Some(description);
        }
        if let Some(cover_image) = update.cover_image {
            manga.cover_image = Some(cover_image);
        }
        if let Some(is_published) = update.is_published {
            manga.is_published = is_published;
        }
        self.manga_detail(id)
    }

    pub fn delete_manga(&mut self, id: i64) -> MockResult<()> {
        self.manga
            .remove(&id)
            .ok_or_else(|| MockError::not_found("Manga"))?;
        self.chapters.retain(|_, r| r.chapter.manga_id != id);
        Ok(())
    }

    // Chapters

    pub fn chapters_of(&self, manga_id: i64) -> Vec<Chapter> {
        let mut chapters: Vec<Chapter> = self
            .chapters
            .values()
            .filter(|r| r.chapter.manga_id == manga_id)
            .map(|r| r.chapter.clone())
            .collect();
        chapters.sort_by_key(|c| c.chapter_number);
        chapters
    }

    /// Insert a chapter, or replace the one with the same number
    pub fn upsert_chapter(
        &mut self,
        manga_id: i64,
        chapter_number: i32,
        title: Option<String>,
        pages: Vec<String>,
    ) -> MockResult<Chapter> {
        if self.failing_uploads.contains(&chapter_number) {
            return Err(MockError::Internal("Failed to store chapter".to_string()));
        }
        self.manga(manga_id)?;

        if let Some(existing) = self
            .chapters
            .values_mut()
            .find(|r| r.chapter.manga_id == manga_id && r.chapter.chapter_number == chapter_number)
        {
            existing.chapter.title = title;
            existing.pages = pages;
            return Ok(existing.chapter.clone());
        }

        let chapter = Chapter {
            id: self.next_id(),
            manga_id,
            chapter_number,
            title,
            created_at: Utc::now(),
        };
        self.chapters.insert(
            chapter.id,
            ChapterRecord {
                chapter: chapter.clone(),
                pages,
            },
        );
        Ok(chapter)
    }

    /// Page filenames of a chapter in natural order
    pub fn pages(&self, chapter_id: i64) -> MockResult<Vec<String>> {
        let record = self
            .chapters
            .get(&chapter_id)
            .ok_or_else(|| MockError::not_found("Chapter"))?;
        let mut pages = record.pages.clone();
        pages.sort_by_key(|p| natural_key(p));
        Ok(pages)
    }

    // Site config

    pub fn config(&self) -> BTreeMap<String, String> {
        self.config.clone()
    }

    pub fn set_config(&mut self, key: &str, value: &str) {
        self.config.insert(key.to_string(), value.to_string());
    }

    pub fn registration_enabled(&self) -> bool {
        self.config.get(REGISTRATION_KEY).map(String::as_str) == Some("true")
    }

    pub fn stats(&self) -> AdminStats {
        AdminStats {
            total_users: self.users.len() as u64,
            total_manga: self.manga.len() as u64,
            published_manga: self.manga.values().filter(|m| m.is_published).count() as u64,
            total_chapters: self.chapters.len() as u64,
        }
    }
}

/// Sort key that orders embedded numbers numerically: names with digits come
/// first, ordered by their numbers, then the rest by lowercase name.
pub fn natural_key(name: &str) -> (u8, Vec<u64>, String) {
    let mut numbers = Vec::new();
    let mut current = String::new();
    for c in name.chars() {
        if c.is_ascii_digit() {
            current.push(c);
        } else if !current.is_empty() {
            numbers.push(current.parse().unwrap_or(u64::MAX));
            current.clear();
        }
    }
    if !current.is_empty() {
        numbers.push(current.parse().unwrap_or(u64::MAX));
    }

    let rank = if numbers.is_empty() { 1 } else { 0 };
    (rank, numbers, name.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_sort_naturally() {
        let mut names = vec!["10.jpg", "cover.png", "2.jpg", "1.jpg"];
        names.sort_by_key(|n| natural_key(n));
        assert_eq!(names, vec!["1.jpg", "2.jpg", "10.jpg", "cover.png"]);
    }

    #[test]
    fn deleting_manga_removes_its_chapters() {
        let mut store = Store::default();
        let manga = store.create_manga("Blame", None, None);
        store
            .upsert_chapter(manga.id, 1, None, vec!["1.jpg".to_string()])
            .unwrap();

        store.delete_manga(manga.id).unwrap();
        assert_eq!(store.stats().total_chapters, 0);
    }

    #[test]
    fn reupload_replaces_chapter() {
        let mut store = Store::default();
        let manga = store.create_manga("Blame", None, None);
        let first = store.upsert_chapter(manga.id, 1, None, vec![]).unwrap();
        let second = store
            .upsert_chapter(manga.id, 1, Some("Again".to_string()), vec![])
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(store.chapters_of(manga.id).len(), 1);
    }
}
