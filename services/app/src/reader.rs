//! Chapter reader state
//!
//! Two modes: webtoon shows every page in one vertical strip, manga shows
//! a single page at a time read right to left. The current page survives
//! mode switches.

use std::fmt;
use std::str::FromStr;

use client::page_filename;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadingMode {
    #[default]
    Webtoon,
    Manga,
}

impl ReadingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingMode::Webtoon => "webtoon",
            ReadingMode::Manga => "manga",
        }
    }
}

impl fmt::Display for ReadingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReadingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "webtoon" => Ok(ReadingMode::Webtoon),
            "manga" => Ok(ReadingMode::Manga),
            other => Err(format!("Unknown reading mode: {}", other)),
        }
    }
}

/// Keys the reader reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Space,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scroll {
    Forward,
    Back,
}

/// What the view should do after an input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderAction {
    Nothing,
    /// Show the page at this index
    ShowPage(usize),
    /// Scroll the strip by one viewport
    Scroll(Scroll),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reader {
    chapter_id: i64,
    pages: Vec<String>,
    current_page: usize,
    mode: ReadingMode,
}

impl Reader {
    pub fn new(chapter_id: i64, pages: Vec<String>) -> Self {
        Self {
            chapter_id,
            pages,
            current_page: 0,
            mode: ReadingMode::default(),
        }
    }

    pub fn chapter_id(&self) -> i64 {
        self.chapter_id
    }

    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn mode(&self) -> ReadingMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ReadingMode) {
        self.mode = mode;
    }

    pub fn toggle_mode(&mut self) -> ReadingMode {
        self.mode = match self.mode {
            ReadingMode::Webtoon => ReadingMode::Manga,
            ReadingMode::Manga => ReadingMode::Webtoon,
        };
        self.mode
    }

    pub fn can_advance(&self) -> bool {
        self.current_page + 1 < self.pages.len()
    }

    pub fn can_retreat(&self) -> bool {
        self.current_page > 0
    }

    /// Move one page forward. Returns false at the last page.
    pub fn advance(&mut self) -> bool {
        if !self.can_advance() {
            return false;
        }
        self.current_page += 1;
        true
    }

    /// Move one page back. Returns false at the first page.
    pub fn retreat(&mut self) -> bool {
        if !self.can_retreat() {
            return false;
        }
        self.current_page -= 1;
        true
    }

    /// Jump to `index`, clamped to the page range
    pub fn go_to(&mut self, index: usize) {
        self.current_page = index.min(self.pages.len().saturating_sub(1));
    }

    fn step(&mut self, forward: bool) -> ReaderAction {
        let moved = if forward { self.advance() } else { self.retreat() };
        if moved {
            ReaderAction::ShowPage(self.current_page)
        } else {
            ReaderAction::Nothing
        }
    }

    /// Keyboard navigation. In manga mode Right and Space advance and Left
    /// goes back; in webtoon mode Down, Up and Space scroll by a viewport.
    pub fn handle_key(&mut self, key: Key) -> ReaderAction {
        match (self.mode, key) {
            (ReadingMode::Manga, Key::ArrowRight | Key::Space) => self.step(true),
            (ReadingMode::Manga, Key::ArrowLeft) => self.step(false),
            (ReadingMode::Webtoon, Key::ArrowDown | Key::Space) => {
                ReaderAction::Scroll(Scroll::Forward)
            }
            (ReadingMode::Webtoon, Key::ArrowUp) => ReaderAction::Scroll(Scroll::Back),
            _ => ReaderAction::Nothing,
        }
    }

    /// Click on the page image at horizontal offset `x` of `width`. Only
    /// manga mode reacts: the right half goes back, the left half advances.
    pub fn click(&mut self, x: f64, width: f64) -> ReaderAction {
        if self.mode != ReadingMode::Manga || width <= 0.0 {
            return ReaderAction::Nothing;
        }
        self.step(x <= width / 2.0)
    }

    /// Indices rendered in the current mode
    pub fn visible_pages(&self) -> Vec<usize> {
        match self.mode {
            ReadingMode::Webtoon => (0..self.pages.len()).collect(),
            ReadingMode::Manga if self.pages.is_empty() => Vec::new(),
            ReadingMode::Manga => vec![self.current_page],
        }
    }

    pub fn page_url(&self, index: usize) -> Option<&str> {
        self.pages.get(index).map(String::as_str)
    }

    pub fn page_filename(&self, index: usize) -> Option<&str> {
        self.page_url(index).map(page_filename)
    }

    /// `"3 / 12"`, one-based
    pub fn position(&self) -> String {
        if self.pages.is_empty() {
            return "0 / 0".to_string();
        }
        format!("{} / {}", self.current_page + 1, self.pages.len())
    }
}
