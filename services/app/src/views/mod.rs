//! Read-only screens

mod library;
mod manga;
mod read;

pub use library::LibraryView;
pub use manga::MangaView;
pub use read::ReadView;
