//! Wire models mirrored from the manga API

pub mod chapter;
pub mod manga;
pub mod role;
pub mod site;
pub mod timestamp;
pub mod user;

// Re-export for convenience
pub use chapter::{Chapter, ChapterPages};
pub use manga::{Manga, MangaSummary, NewManga, UpdateManga};
pub use role::Role;
pub use site::{AdminStats, ConfigEntry, MessageResponse, RegistrationAllowed, RegistrationStatus};
pub use user::{LoginCredentials, NewUser, PasswordChange, PasswordReset, Token, UpdateUser, User};
