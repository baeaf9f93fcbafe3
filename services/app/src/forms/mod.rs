//! Input forms
//!
//! Forms borrow themselves mutably while submitting, so a second submission
//! cannot start until the first has finished.

mod account;
mod login;
mod register;

pub use account::AccountSettings;
pub use login::LoginForm;
pub use register::RegisterForm;
