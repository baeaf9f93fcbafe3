//! Form input checks
//!
//! Shared by the registration, account and admin forms. Each check returns
//! the message shown next to the offending field.

use std::sync::OnceLock;

use regex::Regex;

/// Minimum password length accepted by the account forms
pub const MIN_PASSWORD_LEN: usize = 6;
const MAX_PASSWORD_LEN: usize = 128;
const MAX_EMAIL_LEN: usize = 254;

fn pattern(cell: &'static OnceLock<Regex>, source: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(source).expect("built-in pattern compiles"))
}

fn required(value: &str, field: &str) -> Result<(), String> {
    if value.is_empty() {
        Err(format!("{} is required", field))
    } else {
        Ok(())
    }
}

/// Usernames are free-form; the API decides what it accepts
pub fn validate_username(username: &str) -> Result<(), String> {
    required(username, "Username")
}

pub fn validate_email(email: &str) -> Result<(), String> {
    static EMAIL: OnceLock<Regex> = OnceLock::new();

    required(email, "Email")?;
    if email.len() > MAX_EMAIL_LEN {
        return Err(format!("Email must be at most {} characters long", MAX_EMAIL_LEN));
    }
    if !pattern(&EMAIL, r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").is_match(email) {
        return Err("Invalid email format".to_string());
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), String> {
    required(password, "Password")?;
    match password.chars().count() {
        n if n < MIN_PASSWORD_LEN => Err(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )),
        n if n > MAX_PASSWORD_LEN => Err(format!(
            "Password must be at most {} characters long",
            MAX_PASSWORD_LEN
        )),
        _ => Ok(()),
    }
}

/// New password against its confirmation. A mismatch is reported before
/// any length problem.
pub fn validate_new_password(password: &str, confirmation: &str) -> Result<(), String> {
    if password != confirmation {
        return Err("New passwords do not match".to_string());
    }
    validate_password(password)
}

/// Manga titles must contain something other than whitespace
pub fn validate_title(title: &str) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("Title is required".to_string());
    }
    Ok(())
}
