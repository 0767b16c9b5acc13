use lazy_static::lazy_static;
use regex::Regex;

use crate::error::AppError;

pub const NAME_MAX: usize = 40;
pub const EMAIL_MAX: usize = 40;
pub const TITLE_MAX: usize = 50;
pub const DESCRIPTION_MAX: usize = 400;

pub fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex =
            Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex compiles");
    }
    EMAIL_RE.is_match(email)
}

/// Trims and lower-cases, then checks shape and length.
pub fn normalize_email(raw: &str) -> Result<String, AppError> {
    let email = raw.trim().to_lowercase();
    if !is_valid_email(&email) {
        return Err(AppError::Validation("Invalid email".into()));
    }
    if email.chars().count() > EMAIL_MAX {
        return Err(AppError::Validation(format!(
            "email must be at most {EMAIL_MAX} characters"
        )));
    }
    Ok(email)
}

/// Trimmed, non-empty, at most `max` characters.
pub fn required_text(field: &str, raw: &str, max: usize) -> Result<String, AppError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{field} must not be empty")));
    }
    bounded_text(field, value, max)
}

pub fn bounded_text(field: &str, value: &str, max: usize) -> Result<String, AppError> {
    if value.chars().count() > max {
        return Err(AppError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(value.to_string())
}

pub fn required_password(raw: &str) -> Result<&str, AppError> {
    if raw.is_empty() {
        return Err(AppError::Validation("password must not be empty".into()));
    }
    Ok(raw)
}
