//! Input validation for API requests.
//!
//! Validators return `Result<(), String>` so handlers can aggregate them
//! into a single response with the `ValidationErrorBuilder` from the
//! `error` module.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating usernames (word characters, 3-32 chars)
    static ref USERNAME_REGEX: Regex = Regex::new(r"^[a-zA-Z0-9_]{3,32}$").unwrap();

    /// Regex for a coarse email shape check
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();

    /// Regex for validating hex colors (e.g., #1a1a1a)
    static ref HEX_COLOR_REGEX: Regex = Regex::new(r"^#[0-9a-fA-F]{6}$").unwrap();
}

/// Validate a movie rating: bounded 0-10 inclusive
pub fn validate_rating(rating: f64) -> Result<(), String> {
    if !rating.is_finite() {
        return Err("Rating must be a number".to_string());
    }
    if !(0.0..=10.0).contains(&rating) {
        return Err("Rating must be between 0 and 10".to_string());
    }
    Ok(())
}

/// Validate a release year
pub fn validate_release_year(year: i64) -> Result<(), String> {
    if !(1880..=2100).contains(&year) {
        return Err("Release year must be between 1880 and 2100".to_string());
    }
    Ok(())
}

/// Validate a required text field (title, description, genre)
pub fn validate_text(value: &str, name: &str, max_len: usize) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} is required", name));
    }
    if value.len() > max_len {
        return Err(format!("{} is too long (max {} characters)", name, max_len));
    }
    Ok(())
}

/// Validate an optional text field
pub fn validate_optional_text(
    value: &Option<String>,
    name: &str,
    max_len: usize,
) -> Result<(), String> {
    match value {
        Some(v) if v.len() > max_len => {
            Err(format!("{} is too long (max {} characters)", name, max_len))
        }
        _ => Ok(()),
    }
}

/// Validate an optional URL field (http/https only)
pub fn validate_url(value: &Option<String>, name: &str) -> Result<(), String> {
    match value {
        Some(url) if url.is_empty() => Ok(()),
        Some(url) => {
            if url.len() > 2048 {
                return Err(format!("{} is too long (max 2048 characters)", name));
            }
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(format!("{} must start with http:// or https://", name));
            }
            Ok(())
        }
        None => Ok(()),
    }
}

/// Validate a username
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("Username is required".to_string());
    }
    if !USERNAME_REGEX.is_match(username) {
        return Err(
            "Username must be 3-32 characters of letters, digits or underscores".to_string(),
        );
    }
    Ok(())
}

/// Validate an email address (shape only)
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }
    if email.len() > 254 || !EMAIL_REGEX.is_match(email) {
        return Err("Invalid email address".to_string());
    }
    Ok(())
}

/// Validate a password. Length is capped but no composition policy is
/// imposed on end-user accounts.
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }
    if password.len() > 128 {
        return Err("Password is too long (max 128 characters)".to_string());
    }
    Ok(())
}

/// Validate an optional duration in minutes
pub fn validate_duration(minutes: &Option<i64>) -> Result<(), String> {
    match minutes {
        Some(m) if !(1..=6000).contains(m) => {
            Err("Duration must be between 1 and 6000 minutes".to_string())
        }
        _ => Ok(()),
    }
}

/// Clamp a caller-supplied result limit into [1, 1000]
pub fn effective_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(1000).clamp(1, 1000)
}

/// Validate a hex color (settings branding fields)
pub fn validate_hex_color(value: &str, name: &str) -> Result<(), String> {
    if !HEX_COLOR_REGEX.is_match(value) {
        return Err(format!("{} must be a hex color like #1a1a1a", name));
    }
    Ok(())
}
