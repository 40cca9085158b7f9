//! Field validation and normalization for stored documents.

use crate::error::{BlogError, Result};

/// Maximum bytes for an article name.
pub const MAX_NAME_BYTES: usize = 128;

/// Maximum bytes for an article title.
pub const MAX_TITLE_BYTES: usize = 256;

/// Maximum bytes for a comment author or user display name.
pub const MAX_USERNAME_BYTES: usize = 64;

/// Maximum bytes for a comment body.
pub const MAX_COMMENT_BYTES: usize = 4096;

/// Maximum bytes for an email address.
pub const MAX_EMAIL_BYTES: usize = 254;

/// Key used to look an article up; does not validate.
pub fn lookup_name(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

/// Normalize and validate an article name.
///
/// - Trims whitespace and converts to lowercase
/// - Validates character set (alphanumeric, dash, underscore)
/// - Enforces length limits
pub fn normalize_article_name(name: &str) -> Result<String> {
    let normalized = lookup_name(name);
    if normalized.is_empty() {
        return Err(BlogError::Validation(
            "Article name cannot be empty".to_string(),
        ));
    }
    if normalized.len() > MAX_NAME_BYTES {
        return Err(BlogError::Validation(format!(
            "Article name too long (max {} bytes)",
            MAX_NAME_BYTES
        )));
    }
    if !normalized
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(BlogError::Validation(
            "Article name contains invalid characters".to_string(),
        ));
    }
    Ok(normalized)
}

/// Trim a free-text field and check it is non-empty and within `max` bytes.
pub fn required_text(field: &str, value: &str, max: usize) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(BlogError::Validation(format!("{} cannot be empty", field)));
    }
    if trimmed.len() > max {
        return Err(BlogError::Validation(format!(
            "{} too long (max {} bytes)",
            field, max
        )));
    }
    Ok(trimmed.to_string())
}

/// Normalize and validate an email address.
///
/// Only the shape is checked: one `@` with something on both sides.
pub fn normalize_email(email: &str) -> Result<String> {
    let normalized = email.trim().to_lowercase();
    if normalized.len() > MAX_EMAIL_BYTES {
        return Err(BlogError::Validation(format!(
            "Email too long (max {} bytes)",
            MAX_EMAIL_BYTES
        )));
    }
    match normalized.split_once('@') {
        Some((local, domain))
            if !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !normalized.chars().any(char::is_whitespace) =>
        {
            Ok(normalized)
        }
        _ => Err(BlogError::Validation("Email address is invalid".to_string())),
    }
}
