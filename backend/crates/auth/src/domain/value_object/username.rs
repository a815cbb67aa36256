//! Username Value Object
//!
//! The login handle. Input is NFKC-normalized and trimmed, then validated.
//! Uniqueness is case-insensitive: the lower-cased canonical form is what the
//! database indexes, the display form keeps the user's casing.
//!
//! ## Invariants
//! - 3 to 32 characters
//! - ASCII letters, digits, `_`, `.`, `-`
//! - starts with a letter or digit

use kernel::error::app_error::{AppError, AppResult};
use std::fmt;
use unicode_normalization::UnicodeNormalization;

pub const USERNAME_MIN_LENGTH: usize = 3;
pub const USERNAME_MAX_LENGTH: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username {
    display: String,
    canonical: String,
}

impl Username {
    pub fn new(raw: &str) -> AppResult<Self> {
        let normalized: String = raw.nfkc().collect();
        let display = normalized.trim().to_string();

        if display.is_empty() {
            return Err(AppError::bad_request("Username is required"));
        }

        let len = display.chars().count();
        if !(USERNAME_MIN_LENGTH..=USERNAME_MAX_LENGTH).contains(&len) {
            return Err(AppError::bad_request(format!(
                "Username must be {} to {} characters",
                USERNAME_MIN_LENGTH, USERNAME_MAX_LENGTH
            )));
        }

        if !display
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        {
            return Err(AppError::bad_request(
                "Username may only contain letters, digits, '_', '.' and '-'",
            ));
        }

        if !display.starts_with(|c: char| c.is_ascii_alphanumeric()) {
            return Err(AppError::bad_request(
                "Username must start with a letter or digit",
            ));
        }

        let canonical = display.to_ascii_lowercase();
        Ok(Self { display, canonical })
    }

    /// Rebuild from stored columns without re-validating
    pub fn from_stored(display: String, canonical: String) -> Self {
        Self { display, canonical }
    }

    pub fn as_str(&self) -> &str {
        &self.display
    }

    pub fn canonical(&self) -> &str {
        &self.canonical
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_usernames() {
        let name = Username::new("  Alice.Tan_01 ").unwrap();
        assert_eq!(name.as_str(), "Alice.Tan_01");
        assert_eq!(name.canonical(), "alice.tan_01");
    }

    #[test]
    fn test_fullwidth_input_is_normalized() {
        let name = Username::new("ｂｏｂ99").unwrap();
        assert_eq!(name.as_str(), "bob99");
    }

    #[test]
    fn test_length_bounds() {
        assert!(Username::new("ab").is_err());
        assert!(Username::new("abc").is_ok());
        assert!(Username::new(&"a".repeat(32)).is_ok());
        assert!(Username::new(&"a".repeat(33)).is_err());
    }

    #[test]
    fn test_rejected_characters() {
        assert!(Username::new("").is_err());
        assert!(Username::new("has space").is_err());
        assert!(Username::new("émile").is_err());
        assert!(Username::new("_leading").is_err());
        assert!(Username::new("a@b.c").is_err());
    }
}
