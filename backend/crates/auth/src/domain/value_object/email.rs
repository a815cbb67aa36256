//! Email Value Object
//!
//! Lower-cased and format-checked; unique across users.

use kernel::error::app_error::{AppError, AppResult};
use std::fmt;

/// RFC 5321 path limit
const EMAIL_MAX_LENGTH: usize = 254;
const LOCAL_PART_MAX_LENGTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    pub fn new(email: &str) -> AppResult<Self> {
        let email = email.trim().to_lowercase();

        if email.is_empty() {
            return Err(AppError::bad_request("Email is required"));
        }

        if email.len() > EMAIL_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Email must be at most {} characters",
                EMAIL_MAX_LENGTH
            )));
        }

        if !Self::is_valid_format(&email) {
            return Err(AppError::bad_request("Invalid email format"));
        }

        Ok(Self(email))
    }

    pub fn from_stored(email: String) -> Self {
        Self(email)
    }

    fn is_valid_format(email: &str) -> bool {
        let Some((local, domain)) = email.split_once('@') else {
            return false;
        };

        if local.is_empty() || local.len() > LOCAL_PART_MAX_LENGTH || local.contains(char::is_whitespace) {
            return false;
        }

        if domain.contains('@') || !domain.contains('.') {
            return false;
        }

        domain.split('.').all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_email_is_lowercased() {
        let email = Email::new("  Candidate@Example.ORG ").unwrap();
        assert_eq!(email.as_str(), "candidate@example.org");
    }

    #[test]
    fn test_invalid_emails() {
        for bad in [
            "",
            "no-at-sign",
            "two@@example.com",
            "a@b@c.com",
            "@example.com",
            "user@localhost",
            "user@.example.com",
            "user@example..com",
            "user@-example.com",
            "us er@example.com",
        ] {
            assert!(Email::new(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_length_limit() {
        let long = format!("{}@example.com", "a".repeat(250));
        assert!(Email::new(&long).is_err());
    }
}
