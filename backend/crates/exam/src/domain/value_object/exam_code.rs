//! Exam Code Value Object
//!
//! Short code printed into certificate numbers, e.g. `CPA` in
//! `CPA-2025-I-000001`. Upper-case ASCII letters and digits only, so it can
//! never contain the `-` separator.

use kernel::error::app_error::{AppError, AppResult};
use std::fmt;

pub const MIN_LENGTH: usize = 2;
pub const MAX_LENGTH: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExamCode(String);

impl ExamCode {
    /// Trim and upper-case, then validate
    pub fn new(raw: &str) -> AppResult<Self> {
        let code = raw.trim().to_ascii_uppercase();

        if !(MIN_LENGTH..=MAX_LENGTH).contains(&code.len()) {
            return Err(AppError::bad_request(format!(
                "Exam code must be {MIN_LENGTH}-{MAX_LENGTH} characters"
            )));
        }
        if !code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()) {
            return Err(AppError::bad_request(
                "Exam code may contain only letters A-Z and digits",
            ));
        }

        Ok(Self(code))
    }

    pub fn from_stored(code: String) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExamCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
