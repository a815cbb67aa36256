//! Exam Status Value Object

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Exam lifecycle. Only published exams accept registrations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExamStatus {
    #[default]
    Draft,
    Published,
    Closed,
}

impl ExamStatus {
    pub const fn code(&self) -> &'static str {
        match self {
            ExamStatus::Draft => "draft",
            ExamStatus::Published => "published",
            ExamStatus::Closed => "closed",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "draft" => Some(ExamStatus::Draft),
            "published" => Some(ExamStatus::Published),
            "closed" => Some(ExamStatus::Closed),
            _ => None,
        }
    }

    /// Parse user input; unknown values are a 400
    pub fn parse(code: &str) -> AppResult<Self> {
        Self::from_code(code.trim())
            .ok_or_else(|| AppError::bad_request(format!("Unknown exam status: {code}")))
    }
}

impl fmt::Display for ExamStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip() {
        for status in [ExamStatus::Draft, ExamStatus::Published, ExamStatus::Closed] {
            assert_eq!(ExamStatus::from_code(status.code()), Some(status));
        }
    }

    #[test]
    fn test_parse_unknown_is_bad_request() {
        let err = ExamStatus::parse("archived").unwrap_err();
        assert_eq!(err.status_code(), 400);
    }
}
