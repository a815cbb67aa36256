//! Application Status Value Object

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub const fn code(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "pending" => Some(ApplicationStatus::Pending),
            "approved" => Some(ApplicationStatus::Approved),
            "rejected" => Some(ApplicationStatus::Rejected),
            _ => None,
        }
    }

    pub fn parse(code: &str) -> AppResult<Self> {
        Self::from_code(code.trim())
            .ok_or_else(|| AppError::bad_request(format!("Unknown application status: {code}")))
    }

    /// Counts toward capacity and blocks a second application
    pub const fn is_active(&self) -> bool {
        matches!(self, ApplicationStatus::Pending | ApplicationStatus::Approved)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_statuses() {
        assert!(ApplicationStatus::Pending.is_active());
        assert!(ApplicationStatus::Approved.is_active());
        assert!(!ApplicationStatus::Rejected.is_active());
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            ApplicationStatus::parse("approved").unwrap(),
            ApplicationStatus::Approved
        );
        assert!(ApplicationStatus::parse("completed").is_err());
    }
}
