//! Renewal Application Status and Type

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::CertificateType;

/// `pending` moves to `completed` (approval issues the successor in the
/// same step) or to `rejected`. Both are terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenewalStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Completed,
}

impl RenewalStatus {
    pub const fn code(&self) -> &'static str {
        match self {
            RenewalStatus::Pending => "pending",
            RenewalStatus::Approved => "approved",
            RenewalStatus::Rejected => "rejected",
            RenewalStatus::Completed => "completed",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "pending" => Some(RenewalStatus::Pending),
            "approved" => Some(RenewalStatus::Approved),
            "rejected" => Some(RenewalStatus::Rejected),
            "completed" => Some(RenewalStatus::Completed),
            _ => None,
        }
    }
}

impl fmt::Display for RenewalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// What the holder asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenewalType {
    Renewal,
    Replacement,
}

impl RenewalType {
    pub const fn code(&self) -> &'static str {
        self.certificate_type().code()
    }

    /// Type of the certificate an approval issues
    pub const fn certificate_type(&self) -> CertificateType {
        match self {
            RenewalType::Renewal => CertificateType::Renewal,
            RenewalType::Replacement => CertificateType::Replacement,
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "renewal" => Some(RenewalType::Renewal),
            "replacement" => Some(RenewalType::Replacement),
            _ => None,
        }
    }

    pub fn parse(code: &str) -> AppResult<Self> {
        Self::from_code(code.trim()).ok_or_else(|| {
            AppError::bad_request("application_type must be renewal or replacement")
        })
    }
}

impl fmt::Display for RenewalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
