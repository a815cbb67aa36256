//! Certificate Status

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CertificateStatus {
    #[default]
    Active,
    /// Past its expiry date
    Expired,
    /// Withdrawn by an admin
    Revoked,
    /// Superseded by a renewal or replacement
    Replaced,
}

impl CertificateStatus {
    pub const fn code(&self) -> &'static str {
        match self {
            CertificateStatus::Active => "active",
            CertificateStatus::Expired => "expired",
            CertificateStatus::Revoked => "revoked",
            CertificateStatus::Replaced => "replaced",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "active" => Some(CertificateStatus::Active),
            "expired" => Some(CertificateStatus::Expired),
            "revoked" => Some(CertificateStatus::Revoked),
            "replaced" => Some(CertificateStatus::Replaced),
            _ => None,
        }
    }

    pub fn parse(code: &str) -> AppResult<Self> {
        Self::from_code(code.trim())
            .ok_or_else(|| AppError::bad_request(format!("Unknown certificate status: {code}")))
    }

    /// Active and expired certificates can still be revoked, renewed or replaced
    pub const fn is_live(&self) -> bool {
        matches!(self, CertificateStatus::Active | CertificateStatus::Expired)
    }
}

impl fmt::Display for CertificateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
