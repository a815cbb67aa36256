//! Certificate Type

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a certificate was issued
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CertificateType {
    /// First issue after passing the exam
    #[default]
    Initial,
    /// Reissue of an expiring or expired certificate
    Renewal,
    /// Reissue of a lost or damaged certificate
    Replacement,
}

impl CertificateType {
    pub const fn code(&self) -> &'static str {
        match self {
            CertificateType::Initial => "initial",
            CertificateType::Renewal => "renewal",
            CertificateType::Replacement => "replacement",
        }
    }

    /// Letter used inside certificate numbers
    pub const fn number_code(&self) -> char {
        match self {
            CertificateType::Initial => 'I',
            CertificateType::Renewal => 'R',
            CertificateType::Replacement => 'P',
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "initial" => Some(CertificateType::Initial),
            "renewal" => Some(CertificateType::Renewal),
            "replacement" => Some(CertificateType::Replacement),
            _ => None,
        }
    }

    pub fn from_number_code(code: char) -> Option<Self> {
        match code {
            'I' => Some(CertificateType::Initial),
            'R' => Some(CertificateType::Renewal),
            'P' => Some(CertificateType::Replacement),
            _ => None,
        }
    }

    pub fn parse(code: &str) -> AppResult<Self> {
        Self::from_code(code.trim())
            .ok_or_else(|| AppError::bad_request(format!("Unknown certificate type: {code}")))
    }
}

impl fmt::Display for CertificateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
