//! Certificate Number
//!
//! Issued numbers look like `{EXAMCODE}-{YEAR}-{I|R|P}-{SEQUENCE}` with the
//! sequence zero-padded to six digits. Imported numbers are taken verbatim;
//! only those matching the pattern take part in sequencing.

use kernel::error::app_error::{AppError, AppResult};
use std::fmt;

use super::CertificateType;

const MAX_LENGTH: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CertificateNumber(String);

/// Components of a number in the issued format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberParts {
    pub exam_code: String,
    pub year: i32,
    pub certificate_type: CertificateType,
    pub sequence: i64,
}

impl NumberParts {
    /// Everything before the sequence, including the trailing dash
    pub fn prefix(&self) -> String {
        number_prefix(&self.exam_code, self.year, self.certificate_type)
    }
}

pub fn number_prefix(exam_code: &str, year: i32, certificate_type: CertificateType) -> String {
    format!("{exam_code}-{year}-{}-", certificate_type.number_code())
}

impl CertificateNumber {
    /// Validate an externally supplied number
    pub fn new(raw: &str) -> AppResult<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(AppError::bad_request("Certificate number is required"));
        }
        if raw.chars().count() > MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Certificate number must be at most {MAX_LENGTH} characters"
            )));
        }
        if raw.chars().any(char::is_control) {
            return Err(AppError::bad_request(
                "Certificate number contains invalid characters",
            ));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn compose(
        exam_code: &str,
        year: i32,
        certificate_type: CertificateType,
        sequence: i64,
    ) -> Self {
        Self(format!(
            "{}{sequence:06}",
            number_prefix(exam_code, year, certificate_type)
        ))
    }

    pub fn from_stored(number: String) -> Self {
        Self(number)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split a number in the issued format; `None` for anything else
    pub fn parts(&self) -> Option<NumberParts> {
        let mut segments = self.0.split('-');
        let (code, year, kind, sequence) = (
            segments.next()?,
            segments.next()?,
            segments.next()?,
            segments.next()?,
        );
        if segments.next().is_some() {
            return None;
        }

        let code_ok = (2..=20).contains(&code.len())
            && code
                .bytes()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit());
        let year_ok = year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit());
        let sequence_ok = (6..=18).contains(&sequence.len())
            && sequence.bytes().all(|b| b.is_ascii_digit());
        if !(code_ok && year_ok && sequence_ok) {
            return None;
        }

        let mut kind_chars = kind.chars();
        let certificate_type = CertificateType::from_number_code(kind_chars.next()?)?;
        if kind_chars.next().is_some() {
            return None;
        }

        let sequence: i64 = sequence.parse().ok()?;
        if sequence == 0 {
            return None;
        }

        Some(NumberParts {
            exam_code: code.to_string(),
            year: year.parse().ok()?,
            certificate_type,
            sequence,
        })
    }
}

impl fmt::Display for CertificateNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
