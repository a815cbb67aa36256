//! Certificate Import
//!
//! Brings in certificates numbered by an external system. Rows are
//! independent: a bad or duplicate row is reported and the rest still land.

use chrono::{DateTime, NaiveDate, Utc};
use kernel::error::app_error::{AppError, AppResult};
use kernel::id::{ExamId, Id, UserId};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::config::CertificateConfig;
use crate::domain::entity::Certificate;
use crate::domain::repository::CertificateRepository;
use crate::domain::value_object::{CertificateNumber, CertificateStatus, CertificateType};
use crate::error::{CertificateError, CertificateResult};

/// One certificate as submitted. Fields stay raw so a malformed value only
/// fails its own row.
#[derive(Debug, Clone, Default)]
pub struct ImportRow {
    pub certificate_number: Option<String>,
    pub user_id: Option<String>,
    pub exam_id: Option<String>,
    pub certificate_type: Option<String>,
    pub status: Option<String>,
    /// `YYYY-MM-DD`
    pub issue_date: Option<String>,
    /// `YYYY-MM-DD`
    pub expiry_date: Option<String>,
    pub certificate_data: Option<Value>,
}

/// A row that was not imported; `row` is 1-based
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportRowError {
    pub row: usize,
    pub certificate_number: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportOutcome {
    pub imported_count: usize,
    pub errors: Vec<ImportRowError>,
}

pub struct ImportCertificatesUseCase<R>
where
    R: CertificateRepository,
{
    repo: Arc<R>,
    config: Arc<CertificateConfig>,
}

impl<R> ImportCertificatesUseCase<R>
where
    R: CertificateRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<CertificateConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(
        &self,
        rows: Vec<ImportRow>,
        now: DateTime<Utc>,
    ) -> CertificateResult<ImportOutcome> {
        let mut outcome = ImportOutcome::default();
        let mut accepted = Vec::new();
        let mut certificates = Vec::new();

        for (index, row) in rows.into_iter().enumerate() {
            let number = row.certificate_number.clone();
            match self.certificate_from(row, now) {
                Ok(certificate) => {
                    accepted.push((index + 1, number));
                    certificates.push(certificate);
                }
                Err(err) => outcome.errors.push(row_error(index + 1, number, err)),
            }
        }

        let failures = self.repo.import_certificates(&certificates).await?;
        outcome.imported_count = certificates.len().saturating_sub(failures.len());
        for (position, err) in failures {
            if let CertificateError::Database(e) = &err {
                tracing::warn!(error = %e, "Certificate row failed");
            }
            let (row, number) = accepted.get(position).cloned().ok_or_else(|| {
                CertificateError::Internal(format!("Import failure reported for unknown row {position}"))
            })?;
            outcome.errors.push(row_error(row, number, err.to_app_error()));
        }
        outcome.errors.sort_by_key(|e| e.row);

        tracing::info!(
            imported = outcome.imported_count,
            failed = outcome.errors.len(),
            "Certificates imported"
        );

        Ok(outcome)
    }

    fn certificate_from(&self, row: ImportRow, now: DateTime<Utc>) -> AppResult<Certificate> {
        let number = required(row.certificate_number, "certificate_number")?;
        let number = CertificateNumber::new(&number)?;
        let user_id: UserId = parse_id(&required(row.user_id, "user_id")?, "user_id")?;
        let exam_id: ExamId = parse_id(&required(row.exam_id, "exam_id")?, "exam_id")?;

        let certificate_type = match non_blank(row.certificate_type) {
            Some(code) => CertificateType::parse(&code)?,
            None => CertificateType::Initial,
        };
        let status = match non_blank(row.status) {
            Some(code) => CertificateStatus::parse(&code)?,
            None => CertificateStatus::Active,
        };
        if status == CertificateStatus::Replaced {
            return Err(AppError::bad_request(
                "Imported certificates cannot be marked replaced",
            ));
        }

        let issue_date = match non_blank(row.issue_date) {
            Some(date) => parse_date(&date, "issue_date")?,
            None => now,
        };
        let expiry_date = match non_blank(row.expiry_date) {
            Some(date) => parse_date(&date, "expiry_date")?,
            None => self.config.validity.expiry_from(issue_date)?,
        };
        if expiry_date < issue_date {
            return Err(AppError::bad_request("expiry_date is before issue_date"));
        }

        let data = match row.certificate_data {
            None | Some(Value::Null) => Value::Object(Default::default()),
            Some(data @ Value::Object(_)) => data,
            Some(_) => {
                return Err(AppError::bad_request("certificate_data must be a JSON object"));
            }
        };

        let mut certificate = Certificate::issue(
            number,
            user_id,
            exam_id,
            certificate_type,
            issue_date,
            expiry_date,
            None,
            data,
        );
        certificate.status = status;
        certificate.created_at = now;
        certificate.updated_at = now;
        Ok(certificate)
    }
}

fn row_error(row: usize, certificate_number: Option<String>, err: AppError) -> ImportRowError {
    ImportRowError {
        row,
        certificate_number,
        message: err.public_message().to_string(),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(value: Option<String>, field: &str) -> AppResult<String> {
    non_blank(value).ok_or_else(|| AppError::bad_request(format!("{field} is required")))
}

fn parse_id<T>(raw: &str, field: &str) -> AppResult<Id<T>> {
    Uuid::parse_str(raw)
        .map(Id::from_uuid)
        .map_err(|_| AppError::bad_request(format!("{field} is not a valid id")))
}

/// `YYYY-MM-DD` at midnight UTC
fn parse_date(raw: &str, field: &str) -> AppResult<DateTime<Utc>> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| d.and_utc())
        .ok_or_else(|| AppError::bad_request(format!("{field} must be YYYY-MM-DD")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_date_is_midnight_utc() {
        let date = parse_date("2024-02-29", "issue_date").unwrap();
        assert_eq!(date, Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap());
        assert!(parse_date("2023-02-29", "issue_date").is_err());
        assert!(parse_date("29/02/2024", "issue_date").is_err());
    }

    #[test]
    fn test_required_rejects_blank() {
        assert!(required(Some("  ".to_string()), "user_id").is_err());
        assert_eq!(required(Some(" x ".to_string()), "user_id").unwrap(), "x");
    }
}
