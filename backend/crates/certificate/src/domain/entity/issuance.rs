//! Batch Issuance
//!
//! Planning for certificate generation. The repository runs the plan inside
//! one transaction, allocating a number per issued certificate.

use chrono::{DateTime, Datelike, Utc};
use kernel::id::{ExamId, TemplateId, UserId};
use serde_json::json;
use std::collections::HashSet;

use crate::domain::entity::Certificate;
use crate::domain::value_object::{CertificateNumber, CertificateType, Validity};
use crate::error::CertificateResult;

/// Exam fields issuance needs
#[derive(Debug, Clone)]
pub struct IssuingExam {
    pub exam_id: ExamId,
    pub exam_code: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct Candidate {
    pub user_id: UserId,
    pub username: String,
}

#[derive(Debug, Clone)]
pub struct GenerationBatch {
    pub exam: IssuingExam,
    pub candidates: Vec<Candidate>,
    pub certificate_type: CertificateType,
    pub template_id: Option<TemplateId>,
    pub validity: Validity,
    pub issued_at: DateTime<Utc>,
}

impl GenerationBatch {
    /// Year component of the numbers this batch allocates
    pub fn year(&self) -> i32 {
        self.issued_at.year()
    }

    /// Candidates to issue to, and how many were skipped. A candidate is
    /// skipped when an initial certificate is requested and they already
    /// hold an active one for this exam (`holders`).
    pub fn select(&self, holders: &HashSet<UserId>) -> (Vec<&Candidate>, usize) {
        let (skipped, issue): (Vec<&Candidate>, Vec<&Candidate>) =
            self.candidates.iter().partition(|c| {
                self.certificate_type == CertificateType::Initial && holders.contains(&c.user_id)
            });
        (issue, skipped.len())
    }

    /// Certificate for `candidate` under the allocated `sequence`
    pub fn certificate_for(
        &self,
        candidate: &Candidate,
        sequence: i64,
    ) -> CertificateResult<Certificate> {
        let expiry = self.validity.expiry_from(self.issued_at)?;
        let number = CertificateNumber::compose(
            &self.exam.exam_code,
            self.year(),
            self.certificate_type,
            sequence,
        );
        let data = json!({
            "exam_name": self.exam.name,
            "exam_code": self.exam.exam_code,
            "user_name": candidate.username,
            "issue_date": self.issued_at.format("%Y-%m-%d").to_string(),
            "expiry_date": expiry.format("%Y-%m-%d").to_string(),
        });

        Ok(Certificate::issue(
            number,
            candidate.user_id,
            self.exam.exam_id,
            self.certificate_type,
            self.issued_at,
            expiry,
            self.template_id,
            data,
        ))
    }
}
