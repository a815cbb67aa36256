//! Certificate Renewal Application
//!
//! A holder's request to renew or replace one of their certificates. Review
//! either rejects it or, in one step, issues the successor certificate,
//! marks the original `replaced` and completes the application.

use chrono::{DateTime, Utc};
use kernel::error::app_error::{AppError, AppResult};
use kernel::id::{CertificateId, RenewalApplicationId, UserId};
use kernel::summary::UserSummary;
use serde_json::Value;

use crate::domain::entity::Certificate;
use crate::domain::value_object::{
    CertificateNumber, CertificateStatus, RenewalStatus, RenewalType, Validity,
};
use crate::error::{CertificateError, CertificateResult};

const REASON_MAX_LENGTH: usize = 2000;

#[derive(Debug, Clone)]
pub struct RenewalApplication {
    pub renewal_application_id: RenewalApplicationId,
    pub user_id: UserId,
    pub original_certificate_id: CertificateId,
    pub application_type: RenewalType,
    pub reason: String,
    pub supporting_documents: Option<Value>,
    pub status: RenewalStatus,
    pub reviewer_id: Option<UserId>,
    pub review_comment: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub new_certificate_id: Option<CertificateId>,
    pub submitted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Application with the applicant and certificate numbers inlined
#[derive(Debug, Clone)]
pub struct RenewalView {
    pub application: RenewalApplication,
    pub user: UserSummary,
    pub original_certificate_number: String,
    pub new_certificate_number: Option<String>,
}

/// Admin verdict on a pending application
#[derive(Debug, Clone)]
pub enum RenewalDecision {
    Approve,
    Reject,
}

impl RenewalDecision {
    /// `approve` or `reject`
    pub fn parse(action: &str) -> AppResult<Self> {
        match action.trim() {
            "approve" => Ok(RenewalDecision::Approve),
            "reject" => Ok(RenewalDecision::Reject),
            _ => Err(AppError::bad_request("action must be approve or reject")),
        }
    }
}

impl RenewalApplication {
    /// File a request against `original`, which the caller must hold
    pub fn submit(
        user_id: UserId,
        original: &Certificate,
        application_type: RenewalType,
        reason: &str,
        supporting_documents: Option<Value>,
    ) -> CertificateResult<Self> {
        if original.user_id != user_id {
            return Err(CertificateError::CertificateNotFound);
        }
        original.ensure_supersedable()?;

        let now = Utc::now();
        Ok(Self {
            renewal_application_id: RenewalApplicationId::new(),
            user_id,
            original_certificate_id: original.certificate_id,
            application_type,
            reason: validate_reason(reason)?,
            supporting_documents: supporting_documents.filter(|d| !d.is_null()),
            status: RenewalStatus::Pending,
            reviewer_id: None,
            review_comment: None,
            reviewed_at: None,
            new_certificate_id: None,
            submitted_at: now,
            updated_at: now,
        })
    }

    pub fn ensure_pending(&self) -> CertificateResult<()> {
        if self.status == RenewalStatus::Pending {
            Ok(())
        } else {
            Err(CertificateError::RenewalNotPending)
        }
    }

    pub fn reject(
        &mut self,
        reviewer_id: UserId,
        comment: Option<String>,
        now: DateTime<Utc>,
    ) -> CertificateResult<()> {
        self.ensure_pending()?;
        self.record_review(reviewer_id, comment, now);
        self.status = RenewalStatus::Rejected;
        Ok(())
    }

    fn record_review(&mut self, reviewer_id: UserId, comment: Option<String>, now: DateTime<Utc>) {
        self.reviewer_id = Some(reviewer_id);
        self.review_comment = comment.map(|c| c.trim().to_string()).filter(|c| !c.is_empty());
        self.reviewed_at = Some(now);
        self.updated_at = now;
    }
}

/// Approve `application`: returns the successor certificate and moves
/// `original` to `replaced` and `application` to `completed`. Nothing is
/// changed when an error is returned.
///
/// The successor carries over the original's exam, template and printed
/// data and points back at the original.
pub fn approve_renewal(
    application: &mut RenewalApplication,
    original: &mut Certificate,
    number: CertificateNumber,
    reviewer_id: UserId,
    comment: Option<String>,
    validity: Validity,
    now: DateTime<Utc>,
) -> CertificateResult<Certificate> {
    application.ensure_pending()?;
    if original.certificate_id != application.original_certificate_id {
        return Err(CertificateError::Internal(
            "Renewal application does not match its certificate".to_string(),
        ));
    }
    original.ensure_supersedable()?;
    let expiry = validity.expiry_from(now)?;

    let mut successor = Certificate::issue(
        number,
        application.user_id,
        original.exam_id,
        application.application_type.certificate_type(),
        now,
        expiry,
        original.template_id,
        original.certificate_data.clone(),
    );
    successor.original_certificate_id = Some(original.certificate_id);
    successor.original_certificate_number = Some(original.certificate_number.to_string());
    successor.renewal_reason = Some(application.reason.clone());

    original.status = CertificateStatus::Replaced;
    original.updated_at = now;

    application.record_review(reviewer_id, comment, now);
    application.status = RenewalStatus::Completed;
    application.new_certificate_id = Some(successor.certificate_id);

    Ok(successor)
}

fn validate_reason(reason: &str) -> AppResult<String> {
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(AppError::bad_request("A reason is required"));
    }
    if reason.chars().count() > REASON_MAX_LENGTH {
        return Err(AppError::bad_request(format!(
            "Reason must be at most {REASON_MAX_LENGTH} characters"
        )));
    }
    Ok(reason.to_string())
}
