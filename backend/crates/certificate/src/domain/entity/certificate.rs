//! Certificate Entity

use chrono::{DateTime, Utc};
use kernel::id::{CertificateId, ExamId, TemplateId, UserId};
use kernel::summary::{ExamSummary, UserSummary};
use serde_json::Value;

use crate::domain::value_object::{CertificateNumber, CertificateStatus, CertificateType};
use crate::error::{CertificateError, CertificateResult};

#[derive(Debug, Clone)]
pub struct Certificate {
    pub certificate_id: CertificateId,
    pub certificate_number: CertificateNumber,
    pub user_id: UserId,
    pub exam_id: ExamId,
    pub certificate_type: CertificateType,
    pub status: CertificateStatus,
    pub issue_date: DateTime<Utc>,
    pub expiry_date: Option<DateTime<Utc>>,
    /// Certificate this one supersedes
    pub original_certificate_id: Option<CertificateId>,
    pub original_certificate_number: Option<String>,
    pub renewal_reason: Option<String>,
    pub template_id: Option<TemplateId>,
    /// Values printed on the certificate
    pub certificate_data: Value,
    pub certificate_file_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Certificate with its holder and exam inlined
#[derive(Debug, Clone)]
pub struct CertificateView {
    pub certificate: Certificate,
    pub user: UserSummary,
    pub exam: ExamSummary,
}

impl Certificate {
    /// A freshly issued, active certificate
    #[allow(clippy::too_many_arguments)]
    pub fn issue(
        certificate_number: CertificateNumber,
        user_id: UserId,
        exam_id: ExamId,
        certificate_type: CertificateType,
        issue_date: DateTime<Utc>,
        expiry_date: DateTime<Utc>,
        template_id: Option<TemplateId>,
        certificate_data: Value,
    ) -> Self {
        Self {
            certificate_id: CertificateId::new(),
            certificate_number,
            user_id,
            exam_id,
            certificate_type,
            status: CertificateStatus::Active,
            issue_date,
            expiry_date: Some(expiry_date),
            original_certificate_id: None,
            original_certificate_number: None,
            renewal_reason: None,
            template_id,
            certificate_data,
            certificate_file_path: None,
            created_at: issue_date,
            updated_at: issue_date,
        }
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status == CertificateStatus::Active && self.expiry_date.is_some_and(|e| e < now)
    }

    pub fn revoke(&mut self, now: DateTime<Utc>) -> CertificateResult<()> {
        if !self.status.is_live() {
            return Err(CertificateError::NotRevocable(self.status));
        }
        self.status = CertificateStatus::Revoked;
        self.updated_at = now;
        Ok(())
    }

    /// Holders may ask to renew or replace only live certificates
    pub fn ensure_supersedable(&self) -> CertificateResult<()> {
        if self.status.is_live() {
            Ok(())
        } else {
            Err(CertificateError::NotSupersedable(self.status))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    fn certificate(now: DateTime<Utc>) -> Certificate {
        Certificate::issue(
            CertificateNumber::compose("CPA", 2026, CertificateType::Initial, 1),
            UserId::new(),
            ExamId::new(),
            CertificateType::Initial,
            now,
            now + Duration::days(365),
            None,
            json!({}),
        )
    }

    #[test]
    fn test_overdue_only_when_active_and_past_expiry() {
        let now = Utc::now();
        let mut cert = certificate(now);
        assert!(!cert.is_overdue(now));
        assert!(cert.is_overdue(now + Duration::days(366)));

        cert.status = CertificateStatus::Revoked;
        assert!(!cert.is_overdue(now + Duration::days(366)));
    }

    #[test]
    fn test_revoke_live_certificates_only() {
        let now = Utc::now();
        let mut cert = certificate(now);
        cert.status = CertificateStatus::Expired;
        cert.revoke(now).unwrap();
        assert_eq!(cert.status, CertificateStatus::Revoked);

        assert!(matches!(
            cert.revoke(now),
            Err(CertificateError::NotRevocable(CertificateStatus::Revoked))
        ));
    }
}
