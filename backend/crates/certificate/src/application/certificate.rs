//! Certificate Use Cases
//!
//! Reads, revocation and the expiry sweep.

use chrono::{DateTime, Utc};
use kernel::id::{CertificateId, ExamId};
use kernel::pagination::{Page, PageQuery};
use kernel::principal::Principal;
use std::sync::Arc;

use crate::domain::entity::CertificateView;
use crate::domain::repository::{CertificateFilter, CertificateRepository};
use crate::domain::value_object::{CertificateStatus, CertificateType};
use crate::error::{CertificateError, CertificateResult};

pub struct ListMyCertificatesUseCase<R>
where
    R: CertificateRepository,
{
    repo: Arc<R>,
}

impl<R> ListMyCertificatesUseCase<R>
where
    R: CertificateRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        principal: &Principal,
        status: Option<CertificateStatus>,
        page: PageQuery,
    ) -> CertificateResult<Page<CertificateView>> {
        let filter = CertificateFilter {
            user_id: Some(principal.user_id),
            status,
            ..Default::default()
        };
        let (items, total) = self.repo.list_certificates(filter, page).await?;
        Ok(Page::new(items, total, page))
    }
}

pub struct GetCertificateUseCase<R>
where
    R: CertificateRepository,
{
    repo: Arc<R>,
}

impl<R> GetCertificateUseCase<R>
where
    R: CertificateRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Holders and admins only
    pub async fn execute(
        &self,
        principal: &Principal,
        certificate_id: CertificateId,
    ) -> CertificateResult<CertificateView> {
        let view = self
            .repo
            .find_certificate(&certificate_id)
            .await?
            .ok_or(CertificateError::CertificateNotFound)?;

        principal.ensure_owner_or_admin(&view.certificate.user_id)?;
        Ok(view)
    }
}

pub struct ListExamCertificatesUseCase<R>
where
    R: CertificateRepository,
{
    repo: Arc<R>,
}

impl<R> ListExamCertificatesUseCase<R>
where
    R: CertificateRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        exam_id: ExamId,
        status: Option<CertificateStatus>,
        certificate_type: Option<CertificateType>,
        page: PageQuery,
    ) -> CertificateResult<Page<CertificateView>> {
        if self.repo.find_issuing_exam(&exam_id).await?.is_none() {
            return Err(CertificateError::ExamNotFound);
        }

        let filter = CertificateFilter {
            exam_id: Some(exam_id),
            status,
            certificate_type,
            ..Default::default()
        };
        let (items, total) = self.repo.list_certificates(filter, page).await?;
        Ok(Page::new(items, total, page))
    }
}

pub struct RevokeCertificateUseCase<R>
where
    R: CertificateRepository,
{
    repo: Arc<R>,
}

impl<R> RevokeCertificateUseCase<R>
where
    R: CertificateRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Active or expired only; anything else is 409
    pub async fn execute(
        &self,
        certificate_id: CertificateId,
        now: DateTime<Utc>,
    ) -> CertificateResult<CertificateView> {
        let mut view = self
            .repo
            .find_certificate(&certificate_id)
            .await?
            .ok_or(CertificateError::CertificateNotFound)?;

        view.certificate.revoke(now)?;
        if !self.repo.revoke_certificate(&view.certificate).await? {
            // Replaced or revoked concurrently
            return Err(CertificateError::NotRevocable(CertificateStatus::Replaced));
        }

        tracing::info!(
            certificate_id = %certificate_id,
            certificate_number = %view.certificate.certificate_number,
            "Certificate revoked"
        );

        Ok(view)
    }
}

/// Marks active certificates past their expiry date as expired
pub struct ExpireOverdueUseCase<R>
where
    R: CertificateRepository,
{
    repo: Arc<R>,
}

impl<R> ExpireOverdueUseCase<R>
where
    R: CertificateRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, now: DateTime<Utc>) -> CertificateResult<u64> {
        let expired = self.repo.expire_overdue(now).await?;
        if expired > 0 {
            tracing::info!(expired, "Overdue certificates expired");
        }
        Ok(expired)
    }
}
