//! Renewal Use Cases
//!
//! Holders ask for a renewal or replacement; admins review.

use chrono::{DateTime, Utc};
use kernel::id::{CertificateId, RenewalApplicationId};
use kernel::pagination::{Page, PageQuery};
use kernel::principal::Principal;
use serde_json::Value;
use std::sync::Arc;

use crate::application::config::CertificateConfig;
use crate::domain::entity::{RenewalApplication, RenewalDecision, RenewalView};
use crate::domain::repository::{
    CertificateRepository, RenewalFilter, RenewalRepository, RenewalReview,
};
use crate::domain::value_object::{RenewalStatus, RenewalType};
use crate::error::{CertificateError, CertificateResult};

pub struct SubmitRenewalInput {
    pub original_certificate_id: CertificateId,
    pub application_type: RenewalType,
    pub reason: String,
    pub supporting_documents: Option<Value>,
}

pub struct SubmitRenewalUseCase<R>
where
    R: CertificateRepository + RenewalRepository,
{
    repo: Arc<R>,
}

impl<R> SubmitRenewalUseCase<R>
where
    R: CertificateRepository + RenewalRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Someone else's certificate reads as missing
    pub async fn execute(
        &self,
        principal: &Principal,
        input: SubmitRenewalInput,
    ) -> CertificateResult<RenewalView> {
        let original = self
            .repo
            .find_certificate(&input.original_certificate_id)
            .await?
            .ok_or(CertificateError::CertificateNotFound)?;

        let application = RenewalApplication::submit(
            principal.user_id,
            &original.certificate,
            input.application_type,
            &input.reason,
            input.supporting_documents,
        )?;
        self.repo.submit_renewal(&application).await?;

        tracing::info!(
            renewal_application_id = %application.renewal_application_id,
            certificate_number = %original.certificate.certificate_number,
            application_type = %application.application_type,
            "Renewal application submitted"
        );

        self.repo
            .find_renewal(&application.renewal_application_id)
            .await?
            .ok_or_else(|| CertificateError::Internal("Submitted application vanished".to_string()))
    }
}

pub struct ListRenewalsUseCase<R>
where
    R: RenewalRepository,
{
    repo: Arc<R>,
}

impl<R> ListRenewalsUseCase<R>
where
    R: RenewalRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Own applications for members, all of them for admins
    pub async fn execute(
        &self,
        principal: &Principal,
        status: Option<RenewalStatus>,
        page: PageQuery,
    ) -> CertificateResult<Page<RenewalView>> {
        let filter = RenewalFilter {
            user_id: principal.listing_scope(),
            status,
        };
        let (items, total) = self.repo.list_renewals(filter, page).await?;
        Ok(Page::new(items, total, page))
    }
}

pub struct GetRenewalUseCase<R>
where
    R: RenewalRepository,
{
    repo: Arc<R>,
}

impl<R> GetRenewalUseCase<R>
where
    R: RenewalRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        principal: &Principal,
        renewal_application_id: RenewalApplicationId,
    ) -> CertificateResult<RenewalView> {
        let view = self
            .repo
            .find_renewal(&renewal_application_id)
            .await?
            .ok_or(CertificateError::RenewalNotFound)?;

        principal.ensure_owner_or_admin(&view.application.user_id)?;
        Ok(view)
    }
}

pub struct ReviewRenewalUseCase<R>
where
    R: RenewalRepository,
{
    repo: Arc<R>,
    config: Arc<CertificateConfig>,
}

impl<R> ReviewRenewalUseCase<R>
where
    R: RenewalRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<CertificateConfig>) -> Self {
        Self { repo, config }
    }

    /// Pending only; a second review of the same application is 409 and
    /// issues nothing
    pub async fn execute(
        &self,
        reviewer: &Principal,
        renewal_application_id: RenewalApplicationId,
        decision: RenewalDecision,
        comment: Option<String>,
        now: DateTime<Utc>,
    ) -> CertificateResult<RenewalView> {
        let review = RenewalReview {
            renewal_application_id,
            decision,
            reviewer_id: reviewer.user_id,
            comment,
            validity: self.config.validity,
            now,
        };
        self.repo.review_renewal(&review).await?;

        let view = self
            .repo
            .find_renewal(&renewal_application_id)
            .await?
            .ok_or(CertificateError::RenewalNotFound)?;

        tracing::info!(
            renewal_application_id = %renewal_application_id,
            status = %view.application.status,
            new_certificate_number = ?view.new_certificate_number,
            "Renewal application reviewed"
        );

        Ok(view)
    }
}
