//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use chrono::{DateTime, Utc};
use kernel::id::{CertificateId, ExamId, RenewalApplicationId, TemplateId, UserId};
use kernel::pagination::PageQuery;

use crate::domain::entity::{
    Candidate, Certificate, CertificateView, GenerationBatch, IssuingExam, RenewalApplication,
    RenewalDecision, RenewalView, Template,
};
use crate::domain::value_object::{CertificateStatus, CertificateType, RenewalStatus, Validity};
use crate::error::{CertificateError, CertificateResult};

/// Which certificates a listing covers
#[derive(Debug, Clone, Copy, Default)]
pub struct CertificateFilter {
    pub user_id: Option<UserId>,
    pub exam_id: Option<ExamId>,
    pub status: Option<CertificateStatus>,
    pub certificate_type: Option<CertificateType>,
}

/// Which renewal applications a listing covers
#[derive(Debug, Clone, Copy, Default)]
pub struct RenewalFilter {
    pub user_id: Option<UserId>,
    pub status: Option<RenewalStatus>,
}

/// Review request as handed to storage
#[derive(Debug, Clone)]
pub struct RenewalReview {
    pub renewal_application_id: RenewalApplicationId,
    pub decision: RenewalDecision,
    pub reviewer_id: UserId,
    pub comment: Option<String>,
    pub validity: Validity,
    pub now: DateTime<Utc>,
}

/// Certificate repository trait
#[trait_variant::make(CertificateRepository: Send)]
pub trait LocalCertificateRepository {
    async fn find_issuing_exam(&self, exam_id: &ExamId) -> CertificateResult<Option<IssuingExam>>;

    /// Users with a passing score for the exam
    async fn passing_candidates(&self, exam_id: &ExamId) -> CertificateResult<Vec<Candidate>>;

    /// The subset of `user_ids` that exist
    async fn find_candidates(&self, user_ids: &[UserId]) -> CertificateResult<Vec<Candidate>>;

    /// Issue a batch in one transaction. Candidates already holding an active
    /// initial certificate are re-checked under a lock on the exam and
    /// skipped. Returns the issued certificates and the skip count.
    async fn issue_batch(
        &self,
        batch: &GenerationBatch,
    ) -> CertificateResult<(Vec<Certificate>, usize)>;

    /// Insert externally numbered certificates, each under its own savepoint.
    /// Returns the per-row failures by position in `certificates`.
    async fn import_certificates(
        &self,
        certificates: &[Certificate],
    ) -> CertificateResult<Vec<(usize, CertificateError)>>;

    async fn find_certificate(
        &self,
        certificate_id: &CertificateId,
    ) -> CertificateResult<Option<CertificateView>>;

    /// Views for the given ids, ordered by number
    async fn find_certificates(
        &self,
        certificate_ids: &[CertificateId],
    ) -> CertificateResult<Vec<CertificateView>>;

    /// Newest first
    async fn list_certificates(
        &self,
        filter: CertificateFilter,
        page: PageQuery,
    ) -> CertificateResult<(Vec<CertificateView>, i64)>;

    /// Write back a revocation if the stored row is still active or expired.
    /// Returns false otherwise.
    async fn revoke_certificate(&self, certificate: &Certificate) -> CertificateResult<bool>;

    /// Mark active certificates whose expiry has passed as expired
    async fn expire_overdue(&self, now: DateTime<Utc>) -> CertificateResult<u64>;
}

/// Renewal application repository trait
#[trait_variant::make(RenewalRepository: Send)]
pub trait LocalRenewalRepository {
    async fn submit_renewal(&self, application: &RenewalApplication) -> CertificateResult<()>;

    async fn find_renewal(
        &self,
        renewal_application_id: &RenewalApplicationId,
    ) -> CertificateResult<Option<RenewalView>>;

    /// Newest first
    async fn list_renewals(
        &self,
        filter: RenewalFilter,
        page: PageQuery,
    ) -> CertificateResult<(Vec<RenewalView>, i64)>;

    /// Apply a review while holding locks on the application and its
    /// certificate. Approval allocates the successor's number, inserts it,
    /// replaces the original and completes the application, all in one
    /// transaction.
    async fn review_renewal(&self, review: &RenewalReview) -> CertificateResult<()>;
}

/// Template repository trait
#[trait_variant::make(TemplateRepository: Send)]
pub trait LocalTemplateRepository {
    async fn find_template(&self, template_id: &TemplateId) -> CertificateResult<Option<Template>>;

    /// Active default template of the given type
    async fn find_default_template(
        &self,
        template_type: &str,
    ) -> CertificateResult<Option<Template>>;

    /// Active templates, defaults first
    async fn list_active_templates(&self) -> CertificateResult<Vec<Template>>;

    /// Insert; when the template is the default the previous default of its
    /// type is cleared in the same transaction
    async fn create_template(&self, template: &Template) -> CertificateResult<()>;

    /// Update with the same default handling as `create_template`
    async fn update_template(&self, template: &Template) -> CertificateResult<()>;
}
