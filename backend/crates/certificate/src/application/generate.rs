//! Certificate Generation Use Case
//!
//! Issues numbered certificates for an exam's candidates. A batch is
//! all-or-nothing: any failure rolls back every certificate in it.

use chrono::{DateTime, Utc};
use kernel::id::{ExamId, TemplateId, UserId};
use std::collections::HashSet;
use std::sync::Arc;

use crate::application::config::CertificateConfig;
use crate::domain::entity::{CertificateView, DEFAULT_TEMPLATE_TYPE, GenerationBatch};
use crate::domain::repository::{CertificateRepository, TemplateRepository};
use crate::domain::value_object::CertificateType;
use crate::error::{CertificateError, CertificateResult};

pub struct GenerateCertificatesInput {
    pub exam_id: ExamId,
    /// Absent or empty: everyone with a passing score
    pub user_ids: Option<Vec<UserId>>,
    /// Absent: the active default `exam` template, if any
    pub template_id: Option<TemplateId>,
    pub certificate_type: CertificateType,
    pub expiry_months: Option<u32>,
}

#[derive(Debug)]
pub struct GenerationOutcome {
    pub certificates: Vec<CertificateView>,
    pub skipped_count: usize,
}

pub struct GenerateCertificatesUseCase<R>
where
    R: CertificateRepository + TemplateRepository,
{
    repo: Arc<R>,
    config: Arc<CertificateConfig>,
}

impl<R> GenerateCertificatesUseCase<R>
where
    R: CertificateRepository + TemplateRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<CertificateConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(
        &self,
        input: GenerateCertificatesInput,
        now: DateTime<Utc>,
    ) -> CertificateResult<GenerationOutcome> {
        let exam = self
            .repo
            .find_issuing_exam(&input.exam_id)
            .await?
            .ok_or(CertificateError::ExamNotFound)?;
        let validity = self.config.validity_for(input.expiry_months)?;

        let template_id = match input.template_id {
            Some(id) => match self.repo.find_template(&id).await? {
                Some(template) if template.is_active => Some(template.template_id),
                _ => return Err(CertificateError::TemplateNotFound),
            },
            None => self
                .repo
                .find_default_template(DEFAULT_TEMPLATE_TYPE)
                .await?
                .map(|t| t.template_id),
        };

        let candidates = match input.user_ids.filter(|ids| !ids.is_empty()) {
            None => self.repo.passing_candidates(&exam.exam_id).await?,
            Some(ids) => {
                let mut seen = HashSet::new();
                let ids: Vec<UserId> = ids.into_iter().filter(|id| seen.insert(*id)).collect();
                let found = self.repo.find_candidates(&ids).await?;
                if found.len() != ids.len() {
                    return Err(CertificateError::UserNotFound);
                }
                found
            }
        };

        let batch = GenerationBatch {
            exam,
            candidates,
            certificate_type: input.certificate_type,
            template_id,
            validity,
            issued_at: now,
        };
        let (issued, skipped_count) = self.repo.issue_batch(&batch).await?;

        let numbers: Vec<&str> = issued.iter().map(|c| c.certificate_number.as_str()).collect();
        tracing::info!(
            exam_id = %batch.exam.exam_id,
            certificate_type = %batch.certificate_type,
            generated = issued.len(),
            skipped = skipped_count,
            numbers = ?numbers,
            "Certificates generated"
        );

        let ids: Vec<_> = issued.iter().map(|c| c.certificate_id).collect();
        let certificates = if ids.is_empty() {
            Vec::new()
        } else {
            self.repo.find_certificates(&ids).await?
        };

        Ok(GenerationOutcome {
            certificates,
            skipped_count,
        })
    }
}
