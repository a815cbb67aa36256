//! Review Use Cases
//!
//! Admin side of exam applications.

use kernel::id::{ApplicationId, ExamId};
use kernel::pagination::{Page, PageQuery};
use std::sync::Arc;

use crate::domain::entity::ApplicationView;
use crate::domain::repository::{ApplicationFilter, ApplicationRepository, ExamRepository};
use crate::domain::value_object::ApplicationStatus;
use crate::error::{ExamError, ExamResult};

pub struct ListExamApplicationsUseCase<R>
where
    R: ExamRepository + ApplicationRepository,
{
    repo: Arc<R>,
}

impl<R> ListExamApplicationsUseCase<R>
where
    R: ExamRepository + ApplicationRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        exam_id: ExamId,
        status: Option<ApplicationStatus>,
        page: PageQuery,
    ) -> ExamResult<Page<ApplicationView>> {
        if self.repo.find_exam(&exam_id).await?.is_none() {
            return Err(ExamError::ExamNotFound);
        }

        let filter = ApplicationFilter {
            user_id: None,
            exam_id: Some(exam_id),
            status,
        };
        let (items, total) = self.repo.list_applications(filter, page).await?;
        Ok(Page::new(items, total, page))
    }
}

/// Outcome of a review
#[derive(Debug, Clone)]
pub enum ReviewDecision {
    Approve { admission_ticket_path: Option<String> },
    Reject { reason: Option<String> },
}

pub struct ReviewApplicationUseCase<R>
where
    R: ApplicationRepository,
{
    repo: Arc<R>,
}

impl<R> ReviewApplicationUseCase<R>
where
    R: ApplicationRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Pending only; a concurrent review makes the second one fail with 409
    pub async fn execute(
        &self,
        application_id: ApplicationId,
        decision: ReviewDecision,
    ) -> ExamResult<ApplicationView> {
        let mut view = self
            .repo
            .find_application(&application_id)
            .await?
            .ok_or(ExamError::ApplicationNotFound)?;

        match decision {
            ReviewDecision::Approve {
                admission_ticket_path,
            } => view.application.approve(admission_ticket_path)?,
            ReviewDecision::Reject { reason } => view.application.reject(reason)?,
        }

        if !self.repo.update_pending_application(&view.application).await? {
            return Err(ExamError::ApplicationNotPending);
        }

        tracing::info!(
            application_id = %application_id,
            status = %view.application.status,
            "Application reviewed"
        );

        Ok(view)
    }
}
