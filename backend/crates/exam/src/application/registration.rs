//! Registration Use Cases
//!
//! A candidate's own applications: submit, read, edit and withdraw.

use chrono::{DateTime, Utc};
use kernel::id::{ApplicationId, ExamId};
use kernel::pagination::{Page, PageQuery};
use kernel::principal::Principal;
use serde_json::Value;
use std::sync::Arc;

use crate::domain::entity::{Application, ApplicationView};
use crate::domain::repository::{ApplicationFilter, ApplicationRepository};
use crate::domain::value_object::ApplicationStatus;
use crate::error::{ExamError, ExamResult};

pub struct SubmitApplicationInput {
    pub exam_id: ExamId,
    pub application_data: Value,
}

pub struct SubmitApplicationUseCase<R>
where
    R: ApplicationRepository,
{
    repo: Arc<R>,
}

impl<R> SubmitApplicationUseCase<R>
where
    R: ApplicationRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        principal: &Principal,
        input: SubmitApplicationInput,
        now: DateTime<Utc>,
    ) -> ExamResult<ApplicationView> {
        let application =
            Application::new(principal.user_id, input.exam_id, input.application_data)?;

        self.repo.submit_application(&application, now).await?;

        tracing::info!(
            application_id = %application.application_id,
            user_id = %principal.user_id,
            exam_id = %input.exam_id,
            "Application submitted"
        );

        self.repo
            .find_application(&application.application_id)
            .await?
            .ok_or_else(|| ExamError::Internal("Submitted application vanished".to_string()))
    }
}

pub struct ListMyApplicationsUseCase<R>
where
    R: ApplicationRepository,
{
    repo: Arc<R>,
}

impl<R> ListMyApplicationsUseCase<R>
where
    R: ApplicationRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        principal: &Principal,
        status: Option<ApplicationStatus>,
        page: PageQuery,
    ) -> ExamResult<Page<ApplicationView>> {
        let filter = ApplicationFilter {
            user_id: Some(principal.user_id),
            exam_id: None,
            status,
        };
        let (items, total) = self.repo.list_applications(filter, page).await?;
        Ok(Page::new(items, total, page))
    }
}

pub struct GetApplicationUseCase<R>
where
    R: ApplicationRepository,
{
    repo: Arc<R>,
}

impl<R> GetApplicationUseCase<R>
where
    R: ApplicationRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Owners and admins only
    pub async fn execute(
        &self,
        principal: &Principal,
        application_id: ApplicationId,
    ) -> ExamResult<ApplicationView> {
        let view = self
            .repo
            .find_application(&application_id)
            .await?
            .ok_or(ExamError::ApplicationNotFound)?;

        principal.ensure_owner_or_admin(&view.application.user_id)?;
        Ok(view)
    }
}

pub struct UpdateApplicationUseCase<R>
where
    R: ApplicationRepository,
{
    repo: Arc<R>,
}

impl<R> UpdateApplicationUseCase<R>
where
    R: ApplicationRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Replace the form answers of the caller's own pending application
    pub async fn execute(
        &self,
        principal: &Principal,
        application_id: ApplicationId,
        application_data: Value,
    ) -> ExamResult<ApplicationView> {
        let mut view = owned_application(&*self.repo, principal, application_id).await?;

        view.application.replace_data(application_data)?;
        if !self.repo.update_pending_application(&view.application).await? {
            return Err(ExamError::ApplicationNotPending);
        }

        Ok(view)
    }
}

pub struct WithdrawApplicationUseCase<R>
where
    R: ApplicationRepository,
{
    repo: Arc<R>,
}

impl<R> WithdrawApplicationUseCase<R>
where
    R: ApplicationRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        principal: &Principal,
        application_id: ApplicationId,
    ) -> ExamResult<()> {
        let view = owned_application(&*self.repo, principal, application_id).await?;
        view.application.ensure_pending()?;

        if !self.repo.delete_pending_application(&application_id).await? {
            return Err(ExamError::ApplicationNotPending);
        }

        tracing::info!(
            application_id = %application_id,
            user_id = %principal.user_id,
            "Application withdrawn"
        );
        Ok(())
    }
}

/// Load an application the caller owns; admins get no exemption here
async fn owned_application<R>(
    repo: &R,
    principal: &Principal,
    application_id: ApplicationId,
) -> ExamResult<ApplicationView>
where
    R: ApplicationRepository,
{
    let view = repo
        .find_application(&application_id)
        .await?
        .ok_or(ExamError::ApplicationNotFound)?;

    if view.application.user_id != principal.user_id {
        return Err(kernel::error::app_error::AppError::forbidden(
            "Only the applicant can change this application",
        )
        .into());
    }
    Ok(view)
}
