//! Exam Use Cases
//!
//! Public reads and admin maintenance of exam records.

use chrono::{DateTime, Utc};
use kernel::id::ExamId;
use kernel::pagination::{Page, PageQuery};
use std::sync::Arc;

use crate::domain::entity::{Exam, ExamChanges, NewExam};
use crate::domain::repository::{ExamRepository, ExamView};
use crate::domain::value_object::{ExamCode, ExamStatus};
use crate::error::{ExamError, ExamResult};

/// Create exam input
pub struct CreateExamInput {
    pub name: String,
    pub exam_code: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub registration_start: DateTime<Utc>,
    pub registration_end: DateTime<Utc>,
    pub location: Option<String>,
    pub exam_type: Option<String>,
    pub organizer: Option<String>,
    pub description: Option<String>,
    pub status: Option<ExamStatus>,
    pub max_applicants: Option<u32>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
}

pub struct CreateExamUseCase<R>
where
    R: ExamRepository,
{
    repo: Arc<R>,
}

impl<R> CreateExamUseCase<R>
where
    R: ExamRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, input: CreateExamInput) -> ExamResult<ExamView> {
        let exam = Exam::create(NewExam {
            name: input.name,
            exam_code: ExamCode::new(&input.exam_code)?,
            start_time: input.start_time,
            end_time: input.end_time,
            registration_start: input.registration_start,
            registration_end: input.registration_end,
            location: input.location,
            exam_type: input.exam_type,
            organizer: input.organizer,
            description: input.description,
            status: input.status.unwrap_or_default(),
            max_applicants: input.max_applicants.unwrap_or(0),
            contact_phone: input.contact_phone,
            contact_email: input.contact_email,
        })?;

        self.repo.create_exam(&exam).await?;

        tracing::info!(
            exam_id = %exam.exam_id,
            exam_code = %exam.exam_code,
            status = %exam.status,
            "Exam created"
        );

        Ok(ExamView {
            exam,
            application_count: 0,
        })
    }
}

pub struct GetExamUseCase<R>
where
    R: ExamRepository,
{
    repo: Arc<R>,
}

impl<R> GetExamUseCase<R>
where
    R: ExamRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, exam_id: ExamId) -> ExamResult<ExamView> {
        self.repo
            .find_exam(&exam_id)
            .await?
            .ok_or(ExamError::ExamNotFound)
    }
}

pub struct ListExamsUseCase<R>
where
    R: ExamRepository,
{
    repo: Arc<R>,
}

impl<R> ListExamsUseCase<R>
where
    R: ExamRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        status: Option<ExamStatus>,
        page: PageQuery,
    ) -> ExamResult<Page<ExamView>> {
        let (items, total) = self.repo.list_exams(status, page).await?;
        Ok(Page::new(items, total, page))
    }
}

pub struct UpdateExamUseCase<R>
where
    R: ExamRepository,
{
    repo: Arc<R>,
}

impl<R> UpdateExamUseCase<R>
where
    R: ExamRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, exam_id: ExamId, changes: ExamChanges) -> ExamResult<ExamView> {
        let mut view = self
            .repo
            .find_exam(&exam_id)
            .await?
            .ok_or(ExamError::ExamNotFound)?;

        view.exam.apply(changes)?;
        self.repo.update_exam(&view.exam).await?;

        tracing::info!(exam_id = %exam_id, status = %view.exam.status, "Exam updated");

        Ok(view)
    }
}

pub struct DeleteExamUseCase<R>
where
    R: ExamRepository,
{
    repo: Arc<R>,
}

impl<R> DeleteExamUseCase<R>
where
    R: ExamRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Applications, scores and form config go with the exam; issued
    /// certificates block deletion
    pub async fn execute(&self, exam_id: ExamId) -> ExamResult<()> {
        if !self.repo.delete_exam(&exam_id).await? {
            return Err(ExamError::ExamNotFound);
        }

        tracing::info!(exam_id = %exam_id, "Exam deleted");
        Ok(())
    }
}
