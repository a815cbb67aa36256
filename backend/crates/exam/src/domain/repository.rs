//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use chrono::{DateTime, Utc};
use kernel::id::{ApplicationId, ExamId, UserId};
use kernel::pagination::PageQuery;

use crate::domain::entity::{Application, ApplicationView, Exam, FormConfig};
use crate::domain::value_object::{ApplicationStatus, ExamStatus};
use crate::error::ExamResult;

/// Exam with its count of pending and approved applications
#[derive(Debug, Clone)]
pub struct ExamView {
    pub exam: Exam,
    pub application_count: i64,
}

/// Which applications a listing covers
#[derive(Debug, Clone, Copy, Default)]
pub struct ApplicationFilter {
    pub user_id: Option<UserId>,
    pub exam_id: Option<ExamId>,
    pub status: Option<ApplicationStatus>,
}

/// Exam repository trait
#[trait_variant::make(ExamRepository: Send)]
pub trait LocalExamRepository {
    async fn create_exam(&self, exam: &Exam) -> ExamResult<()>;

    async fn find_exam(&self, exam_id: &ExamId) -> ExamResult<Option<ExamView>>;

    /// Newest exams first
    async fn list_exams(
        &self,
        status: Option<ExamStatus>,
        page: PageQuery,
    ) -> ExamResult<(Vec<ExamView>, i64)>;

    async fn update_exam(&self, exam: &Exam) -> ExamResult<()>;

    /// Returns false when no such exam exists
    async fn delete_exam(&self, exam_id: &ExamId) -> ExamResult<bool>;
}

/// Form configuration repository trait
#[trait_variant::make(FormConfigRepository: Send)]
pub trait LocalFormConfigRepository {
    async fn find_form_config(&self, exam_id: &ExamId) -> ExamResult<Option<FormConfig>>;

    /// Insert or replace
    async fn save_form_config(&self, config: &FormConfig) -> ExamResult<FormConfig>;
}

/// Application repository trait
#[trait_variant::make(ApplicationRepository: Send)]
pub trait LocalApplicationRepository {
    /// Insert a pending application. Runs
    /// [`Exam::ensure_accepts_registration`] and the duplicate check while
    /// holding a lock on the exam, so concurrent submissions serialize.
    async fn submit_application(
        &self,
        application: &Application,
        now: DateTime<Utc>,
    ) -> ExamResult<()>;

    async fn find_application(
        &self,
        application_id: &ApplicationId,
    ) -> ExamResult<Option<ApplicationView>>;

    /// Most recent submissions first
    async fn list_applications(
        &self,
        filter: ApplicationFilter,
        page: PageQuery,
    ) -> ExamResult<(Vec<ApplicationView>, i64)>;

    /// Write back an application that was pending when loaded. Returns false
    /// if it left `pending` in the meantime.
    async fn update_pending_application(&self, application: &Application) -> ExamResult<bool>;

    /// Delete a still-pending application. Returns false otherwise.
    async fn delete_pending_application(&self, application_id: &ApplicationId)
    -> ExamResult<bool>;
}
