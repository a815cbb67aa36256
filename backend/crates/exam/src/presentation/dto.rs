//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use kernel::id::{ApplicationId, ExamId};
use kernel::pagination::PageQuery;
use kernel::summary::{ExamSummary, UserSummary};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::FormConfigView;
use crate::domain::entity::{ApplicationView, ExamChanges};
use crate::domain::repository::ExamView;
use crate::domain::value_object::{ApplicationStatus, ExamStatus};

// ============================================================================
// Exams
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExamListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub status: Option<ExamStatus>,
}

impl ExamListQuery {
    pub fn page_query(&self) -> PageQuery {
        PageQuery::new(self.page, self.per_page)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateExamRequest {
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

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateExamRequest {
    pub name: Option<String>,
    pub exam_code: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub registration_start: Option<DateTime<Utc>>,
    pub registration_end: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub exam_type: Option<String>,
    pub organizer: Option<String>,
    pub description: Option<String>,
    pub status: Option<ExamStatus>,
    pub max_applicants: Option<u32>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
}

impl From<UpdateExamRequest> for ExamChanges {
    fn from(req: UpdateExamRequest) -> Self {
        Self {
            name: req.name,
            exam_code: req.exam_code,
            start_time: req.start_time,
            end_time: req.end_time,
            registration_start: req.registration_start,
            registration_end: req.registration_end,
            location: req.location,
            exam_type: req.exam_type,
            organizer: req.organizer,
            description: req.description,
            status: req.status,
            max_applicants: req.max_applicants,
            contact_phone: req.contact_phone,
            contact_email: req.contact_email,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExamResponse {
    pub id: ExamId,
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
    pub status: ExamStatus,
    pub max_applicants: u32,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    /// Pending plus approved applications
    pub application_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ExamView> for ExamResponse {
    fn from(view: ExamView) -> Self {
        let exam = view.exam;
        Self {
            id: exam.exam_id,
            name: exam.name,
            exam_code: exam.exam_code.as_str().to_string(),
            start_time: exam.schedule.start(),
            end_time: exam.schedule.end(),
            registration_start: exam.registration.start(),
            registration_end: exam.registration.end(),
            location: exam.location,
            exam_type: exam.exam_type,
            organizer: exam.organizer,
            description: exam.description,
            status: exam.status,
            max_applicants: exam.max_applicants,
            contact_phone: exam.contact_phone,
            contact_email: exam.contact_email,
            application_count: view.application_count,
            created_at: exam.created_at,
            updated_at: exam.updated_at,
        }
    }
}

// ============================================================================
// Form configuration
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct SaveFormConfigRequest {
    #[serde(alias = "config_json")]
    pub config: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct FormConfigResponse {
    pub exam_id: ExamId,
    pub config: Value,
    pub is_default: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<FormConfigView> for FormConfigResponse {
    fn from(view: FormConfigView) -> Self {
        Self {
            exam_id: view.exam_id,
            config: view.config,
            is_default: view.is_default,
            updated_at: view.updated_at,
        }
    }
}

// ============================================================================
// Applications
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicationListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub status: Option<ApplicationStatus>,
}

impl ApplicationListQuery {
    pub fn page_query(&self) -> PageQuery {
        PageQuery::new(self.page, self.per_page)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitApplicationRequest {
    pub exam_id: ExamId,
    #[serde(default)]
    pub application_data: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateApplicationRequest {
    pub application_data: Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApproveApplicationRequest {
    pub admission_ticket_path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RejectApplicationRequest {
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplicationResponse {
    pub id: ApplicationId,
    pub user_id: kernel::id::UserId,
    pub exam_id: ExamId,
    pub application_data: Value,
    pub status: ApplicationStatus,
    pub admission_ticket_path: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub rejected_reason: Option<String>,
    pub updated_at: DateTime<Utc>,
    pub user: UserSummary,
    pub exam: ExamSummary,
}

impl From<ApplicationView> for ApplicationResponse {
    fn from(view: ApplicationView) -> Self {
        let app = view.application;
        Self {
            id: app.application_id,
            user_id: app.user_id,
            exam_id: app.exam_id,
            application_data: app.application_data,
            status: app.status,
            admission_ticket_path: app.admission_ticket_path,
            submitted_at: app.submitted_at,
            reviewed_at: app.reviewed_at,
            rejected_reason: app.rejected_reason,
            updated_at: app.updated_at,
            user: view.user,
            exam: view.exam,
        }
    }
}
