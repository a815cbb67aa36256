//! Exam Application Entity
//!
//! A candidate's registration for one exam. Editable and withdrawable only
//! while pending; review moves it to approved or rejected.

use chrono::{DateTime, Utc};
use kernel::error::app_error::{AppError, AppResult};
use kernel::id::{ApplicationId, ExamId, UserId};
use kernel::summary::{ExamSummary, UserSummary};
use serde_json::Value;

use crate::domain::value_object::ApplicationStatus;
use crate::error::{ExamError, ExamResult};

#[derive(Debug, Clone)]
pub struct Application {
    pub application_id: ApplicationId,
    pub user_id: UserId,
    pub exam_id: ExamId,
    /// Answers to the exam's registration form
    pub application_data: Value,
    pub status: ApplicationStatus,
    pub admission_ticket_path: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub rejected_reason: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Application with its owner and exam inlined
#[derive(Debug, Clone)]
pub struct ApplicationView {
    pub application: Application,
    pub user: UserSummary,
    pub exam: ExamSummary,
}

impl Application {
    pub fn new(user_id: UserId, exam_id: ExamId, data: Value) -> AppResult<Self> {
        let now = Utc::now();
        Ok(Self {
            application_id: ApplicationId::new(),
            user_id,
            exam_id,
            application_data: form_data(data)?,
            status: ApplicationStatus::Pending,
            admission_ticket_path: None,
            submitted_at: now,
            reviewed_at: None,
            rejected_reason: None,
            updated_at: now,
        })
    }

    pub fn ensure_pending(&self) -> ExamResult<()> {
        if self.status == ApplicationStatus::Pending {
            Ok(())
        } else {
            Err(ExamError::ApplicationNotPending)
        }
    }

    pub fn replace_data(&mut self, data: Value) -> ExamResult<()> {
        self.ensure_pending()?;
        self.application_data = form_data(data)?;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn approve(&mut self, admission_ticket_path: Option<String>) -> ExamResult<()> {
        self.ensure_pending()?;
        let now = Utc::now();
        self.status = ApplicationStatus::Approved;
        self.admission_ticket_path = admission_ticket_path
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());
        self.reviewed_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    pub fn reject(&mut self, reason: Option<String>) -> ExamResult<()> {
        self.ensure_pending()?;
        let now = Utc::now();
        self.status = ApplicationStatus::Rejected;
        self.rejected_reason = reason.map(|r| r.trim().to_string()).filter(|r| !r.is_empty());
        self.reviewed_at = Some(now);
        self.updated_at = now;
        Ok(())
    }
}

/// Form answers are a JSON object; `null` means no answers yet
fn form_data(data: Value) -> AppResult<Value> {
    match data {
        Value::Null => Ok(Value::Object(Default::default())),
        Value::Object(_) => Ok(data),
        _ => Err(AppError::bad_request("application_data must be a JSON object")),
    }
}
