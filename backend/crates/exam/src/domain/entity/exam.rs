//! Exam Entity

use chrono::{DateTime, Utc};
use kernel::error::app_error::{AppError, AppResult};
use kernel::id::ExamId;
use kernel::summary::ExamSummary;

use crate::domain::value_object::{ExamCode, ExamStatus, TimeWindow};
use crate::error::{ExamError, ExamResult};

const NAME_MAX_LENGTH: usize = 200;

#[derive(Debug, Clone)]
pub struct Exam {
    pub exam_id: ExamId,
    pub name: String,
    pub exam_code: ExamCode,
    /// When the exam itself takes place
    pub schedule: TimeWindow,
    /// When candidates may apply
    pub registration: TimeWindow,
    pub location: Option<String>,
    pub exam_type: Option<String>,
    pub organizer: Option<String>,
    pub description: Option<String>,
    pub status: ExamStatus,
    /// 0 means unlimited
    pub max_applicants: u32,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields of a new exam, as validated input
#[derive(Debug, Clone)]
pub struct NewExam {
    pub name: String,
    pub exam_code: ExamCode,
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
}

/// Partial update. `None` leaves a field alone; a blank string clears an
/// optional text field.
#[derive(Debug, Clone, Default)]
pub struct ExamChanges {
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

impl Exam {
    pub fn create(new: NewExam) -> AppResult<Self> {
        let now = Utc::now();
        Ok(Self {
            exam_id: ExamId::new(),
            name: validate_name(&new.name)?,
            exam_code: new.exam_code,
            schedule: TimeWindow::new(new.start_time, new.end_time, "Exam")?,
            registration: TimeWindow::new(
                new.registration_start,
                new.registration_end,
                "Registration",
            )?,
            location: non_blank(new.location),
            exam_type: non_blank(new.exam_type),
            organizer: non_blank(new.organizer),
            description: non_blank(new.description),
            status: new.status,
            max_applicants: validate_capacity(new.max_applicants)?,
            contact_phone: non_blank(new.contact_phone),
            contact_email: non_blank(new.contact_email),
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a partial update; both windows are re-checked on the merged values
    pub fn apply(&mut self, changes: ExamChanges) -> ExamResult<()> {
        if let Some(code) = changes.exam_code {
            if ExamCode::new(&code)? != self.exam_code {
                return Err(ExamError::ExamCodeImmutable);
            }
        }

        let schedule = TimeWindow::new(
            changes.start_time.unwrap_or(self.schedule.start()),
            changes.end_time.unwrap_or(self.schedule.end()),
            "Exam",
        )?;
        let registration = TimeWindow::new(
            changes
                .registration_start
                .unwrap_or(self.registration.start()),
            changes.registration_end.unwrap_or(self.registration.end()),
            "Registration",
        )?;

        let name = changes.name.as_deref().map(validate_name).transpose()?;
        let max_applicants = changes.max_applicants.map(validate_capacity).transpose()?;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(max) = max_applicants {
            self.max_applicants = max;
        }
        if let Some(status) = changes.status {
            self.status = status;
        }

        replace_text(&mut self.location, changes.location);
        replace_text(&mut self.exam_type, changes.exam_type);
        replace_text(&mut self.organizer, changes.organizer);
        replace_text(&mut self.description, changes.description);
        replace_text(&mut self.contact_phone, changes.contact_phone);
        replace_text(&mut self.contact_email, changes.contact_email);

        self.schedule = schedule;
        self.registration = registration;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Whether a candidate may apply at `now` given the number of pending
    /// and approved applications already held
    pub fn ensure_accepts_registration(
        &self,
        now: DateTime<Utc>,
        active_applications: i64,
    ) -> ExamResult<()> {
        if self.status != ExamStatus::Published {
            return Err(ExamError::ExamNotPublished);
        }
        if !self.registration.has_started(now) {
            return Err(ExamError::RegistrationNotStarted);
        }
        if self.registration.has_ended(now) {
            return Err(ExamError::RegistrationEnded);
        }
        if self.max_applicants > 0 && active_applications >= i64::from(self.max_applicants) {
            return Err(ExamError::ExamFull);
        }
        Ok(())
    }

    pub fn summary(&self) -> ExamSummary {
        ExamSummary {
            id: self.exam_id,
            name: self.name.clone(),
            exam_code: self.exam_code.as_str().to_string(),
            status: self.status.code().to_string(),
            start_time: self.schedule.start(),
            end_time: self.schedule.end(),
        }
    }
}

fn validate_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("Exam name is required"));
    }
    if name.chars().count() > NAME_MAX_LENGTH {
        return Err(AppError::bad_request(format!(
            "Exam name must be at most {NAME_MAX_LENGTH} characters"
        )));
    }
    Ok(name.to_string())
}

fn validate_capacity(max: u32) -> AppResult<u32> {
    if max > i32::MAX as u32 {
        return Err(AppError::bad_request("max_applicants is too large"));
    }
    Ok(max)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn replace_text(field: &mut Option<String>, change: Option<String>) {
    if change.is_some() {
        *field = non_blank(change);
    }
}
