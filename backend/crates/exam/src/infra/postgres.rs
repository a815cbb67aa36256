//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::id::{ApplicationId, ExamId, UserId};
use kernel::pagination::PageQuery;
use kernel::summary::{ExamSummary, UserSummary};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{Application, ApplicationView, Exam, FormConfig};
use crate::domain::repository::{
    ApplicationFilter, ApplicationRepository, ExamRepository, ExamView, FormConfigRepository,
};
use crate::domain::value_object::{ApplicationStatus, ExamCode, ExamStatus, TimeWindow};
use crate::error::{ExamError, ExamResult};

/// PostgreSQL-backed exam repository
#[derive(Clone)]
pub struct PgExamRepository {
    pool: PgPool,
}

impl PgExamRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const EXAM_VIEW_SELECT: &str = r#"
    SELECT
        e.exam_id,
        e.name,
        e.exam_code,
        e.start_time,
        e.end_time,
        e.registration_start,
        e.registration_end,
        e.location,
        e.exam_type,
        e.organizer,
        e.description,
        e.status,
        e.max_applicants,
        e.contact_phone,
        e.contact_email,
        e.created_at,
        e.updated_at,
        (
            SELECT COUNT(*)
            FROM exam_applications a
            WHERE a.exam_id = e.exam_id
              AND a.status IN ('pending', 'approved')
        ) AS application_count
    FROM exams e
"#;

const APPLICATION_VIEW_SELECT: &str = r#"
    SELECT
        a.application_id,
        a.user_id,
        a.exam_id,
        a.application_data,
        a.status,
        a.admission_ticket_path,
        a.submitted_at,
        a.reviewed_at,
        a.rejected_reason,
        a.updated_at,
        u.username,
        u.email,
        u.role,
        e.name AS exam_name,
        e.exam_code,
        e.status AS exam_status,
        e.start_time,
        e.end_time
    FROM exam_applications a
    JOIN users u ON u.user_id = a.user_id
    JOIN exams e ON e.exam_id = a.exam_id
"#;

// ============================================================================
// Exam Repository Implementation
// ============================================================================

impl ExamRepository for PgExamRepository {
    async fn create_exam(&self, exam: &Exam) -> ExamResult<()> {
        sqlx::query(
            r#"
            INSERT INTO exams (
                exam_id,
                name,
                exam_code,
                start_time,
                end_time,
                registration_start,
                registration_end,
                location,
                exam_type,
                organizer,
                description,
                status,
                max_applicants,
                contact_phone,
                contact_email,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            "#,
        )
        .bind(exam.exam_id.as_uuid())
        .bind(&exam.name)
        .bind(exam.exam_code.as_str())
        .bind(exam.schedule.start())
        .bind(exam.schedule.end())
        .bind(exam.registration.start())
        .bind(exam.registration.end())
        .bind(&exam.location)
        .bind(&exam.exam_type)
        .bind(&exam.organizer)
        .bind(&exam.description)
        .bind(exam.status.code())
        .bind(exam.max_applicants as i32)
        .bind(&exam.contact_phone)
        .bind(&exam.contact_email)
        .bind(exam.created_at)
        .bind(exam.updated_at)
        .execute(&self.pool)
        .await
        .map_err(ExamError::from_constraint)?;

        Ok(())
    }

    async fn find_exam(&self, exam_id: &ExamId) -> ExamResult<Option<ExamView>> {
        let row = sqlx::query_as::<_, ExamViewRow>(&format!(
            "{EXAM_VIEW_SELECT} WHERE e.exam_id = $1"
        ))
        .bind(exam_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(ExamViewRow::into_view).transpose()
    }

    async fn list_exams(
        &self,
        status: Option<ExamStatus>,
        page: PageQuery,
    ) -> ExamResult<(Vec<ExamView>, i64)> {
        let status = status.map(|s| s.code());

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM exams WHERE ($1::text IS NULL OR status = $1)",
        )
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, ExamViewRow>(&format!(
            r#"{EXAM_VIEW_SELECT}
            WHERE ($1::text IS NULL OR e.status = $1)
            ORDER BY e.created_at DESC
            LIMIT $2 OFFSET $3"#
        ))
        .bind(status)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let items = rows
            .into_iter()
            .map(ExamViewRow::into_view)
            .collect::<ExamResult<Vec<_>>>()?;
        Ok((items, total))
    }

    async fn update_exam(&self, exam: &Exam) -> ExamResult<()> {
        sqlx::query(
            r#"
            UPDATE exams SET
                name = $2,
                start_time = $3,
                end_time = $4,
                registration_start = $5,
                registration_end = $6,
                location = $7,
                exam_type = $8,
                organizer = $9,
                description = $10,
                status = $11,
                max_applicants = $12,
                contact_phone = $13,
                contact_email = $14,
                updated_at = $15
            WHERE exam_id = $1
            "#,
        )
        .bind(exam.exam_id.as_uuid())
        .bind(&exam.name)
        .bind(exam.schedule.start())
        .bind(exam.schedule.end())
        .bind(exam.registration.start())
        .bind(exam.registration.end())
        .bind(&exam.location)
        .bind(&exam.exam_type)
        .bind(&exam.organizer)
        .bind(&exam.description)
        .bind(exam.status.code())
        .bind(exam.max_applicants as i32)
        .bind(&exam.contact_phone)
        .bind(&exam.contact_email)
        .bind(exam.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_exam(&self, exam_id: &ExamId) -> ExamResult<bool> {
        let deleted = sqlx::query("DELETE FROM exams WHERE exam_id = $1")
            .bind(exam_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(ExamError::from_constraint)?
            .rows_affected();

        Ok(deleted > 0)
    }
}

// ============================================================================
// Form Config Repository Implementation
// ============================================================================

impl FormConfigRepository for PgExamRepository {
    async fn find_form_config(&self, exam_id: &ExamId) -> ExamResult<Option<FormConfig>> {
        let row = sqlx::query_as::<_, FormConfigRow>(
            r#"
            SELECT exam_id, config, created_at, updated_at
            FROM exam_form_configs
            WHERE exam_id = $1
            "#,
        )
        .bind(exam_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(FormConfigRow::into_form_config))
    }

    async fn save_form_config(&self, config: &FormConfig) -> ExamResult<FormConfig> {
        let row = sqlx::query_as::<_, FormConfigRow>(
            r#"
            INSERT INTO exam_form_configs (exam_id, config, created_at, updated_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (exam_id) DO UPDATE SET
                config = EXCLUDED.config,
                updated_at = EXCLUDED.updated_at
            RETURNING exam_id, config, created_at, updated_at
            "#,
        )
        .bind(config.exam_id.as_uuid())
        .bind(&config.config)
        .bind(config.created_at)
        .bind(config.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_form_config())
    }
}

// ============================================================================
// Application Repository Implementation
// ============================================================================

impl ApplicationRepository for PgExamRepository {
    async fn submit_application(
        &self,
        application: &Application,
        now: DateTime<Utc>,
    ) -> ExamResult<()> {
        let mut tx = self.pool.begin().await?;

        // Serializes submissions per exam until commit
        let exam = sqlx::query_as::<_, ExamRow>(
            r#"
            SELECT
                exam_id,
                name,
                exam_code,
                start_time,
                end_time,
                registration_start,
                registration_end,
                location,
                exam_type,
                organizer,
                description,
                status,
                max_applicants,
                contact_phone,
                contact_email,
                created_at,
                updated_at
            FROM exams
            WHERE exam_id = $1
            FOR UPDATE
            "#,
        )
        .bind(application.exam_id.as_uuid())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(ExamError::ExamNotFound)?
        .into_exam()?;

        let already_applied = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM exam_applications
                WHERE user_id = $1
                  AND exam_id = $2
                  AND status IN ('pending', 'approved')
            )
            "#,
        )
        .bind(application.user_id.as_uuid())
        .bind(application.exam_id.as_uuid())
        .fetch_one(&mut *tx)
        .await?;

        if already_applied {
            return Err(ExamError::AlreadyApplied);
        }

        let active = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM exam_applications
            WHERE exam_id = $1
              AND status IN ('pending', 'approved')
            "#,
        )
        .bind(application.exam_id.as_uuid())
        .fetch_one(&mut *tx)
        .await?;

        exam.ensure_accepts_registration(now, active)?;

        sqlx::query(
            r#"
            INSERT INTO exam_applications (
                application_id,
                user_id,
                exam_id,
                application_data,
                status,
                admission_ticket_path,
                submitted_at,
                reviewed_at,
                rejected_reason,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(application.application_id.as_uuid())
        .bind(application.user_id.as_uuid())
        .bind(application.exam_id.as_uuid())
        .bind(&application.application_data)
        .bind(application.status.code())
        .bind(&application.admission_ticket_path)
        .bind(application.submitted_at)
        .bind(application.reviewed_at)
        .bind(&application.rejected_reason)
        .bind(application.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(ExamError::from_constraint)?;

        tx.commit().await?;
        Ok(())
    }

    async fn find_application(
        &self,
        application_id: &ApplicationId,
    ) -> ExamResult<Option<ApplicationView>> {
        let row = sqlx::query_as::<_, ApplicationViewRow>(&format!(
            "{APPLICATION_VIEW_SELECT} WHERE a.application_id = $1"
        ))
        .bind(application_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(ApplicationViewRow::into_view).transpose()
    }

    async fn list_applications(
        &self,
        filter: ApplicationFilter,
        page: PageQuery,
    ) -> ExamResult<(Vec<ApplicationView>, i64)> {
        let user_id = filter.user_id.map(|id| id.into_uuid());
        let exam_id = filter.exam_id.map(|id| id.into_uuid());
        let status = filter.status.map(|s| s.code());

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM exam_applications a
            WHERE ($1::uuid IS NULL OR a.user_id = $1)
              AND ($2::uuid IS NULL OR a.exam_id = $2)
              AND ($3::text IS NULL OR a.status = $3)
            "#,
        )
        .bind(user_id)
        .bind(exam_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, ApplicationViewRow>(&format!(
            r#"{APPLICATION_VIEW_SELECT}
            WHERE ($1::uuid IS NULL OR a.user_id = $1)
              AND ($2::uuid IS NULL OR a.exam_id = $2)
              AND ($3::text IS NULL OR a.status = $3)
            ORDER BY a.submitted_at DESC
            LIMIT $4 OFFSET $5"#
        ))
        .bind(user_id)
        .bind(exam_id)
        .bind(status)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let items = rows
            .into_iter()
            .map(ApplicationViewRow::into_view)
            .collect::<ExamResult<Vec<_>>>()?;
        Ok((items, total))
    }

    async fn update_pending_application(&self, application: &Application) -> ExamResult<bool> {
        let updated = sqlx::query(
            r#"
            UPDATE exam_applications SET
                application_data = $2,
                status = $3,
                admission_ticket_path = $4,
                reviewed_at = $5,
                rejected_reason = $6,
                updated_at = $7
            WHERE application_id = $1
              AND status = 'pending'
            "#,
        )
        .bind(application.application_id.as_uuid())
        .bind(&application.application_data)
        .bind(application.status.code())
        .bind(&application.admission_ticket_path)
        .bind(application.reviewed_at)
        .bind(&application.rejected_reason)
        .bind(application.updated_at)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(updated == 1)
    }

    async fn delete_pending_application(
        &self,
        application_id: &ApplicationId,
    ) -> ExamResult<bool> {
        let deleted = sqlx::query(
            "DELETE FROM exam_applications WHERE application_id = $1 AND status = 'pending'",
        )
        .bind(application_id.as_uuid())
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(deleted == 1)
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct ExamRow {
    exam_id: Uuid,
    name: String,
    exam_code: String,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    registration_start: DateTime<Utc>,
    registration_end: DateTime<Utc>,
    location: Option<String>,
    exam_type: Option<String>,
    organizer: Option<String>,
    description: Option<String>,
    status: String,
    max_applicants: i32,
    contact_phone: Option<String>,
    contact_email: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ExamRow {
    fn into_exam(self) -> ExamResult<Exam> {
        let status = ExamStatus::from_code(&self.status)
            .ok_or_else(|| ExamError::Internal(format!("Unknown exam status: {}", self.status)))?;

        Ok(Exam {
            exam_id: ExamId::from_uuid(self.exam_id),
            name: self.name,
            exam_code: ExamCode::from_stored(self.exam_code),
            schedule: TimeWindow::from_stored(self.start_time, self.end_time),
            registration: TimeWindow::from_stored(self.registration_start, self.registration_end),
            location: self.location,
            exam_type: self.exam_type,
            organizer: self.organizer,
            description: self.description,
            status,
            max_applicants: self.max_applicants.max(0) as u32,
            contact_phone: self.contact_phone,
            contact_email: self.contact_email,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ExamViewRow {
    #[sqlx(flatten)]
    exam: ExamRow,
    application_count: i64,
}

impl ExamViewRow {
    fn into_view(self) -> ExamResult<ExamView> {
        Ok(ExamView {
            exam: self.exam.into_exam()?,
            application_count: self.application_count,
        })
    }
}

#[derive(sqlx::FromRow)]
struct FormConfigRow {
    exam_id: Uuid,
    config: Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl FormConfigRow {
    fn into_form_config(self) -> FormConfig {
        FormConfig {
            exam_id: ExamId::from_uuid(self.exam_id),
            config: self.config,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ApplicationViewRow {
    application_id: Uuid,
    user_id: Uuid,
    exam_id: Uuid,
    application_data: Value,
    status: String,
    admission_ticket_path: Option<String>,
    submitted_at: DateTime<Utc>,
    reviewed_at: Option<DateTime<Utc>>,
    rejected_reason: Option<String>,
    updated_at: DateTime<Utc>,
    username: String,
    email: String,
    role: String,
    exam_name: String,
    exam_code: String,
    exam_status: String,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
}

impl ApplicationViewRow {
    fn into_view(self) -> ExamResult<ApplicationView> {
        let status = ApplicationStatus::from_code(&self.status).ok_or_else(|| {
            ExamError::Internal(format!("Unknown application status: {}", self.status))
        })?;
        let user_id = UserId::from_uuid(self.user_id);
        let exam_id = ExamId::from_uuid(self.exam_id);

        Ok(ApplicationView {
            application: Application {
                application_id: ApplicationId::from_uuid(self.application_id),
                user_id,
                exam_id,
                application_data: self.application_data,
                status,
                admission_ticket_path: self.admission_ticket_path,
                submitted_at: self.submitted_at,
                reviewed_at: self.reviewed_at,
                rejected_reason: self.rejected_reason,
                updated_at: self.updated_at,
            },
            user: UserSummary {
                id: user_id,
                username: self.username,
                email: self.email,
                role: self.role,
            },
            exam: ExamSummary {
                id: exam_id,
                name: self.exam_name,
                exam_code: self.exam_code,
                status: self.exam_status,
                start_time: self.start_time,
                end_time: self.end_time,
            },
        })
    }
}
