//! PostgreSQL Repository Implementations

use chrono::{DateTime, Datelike, Utc};
use kernel::id::{CertificateId, ExamId, RenewalApplicationId, TemplateId, UserId};
use kernel::pagination::PageQuery;
use kernel::summary::{ExamSummary, UserSummary};
use serde_json::Value;
use sqlx::PgPool;
use std::collections::HashSet;
use uuid::Uuid;

use crate::domain::entity::{
    Candidate, Certificate, CertificateView, GenerationBatch, IssuingExam, RenewalApplication,
    RenewalDecision, RenewalView, Template, approve_renewal,
};
use crate::domain::repository::{
    CertificateFilter, CertificateRepository, RenewalFilter, RenewalRepository, RenewalReview,
    TemplateRepository,
};
use crate::domain::value_object::{
    CertificateNumber, CertificateStatus, CertificateType, NumberParts, RenewalStatus,
    RenewalType, number_prefix,
};
use crate::error::{CertificateError, CertificateResult};

/// PostgreSQL-backed certificate repository
#[derive(Clone)]
pub struct PgCertificateRepository {
    pool: PgPool,
}

impl PgCertificateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const CERTIFICATE_SELECT: &str = r#"
    SELECT
        certificate_id,
        certificate_number,
        user_id,
        exam_id,
        certificate_type,
        status,
        issue_date,
        expiry_date,
        original_certificate_id,
        original_certificate_number,
        renewal_reason,
        template_id,
        certificate_data,
        certificate_file_path,
        created_at,
        updated_at
    FROM certificates
"#;

const CERTIFICATE_VIEW_SELECT: &str = r#"
    SELECT
        c.certificate_id,
        c.certificate_number,
        c.user_id,
        c.exam_id,
        c.certificate_type,
        c.status,
        c.issue_date,
        c.expiry_date,
        c.original_certificate_id,
        c.original_certificate_number,
        c.renewal_reason,
        c.template_id,
        c.certificate_data,
        c.certificate_file_path,
        c.created_at,
        c.updated_at,
        u.username,
        u.email,
        u.role,
        e.name AS exam_name,
        e.exam_code,
        e.status AS exam_status,
        e.start_time,
        e.end_time
    FROM certificates c
    JOIN users u ON u.user_id = c.user_id
    JOIN exams e ON e.exam_id = c.exam_id
"#;

const RENEWAL_SELECT: &str = r#"
    SELECT
        renewal_application_id,
        user_id,
        original_certificate_id,
        application_type,
        reason,
        supporting_documents,
        status,
        reviewer_id,
        review_comment,
        reviewed_at,
        new_certificate_id,
        submitted_at,
        updated_at
    FROM certificate_renewal_applications
"#;

const RENEWAL_VIEW_SELECT: &str = r#"
    SELECT
        r.renewal_application_id,
        r.user_id,
        r.original_certificate_id,
        r.application_type,
        r.reason,
        r.supporting_documents,
        r.status,
        r.reviewer_id,
        r.review_comment,
        r.reviewed_at,
        r.new_certificate_id,
        r.submitted_at,
        r.updated_at,
        u.username,
        u.email,
        u.role,
        oc.certificate_number AS original_certificate_number,
        nc.certificate_number AS new_certificate_number
    FROM certificate_renewal_applications r
    JOIN users u ON u.user_id = r.user_id
    JOIN certificates oc ON oc.certificate_id = r.original_certificate_id
    LEFT JOIN certificates nc ON nc.certificate_id = r.new_certificate_id
"#;

const TEMPLATE_SELECT: &str = r#"
    SELECT
        template_id,
        name,
        description,
        template_type,
        template_config,
        template_file_path,
        is_default,
        is_active,
        created_at,
        updated_at
    FROM certificate_templates
"#;

// ============================================================================
// Certificate Repository Implementation
// ============================================================================

impl CertificateRepository for PgCertificateRepository {
    async fn find_issuing_exam(&self, exam_id: &ExamId) -> CertificateResult<Option<IssuingExam>> {
        let row = sqlx::query_as::<_, (Uuid, String, String)>(
            "SELECT exam_id, exam_code, name FROM exams WHERE exam_id = $1",
        )
        .bind(exam_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(exam_id, exam_code, name)| IssuingExam {
            exam_id: ExamId::from_uuid(exam_id),
            exam_code,
            name,
        }))
    }

    async fn passing_candidates(&self, exam_id: &ExamId) -> CertificateResult<Vec<Candidate>> {
        let rows = sqlx::query_as::<_, (Uuid, String)>(
            r#"
            SELECT u.user_id, u.username
            FROM exam_scores s
            JOIN users u ON u.user_id = s.user_id
            WHERE s.exam_id = $1
              AND s.is_passed
            ORDER BY u.username_canonical
            "#,
        )
        .bind(exam_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(candidate_from).collect())
    }

    async fn find_candidates(&self, user_ids: &[UserId]) -> CertificateResult<Vec<Candidate>> {
        let ids: Vec<Uuid> = user_ids.iter().map(|id| id.into_uuid()).collect();
        let rows = sqlx::query_as::<_, (Uuid, String)>(
            r#"
            SELECT user_id, username
            FROM users
            WHERE user_id = ANY($1)
            ORDER BY username_canonical
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(candidate_from).collect())
    }

    async fn issue_batch(
        &self,
        batch: &GenerationBatch,
    ) -> CertificateResult<(Vec<Certificate>, usize)> {
        let mut tx = self.pool.begin().await?;

        // Serializes batches per exam so the holder check below stays true
        // until commit
        let locked = sqlx::query_scalar::<_, Uuid>(
            "SELECT exam_id FROM exams WHERE exam_id = $1 FOR UPDATE",
        )
        .bind(batch.exam.exam_id.as_uuid())
        .fetch_optional(&mut *tx)
        .await?;
        if locked.is_none() {
            return Err(CertificateError::ExamNotFound);
        }

        let holders: HashSet<UserId> = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT DISTINCT user_id FROM certificates
            WHERE exam_id = $1
              AND certificate_type = 'initial'
              AND status = 'active'
            "#,
        )
        .bind(batch.exam.exam_id.as_uuid())
        .fetch_all(&mut *tx)
        .await?
        .into_iter()
        .map(UserId::from_uuid)
        .collect();

        let (selected, skipped) = batch.select(&holders);
        let mut issued = Vec::with_capacity(selected.len());
        for candidate in selected {
            let sequence = allocate_sequence(
                &mut tx,
                &batch.exam.exam_id,
                &batch.exam.exam_code,
                batch.year(),
                batch.certificate_type,
            )
            .await?;
            let certificate = batch.certificate_for(candidate, sequence)?;
            insert_certificate_row(&mut tx, &certificate).await?;
            issued.push(certificate);
        }

        tx.commit().await?;
        Ok((issued, skipped))
    }

    async fn import_certificates(
        &self,
        certificates: &[Certificate],
    ) -> CertificateResult<Vec<(usize, CertificateError)>> {
        let mut tx = self.pool.begin().await?;
        let mut failures = Vec::new();

        for (position, certificate) in certificates.iter().enumerate() {
            let mut savepoint = sqlx::Connection::begin(&mut *tx).await?;
            match import_row(&mut savepoint, certificate).await {
                Ok(()) => savepoint.commit().await?,
                Err(err) => {
                    savepoint.rollback().await?;
                    failures.push((position, err));
                }
            }
        }

        tx.commit().await?;
        Ok(failures)
    }

    async fn find_certificate(
        &self,
        certificate_id: &CertificateId,
    ) -> CertificateResult<Option<CertificateView>> {
        let row = sqlx::query_as::<_, CertificateViewRow>(&format!(
            "{CERTIFICATE_VIEW_SELECT} WHERE c.certificate_id = $1"
        ))
        .bind(certificate_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(CertificateViewRow::into_view).transpose()
    }

    async fn find_certificates(
        &self,
        certificate_ids: &[CertificateId],
    ) -> CertificateResult<Vec<CertificateView>> {
        let ids: Vec<Uuid> = certificate_ids.iter().map(|id| id.into_uuid()).collect();
        let rows = sqlx::query_as::<_, CertificateViewRow>(&format!(
            r#"{CERTIFICATE_VIEW_SELECT}
            WHERE c.certificate_id = ANY($1)
            ORDER BY c.certificate_number"#
        ))
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(CertificateViewRow::into_view).collect()
    }

    async fn list_certificates(
        &self,
        filter: CertificateFilter,
        page: PageQuery,
    ) -> CertificateResult<(Vec<CertificateView>, i64)> {
        let user_id = filter.user_id.map(|id| id.into_uuid());
        let exam_id = filter.exam_id.map(|id| id.into_uuid());
        let status = filter.status.map(|s| s.code());
        let certificate_type = filter.certificate_type.map(|t| t.code());

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM certificates c
            WHERE ($1::uuid IS NULL OR c.user_id = $1)
              AND ($2::uuid IS NULL OR c.exam_id = $2)
              AND ($3::text IS NULL OR c.status = $3)
              AND ($4::text IS NULL OR c.certificate_type = $4)
            "#,
        )
        .bind(user_id)
        .bind(exam_id)
        .bind(status)
        .bind(certificate_type)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, CertificateViewRow>(&format!(
            r#"{CERTIFICATE_VIEW_SELECT}
            WHERE ($1::uuid IS NULL OR c.user_id = $1)
              AND ($2::uuid IS NULL OR c.exam_id = $2)
              AND ($3::text IS NULL OR c.status = $3)
              AND ($4::text IS NULL OR c.certificate_type = $4)
            ORDER BY c.created_at DESC, c.certificate_number DESC
            LIMIT $5 OFFSET $6"#
        ))
        .bind(user_id)
        .bind(exam_id)
        .bind(status)
        .bind(certificate_type)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let items = rows
            .into_iter()
            .map(CertificateViewRow::into_view)
            .collect::<CertificateResult<Vec<_>>>()?;
        Ok((items, total))
    }

    async fn revoke_certificate(&self, certificate: &Certificate) -> CertificateResult<bool> {
        let updated = sqlx::query(
            r#"
            UPDATE certificates SET
                status = $2,
                updated_at = $3
            WHERE certificate_id = $1
              AND status IN ('active', 'expired')
            "#,
        )
        .bind(certificate.certificate_id.as_uuid())
        .bind(certificate.status.code())
        .bind(certificate.updated_at)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(updated == 1)
    }

    async fn expire_overdue(&self, now: DateTime<Utc>) -> CertificateResult<u64> {
        let expired = sqlx::query(
            r#"
            UPDATE certificates SET
                status = 'expired',
                updated_at = $1
            WHERE status = 'active'
              AND expiry_date < $1
            "#,
        )
        .bind(now)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(expired)
    }
}

// ============================================================================
// Renewal Repository Implementation
// ============================================================================

impl RenewalRepository for PgCertificateRepository {
    async fn submit_renewal(&self, application: &RenewalApplication) -> CertificateResult<()> {
        sqlx::query(
            r#"
            INSERT INTO certificate_renewal_applications (
                renewal_application_id,
                user_id,
                original_certificate_id,
                application_type,
                reason,
                supporting_documents,
                status,
                reviewer_id,
                review_comment,
                reviewed_at,
                new_certificate_id,
                submitted_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(application.renewal_application_id.as_uuid())
        .bind(application.user_id.as_uuid())
        .bind(application.original_certificate_id.as_uuid())
        .bind(application.application_type.code())
        .bind(&application.reason)
        .bind(&application.supporting_documents)
        .bind(application.status.code())
        .bind(application.reviewer_id.map(|id| id.into_uuid()))
        .bind(&application.review_comment)
        .bind(application.reviewed_at)
        .bind(application.new_certificate_id.map(|id| id.into_uuid()))
        .bind(application.submitted_at)
        .bind(application.updated_at)
        .execute(&self.pool)
        .await
        .map_err(CertificateError::from_constraint)?;

        Ok(())
    }

    async fn find_renewal(
        &self,
        renewal_application_id: &RenewalApplicationId,
    ) -> CertificateResult<Option<RenewalView>> {
        let row = sqlx::query_as::<_, RenewalViewRow>(&format!(
            "{RENEWAL_VIEW_SELECT} WHERE r.renewal_application_id = $1"
        ))
        .bind(renewal_application_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(RenewalViewRow::into_view).transpose()
    }

    async fn list_renewals(
        &self,
        filter: RenewalFilter,
        page: PageQuery,
    ) -> CertificateResult<(Vec<RenewalView>, i64)> {
        let user_id = filter.user_id.map(|id| id.into_uuid());
        let status = filter.status.map(|s| s.code());

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM certificate_renewal_applications r
            WHERE ($1::uuid IS NULL OR r.user_id = $1)
              AND ($2::text IS NULL OR r.status = $2)
            "#,
        )
        .bind(user_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, RenewalViewRow>(&format!(
            r#"{RENEWAL_VIEW_SELECT}
            WHERE ($1::uuid IS NULL OR r.user_id = $1)
              AND ($2::text IS NULL OR r.status = $2)
            ORDER BY r.submitted_at DESC
            LIMIT $3 OFFSET $4"#
        ))
        .bind(user_id)
        .bind(status)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let items = rows
            .into_iter()
            .map(RenewalViewRow::into_view)
            .collect::<CertificateResult<Vec<_>>>()?;
        Ok((items, total))
    }

    async fn review_renewal(&self, review: &RenewalReview) -> CertificateResult<()> {
        let mut tx = self.pool.begin().await?;

        let mut application = sqlx::query_as::<_, RenewalRow>(&format!(
            "{RENEWAL_SELECT} WHERE renewal_application_id = $1 FOR UPDATE"
        ))
        .bind(review.renewal_application_id.as_uuid())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(CertificateError::RenewalNotFound)?
        .into_application()?;
        application.ensure_pending()?;

        match review.decision {
            RenewalDecision::Reject => {
                application.reject(review.reviewer_id, review.comment.clone(), review.now)?;
            }
            RenewalDecision::Approve => {
                let mut original = sqlx::query_as::<_, CertificateRow>(&format!(
                    "{CERTIFICATE_SELECT} WHERE certificate_id = $1 FOR UPDATE"
                ))
                .bind(application.original_certificate_id.as_uuid())
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(CertificateError::CertificateNotFound)?
                .into_certificate()?;
                original.ensure_supersedable()?;

                let exam_code = sqlx::query_scalar::<_, String>(
                    "SELECT exam_code FROM exams WHERE exam_id = $1",
                )
                .bind(original.exam_id.as_uuid())
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(CertificateError::ExamNotFound)?;

                let certificate_type = application.application_type.certificate_type();
                let year = review.now.year();
                let sequence = allocate_sequence(
                    &mut tx,
                    &original.exam_id,
                    &exam_code,
                    year,
                    certificate_type,
                )
                .await?;
                let number = CertificateNumber::compose(&exam_code, year, certificate_type, sequence);

                let successor = approve_renewal(
                    &mut application,
                    &mut original,
                    number,
                    review.reviewer_id,
                    review.comment.clone(),
                    review.validity,
                    review.now,
                )?;
                insert_certificate_row(&mut tx, &successor).await?;

                sqlx::query(
                    "UPDATE certificates SET status = $2, updated_at = $3 WHERE certificate_id = $1",
                )
                .bind(original.certificate_id.as_uuid())
                .bind(original.status.code())
                .bind(original.updated_at)
                .execute(&mut *tx)
                .await?;
            }
        }

        sqlx::query(
            r#"
            UPDATE certificate_renewal_applications SET
                status = $2,
                reviewer_id = $3,
                review_comment = $4,
                reviewed_at = $5,
                new_certificate_id = $6,
                updated_at = $7
            WHERE renewal_application_id = $1
            "#,
        )
        .bind(application.renewal_application_id.as_uuid())
        .bind(application.status.code())
        .bind(application.reviewer_id.map(|id| id.into_uuid()))
        .bind(&application.review_comment)
        .bind(application.reviewed_at)
        .bind(application.new_certificate_id.map(|id| id.into_uuid()))
        .bind(application.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }
}

// ============================================================================
// Template Repository Implementation
// ============================================================================

impl TemplateRepository for PgCertificateRepository {
    async fn find_template(&self, template_id: &TemplateId) -> CertificateResult<Option<Template>> {
        let row = sqlx::query_as::<_, TemplateRow>(&format!(
            "{TEMPLATE_SELECT} WHERE template_id = $1"
        ))
        .bind(template_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(TemplateRow::into_template))
    }

    async fn find_default_template(
        &self,
        template_type: &str,
    ) -> CertificateResult<Option<Template>> {
        let row = sqlx::query_as::<_, TemplateRow>(&format!(
            "{TEMPLATE_SELECT} WHERE template_type = $1 AND is_default AND is_active"
        ))
        .bind(template_type)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(TemplateRow::into_template))
    }

    async fn list_active_templates(&self) -> CertificateResult<Vec<Template>> {
        let rows = sqlx::query_as::<_, TemplateRow>(&format!(
            "{TEMPLATE_SELECT} WHERE is_active ORDER BY is_default DESC, name"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(TemplateRow::into_template).collect())
    }

    async fn create_template(&self, template: &Template) -> CertificateResult<()> {
        let mut tx = self.pool.begin().await?;
        clear_other_defaults(&mut tx, template).await?;

        sqlx::query(
            r#"
            INSERT INTO certificate_templates (
                template_id,
                name,
                description,
                template_type,
                template_config,
                template_file_path,
                is_default,
                is_active,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(template.template_id.as_uuid())
        .bind(&template.name)
        .bind(&template.description)
        .bind(&template.template_type)
        .bind(&template.template_config)
        .bind(&template.template_file_path)
        .bind(template.is_default)
        .bind(template.is_active)
        .bind(template.created_at)
        .bind(template.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(CertificateError::from_constraint)?;

        tx.commit().await?;
        Ok(())
    }

    async fn update_template(&self, template: &Template) -> CertificateResult<()> {
        let mut tx = self.pool.begin().await?;
        clear_other_defaults(&mut tx, template).await?;

        sqlx::query(
            r#"
            UPDATE certificate_templates SET
                name = $2,
                description = $3,
                template_type = $4,
                template_config = $5,
                template_file_path = $6,
                is_default = $7,
                is_active = $8,
                updated_at = $9
            WHERE template_id = $1
            "#,
        )
        .bind(template.template_id.as_uuid())
        .bind(&template.name)
        .bind(&template.description)
        .bind(&template.template_type)
        .bind(&template.template_config)
        .bind(&template.template_file_path)
        .bind(template.is_default)
        .bind(template.is_active)
        .bind(template.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(CertificateError::from_constraint)?;

        tx.commit().await?;
        Ok(())
    }
}

// ============================================================================
// Shared statements
// ============================================================================

/// Next sequence for `{exam_code}-{year}-{type}-`. A missing counter row is
/// seeded from the highest matching number already stored. The row lock the
/// upsert takes serializes concurrent allocations until commit.
async fn allocate_sequence(
    conn: &mut sqlx::PgConnection,
    exam_id: &ExamId,
    exam_code: &str,
    year: i32,
    certificate_type: CertificateType,
) -> CertificateResult<i64> {
    let prefix = number_prefix(exam_code, year, certificate_type);

    let sequence = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO certificate_number_sequences (exam_id, issue_year, type_code, last_value)
        VALUES (
            $1,
            $2,
            $3,
            (
                SELECT COALESCE(MAX(CAST(substr(certificate_number, char_length($4) + 1) AS BIGINT)), 0) + 1
                FROM certificates
                WHERE left(certificate_number, char_length($4)) = $4
                  AND substr(certificate_number, char_length($4) + 1) ~ '^[0-9]{6,18}$'
            )
        )
        ON CONFLICT (exam_id, issue_year, type_code) DO UPDATE SET
            last_value = certificate_number_sequences.last_value + 1
        RETURNING last_value
        "#,
    )
    .bind(exam_id.as_uuid())
    .bind(year)
    .bind(certificate_type.number_code().to_string())
    .bind(&prefix)
    .fetch_one(&mut *conn)
    .await?;

    Ok(sequence)
}

/// Make sure later allocations land above an imported sequence
async fn raise_sequence(
    conn: &mut sqlx::PgConnection,
    exam_id: &ExamId,
    parts: &NumberParts,
) -> CertificateResult<()> {
    sqlx::query(
        r#"
        INSERT INTO certificate_number_sequences (exam_id, issue_year, type_code, last_value)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (exam_id, issue_year, type_code) DO UPDATE SET
            last_value = GREATEST(certificate_number_sequences.last_value, EXCLUDED.last_value)
        "#,
    )
    .bind(exam_id.as_uuid())
    .bind(parts.year)
    .bind(parts.certificate_type.number_code().to_string())
    .bind(parts.sequence)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Imported numbers raise the counter of the exam their prefix names, which
/// need not be the exam the row is filed under.
async fn import_row(
    conn: &mut sqlx::PgConnection,
    certificate: &Certificate,
) -> CertificateResult<()> {
    insert_certificate_row(&mut *conn, certificate).await?;

    let Some(parts) = certificate.certificate_number.parts() else {
        return Ok(());
    };
    let owner = sqlx::query_scalar::<_, Uuid>("SELECT exam_id FROM exams WHERE exam_code = $1")
        .bind(&parts.exam_code)
        .fetch_optional(&mut *conn)
        .await?;

    // Without an owning exam the seed scan covers it once the exam exists
    if let Some(owner) = owner {
        raise_sequence(conn, &ExamId::from_uuid(owner), &parts).await?;
    }
    Ok(())
}

async fn insert_certificate_row(
    conn: &mut sqlx::PgConnection,
    certificate: &Certificate,
) -> CertificateResult<()> {
    sqlx::query(
        r#"
        INSERT INTO certificates (
            certificate_id,
            certificate_number,
            user_id,
            exam_id,
            certificate_type,
            status,
            issue_date,
            expiry_date,
            original_certificate_id,
            original_certificate_number,
            renewal_reason,
            template_id,
            certificate_data,
            certificate_file_path,
            created_at,
            updated_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
        "#,
    )
    .bind(certificate.certificate_id.as_uuid())
    .bind(certificate.certificate_number.as_str())
    .bind(certificate.user_id.as_uuid())
    .bind(certificate.exam_id.as_uuid())
    .bind(certificate.certificate_type.code())
    .bind(certificate.status.code())
    .bind(certificate.issue_date)
    .bind(certificate.expiry_date)
    .bind(certificate.original_certificate_id.map(|id| id.into_uuid()))
    .bind(&certificate.original_certificate_number)
    .bind(&certificate.renewal_reason)
    .bind(certificate.template_id.map(|id| id.into_uuid()))
    .bind(&certificate.certificate_data)
    .bind(&certificate.certificate_file_path)
    .bind(certificate.created_at)
    .bind(certificate.updated_at)
    .execute(conn)
    .await
    .map_err(CertificateError::from_constraint)?;

    Ok(())
}

async fn clear_other_defaults(
    conn: &mut sqlx::PgConnection,
    template: &Template,
) -> CertificateResult<()> {
    if !(template.is_default && template.is_active) {
        return Ok(());
    }

    sqlx::query(
        r#"
        UPDATE certificate_templates SET
            is_default = FALSE,
            updated_at = $3
        WHERE template_type = $1
          AND is_default
          AND template_id <> $2
        "#,
    )
    .bind(&template.template_type)
    .bind(template.template_id.as_uuid())
    .bind(template.updated_at)
    .execute(conn)
    .await?;

    Ok(())
}

fn candidate_from((user_id, username): (Uuid, String)) -> Candidate {
    Candidate {
        user_id: UserId::from_uuid(user_id),
        username,
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct CertificateRow {
    certificate_id: Uuid,
    certificate_number: String,
    user_id: Uuid,
    exam_id: Uuid,
    certificate_type: String,
    status: String,
    issue_date: DateTime<Utc>,
    expiry_date: Option<DateTime<Utc>>,
    original_certificate_id: Option<Uuid>,
    original_certificate_number: Option<String>,
    renewal_reason: Option<String>,
    template_id: Option<Uuid>,
    certificate_data: Value,
    certificate_file_path: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CertificateRow {
    fn into_certificate(self) -> CertificateResult<Certificate> {
        let certificate_type = CertificateType::from_code(&self.certificate_type).ok_or_else(|| {
            CertificateError::Internal(format!(
                "Unknown certificate type: {}",
                self.certificate_type
            ))
        })?;
        let status = CertificateStatus::from_code(&self.status).ok_or_else(|| {
            CertificateError::Internal(format!("Unknown certificate status: {}", self.status))
        })?;

        Ok(Certificate {
            certificate_id: CertificateId::from_uuid(self.certificate_id),
            certificate_number: CertificateNumber::from_stored(self.certificate_number),
            user_id: UserId::from_uuid(self.user_id),
            exam_id: ExamId::from_uuid(self.exam_id),
            certificate_type,
            status,
            issue_date: self.issue_date,
            expiry_date: self.expiry_date,
            original_certificate_id: self.original_certificate_id.map(CertificateId::from_uuid),
            original_certificate_number: self.original_certificate_number,
            renewal_reason: self.renewal_reason,
            template_id: self.template_id.map(TemplateId::from_uuid),
            certificate_data: self.certificate_data,
            certificate_file_path: self.certificate_file_path,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CertificateViewRow {
    #[sqlx(flatten)]
    certificate: CertificateRow,
    username: String,
    email: String,
    role: String,
    exam_name: String,
    exam_code: String,
    exam_status: String,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
}

impl CertificateViewRow {
    fn into_view(self) -> CertificateResult<CertificateView> {
        let certificate = self.certificate.into_certificate()?;

        Ok(CertificateView {
            user: UserSummary {
                id: certificate.user_id,
                username: self.username,
                email: self.email,
                role: self.role,
            },
            exam: ExamSummary {
                id: certificate.exam_id,
                name: self.exam_name,
                exam_code: self.exam_code,
                status: self.exam_status,
                start_time: self.start_time,
                end_time: self.end_time,
            },
            certificate,
        })
    }
}

#[derive(sqlx::FromRow)]
struct RenewalRow {
    renewal_application_id: Uuid,
    user_id: Uuid,
    original_certificate_id: Uuid,
    application_type: String,
    reason: String,
    supporting_documents: Option<Value>,
    status: String,
    reviewer_id: Option<Uuid>,
    review_comment: Option<String>,
    reviewed_at: Option<DateTime<Utc>>,
    new_certificate_id: Option<Uuid>,
    submitted_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RenewalRow {
    fn into_application(self) -> CertificateResult<RenewalApplication> {
        let application_type = RenewalType::from_code(&self.application_type).ok_or_else(|| {
            CertificateError::Internal(format!(
                "Unknown application type: {}",
                self.application_type
            ))
        })?;
        let status = RenewalStatus::from_code(&self.status).ok_or_else(|| {
            CertificateError::Internal(format!("Unknown renewal status: {}", self.status))
        })?;

        Ok(RenewalApplication {
            renewal_application_id: RenewalApplicationId::from_uuid(self.renewal_application_id),
            user_id: UserId::from_uuid(self.user_id),
            original_certificate_id: CertificateId::from_uuid(self.original_certificate_id),
            application_type,
            reason: self.reason,
            supporting_documents: self.supporting_documents,
            status,
            reviewer_id: self.reviewer_id.map(UserId::from_uuid),
            review_comment: self.review_comment,
            reviewed_at: self.reviewed_at,
            new_certificate_id: self.new_certificate_id.map(CertificateId::from_uuid),
            submitted_at: self.submitted_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct RenewalViewRow {
    #[sqlx(flatten)]
    application: RenewalRow,
    username: String,
    email: String,
    role: String,
    original_certificate_number: String,
    new_certificate_number: Option<String>,
}

impl RenewalViewRow {
    fn into_view(self) -> CertificateResult<RenewalView> {
        let application = self.application.into_application()?;

        Ok(RenewalView {
            user: UserSummary {
                id: application.user_id,
                username: self.username,
                email: self.email,
                role: self.role,
            },
            original_certificate_number: self.original_certificate_number,
            new_certificate_number: self.new_certificate_number,
            application,
        })
    }
}

#[derive(sqlx::FromRow)]
struct TemplateRow {
    template_id: Uuid,
    name: String,
    description: Option<String>,
    template_type: String,
    template_config: Value,
    template_file_path: Option<String>,
    is_default: bool,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TemplateRow {
    fn into_template(self) -> Template {
        Template {
            template_id: TemplateId::from_uuid(self.template_id),
            name: self.name,
            description: self.description,
            template_type: self.template_type,
            template_config: self.template_config,
            template_file_path: self.template_file_path,
            is_default: self.is_default,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
