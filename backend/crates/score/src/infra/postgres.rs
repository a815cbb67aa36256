//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::id::{ExamId, ScoreId, UserId};
use kernel::pagination::PageQuery;
use kernel::summary::{ExamSummary, UserSummary};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{Score, ScoreView};
use crate::domain::repository::ScoreRepository;
use crate::domain::value_object::{Points, UserRef};
use crate::error::ScoreResult;

/// PostgreSQL-backed score repository
#[derive(Clone)]
pub struct PgScoreRepository {
    pool: PgPool,
}

impl PgScoreRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SCORE_VIEW_SELECT: &str = r#"
    SELECT
        s.score_id,
        s.user_id,
        s.exam_id,
        s.score,
        s.is_passed,
        s.imported_at,
        s.updated_at,
        u.username,
        u.email,
        u.role,
        e.name AS exam_name,
        e.exam_code,
        e.status AS exam_status,
        e.start_time,
        e.end_time
    FROM exam_scores s
    JOIN users u ON u.user_id = s.user_id
    JOIN exams e ON e.exam_id = s.exam_id
"#;

// ============================================================================
// Score Repository Implementation
// ============================================================================

impl ScoreRepository for PgScoreRepository {
    async fn exam_exists(&self, exam_id: &ExamId) -> ScoreResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM exams WHERE exam_id = $1)",
        )
        .bind(exam_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn resolve_user(&self, user: &UserRef) -> ScoreResult<Option<UserId>> {
        let query = match user {
            UserRef::Id(id) => {
                sqlx::query_scalar::<_, Uuid>("SELECT user_id FROM users WHERE user_id = $1")
                    .bind(id.into_uuid())
            }
            UserRef::Username(name) => sqlx::query_scalar::<_, Uuid>(
                "SELECT user_id FROM users WHERE username_canonical = $1",
            )
            .bind(name.clone()),
            UserRef::Email(email) => {
                sqlx::query_scalar::<_, Uuid>("SELECT user_id FROM users WHERE email = $1")
                    .bind(email.clone())
            }
        };

        let user_id = query.fetch_optional(&self.pool).await?;
        Ok(user_id.map(UserId::from_uuid))
    }

    async fn upsert_score(&self, score: &Score) -> ScoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO exam_scores (
                score_id,
                user_id,
                exam_id,
                score,
                is_passed,
                imported_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (user_id, exam_id) DO UPDATE SET
                score = EXCLUDED.score,
                is_passed = EXCLUDED.is_passed,
                imported_at = EXCLUDED.imported_at,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(score.score_id.as_uuid())
        .bind(score.user_id.as_uuid())
        .bind(score.exam_id.as_uuid())
        .bind(score.score.map(|p| p.value()))
        .bind(score.is_passed)
        .bind(score.imported_at)
        .bind(score.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_score(&self, score_id: &ScoreId) -> ScoreResult<Option<ScoreView>> {
        let row = sqlx::query_as::<_, ScoreViewRow>(&format!(
            "{SCORE_VIEW_SELECT} WHERE s.score_id = $1"
        ))
        .bind(score_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ScoreViewRow::into_view))
    }

    async fn list_exam_scores(
        &self,
        exam_id: &ExamId,
        page: PageQuery,
    ) -> ScoreResult<(Vec<ScoreView>, i64)> {
        let total =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM exam_scores WHERE exam_id = $1")
                .bind(exam_id.as_uuid())
                .fetch_one(&self.pool)
                .await?;

        let rows = sqlx::query_as::<_, ScoreViewRow>(&format!(
            "{SCORE_VIEW_SELECT} WHERE s.exam_id = $1 \
             ORDER BY u.username_canonical ASC LIMIT $2 OFFSET $3"
        ))
        .bind(exam_id.as_uuid())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((rows.into_iter().map(ScoreViewRow::into_view).collect(), total))
    }

    async fn list_user_scores(&self, user_id: &UserId) -> ScoreResult<Vec<ScoreView>> {
        let rows = sqlx::query_as::<_, ScoreViewRow>(&format!(
            "{SCORE_VIEW_SELECT} WHERE s.user_id = $1 ORDER BY e.start_time DESC"
        ))
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ScoreViewRow::into_view).collect())
    }

    async fn update_score(&self, score: &Score) -> ScoreResult<()> {
        sqlx::query(
            r#"
            UPDATE exam_scores SET
                score = $2,
                is_passed = $3,
                updated_at = $4
            WHERE score_id = $1
            "#,
        )
        .bind(score.score_id.as_uuid())
        .bind(score.score.map(|p| p.value()))
        .bind(score.is_passed)
        .bind(score.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_score(&self, score_id: &ScoreId) -> ScoreResult<bool> {
        let result = sqlx::query("DELETE FROM exam_scores WHERE score_id = $1")
            .bind(score_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// Row types
// ============================================================================

#[derive(sqlx::FromRow)]
struct ScoreViewRow {
    score_id: Uuid,
    user_id: Uuid,
    exam_id: Uuid,
    score: Option<f64>,
    is_passed: bool,
    imported_at: DateTime<Utc>,
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

impl ScoreViewRow {
    fn into_view(self) -> ScoreView {
        let user_id = UserId::from_uuid(self.user_id);
        let exam_id = ExamId::from_uuid(self.exam_id);

        ScoreView {
            score: Score {
                score_id: ScoreId::from_uuid(self.score_id),
                user_id,
                exam_id,
                score: self.score.map(Points::from_stored),
                is_passed: self.is_passed,
                imported_at: self.imported_at,
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
        }
    }
}
