//! Score Import
//!
//! Rows are independent: one bad row is reported and the rest still land.

use kernel::id::{ExamId, UserId};
use serde::Serialize;
use std::sync::Arc;

use crate::domain::entity::Score;
use crate::domain::repository::ScoreRepository;
use crate::domain::value_object::UserRef;
use crate::error::{ScoreError, ScoreResult};

/// One imported result as submitted
#[derive(Debug, Clone, Default)]
pub struct ScoreRow {
    pub user_id: Option<UserId>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub score: Option<f64>,
    pub is_passed: Option<bool>,
}

pub struct ImportScoresInput {
    pub exam_id: ExamId,
    pub rows: Vec<ScoreRow>,
}

/// A row that was not imported; `row` is 1-based
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowError {
    pub row: usize,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportOutcome {
    pub imported_count: usize,
    pub errors: Vec<RowError>,
}

pub struct ImportScoresUseCase<R>
where
    R: ScoreRepository,
{
    repo: Arc<R>,
}

impl<R> ImportScoresUseCase<R>
where
    R: ScoreRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, input: ImportScoresInput) -> ScoreResult<ImportOutcome> {
        if !self.repo.exam_exists(&input.exam_id).await? {
            return Err(ScoreError::ExamNotFound);
        }

        let mut outcome = ImportOutcome::default();
        for (index, row) in input.rows.into_iter().enumerate() {
            match self.import_row(input.exam_id, row).await {
                Ok(()) => outcome.imported_count += 1,
                Err(err) => {
                    if let ScoreError::Database(e) = &err {
                        tracing::warn!(row = index + 1, error = %e, "Score row failed");
                    }
                    outcome.errors.push(RowError {
                        row: index + 1,
                        message: err.to_app_error().public_message().to_string(),
                    });
                }
            }
        }

        tracing::info!(
            exam_id = %input.exam_id,
            imported = outcome.imported_count,
            failed = outcome.errors.len(),
            "Scores imported"
        );

        Ok(outcome)
    }

    async fn import_row(&self, exam_id: ExamId, row: ScoreRow) -> ScoreResult<()> {
        let reference = UserRef::pick(row.user_id, row.username.as_deref(), row.email.as_deref())
            .ok_or_else(|| {
                kernel::error::app_error::AppError::bad_request(
                    "Row needs a user_id, username or email",
                )
            })?;

        let user_id = self.repo.resolve_user(&reference).await?.ok_or_else(|| {
            kernel::error::app_error::AppError::not_found(format!("User not found: {reference}"))
        })?;

        let score = Score::imported(user_id, exam_id, row.score, row.is_passed.unwrap_or(false))?;
        self.repo.upsert_score(&score).await
    }
}
