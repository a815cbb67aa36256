//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::id::{ExamId, ScoreId, UserId};
use kernel::pagination::PageQuery;

use crate::domain::entity::{Score, ScoreView};
use crate::domain::value_object::UserRef;
use crate::error::ScoreResult;

/// Score repository trait
#[trait_variant::make(ScoreRepository: Send)]
pub trait LocalScoreRepository {
    async fn exam_exists(&self, exam_id: &ExamId) -> ScoreResult<bool>;

    async fn resolve_user(&self, user: &UserRef) -> ScoreResult<Option<UserId>>;

    /// Insert, or overwrite the result already held for (user, exam).
    /// An overwrite keeps the stored id.
    async fn upsert_score(&self, score: &Score) -> ScoreResult<()>;

    async fn find_score(&self, score_id: &ScoreId) -> ScoreResult<Option<ScoreView>>;

    async fn list_exam_scores(
        &self,
        exam_id: &ExamId,
        page: PageQuery,
    ) -> ScoreResult<(Vec<ScoreView>, i64)>;

    /// Newest exams first
    async fn list_user_scores(&self, user_id: &UserId) -> ScoreResult<Vec<ScoreView>>;

    async fn update_score(&self, score: &Score) -> ScoreResult<()>;

    /// Returns false when no such score exists
    async fn delete_score(&self, score_id: &ScoreId) -> ScoreResult<bool>;
}
