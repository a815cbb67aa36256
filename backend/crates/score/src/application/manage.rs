//! Score Queries and Corrections

use kernel::id::{ExamId, ScoreId};
use kernel::pagination::{Page, PageQuery};
use kernel::principal::Principal;
use std::sync::Arc;

use crate::domain::entity::{ScoreChanges, ScoreView};
use crate::domain::repository::ScoreRepository;
use crate::error::{ScoreError, ScoreResult};

pub struct ListExamScoresUseCase<R>
where
    R: ScoreRepository,
{
    repo: Arc<R>,
}

impl<R> ListExamScoresUseCase<R>
where
    R: ScoreRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, exam_id: ExamId, page: PageQuery) -> ScoreResult<Page<ScoreView>> {
        if !self.repo.exam_exists(&exam_id).await? {
            return Err(ScoreError::ExamNotFound);
        }
        let (items, total) = self.repo.list_exam_scores(&exam_id, page).await?;
        Ok(Page::new(items, total, page))
    }
}

pub struct MyScoresUseCase<R>
where
    R: ScoreRepository,
{
    repo: Arc<R>,
}

impl<R> MyScoresUseCase<R>
where
    R: ScoreRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, principal: &Principal) -> ScoreResult<Vec<ScoreView>> {
        self.repo.list_user_scores(&principal.user_id).await
    }
}

pub struct UpdateScoreUseCase<R>
where
    R: ScoreRepository,
{
    repo: Arc<R>,
}

impl<R> UpdateScoreUseCase<R>
where
    R: ScoreRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, score_id: ScoreId, changes: ScoreChanges) -> ScoreResult<ScoreView> {
        let mut view = self
            .repo
            .find_score(&score_id)
            .await?
            .ok_or(ScoreError::ScoreNotFound)?;

        view.score.apply(changes)?;
        self.repo.update_score(&view.score).await?;

        tracing::info!(
            score_id = %score_id,
            is_passed = view.score.is_passed,
            "Score updated"
        );
        Ok(view)
    }
}

pub struct DeleteScoreUseCase<R>
where
    R: ScoreRepository,
{
    repo: Arc<R>,
}

impl<R> DeleteScoreUseCase<R>
where
    R: ScoreRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, score_id: ScoreId) -> ScoreResult<()> {
        if !self.repo.delete_score(&score_id).await? {
            return Err(ScoreError::ScoreNotFound);
        }
        tracing::info!(score_id = %score_id, "Score deleted");
        Ok(())
    }
}
