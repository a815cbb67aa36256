//! HTTP Handlers

use axum::extract::State;
use axum::http::StatusCode;
use kernel::extract::{Json, Path, Query};
use kernel::id::{ExamId, ScoreId};
use kernel::pagination::Page;
use kernel::principal::Principal;
use std::sync::Arc;

use crate::application::*;
use crate::domain::repository::ScoreRepository;
use crate::error::ScoreResult;
use crate::presentation::dto::*;

/// Shared state for score handlers
#[derive(Clone)]
pub struct ScoreAppState<R>
where
    R: ScoreRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
}

impl<R> ScoreAppState<R>
where
    R: ScoreRepository + Clone + Send + Sync + 'static,
{
    pub fn new(repo: R) -> Self {
        Self {
            repo: Arc::new(repo),
        }
    }
}

/// POST /api/scores/import
pub async fn import_scores<R>(
    State(state): State<ScoreAppState<R>>,
    Json(req): Json<ImportScoresRequest>,
) -> ScoreResult<Json<ImportOutcome>>
where
    R: ScoreRepository + Clone + Send + Sync + 'static,
{
    let outcome = ImportScoresUseCase::new(state.repo.clone())
        .execute(ImportScoresInput {
            exam_id: req.exam_id,
            rows: req.scores.into_iter().map(ScoreRow::from).collect(),
        })
        .await?;
    Ok(Json(outcome))
}

/// GET /api/exams/{id}/scores
pub async fn list_exam_scores<R>(
    State(state): State<ScoreAppState<R>>,
    Path(exam_id): Path<ExamId>,
    Query(query): Query<ScoreListQuery>,
) -> ScoreResult<Json<Page<ScoreResponse>>>
where
    R: ScoreRepository + Clone + Send + Sync + 'static,
{
    let page = ListExamScoresUseCase::new(state.repo.clone())
        .execute(exam_id, query.page_query())
        .await?;
    Ok(Json(page.map(ScoreResponse::from)))
}

/// GET /api/my-scores
pub async fn my_scores<R>(
    State(state): State<ScoreAppState<R>>,
    principal: Principal,
) -> ScoreResult<Json<Vec<ScoreResponse>>>
where
    R: ScoreRepository + Clone + Send + Sync + 'static,
{
    let scores = MyScoresUseCase::new(state.repo.clone())
        .execute(&principal)
        .await?;
    Ok(Json(scores.into_iter().map(ScoreResponse::from).collect()))
}

/// PUT /api/scores/{id}
pub async fn update_score<R>(
    State(state): State<ScoreAppState<R>>,
    Path(score_id): Path<ScoreId>,
    Json(req): Json<UpdateScoreRequest>,
) -> ScoreResult<Json<ScoreResponse>>
where
    R: ScoreRepository + Clone + Send + Sync + 'static,
{
    let view = UpdateScoreUseCase::new(state.repo.clone())
        .execute(score_id, req.into())
        .await?;
    Ok(Json(view.into()))
}

/// DELETE /api/scores/{id}
pub async fn delete_score<R>(
    State(state): State<ScoreAppState<R>>,
    Path(score_id): Path<ScoreId>,
) -> ScoreResult<StatusCode>
where
    R: ScoreRepository + Clone + Send + Sync + 'static,
{
    DeleteScoreUseCase::new(state.repo.clone())
        .execute(score_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
