//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use kernel::id::{ExamId, ScoreId, UserId};
use kernel::pagination::PageQuery;
use kernel::summary::{ExamSummary, UserSummary};
use serde::{Deserialize, Serialize};

use crate::application::ScoreRow;
use crate::domain::entity::{ScoreChanges, ScoreView};

#[derive(Debug, Clone, Deserialize)]
pub struct ScoreRowRequest {
    pub user_id: Option<UserId>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub score: Option<f64>,
    pub is_passed: Option<bool>,
}

impl From<ScoreRowRequest> for ScoreRow {
    fn from(req: ScoreRowRequest) -> Self {
        Self {
            user_id: req.user_id,
            username: req.username,
            email: req.email,
            score: req.score,
            is_passed: req.is_passed,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImportScoresRequest {
    pub exam_id: ExamId,
    #[serde(default)]
    pub scores: Vec<ScoreRowRequest>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateScoreRequest {
    pub score: Option<f64>,
    pub is_passed: Option<bool>,
}

impl From<UpdateScoreRequest> for ScoreChanges {
    fn from(req: UpdateScoreRequest) -> Self {
        Self {
            score: req.score,
            is_passed: req.is_passed,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoreListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl ScoreListQuery {
    pub fn page_query(&self) -> PageQuery {
        PageQuery::new(self.page, self.per_page)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreResponse {
    pub id: ScoreId,
    pub user_id: UserId,
    pub exam_id: ExamId,
    pub score: Option<f64>,
    pub is_passed: bool,
    pub imported_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user: UserSummary,
    pub exam: ExamSummary,
}

impl From<ScoreView> for ScoreResponse {
    fn from(view: ScoreView) -> Self {
        let score = view.score;
        Self {
            id: score.score_id,
            user_id: score.user_id,
            exam_id: score.exam_id,
            score: score.score.map(|p| p.value()),
            is_passed: score.is_passed,
            imported_at: score.imported_at,
            updated_at: score.updated_at,
            user: view.user,
            exam: view.exam,
        }
    }
}
