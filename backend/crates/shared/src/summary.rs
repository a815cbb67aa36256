//! Nested objects inlined into responses
//!
//! Applications, scores and certificates carry their owner and exam as small
//! read-only summaries, filled in by query-time joins.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::id::{ExamId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExamSummary {
    pub id: ExamId,
    pub name: String,
    pub exam_code: String,
    pub status: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}
