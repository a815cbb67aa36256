//! Score Entity
//!
//! One result per candidate and exam. Imports overwrite it in place.

use chrono::{DateTime, Utc};
use kernel::error::app_error::AppResult;
use kernel::id::{ExamId, ScoreId, UserId};
use kernel::summary::{ExamSummary, UserSummary};

use crate::domain::value_object::Points;

#[derive(Debug, Clone)]
pub struct Score {
    pub score_id: ScoreId,
    pub user_id: UserId,
    pub exam_id: ExamId,
    /// `None` when the result is pass/fail only
    pub score: Option<Points>,
    pub is_passed: bool,
    pub imported_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Score with its candidate and exam inlined
#[derive(Debug, Clone)]
pub struct ScoreView {
    pub score: Score,
    pub user: UserSummary,
    pub exam: ExamSummary,
}

/// Admin correction; `None` leaves a field alone
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreChanges {
    pub score: Option<f64>,
    pub is_passed: Option<bool>,
}

impl Score {
    pub fn imported(
        user_id: UserId,
        exam_id: ExamId,
        score: Option<f64>,
        is_passed: bool,
    ) -> AppResult<Self> {
        let now = Utc::now();
        Ok(Self {
            score_id: ScoreId::new(),
            user_id,
            exam_id,
            score: score.map(Points::new).transpose()?,
            is_passed,
            imported_at: now,
            updated_at: now,
        })
    }

    pub fn apply(&mut self, changes: ScoreChanges) -> AppResult<()> {
        if let Some(value) = changes.score {
            self.score = Some(Points::new(value)?);
        }
        if let Some(passed) = changes.is_passed {
            self.is_passed = passed;
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_imported_validates_score() {
        assert!(Score::imported(UserId::new(), ExamId::new(), Some(-1.0), false).is_err());
        let score = Score::imported(UserId::new(), ExamId::new(), None, true).unwrap();
        assert!(score.score.is_none());
        assert!(score.is_passed);
    }

    #[test]
    fn test_apply_is_partial() {
        let mut score = Score::imported(UserId::new(), ExamId::new(), Some(55.0), false).unwrap();
        score
            .apply(ScoreChanges {
                is_passed: Some(true),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(score.score.map(|p| p.value()), Some(55.0));
        assert!(score.is_passed);

        assert!(
            score
                .apply(ScoreChanges {
                    score: Some(f64::NAN),
                    ..Default::default()
                })
                .is_err()
        );
    }
}
