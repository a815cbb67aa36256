//! Application Layer
//!
//! Use cases for score import and maintenance.

pub mod import;
pub mod manage;

pub use import::{ImportOutcome, ImportScoresInput, ImportScoresUseCase, RowError, ScoreRow};
pub use manage::{
    DeleteScoreUseCase, ListExamScoresUseCase, MyScoresUseCase, UpdateScoreUseCase,
};
