//! Score Backend Module
//!
//! Exam results, one per candidate and exam. Admins import them in bulk
//! (rows may name the candidate by id, username or email), correct and
//! delete them; candidates read their own. Passing scores feed certificate
//! generation.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


pub use error::{ScoreError, ScoreResult};
pub use infra::postgres::PgScoreRepository;
pub use presentation::{ScoreAppState, score_routes};
