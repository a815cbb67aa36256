//! Exam Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Exams, applications, form configs and repository traits
//! - `application/` - Use cases
//! - `infra/` - PostgreSQL implementation
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Exam catalogue with draft/published/closed lifecycle
//! - Per-exam registration form configuration with a built-in default
//! - Candidate applications bounded by the registration window and capacity
//! - Admin review (approve with optional admission ticket, or reject)
//!
//! Capacity and duplicate checks run under a lock on the exam row, and review,
//! edit and withdrawal only touch rows that are still pending.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

pub use error::{ExamError, ExamResult};
pub use infra::postgres::PgExamRepository;
pub use presentation::{ExamAppState, exam_routes};

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}
