//! Entity Module

pub mod application;
pub mod exam;
pub mod form_config;

pub use application::{Application, ApplicationView};
pub use exam::{Exam, ExamChanges, NewExam};
pub use form_config::{FormConfig, default_form_config};
