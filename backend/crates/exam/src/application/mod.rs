//! Application Layer
//!
//! Use cases for exams, form configuration and applications.

pub mod exam;
pub mod form_config;
pub mod registration;
pub mod review;

// Re-exports
pub use exam::{
    CreateExamInput, CreateExamUseCase, DeleteExamUseCase, GetExamUseCase, ListExamsUseCase,
    UpdateExamUseCase,
};
pub use form_config::{FormConfigView, GetFormConfigUseCase, SaveFormConfigUseCase};
pub use registration::{
    GetApplicationUseCase, ListMyApplicationsUseCase, SubmitApplicationInput,
    SubmitApplicationUseCase, UpdateApplicationUseCase, WithdrawApplicationUseCase,
};
pub use review::{ListExamApplicationsUseCase, ReviewApplicationUseCase, ReviewDecision};
