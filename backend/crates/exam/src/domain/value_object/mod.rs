//! Value Object Module

pub mod application_status;
pub mod exam_code;
pub mod exam_status;
pub mod time_window;

pub use application_status::ApplicationStatus;
pub use exam_code::ExamCode;
pub use exam_status::ExamStatus;
pub use time_window::TimeWindow;
