//! Presentation Layer
//!
//! HTTP handlers, DTOs, and router.

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::{CertificateAppState, CertificateStore};
pub use router::certificate_routes;
