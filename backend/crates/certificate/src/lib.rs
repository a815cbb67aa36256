//! Certificate Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Certificates, renewal applications, templates and repository traits
//! - `application/` - Use cases
//! - `infra/` - PostgreSQL implementation
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Batch generation for an exam's passing candidates, all-or-nothing
//! - Import of externally numbered certificates with per-row errors
//! - Renewal and replacement requests; approval issues the successor and
//!   supersedes the original in one transaction
//! - Layout templates with one active default per type
//!
//! Numbers follow `{EXAMCODE}-{YEAR}-{I|R|P}-{SEQUENCE}`. Sequences come
//! from a per exam, year and type counter row that the issuing transaction
//! holds locked until commit.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


pub use application::{CertificateConfig, ExpireOverdueUseCase};
pub use error::{CertificateError, CertificateResult};
pub use infra::postgres::PgCertificateRepository;
pub use presentation::{CertificateAppState, certificate_routes};

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}
