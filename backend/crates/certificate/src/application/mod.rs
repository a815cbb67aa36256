//! Application Layer
//!
//! Use cases for issuance, import, renewal and templates.

pub mod certificate;
pub mod config;
pub mod generate;
pub mod import;
pub mod renewal;
pub mod template;

// Re-exports
pub use certificate::{
    ExpireOverdueUseCase, GetCertificateUseCase, ListExamCertificatesUseCase,
    ListMyCertificatesUseCase, RevokeCertificateUseCase,
};
pub use config::CertificateConfig;
pub use generate::{GenerateCertificatesInput, GenerateCertificatesUseCase, GenerationOutcome};
pub use import::{ImportCertificatesUseCase, ImportOutcome, ImportRow, ImportRowError};
pub use renewal::{
    GetRenewalUseCase, ListRenewalsUseCase, ReviewRenewalUseCase, SubmitRenewalInput,
    SubmitRenewalUseCase,
};
pub use template::{
    CreateTemplateUseCase, DeleteTemplateUseCase, GetTemplateUseCase, ListTemplatesUseCase,
    UpdateTemplateUseCase,
};
