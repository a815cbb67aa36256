//! Entity Module

pub mod certificate;
pub mod issuance;
pub mod renewal;
pub mod template;

pub use certificate::{Certificate, CertificateView};
pub use issuance::{Candidate, GenerationBatch, IssuingExam};
pub use renewal::{RenewalApplication, RenewalDecision, RenewalView, approve_renewal};
pub use template::{DEFAULT_TEMPLATE_TYPE, NewTemplate, Template, TemplateChanges};
