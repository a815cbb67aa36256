//! Value Object Module

pub mod certificate_number;
pub mod certificate_status;
pub mod certificate_type;
pub mod renewal_status;
pub mod validity;

pub use certificate_number::{CertificateNumber, NumberParts, number_prefix};
pub use certificate_status::CertificateStatus;
pub use certificate_type::CertificateType;
pub use renewal_status::{RenewalStatus, RenewalType};
pub use validity::{DEFAULT_VALIDITY_MONTHS, Validity};
