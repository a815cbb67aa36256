//! Application Configuration
//!
//! Configuration for the Certificate application layer.

use kernel::error::app_error::AppResult;

use crate::domain::value_object::Validity;

/// Certificate application configuration
#[derive(Debug, Clone, Default)]
pub struct CertificateConfig {
    /// Validity of newly issued certificates unless a request overrides it
    /// (36 months)
    pub validity: Validity,
}

impl CertificateConfig {
    /// Config with a validity of `months` (1..=240)
    pub fn from_months(months: u32) -> AppResult<Self> {
        Ok(Self {
            validity: Validity::months(months)?,
        })
    }

    /// Create config for development
    pub fn development() -> Self {
        Self::default()
    }

    /// Request override, or the configured validity
    pub fn validity_for(&self, months: Option<u32>) -> AppResult<Validity> {
        months.map_or(Ok(self.validity), Validity::months)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::DEFAULT_VALIDITY_MONTHS;

    #[test]
    fn test_defaults() {
        let config = CertificateConfig::development();
        assert_eq!(config.validity.as_months(), DEFAULT_VALIDITY_MONTHS);
        assert_eq!(config.validity_for(Some(12)).unwrap().as_months(), 12);
        assert_eq!(
            config.validity_for(None).unwrap().as_months(),
            DEFAULT_VALIDITY_MONTHS
        );
    }

    #[test]
    fn test_out_of_range_months_rejected() {
        assert!(CertificateConfig::from_months(0).is_err());
        assert!(CertificateConfig::from_months(241).is_err());
        assert!(CertificateConfig::default().validity_for(Some(0)).is_err());
    }
}
