//! Certificate Validity Period

use chrono::{DateTime, Months, Utc};
use kernel::error::app_error::{AppError, AppResult};

pub const DEFAULT_VALIDITY_MONTHS: u32 = 36;
const MAX_VALIDITY_MONTHS: u32 = 240;

/// Calendar months between issue and expiry (1..=240)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Validity(u32);

impl Validity {
    pub fn months(months: u32) -> AppResult<Self> {
        if !(1..=MAX_VALIDITY_MONTHS).contains(&months) {
            return Err(AppError::bad_request(format!(
                "Validity must be between 1 and {MAX_VALIDITY_MONTHS} months"
            )));
        }
        Ok(Self(months))
    }

    pub fn as_months(&self) -> u32 {
        self.0
    }

    /// Same day-of-month N months later, clamped to the month's last day
    pub fn expiry_from(&self, issued_at: DateTime<Utc>) -> AppResult<DateTime<Utc>> {
        issued_at
            .checked_add_months(Months::new(self.0))
            .ok_or_else(|| AppError::bad_request("Expiry date is out of range"))
    }
}

impl Default for Validity {
    fn default() -> Self {
        Self(DEFAULT_VALIDITY_MONTHS)
    }
}
