//! Score Value

use kernel::error::app_error::{AppError, AppResult};
use serde::Serialize;

/// Non-negative, finite exam result
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Points(f64);

impl Points {
    pub fn new(value: f64) -> AppResult<Self> {
        if !value.is_finite() {
            return Err(AppError::bad_request("Score must be a finite number"));
        }
        if value < 0.0 {
            return Err(AppError::bad_request("Score cannot be negative"));
        }
        Ok(Self(value))
    }

    pub fn from_stored(value: f64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}
