//! Time Window Value Object

use chrono::{DateTime, Utc};
use kernel::error::app_error::{AppError, AppResult};

/// Half of an exam's calendar: when it runs, or when registration is open.
/// `start` is strictly before `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeWindow {
    /// `label` names the window in the error message
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, label: &str) -> AppResult<Self> {
        if start >= end {
            return Err(AppError::bad_request(format!(
                "{label} start must be before its end"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn from_stored(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn has_started(&self, now: DateTime<Utc>) -> bool {
        now >= self.start
    }

    pub fn has_ended(&self, now: DateTime<Utc>) -> bool {
        now > self.end
    }

    /// Inclusive at both ends
    pub fn contains(&self, now: DateTime<Utc>) -> bool {
        self.has_started(now) && !self.has_ended(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_start_must_precede_end() {
        let now = Utc::now();
        assert!(TimeWindow::new(now, now, "Registration").is_err());
        assert!(TimeWindow::new(now, now - Duration::hours(1), "Exam").is_err());
        assert!(TimeWindow::new(now, now + Duration::hours(1), "Exam").is_ok());
    }

    #[test]
    fn test_contains_is_inclusive() {
        let start = Utc::now();
        let end = start + Duration::days(7);
        let window = TimeWindow::new(start, end, "Registration").unwrap();

        assert!(window.contains(start));
        assert!(window.contains(end));
        assert!(!window.contains(start - Duration::seconds(1)));
        assert!(!window.contains(end + Duration::seconds(1)));
    }
}
