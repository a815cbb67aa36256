//! Credential Entity
//!
//! Password hash and failed-login tracking, kept apart from the profile.

use chrono::{DateTime, Duration, Utc};
use kernel::id::UserId;

use crate::domain::value_object::UserPassword;

#[derive(Debug, Clone)]
pub struct Credential {
    pub user_id: UserId,
    pub password: UserPassword,
    /// Consecutive failures since the last successful login
    pub failed_attempts: u16,
    pub last_failed_at: Option<DateTime<Utc>>,
    pub locked_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Credential {
    pub fn new(user_id: UserId, password: UserPassword) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            password,
            failed_attempts: 0,
            last_failed_at: None,
            locked_until: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked_until.is_some_and(|until| Utc::now() < until)
    }

    /// Count a failure; lock once `max_failures` is reached
    pub fn record_failure(&mut self, max_failures: u16, lockout: Duration) {
        let now = Utc::now();
        self.failed_attempts = self.failed_attempts.saturating_add(1);
        self.last_failed_at = Some(now);
        self.updated_at = now;

        if self.failed_attempts >= max_failures {
            self.locked_until = Some(now + lockout);
            self.failed_attempts = 0;
        }
    }

    pub fn reset_failures(&mut self) {
        if self.failed_attempts == 0 && self.locked_until.is_none() {
            return;
        }
        self.failed_attempts = 0;
        self.locked_until = None;
        self.updated_at = Utc::now();
    }

    pub fn change_password(&mut self, password: UserPassword) {
        self.password = password;
        self.failed_attempts = 0;
        self.locked_until = None;
        self.updated_at = Utc::now();
    }
}
