//! User Entity
//!
//! Profile data only; the password hash lives in [`Credential`](super::credential::Credential).

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use kernel::role::UserRole;
use kernel::summary::UserSummary;

use crate::domain::value_object::{Email, Phone, Username};

#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    pub username: Username,
    pub email: Email,
    pub phone: Option<Phone>,
    pub role: UserRole,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// New self-registered user. Always a student.
    pub fn new(username: Username, email: Email, phone: Option<Phone>) -> Self {
        let now = Utc::now();
        Self {
            user_id: UserId::new(),
            username,
            email,
            phone,
            role: UserRole::Student,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Staff account created at startup
    pub fn administrator(username: Username, email: Email) -> Self {
        Self {
            role: UserRole::Admin,
            ..Self::new(username, email, None)
        }
    }

    pub fn record_login(&mut self) {
        let now = Utc::now();
        self.last_login_at = Some(now);
        self.updated_at = now;
    }

    pub fn change_email(&mut self, email: Email) {
        self.email = email;
        self.updated_at = Utc::now();
    }

    pub fn change_phone(&mut self, phone: Option<Phone>) {
        self.phone = phone;
        self.updated_at = Utc::now();
    }

    pub fn promote_to_admin(&mut self) {
        self.role = UserRole::Admin;
        self.updated_at = Utc::now();
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.user_id,
            username: self.username.as_str().to_string(),
            email: self.email.as_str().to_string(),
            role: self.role.code().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User::new(
            Username::new("candidate01").unwrap(),
            Email::new("candidate01@example.com").unwrap(),
            None,
        )
    }

    #[test]
    fn test_new_user_is_student() {
        let user = user();
        assert_eq!(user.role, UserRole::Student);
        assert!(user.last_login_at.is_none());
        assert_eq!(user.created_at, user.updated_at);
    }

    #[test]
    fn test_administrator() {
        let admin = User::administrator(
            Username::new("registrar").unwrap(),
            Email::new("registrar@example.com").unwrap(),
        );
        assert!(admin.role.is_admin());
    }

    #[test]
    fn test_mutators_touch_updated_at() {
        let mut user = user();
        let before = user.updated_at;
        user.record_login();
        assert!(user.last_login_at.is_some());
        assert!(user.updated_at >= before);

        user.change_phone(Some(Phone::new("555-0100").unwrap()));
        assert_eq!(user.phone.as_ref().map(Phone::as_str), Some("555-0100"));
    }

    #[test]
    fn test_summary() {
        let user = user();
        let summary = user.summary();
        assert_eq!(summary.id, user.user_id);
        assert_eq!(summary.username, "candidate01");
        assert_eq!(summary.role, "student");
    }
}
