//! Candidate reference in an import row

use kernel::id::UserId;

/// How an import row names its candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserRef {
    Id(UserId),
    /// Matched case-insensitively
    Username(String),
    /// Matched case-insensitively
    Email(String),
}

impl UserRef {
    /// Pick the first reference present: id, then username, then email.
    /// Blank strings count as absent.
    pub fn pick(
        user_id: Option<UserId>,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Option<Self> {
        if let Some(id) = user_id {
            return Some(UserRef::Id(id));
        }
        fn present(s: Option<&str>) -> Option<&str> {
            s.map(str::trim).filter(|s| !s.is_empty())
        }
        if let Some(name) = present(username) {
            return Some(UserRef::Username(name.to_lowercase()));
        }
        present(email).map(|e| UserRef::Email(e.to_lowercase()))
    }
}

impl std::fmt::Display for UserRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRef::Id(id) => write!(f, "user_id {id}"),
            UserRef::Username(name) => write!(f, "username {name}"),
            UserRef::Email(email) => write!(f, "email {email}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence() {
        let id = UserId::new();
        assert_eq!(
            UserRef::pick(Some(id), Some("lin"), Some("lin@example.com")),
            Some(UserRef::Id(id))
        );
        assert_eq!(
            UserRef::pick(None, Some(" Lin "), Some("lin@example.com")),
            Some(UserRef::Username("lin".to_string()))
        );
        assert_eq!(
            UserRef::pick(None, Some(""), Some("Lin@Example.com")),
            Some(UserRef::Email("lin@example.com".to_string()))
        );
        assert_eq!(UserRef::pick(None, None, Some("  ")), None);
    }
}
