//! Authenticated caller
//!
//! The auth guard resolves a bearer token into a [`Principal`] and stores it
//! in the request extensions. Domain handlers read it back with the extractor
//! below and never look at tokens themselves.

use crate::error::app_error::{AppError, AppResult};
use crate::id::{SessionId, UserId};
use crate::role::UserRole;

/// The user behind the current request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: UserId,
    pub session_id: SessionId,
    pub role: UserRole,
}

impl Principal {
    pub fn new(user_id: UserId, session_id: SessionId, role: UserRole) -> Self {
        Self {
            user_id,
            session_id,
            role,
        }
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Owners and admins pass, everyone else gets 403
    pub fn ensure_owner_or_admin(&self, owner: &UserId) -> AppResult<()> {
        if self.is_admin() || &self.user_id == owner {
            Ok(())
        } else {
            Err(AppError::forbidden("You do not have access to this resource"))
        }
    }

    /// Restriction to apply to listings: `None` for admins, own id otherwise
    pub fn listing_scope(&self) -> Option<UserId> {
        if self.is_admin() {
            None
        } else {
            Some(self.user_id)
        }
    }
}

/// Access level a route group requires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Any signed-in user
    Member,
    /// Admins only
    Admin,
}

impl Access {
    pub const fn permits(&self, role: UserRole) -> bool {
        match self {
            Access::Member => true,
            Access::Admin => role.is_admin(),
        }
    }
}

#[cfg(feature = "axum")]
impl<S> axum::extract::FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .copied()
            .ok_or_else(|| AppError::unauthorized("Authentication required"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::Id;

    fn principal(role: UserRole) -> Principal {
        Principal::new(Id::new(), Id::new(), role)
    }

    #[test]
    fn test_access_levels() {
        assert!(Access::Member.permits(UserRole::Student));
        assert!(Access::Member.permits(UserRole::Admin));
        assert!(!Access::Admin.permits(UserRole::Student));
        assert!(Access::Admin.permits(UserRole::Admin));
    }

    #[test]
    fn test_owner_or_admin() {
        let student = principal(UserRole::Student);
        assert!(student.ensure_owner_or_admin(&student.user_id).is_ok());

        let other: UserId = Id::new();
        let err = student.ensure_owner_or_admin(&other).unwrap_err();
        assert_eq!(err.status_code(), 403);

        let admin = principal(UserRole::Admin);
        assert!(admin.ensure_owner_or_admin(&other).is_ok());
    }

    #[test]
    fn test_listing_scope() {
        let student = principal(UserRole::Student);
        assert_eq!(student.listing_scope(), Some(student.user_id));
        assert_eq!(principal(UserRole::Admin).listing_scope(), None);
    }
}
