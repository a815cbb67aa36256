//! User Password Value Object
//!
//! Domain wrappers over `platform::password`: [`RawPassword`] for user input,
//! [`UserPassword`] for the stored Argon2id hash.

use platform::password::{ClearTextPassword, HashedPassword};
use std::fmt;

use crate::error::{AuthError, AuthResult};

/// Password as typed by the user, zeroized on drop
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// A password being set; the password policy applies
    pub fn new(raw: String) -> AuthResult<Self> {
        ClearTextPassword::new(raw)
            .map(Self)
            .map_err(|e| AuthError::PasswordPolicy(e.to_string()))
    }

    /// A password being checked at login; no policy
    pub fn for_login(raw: String) -> Self {
        Self(ClearTextPassword::for_verification(raw))
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RawPassword([REDACTED])")
    }
}

/// Stored password hash
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    pub fn from_raw(raw: &RawPassword, pepper: Option<&[u8]>) -> AuthResult<Self> {
        raw.0
            .hash(pepper)
            .map(Self)
            .map_err(|e| AuthError::Internal(e.to_string()))
    }

    pub fn from_phc_string(phc: String) -> AuthResult<Self> {
        HashedPassword::from_phc_string(phc)
            .map(Self)
            .map_err(|e| AuthError::Internal(e.to_string()))
    }

    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }

    pub fn verify(&self, raw: &RawPassword, pepper: Option<&[u8]>) -> bool {
        self.0.verify(&raw.0, pepper)
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("UserPassword([HASH])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_errors_become_bad_request() {
        let err = RawPassword::new("short".into()).unwrap_err();
        assert!(matches!(err, AuthError::PasswordPolicy(_)));
        assert_eq!(err.kind().status_code(), 400);
    }

    #[test]
    fn test_login_password_skips_policy() {
        let stored = UserPassword::from_raw(&RawPassword::for_login("short".into()), None).unwrap();
        assert!(stored.verify(&RawPassword::for_login("short".into()), None));
    }

    #[test]
    fn test_hash_roundtrip_through_phc() {
        let raw = RawPassword::new("Certified-2031!".into()).unwrap();
        let stored = UserPassword::from_raw(&raw, Some(b"pepper")).unwrap();
        let restored = UserPassword::from_phc_string(stored.as_phc_string().to_string()).unwrap();

        assert!(restored.verify(&RawPassword::for_login("Certified-2031!".into()), Some(b"pepper")));
        assert!(!restored.verify(&RawPassword::for_login("Certified-2032!".into()), Some(b"pepper")));
    }
}
