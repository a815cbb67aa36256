//! Access Tokens
//!
//! `"{session_id}.{base64url(HMAC-SHA256(secret, session_id))}"`. The
//! signature only proves the id was minted here; validity is decided by the
//! session row.

use kernel::id::SessionId;
use platform::crypto::{from_base64_url, hmac_sha256, to_base64_url, verify_hmac_sha256};
use uuid::Uuid;

pub fn issue_token(secret: &[u8; 32], session_id: &SessionId) -> String {
    let id = session_id.to_string();
    let tag = hmac_sha256(secret, id.as_bytes());
    format!("{}.{}", id, to_base64_url(&tag))
}

/// Check the signature and return the session id it covers
pub fn verify_token(secret: &[u8; 32], token: &str) -> Option<SessionId> {
    let (id, signature) = token.split_once('.')?;
    let tag = from_base64_url(signature).ok()?;
    if !verify_hmac_sha256(secret, id.as_bytes(), &tag) {
        return None;
    }
    Uuid::parse_str(id).ok().map(SessionId::from_uuid)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: [u8; 32] = [7u8; 32];

    #[test]
    fn test_issue_then_verify() {
        let session_id = SessionId::new();
        let token = issue_token(&SECRET, &session_id);
        assert!(token.starts_with(&session_id.to_string()));
        assert_eq!(verify_token(&SECRET, &token), Some(session_id));
    }

    #[test]
    fn test_rejects_other_secret() {
        let token = issue_token(&SECRET, &SessionId::new());
        assert_eq!(verify_token(&[8u8; 32], &token), None);
    }

    #[test]
    fn test_rejects_tampered_id() {
        let token = issue_token(&SECRET, &SessionId::new());
        let (_, signature) = token.split_once('.').unwrap();
        let forged = format!("{}.{}", SessionId::new(), signature);
        assert_eq!(verify_token(&SECRET, &forged), None);
    }

    #[test]
    fn test_rejects_malformed() {
        assert_eq!(verify_token(&SECRET, ""), None);
        assert_eq!(verify_token(&SECRET, "no-dot"), None);
        assert_eq!(verify_token(&SECRET, "abc.!!!"), None);
    }
}
