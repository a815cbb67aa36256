//! Session Entity
//!
//! Server-side record behind an access token. Deleting the row revokes the
//! token immediately.

use chrono::{DateTime, Duration, Utc};
use kernel::id::{SessionId, UserId};
use platform::client::ClientInfo;

#[derive(Debug, Clone)]
pub struct Session {
    pub session_id: SessionId,
    pub user_id: UserId,
    pub client_ip: Option<String>,
    pub user_agent: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user_id: UserId, client: &ClientInfo, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            session_id: SessionId::new(),
            user_id,
            client_ip: client.ip_string(),
            user_agent: client.user_agent.clone(),
            expires_at: now + ttl,
            created_at: now,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_expiry() {
        let client = ClientInfo {
            ip: Some("192.0.2.10".parse().unwrap()),
            user_agent: Some("curl/8".into()),
        };
        let session = Session::new(UserId::new(), &client, Duration::hours(24));

        assert!(!session.is_expired());
        assert_eq!(session.expires_at - session.created_at, Duration::hours(24));
        assert_eq!(session.client_ip.as_deref(), Some("192.0.2.10"));
    }

    #[test]
    fn test_zero_ttl_is_expired() {
        let session = Session::new(UserId::new(), &ClientInfo::default(), Duration::zero());
        assert!(session.is_expired());
    }
}
