//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC key for access tokens (32 bytes)
    pub token_secret: [u8; 32],
    /// Access token lifetime (24 hours)
    pub access_token_ttl: Duration,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    /// Failed logins before the account locks
    pub max_login_failures: u16,
    /// How long a lock lasts (15 minutes)
    pub lockout_duration: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: [0u8; 32],
            access_token_ttl: Duration::from_secs(24 * 3600), // 24 hours
            password_pepper: None,
            max_login_failures: 5,
            lockout_duration: Duration::from_secs(15 * 60), // 15 minutes
        }
    }
}

impl AuthConfig {
    /// Create config with a random token secret
    pub fn with_random_secret() -> Self {
        Self {
            token_secret: platform::crypto::random_secret(),
            ..Default::default()
        }
    }

    /// Create config for development (random secret, no pepper)
    pub fn development() -> Self {
        Self::with_random_secret()
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }

    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.access_token_ttl).unwrap_or(chrono::Duration::hours(24))
    }

    pub fn lockout(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.lockout_duration).unwrap_or(chrono::Duration::minutes(15))
    }
}
