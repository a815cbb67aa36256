//! Server configuration from the environment
//!
//! `.env` is loaded by `main` before [`ServerConfig::from_env`] runs.

use anyhow::{Context, bail};
use auth::AuthConfig;
use auth::application::BootstrapAdminInput;
use base64::Engine;
use base64::engine::general_purpose;
use certificate::CertificateConfig;
use std::env;
use std::net::SocketAddr;
use std::time::Duration;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:31113";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:40922,http://127.0.0.1:40922";

pub struct ServerConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub bind_addr: SocketAddr,
    pub frontend_origins: Vec<String>,
    pub auth: AuthConfig,
    pub certificate: CertificateConfig,
    pub bootstrap_admin: Option<BootstrapAdminInput>,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

        let max_connections = parsed("DATABASE_MAX_CONNECTIONS")?.unwrap_or(DEFAULT_MAX_CONNECTIONS);
        let bind_addr = optional("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .context("BIND_ADDR must be host:port")?;

        let frontend_origins = optional("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let certificate = match parsed::<u32>("CERTIFICATE_VALIDITY_MONTHS")? {
            Some(months) => CertificateConfig::from_months(months)
                .map_err(|e| anyhow::anyhow!("CERTIFICATE_VALIDITY_MONTHS: {e}"))?,
            None => CertificateConfig::default(),
        };

        Ok(Self {
            database_url,
            max_connections,
            bind_addr,
            frontend_origins,
            auth: auth_config()?,
            certificate,
            bootstrap_admin: bootstrap_admin()?,
        })
    }
}

fn auth_config() -> anyhow::Result<AuthConfig> {
    let mut config = match optional("AUTH_TOKEN_SECRET") {
        Some(secret_b64) => {
            let bytes = general_purpose::STANDARD
                .decode(secret_b64.trim())
                .context("AUTH_TOKEN_SECRET must be base64")?;
            let token_secret: [u8; 32] = bytes
                .try_into()
                .map_err(|_| anyhow::anyhow!("AUTH_TOKEN_SECRET must decode to 32 bytes"))?;
            AuthConfig {
                token_secret,
                ..AuthConfig::default()
            }
        }
        None if cfg!(debug_assertions) => {
            tracing::warn!("AUTH_TOKEN_SECRET not set, using a random secret");
            AuthConfig::development()
        }
        None => bail!("AUTH_TOKEN_SECRET must be set in production"),
    };

    config.password_pepper = optional("PASSWORD_PEPPER").map(String::into_bytes);
    if let Some(hours) = parsed::<u64>("ACCESS_TOKEN_TTL_HOURS")? {
        if hours == 0 {
            bail!("ACCESS_TOKEN_TTL_HOURS must be positive");
        }
        config.access_token_ttl = Duration::from_secs(hours * 3600);
    }
    Ok(config)
}

/// All three variables or none
fn bootstrap_admin() -> anyhow::Result<Option<BootstrapAdminInput>> {
    match (
        optional("BOOTSTRAP_ADMIN_USERNAME"),
        optional("BOOTSTRAP_ADMIN_EMAIL"),
        optional("BOOTSTRAP_ADMIN_PASSWORD"),
    ) {
        (Some(username), Some(email), Some(password)) => Ok(Some(BootstrapAdminInput {
            username,
            email,
            password,
        })),
        (None, None, None) => Ok(None),
        _ => bail!(
            "BOOTSTRAP_ADMIN_USERNAME, BOOTSTRAP_ADMIN_EMAIL and BOOTSTRAP_ADMIN_PASSWORD must be set together"
        ),
    }
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn parsed<T>(name: &str) -> anyhow::Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    optional(name)
        .map(|raw| raw.trim().parse::<T>())
        .transpose()
        .with_context(|| format!("{name} is not a valid number"))
}
