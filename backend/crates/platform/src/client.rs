//! Request metadata
//!
//! Bearer token and client identification helpers over raw HTTP headers.

use axum::http::{HeaderMap, header};
use std::net::IpAddr;

const USER_AGENT_MAX_LENGTH: usize = 512;

/// Who is calling, as far as the headers tell us
///
/// Recorded on sessions for auditing only; sessions are not bound to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientInfo {
    pub ip: Option<IpAddr>,
    pub user_agent: Option<String>,
}

impl ClientInfo {
    pub fn from_headers(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> Self {
        let user_agent = headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(|ua| ua.chars().take(USER_AGENT_MAX_LENGTH).collect());

        Self {
            ip: extract_client_ip(headers, direct_ip),
            user_agent,
        }
    }

    pub fn ip_string(&self) -> Option<String> {
        self.ip.map(|ip| ip.to_string())
    }
}

/// Extract the token from `Authorization: Bearer <token>`
///
/// The scheme is matched case-insensitively; an empty token counts as absent.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Client IP: first `X-Forwarded-For` entry, else the socket address
pub fn extract_client_ip(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> Option<IpAddr> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|xff| xff.split(',').next())
        .and_then(|first| first.trim().parse::<IpAddr>().ok())
        .or(direct_ip)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn with_auth(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(extract_bearer_token(&with_auth("Bearer abc.def")), Some("abc.def"));
        assert_eq!(extract_bearer_token(&with_auth("bearer abc")), Some("abc"));
        assert_eq!(extract_bearer_token(&with_auth("Basic dXNlcjpwYXNz")), None);
        assert_eq!(extract_bearer_token(&with_auth("Bearer   ")), None);
        assert_eq!(extract_bearer_token(&with_auth("Bearer")), None);
        assert_eq!(extract_bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_client_ip_prefers_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );
        let direct: IpAddr = "127.0.0.1".parse().unwrap();

        assert_eq!(
            extract_client_ip(&headers, Some(direct)),
            Some("203.0.113.7".parse().unwrap())
        );
        assert_eq!(extract_client_ip(&HeaderMap::new(), Some(direct)), Some(direct));
    }

    #[test]
    fn test_client_info() {
        let mut headers = HeaderMap::new();
        headers.insert(header::USER_AGENT, HeaderValue::from_static("exam-cli/1.0"));

        let info = ClientInfo::from_headers(&headers, Some("::1".parse().unwrap()));
        assert_eq!(info.user_agent.as_deref(), Some("exam-cli/1.0"));
        assert_eq!(info.ip_string().as_deref(), Some("::1"));
    }
}
