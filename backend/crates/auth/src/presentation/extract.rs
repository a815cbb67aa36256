//! Client metadata extractor

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use platform::client::ClientInfo;
use std::convert::Infallible;
use std::net::SocketAddr;

/// Caller IP and user agent. The socket address is optional so routers
/// served without connect info still work.
pub struct Client(pub ClientInfo);

impl<S> FromRequestParts<S> for Client
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let direct_ip = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|info| info.0.ip());

        Ok(Client(ClientInfo::from_headers(&parts.headers, direct_ip)))
    }
}
