//! Client IP extraction for recording the source of new links.

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{HeaderMap, request::Parts},
};
use std::convert::Infallible;
use std::net::SocketAddr;

use crate::state::AppState;

/// Placeholder stored when no address is available (e.g. in-process tests).
pub const UNKNOWN_IP: &str = "unknown";

/// The originating client address of a request.
///
/// When the service runs behind a trusted reverse proxy (`BEHIND_PROXY=true`),
/// the first `X-Forwarded-For` entry is used, then `X-Real-IP`. Otherwise the
/// socket peer address is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

impl FromRequestParts<AppState> for ClientIp {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string());

        Ok(ClientIp(resolve_client_ip(
            &parts.headers,
            peer,
            state.behind_proxy,
        )))
    }
}

/// Picks the client address from proxy headers or the peer address.
pub fn resolve_client_ip(headers: &HeaderMap, peer: Option<String>, behind_proxy: bool) -> String {
    if behind_proxy {
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        let real_ip = headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        if let Some(ip) = forwarded.or(real_ip) {
            return ip.to_string();
        }
    }

    peer.unwrap_or_else(|| UNKNOWN_IP.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.insert(*k, HeaderValue::from_static(v));
        }
        map
    }

    #[test]
    fn test_peer_address_used_by_default() {
        let h = headers(&[("x-forwarded-for", "203.0.113.9")]);
        let ip = resolve_client_ip(&h, Some("10.0.0.5".to_string()), false);
        assert_eq!(ip, "10.0.0.5");
    }

    #[test]
    fn test_forwarded_for_first_entry_behind_proxy() {
        let h = headers(&[("x-forwarded-for", "203.0.113.9, 10.0.0.1")]);
        let ip = resolve_client_ip(&h, Some("10.0.0.5".to_string()), true);
        assert_eq!(ip, "203.0.113.9");
    }

    #[test]
    fn test_real_ip_fallback_behind_proxy() {
        let h = headers(&[("x-real-ip", "198.51.100.7")]);
        let ip = resolve_client_ip(&h, None, true);
        assert_eq!(ip, "198.51.100.7");
    }

    #[test]
    fn test_unknown_without_any_source() {
        let ip = resolve_client_ip(&HeaderMap::new(), None, true);
        assert_eq!(ip, UNKNOWN_IP);
    }
}
