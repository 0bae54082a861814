//! Client address resolution.
//!
//! Proxies in front of the server report the original client in
//! `X-Forwarded-For` (first entry) or `X-Real-Ip`; otherwise the peer socket
//! address is the client.

use std::net::{IpAddr, SocketAddr};

use axum::extract::ConnectInfo;
use axum::http::{Extensions, HeaderMap};

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_REAL_IP: &str = "x-real-ip";

/// Peer address recorded by `into_make_service_with_connect_info`.
pub fn peer_addr(ext: &Extensions) -> Option<SocketAddr> {
    ext.get::<ConnectInfo<SocketAddr>>().map(|c| c.0)
}

pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let header_ip = |name: &str| -> Option<IpAddr> {
        let value = headers.get(name)?.to_str().ok()?;
        value.split(',').next()?.trim().parse().ok()
    };
    header_ip(X_FORWARDED_FOR)
        .or_else(|| header_ip(X_REAL_IP))
        .or_else(|| peer.map(|p| p.ip()))
        .map(|ip| ip.to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use axum::http::HeaderValue;

    fn peer() -> Option<SocketAddr> {
        Some("10.0.0.9:5555".parse().unwrap())
    }

    #[test]
    fn prefers_forwarded_for() {
        let mut h = HeaderMap::new();
        h.insert(X_FORWARDED_FOR, HeaderValue::from_static("192.0.2.1, 10.0.0.1"));
        h.insert(X_REAL_IP, HeaderValue::from_static("192.0.2.7"));
        assert_eq!(client_ip(&h, peer()), "192.0.2.1");
    }

    #[test]
    fn falls_back_to_real_ip_then_peer() {
        let mut h = HeaderMap::new();
        h.insert(X_FORWARDED_FOR, HeaderValue::from_static("not-an-ip"));
        h.insert(X_REAL_IP, HeaderValue::from_static("2001:db8::1"));
        assert_eq!(client_ip(&h, peer()), "2001:db8::1");

        assert_eq!(client_ip(&HeaderMap::new(), peer()), "10.0.0.9");
        assert_eq!(client_ip(&HeaderMap::new(), None), "");
    }
}
