//! Client identity resolution.

use axum::http::HeaderMap;
use std::net::SocketAddr;

/// Header set by the hosting proxy with the client address chain.
pub const FORWARDED_FOR: &str = "x-forwarded-for";

/// Bucket shared by every client that carries no address information.
pub const UNKNOWN_IDENTITY: &str = "unknown";

/// Derive the quota key for a request.
///
/// Uses the first address in `x-forwarded-for`, then the connection's peer
/// address, then [`UNKNOWN_IDENTITY`]. The header is client-controlled, so the
/// result is a bucketing key and nothing more.
pub fn resolve_identity(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let forwarded = headers
        .get(FORWARDED_FOR)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|first| !first.is_empty());

    if let Some(first) = forwarded {
        return first.to_string();
    }

    match peer {
        Some(addr) => addr.ip().to_string(),
        None => UNKNOWN_IDENTITY.to_string(),
    }
}
