// Client identification for rate limiting and request logs

use axum::http::HeaderMap;
use std::net::IpAddr;

/// Extract the client address for a request
///
/// Uses the peer address unless `trust_proxy_headers` is set, in which case
/// X-Forwarded-For and X-Real-IP take precedence.
pub fn extract_ip_address(
    headers: &HeaderMap,
    peer: Option<IpAddr>,
    trust_proxy_headers: bool,
) -> String {
    if trust_proxy_headers {
        if let Some(ip) = forwarded_ip(headers) {
            return ip;
        }
    }

    peer.map(|ip| ip.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn forwarded_ip(headers: &HeaderMap) -> Option<String> {
    // X-Forwarded-For can contain multiple IPs, the first is the client
    if let Some(ip) = header_str(headers, "x-forwarded-for")
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
    {
        return Some(ip.to_string());
    }

    header_str(headers, "x-real-ip")
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(str::to_string)
}

/// Extract User-Agent from request headers
pub fn extract_user_agent(headers: &HeaderMap) -> Option<String> {
    header_str(headers, "user-agent").map(str::to_string)
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}
