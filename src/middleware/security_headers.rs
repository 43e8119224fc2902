use axum::{
    body::Body,
    http::{header, HeaderName, HeaderValue, Request, Response},
    middleware::Next,
};

/// Add security headers suited to a JSON-only API
///
/// Headers added:
/// - X-Content-Type-Options: nosniff
/// - X-Frame-Options: DENY
/// - Content-Security-Policy: nothing may be loaded from API responses
/// - Referrer-Policy: no-referrer
/// - Cache-Control: no-store, availability depends on the current time
pub async fn add_security_headers(request: Request<Body>, next: Next) -> Response<Body> {
    let mut response = next.run(request).await;

    let headers = response.headers_mut();

    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'"),
    );
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("no-referrer"),
    );
    if !headers.contains_key(header::CACHE_CONTROL) {
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    }

    headers.remove(header::SERVER);

    headers.insert(
        HeaderName::from_static("x-api-version"),
        HeaderValue::from_static(env!("CARGO_PKG_VERSION")),
    );

    response
}
