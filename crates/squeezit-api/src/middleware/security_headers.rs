use axum::http::{header, HeaderValue};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Security headers configuration
#[derive(Clone)]
pub struct SecurityHeadersConfig {
    pub is_production: bool,
}

impl SecurityHeadersConfig {
    pub fn new(is_production: bool) -> Self {
        Self { is_production }
    }

    /// Build Content-Security-Policy header value
    fn build_csp(&self) -> String {
        [
            "default-src 'self'",
            "script-src 'self'",
            "style-src 'self'",
            // Results are rendered straight from their data URIs; downloads use blob URLs
            "img-src 'self' data: blob:",
            "connect-src 'self'",
            "manifest-src 'self'",
            "worker-src 'self'",
            "frame-ancestors 'none'",
        ]
        .join("; ")
    }
}

/// Adds security headers to all HTTP responses
pub async fn security_headers_middleware(
    State(config): State<Arc<SecurityHeadersConfig>>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    let headers = response.headers_mut();

    headers.insert(
        "X-Content-Type-Options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert("X-Frame-Options", HeaderValue::from_static("DENY"));
    headers.insert(
        "Referrer-Policy",
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    // Only meaningful behind HTTPS
    if config.is_production {
        headers.insert(
            "Strict-Transport-Security",
            HeaderValue::from_static("max-age=31536000; includeSubDomains; preload"),
        );
    }

    if let Ok(header_value) = HeaderValue::from_str(&config.build_csp()) {
        headers.insert("Content-Security-Policy", header_value);
    }

    headers.insert(
        "Permissions-Policy",
        HeaderValue::from_static("geolocation=(), microphone=(), camera=()"),
    );

    // Transcoded images are private to the request; static assets set their own policy.
    if !headers.contains_key(header::CACHE_CONTROL) {
        headers.insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store, private"),
        );
    }

    response
}
