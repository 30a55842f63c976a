//! API middleware.

use std::net::IpAddr;
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderValue, Request, Response};
use axum::middleware::Next;
use axum::response::IntoResponse;
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ApiError;

/// Sweep stale per-IP limiter state after this many checks.
const SWEEP_EVERY: usize = 1024;

/// Per-IP request allowance for the analyze route.
///
/// One keyed governor limiter holds the state for every source address;
/// keys whose quota has fully replenished are swept periodically so the
/// table cannot grow without bound under churned or spoofed addresses.
pub struct AnalyzeRateLimit {
    limiter: DefaultKeyedRateLimiter<IpAddr>,
    per_minute: u32,
    checks: AtomicUsize,
}

impl AnalyzeRateLimit {
    pub fn new(requests_per_minute: u32) -> Self {
        let per_minute = requests_per_minute.max(1);
        let quota = Quota::per_minute(NonZeroU32::new(per_minute).unwrap_or(NonZeroU32::MIN));
        Self {
            limiter: RateLimiter::keyed(quota),
            per_minute,
            checks: AtomicUsize::new(0),
        }
    }

    /// Allowance advertised in the `X-RateLimit-Limit` header.
    pub fn limit(&self) -> u32 {
        self.per_minute
    }

    /// Record one request from `ip`; false when over the allowance.
    pub fn allow(&self, ip: IpAddr) -> bool {
        if self.checks.fetch_add(1, Ordering::Relaxed) % SWEEP_EVERY == SWEEP_EVERY - 1 {
            self.limiter.retain_recent();
            self.limiter.shrink_to_fit();
        }
        self.limiter.check_key(&ip).is_ok()
    }
}

/// Rate limiting middleware for the analyze route.
pub async fn rate_limit_middleware(
    State(limit): State<Arc<AnalyzeRateLimit>>,
    request: Request<Body>,
    next: Next,
) -> Response<Body> {
    if let Some(ip) = client_ip(&request) {
        if !limit.allow(ip) {
            warn!(ip = %ip, "Rate limit exceeded");
            return (
                [
                    ("Retry-After", "60".to_string()),
                    ("X-RateLimit-Limit", limit.limit().to_string()),
                ],
                ApiError::RateLimited,
            )
                .into_response();
        }
    }

    next.run(request).await
}

/// Client address: first `X-Forwarded-For` hop, then `X-Real-IP`, then the
/// socket peer.
fn client_ip(request: &Request<Body>) -> Option<IpAddr> {
    let headers = request.headers();

    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|v| v.trim().parse().ok());

    forwarded
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
        })
        .or_else(|| {
            request
                .extensions()
                .get::<ConnectInfo<std::net::SocketAddr>>()
                .map(|ci| ci.0.ip())
        })
}

/// Security headers middleware.
pub async fn security_headers(request: Request<Body>, next: Next) -> Response<Body> {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert("X-Content-Type-Options", HeaderValue::from_static("nosniff"));
    headers.insert("X-Frame-Options", HeaderValue::from_static("DENY"));
    headers.insert(
        "Referrer-Policy",
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(
        "Permissions-Policy",
        HeaderValue::from_static("camera=(), geolocation=(), microphone=(), payment=()"),
    );
    headers.insert(
        "Cross-Origin-Resource-Policy",
        HeaderValue::from_static("same-origin"),
    );

    response
}

/// Request identifier, honored from `X-Request-ID` or generated.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Request ID middleware.
pub async fn request_id(mut request: Request<Body>, next: Next) -> Response<Body> {
    let id = match request
        .headers()
        .get("X-Request-ID")
        .and_then(|v| v.to_str().ok())
    {
        Some(existing) => existing.to_string(),
        None => Uuid::new_v4().to_string(),
    };

    request.extensions_mut().insert(RequestId(id.clone()));

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert("X-Request-ID", value);
    }
    response
}

/// Request logging middleware. Health probes are not logged.
pub async fn request_logging(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let quiet = path == "/api/health";
    let start = Instant::now();

    let response = next.run(request).await;

    if !quiet {
        info!(
            %method,
            path,
            status = response.status().as_u16(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Request completed"
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_denies_after_allowance() {
        let limit = AnalyzeRateLimit::new(2);
        let ip: IpAddr = "203.0.113.7".parse().unwrap();

        assert!(limit.allow(ip));
        assert!(limit.allow(ip));
        assert!(!limit.allow(ip));
    }

    #[test]
    fn test_limits_are_per_ip() {
        let limit = AnalyzeRateLimit::new(1);
        let first: IpAddr = "203.0.113.7".parse().unwrap();
        let second: IpAddr = "203.0.113.8".parse().unwrap();

        assert!(limit.allow(first));
        assert!(!limit.allow(first));
        assert!(limit.allow(second));
    }

    #[test]
    fn test_zero_allowance_clamps_to_one() {
        let limit = AnalyzeRateLimit::new(0);
        let ip: IpAddr = "203.0.113.9".parse().unwrap();

        assert_eq!(limit.limit(), 1);
        assert!(limit.allow(ip));
        assert!(!limit.allow(ip));
    }

    #[test]
    fn test_forwarded_for_takes_first_hop() {
        let request = Request::builder()
            .header("X-Forwarded-For", "198.51.100.4, 10.0.0.1")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_ip(&request), Some("198.51.100.4".parse().unwrap()));
    }

    #[test]
    fn test_real_ip_is_the_fallback() {
        let request = Request::builder()
            .header("X-Real-IP", "198.51.100.9")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_ip(&request), Some("198.51.100.9".parse().unwrap()));
    }
}
