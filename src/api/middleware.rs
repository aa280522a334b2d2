//! Security settings for the public API: CORS origins and contact-form rate limiting.

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use std::{
    collections::HashMap,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::{Arc, Mutex, PoisonError},
    time::{Duration, Instant},
};

/// Default contact submissions allowed per client per minute.
const DEFAULT_CONTACT_RATE_LIMIT: u32 = 5;

/// Tracked clients above which `check` sweeps out idle entries.
const SWEEP_THRESHOLD: usize = 1024;

/// Security configuration loaded from environment variables.
#[derive(Clone, Debug)]
pub struct SecurityConfig {
    /// Allowed CORS origins (from FOLIO_CORS_ORIGINS, comma-separated).
    /// `None` allows any origin.
    pub cors_origins: Option<Vec<String>>,
    /// Limits contact-form submissions (FOLIO_CONTACT_RATE_LIMIT per minute, 0 disables).
    pub rate_limiter: Option<RateLimiter>,
    /// Take the client IP from `X-Forwarded-For`/`X-Real-IP` (FOLIO_TRUST_PROXY).
    /// Only safe behind a reverse proxy that overwrites those headers.
    pub trust_proxy: bool,
}

impl SecurityConfig {
    /// Load security configuration from environment variables.
    pub fn from_env() -> Self {
        let cors_origins = std::env::var("FOLIO_CORS_ORIGINS")
            .ok()
            .map(|s| s.split(',').map(|s| s.trim().to_string()).collect());

        let rate_limit = std::env::var("FOLIO_CONTACT_RATE_LIMIT")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(DEFAULT_CONTACT_RATE_LIMIT);

        let rate_limiter =
            (rate_limit > 0).then(|| RateLimiter::new(rate_limit, Duration::from_secs(60)));

        let trust_proxy = std::env::var("FOLIO_TRUST_PROXY")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Self {
            cors_origins,
            rate_limiter,
            trust_proxy,
        }
    }

    /// No CORS restriction and no rate limiting (local development and tests).
    pub fn disabled() -> Self {
        Self {
            cors_origins: None,
            rate_limiter: None,
            trust_proxy: false,
        }
    }

    /// Create a config with specific CORS origins.
    pub fn with_cors_origins(origins: Vec<String>) -> Self {
        Self {
            cors_origins: Some(origins),
            rate_limiter: None,
            trust_proxy: false,
        }
    }

    /// Create a config with contact rate limiting enabled.
    pub fn with_rate_limit(max_requests: u32) -> Self {
        Self {
            cors_origins: None,
            rate_limiter: Some(RateLimiter::new(max_requests, Duration::from_secs(60))),
            trust_proxy: false,
        }
    }

    /// Read the client IP from proxy headers.
    pub fn behind_proxy(mut self) -> Self {
        self.trust_proxy = true;
        self
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Simple in-memory rate limiter using sliding window.
#[derive(Clone, Debug)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    requests: Arc<Mutex<HashMap<IpAddr, Vec<Instant>>>>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            requests: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Record a request from `ip`. Returns false if the window is already full.
    pub fn check(&self, ip: IpAddr) -> bool {
        let now = Instant::now();

        let mut requests = self.requests.lock().unwrap_or_else(PoisonError::into_inner);
        if requests.len() >= SWEEP_THRESHOLD {
            Self::sweep(&mut requests, now, self.window);
        }
        let entry = requests.entry(ip).or_default();

        entry.retain(|&t| now.duration_since(t) < self.window);

        if entry.len() < self.max_requests as usize {
            entry.push(now);
            true
        } else {
            false
        }
    }

    /// Drop clients with no requests inside the window.
    pub fn cleanup(&self) {
        let mut requests = self.requests.lock().unwrap_or_else(PoisonError::into_inner);
        Self::sweep(&mut requests, Instant::now(), self.window);
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn sweep(requests: &mut HashMap<IpAddr, Vec<Instant>>, now: Instant, window: Duration) {
        requests.retain(|_, timestamps| {
            timestamps.retain(|&t| now.duration_since(t) < window);
            !timestamps.is_empty()
        });
    }
}

/// Rate limiting middleware. State is the limiter and whether proxy headers are trusted.
pub async fn rate_limit_middleware(
    State((rate_limiter, trust_proxy)): State<(RateLimiter, bool)>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let ip = extract_client_ip(&request, trust_proxy);

    if rate_limiter.check(ip) {
        Ok(next.run(request).await)
    } else {
        tracing::warn!("Contact rate limit exceeded for IP: {}", ip);
        Err(StatusCode::TOO_MANY_REQUESTS)
    }
}

/// Extract the client IP from the peer address, defaulting to localhost.
/// Proxy headers take precedence only when `trust_proxy` is set; otherwise
/// any client could pick its own identity.
fn extract_client_ip(request: &Request<Body>, trust_proxy: bool) -> IpAddr {
    if trust_proxy {
        if let Some(ip) = forwarded_ip(request) {
            return ip;
        }
    }

    if let Some(ConnectInfo(addr)) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip();
    }

    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

fn forwarded_ip(request: &Request<Body>) -> Option<IpAddr> {
    if let Some(forwarded) = request.headers().get("X-Forwarded-For") {
        if let Ok(value) = forwarded.to_str() {
            if let Some(ip_str) = value.split(',').next() {
                if let Ok(ip) = ip_str.trim().parse() {
                    return Some(ip);
                }
            }
        }
    }

    if let Some(real_ip) = request.headers().get("X-Real-IP") {
        if let Ok(value) = real_ip.to_str() {
            if let Ok(ip) = value.trim().parse() {
                return Some(ip);
            }
        }
    }

    None
}
