//! Per-client-IP rate limiting.

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{
    clock::{Clock, DefaultClock},
    state::keyed::DefaultKeyedStateStore,
    Quota, RateLimiter,
};
use std::net::{IpAddr, SocketAddr};
use std::num::NonZeroU32;

use crate::app::AppState;
use crate::error::ApiError;

type IpRateLimiter = RateLimiter<IpAddr, DefaultKeyedStateStore<IpAddr>, DefaultClock>;

/// Fixed hourly request budget per client IP.
pub struct RateLimiterState {
    limiter: IpRateLimiter,
    per_hour: NonZeroU32,
    trusted_proxies: Vec<IpAddr>,
}

impl RateLimiterState {
    /// Returns `None` when the budget is zero (limiting disabled).
    pub fn new(per_hour: u32) -> Option<Self> {
        let per_hour = NonZeroU32::new(per_hour)?;
        Some(Self {
            limiter: RateLimiter::keyed(Quota::per_hour(per_hour)),
            per_hour,
            trusted_proxies: Vec::new(),
        })
    }

    pub fn with_trusted_proxies(mut self, proxies: Vec<IpAddr>) -> Self {
        self.trusted_proxies = proxies;
        self
    }

    /// Key for a request, see [`client_ip`].
    pub fn client_ip(&self, headers: &HeaderMap, peer: Option<SocketAddr>) -> Option<IpAddr> {
        client_ip(headers, peer, &self.trusted_proxies)
    }

    /// `Err(retry_after_secs)` once the IP has spent its budget.
    pub fn check(&self, ip: IpAddr) -> Result<(), u64> {
        self.limiter.check_key(&ip).map_err(|not_until| {
            not_until
                .wait_time_from(DefaultClock::default().now())
                .as_secs()
                .max(1)
        })
    }

    /// Drops state for IPs whose budget has fully replenished.
    pub fn retain_recent(&self) {
        self.limiter.retain_recent();
    }

    pub fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }
}

impl std::fmt::Debug for RateLimiterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiterState")
            .field("per_hour", &self.per_hour)
            .field("trusted_proxies", &self.trusted_proxies)
            .field("tracked_clients", &self.limiter.len())
            .finish()
    }
}

/// The socket peer address, unless the peer is a trusted proxy.
///
/// Behind a trusted proxy the client is the right-most `X-Forwarded-For` hop
/// that is not itself a trusted proxy. Hops left of it are client supplied.
pub fn client_ip(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    trusted_proxies: &[IpAddr],
) -> Option<IpAddr> {
    let peer = peer?.ip();
    if !trusted_proxies.contains(&peer) {
        return Some(peer);
    }

    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let mut last_valid = None;
    for hop in forwarded.rsplit(',') {
        let Ok(ip) = hop.trim().parse::<IpAddr>() else {
            break;
        };
        if !trusted_proxies.contains(&ip) {
            return Some(ip);
        }
        last_valid = Some(ip);
    }
    Some(last_valid.unwrap_or(peer))
}

/// Rejects requests over budget with 429 and `Retry-After`. Requests with no
/// socket peer (in-process calls) pass through.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let Some(limiter) = state.rate_limiter.as_ref() else {
        return next.run(req).await;
    };

    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    if let Some(ip) = limiter.client_ip(req.headers(), peer) {
        if let Err(retry_after_secs) = limiter.check(ip) {
            tracing::warn!(client_ip = %ip, retry_after_secs, "Rate limit exceeded");
            return ApiError::RateLimited { retry_after_secs }.into_response();
        }
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[test]
    fn test_zero_budget_disables_limiting() {
        assert!(RateLimiterState::new(0).is_none());
    }

    #[test]
    fn test_budget_exhaustion() {
        let state = RateLimiterState::new(3).unwrap();
        let client = ip("203.0.113.7");
        for _ in 0..3 {
            assert!(state.check(client).is_ok());
        }
        let retry_after = state.check(client).unwrap_err();
        assert!(retry_after >= 1);
    }

    #[test]
    fn test_clients_limited_independently() {
        let state = RateLimiterState::new(1).unwrap();
        assert!(state.check(ip("203.0.113.1")).is_ok());
        assert!(state.check(ip("203.0.113.2")).is_ok());
        assert!(state.check(ip("203.0.113.1")).is_err());
        assert_eq!(state.tracked_clients(), 2);
    }

    fn peer(s: &str) -> Option<SocketAddr> {
        Some(s.parse().unwrap())
    }

    fn forwarded(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_forwarded_for_ignored_from_untrusted_peer() {
        let headers = forwarded("203.0.113.50");
        assert_eq!(
            client_ip(&headers, peer("10.0.0.1:1234"), &[]),
            Some(ip("10.0.0.1"))
        );

        // Rotating the header does not give a fresh budget
        let state = RateLimiterState::new(1).unwrap();
        let first = state.client_ip(&forwarded("203.0.113.1"), peer("10.0.0.1:1234"));
        let second = state.client_ip(&forwarded("203.0.113.2"), peer("10.0.0.1:1234"));
        assert_eq!(first, second);
        assert!(state.check(first.unwrap()).is_ok());
        assert!(state.check(second.unwrap()).is_err());
    }

    #[test]
    fn test_forwarded_for_from_trusted_proxy() {
        let proxies = [ip("10.0.0.2")];
        let headers = forwarded("198.51.100.4, 192.0.2.33");
        assert_eq!(
            client_ip(&headers, peer("10.0.0.2:443"), &proxies),
            Some(ip("192.0.2.33"))
        );
    }

    #[test]
    fn test_forwarded_for_skips_chained_trusted_proxies() {
        let proxies = [ip("10.0.0.2"), ip("10.0.0.3")];
        let headers = forwarded("192.0.2.33, 10.0.0.3");
        assert_eq!(
            client_ip(&headers, peer("10.0.0.2:443"), &proxies),
            Some(ip("192.0.2.33"))
        );
    }

    #[test]
    fn test_trusted_proxy_without_header_uses_peer() {
        let proxies = [ip("10.0.0.2")];
        assert_eq!(
            client_ip(&HeaderMap::new(), peer("10.0.0.2:443"), &proxies),
            Some(ip("10.0.0.2"))
        );
        assert_eq!(
            client_ip(&forwarded("garbage"), peer("10.0.0.2:443"), &proxies),
            Some(ip("10.0.0.2"))
        );
        assert_eq!(client_ip(&HeaderMap::new(), None, &proxies), None);
    }
}
