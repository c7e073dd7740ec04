//! Per-client request limits for the admin routes.
//!
//! Each client IP gets a fixed window of requests per route and method.
//! Reads (`GET`, `HEAD`) and writes share the same window length but have
//! separate limits.

use std::{
    collections::HashMap,
    net::{IpAddr, SocketAddr},
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use axum::{
    extract::{ConnectInfo, FromRef, MatchedPath, Request, State},
    http::Method,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::time::Instant;

use crate::{AppState, Error};

/// Drop expired windows once this many clients are being tracked.
const PRUNE_THRESHOLD: usize = 1024;

/// How many requests a client may make to one route within a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimits {
    /// The limit for `GET` and `HEAD` requests.
    pub reads: u32,
    /// The limit for every other method.
    pub writes: u32,
    /// The length of a window.
    pub window: Duration,
}

impl Default for RateLimits {
    fn default() -> Self {
        Self {
            reads: 100,
            writes: 50,
            window: Duration::from_secs(60),
        }
    }
}

impl RateLimits {
    fn limit_for(&self, method: &Method) -> u32 {
        if method == Method::GET || method == Method::HEAD {
            self.reads
        } else {
            self.writes
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ClientKey {
    /// `None` when the connection address is unknown, e.g. in tests.
    ip: Option<IpAddr>,
    method: Method,
    route: String,
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// Counts requests per client and rejects those over the limit.
#[derive(Debug, Clone, Default)]
pub struct RateLimiter {
    limits: RateLimits,
    windows: Arc<Mutex<HashMap<ClientKey, Window>>>,
}

impl RateLimiter {
    /// Create a limiter with no requests counted yet.
    pub fn new(limits: RateLimits) -> Self {
        Self {
            limits,
            windows: Arc::default(),
        }
    }

    /// Count a request made at `now`.
    ///
    /// # Errors
    /// Returns [Error::TooManyRequests] if the client has used up its limit
    /// for the current window.
    fn check(&self, key: ClientKey, now: Instant) -> Result<(), Error> {
        let limit = self.limits.limit_for(&key.method);
        let window_length = self.limits.window;
        let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);

        if windows.len() >= PRUNE_THRESHOLD {
            windows.retain(|_, window| now.duration_since(window.started) < window_length);
        }

        let window = windows.entry(key).or_insert(Window {
            started: now,
            count: 0,
        });

        if now.duration_since(window.started) >= window_length {
            *window = Window {
                started: now,
                count: 0,
            };
        }

        if window.count >= limit {
            return Err(Error::TooManyRequests(limit, window_length.as_secs()));
        }

        window.count += 1;

        Ok(())
    }
}

impl FromRef<AppState> for RateLimiter {
    fn from_ref(state: &AppState) -> Self {
        state.rate_limiter.clone()
    }
}

/// Middleware that rejects a client's requests with 429 once it goes over
/// the limit for the route.
pub async fn rate_limit(
    State(limiter): State<RateLimiter>,
    request: Request,
    next: Next,
) -> Response {
    let ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_owned())
        .unwrap_or_else(|| request.uri().path().to_owned());
    let key = ClientKey {
        ip,
        method: request.method().clone(),
        route,
    };

    if let Err(error) = limiter.check(key.clone(), Instant::now()) {
        tracing::warn!(
            "Rate limited {} {} from {:?}",
            key.method,
            key.route,
            key.ip
        );
        return error.into_response();
    }

    next.run(request).await
}
