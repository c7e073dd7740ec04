//! Implements a struct that holds the state of the REST server.

use std::sync::Arc;

use axum::extract::FromRef;

use crate::{
    auth::AdminSecret,
    clock::Clock,
    db::Store,
    rate_limit::{RateLimiter, RateLimits},
};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The secret that admin requests must present in the `X-Admin-Secret` header.
    pub admin_secret: AdminSecret,

    /// The database that holds records and budgets.
    pub store: Store,

    /// The source of the current time and month.
    pub clock: Arc<dyn Clock>,

    /// The request counters for the admin routes.
    pub rate_limiter: RateLimiter,
}

impl AppState {
    /// Create a new [AppState].
    ///
    /// `admin_secret` is `None` when no secret was configured, in which case
    /// every admin request is rejected. The admin routes use the default
    /// [RateLimits], see [AppState::with_rate_limits].
    pub fn new(admin_secret: Option<&str>, store: Store, clock: impl Clock + 'static) -> Self {
        Self {
            admin_secret: AdminSecret::new(admin_secret),
            store,
            clock: Arc::new(clock),
            rate_limiter: RateLimiter::default(),
        }
    }

    /// Replace the rate limits of the admin routes.
    pub fn with_rate_limits(mut self, limits: RateLimits) -> Self {
        self.rate_limiter = RateLimiter::new(limits);
        self
    }
}

/// The state needed by handlers that read or write the store.
#[derive(Debug, Clone)]
pub struct StoreState {
    /// The database that holds records and budgets.
    pub store: Store,
    /// The source of timestamps and the current month.
    pub clock: Arc<dyn Clock>,
}

impl FromRef<AppState> for StoreState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            clock: state.clock.clone(),
        }
    }
}
