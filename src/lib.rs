//! Bookkeeper is the backend for a personal finance ledger.
//!
//! This library provides a JSON REST API for recording income and expenses,
//! summarising them by category and keeping a monthly budget.
//! Every route under `/admin` requires the shared secret in the
//! `X-Admin-Secret` header.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
mod auth;
mod budget;
mod clock;
mod db;
mod endpoints;
mod error;
mod extract;
mod logging;
mod message;
mod rate_limit;
mod record;
mod routing;
mod stats;
mod status;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use auth::ADMIN_SECRET_HEADER;
pub use budget::{BudgetLimits, upsert_budget};
pub use clock::{Clock, FixedClock, SystemClock, month_key};
pub use db::{Store, initialize as initialize_db};
pub use error::Error;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use rate_limit::RateLimits;
pub use record::{NewRecord, Record, RecordType, create_record};
pub use routing::build_router;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install terminate handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
