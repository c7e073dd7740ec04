//! The liveness endpoint, which reports the database connection as data.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::app_state::StoreState;

/// The body of the liveness response.
#[derive(Debug, PartialEq, Serialize)]
pub struct Status {
    /// Always "ok" while the server is running.
    pub status: &'static str,
    /// "connected" or "disconnected".
    pub db_status: &'static str,
    pub message: &'static str,
}

/// A route handler that reports that the server is running and whether the
/// database was reached at startup. It never fails.
pub async fn get_status(State(state): State<StoreState>) -> Json<Status> {
    let status = if state.store.is_connected() {
        Status {
            status: "ok",
            db_status: "connected",
            message: "Bookkeeping service is running normally",
        }
    } else {
        Status {
            status: "ok",
            db_status: "disconnected",
            message: "Database is not connected",
        }
    };

    Json(status)
}
