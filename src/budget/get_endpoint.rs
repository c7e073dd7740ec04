//! Defines the endpoint for getting the budget of the current month.

use axum::{Json, extract::State};

use crate::{
    Error,
    app_state::StoreState,
    budget::core::{Budget, get_budget},
    clock::month_key,
};

/// A route handler for the budget of the current month.
///
/// The month comes from the server's clock, an unset budget has no limits.
pub async fn get_budget_endpoint(State(state): State<StoreState>) -> Result<Json<Budget>, Error> {
    let month = month_key(state.clock.today());
    let connection = state.store.lock()?;

    let budget = get_budget(&month, &connection).inspect_err(|error| {
        tracing::error!("Could not get the budget for {month}: {error}");
    })?;

    Ok(Json(budget))
}
