//! Defines the endpoint for saving the budget of the current month.

use axum::extract::State;
use serde::Deserialize;

use crate::{
    Error,
    app_state::StoreState,
    budget::core::{BudgetLimits, upsert_budget},
    clock::month_key,
    extract::JsonBody,
    message::Message,
};

/// The body of a request to save a budget.
#[derive(Debug, Deserialize)]
pub struct SetBudgetRequest {
    pub budget: Option<BudgetLimits>,
}

/// A route handler for creating or replacing the budget of the current month.
pub async fn set_budget_endpoint(
    State(state): State<StoreState>,
    JsonBody(request): JsonBody<SetBudgetRequest>,
) -> Result<Message, Error> {
    let connection = state.store.lock()?;
    let limits = request.budget.ok_or(Error::MissingField("budget"))?;
    let now = state.clock.now();
    let month = month_key(now.date());

    upsert_budget(&month, &limits, now, &connection).inspect_err(|error| {
        tracing::error!("Could not save the budget for {month}: {error}");
    })?;

    Ok(Message {
        message: "Budget saved",
    })
}
