//! Defines the endpoint for listing records.

use axum::{Json, extract::State};

use crate::{
    Error,
    app_state::StoreState,
    extract::QueryParams,
    record::{
        core::{Record, get_records},
        form::ListRecordsQuery,
    },
};

/// A route handler for listing records, newest first, optionally filtered by
/// date range, type and category.
pub async fn list_records_endpoint(
    State(state): State<StoreState>,
    QueryParams(query): QueryParams<ListRecordsQuery>,
) -> Result<Json<Vec<Record>>, Error> {
    let connection = state.store.lock()?;
    let filter = query.into_filter()?;

    let records = get_records(&filter, &connection).inspect_err(|error| {
        tracing::error!("Could not list records with {filter:?}: {error}");
    })?;

    Ok(Json(records))
}
