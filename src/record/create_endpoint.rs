//! Defines the endpoint for creating a new record.

use axum::extract::State;

use crate::{
    Error,
    app_state::StoreState,
    endpoints::{self, format_endpoint},
    extract::JsonBody,
    message::Created,
    record::{core::create_record, form::CreateRecordRequest},
};

/// A route handler for creating a new record, responds with the new record's ID.
pub async fn create_record_endpoint(
    State(state): State<StoreState>,
    JsonBody(request): JsonBody<CreateRecordRequest>,
) -> Result<Created, Error> {
    let connection = state.store.lock()?;
    let new_record = request.into_new_record()?;

    let record = create_record(new_record.clone(), state.clock.now(), &connection)
        .inspect_err(|error| {
            tracing::error!("Could not create record with {new_record:?}: {error}");
        })?;

    let id = record.id.to_string();
    tracing::debug!("Created record at {}", format_endpoint(endpoints::RECORD, &id));

    Ok(Created {
        message: "Record created",
        id,
    })
}
