//! Defines the endpoint for updating a record.

use axum::extract::{Path, State};

use crate::{
    Error,
    app_state::StoreState,
    extract::JsonBody,
    message::Message,
    record::{
        core::{parse_record_id, update_record},
        form::UpdateRecordRequest,
    },
};

/// A route handler for partially updating a record.
///
/// Only the fields in the request body are changed, and the record's
/// `updated_at` time is always refreshed.
pub async fn edit_record_endpoint(
    State(state): State<StoreState>,
    Path(record_id): Path<String>,
    JsonBody(request): JsonBody<UpdateRecordRequest>,
) -> Result<Message, Error> {
    let connection = state.store.lock()?;
    let record_id = parse_record_id(&record_id)?;
    let changes = request.into_changes()?;

    match update_record(record_id, &changes, state.clock.now(), &connection) {
        Ok(0) => Err(Error::NotFound),
        Ok(_) => Ok(Message {
            message: "Record updated",
        }),
        Err(error) => {
            tracing::error!("Could not update record {record_id}: {error}");
            Err(error)
        }
    }
}
