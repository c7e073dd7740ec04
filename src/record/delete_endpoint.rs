//! Defines the endpoint for deleting a record.

use axum::extract::{Path, State};

use crate::{
    Error,
    app_state::StoreState,
    message::Message,
    record::core::{delete_record, parse_record_id},
};

/// A route handler for deleting a record.
pub async fn delete_record_endpoint(
    State(state): State<StoreState>,
    Path(record_id): Path<String>,
) -> Result<Message, Error> {
    let connection = state.store.lock()?;
    let record_id = parse_record_id(&record_id)?;

    match delete_record(record_id, &connection) {
        Ok(0) => Err(Error::NotFound),
        Ok(_) => Ok(Message {
            message: "Record deleted",
        }),
        Err(error) => {
            tracing::error!("Could not delete record {record_id}: {error}");
            Err(error)
        }
    }
}
