//! JSON bodies for responses that confirm a change.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// A confirmation message, sent with 200 OK.
#[derive(Debug, Serialize)]
pub struct Message {
    pub message: &'static str,
}

impl IntoResponse for Message {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// A confirmation that a resource was created, sent with 201 Created.
#[derive(Debug, Serialize)]
pub struct Created {
    pub message: &'static str,
    /// The ID of the new resource as a string.
    pub id: String,
}

impl IntoResponse for Created {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, Json(self)).into_response()
    }
}
