//! Defines the app level error type and its conversion to JSON error responses.
use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// The message sent to clients when the store could not be reached at startup.
pub const STORE_UNAVAILABLE_MESSAGE: &str = "database is not initialized";

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The `X-Admin-Secret` header was missing or did not match the configured secret.
    #[error("unauthorized")]
    Forbidden,

    /// The store could not be reached when the server started.
    ///
    /// Requests that need the store fail with this error instead of retrying
    /// the connection.
    #[error("{}", STORE_UNAVAILABLE_MESSAGE)]
    StoreUnavailable,

    /// A field required to create a resource was not in the request body.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The request body was empty or was not a JSON object with any fields.
    #[error("invalid request data")]
    EmptyBody,

    /// An update request did not contain any field that can be updated.
    #[error("no fields to update")]
    NoFieldsToUpdate,

    /// The amount could not be interpreted as a non-negative number.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// A record type other than `income` or `expense` was given.
    #[error("invalid record type \"{0}\", expected \"income\" or \"expense\"")]
    InvalidRecordType(String),

    /// A date was not in the `YYYY-MM-DD` format.
    #[error("invalid date \"{0}\", expected the format YYYY-MM-DD")]
    InvalidDate(String),

    /// The request body could not be decoded.
    #[error("invalid request body: {0}")]
    InvalidRequestBody(String),

    /// The query string could not be decoded.
    #[error("invalid query string: {0}")]
    InvalidQuery(String),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("record not found")]
    NotFound,

    /// The client sent more requests to a route than its rate limit allows.
    #[error("too many requests, the limit is {0} per {1} seconds")]
    TooManyRequests(u32, u64),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    ///
    /// The underlying message is passed on to the client as is.
    #[error("{0}")]
    SqlError(rusqlite::Error),

    /// The stored budget could not be (de)serialized as JSON.
    #[error("could not serialize budget as JSON: {0}")]
    JSONSerializationError(String),
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        // rusqlite::Error is only partially comparable, compare by message instead.
        match (self, other) {
            (Error::SqlError(left), Error::SqlError(right)) => left.to_string() == right.to_string(),
            (left, right) => {
                std::mem::discriminant(left) == std::mem::discriminant(right)
                    && left.to_string() == right.to_string()
            }
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => Error::SqlError(error),
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidRequestBody(rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::InvalidQuery(rejection.body_text())
    }
}

impl Error {
    /// The HTTP status code that the error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Forbidden => StatusCode::FORBIDDEN,
            Error::MissingField(_)
            | Error::EmptyBody
            | Error::NoFieldsToUpdate
            | Error::InvalidAmount(_)
            | Error::InvalidRecordType(_)
            | Error::InvalidDate(_)
            | Error::InvalidRequestBody(_)
            | Error::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::TooManyRequests(..) => StatusCode::TOO_MANY_REQUESTS,
            Error::StoreUnavailable
            | Error::DatabaseLockError
            | Error::SqlError(_)
            | Error::JSONSerializationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// The JSON body sent with every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// A description of what went wrong.
    pub error: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use super::{Error, STORE_UNAVAILABLE_MESSAGE};

    async fn body_json(error: Error) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("could not read response body");

        (
            status,
            serde_json::from_slice(&bytes).expect("response body is not JSON"),
        )
    }

    #[tokio::test]
    async fn missing_field_names_the_field() {
        let (status, body) = body_json(Error::MissingField("category")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "missing required field: category");
    }

    #[tokio::test]
    async fn store_unavailable_uses_fixed_message() {
        let (status, body) = body_json(Error::StoreUnavailable).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], STORE_UNAVAILABLE_MESSAGE);
    }

    #[tokio::test]
    async fn sql_error_message_is_passed_through() {
        let sql_error = rusqlite::Error::InvalidColumnName("foo".to_owned());
        let want_message = sql_error.to_string();

        let (status, body) = body_json(Error::SqlError(sql_error)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], want_message.as_str());
    }

    #[test]
    fn no_rows_maps_to_not_found() {
        assert_eq!(
            Error::from(rusqlite::Error::QueryReturnedNoRows),
            Error::NotFound
        );
    }

    #[test]
    fn forbidden_maps_to_403() {
        assert_eq!(Error::Forbidden.status_code(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn too_many_requests_maps_to_429() {
        let (status, body) = body_json(Error::TooManyRequests(50, 60)).await;

        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            body["error"],
            "too many requests, the limit is 50 per 60 seconds"
        );
    }
}
