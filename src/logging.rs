//! Middleware for logging requests and responses.

use axum::{
    body::Body,
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{Error, auth::ADMIN_SECRET_HEADER};

/// The number of bytes of a body that are logged at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

const REDACTED: &str = "********";

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is
/// truncated and the full body is logged at the `debug` level.
/// The admin secret header is never logged.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_text = match read_body(body).await {
        Ok(body_text) => body_text,
        Err(error) => {
            tracing::warn!("Could not read request body: {error}");
            return Error::InvalidRequestBody(error).into_response();
        }
    };

    log_message(
        "Received request",
        &format!(
            "{} {} {:?}",
            parts.method,
            parts.uri,
            redact_headers(&parts.headers)
        ),
        &body_text,
    );

    let request = Request::from_parts(parts, body_text.into());
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_text = match read_body(body).await {
        Ok(body_text) => body_text,
        Err(error) => {
            tracing::error!("Could not read response body: {error}");
            return Response::from_parts(parts, Body::empty());
        }
    };

    log_message(
        "Sending response",
        &format!("{} {:?}", parts.status, parts.headers),
        &body_text,
    );

    Response::from_parts(parts, body_text.into())
}

fn redact_headers(headers: &HeaderMap) -> HeaderMap {
    let mut headers = headers.clone();

    if headers.contains_key(ADMIN_SECRET_HEADER) {
        headers.insert(ADMIN_SECRET_HEADER, HeaderValue::from_static(REDACTED));
    }

    headers
}

async fn read_body(body: Body) -> Result<String, String> {
    let body_bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .map_err(|error| error.to_string())?;

    Ok(String::from_utf8_lossy(&body_bytes).to_string())
}

fn truncate(body: &str) -> &str {
    let mut end = LOG_BODY_LENGTH_LIMIT.min(body.len());

    while !body.is_char_boundary(end) {
        end -= 1;
    }

    &body[..end]
}

fn log_message(label: &str, head: &str, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!("{label}: {head}\nbody: {}...", truncate(body));
        tracing::debug!("Full body: {body:?}");
    } else {
        tracing::info!("{label}: {head}\nbody: {body:?}");
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        http::{HeaderMap, HeaderValue},
        middleware,
        routing::post,
    };
    use axum_test::TestServer;

    use crate::auth::ADMIN_SECRET_HEADER;

    use super::{LOG_BODY_LENGTH_LIMIT, logging_middleware, redact_headers, truncate};

    #[test]
    fn redacts_admin_secret() {
        let mut headers = HeaderMap::new();
        headers.insert(ADMIN_SECRET_HEADER, HeaderValue::from_static("hunter2"));
        headers.insert("accept", HeaderValue::from_static("application/json"));

        let redacted = redact_headers(&headers);

        assert_eq!(redacted.get(ADMIN_SECRET_HEADER).unwrap(), "********");
        assert_eq!(redacted.get("accept").unwrap(), "application/json");
        assert!(!format!("{redacted:?}").contains("hunter2"));
    }

    #[test]
    fn leaves_headers_without_secret_alone() {
        let mut headers = HeaderMap::new();
        headers.insert("accept", HeaderValue::from_static("application/json"));

        assert_eq!(redact_headers(&headers), headers);
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let body = "é".repeat(LOG_BODY_LENGTH_LIMIT);

        let truncated = truncate(&body);

        assert!(truncated.len() <= LOG_BODY_LENGTH_LIMIT);
        assert!(body.starts_with(truncated));
    }

    #[tokio::test]
    async fn passes_bodies_through_unchanged() {
        let app = Router::new()
            .route("/echo", post(|body: String| async move { body }))
            .layer(middleware::from_fn(logging_middleware));
        let server = TestServer::try_new(app).unwrap();
        let body = "x".repeat(LOG_BODY_LENGTH_LIMIT * 2);

        let response = server
            .post("/echo")
            .add_header(ADMIN_SECRET_HEADER, "hunter2")
            .text(body.clone())
            .await;

        response.assert_status_ok();
        response.assert_text(body);
    }
}
