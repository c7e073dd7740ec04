//! Shared-secret authentication for the admin routes.

use axum::{
    extract::{FromRef, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use sha2::{Digest, Sha512};

use crate::{AppState, Error};

/// The header that carries the admin secret, `X-Admin-Secret`.
pub const ADMIN_SECRET_HEADER: &str = "x-admin-secret";

/// The configured admin secret, kept only as a SHA-512 digest.
///
/// Presented secrets are hashed the same way before they are compared.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminSecret(Option<Vec<u8>>);

impl AdminSecret {
    /// Create the secret, `None` means no secret was configured and nothing
    /// will be accepted.
    pub fn new(secret: Option<&str>) -> Self {
        Self(
            secret
                .filter(|secret| !secret.is_empty())
                .map(|secret| Sha512::digest(secret).to_vec()),
        )
    }

    /// Whether `presented` matches the configured secret.
    pub fn verify(&self, presented: Option<&str>) -> bool {
        match (&self.0, presented) {
            (Some(digest), Some(presented)) if !presented.is_empty() => {
                Sha512::digest(presented).as_slice() == digest.as_slice()
            }
            _ => false,
        }
    }

    /// Whether a secret was configured.
    pub fn is_configured(&self) -> bool {
        self.0.is_some()
    }
}

impl std::fmt::Debug for AdminSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = if self.is_configured() {
            "<redacted>"
        } else {
            "<unset>"
        };

        f.debug_tuple("AdminSecret").field(&value).finish()
    }
}

impl FromRef<AppState> for AdminSecret {
    fn from_ref(state: &AppState) -> Self {
        state.admin_secret.clone()
    }
}

/// Middleware that only lets requests with the correct `X-Admin-Secret`
/// header through, all others get a 403 response.
pub async fn admin_guard(
    State(admin_secret): State<AdminSecret>,
    request: Request,
    next: Next,
) -> Response {
    let presented = request
        .headers()
        .get(ADMIN_SECRET_HEADER)
        .and_then(|value| value.to_str().ok());

    if !admin_secret.verify(presented) {
        tracing::warn!(
            "Rejected {} {}: missing or incorrect admin secret",
            request.method(),
            request.uri().path()
        );
        return Error::Forbidden.into_response();
    }

    next.run(request).await
}
