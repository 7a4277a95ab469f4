//! Bearer token extractor for the HTTP endpoints.

use std::sync::Arc;

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, header, request::Parts},
};

use crate::domain::Username;
use crate::infrastructure::dto::http::ErrorResponse;

use super::state::AppState;

/// The identity behind a request's `Authorization: Bearer <token>` header.
///
/// Verification goes through the same `TokenService` as the WebSocket
/// upgrade gate, so the two gates accept and reject identically.
pub struct AuthenticatedUser(pub Username);

impl FromRequestParts<Arc<AppState>> for AuthenticatedUser {
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));

        let Some(token) = token else {
            return Err(unauthorized("missing bearer token"));
        };

        match state.token_service.verify(token) {
            Ok(username) => Ok(AuthenticatedUser(username)),
            Err(e) => {
                tracing::warn!("rejecting request: {e}");
                Err(unauthorized("invalid or expired token"))
            }
        }
    }
}

fn unauthorized(message: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}
