//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::auth::CredentialError;
use crate::domain::{BlobError, Username};
use crate::infrastructure::dto::http::{
    CredentialsRequest, ErrorResponse, LogoutResponse, MeResponse, PresenceResponse,
    TokenResponse, UploadResponse,
};

use super::super::{extract::AuthenticatedUser, state::AppState};

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: impl ToString) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

fn issue_token(state: &AppState, username: &Username) -> Result<Json<TokenResponse>, ApiError> {
    match state.token_service.issue(username) {
        Ok(token) => Ok(Json(TokenResponse {
            token,
            username: username.as_str().to_string(),
        })),
        Err(e) => {
            tracing::error!("failed to issue token for '{}': {e}", username.as_str());
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to issue token",
            ))
        }
    }
}

/// Create an account and start a session
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CredentialsRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    match state
        .credential_store
        .register(&request.username, &request.password)
        .await
    {
        Ok(username) => issue_token(&state, &username),
        Err(e) => Err(api_error(StatusCode::BAD_REQUEST, e)),
    }
}

/// Start a session for an existing account
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CredentialsRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    match state
        .credential_store
        .verify(&request.username, &request.password)
        .await
    {
        Ok(username) => issue_token(&state, &username),
        Err(e @ CredentialError::InvalidCredentials) => {
            Err(api_error(StatusCode::UNAUTHORIZED, e))
        }
        Err(e) => Err(api_error(StatusCode::BAD_REQUEST, e)),
    }
}

/// End a session.
///
/// Tokens are stateless, so there is nothing to revoke server-side; the
/// client discards its copy and the session is over.
pub async fn logout(_user: AuthenticatedUser) -> Json<LogoutResponse> {
    Json(LogoutResponse { success: true })
}

/// Identity bound to the presented token
pub async fn me(AuthenticatedUser(username): AuthenticatedUser) -> Json<MeResponse> {
    Json(MeResponse {
        username: username.as_str().to_string(),
    })
}

/// Current presence: connection count and the identities holding them
pub async fn presence(
    _user: AuthenticatedUser,
    State(state): State<Arc<AppState>>,
) -> Json<PresenceResponse> {
    let sessions = state.registry.sessions().await;
    let count = sessions.len();
    let mut usernames: Vec<String> = sessions
        .into_iter()
        .map(|session| session.username.as_str().to_string())
        .collect();
    usernames.sort();
    usernames.dedup();

    Json(PresenceResponse { count, usernames })
}

/// Accept one image upload and return its retrievable URL
pub async fn upload_image(
    _user: AuthenticatedUser,
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e))?
    {
        if field.name() != Some("image") {
            continue;
        }

        let Some(content_type) = field.content_type().map(str::to_string) else {
            return Err(api_error(
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "image field has no content type",
            ));
        };
        let bytes = field
            .bytes()
            .await
            .map_err(|e| api_error(StatusCode::PAYLOAD_TOO_LARGE, e))?;

        return match state.blob_store.store(bytes.to_vec(), &content_type).await {
            Ok(blob) => Ok(Json(UploadResponse {
                image_url: blob.url,
            })),
            Err(e @ BlobError::RejectedType(_)) => {
                Err(api_error(StatusCode::UNSUPPORTED_MEDIA_TYPE, e))
            }
            Err(e @ BlobError::TooLarge { .. }) => {
                Err(api_error(StatusCode::PAYLOAD_TOO_LARGE, e))
            }
        };
    }

    Err(api_error(StatusCode::BAD_REQUEST, "no image field in upload"))
}

/// Serve a previously uploaded image
pub async fn serve_upload(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Response {
    match state.blob_store.fetch(&name).await {
        Some((bytes, content_type)) => {
            ([(header::CONTENT_TYPE, content_type)], bytes).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}
