//! Request and response bodies for the HTTP endpoints.
//!
//! Responses also derive `Deserialize` so the CLI client can consume them
//! with the same types.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/register` and `POST /api/login`
#[derive(Debug, Serialize, Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

/// Successful register/login response carrying the bearer token
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
    pub username: String,
}

/// Response of `GET /api/me`
#[derive(Debug, Serialize, Deserialize)]
pub struct MeResponse {
    pub username: String,
}

/// Response of `GET /api/presence`
#[derive(Debug, Serialize, Deserialize)]
pub struct PresenceResponse {
    pub count: usize,
    pub usernames: Vec<String>,
}

/// Response of `POST /upload`
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub image_url: String,
}

/// Response of `POST /api/logout`
#[derive(Debug, Serialize, Deserialize)]
pub struct LogoutResponse {
    pub success: bool,
}

/// Error body returned by every endpoint on failure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
