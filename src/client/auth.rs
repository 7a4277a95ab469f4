//! HTTP login for the CLI client.

use reqwest::StatusCode;

use crate::infrastructure::dto::http::{CredentialsRequest, ErrorResponse, TokenResponse};

use super::error::ClientError;

/// Obtain a bearer token for `username`.
///
/// Tries to log in first; if the account does not exist yet, registers it
/// with the same credentials.
pub async fn obtain_token(
    base_url: &str,
    username: &str,
    password: &str,
) -> Result<String, ClientError> {
    let client = reqwest::Client::new();
    let body = CredentialsRequest {
        username: username.to_string(),
        password: password.to_string(),
    };

    let response = client
        .post(format!("{base_url}/api/login"))
        .json(&body)
        .send()
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    if response.status() == StatusCode::UNAUTHORIZED {
        // Probably a new account; try to register it
        let response = client
            .post(format!("{base_url}/api/register"))
            .json(&body)
            .send()
            .await
            .map_err(|e| ClientError::ConnectionError(e.to_string()))?;
        return token_from_response(response).await;
    }

    token_from_response(response).await
}

async fn token_from_response(response: reqwest::Response) -> Result<String, ClientError> {
    let status = response.status();
    if !status.is_success() {
        let message = response
            .json::<ErrorResponse>()
            .await
            .map(|body| body.error)
            .unwrap_or_else(|_| status.to_string());
        return Err(ClientError::AuthFailed(message));
    }

    let token: TokenResponse = response
        .json()
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;
    Ok(token.token)
}
