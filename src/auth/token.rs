//! OAuth password-grant token exchange

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::credentials::Credentials;
use crate::errors::{AuthError, AuthResult};

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

/// Exchange credentials for a bearer access token
///
/// One attempt, no refresh. The refresh token in the response is ignored.
pub async fn exchange_token(
    client: &Client,
    auth_url: &Url,
    credentials: &Credentials,
) -> AuthResult<String> {
    debug!("Requesting access token for user: {}", credentials.username);

    let response = client
        .post(auth_url.clone())
        .form(&[
            ("grant_type", "password"),
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
            ("username", credentials.username.as_str()),
            ("password", credentials.password.as_str()),
        ])
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(AuthError::Rejected {
            status: status.as_u16(),
        });
    }

    let body = response.text().await?;
    access_token_from(&body)
}

fn access_token_from(body: &str) -> AuthResult<String> {
    serde_json::from_str::<TokenResponse>(body)
        .ok()
        .and_then(|response| response.access_token)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MissingToken)
}
