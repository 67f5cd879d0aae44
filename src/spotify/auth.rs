use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use tracing::warn;

use crate::config::SpotifyConfig;
use crate::error::ApiError;
use crate::types::{RefreshResponse, TokenResponse};

/// OAuth scope requested from the user.
///
/// <https://developer.spotify.com/documentation/web-api/concepts/scopes>
pub const SCOPES: &str = "playlist-read-private";

/// Builds the provider authorization URL for the given state key.
///
/// The user's browser is redirected here to grant consent; Spotify then
/// redirects back to `config.redirect_uri` carrying `code` and the same
/// `state`. Query values are percent-encoded, the `redirect_uri` in
/// particular.
pub fn authorization_url(state_key: &str, config: &SpotifyConfig) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("response_type", "code")
        .append_pair("client_id", &config.client_id)
        .append_pair("redirect_uri", &config.redirect_uri)
        .append_pair("scope", SCOPES)
        .append_pair("state", state_key)
        .finish();

    format!("{}?{}", config.auth_url, query)
}

/// Exchanges an authorization code for an access/refresh token pair.
///
/// POSTs to the token endpoint with the client's Basic authorization header
/// and the `authorization_code` grant. Only HTTP 200 counts as success;
/// any other status becomes [`ApiError::Status`] with no retry at this
/// layer.
pub async fn exchange_code(
    http: &Client,
    code: &str,
    config: &SpotifyConfig,
) -> Result<TokenResponse, ApiError> {
    let response = http
        .post(&config.token_url)
        .header(AUTHORIZATION, config.authorization())
        .header(ACCEPT, "application/json")
        .form(&[
            ("code", code),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await?;

    let status = response.status();
    if status != reqwest::StatusCode::OK {
        let body = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), body = %body, "code exchange rejected");
        return Err(ApiError::Status(status.as_u16()));
    }

    Ok(response.json::<TokenResponse>().await?)
}

/// Trades a refresh token for a fresh access token.
///
/// Same Basic authorization header as [`exchange_code`], `refresh_token`
/// grant. Returns the new access token and its lifetime; the refresh token
/// itself stays valid and unchanged.
pub async fn refresh_access_token(
    http: &Client,
    refresh_token: &str,
    config: &SpotifyConfig,
) -> Result<RefreshResponse, ApiError> {
    let response = http
        .post(&config.token_url)
        .header(AUTHORIZATION, config.authorization())
        .header(ACCEPT, "application/json")
        .form(&[
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ])
        .send()
        .await?;

    let status = response.status();
    if status != reqwest::StatusCode::OK {
        let body = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), body = %body, "token refresh rejected");
        return Err(ApiError::Status(status.as_u16()));
    }

    Ok(response.json::<RefreshResponse>().await?)
}
