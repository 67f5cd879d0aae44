use chrono::Utc;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::SpotifyConfig;
use crate::error::ApiError;
use crate::session::Session;
use crate::spotify::auth;

/// Ensures the session's access token is usable, refreshing it if expired.
///
/// If `now > token_expiration` (a missing expiration counts as expired),
/// the stored refresh token is traded for a new access token and the
/// session is updated with the new token and
/// `token_expiration = now + expires_in`. On any refresh failure this
/// returns [`ApiError::AuthExpired`]; the caller must send the user back
/// through the authorization flow rather than retry. An unexpired token
/// returns immediately without any network call.
pub async fn ensure_valid_token(
    http: &Client,
    session: &mut Session,
    config: &SpotifyConfig,
) -> Result<(), ApiError> {
    let expiration = session.token_expiration.unwrap_or(i64::MIN);
    if Utc::now().timestamp() > expiration {
        let Some(refresh_token) = session.refresh_token.clone() else {
            return Err(ApiError::AuthExpired);
        };

        match auth::refresh_access_token(http, &refresh_token, config).await {
            Ok(payload) => {
                debug!("access token refreshed");
                session.token = Some(payload.access_token);
                session.token_expiration = Some(Utc::now().timestamp() + payload.expires_in);
            }
            Err(err) => {
                warn!(error = %err, "token refresh failed");
                return Err(ApiError::AuthExpired);
            }
        }
    }

    Ok(())
}

/// Issues a bearer-authenticated GET and parses the JSON body.
///
/// On a 401 the token guard runs once; if it restores a valid token the
/// same request is retried exactly once. The retry bound is explicit: a
/// provider that keeps answering 401 after a successful refresh surfaces
/// as [`ApiError::Status`] instead of looping. All other non-200 statuses
/// are returned as [`ApiError::Status`] directly.
pub async fn authenticated_get(
    http: &Client,
    session: &mut Session,
    url: &str,
    params: &[(&str, &str)],
    config: &SpotifyConfig,
) -> Result<Value, ApiError> {
    let mut retried = false;

    loop {
        let token = session.token.clone().ok_or(ApiError::AuthExpired)?;
        let response = http
            .get(url)
            .bearer_auth(&token)
            .query(params)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => return Ok(response.json::<Value>().await?),
            StatusCode::UNAUTHORIZED if !retried => {
                debug!(url, "401 from provider, running token guard before retry");
                ensure_valid_token(http, session, config).await?;
                retried = true;
            }
            status => {
                warn!(url, status = status.as_u16(), "request failed");
                return Err(ApiError::Status(status.as_u16()));
            }
        }
    }
}
