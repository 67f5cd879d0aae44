use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};

use crate::api::load_or_create_session;
use crate::server::AppState;
use crate::session::Session;
use crate::spotify::{auth, playlists};

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// The provider's OAuth redirect target.
///
/// Validation happens strictly before any network call: the `state`
/// parameter must match the key stored at `/authorize` time, and a
/// provider-reported `error` short-circuits before `code` is ever touched.
/// Only then is the code exchanged for tokens and the session populated.
/// Every failure path lands on `/error` and leaves the session
/// unauthenticated.
pub async fn callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> impl IntoResponse {
    let (jar, sid, mut session) = load_or_create_session(&state, jar).await;

    // A missing stored key means this callback belongs to no authorize
    // redirect of ours; an equal-but-absent pair must not pass.
    if session.state_key.is_none() || params.state != session.state_key {
        warn!("state key mismatch on callback");
        return (jar, Redirect::to("/error"));
    }

    if let Some(provider_error) = params.error {
        warn!(error = %provider_error, "provider reported an authorization error");
        return (jar, Redirect::to("/error"));
    }

    // The key is single-use; clear it before the exchange.
    session.state_key = None;

    let Some(code) = params.code else {
        warn!("callback carried no authorization code");
        state.sessions.set(&sid, session).await;
        return (jar, Redirect::to("/error"));
    };

    match auth::exchange_code(&state.http, &code, &state.config.spotify).await {
        Ok(tokens) => {
            session.token = Some(tokens.access_token);
            session.refresh_token = tokens.refresh_token;
            session.token_expiration = Some(Utc::now().timestamp() + tokens.expires_in);
        }
        Err(err) => {
            warn!(error = %err, "code exchange failed");
            state.sessions.set(&sid, Session::default()).await;
            return (jar, Redirect::to("/error"));
        }
    }

    match playlists::get_user_info(&state.http, &mut session, &state.config.spotify).await {
        Ok(profile) => {
            info!(user_id = %profile.id, "user authenticated");
            session.user_id = Some(profile.id);
        }
        Err(err) => {
            warn!(error = %err, "profile fetch after exchange failed");
            state.sessions.set(&sid, Session::default()).await;
            return (jar, Redirect::to("/error"));
        }
    }

    let destination = session
        .previous_url
        .take()
        .unwrap_or_else(|| "/playlists".to_string());
    state.sessions.set(&sid, session).await;

    (jar, Redirect::to(&destination))
}
