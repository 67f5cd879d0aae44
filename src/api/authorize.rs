use axum::extract::State;
use axum::response::{IntoResponse, Redirect};
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;

use crate::api::load_or_create_session;
use crate::server::AppState;
use crate::spotify::auth;
use crate::utils;

/// Starts the authorization flow.
///
/// Generates a fresh state key, stores it in the session and redirects the
/// browser to the provider's consent page. A state key from an earlier,
/// abandoned attempt is simply overwritten.
pub async fn authorize(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let (jar, sid, mut session) = load_or_create_session(&state, jar).await;

    let state_key = utils::create_state_key(utils::STATE_KEY_SIZE);
    session.state_key = Some(state_key.clone());
    state.sessions.set(&sid, session).await;

    let url = auth::authorization_url(&state_key, &state.config.spotify);
    debug!("redirecting to provider authorization page");

    (jar, Redirect::to(&url))
}
