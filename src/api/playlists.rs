use axum::Json;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;

use crate::api::{load_or_create_session, upstream_failure};
use crate::server::AppState;
use crate::spotify::playlists as spotify_playlists;

/// Lists the user's playlists as `[{name, id}, ...]`.
///
/// An unauthenticated session is sent to `/authorize` without any upstream
/// call, remembering this route so the callback can come back here.
pub async fn playlists(State(state): State<AppState>, jar: CookieJar) -> Response {
    let (jar, sid, mut session) = load_or_create_session(&state, jar).await;

    if !session.is_authenticated() {
        debug!("no token in session, redirecting to /authorize");
        session.previous_url = Some("/playlists".to_string());
        state.sessions.set(&sid, session).await;
        return (jar, Redirect::to("/authorize")).into_response();
    }

    if session.user_id.is_none() {
        match spotify_playlists::get_user_info(&state.http, &mut session, &state.config.spotify)
            .await
        {
            Ok(profile) => session.user_id = Some(profile.id),
            Err(err) => {
                state.sessions.set(&sid, session).await;
                return (jar, upstream_failure(err)).into_response();
            }
        }
    }

    let result =
        spotify_playlists::fetch_playlists(&state.http, &mut session, &state.config.spotify).await;
    // The fetch may have refreshed the token; persist either way.
    state.sessions.set(&sid, session).await;

    match result {
        Ok(entries) => (jar, Json(entries)).into_response(),
        Err(err) => (jar, upstream_failure(err)).into_response(),
    }
}

/// Returns one playlist's name, description and tracks.
pub async fn playlist(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(playlist_id): Path<String>,
) -> Response {
    let (jar, sid, mut session) = load_or_create_session(&state, jar).await;

    if !session.is_authenticated() {
        debug!("no token in session, redirecting to /authorize");
        session.previous_url = Some(format!("/playlist/{playlist_id}"));
        state.sessions.set(&sid, session).await;
        return (jar, Redirect::to("/authorize")).into_response();
    }

    if session.user_id.is_none() {
        match spotify_playlists::get_user_info(&state.http, &mut session, &state.config.spotify)
            .await
        {
            Ok(profile) => session.user_id = Some(profile.id),
            Err(err) => {
                state.sessions.set(&sid, session).await;
                return (jar, upstream_failure(err)).into_response();
            }
        }
    }

    let result = spotify_playlists::fetch_playlist(
        &state.http,
        &mut session,
        &playlist_id,
        &state.config.spotify,
    )
    .await;
    state.sessions.set(&sid, session).await;

    match result {
        Ok(payload) => (jar, Json(payload)).into_response(),
        Err(err) => (jar, upstream_failure(err)).into_response(),
    }
}
