//! # API Module
//!
//! HTTP endpoints exposed to the browser. Each handler file covers one
//! route group:
//!
//! - [`time`] - trivial clock endpoint, useful as a liveness probe
//! - [`health`] - status and version for monitoring
//! - [`authorize`] - kicks off the OAuth authorization redirect
//! - [`callback`] - the provider's redirect target; validates the state
//!   key, exchanges the code and populates the session
//! - [`playlists`] / [`playlist`] - the proxied read-only resource routes
//! - [`error_page`] / [`not_found`] - the error page every failed flow
//!   redirects to, and the 404 fallback
//!
//! Handlers share the session-cookie plumbing below: a request either
//! presents a known session cookie or gets a fresh session and a new
//! cookie. Failed upstream calls are translated uniformly; anything that
//! needs re-authorization lands on `/error`, other upstream failures
//! become a 502 with a JSON body.

mod authorize;
mod callback;
mod fallback;
mod health;
mod playlists;
mod time;

pub use authorize::authorize;
pub use callback::callback;
pub use fallback::{error_page, not_found};
pub use health::health;
pub use playlists::{playlist, playlists};
pub use time::time;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde_json::json;

use crate::config::Mode;
use crate::error::ApiError;
use crate::server::AppState;
use crate::session::{self, SESSION_COOKIE, Session};

/// Loads the session identified by the request's cookie, or starts a new
/// one.
///
/// A cookie pointing at an unknown session id is not reused: the browser
/// gets a freshly generated id instead, so clients can never pick their
/// own session key. The returned jar carries the `Set-Cookie` when a new
/// session was started.
pub(crate) async fn load_or_create_session(
    state: &AppState,
    jar: CookieJar,
) -> (CookieJar, String, Session) {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        let id = cookie.value().to_string();
        if let Some(session) = state.sessions.get(&id).await {
            return (jar, id, session);
        }
    }

    let id = session::new_session_id();
    let cookie = Cookie::build((SESSION_COOKIE, id.clone()))
        .http_only(true)
        .secure(state.config.mode == Mode::Production)
        .same_site(SameSite::Lax)
        .path("/")
        .build();

    (jar.add(cookie), id, Session::default())
}

/// Maps an upstream failure onto the browser-facing response.
pub(crate) fn upstream_failure(err: ApiError) -> Response {
    if err.needs_reauthorization() {
        Redirect::to("/error").into_response()
    } else {
        (
            StatusCode::BAD_GATEWAY,
            Json(json!({ "error": "upstream request failed" })),
        )
            .into_response()
    }
}
