use std::sync::Arc;
use std::time::Duration;

use axum::{Router, routing::get};
use reqwest::Client;

use crate::api;
use crate::config::Config;
use crate::session::SessionStore;

/// Timeout applied to every upstream call. A hanging provider surfaces as
/// a distinguished timeout error instead of a stuck request.
pub const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

/// Shared state for all route handlers.
///
/// Cloned per request; the configuration is immutable, the session store
/// is a shared handle, and the reqwest client pools its connections.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub sessions: SessionStore,
    pub http: Client,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let http = Client::builder()
            .timeout(UPSTREAM_TIMEOUT)
            .build()
            .expect("failed to build HTTP client");

        AppState {
            config: Arc::new(config),
            sessions: SessionStore::default(),
            http,
        }
    }
}

/// Builds the full route table.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/time", get(api::time))
        .route("/health", get(api::health))
        .route("/authorize", get(api::authorize))
        .route("/callback", get(api::callback))
        .route("/playlists", get(api::playlists))
        .route("/playlist/{playlist_id}", get(api::playlist))
        .route("/error", get(api::error_page))
        .fallback(api::not_found)
        .with_state(state)
}
