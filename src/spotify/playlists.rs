use reqwest::Client;
use serde_json::Value;

use crate::config::SpotifyConfig;
use crate::error::ApiError;
use crate::session::Session;
use crate::spotify::request::authenticated_get;
use crate::types::{PlaylistEntry, PlaylistsPage, UserProfile};

/// Number of playlists requested per page.
const PLAYLIST_PAGE_LIMIT: &str = "50";

/// Fields requested for a single-playlist lookup.
const PLAYLIST_DETAIL_FIELDS: &str = "name,description,tracks";

/// Fetches the authenticated user's profile.
pub async fn get_user_info(
    http: &Client,
    session: &mut Session,
    config: &SpotifyConfig,
) -> Result<UserProfile, ApiError> {
    let url = format!("{}/me", config.api_url);
    let payload = authenticated_get(http, session, &url, &[], config).await?;
    Ok(serde_json::from_value(payload)?)
}

/// Lists the user's playlists as `{name, id}` pairs.
pub async fn fetch_playlists(
    http: &Client,
    session: &mut Session,
    config: &SpotifyConfig,
) -> Result<Vec<PlaylistEntry>, ApiError> {
    let url = format!("{}/me/playlists", config.api_url);
    let payload = authenticated_get(
        http,
        session,
        &url,
        &[("limit", PLAYLIST_PAGE_LIMIT)],
        config,
    )
    .await?;

    let page: PlaylistsPage = serde_json::from_value(payload)?;
    Ok(page.items.into_iter().map(PlaylistEntry::from).collect())
}

/// Fetches one playlist's name, description and tracks.
///
/// The payload is passed through untyped: the track listing is large and
/// the service only relays it.
pub async fn fetch_playlist(
    http: &Client,
    session: &mut Session,
    playlist_id: &str,
    config: &SpotifyConfig,
) -> Result<Value, ApiError> {
    let url = format!("{}/playlists/{}", config.api_url, playlist_id);
    authenticated_get(
        http,
        session,
        &url,
        &[("fields", PLAYLIST_DETAIL_FIELDS)],
        config,
    )
    .await
}
