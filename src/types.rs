use serde::{Deserialize, Serialize};

/// Token-endpoint response for the authorization-code grant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub expires_in: i64,
}

/// Token-endpoint response for the refresh-token grant.
///
/// Spotify does not rotate refresh tokens, so only the new access token and
/// its lifetime matter here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
    pub expires_in: i64,
}

/// The slice of the `/me` profile this service cares about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// One page of the current user's playlists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistsPage {
    pub items: Vec<PlaylistItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItem {
    pub id: String,
    pub name: String,
}

/// The shape this service returns from `/playlists`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistEntry {
    pub name: String,
    pub id: String,
}

impl From<PlaylistItem> for PlaylistEntry {
    fn from(item: PlaylistItem) -> Self {
        PlaylistEntry {
            name: item.name,
            id: item.id,
        }
    }
}
