//! # Spotify Integration Module
//!
//! Everything that talks to the Spotify accounts service or Web API lives
//! here. The module splits along the three concerns of the token lifecycle:
//!
//! - [`auth`] - authorization-URL construction plus the two token-endpoint
//!   grants (authorization code, refresh token)
//! - [`request`] - the token-validity guard and the bearer-authenticated
//!   GET wrapper with its single bounded retry after a 401
//! - [`playlists`] - the read-only resource fetchers built on top of the
//!   request wrapper (`/me`, `/me/playlists`, `/playlists/{id}`)
//!
//! All functions take the shared [`reqwest::Client`] and the immutable
//! [`crate::config::SpotifyConfig`] explicitly; nothing here reads ambient
//! state, which keeps the whole layer exercisable against a mock provider.

pub mod auth;
pub mod playlists;
pub mod request;
