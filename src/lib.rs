//! Spotify Playlist Relay
//!
//! This library implements a small backend service that walks a browser user
//! through the Spotify OAuth 2.0 authorization-code flow and then proxies
//! read-only playlist requests on the user's behalf. The heart of it is the
//! token lifecycle: acquiring an access/refresh token pair, tracking
//! expiration, and transparently refreshing an expired access token before
//! retrying a failed API call.
//!
//! # Modules
//!
//! - `api` - HTTP endpoint handlers exposed to the browser
//! - `config` - Immutable configuration loaded from environment variables
//! - `error` - Error types shared across the crate
//! - `server` - Router construction and shared application state
//! - `session` - Per-browser session record and the server-side store
//! - `spotify` - Spotify Web API client: auth flow, token guard, fetchers
//! - `types` - Data structures and wire-format definitions
//! - `utils` - State-key generation and header helpers

pub mod api;
pub mod config;
pub mod error;
pub mod server;
pub mod session;
pub mod spotify;
pub mod types;
pub mod utils;
