//! Per-browser session state and the server-side store that holds it.
//!
//! The browser carries only an opaque session id in an `HttpOnly` cookie;
//! everything of value (tokens, the CSRF state key) stays server-side in
//! [`SessionStore`]. The store is a plain in-memory map; the service
//! promises nothing beyond an ephemeral per-browser session, and a restart
//! sends users back through the authorization flow.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;

/// Name of the cookie carrying the session id.
pub const SESSION_COOKIE: &str = "spotirelay_sid";

/// Size of the random session id in bytes.
const SESSION_ID_BYTES: usize = 32;

/// Sessions untouched for this long are dropped by the sweep task.
pub const SESSION_IDLE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Everything this service remembers about one browser session.
///
/// All fields are optional: a session exists from the first request on,
/// and the auth flow fills the fields in as it progresses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    /// CSRF state key, present only between `/authorize` and `/callback`.
    pub state_key: Option<String>,
    /// Current access token.
    pub token: Option<String>,
    /// Long-lived refresh token.
    pub refresh_token: Option<String>,
    /// Unix timestamp (seconds) after which `token` is expired.
    pub token_expiration: Option<i64>,
    /// Spotify user id, fetched lazily after authentication.
    pub user_id: Option<String>,
    /// Where to send the user after a successful authorization round-trip.
    pub previous_url: Option<String>,
}

impl Session {
    /// True once the session holds a usable token record.
    ///
    /// Expiration is *not* checked here; an expired-but-present token is
    /// the token guard's business, not a reason to restart authorization.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.token_expiration.is_some()
    }
}

struct Entry {
    session: Session,
    touched: Instant,
}

/// Server-side session store: opaque id -> [`Session`].
///
/// Cloning the store clones a handle to the same map.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Mutex<HashMap<String, Entry>>>,
    idle_ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(SESSION_IDLE_TTL)
    }
}

impl SessionStore {
    pub fn new(idle_ttl: Duration) -> Self {
        SessionStore {
            inner: Arc::new(Mutex::new(HashMap::new())),
            idle_ttl,
        }
    }

    /// Look up a session by id, refreshing its idle timer.
    pub async fn get(&self, id: &str) -> Option<Session> {
        let mut map = self.inner.lock().await;
        let entry = map.get_mut(id)?;
        entry.touched = Instant::now();
        Some(entry.session.clone())
    }

    /// Write a session back under the given id.
    pub async fn set(&self, id: &str, session: Session) {
        let mut map = self.inner.lock().await;
        map.insert(
            id.to_string(),
            Entry {
                session,
                touched: Instant::now(),
            },
        );
    }

    /// Drop a session entirely.
    pub async fn remove(&self, id: &str) {
        self.inner.lock().await.remove(id);
    }

    /// Remove entries idle past the TTL. Returns how many were dropped.
    pub async fn prune(&self) -> usize {
        let mut map = self.inner.lock().await;
        let before = map.len();
        map.retain(|_, entry| entry.touched.elapsed() < self.idle_ttl);
        before - map.len()
    }

    /// Spawns a background task that prunes idle sessions periodically.
    pub fn spawn_prune_task(&self, interval: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let dropped = store.prune().await;
                if dropped > 0 {
                    debug!(dropped, "pruned idle sessions");
                }
            }
        })
    }
}

/// Generates a fresh opaque session id.
///
/// 32 random bytes, URL-safe base64 without padding. The id is the only
/// thing the browser ever sees, so it must be unguessable.
pub fn new_session_id() -> String {
    let mut bytes = [0u8; SESSION_ID_BYTES];
    rand::rng().fill(&mut bytes[..]);
    URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_ids_are_long_and_unique() {
        let a = new_session_id();
        let b = new_session_id();
        // 32 bytes -> 43 base64 characters
        assert_eq!(a.len(), 43);
        assert_ne!(a, b);
    }

    #[test]
    fn authenticated_requires_token_and_expiration() {
        let mut session = Session::default();
        assert!(!session.is_authenticated());

        session.token = Some("tok".to_string());
        assert!(!session.is_authenticated());

        session.token_expiration = Some(1_700_000_000);
        assert!(session.is_authenticated());
    }

    #[tokio::test]
    async fn store_round_trips_sessions() {
        let store = SessionStore::default();
        let id = new_session_id();

        assert!(store.get(&id).await.is_none());

        let session = Session {
            user_id: Some("alice".to_string()),
            ..Default::default()
        };
        store.set(&id, session).await;

        let loaded = store.get(&id).await.expect("session should exist");
        assert_eq!(loaded.user_id.as_deref(), Some("alice"));

        store.remove(&id).await;
        assert!(store.get(&id).await.is_none());
    }

    #[tokio::test]
    async fn prune_drops_only_idle_entries() {
        let store = SessionStore::new(Duration::from_millis(20));
        store.set("old", Session::default()).await;
        tokio::time::sleep(Duration::from_millis(40)).await;
        store.set("fresh", Session::default()).await;

        let dropped = store.prune().await;
        assert_eq!(dropped, 1);
        assert!(store.get("old").await.is_none());
        assert!(store.get("fresh").await.is_some());
    }
}
