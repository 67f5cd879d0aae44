use base64::{Engine, engine::general_purpose::STANDARD};
use rand::Rng;

/// Characters a state key may contain.
const STATE_KEY_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Default state-key length.
pub const STATE_KEY_SIZE: usize = 15;

/// Generates a random state key for an authorization request.
///
/// The state key is round-tripped through the provider redirect so the
/// callback handler can verify the response belongs to a request this
/// service actually sent. It must be unpredictable; `rand::rng()` is a
/// reseeding CSPRNG, so keys cannot be guessed from earlier ones.
pub fn create_state_key(size: usize) -> String {
    let mut rng = rand::rng();
    (0..size)
        .map(|_| {
            let idx = rng.random_range(0..STATE_KEY_ALPHABET.len());
            STATE_KEY_ALPHABET[idx] as char
        })
        .collect()
}

/// Builds the `Basic` authorization header value from client credentials.
pub fn basic_authorization(client_id: &str, client_secret: &str) -> String {
    let encoded = STANDARD.encode(format!("{client_id}:{client_secret}"));
    format!("Basic {encoded}")
}
