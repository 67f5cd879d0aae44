//! Error types shared across the crate.
//!
//! Two families exist: [`ConfigError`] for startup-time configuration
//! problems, and [`ApiError`] for anything that can go wrong while talking
//! to the Spotify Web API on a user's behalf. Nothing here is fatal to the
//! process after startup; handlers translate `ApiError` into redirects or
//! error responses per request.

use thiserror::Error;

/// Errors raised while loading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// An environment variable is set but cannot be used as-is.
    #[error("invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },
}

/// Errors raised by upstream Spotify API calls.
///
/// This is the tagged result the request layer hands back instead of a
/// silent `None`: callers can tell "re-authorization required" apart from
/// "the provider answered with an unexpected status" apart from "the
/// network failed".
#[derive(Debug, Error)]
pub enum ApiError {
    /// The upstream call exceeded the client's request timeout.
    #[error("upstream request timed out")]
    Timeout,

    /// A transport-level failure (connection refused, TLS, DNS, ...).
    #[error("transport error: {0}")]
    Transport(reqwest::Error),

    /// The provider answered with a non-success status code.
    #[error("unexpected status {0} from provider")]
    Status(u16),

    /// The access token is expired and could not be refreshed. The caller
    /// must send the user back through the authorization flow.
    #[error("access token expired and refresh failed")]
    AuthExpired,

    /// The provider answered 200 with a body this crate cannot interpret.
    #[error("malformed provider response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else {
            ApiError::Transport(err)
        }
    }
}

impl ApiError {
    /// True when the only way forward is a fresh authorization round-trip.
    pub fn needs_reauthorization(&self) -> bool {
        matches!(self, ApiError::AuthExpired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_missing_displays_variable_name() {
        let err = ConfigError::MissingEnvVar("SPOTIFY_CLIENT_ID".to_string());
        assert_eq!(
            err.to_string(),
            "missing required environment variable: SPOTIFY_CLIENT_ID"
        );
    }

    #[test]
    fn api_error_status_displays_code() {
        let err = ApiError::Status(503);
        assert_eq!(err.to_string(), "unexpected status 503 from provider");
    }

    #[test]
    fn only_auth_expired_needs_reauthorization() {
        assert!(ApiError::AuthExpired.needs_reauthorization());
        assert!(!ApiError::Status(401).needs_reauthorization());
        assert!(!ApiError::Timeout.needs_reauthorization());
    }
}
