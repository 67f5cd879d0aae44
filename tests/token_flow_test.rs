//! Token lifecycle tests against a mock provider.
//!
//! Covers the code exchange, the refresh grant, the token-validity guard
//! and the bounded 401 retry of the authenticated GET wrapper.

use chrono::Utc;
use reqwest::Client;
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use spotirelay::config::SpotifyConfig;
use spotirelay::error::ApiError;
use spotirelay::session::Session;
use spotirelay::spotify::auth::{exchange_code, refresh_access_token};
use spotirelay::spotify::request::{authenticated_get, ensure_valid_token};

fn mock_config(server: &MockServer) -> SpotifyConfig {
    SpotifyConfig {
        client_id: "test-client".to_string(),
        client_secret: "test-secret".to_string(),
        redirect_uri: "http://localhost:5000/callback".to_string(),
        auth_url: format!("{}/authorize", server.uri()),
        token_url: format!("{}/api/token", server.uri()),
        api_url: format!("{}/v1", server.uri()),
    }
}

fn authenticated_session(token: &str, expiration: i64) -> Session {
    Session {
        token: Some(token.to_string()),
        refresh_token: Some("refresh-1".to_string()),
        token_expiration: Some(expiration),
        ..Default::default()
    }
}

#[tokio::test]
async fn exchange_code_parses_token_pair() {
    let server = MockServer::start().await;
    let config = mock_config(&server);

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(header("authorization", config.authorization().as_str()))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=the-code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "A",
            "refresh_token": "R",
            "expires_in": 3600,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tokens = exchange_code(&Client::new(), "the-code", &config)
        .await
        .expect("exchange should succeed");

    assert_eq!(tokens.access_token, "A");
    assert_eq!(tokens.refresh_token.as_deref(), Some("R"));
    assert_eq!(tokens.expires_in, 3600);
}

#[tokio::test]
async fn exchange_code_maps_non_200_to_status_error() {
    let server = MockServer::start().await;
    let config = mock_config(&server);

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant"
        })))
        .mount(&server)
        .await;

    let err = exchange_code(&Client::new(), "bad-code", &config)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Status(400)), "got {err:?}");
}

#[tokio::test]
async fn refresh_returns_new_access_token() {
    let server = MockServer::start().await;
    let config = mock_config(&server);

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=refresh-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "A2",
            "expires_in": 1800,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let payload = refresh_access_token(&Client::new(), "refresh-1", &config)
        .await
        .expect("refresh should succeed");
    assert_eq!(payload.access_token, "A2");
    assert_eq!(payload.expires_in, 1800);
}

#[tokio::test]
async fn guard_skips_refresh_for_valid_token() {
    let server = MockServer::start().await;
    let config = mock_config(&server);

    // Any call to the token endpoint fails the test.
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut session = authenticated_session("A", Utc::now().timestamp() + 600);
    ensure_valid_token(&Client::new(), &mut session, &config)
        .await
        .expect("valid token should pass");

    assert_eq!(session.token.as_deref(), Some("A"));
}

#[tokio::test]
async fn guard_refreshes_expired_token() {
    let server = MockServer::start().await;
    let config = mock_config(&server);

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "A2",
            "expires_in": 1800,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = authenticated_session("A", Utc::now().timestamp() - 10);
    ensure_valid_token(&Client::new(), &mut session, &config)
        .await
        .expect("refresh should restore the session");

    assert_eq!(session.token.as_deref(), Some("A2"));
    let expiration = session.token_expiration.expect("expiration must be set");
    let expected = Utc::now().timestamp() + 1800;
    assert!(
        (expiration - expected).abs() <= 2,
        "expiration {expiration} not near {expected}"
    );
}

#[tokio::test]
async fn guard_signals_reauthorization_on_refresh_failure() {
    let server = MockServer::start().await;
    let config = mock_config(&server);

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = authenticated_session("A", Utc::now().timestamp() - 10);
    let err = ensure_valid_token(&Client::new(), &mut session, &config)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::AuthExpired));
}

#[tokio::test]
async fn guard_without_refresh_token_is_expired() {
    let server = MockServer::start().await;
    let config = mock_config(&server);

    let mut session = Session {
        token: Some("A".to_string()),
        token_expiration: Some(Utc::now().timestamp() - 10),
        ..Default::default()
    };
    let err = ensure_valid_token(&Client::new(), &mut session, &config)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::AuthExpired));
}

#[tokio::test]
async fn authenticated_get_returns_body_on_200() {
    let server = MockServer::start().await;
    let config = mock_config(&server);

    Mock::given(method("GET"))
        .and(path("/v1/me"))
        .and(header("authorization", "Bearer A"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "user-1" })))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = authenticated_session("A", Utc::now().timestamp() + 600);
    let url = format!("{}/me", config.api_url);
    let body = authenticated_get(&Client::new(), &mut session, &url, &[], &config)
        .await
        .expect("request should succeed");

    assert_eq!(body["id"], "user-1");
}

#[tokio::test]
async fn authenticated_get_retries_exactly_once_after_refresh() {
    let server = MockServer::start().await;
    let config = mock_config(&server);

    // First GET is rejected with 401...
    Mock::given(method("GET"))
        .and(path("/v1/me/playlists"))
        .and(header("authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    // ...the refresh hands out a new token...
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "fresh",
            "expires_in": 3600,
        })))
        .expect(1)
        .mount(&server)
        .await;

    // ...and the retry with the fresh token succeeds.
    Mock::given(method("GET"))
        .and(path("/v1/me/playlists"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .expect(1)
        .mount(&server)
        .await;

    // An expiration in the past forces the guard down the refresh path.
    let mut session = authenticated_session("stale", Utc::now().timestamp() - 10);
    let url = format!("{}/me/playlists", config.api_url);
    let body = authenticated_get(&Client::new(), &mut session, &url, &[], &config)
        .await
        .expect("retry should succeed");

    assert_eq!(body["items"], json!([]));
    assert_eq!(session.token.as_deref(), Some("fresh"));

    // Exactly two GETs went out: the original and the single retry.
    let requests = server.received_requests().await.expect("recording enabled");
    let gets = requests
        .iter()
        .filter(|r| r.method.as_str() == "GET")
        .count();
    assert_eq!(gets, 2);
}

#[tokio::test]
async fn authenticated_get_gives_up_after_second_401() {
    let server = MockServer::start().await;
    let config = mock_config(&server);

    // The provider keeps answering 401 no matter the token.
    Mock::given(method("GET"))
        .and(path("/v1/me"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    // Token still looks valid, so the guard refreshes nothing.
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut session = authenticated_session("A", Utc::now().timestamp() + 600);
    let url = format!("{}/me", config.api_url);
    let err = authenticated_get(&Client::new(), &mut session, &url, &[], &config)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Status(401)), "got {err:?}");

    let requests = server.received_requests().await.expect("recording enabled");
    let gets = requests
        .iter()
        .filter(|r| r.method.as_str() == "GET")
        .count();
    assert_eq!(gets, 2, "bounded retry means exactly two attempts");
}

#[tokio::test]
async fn authenticated_get_maps_other_statuses() {
    let server = MockServer::start().await;
    let config = mock_config(&server);

    Mock::given(method("GET"))
        .and(path("/v1/me"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = authenticated_session("A", Utc::now().timestamp() + 600);
    let url = format!("{}/me", config.api_url);
    let err = authenticated_get(&Client::new(), &mut session, &url, &[], &config)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Status(503)));
}

#[tokio::test]
async fn authenticated_get_sends_query_parameters() {
    let server = MockServer::start().await;
    let config = mock_config(&server);

    Mock::given(method("GET"))
        .and(path("/v1/me/playlists"))
        .and(query_param("limit", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = authenticated_session("A", Utc::now().timestamp() + 600);
    let url = format!("{}/me/playlists", config.api_url);
    authenticated_get(
        &Client::new(),
        &mut session,
        &url,
        &[("limit", "50")],
        &config,
    )
    .await
    .expect("request should succeed");
}
