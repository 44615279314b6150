//! End-to-end tests over the HTTP surface: login → connect → list →
//! refresh → disconnect, with mock providers behind the real router.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum_test::TestServer;
use multimusic_auth::mocks::{MemoryAccountStore, MockIdentityProvider, MockPlatformGateway};
use multimusic_auth::{AuthGateway, GatewayConfig};
use multimusic_web::gateway_router;
use serde_json::Value;
use std::sync::Arc;

const FRONTEND: &str = "http://127.0.0.1:3000";

fn server_with(identity: MockIdentityProvider, platforms: MockPlatformGateway) -> TestServer {
    let gateway = AuthGateway::new(
        identity,
        platforms,
        MemoryAccountStore::new(),
        GatewayConfig::default(),
    )
    .expect("gateway construction");

    TestServer::new(gateway_router(Arc::new(gateway))).expect("test server")
}

fn server() -> TestServer {
    server_with(MockIdentityProvider::new(), MockPlatformGateway::new())
}

/// Run the SSO login flow and return the session token from the redirect.
async fn login(server: &TestServer) -> String {
    let start = server.post("/auth/google/login").await;
    start.assert_status_ok();
    let body: Value = start.json();
    assert!(body["authUrl"].as_str().unwrap().contains("oauth"));
    assert!(!body["state"].as_str().unwrap().is_empty());

    let callback = server
        .get("/auth/google/callback")
        .add_query_param("code", "abc")
        .add_query_param("state", body["state"].as_str().unwrap())
        .await;

    let location = callback
        .header("location")
        .to_str()
        .expect("location header")
        .to_string();
    assert!(
        location.starts_with(&format!("{FRONTEND}?session=")),
        "unexpected redirect: {location}"
    );

    location
        .split("session=")
        .nth(1)
        .expect("session in redirect")
        .to_string()
}

/// Connect a platform while authenticated and assert the success redirect.
async fn connect(server: &TestServer, session: &str, platform: &str) {
    let start = server
        .post(&format!("/platforms/{platform}/connect"))
        .authorization_bearer(session)
        .await;
    start.assert_status_ok();
    let body: Value = start.json();
    let state = body["state"].as_str().unwrap();
    assert!(state.starts_with("mmp_"));

    let callback = server
        .get(&format!("/platforms/{platform}/callback"))
        .add_query_param("code", "xyz")
        .add_query_param("state", state)
        .await;

    let location = callback.header("location").to_str().unwrap().to_string();
    assert_eq!(location, format!("{FRONTEND}/dashboard?{platform}=connected"));
}

#[tokio::test]
async fn test_full_login_and_connect_scenario() {
    let server = server();

    // Login via google with code "abc" resolves to one account.
    let session = login(&server).await;

    // Connect spotify with code "xyz" while authenticated.
    connect(&server, &session, "spotify").await;

    // The connection shows up, tokens never do.
    let response = server
        .get("/user/platforms")
        .authorization_bearer(&session)
        .await;
    response.assert_status_ok();
    let body: Value = response.json();

    let platforms = body["platforms"].as_array().unwrap();
    assert_eq!(platforms.len(), 1);
    assert_eq!(platforms[0]["platform"], "spotify");
    assert_eq!(platforms[0]["connected"], true);
    assert_eq!(platforms[0]["platformUserId"], "spotify_user_123");
    assert!(response.text().contains("connectedAt"));
    assert!(!response.text().contains("accessToken"));
}

#[tokio::test]
async fn test_repeat_login_resolves_same_account() {
    let server = server();

    let first = login(&server).await;
    let second = login(&server).await;

    let profile_of = |response: Value| response["userId"].as_str().unwrap().to_string();

    let profile_a: Value = server
        .get("/user/profile")
        .authorization_bearer(&first)
        .await
        .json();
    let profile_b: Value = server
        .get("/user/profile")
        .authorization_bearer(&second)
        .await
        .json();

    assert_eq!(profile_of(profile_a), profile_of(profile_b));
}

#[tokio::test]
async fn test_profile_and_auth_providers() {
    let server = server();
    let session = login(&server).await;

    let profile: Value = server
        .get("/user/profile")
        .authorization_bearer(&session)
        .await
        .json();
    assert_eq!(profile["email"], "test@example.com");
    assert_eq!(profile["displayName"], "Test User");
    assert_eq!(profile["primaryAuthProvider"], "google");
    assert!(profile["userId"].as_str().unwrap().starts_with("mmp_"));

    let providers: Value = server
        .get("/user/auth-providers")
        .authorization_bearer(&session)
        .await
        .json();
    let list = providers["providers"].as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["provider"], "google");
    assert_eq!(list[0]["linked"], true);
}

#[tokio::test]
async fn test_refresh_returns_new_access_token() {
    let server = server();
    let session = login(&server).await;
    connect(&server, &session, "spotify").await;

    let response = server
        .post("/platforms/spotify/refresh")
        .authorization_bearer(&session)
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["accessToken"], "mock_refreshed_access_token");
    assert!(body["expiresIn"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn test_refresh_rejected_token_prompts_reconnect() {
    let server = server_with(
        MockIdentityProvider::new(),
        MockPlatformGateway::new().with_failing_refresh(),
    );
    let session = login(&server).await;
    connect(&server, &session, "spotify").await;

    let response = server
        .post("/platforms/spotify/refresh")
        .authorization_bearer(&session)
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["code"], "TOKEN_REFRESH_FAILED");
}

#[tokio::test]
async fn test_refresh_unconnected_platform_is_404() {
    let server = server();
    let session = login(&server).await;

    let response = server
        .post("/platforms/spotify/refresh")
        .authorization_bearer(&session)
        .await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn test_disconnect_is_idempotent() {
    let server = server();
    let session = login(&server).await;
    connect(&server, &session, "spotify").await;

    for _ in 0..2 {
        let response = server
            .delete("/user/platforms/spotify")
            .authorization_bearer(&session)
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["message"], "spotify disconnected successfully");
    }

    let platforms: Value = server
        .get("/user/platforms")
        .authorization_bearer(&session)
        .await
        .json();
    assert!(platforms["platforms"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_bearer_session_is_required() {
    let server = server();

    for (method, path) in [
        ("GET", "/user/profile"),
        ("GET", "/user/auth-providers"),
        ("GET", "/user/platforms"),
        ("POST", "/platforms/spotify/connect"),
        ("POST", "/platforms/spotify/refresh"),
        ("DELETE", "/user/platforms/spotify"),
    ] {
        let response = match method {
            "GET" => server.get(path).await,
            "POST" => server.post(path).await,
            _ => server.delete(path).await,
        };
        response.assert_status_unauthorized();
    }
}

#[tokio::test]
async fn test_forged_session_rejected() {
    let server = server();

    let response = server
        .get("/user/profile")
        .authorization_bearer("forged.session.credential")
        .await;

    response.assert_status_unauthorized();
}

#[tokio::test]
async fn test_provider_error_redirects_to_frontend() {
    let server = server();

    let response = server
        .get("/auth/google/callback")
        .add_query_param("error", "access_denied")
        .await;

    let location = response.header("location").to_str().unwrap().to_string();
    assert_eq!(location, format!("{FRONTEND}?error=access_denied"));
}

#[tokio::test]
async fn test_failed_exchange_redirects_with_error() {
    let server = server_with(MockIdentityProvider::failing(), MockPlatformGateway::new());

    let response = server
        .get("/auth/google/callback")
        .add_query_param("code", "expired")
        .add_query_param("state", "whatever")
        .await;

    let location = response.header("location").to_str().unwrap().to_string();
    assert_eq!(location, format!("{FRONTEND}?error=callback_failed"));
}

#[tokio::test]
async fn test_platform_callback_with_malformed_state() {
    let server = server();

    let response = server
        .get("/platforms/spotify/callback")
        .add_query_param("code", "xyz")
        .add_query_param("state", "no-segments")
        .await;

    let location = response.header("location").to_str().unwrap().to_string();
    assert_eq!(location, format!("{FRONTEND}/dashboard?error=invalid_state"));
}

#[tokio::test]
async fn test_unknown_provider_and_platform_are_400() {
    let server = server();
    let session = login(&server).await;

    server.post("/auth/myspace/login").await.assert_status_bad_request();
    server
        .post("/platforms/winamp/connect")
        .authorization_bearer(&session)
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn test_health() {
    let server = server();

    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}
