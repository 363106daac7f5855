use base64::Engine;

use super::*;
use crate::config::ApiConfig;
use crate::notify::AccessNotifier;
use crate::session::{Role, SessionStore};

fn make_token(payload: serde_json::Value) -> String {
    let encoded = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("h.{encoded}.s")
}

fn buyer_token() -> String {
    make_token(serde_json::json!({
        "nickname": "bo",
        "id": 7,
        "authorities": [{ "role": "buyer" }]
    }))
}

fn client_for(server: &mockito::Server) -> ApiClient {
    let config = ApiConfig::new(server.url());
    ApiClient::new(config, SessionStore::new(), AccessNotifier::new()).unwrap()
}

// =============================================================================
// refresh
// =============================================================================

#[tokio::test]
async fn refresh_stores_token_and_decoded_claims() {
    let mut server = mockito::Server::new_async().await;
    let token = buyer_token();
    server
        .mock("POST", "/auth/refresh")
        .with_status(200)
        .with_body(serde_json::json!({ "access_token": token }).to_string())
        .create_async()
        .await;

    let client = client_for(&server);
    let returned = client.refresh().await.unwrap();

    assert_eq!(returned, token);
    let session = client.session().snapshot();
    assert_eq!(session.access_token.as_deref(), Some(token.as_str()));
    assert_eq!(session.nickname.as_deref(), Some("bo"));
    assert_eq!(session.user_id.as_deref(), Some("7"));
    assert_eq!(session.role, Some(Role::Buyer));
}

#[tokio::test]
async fn refresh_non_ok_fails_and_leaves_session_alone() {
    let mut server = mockito::Server::new_async().await;
    server.mock("POST", "/auth/refresh").with_status(401).create_async().await;

    let client = client_for(&server);
    client.session().set_from_token(&buyer_token()).unwrap();

    let err = client.refresh().await.unwrap_err();
    assert!(matches!(err, ApiError::RefreshFailed(_)));
    assert!(client.session().snapshot().is_authenticated());
}

#[tokio::test]
async fn refresh_with_undecodable_token_rejects_whole_update() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/auth/refresh")
        .with_status(200)
        .with_body(serde_json::json!({ "access_token": "not-a-jwt" }).to_string())
        .create_async()
        .await;

    let client = client_for(&server);
    let previous = buyer_token();
    client.session().set_from_token(&previous).unwrap();

    let err = client.refresh().await.unwrap_err();
    assert!(matches!(err, ApiError::ClaimsDecode(_)));
    // All-or-nothing: the previous session is intact.
    assert_eq!(client.session().access_token().as_deref(), Some(previous.as_str()));
}

#[tokio::test]
async fn refresh_body_without_access_token_fails() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/auth/refresh")
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client.refresh().await.unwrap_err();
    assert!(matches!(err, ApiError::RefreshFailed(_)));
}

// =============================================================================
// login / logout
// =============================================================================

#[tokio::test]
async fn login_posts_credentials_and_stores_session() {
    let mut server = mockito::Server::new_async().await;
    let token = buyer_token();
    let mock = server
        .mock("POST", "/auth/login")
        .match_body(mockito::Matcher::Json(serde_json::json!({
            "email": "bo@example.com",
            "password": "hunter2"
        })))
        .with_status(200)
        .with_body(serde_json::json!({ "access_token": token }).to_string())
        .create_async()
        .await;

    let client = client_for(&server);
    client.login("bo@example.com", "hunter2").await.unwrap();

    assert_eq!(client.session().role(), Some(Role::Buyer));
    mock.assert_async().await;
}

#[tokio::test]
async fn login_rejection_surfaces_status() {
    let mut server = mockito::Server::new_async().await;
    server.mock("POST", "/auth/login").with_status(401).create_async().await;

    let client = client_for(&server);
    let err = client.login("bo@example.com", "wrong").await.unwrap_err();
    assert!(matches!(err, ApiError::Unexpected { status: 401 }));
    assert!(!client.session().snapshot().is_authenticated());
}

#[tokio::test]
async fn logout_clears_session_on_success() {
    let mut server = mockito::Server::new_async().await;
    server.mock("POST", "/auth/logout").with_status(204).create_async().await;

    let client = client_for(&server);
    client.session().set_from_token(&buyer_token()).unwrap();

    client.logout().await.unwrap();
    assert!(!client.session().snapshot().is_authenticated());
}

#[tokio::test]
async fn logout_clears_session_even_when_server_rejects() {
    let mut server = mockito::Server::new_async().await;
    server.mock("POST", "/auth/logout").with_status(500).create_async().await;

    let client = client_for(&server);
    client.session().set_from_token(&buyer_token()).unwrap();

    let err = client.logout().await.unwrap_err();
    assert!(matches!(err, ApiError::Unexpected { status: 500 }));
    assert!(!client.session().snapshot().is_authenticated());
}

// =============================================================================
// verify email / password recovery
// =============================================================================

#[tokio::test]
async fn verify_email_sends_token_as_query() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/auth/verify-email")
        .match_query(mockito::Matcher::UrlEncoded("token".into(), "abc123".into()))
        .with_status(200)
        .with_body(serde_json::json!({ "email": "bo@example.com" }).to_string())
        .create_async()
        .await;

    let client = client_for(&server);
    let body: serde_json::Value = client.verify_email("abc123").await.unwrap();

    assert_eq!(body["email"], "bo@example.com");
    mock.assert_async().await;
}

#[tokio::test]
async fn verify_email_failure_surfaces_status_not_message() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/auth/verify-email")
        .match_query(mockito::Matcher::Any)
        .with_status(400)
        .with_body(serde_json::json!({ "message": "token expired" }).to_string())
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client.verify_email::<serde_json::Value>("stale").await.unwrap_err();
    assert!(matches!(err, ApiError::Unexpected { status: 400 }));
}

#[tokio::test]
async fn forgot_and_reset_password_round_trip() {
    let mut server = mockito::Server::new_async().await;
    let forgot = server
        .mock("POST", "/auth/forgot-password")
        .match_body(mockito::Matcher::Json(serde_json::json!({ "email": "bo@example.com" })))
        .with_status(200)
        .create_async()
        .await;
    let reset = server
        .mock("POST", "/auth/reset-password")
        .match_body(mockito::Matcher::Json(serde_json::json!({
            "token": "t-1",
            "newPassword": "s3cret!"
        })))
        .with_status(200)
        .create_async()
        .await;

    let client = client_for(&server);
    client.forgot_password("bo@example.com").await.unwrap();
    client.reset_password("t-1", "s3cret!").await.unwrap();

    forgot.assert_async().await;
    reset.assert_async().await;
}

#[tokio::test]
async fn reset_password_failure_surfaces_status() {
    let mut server = mockito::Server::new_async().await;
    server.mock("POST", "/auth/reset-password").with_status(400).create_async().await;

    let client = client_for(&server);
    let err = client.reset_password("bad", "pw").await.unwrap_err();
    assert!(matches!(err, ApiError::Unexpected { status: 400 }));
}
