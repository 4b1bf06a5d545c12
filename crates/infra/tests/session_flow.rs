//! Integration tests for officer sign-in
//!
//! Login, restore and logout against a wiremock backend with the session
//! kept in an in-memory store shared between client instances.

mod support;

use std::sync::Arc;

use serde_json::json;
use skika_common::MemorySessionStore;
use skika_infra::{ApiClient, ApiClientConfig, AuthSession, SessionError};
use support::*;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PHONE: &str = "+254712345678";

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/token/"))
        .and(body_json(json!({ "phone_number": PHONE, "password": "s3cret" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access": "a1",
            "refresh": "r1",
            "user": {
                "id": "7",
                "first_name": "Officer",
                "last_name": "User",
                "role": "officer",
                "phone_number": PHONE
            }
        })))
        .expect(1)
        .mount(server)
        .await;
}

fn session_over(server: &MockServer, store: Arc<MemorySessionStore>) -> AuthSession {
    let client = ApiClient::new(ApiClientConfig::with_base_url(server.uri()), store)
        .expect("client should build");
    AuthSession::new(client)
}

#[tokio::test]
async fn login_stores_tokens_and_profile() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    let store = Arc::new(MemorySessionStore::new());
    let session = session_over(&server, store.clone());

    let profile = session.login(PHONE, "s3cret").await.unwrap();

    assert_eq!(profile.display_name(), "Officer User");
    assert!(session.is_authenticated());
    assert_eq!(session.current_user(), Some(profile));
    assert_eq!(store.snapshot("accessToken").as_deref(), Some("a1"));
    assert_eq!(store.snapshot("refreshToken").as_deref(), Some("r1"));
    assert!(store.snapshot("skika_user").unwrap().contains("Officer"));
}

#[tokio::test]
async fn signed_in_requests_carry_the_new_token() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/dashboard-stats/"))
        .and(header("authorization", bearer("a1").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "total_reports": 3 })))
        .expect(1)
        .mount(&server)
        .await;

    let session = session_over(&server, Arc::new(MemorySessionStore::new()));
    session.login(PHONE, "s3cret").await.unwrap();

    let stats: serde_json::Value = session.client().get("/dashboard-stats/").await.unwrap();
    assert_eq!(stats["total_reports"], 3);
}

#[tokio::test]
async fn restore_picks_up_a_previous_login() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    let store = Arc::new(MemorySessionStore::new());
    session_over(&server, store.clone()).login(PHONE, "s3cret").await.unwrap();

    let restarted = session_over(&server, store);
    assert!(!restarted.is_authenticated());

    assert!(restarted.restore().await.unwrap());
    let user = restarted.current_user().expect("profile should be restored");
    assert_eq!(user.role.as_deref(), Some("officer"));
    assert_eq!(user.phone.as_deref(), Some(PHONE));
}

#[tokio::test]
async fn restore_drops_profile_without_tokens() {
    let server = MockServer::start().await;
    let store = Arc::new(MemorySessionStore::with_entries([(
        "skika_user",
        r#"{"first_name":"Stale"}"#,
    )]));

    let session = session_over(&server, store.clone());

    assert!(!session.restore().await.unwrap());
    assert!(session.current_user().is_none());
    assert!(store.snapshot("skika_user").is_none());
}

#[tokio::test]
async fn logout_clears_everything() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    let store = Arc::new(MemorySessionStore::new());
    let session = session_over(&server, store.clone());
    session.login(PHONE, "s3cret").await.unwrap();

    session.logout().await.unwrap();

    assert!(!session.is_authenticated());
    assert!(session.current_user().is_none());
    assert!(store.is_empty());
}

#[tokio::test]
async fn invalid_phone_is_rejected_before_any_request() {
    let server = MockServer::start().await;
    let session = session_over(&server, Arc::new(MemorySessionStore::new()));

    let err = session.login("12345", "s3cret").await.unwrap_err();

    assert!(matches!(err, SessionError::Validation(_)));
    assert_eq!(err.message(), "Please enter a valid phone number");
    let requests = server.received_requests().await.expect("request recording is on");
    assert!(requests.is_empty());
}

#[tokio::test]
async fn rejected_credentials_leave_session_signed_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "No active account found with the given credentials"
        })))
        .mount(&server)
        .await;

    let store = Arc::new(MemorySessionStore::new());
    let session = session_over(&server, store.clone());
    let err = session.login(PHONE, "wrong").await.unwrap_err();

    match err {
        SessionError::Api(api) => assert_eq!(api.status(), 401),
        other => panic!("expected API error, got {:?}", other),
    }
    assert!(!session.is_authenticated());
    assert!(store.is_empty());
}

#[tokio::test]
async fn password_reset_posts_phone_number() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/password-reset/"))
        .and(body_json(json!({ "phone_number": PHONE })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "detail": "sent" })))
        .expect(1)
        .mount(&server)
        .await;

    let session = session_over(&server, Arc::new(MemorySessionStore::new()));
    let response = session.request_password_reset(PHONE).await.unwrap();
    assert_eq!(response["detail"], "sent");

    let err = session.request_password_reset("  ").await.unwrap_err();
    assert_eq!(err.message(), "Phone number is required");
}
