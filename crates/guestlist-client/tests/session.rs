//! Session store lifecycle against a mock admin API.

use guestlist_client::{Error, LoginRequest, RequestClient, SessionEvent, SessionStore};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn store(server: &MockServer) -> SessionStore {
    SessionStore::connect(RequestClient::builder().base_url(server.uri())).unwrap()
}

fn credentials() -> LoginRequest {
    LoginRequest {
        email: "admin@example.com".to_string(),
        password: "correct horse".to_string(),
    }
}

async fn me_responds(server: &MockServer, status: u16, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/api/admin/me"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

fn authenticated_me() -> serde_json::Value {
    json!({
        "authenticated": true,
        "user": {"_id": "1", "name": "A", "email": "a@x.com", "role": "admin"}
    })
}

#[tokio::test]
async fn test_hydrate_authenticated() {
    let server = MockServer::start().await;
    me_responds(&server, 200, authenticated_me()).await;
    let store = store(&server);
    assert!(store.snapshot().is_loading);

    let session = store.hydrate().await;

    assert!(session.is_authenticated);
    assert!(!session.is_loading);
    let user = session.user.unwrap();
    assert_eq!(user.id, "1");
    assert_eq!(user.name, "A");
    assert_eq!(user.email, "a@x.com");
    assert_eq!(user.role, "admin");
}

#[tokio::test]
async fn test_hydrate_unauthenticated_response() {
    let server = MockServer::start().await;
    me_responds(&server, 200, json!({"authenticated": false})).await;
    let store = store(&server);

    let session = store.hydrate().await;

    assert!(!session.is_authenticated);
    assert!(session.user.is_none());
    assert!(!session.is_loading);
}

#[tokio::test]
async fn test_hydrate_network_error_is_absorbed() {
    // Nothing listens on the discard port.
    let store = SessionStore::connect(RequestClient::builder().base_url("http://127.0.0.1:9")).unwrap();

    let session = store.hydrate().await;

    assert!(!session.is_authenticated);
    assert!(session.user.is_none());
    assert!(!session.is_loading);
}

#[tokio::test]
async fn test_hydrate_expired_session_is_absorbed() {
    let server = MockServer::start().await;
    me_responds(&server, 401, json!({"message": "jwt expired"})).await;
    Mock::given(method("POST"))
        .and(path("/api/admin/refresh-token"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    let store = store(&server);

    let session = store.hydrate().await;

    assert!(!session.is_authenticated);
    assert!(!session.is_loading);
}

#[tokio::test]
async fn test_hydrate_is_idempotent() {
    let server = MockServer::start().await;
    me_responds(&server, 200, authenticated_me()).await;
    let store = store(&server);

    let first = store.hydrate().await;
    let second = store.hydrate().await;

    assert_eq!(first, second);
    assert!(!second.is_loading);
}

#[tokio::test]
async fn test_login_then_hydrate() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/admin/login"))
        .and(body_json(json!({"email": "admin@example.com", "password": "correct horse"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Login successful"})))
        .expect(1)
        .mount(&server)
        .await;
    me_responds(&server, 200, authenticated_me()).await;
    let store = store(&server);
    let mut events = store.events();

    let session = store.login(&credentials()).await.unwrap();

    assert!(session.is_authenticated);
    assert!(matches!(events.recv().await.unwrap(), SessionEvent::Authenticated(u) if u.id == "1"));
}

#[tokio::test]
async fn test_bad_credentials_do_not_trigger_refresh() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/admin/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid credentials"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/admin/refresh-token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let store = store(&server);

    let err = store.login(&credentials()).await.unwrap_err();

    match err {
        Error::Request { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid credentials");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_session_cookie_is_replayed_not_exposed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/admin/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "accessToken=abc123; Path=/; HttpOnly")
                .set_body_json(json!({"message": "Login successful"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/admin/me"))
        .and(header("cookie", "accessToken=abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(authenticated_me()))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/admin/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"authenticated": false})))
        .with_priority(2)
        .mount(&server)
        .await;
    let store = store(&server);

    let session = store.login(&credentials()).await.unwrap();

    assert!(session.is_authenticated);
    for request in server.received_requests().await.unwrap() {
        assert!(!request.headers.contains_key("authorization"));
        assert!(!request.url.as_str().contains("abc123"));
        assert!(!String::from_utf8_lossy(&request.body).contains("abc123"));
    }
    assert!(!format!("{:?}", store).contains("abc123"));
}

#[tokio::test]
async fn test_logout_clears_session_even_when_server_fails() {
    let server = MockServer::start().await;
    me_responds(&server, 200, authenticated_me()).await;
    Mock::given(method("POST"))
        .and(path("/api/admin/logout"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    let store = store(&server);
    store.hydrate().await;
    let mut events = store.events();

    store.logout().await;

    assert!(!store.snapshot().is_authenticated);
    assert_eq!(events.recv().await.unwrap(), SessionEvent::SignedOut);
}

#[tokio::test]
async fn test_logout_offline_still_clears_session() {
    let store = SessionStore::connect(RequestClient::builder().base_url("http://127.0.0.1:9")).unwrap();
    store.set_user(guestlist_client::User {
        id: "1".to_string(),
        name: "A".to_string(),
        email: "a@x.com".to_string(),
        role: "admin".to_string(),
    });

    store.logout().await;

    assert!(!store.snapshot().is_authenticated);
}
