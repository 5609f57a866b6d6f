//! Endpoint APIs against a mock admin API.

use guestlist_client::{
    AccompanyEntry, Error, GuestInput, Invitation, MultipartField, RequestClient,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> RequestClient {
    RequestClient::builder().base_url(server.uri()).build().unwrap()
}

fn input() -> GuestInput {
    GuestInput {
        name: "Asha Rao".to_string(),
        email: "asha@example.com".to_string(),
        mobile: "9876543210".to_string(),
        accompany_quota: 2,
        description: "<p>See you there</p>".to_string(),
    }
}

fn guest_json(id: &str) -> serde_json::Value {
    json!({
        "_id": id,
        "regNum": "REG-007",
        "name": "Asha Rao",
        "email": "asha@example.com",
        "mobile": "9876543210",
        "accompanyQuota": 2,
        "description": "<p>See you there</p>"
    })
}

fn invitation() -> Invitation {
    Invitation {
        guest_name: "Asha Rao".to_string(),
        reg_num: "REG-007".to_string(),
        accompany_quota: 1,
    }
}

#[tokio::test]
async fn test_requests_carry_json_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/guests"))
        .and(header("accept", "application/json"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client(&server).guests().list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_guest_posts_input() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/admin/guests"))
        .and(body_json(json!({
            "name": "Asha Rao",
            "email": "asha@example.com",
            "mobile": "9876543210",
            "accompanyQuota": 2,
            "description": "<p>See you there</p>"
        })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({"message": "Guest created", "data": guest_json("g7")})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let guest = client(&server).guests().create(&input()).await.unwrap();

    assert_eq!(guest.id, "g7");
    assert_eq!(guest.reg_num.as_deref(), Some("REG-007"));
}

#[tokio::test]
async fn test_invalid_guest_is_never_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/admin/guests"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;
    let mut bad = input();
    bad.mobile = "12ab".to_string();

    let err = client(&server).guests().create(&bad).await.unwrap_err();

    match err {
        Error::Validation(errors) => assert_eq!(errors[0].field, "mobile"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_update_and_get_guest() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/admin/guests/g7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": guest_json("g7")})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/admin/guests/g7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(guest_json("g7")))
        .expect(1)
        .mount(&server)
        .await;
    let client = client(&server);

    let updated = client.guests().update("g7", &input()).await.unwrap();
    let fetched = client.guests().get("g7").await.unwrap();

    assert_eq!(updated, fetched);
}

#[tokio::test]
async fn test_delete_accepts_no_content() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/admin/guests/g7"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client(&server).guests().delete("g7").await.unwrap();
}

#[tokio::test]
async fn test_server_message_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/admin/guests/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Guest not found"})))
        .mount(&server)
        .await;

    let err = client(&server).guests().delete("missing").await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.user_message(), "Guest not found");
}

#[tokio::test]
async fn test_unparseable_error_body_uses_generic_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/accompanies"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let err = client(&server).accompanies().list().await.unwrap_err();

    assert!(err.is_server_error());
    assert_eq!(err.user_message(), "Request failed");
}

#[tokio::test]
async fn test_forgot_password_returns_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/admin/forgot-password"))
        .and(body_json(json!({"email": "admin@example.com"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"message": "Password reset link sent to your email."})),
        )
        .mount(&server)
        .await;

    let response = client(&server)
        .auth()
        .forgot_password("admin@example.com")
        .await
        .unwrap();

    assert_eq!(
        response.message.as_deref(),
        Some("Password reset link sent to your email.")
    );
}

#[tokio::test]
async fn test_multipart_body_keeps_transport_boundary() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/admin/guests/import"))
        .and(header_regex("content-type", "^multipart/form-data; boundary="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    let client = client(&server);

    let request = client
        .request(reqwest::Method::POST, "api/admin/guests/import")
        .unwrap()
        .multipart(vec![MultipartField::File {
            name: "file".to_string(),
            file_name: "guests.csv".to_string(),
            bytes: b"name,email\n".to_vec(),
        }]);
    client.send(request).await.unwrap();
}

#[tokio::test]
async fn test_invitation_lookup() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/invitation/accompany-registration/tok123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "guestName": "Asha Rao",
            "regNum": "REG-007",
            "accompanyQuota": 1
        })))
        .mount(&server)
        .await;

    let found = client(&server).invitations().get("tok123").await.unwrap();

    assert_eq!(found, invitation());
}

#[tokio::test]
async fn test_expired_invitation_has_generic_message_and_no_refresh() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/invitation/accompany-registration/stale"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "jwt malformed"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/admin/refresh-token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client(&server).invitations().get("stale").await.unwrap_err();

    assert_eq!(err.user_message(), "Invalid or expired invitation");
}

#[tokio::test]
async fn test_registration_submits_exact_quota() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/invitation/accompany-registration/tok123"))
        .and(body_json(json!({"accompanies": [
            {"name": "Ravi", "email": "ravi@example.com", "mobile": "9123456780"}
        ]})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"message": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .invitations()
        .register(
            "tok123",
            &invitation(),
            vec![AccompanyEntry {
                name: "Ravi".to_string(),
                email: "ravi@example.com".to_string(),
                mobile: "9123456780".to_string(),
            }],
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_registration_with_zero_quota_posts_empty_list() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/invitation/accompany-registration/tok123"))
        .and(body_json(json!({"accompanies": []})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"message": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let invitation = Invitation {
        accompany_quota: 0,
        ..invitation()
    };
    client(&server)
        .invitations()
        .register("tok123", &invitation, Vec::new())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_registration_with_wrong_count_is_rejected_locally() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/invitation/accompany-registration/tok123"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let err = client(&server)
        .invitations()
        .register("tok123", &invitation(), Vec::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn test_failed_registration_has_generic_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/invitation/accompany-registration/tok123"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({"message": "duplicate"})))
        .mount(&server)
        .await;

    let err = client(&server)
        .invitations()
        .register(
            "tok123",
            &invitation(),
            vec![AccompanyEntry {
                name: "Ravi".to_string(),
                email: "ravi@example.com".to_string(),
                mobile: "9123456780".to_string(),
            }],
        )
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), "Submission failed");
}
