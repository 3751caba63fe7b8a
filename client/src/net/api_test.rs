use super::*;
use time::macros::datetime;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn user_json(id: Uuid) -> serde_json::Value {
    json!({
        "id": id,
        "email": "lifter@example.com",
        "name": "lifter",
        "avatar_url": null,
        "auth_method": "password"
    })
}

fn workout_json(id: Uuid, user_id: Uuid) -> serde_json::Value {
    json!({
        "id": id,
        "user_id": user_id,
        "duration": "00:45:00",
        "created_at": "2025-03-01T10:00:00Z",
        "exercises": []
    })
}

#[tokio::test]
async fn session_token_is_sent_as_cookie() {
    let server = MockServer::start().await;
    let user_id = Uuid::new_v4();
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("cookie", "session_token=abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(user_id)))
        .mount(&server)
        .await;

    let backend = HttpBackend::new(&server.uri(), Some("abc123")).expect("backend");
    let user = backend.me().await.expect("me");
    assert_eq!(user.id, user_id);
}

#[tokio::test]
async fn login_returns_session() {
    let server = MockServer::start().await;
    let user_id = Uuid::new_v4();
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "email": "a@b.co", "password": "hunter22" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "user": user_json(user_id), "token": "tok" })))
        .mount(&server)
        .await;

    let backend = HttpBackend::new(&server.uri(), None).expect("backend");
    let session = backend.login("a@b.co", "hunter22").await.expect("login");
    assert_eq!(session.token, "tok");
    assert_eq!(session.user.id, user_id);
}

#[tokio::test]
async fn unauthorized_maps_to_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/reauthenticate"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid email or password"))
        .mount(&server)
        .await;

    let backend = HttpBackend::new(&server.uri(), Some("tok")).expect("backend");
    let err = backend.reauthenticate("wrong").await.expect_err("rejected");
    assert!(matches!(err, ClientError::Auth(ref msg) if msg == "invalid email or password"));
}

#[tokio::test]
async fn other_failures_carry_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/exercises"))
        .respond_with(ResponseTemplate::new(409).set_body_string("exercise already exists: Curl"))
        .mount(&server)
        .await;

    let backend = HttpBackend::new(&server.uri(), Some("tok")).expect("backend");
    let err = backend
        .create_exercise(&ExerciseDef::new("Curl", "Strength", "Arms"))
        .await
        .expect_err("duplicate");
    match err {
        ClientError::Status { status, message } => {
            assert_eq!(status, 409);
            assert!(message.contains("Curl"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn missing_workout_is_none() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();
    Mock::given(method("GET"))
        .and(path(format!("/api/workouts/{id}")))
        .respond_with(ResponseTemplate::new(404).set_body_string("workout not found"))
        .mount(&server)
        .await;

    let backend = HttpBackend::new(&server.uri(), Some("tok")).expect("backend");
    assert!(backend.get_workout(id).await.expect("lookup").is_none());
}

#[tokio::test]
async fn list_sends_limit_and_cursor() {
    let server = MockServer::start().await;
    let (id, user_id) = (Uuid::new_v4(), Uuid::new_v4());
    Mock::given(method("GET"))
        .and(path("/api/workouts"))
        .and(query_param("limit", "10"))
        .and(query_param("before", "2025-03-02T00:00:00Z"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([workout_json(id, user_id)])))
        .mount(&server)
        .await;

    let backend = HttpBackend::new(&server.uri(), Some("tok")).expect("backend");
    let page = backend
        .list_workouts(Some(10), Some(datetime!(2025-03-02 00:00 UTC)))
        .await
        .expect("list");
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].created_at, datetime!(2025-03-01 10:00 UTC));
}

#[tokio::test]
async fn delete_account_sends_ticket() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/users/me"))
        .and(body_json(json!({ "ticket": "t-1" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let backend = HttpBackend::new(&server.uri(), Some("tok")).expect("backend");
    backend.delete_account("t-1").await.expect("deleted");
}

#[test]
fn base_url_trailing_slash_is_trimmed() {
    let backend = HttpBackend::new("http://localhost:3000/", None).expect("backend");
    assert_eq!(backend.base_url(), "http://localhost:3000");
    assert_eq!(backend.github_login_url(), "http://localhost:3000/auth/github");
}

#[test]
fn token_with_newline_is_rejected() {
    assert!(matches!(HttpBackend::new("http://localhost", Some("bad\ntoken")), Err(ClientError::InvalidHeader(_))));
}
