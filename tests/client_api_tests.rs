use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bolbhidu::client::ApiClient;
use bolbhidu::error::ApiError;
use bolbhidu::models::PostDraft;
use bolbhidu::session::Session;

fn sample_session() -> Session {
    Session { token: "tok123".into(), user_id: 3, username: "admin".into() }
}

fn post_json(id: i64, headline: &str, published: &str) -> serde_json::Value {
    json!({
        "id": id,
        "headline": headline,
        "content": "body text",
        "tags": "politics",
        "author": 3,
        "author_username": "admin",
        "published_date": published,
        "updated_date": published,
    })
}

#[tokio::test]
async fn login_success_returns_the_session_triple() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login/"))
        .and(body_json(json!({"username": "admin", "password": "secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "9944b09199c62bcf9418ad846dd0e4bbdfc6ee4b",
            "user_id": 3,
            "username": "admin"
        })))
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri()).unwrap();
    let session = client.login("admin", "secret").await.expect("login should succeed");
    assert_eq!(session.token, "9944b09199c62bcf9418ad846dd0e4bbdfc6ee4b");
    assert_eq!(session.user_id, 3);
    assert_eq!(session.username, "admin");
}

#[tokio::test]
async fn login_failure_surfaces_the_server_detail_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "Invalid credentials"})))
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri()).unwrap();
    let err = client.login("admin", "wrong").await.unwrap_err();
    // login carries no token, so a 401 is a plain failure, not expiry
    match err {
        ApiError::RequestFailed { status, ref message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid credentials");
        }
        other => panic!("expected RequestFailed, got {}", other),
    }
}

#[tokio::test]
async fn empty_credentials_never_reach_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri()).unwrap();
    assert!(matches!(client.login("", "secret").await.unwrap_err(), ApiError::Validation { .. }));
    assert!(matches!(client.login("admin", "").await.unwrap_err(), ApiError::Validation { .. }));
    server.verify().await;
}

#[tokio::test]
async fn create_post_with_empty_headline_short_circuits() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/admin/posts/"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri()).unwrap();
    let err = client.create_post(&sample_session(), &PostDraft::new("   ")).await.unwrap_err();
    assert_eq!(err.message(), "Headline cannot be empty.");
    assert!(matches!(err, ApiError::Validation { .. }));
    server.verify().await;
}

#[tokio::test]
async fn list_posts_attaches_the_token_when_a_session_exists() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/posts/"))
        .and(header("Authorization", "Token tok123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([post_json(1, "With auth", "2025-11-02T09:15:00Z")])))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri()).unwrap();
    let session = sample_session();
    let posts = client.list_posts(Some(&session)).await.unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].headline, "With auth");
    server.verify().await;
}

#[tokio::test]
async fn list_posts_works_without_a_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/posts/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri()).unwrap();
    let posts = client.list_posts(None).await.unwrap();
    assert!(posts.is_empty());
}

#[tokio::test]
async fn stale_token_classifies_as_auth_expired() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/posts/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "Invalid token."})))
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri()).unwrap();
    let session = sample_session();
    let err = client.list_posts(Some(&session)).await.unwrap_err();
    assert!(err.is_auth_expired());
}

#[tokio::test]
async fn create_then_list_shows_the_new_post_exactly_once() {
    let server = MockServer::start().await;
    let created = post_json(42, "Fresh headline", "2025-11-03T08:00:00Z");
    Mock::given(method("POST"))
        .and(path("/api/admin/posts/"))
        .and(header("Authorization", "Token tok123"))
        .and(body_json(json!({"headline": "Fresh headline", "content": "Full text", "tags": "politics"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(created.clone()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/admin/posts/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            created,
            post_json(41, "Older", "2025-11-01T10:00:00Z"),
        ])))
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri()).unwrap();
    let session = sample_session();
    let draft = PostDraft {
        headline: "Fresh headline".into(),
        content: Some("Full text".into()),
        tags: Some("politics".into()),
    };
    let new_post = client.create_post(&session, &draft).await.unwrap();
    assert_eq!(new_post.id, 42);
    // the view re-lists instead of splicing locally
    let posts = client.list_posts(Some(&session)).await.unwrap();
    assert_eq!(posts.iter().filter(|p| p.id == 42).count(), 1);
}

#[tokio::test]
async fn repeated_listing_is_identical_without_mutation() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/posts/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            post_json(2, "Second", "2025-11-02T09:00:00Z"),
            post_json(1, "First", "2025-11-01T09:00:00Z"),
        ])))
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri()).unwrap();
    let first = client.list_posts(None).await.unwrap();
    let second = client.list_posts(None).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn fetch_post_propagates_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/posts/999/"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Not found."})))
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri()).unwrap();
    match client.fetch_post(999).await.unwrap_err() {
        ApiError::RequestFailed { status, ref message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Not found.");
        }
        other => panic!("expected RequestFailed, got {}", other),
    }
}

#[tokio::test]
async fn update_post_sends_the_draft_and_decodes_the_result() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/admin/posts/7/"))
        .and(header("Authorization", "Token tok123"))
        .and(body_json(json!({"headline": "Corrected"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(post_json(7, "Corrected", "2025-11-02T09:15:00Z")))
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri()).unwrap();
    let post = client.update_post(&sample_session(), 7, &PostDraft::new("Corrected")).await.unwrap();
    assert_eq!(post.headline, "Corrected");
}

#[tokio::test]
async fn delete_post_accepts_no_content() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/admin/posts/7/"))
        .and(header("Authorization", "Token tok123"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri()).unwrap();
    client.delete_post(&sample_session(), 7).await.expect("delete should succeed");
}

#[tokio::test]
async fn messages_come_back_newest_first_regardless_of_server_order() {
    let server = MockServer::start().await;
    // server answers T2, T1, T3 with T3 the newest
    Mock::given(method("GET"))
        .and(path("/api/messages/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 2, "content": "second", "timestamp": "2025-06-01T12:00:00Z"},
            {"id": 1, "content": "first", "timestamp": "2025-06-01T11:00:00Z"},
            {"id": 3, "content": "third", "timestamp": "2025-06-01T13:00:00Z"},
        ])))
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri()).unwrap();
    let messages = client.list_messages().await.unwrap();
    let ids: Vec<i64> = messages.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![3, 2, 1]);
}

#[tokio::test]
async fn create_message_round_trips_and_validates_locally() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/messages/"))
        .and(body_json(json!({"content": "hello board"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 9, "content": "hello board", "timestamp": "2025-06-01T14:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri()).unwrap();
    let err = client.create_message("   ").await.unwrap_err();
    assert_eq!(err.message(), "Message cannot be empty.");

    let msg = client.create_message("hello board").await.unwrap();
    assert_eq!(msg.id, 9);
    server.verify().await;
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    // nothing listens on the discard port
    let client = ApiClient::new("http://127.0.0.1:1").unwrap();
    let err = client.list_messages().await.unwrap_err();
    assert!(matches!(err, ApiError::Network { .. }), "got {}", err);
}

#[tokio::test]
async fn failure_without_a_detail_body_names_the_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/messages/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri()).unwrap();
    let err = client.list_messages().await.unwrap_err();
    assert_eq!(err.message(), "request failed with status 503");
}
