mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use quill::infra::http::{ApiState, build_api_router};

use common::{InMemoryPosts, RecordingCache, service};

fn router(posts: Arc<InMemoryPosts>) -> Router {
    router_with_timeout(posts, Duration::from_secs(30))
}

fn router_with_timeout(posts: Arc<InMemoryPosts>, request_timeout: Duration) -> Router {
    let state = ApiState {
        posts: Arc::new(service(posts, RecordingCache::new())),
        environment: "test".to_string(),
        request_timeout,
    };
    build_api_router(state)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request should build");

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("router should respond");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

async fn create(app: &Router, title: &str, tags: &[&str]) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/v1/posts",
        Some(json!({ "title": title, "content": format!("{title} body"), "tags": tags })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["post"].clone()
}

#[tokio::test]
async fn healthcheck_reports_available() {
    let app = router(InMemoryPosts::new());

    let (status, body) = send(&app, Method::GET, "/v1/healthcheck", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "available");
    assert_eq!(body["system_info"]["environment"], "test");
    assert_eq!(body["system_info"]["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn create_then_get_round_trips() {
    let posts = InMemoryPosts::new();
    let app = router(posts.clone());

    let created = create(&app, "Hello", &["go", "db"]).await;
    let id = created["id"].as_i64().expect("numeric id");

    let (status, body) = send(&app, Method::GET, &format!("/v1/posts/{id}"), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["post"], created);
    assert_eq!(body["post"]["tags"], json!(["go", "db"]));
    assert!(body["post"]["created_at"].is_string());
    assert_eq!(posts.activity().len(), 1);
}

#[tokio::test]
async fn create_without_tags_defaults_to_empty_list() {
    let app = router(InMemoryPosts::new());

    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/posts",
        Some(json!({ "title": "t", "content": "c" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["post"]["tags"], json!([]));
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let posts = InMemoryPosts::new();
    let app = router(posts.clone());

    let request = Request::builder()
        .method(Method::POST)
        .uri("/v1/posts")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"title\":"))
        .expect("request should build");
    let response = app.oneshot(request).await.expect("router should respond");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let body: Value = serde_json::from_slice(&bytes).expect("json");
    assert_eq!(body["error"]["code"], "bad_request");
    assert_eq!(posts.writes(), 0);
}

#[tokio::test]
async fn blank_title_is_invalid_input() {
    let app = router(InMemoryPosts::new());

    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/posts",
        Some(json!({ "title": " ", "content": "c", "tags": [] })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "invalid_input");
    assert_eq!(body["error"]["hint"], "title must not be blank");
}

#[tokio::test]
async fn invalid_ids_are_bad_request() {
    let app = router(InMemoryPosts::new());

    for uri in ["/v1/posts/abc", "/v1/posts/0", "/v1/posts/-4"] {
        let (status, body) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["error"]["code"], "bad_request");
    }
}

#[tokio::test]
async fn unknown_post_is_not_found() {
    let app = router(InMemoryPosts::new());

    let (status, body) = send(&app, Method::GET, "/v1/posts/999", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn unknown_post_is_not_found_after_another_is_cached() {
    let app = router(InMemoryPosts::new());
    let created = create(&app, "Cached", &[]).await;
    let id = created["id"].as_i64().expect("id");
    send(&app, Method::GET, &format!("/v1/posts/{id}"), None).await;

    let (status, body) = send(&app, Method::GET, &format!("/v1/posts/{}", id + 1), None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn put_and_patch_both_replace_the_post() {
    let app = router(InMemoryPosts::new());
    let created = create(&app, "Original", &["old"]).await;
    let id = created["id"].as_i64().expect("id");
    let uri = format!("/v1/posts/{id}");

    // Populate the cache so the follow-up read proves invalidation.
    send(&app, Method::GET, &uri, None).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({ "title": "Put", "content": "put body", "tags": ["new"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["post"]["title"], "Put");
    assert_eq!(body["post"]["created_at"], created["created_at"]);

    let (status, body) = send(
        &app,
        Method::PATCH,
        &uri,
        Some(json!({ "title": "Patch", "content": "patch body" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["post"]["tags"], json!([]));

    let (_, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(body["post"]["title"], "Patch");
    assert_eq!(body["post"]["content"], "patch body");
}

#[tokio::test]
async fn update_of_unknown_post_is_not_found() {
    let app = router(InMemoryPosts::new());

    let (status, _) = send(
        &app,
        Method::PUT,
        "/v1/posts/77",
        Some(json!({ "title": "t", "content": "c", "tags": [] })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn search_by_tag_filters_and_requires_tag() {
    let app = router(InMemoryPosts::new());
    create(&app, "Go one", &["go"]).await;
    create(&app, "Rust one", &["rust"]).await;
    create(&app, "Go two", &["db", "go"]).await;

    let (status, body) = send(&app, Method::GET, "/v1/posts/search-by-tag?tag=go", None).await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = body["posts"]
        .as_array()
        .expect("posts array")
        .iter()
        .map(|post| post["title"].as_str().expect("title"))
        .collect();
    assert_eq!(titles, vec!["Go one", "Go two"]);

    let (status, body) = send(
        &app,
        Method::GET,
        "/v1/posts/search-by-tag?tag=nonexistent",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["posts"], json!([]));

    let (status, _) = send(&app, Method::GET, "/v1/posts/search-by-tag", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::GET, "/v1/posts/search-by-tag?tag=", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn full_text_search_returns_matches() {
    let app = router(InMemoryPosts::new());
    create(&app, "Postgres internals", &[]).await;
    create(&app, "Gardening", &[]).await;

    let (status, body) = send(&app, Method::GET, "/v1/posts/search?q=postgres", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["posts"].as_array().expect("posts").len(), 1);

    let (status, _) = send(&app, Method::GET, "/v1/posts/search", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn storage_failures_hide_internal_detail() {
    let posts = InMemoryPosts::new();
    let app = router(posts.clone());
    posts.fail();

    let (status, body) = send(&app, Method::GET, "/v1/posts/1", None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "storage_unavailable");
    let rendered = body.to_string();
    assert!(!rendered.contains("connection refused"));
    assert!(body["error"].get("hint").is_none());
}

#[tokio::test(start_paused = true)]
async fn requests_past_deadline_are_cut_off() {
    let posts = InMemoryPosts::new();
    let app = router_with_timeout(posts.clone(), Duration::from_secs(2));
    posts.stall(Duration::from_secs(60));

    let (status, body) = send(&app, Method::GET, "/v1/posts/search?q=anything", None).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], "deadline_exceeded");
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let app = router(InMemoryPosts::new());

    let request = Request::builder()
        .uri("/v1/posts/404")
        .body(Body::empty())
        .expect("request should build");
    let response = app.oneshot(request).await.expect("router should respond");

    let request_id = response
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .expect("request id header");
    assert_eq!(request_id.len(), 36);
}
