//! API integration tests against a mock inference service.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gscreen_api::{create_router, ApiConfig, AppState};
use gscreen_inference::{InferenceClient, InferenceClientConfig};

const TOKEN: &str = "r8_test_token";

fn router_for(base_url: &str) -> Router {
    let config = InferenceClientConfig::with_base_url(base_url).unwrap();
    let inference = InferenceClient::new(config).unwrap();
    create_router(AppState::new(ApiConfig::default(), inference), None)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Test health endpoint.
#[tokio::test]
async fn test_health_endpoint() {
    let (status, body) = send(router_for("http://127.0.0.1:9"), get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

/// Test security and cross-origin isolation headers.
#[tokio::test]
async fn test_response_headers() {
    let response = router_for("http://127.0.0.1:9")
        .oneshot(get("/healthz"))
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers["Cross-Origin-Embedder-Policy"], "require-corp");
    assert_eq!(headers["Cross-Origin-Opener-Policy"], "same-origin");
    assert_eq!(headers["X-Content-Type-Options"], "nosniff");
    assert!(headers.contains_key("X-Request-ID"));
}

/// Test that CORS preflight responses carry the cross-origin isolation headers.
#[tokio::test]
async fn test_preflight_response_headers() {
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/api/prediction")
        .header("Origin", "https://app.example.com")
        .header("Access-Control-Request-Method", "POST")
        .body(Body::empty())
        .unwrap();

    let response = router_for("http://127.0.0.1:9")
        .oneshot(request)
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers["Access-Control-Allow-Origin"], "*");
    assert_eq!(headers["Cross-Origin-Embedder-Policy"], "require-corp");
    assert_eq!(headers["Cross-Origin-Opener-Policy"], "same-origin");
    assert_eq!(headers["X-Content-Type-Options"], "nosniff");
}

#[tokio::test]
async fn test_upload_file_returns_fetch_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/files"))
        .and(header("Authorization", "Bearer r8_test_token"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "file_1",
            "urls": { "get": "https://api.replicate.com/v1/files/file_1" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = send(
        router_for(&server.uri()),
        post_json(
            "/api/file",
            json!({
                "api_token": TOKEN,
                "file_name": "clip.bin",
                "data": "data:application/octet-stream;base64,AAA="
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "data": "https://api.replicate.com/v1/files/file_1" }));

    let requests = server.received_requests().await.unwrap();
    let upload = String::from_utf8_lossy(&requests[0].body).into_owned();
    assert!(upload.contains(r#"filename="clip.bin""#));
    assert!(upload.contains("application/octet-stream\r\n\r\n\0\0\r\n"));
    assert!(!upload.contains(TOKEN));
}

#[tokio::test]
async fn test_upload_file_network_error_is_envelope() {
    let (status, body) = send(
        router_for("http://127.0.0.1:9"),
        post_json(
            "/api/file",
            json!({
                "api_token": TOKEN,
                "file_name": "clip.bin",
                "data": "data:application/octet-stream;base64,AAA="
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let fields = body.as_object().unwrap();
    assert_eq!(fields.len(), 1);
    assert!(fields["error"].as_str().unwrap().starts_with("Network error"));
}

#[tokio::test]
async fn test_upload_file_malformed_data_uri_makes_no_remote_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/files"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let (status, body) = send(
        router_for(&server.uri()),
        post_json(
            "/api/file",
            json!({ "api_token": TOKEN, "file_name": "clip.bin", "data": "no-separator" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "error": "Malformed data URI: missing ',' separator" })
    );
}

#[tokio::test]
async fn test_upload_file_accepts_large_payloads() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/files"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "urls": { "get": "https://api.replicate.com/v1/files/big" }
        })))
        .mount(&server)
        .await;

    // 3 MiB of zero bytes, above axum's default 2 MB JSON limit once encoded
    let payload = "A".repeat(4 * 1024 * 1024);
    let (_, body) = send(
        router_for(&server.uri()),
        post_json(
            "/api/file",
            json!({
                "api_token": TOKEN,
                "file_name": "video.mp4",
                "data": format!("data:video/mp4;base64,{}", payload)
            }),
        ),
    )
    .await;

    assert_eq!(body, json!({ "data": "https://api.replicate.com/v1/files/big" }));
}

#[tokio::test]
async fn test_create_prediction_forwards_version_and_input() {
    let server = MockServer::start().await;
    let descriptor = json!({
        "id": "p1",
        "version": "abc",
        "status": "starting",
        "input": {},
        "output": null,
        "logs": ""
    });
    Mock::given(method("POST"))
        .and(path("/predictions"))
        .and(header("Authorization", "Bearer r8_test_token"))
        .and(body_json(json!({ "version": "abc", "input": {} })))
        .respond_with(ResponseTemplate::new(201).set_body_json(descriptor.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = send(
        router_for(&server.uri()),
        post_json(
            "/api/prediction",
            json!({ "api_token": TOKEN, "version": "abc", "input": {} }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "data": descriptor }));
}

#[tokio::test]
async fn test_create_prediction_passes_remote_errors_in_data() {
    let server = MockServer::start().await;
    let remote_error = json!({
        "title": "Input validation failed",
        "detail": "input.video: Does not match format 'uri'",
        "status": 422
    });
    Mock::given(method("POST"))
        .and(path("/predictions"))
        .respond_with(ResponseTemplate::new(422).set_body_json(remote_error.clone()))
        .mount(&server)
        .await;

    let (_, body) = send(
        router_for(&server.uri()),
        post_json(
            "/api/prediction",
            json!({ "api_token": TOKEN, "version": "abc", "input": { "video": 1 } }),
        ),
    )
    .await;

    assert_eq!(body, json!({ "data": remote_error }));
}

#[tokio::test]
async fn test_create_prediction_without_version_is_left_to_remote() {
    let server = MockServer::start().await;
    let remote_error = json!({
        "title": "Invalid version or not permitted",
        "detail": "The specified version does not exist",
        "status": 422
    });
    Mock::given(method("POST"))
        .and(path("/predictions"))
        .and(body_json(json!({ "input": {} })))
        .respond_with(ResponseTemplate::new(422).set_body_json(remote_error.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = send(
        router_for(&server.uri()),
        post_json("/api/prediction", json!({ "api_token": TOKEN, "input": {} })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "data": remote_error }));
}

#[tokio::test]
async fn test_create_prediction_forwards_null_input_and_non_string_version() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predictions"))
        .and(body_json(json!({ "version": 5, "input": null })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "p2" })))
        .expect(1)
        .mount(&server)
        .await;

    let (_, body) = send(
        router_for(&server.uri()),
        post_json(
            "/api/prediction",
            json!({ "api_token": TOKEN, "version": 5, "input": null }),
        ),
    )
    .await;

    assert_eq!(body, json!({ "data": { "id": "p2" } }));
}

#[tokio::test]
async fn test_non_string_token_is_not_echoed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let (status, body) = send(
        router_for(&server.uri()),
        post_json(
            "/api/file",
            json!({
                "api_token": 987654,
                "file_name": "clip.bin",
                "data": "data:application/octet-stream;base64,AAA="
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("credential must be a string"));
    assert!(!error.contains("987654"));
}

#[tokio::test]
async fn test_create_prediction_malformed_body_is_envelope() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/prediction")
        .header("Content-Type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send(router_for("http://127.0.0.1:9"), request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["error"].is_string());
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn test_get_prediction_strips_logs() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/predictions/p1"))
        .and(header("Authorization", "Bearer r8_test_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "p1",
            "status": "processing",
            "logs": "frame 1/300\nframe 2/300",
            "output": null
        })))
        .mount(&server)
        .await;

    let app = router_for(&server.uri());
    let uri = format!("/api/prediction?api_token={}&id=p1", TOKEN);

    let (status, first) = send(app.clone(), get(&uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        first,
        json!({ "data": { "id": "p1", "status": "processing", "output": null } })
    );

    let (_, second) = send(app, get(&uri)).await;
    assert_eq!(first, second);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|r| !r.url.as_str().contains(TOKEN)));
}

#[tokio::test]
async fn test_get_prediction_missing_id_is_envelope() {
    let (status, body) = send(
        router_for("http://127.0.0.1:9"),
        get(&format!("/api/prediction?api_token={}", TOKEN)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["error"].as_str().unwrap().contains("id"));
}
