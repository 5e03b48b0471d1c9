//! API surface integration tests.
//!
//! Tests verify:
//! - The issue endpoint returns a well-formed, verifiable signed URL
//! - Issuance never rejects input
//! - The health endpoint
//! - Auth-disabled routers serve the stream endpoint directly

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use vod_streamer::clock::FixedClock;
use vod_streamer::server::{create_router, RouterConfig};

use super::test_utils::{make_video_bytes, test_router, MockVideoSource};

// =============================================================================
// Issue Endpoint
// =============================================================================

#[tokio::test]
async fn test_issue_returns_signed_url() {
    let clock = Arc::new(FixedClock::at(1000));
    let source = MockVideoSource::new().with_video("demo", make_video_bytes(100));
    let router = test_router(source, clock);

    let request = Request::builder()
        .uri("/videos?video_name=demo")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/json"
    );

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let info: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let video_url = info["video_url"].as_str().unwrap();

    assert!(video_url.starts_with("http://localhost:8000/videos/video?"));
    assert!(video_url.contains("signature="));
    assert!(video_url.contains("expires_at=1900"));
    assert!(video_url.contains("video_name=demo"));
}

#[tokio::test]
async fn test_issued_url_round_trips() {
    let clock = Arc::new(FixedClock::at(1000));
    let source = MockVideoSource::new().with_video("demo", make_video_bytes(256));
    let router = test_router(source, clock);

    let issue_req = Request::builder()
        .uri("/videos?video_name=demo")
        .body(Body::empty())
        .unwrap();
    let issue_resp = router.clone().oneshot(issue_req).await.unwrap();

    let body = issue_resp.into_body().collect().await.unwrap().to_bytes();
    let info: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let path_and_query = info["video_url"]
        .as_str()
        .unwrap()
        .strip_prefix("http://localhost:8000")
        .unwrap()
        .to_string();

    let stream_req = Request::builder()
        .uri(path_and_query)
        .body(Body::empty())
        .unwrap();
    let stream_resp = router.oneshot(stream_req).await.unwrap();

    assert_eq!(stream_resp.status(), StatusCode::PARTIAL_CONTENT);
}

#[tokio::test]
async fn test_issue_never_rejects_input() {
    let clock = Arc::new(FixedClock::at(1000));
    let source = MockVideoSource::new();
    let router = test_router(source, clock);

    // Missing name: issuance still answers 200; the name fails at stream time
    let request = Request::builder()
        .uri("/videos")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let info: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(info["video_url"].as_str().unwrap().contains("video_name="));
}

// =============================================================================
// Health Endpoint
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let clock = Arc::new(FixedClock::at(1000));
    let router = test_router(MockVideoSource::new(), clock);

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let health: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(health["status"], "healthy");
    assert!(health["version"].is_string());
}

// =============================================================================
// Auth Disabled
// =============================================================================

#[tokio::test]
async fn test_auth_disabled_streams_without_signature() {
    let source = MockVideoSource::new().with_video("demo", make_video_bytes(100));
    let router = create_router(source, RouterConfig::without_auth());

    let request = Request::builder()
        .uri("/videos/video?video_name=demo")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
}

#[tokio::test]
async fn test_auth_enabled_requires_signature() {
    let clock = Arc::new(FixedClock::at(1000));
    let source = MockVideoSource::new().with_video("demo", make_video_bytes(100));
    let router = test_router(source, clock);

    let request = Request::builder()
        .uri("/videos/video?video_name=demo")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Unknown Routes
// =============================================================================

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let clock = Arc::new(FixedClock::at(1000));
    let router = test_router(MockVideoSource::new(), clock);

    let request = Request::builder()
        .uri("/nope")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
