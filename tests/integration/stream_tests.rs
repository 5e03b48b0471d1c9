//! Range delivery integration tests.
//!
//! Tests verify:
//! - Chunk windows and their framing headers match the body exactly
//! - No-range requests stream from the start
//! - Boundary offsets and unsatisfiable ranges
//! - Path traversal is rejected before storage is touched

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use vod_streamer::clock::FixedClock;

use super::test_utils::{
    make_video_bytes, stream_uri, test_router, test_signer, MockVideoSource,
};

const VIDEO_SIZE: usize = 3_000_000;
const CHUNK_SIZE: usize = 1_048_576;

fn signed_request(clock: Arc<FixedClock>, video_name: &str, range: Option<&str>) -> Request<Body> {
    let issued = test_signer(clock).issue("http://localhost:8000", video_name);

    let mut builder =
        Request::builder().uri(stream_uri(video_name, issued.expires_at, &issued.signature));
    if let Some(range) = range {
        builder = builder.header("Range", range);
    }
    builder.body(Body::empty()).unwrap()
}

// =============================================================================
// Chunk Framing
// =============================================================================

#[tokio::test]
async fn test_first_chunk_headers_and_body() {
    let clock = Arc::new(FixedClock::at(1000));
    let source = MockVideoSource::new().with_video("demo", make_video_bytes(VIDEO_SIZE));
    let router = test_router(source, clock.clone());

    let request = signed_request(clock, "demo", Some("bytes=0-"));
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);

    let headers = response.headers();
    assert_eq!(headers.get("content-type").unwrap(), "video/mp4");
    assert_eq!(headers.get("accept-ranges").unwrap(), "bytes");
    assert_eq!(
        headers.get("content-range").unwrap(),
        "bytes 0-1048575/3000000"
    );
    assert_eq!(
        headers.get("content-length").unwrap(),
        &CHUNK_SIZE.to_string()
    );

    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(body.len(), CHUNK_SIZE);
    assert_eq!(&body[..], &make_video_bytes(VIDEO_SIZE)[..CHUNK_SIZE]);
}

#[tokio::test]
async fn test_seek_chunk_matches_offset() {
    let clock = Arc::new(FixedClock::at(1000));
    let source = MockVideoSource::new().with_video("demo", make_video_bytes(VIDEO_SIZE));
    let router = test_router(source, clock.clone());

    let request = signed_request(clock, "demo", Some("bytes=1048576-"));
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(
        response.headers().get("content-range").unwrap(),
        "bytes 1048576-2097151/3000000"
    );

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let expected = make_video_bytes(VIDEO_SIZE);
    assert_eq!(&body[..], &expected[CHUNK_SIZE..2 * CHUNK_SIZE]);
}

#[tokio::test]
async fn test_final_chunk_is_short() {
    let clock = Arc::new(FixedClock::at(1000));
    let source = MockVideoSource::new().with_video("demo", make_video_bytes(VIDEO_SIZE));
    let router = test_router(source, clock.clone());

    let request = signed_request(clock, "demo", Some("bytes=2097152-"));
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(
        response.headers().get("content-range").unwrap(),
        "bytes 2097152-2999999/3000000"
    );

    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(body.len(), VIDEO_SIZE - 2 * CHUNK_SIZE);
}

// =============================================================================
// Range Header Edge Cases
// =============================================================================

#[tokio::test]
async fn test_no_range_header_streams_from_start() {
    let clock = Arc::new(FixedClock::at(1000));
    let source = MockVideoSource::new().with_video("demo", make_video_bytes(VIDEO_SIZE));
    let router = test_router(source, clock.clone());

    let request = signed_request(clock, "demo", None);
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(
        response.headers().get("content-range").unwrap(),
        "bytes 0-1048575/3000000"
    );
}

#[tokio::test]
async fn test_digit_free_range_streams_from_start() {
    let clock = Arc::new(FixedClock::at(1000));
    let source = MockVideoSource::new().with_video("demo", make_video_bytes(100));
    let router = test_router(source, clock.clone());

    let request = signed_request(clock, "demo", Some("bytes=-"));
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(
        response.headers().get("content-range").unwrap(),
        "bytes 0-99/100"
    );
}

#[tokio::test]
async fn test_last_byte_boundary() {
    let clock = Arc::new(FixedClock::at(1000));
    let source = MockVideoSource::new().with_video("demo", make_video_bytes(VIDEO_SIZE));
    let router = test_router(source, clock.clone());

    let request = signed_request(clock, "demo", Some("bytes=2999999-"));
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(response.headers().get("content-length").unwrap(), "1");

    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(body.len(), 1);
    assert_eq!(body[0], make_video_bytes(VIDEO_SIZE)[VIDEO_SIZE - 1]);
}

#[tokio::test]
async fn test_start_at_size_is_unsatisfiable() {
    let clock = Arc::new(FixedClock::at(1000));
    let source = MockVideoSource::new().with_video("demo", make_video_bytes(VIDEO_SIZE));
    let router = test_router(source, clock.clone());

    let request = signed_request(clock, "demo", Some("bytes=3000000-"));
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::RANGE_NOT_SATISFIABLE);
    assert_eq!(
        response.headers().get("content-range").unwrap(),
        "bytes */3000000"
    );
}

// =============================================================================
// Errors
// =============================================================================

#[tokio::test]
async fn test_missing_video_is_not_found() {
    let clock = Arc::new(FixedClock::at(1000));
    let source = MockVideoSource::new();
    let router = test_router(source, clock.clone());

    let request = signed_request(clock, "missing", None);
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"video not found");
}

#[tokio::test]
async fn test_traversal_rejected_before_storage() {
    let clock = Arc::new(FixedClock::at(1000));
    let source = MockVideoSource::new().with_video("demo", make_video_bytes(100));
    let open_counter = source.open_counter();
    let router = test_router(source, clock.clone());

    // A correctly signed capability for a traversal name still must not
    // reach storage
    let request = signed_request(clock, "../../etc/passwd", None);
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(open_counter.load(Ordering::SeqCst), 0);
}
