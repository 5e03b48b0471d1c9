//! HTTP request handlers for the VOD streamer API.
//!
//! # Endpoints
//!
//! - `GET /videos?video_name={name}` - Issue a signed streaming URL
//! - `GET /videos/video?signature=..&expires_at=..&video_name=..` - Stream a chunk
//! - `GET /health` - Health check endpoint

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::error::{StoreError, StreamError};
use crate::store::VideoSource;
use crate::stream::StreamService;

use super::auth::UrlSigner;

// =============================================================================
// Application State
// =============================================================================

/// Shared application state passed to all handlers via Axum's State extractor.
pub struct AppState<S: VideoSource> {
    /// The range delivery engine
    pub stream_service: Arc<StreamService<S>>,

    /// Signed URL issuer
    pub signer: UrlSigner,

    /// Public base URL embedded in issued links
    pub base_url: String,
}

impl<S: VideoSource> AppState<S> {
    /// Create a new application state.
    pub fn new(stream_service: StreamService<S>, signer: UrlSigner, base_url: String) -> Self {
        Self {
            stream_service: Arc::new(stream_service),
            signer,
            base_url,
        }
    }
}

impl<S: VideoSource> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            stream_service: Arc::clone(&self.stream_service),
            signer: self.signer.clone(),
            base_url: self.base_url.clone(),
        }
    }
}

// =============================================================================
// Request Parameters
// =============================================================================

/// Query parameters for the issue endpoint.
#[derive(Debug, Deserialize)]
pub struct IssueQueryParams {
    /// Name of the video to issue a link for (opaque, never rejected here)
    #[serde(default)]
    pub video_name: String,
}

/// Query parameters for the stream endpoint.
#[derive(Debug, Deserialize)]
pub struct StreamQueryParams {
    /// Name of the video to stream
    #[serde(default)]
    pub video_name: String,

    /// Signature (verified by the auth middleware)
    #[serde(default)]
    pub signature: Option<String>,

    /// Expiry timestamp (verified by the auth middleware)
    #[serde(default)]
    pub expires_at: Option<String>,
}

// =============================================================================
// Response Types
// =============================================================================

/// Response from the issue endpoint.
#[derive(Debug, Serialize)]
pub struct VideoInfo {
    /// Complete signed URL for streaming the video
    pub video_url: String,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Convert StreamError to an HTTP response.
///
/// Storage failures are reported to the client as plain not-found so the
/// response leaks nothing about the backing store, while full detail goes to
/// the operator logs:
/// - 404 for missing videos, unsafe names, and I/O failures
/// - 416 with `Content-Range: bytes */{size}` for unsatisfiable start offsets
impl IntoResponse for StreamError {
    fn into_response(self) -> Response {
        match &self {
            StreamError::Store(StoreError::NotFound(name)) => {
                debug!(video_name = %name, status = 404, "video not found");
                (StatusCode::NOT_FOUND, "video not found").into_response()
            }

            // Traversal attempts look suspicious; log loudly, answer blandly
            StreamError::Store(StoreError::UnsafeName(name)) => {
                warn!(video_name = %name, status = 404, "rejected unsafe video name");
                (StatusCode::NOT_FOUND, "video not found").into_response()
            }

            StreamError::Store(err) => {
                error!(status = 404, "storage error while serving video: {}", err);
                (StatusCode::NOT_FOUND, "video not found").into_response()
            }

            StreamError::InvalidRange { start, size } => {
                debug!(start = start, size = size, status = 416, "invalid range");
                (
                    StatusCode::RANGE_NOT_SATISFIABLE,
                    [(header::CONTENT_RANGE, format!("bytes */{}", size))],
                    format!("range start {} is beyond end of content", start),
                )
                    .into_response()
            }
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Issue a signed streaming URL.
///
/// # Endpoint
///
/// `GET /videos?video_name={name}`
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// { "video_url": "http://host/videos/video?signature=..&expires_at=..&video_name=.." }
/// ```
///
/// Never rejects the video name: issuance is unconditional, and unsafe or
/// missing names fail at stream time instead. `500 Internal Server Error`
/// with a plaintext body only if response serialization fails.
pub async fn issue_handler<S: VideoSource>(
    State(state): State<AppState<S>>,
    Query(query): Query<IssueQueryParams>,
) -> Response {
    let issued = state.signer.issue(&state.base_url, &query.video_name);

    debug!(
        video_name = %query.video_name,
        expires_at = issued.expires_at,
        "issued signed video URL"
    );

    let info = VideoInfo {
        video_url: issued.url,
    };

    match serde_json::to_string(&info) {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        Err(e) => {
            error!("failed to serialize issue response: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// Stream one chunk of a video.
///
/// # Endpoint
///
/// `GET /videos/video?signature=..&expires_at=..&video_name=..`
///
/// The auth middleware has already verified the capability by the time this
/// handler runs; the video name passes through unchanged.
///
/// # Headers
///
/// Reads the `Range` request header (e.g. `bytes=1048576-`); absent or
/// digit-free values stream from the start.
///
/// # Response
///
/// - `206 Partial Content` with `Content-Range`, `Content-Length`,
///   `Accept-Ranges: bytes`, and `Content-Type: video/mp4`; the body is the
///   inclusive window `[start, end]`
/// - `404 Not Found`: missing video, unsafe name, or storage failure
/// - `416 Range Not Satisfiable`: start offset at or beyond end of content
pub async fn stream_handler<S: VideoSource>(
    State(state): State<AppState<S>>,
    Query(query): Query<StreamQueryParams>,
    headers: HeaderMap,
) -> Result<Response, StreamError> {
    let range_header = headers
        .get(header::RANGE)
        .and_then(|value| value.to_str().ok());

    let chunk = state
        .stream_service
        .serve(&query.video_name, range_header)
        .await?;

    let response = Response::builder()
        .status(StatusCode::PARTIAL_CONTENT)
        .header(header::CONTENT_TYPE, "video/mp4")
        .header(header::CONTENT_LENGTH, chunk.content_length())
        .header(header::CONTENT_RANGE, chunk.content_range())
        .header(header::ACCEPT_RANGES, "bytes")
        .body(Body::from(chunk.data))
        .expect("valid response");

    Ok(response)
}

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0"
/// }
/// ```
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
