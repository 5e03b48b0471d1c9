//! # VOD Streamer
//!
//! A video-on-demand server that issues time-limited HMAC-signed URLs and
//! serves videos over HTTP with byte-range support for seeking playback.
//!
//! ## Features
//!
//! - **Signed URLs**: Stateless HMAC-SHA256 capabilities binding an expiry to
//!   a video name; nothing is persisted and validity is recomputed per request
//! - **Range-based streaming**: Serves bounded 1 MiB windows via seek + partial
//!   read, so memory use is independent of file size
//! - **Injectable clock**: Issuer and verifier take their time source as a
//!   capability, making expiry behavior deterministic under test
//! - **Path safety**: Video names are opaque identifiers; traversal sequences
//!   are rejected before any filesystem access
//!
//! ## Architecture
//!
//! - [`store`] - Storage layer with the filesystem video source
//! - [`stream`] - Range delivery engine (window math, `Range` parsing)
//! - [`server`] - Axum-based HTTP server, signed URL auth, and routes
//! - [`clock`] - Time source abstraction
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use vod_streamer::{create_router, FsVideoSource, RouterConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let source = FsVideoSource::new("./videos");
//!     let config = RouterConfig::new("my-secret-key")
//!         .with_base_url("http://localhost:8000");
//!
//!     let router = create_router(source, config);
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await.unwrap();
//!     axum::serve(listener, router).await.unwrap();
//! }
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod server;
pub mod store;
pub mod stream;

// Re-export commonly used types
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use error::{StoreError, StreamError};
pub use server::{
    auth_middleware, create_router, health_handler, issue_handler, stream_handler, AppState,
    AuthError, AuthQueryParams, HealthResponse, IssueQueryParams, IssuedUrl, RouterConfig,
    StreamQueryParams, UrlSigner, VideoInfo,
};
pub use store::{validate_video_name, FsVideoReader, FsVideoSource, VideoReader, VideoSource};
pub use stream::{parse_range_start, StreamService, VideoChunk, DEFAULT_CHUNK_SIZE};
