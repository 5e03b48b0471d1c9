//! HTTP server layer for the VOD streamer.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                          HTTP Layer                              │
//! │   GET /videos?video_name=..      GET /videos/video?signature=..  │
//! │                                                                  │
//! │  ┌─────────────┐  ┌──────────────┐  ┌──────────────────────────┐ │
//! │  │  handlers   │  │     auth     │  │          routes          │ │
//! │  │ (requests)  │  │ (signed URL) │  │     (router config)      │ │
//! │  └─────────────┘  └──────────────┘  └──────────────────────────┘ │
//! └──────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod handlers;
pub mod routes;

pub use auth::{auth_middleware, AuthError, AuthQueryParams, IssuedUrl, UrlSigner};
pub use handlers::{
    health_handler, issue_handler, stream_handler, AppState, HealthResponse, IssueQueryParams,
    StreamQueryParams, VideoInfo,
};
pub use routes::{create_router, RouterConfig};
