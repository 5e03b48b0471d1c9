//! Router configuration for the VOD streamer.
//!
//! This module defines the HTTP routes and applies middleware for signed URL
//! verification and CORS.
//!
//! # Route Structure
//!
//! ```text
//! /health        - Health check (public)
//! /videos        - Issue a signed URL (public)
//! /videos/video  - Stream a video chunk (protected by signature verification)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use vod_streamer::server::routes::{create_router, RouterConfig};
//! use vod_streamer::store::FsVideoSource;
//!
//! let source = FsVideoSource::new("./videos");
//! let config = RouterConfig::new("my-secret-key");
//! let router = create_router(source, config);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, routing::get, Router};
use http::header::{AUTHORIZATION, CONTENT_TYPE, RANGE};
use http::Method;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::auth::UrlSigner;
use super::handlers::{health_handler, issue_handler, stream_handler, AppState};
use crate::clock::{Clock, SystemClock};
use crate::config::DEFAULT_TTL_SECS;
use crate::store::VideoSource;
use crate::stream::{StreamService, DEFAULT_CHUNK_SIZE};

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Clone)]
pub struct RouterConfig {
    /// Secret key for signed URL verification
    pub auth_secret: String,

    /// Whether signature verification is enabled on the stream endpoint
    pub auth_enabled: bool,

    /// Lifetime of issued URLs
    pub ttl: Duration,

    /// Maximum bytes served per range request
    pub chunk_size: u64,

    /// Public base URL embedded in issued links
    pub base_url: String,

    /// Allowed CORS origins (None = allow any origin)
    pub cors_origins: Option<Vec<String>>,

    /// Whether to enable request tracing
    pub enable_tracing: bool,

    /// Time source for issuing and verifying URLs
    pub clock: Arc<dyn Clock>,
}

impl RouterConfig {
    /// Create a new router configuration with the given auth secret.
    ///
    /// By default:
    /// - Signature verification is enabled
    /// - URLs live for 15 minutes
    /// - Chunks are 1 MiB
    /// - CORS allows any origin
    /// - Tracing is enabled
    /// - The system clock is used
    pub fn new(auth_secret: impl Into<String>) -> Self {
        Self {
            auth_secret: auth_secret.into(),
            auth_enabled: true,
            ttl: Duration::from_secs(DEFAULT_TTL_SECS),
            chunk_size: DEFAULT_CHUNK_SIZE,
            base_url: "http://localhost:8000".to_string(),
            cors_origins: None, // Allow any origin by default
            enable_tracing: true,
            clock: Arc::new(SystemClock),
        }
    }

    /// Create a configuration with signature verification disabled.
    ///
    /// **Warning**: This should only be used for development/testing.
    pub fn without_auth() -> Self {
        let mut config = Self::new(String::new());
        config.auth_enabled = false;
        config
    }

    /// Set the lifetime of issued URLs.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the maximum bytes served per range request.
    pub fn with_chunk_size(mut self, chunk_size: u64) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Set the public base URL embedded in issued links.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set specific allowed CORS origins.
    ///
    /// Pass None (or don't call this method) to allow any origin.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Enable or disable signature verification.
    pub fn with_auth_enabled(mut self, enabled: bool) -> Self {
        self.auth_enabled = enabled;
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }

    /// Inject a time source (used by tests to pin the clock).
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router.
///
/// Builds the complete Axum router with:
/// - Public routes (health check, URL issuance)
/// - The protected stream route (signature verification middleware)
/// - CORS configuration
/// - Request tracing (optional)
pub fn create_router<S>(source: S, config: RouterConfig) -> Router
where
    S: VideoSource + 'static,
{
    let signer = UrlSigner::with_clock(&config.auth_secret, config.ttl, config.clock.clone());
    let stream_service = StreamService::with_chunk_size(source, config.chunk_size);
    let app_state = AppState::new(stream_service, signer.clone(), config.base_url.clone());

    let cors = build_cors_layer(&config);

    let router = if config.auth_enabled {
        build_protected_router(app_state, signer, cors)
    } else {
        build_public_router(app_state, cors)
    };

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Build a router with signature verification on the stream route.
fn build_protected_router<S>(app_state: AppState<S>, signer: UrlSigner, cors: CorsLayer) -> Router
where
    S: VideoSource + 'static,
{
    // Only the stream route sits behind the verification gate; issuance is
    // how clients obtain capabilities in the first place
    let stream_route = Router::new()
        .route("/videos/video", get(stream_handler::<S>))
        .with_state(app_state.clone())
        .layer(middleware::from_fn_with_state(
            signer,
            super::auth::auth_middleware,
        ));

    let public_routes = Router::new()
        .route("/videos", get(issue_handler::<S>))
        .route("/health", get(health_handler))
        .with_state(app_state);

    Router::new()
        .merge(stream_route)
        .merge(public_routes)
        .layer(cors)
}

/// Build a router without signature verification (for development/testing).
fn build_public_router<S>(app_state: AppState<S>, cors: CorsLayer) -> Router
where
    S: VideoSource + 'static,
{
    Router::new()
        .route("/health", get(health_handler))
        .route("/videos", get(issue_handler::<S>))
        .route("/videos/video", get(stream_handler::<S>))
        .with_state(app_state)
        .layer(cors)
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, RANGE])
        .max_age(Duration::from_secs(86400)); // 24 hours

    match &config.cors_origins {
        None => cors.allow_origin(Any),
        Some(origins) if origins.is_empty() => {
            // No origins allowed - this effectively disables CORS
            cors
        }
        Some(origins) => {
            let parsed_origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            cors.allow_origin(parsed_origins)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
