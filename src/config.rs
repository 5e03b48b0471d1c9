//! Configuration management for the VOD streamer.
//!
//! This module provides a flexible configuration system that supports:
//! - Command-line arguments via clap
//! - Environment variables with `VOD_` prefix
//! - Sensible defaults for all optional settings
//!
//! # Environment Variables
//!
//! All configuration options can be set via environment variables with the `VOD_` prefix:
//!
//! - `VOD_HOST` - Server bind address (default: 0.0.0.0)
//! - `VOD_PORT` - Server port (default: 8000)
//! - `VOD_AUTH_SECRET` - HMAC secret for signed URLs (required when auth is enabled)
//! - `VOD_AUTH_ENABLED` - Enable signed URL verification (default: true)
//! - `VOD_TTL` - Signed URL lifetime in seconds (default: 900)
//! - `VOD_CHUNK_SIZE` - Maximum bytes served per range request (default: 1 MiB)
//! - `VOD_VIDEO_ROOT` - Directory containing the video files (default: ./videos)
//! - `VOD_BASE_URL` - Public base URL embedded in issued links

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::stream::DEFAULT_CHUNK_SIZE;

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 8000;

/// Default signed URL lifetime (15 minutes).
pub const DEFAULT_TTL_SECS: u64 = 900;

/// Default video root directory.
pub const DEFAULT_VIDEO_ROOT: &str = "./videos";

// =============================================================================
// CLI Arguments
// =============================================================================

/// VOD Streamer - a video server with signed URLs and range-based streaming.
///
/// Issues time-limited HMAC-signed URLs for videos and serves them over HTTP
/// in bounded chunks so playback can seek without downloading entire files.
#[derive(Parser, Debug, Clone)]
#[command(name = "vod-streamer")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "VOD_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "VOD_PORT")]
    pub port: u16,

    // =========================================================================
    // Authentication Configuration
    // =========================================================================
    /// Secret key for HMAC-SHA256 signed URL authentication.
    ///
    /// If not provided and auth is enabled, the server will fail to start.
    #[arg(long, env = "VOD_AUTH_SECRET")]
    pub auth_secret: Option<String>,

    /// Enable signed URL verification on the stream endpoint.
    ///
    /// When disabled, all stream requests are allowed without a signature.
    /// WARNING: Only disable authentication in development/testing.
    #[arg(long, default_value_t = true, env = "VOD_AUTH_ENABLED")]
    pub auth_enabled: bool,

    /// Lifetime of issued URLs, in seconds.
    #[arg(long, default_value_t = DEFAULT_TTL_SECS, env = "VOD_TTL")]
    pub ttl: u64,

    // =========================================================================
    // Streaming Configuration
    // =========================================================================
    /// Maximum number of bytes served per range request.
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE, env = "VOD_CHUNK_SIZE")]
    pub chunk_size: u64,

    /// Directory containing the video files.
    #[arg(long, default_value = DEFAULT_VIDEO_ROOT, env = "VOD_VIDEO_ROOT")]
    pub video_root: PathBuf,

    /// Public base URL embedded in issued video links.
    ///
    /// Defaults to `http://{host}:{port}` if not set.
    #[arg(long, env = "VOD_BASE_URL")]
    pub base_url: Option<String>,

    // =========================================================================
    // CORS Configuration
    // =========================================================================
    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "VOD_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        // Check auth secret is provided when auth is enabled
        if self.auth_enabled && self.auth_secret.is_none() {
            return Err(
                "Authentication is enabled but no secret provided. \
                 Set --auth-secret or VOD_AUTH_SECRET, or disable auth with --auth-enabled=false"
                    .to_string(),
            );
        }

        if self.ttl == 0 {
            return Err("ttl must be greater than 0 seconds".to_string());
        }

        // Validate chunk size (bounded window reads must stay reasonable)
        if self.chunk_size < 1024 || self.chunk_size > 64 * 1024 * 1024 {
            return Err("chunk_size must be between 1KB and 64MB".to_string());
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the public base URL used in issued links, without a trailing slash.
    pub fn public_base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("http://{}:{}", self.host, self.port),
        }
    }

    /// Get the signed URL lifetime as a Duration.
    pub fn ttl_duration(&self) -> Duration {
        Duration::from_secs(self.ttl)
    }

    /// Get the auth secret, or an empty string if not set (call validate() first).
    pub fn auth_secret_or_empty(&self) -> &str {
        self.auth_secret.as_deref().unwrap_or("")
    }
}

// =============================================================================
// Tests
// =============================================================================
