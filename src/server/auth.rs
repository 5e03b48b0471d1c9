//! Signed URL authentication for the VOD streamer.
//!
//! This module provides HMAC-SHA256 based URL signing for time-limited video
//! access.
//!
//! # URL Signing Scheme
//!
//! A capability is the pair of an expiry timestamp and a video name, bound to
//! a process-wide secret:
//!
//! ```text
//! signature = HMAC-SHA256(secret_key, "{expires_at}{video_name}")
//! ```
//!
//! where `expires_at` is the decimal Unix timestamp. The issued URL carries
//! `signature`, `expires_at`, and `video_name` as query parameters:
//!
//! ```text
//! /videos/video?signature=abc123...&expires_at=1735689600&video_name=demo
//! ```
//!
//! Nothing is persisted; validity is recomputed on every request from the
//! request parameters, the secret, and the injected clock.
//!
//! # Security Properties
//!
//! - **Tamper-evident**: changing the name or expiry invalidates the signature
//! - **Time-limited**: links expire after a configurable TTL
//! - **Constant-time comparison**: verification uses constant-time comparison
//!   to prevent timing attacks
//! - **Expiry does not leak**: an expired link and a forged link produce the
//!   same not-found outcome, so a client cannot tell that a link once existed
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use vod_streamer::server::auth::UrlSigner;
//!
//! let signer = UrlSigner::new("my-secret-key", Duration::from_secs(900));
//!
//! let issued = signer.issue("http://localhost:8000", "demo");
//! assert!(signer
//!     .verify("demo", Some(&issued.expires_at.to_string()), Some(&issued.signature))
//!     .is_ok());
//! ```

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Query, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::{debug, warn};
use url::form_urlencoded;

use crate::clock::{Clock, SystemClock};

// =============================================================================
// Types
// =============================================================================

/// HMAC-SHA256 type alias
type HmacSha256 = Hmac<Sha256>;

/// Authentication error types.
#[derive(Debug, Clone)]
pub enum AuthError {
    /// Signature or expiry is missing from the request
    MissingField,

    /// Expiry timestamp is not a valid integer
    MalformedExpiry,

    /// Signature does not match the expected value
    SignatureMismatch,

    /// Link has expired
    Expired {
        /// When the link expired
        expired_at: u64,
        /// Current time
        current_time: u64,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingField => {
                write!(f, "signature and expires_at cannot be empty")
            }
            AuthError::MalformedExpiry => write!(f, "invalid expires date"),
            AuthError::SignatureMismatch => write!(f, "invalid signature"),
            AuthError::Expired {
                expired_at,
                current_time,
            } => write!(
                f,
                "link expired at {} (current time: {})",
                expired_at, current_time
            ),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        // Expired and forged links are deliberately indistinguishable to the
        // client: both answer 404 with the same body, so a probe cannot learn
        // that a link once existed. Detail stays in the server logs.
        let (status, body) = match &self {
            AuthError::MissingField | AuthError::MalformedExpiry => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            AuthError::SignatureMismatch | AuthError::Expired { .. } => {
                (StatusCode::NOT_FOUND, "video not found".to_string())
            }
        };

        // A bad signature could indicate an attack, so log at warn level.
        // Expired links are common and expected, log at debug.
        match &self {
            AuthError::SignatureMismatch => {
                warn!(status = status.as_u16(), "Authentication failed: {}", self);
            }
            _ => {
                debug!(status = status.as_u16(), "Authentication failed: {}", self);
            }
        }

        (status, body).into_response()
    }
}

/// A signed URL produced by the issuer.
#[derive(Debug, Clone)]
pub struct IssuedUrl {
    /// Complete URL with signature, expiry, and video name as query parameters
    pub url: String,

    /// Unix timestamp at which the URL stops working
    pub expires_at: u64,

    /// Hex-encoded HMAC-SHA256 signature
    pub signature: String,
}

// =============================================================================
// URL Signer
// =============================================================================

/// Issues and verifies signed video URLs using HMAC-SHA256.
///
/// Holds the secret key, the TTL policy, and the time source. Both operations
/// are pure functions of the request data plus those three; no issued URL is
/// ever stored.
#[derive(Clone)]
pub struct UrlSigner {
    /// Secret key for HMAC computation
    secret_key: Vec<u8>,

    /// Lifetime applied to newly issued URLs
    ttl: Duration,

    /// Time source, injectable for deterministic tests
    clock: Arc<dyn Clock>,
}

impl UrlSigner {
    /// Create a signer using the system clock.
    ///
    /// `secret_key` should be at least 32 bytes for security.
    pub fn new(secret_key: impl AsRef<[u8]>, ttl: Duration) -> Self {
        Self::with_clock(secret_key, ttl, Arc::new(SystemClock))
    }

    /// Create a signer with an explicit time source.
    pub fn with_clock(secret_key: impl AsRef<[u8]>, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            secret_key: secret_key.as_ref().to_vec(),
            ttl,
            clock,
        }
    }

    /// Issue a signed URL for the named video.
    ///
    /// Never rejects input: the name is treated as opaque here, and unsafe
    /// names are the delivery engine's concern at request time.
    pub fn issue(&self, base_url: &str, video_name: &str) -> IssuedUrl {
        let expires_at = self.clock.now_unix() + self.ttl.as_secs();
        let signature = self.compute_signature(expires_at, video_name);

        let query: String = form_urlencoded::Serializer::new(String::new())
            .append_pair("signature", &signature)
            .append_pair("expires_at", &expires_at.to_string())
            .append_pair("video_name", video_name)
            .finish();

        let url = format!("{}/videos/video?{}", base_url.trim_end_matches('/'), query);

        IssuedUrl {
            url,
            expires_at,
            signature,
        }
    }

    /// Sign a video name with a specific expiry timestamp.
    ///
    /// Useful for generating signatures for a known point in time.
    pub fn sign_with_expiry(&self, video_name: &str, expires_at: u64) -> String {
        self.compute_signature(expires_at, video_name)
    }

    /// Verify a signature and expiry for a video name.
    ///
    /// Stateless: recomputes the expected signature from the request data and
    /// compares in constant time, then checks expiry against the clock. The
    /// expiry check runs after the signature check, so a valid-but-expired
    /// link still reports [`AuthError::Expired`].
    pub fn verify(
        &self,
        video_name: &str,
        expires_at: Option<&str>,
        signature: Option<&str>,
    ) -> Result<(), AuthError> {
        let (expires_at, signature) = match (expires_at, signature) {
            (Some(e), Some(s)) if !e.is_empty() && !s.is_empty() => (e, s),
            _ => return Err(AuthError::MissingField),
        };

        let expires_at: u64 = expires_at.parse().map_err(|_| AuthError::MalformedExpiry)?;

        // Non-hex input can never match, and reporting it separately would
        // distinguish malformed from forged signatures
        let provided_sig = hex::decode(signature).map_err(|_| AuthError::SignatureMismatch)?;

        let expected_hex = self.compute_signature(expires_at, video_name);
        let expected_sig = hex::decode(&expected_hex).map_err(|_| AuthError::SignatureMismatch)?;

        // Constant-time comparison
        if !bool::from(provided_sig.ct_eq(&expected_sig)) {
            return Err(AuthError::SignatureMismatch);
        }

        let current_time = self.clock.now_unix();
        if current_time > expires_at {
            return Err(AuthError::Expired {
                expired_at: expires_at,
                current_time,
            });
        }

        Ok(())
    }

    /// Compute the HMAC-SHA256 signature over the decimal expiry and the name.
    fn compute_signature(&self, expires_at: u64, video_name: &str) -> String {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret_key).expect("HMAC can take key of any size");
        mac.update(expires_at.to_string().as_bytes());
        mac.update(video_name.as_bytes());
        let result = mac.finalize();

        hex::encode(result.into_bytes())
    }
}

// =============================================================================
// Axum Middleware
// =============================================================================

/// Query parameters consumed by the verification gate.
#[derive(Debug, Deserialize)]
pub struct AuthQueryParams {
    /// Hex-encoded HMAC-SHA256 signature
    pub signature: Option<String>,

    /// Expiry timestamp (Unix epoch seconds, decimal string)
    pub expires_at: Option<String>,

    /// Video name the signature was computed over
    pub video_name: Option<String>,
}

/// Axum middleware that gates the stream endpoint behind signature
/// verification.
///
/// Extracts `signature`, `expires_at`, and `video_name` from the query,
/// verifies the capability, and passes the request through unchanged on
/// success. All rejections are terminal for the request.
pub async fn auth_middleware(
    State(signer): State<UrlSigner>,
    Query(params): Query<AuthQueryParams>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    // A missing name verifies against the empty string, same as issuance
    let video_name = params.video_name.as_deref().unwrap_or("");

    signer.verify(
        video_name,
        params.expires_at.as_deref(),
        params.signature.as_deref(),
    )?;

    Ok(next.run(request).await)
}

// =============================================================================
// Tests
// =============================================================================
