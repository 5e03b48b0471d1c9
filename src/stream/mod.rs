//! Range delivery engine.
//!
//! Given a video name and an optional HTTP `Range` header, the
//! [`StreamService`] resolves the backing content, computes the serviceable
//! byte window, and reads exactly that window from storage.
//!
//! # Window semantics
//!
//! `start` is taken from the first maximal run of decimal digits anywhere in
//! the `Range` header value (`bytes=1048576-` yields `1048576`); a missing
//! header or one with no digits means `start = 0`, so progressive download
//! from the beginning always works. The window end is inclusive:
//!
//! ```text
//! end = min(start + chunk_size - 1, size - 1)
//! ```
//!
//! The returned body is the inclusive slice `[start, end]`, so its length
//! always equals the advertised `Content-Length` and matches the
//! `Content-Range: bytes {start}-{end}/{size}` header exactly.
//!
//! Multi-range syntax is not supported; only the first numeric run is honored.

use bytes::Bytes;
use tracing::debug;

use crate::error::StreamError;
use crate::store::{validate_video_name, VideoReader, VideoSource};

/// Default maximum bytes served per request (1 MiB).
pub const DEFAULT_CHUNK_SIZE: u64 = 1024 * 1024;

// =============================================================================
// Video Chunk
// =============================================================================

/// One serviceable window of a video, with the framing needed for a 206 response.
#[derive(Debug, Clone)]
pub struct VideoChunk {
    /// First byte offset of the window (inclusive)
    pub start: u64,

    /// Last byte offset of the window (inclusive)
    pub end: u64,

    /// Total size of the backing video in bytes
    pub total_size: u64,

    /// The window bytes, exactly `end - start + 1` long
    pub data: Bytes,
}

impl VideoChunk {
    /// Number of bytes in this chunk.
    pub fn content_length(&self) -> u64 {
        self.end - self.start + 1
    }

    /// Value for the `Content-Range` response header.
    pub fn content_range(&self) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, self.total_size)
    }
}

// =============================================================================
// Range Header Parsing
// =============================================================================

/// Extract the start offset from an HTTP `Range` header value.
///
/// Takes the first maximal run of decimal digits found anywhere in the value.
/// Returns 0 when the header is absent or contains no digits. A run too large
/// for `u64` saturates to `u64::MAX`, which the window check then rejects.
pub fn parse_range_start(range_header: Option<&str>) -> u64 {
    let Some(value) = range_header else {
        return 0;
    };

    let digits: String = value
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();

    if digits.is_empty() {
        return 0;
    }

    digits.parse().unwrap_or(u64::MAX)
}

// =============================================================================
// Stream Service
// =============================================================================

/// The range delivery engine.
///
/// Stateless apart from the source and the fixed chunk size; every request is
/// resolved independently.
pub struct StreamService<S: VideoSource> {
    source: S,
    chunk_size: u64,
}

impl<S: VideoSource> StreamService<S> {
    /// Create a service with the default 1 MiB chunk size.
    pub fn new(source: S) -> Self {
        Self::with_chunk_size(source, DEFAULT_CHUNK_SIZE)
    }

    /// Create a service with a custom chunk size.
    pub fn with_chunk_size(source: S, chunk_size: u64) -> Self {
        Self { source, chunk_size }
    }

    /// The underlying video source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Serve one window of the named video.
    ///
    /// Resolves the video, derives the window from the `Range` header, and
    /// reads only `[start, end]` from storage. Fails with
    /// [`StreamError::InvalidRange`] when `start` is at or beyond the end of
    /// the content.
    pub async fn serve(
        &self,
        video_name: &str,
        range_header: Option<&str>,
    ) -> Result<VideoChunk, StreamError> {
        // Reject unsafe names before any storage access
        validate_video_name(video_name)?;

        let mut reader = self.source.open(video_name).await?;
        let size = reader.size();

        let start = parse_range_start(range_header);
        if start >= size {
            return Err(StreamError::InvalidRange { start, size });
        }

        let end = (start + self.chunk_size - 1).min(size - 1);
        let len = (end - start + 1) as usize;

        debug!(
            video_name = video_name,
            start = start,
            end = end,
            size = size,
            "serving video chunk"
        );

        let data = reader.read_exact_at(start, len).await?;

        Ok(VideoChunk {
            start,
            end,
            total_size: size,
            data,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
