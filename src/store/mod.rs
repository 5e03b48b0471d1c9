//! Video storage layer.
//!
//! A [`VideoSource`] resolves an opaque video name to a [`VideoReader`] that
//! exposes bounded range reads, so the delivery engine never loads a whole
//! file into memory. The filesystem implementation lives in [`fs`]; tests use
//! an in-memory mock.
//!
//! Video names are untrusted client input. [`validate_video_name`] rejects
//! anything that could escape the video root before any path is built.

pub mod fs;

pub use fs::{FsVideoReader, FsVideoSource};

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::StoreError;

/// Trait for reading byte ranges from an opened video.
///
/// Readers are scoped to a single request; dropping the reader releases the
/// underlying handle on every exit path, including client disconnect.
#[async_trait]
pub trait VideoReader: Send {
    /// Read exactly `len` bytes starting at `offset`.
    ///
    /// Returns an error if the range is out of bounds or if the read fails.
    async fn read_exact_at(&mut self, offset: u64, len: usize) -> Result<Bytes, StoreError>;

    /// Total size of the video in bytes.
    fn size(&self) -> u64;
}

/// Trait for resolving video names to readable content.
#[async_trait]
pub trait VideoSource: Send + Sync {
    /// The reader type produced by this source.
    type Reader: VideoReader;

    /// Open the named video for reading.
    ///
    /// Implementations must call [`validate_video_name`] before touching
    /// storage.
    async fn open(&self, video_name: &str) -> Result<Self::Reader, StoreError>;
}

/// Reject video names that could address files outside the video root.
///
/// Names are opaque identifiers, not paths: separators, traversal sequences,
/// NUL bytes, and empty names are all refused.
pub fn validate_video_name(name: &str) -> Result<(), StoreError> {
    let unsafe_name = name.is_empty()
        || name.contains('/')
        || name.contains('\\')
        || name.contains("..")
        || name.contains('\0')
        || name.starts_with('.');

    if unsafe_name {
        return Err(StoreError::UnsafeName(name.to_string()));
    }

    Ok(())
}
