//! Filesystem-backed video source.
//!
//! Videos are stored as `<root>/<name>.mp4`. Each request opens its own file
//! handle and reads only the requested window via seek + exact read, so
//! memory use is bounded by the chunk size rather than the file size.

use std::io::SeekFrom;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

use super::{validate_video_name, VideoReader, VideoSource};
use crate::error::StoreError;

/// Video source reading `.mp4` files from a local directory.
#[derive(Debug, Clone)]
pub struct FsVideoSource {
    root: PathBuf,
}

impl FsVideoSource {
    /// Create a source rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory videos are served from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn video_path(&self, video_name: &str) -> PathBuf {
        self.root.join(format!("{}.mp4", video_name))
    }
}

#[async_trait]
impl VideoSource for FsVideoSource {
    type Reader = FsVideoReader;

    async fn open(&self, video_name: &str) -> Result<Self::Reader, StoreError> {
        // Name validation must happen before any path is constructed
        validate_video_name(video_name)?;

        let path = self.video_path(video_name);
        let file = File::open(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StoreError::NotFound(video_name.to_string())
            } else {
                StoreError::Io(e)
            }
        })?;

        let size = file.metadata().await?.len();

        Ok(FsVideoReader { file, size })
    }
}

/// Reader over a single opened video file.
///
/// The file handle is owned by the reader and closed when the request-scoped
/// reader is dropped.
#[derive(Debug)]
pub struct FsVideoReader {
    file: File,
    size: u64,
}

#[async_trait]
impl VideoReader for FsVideoReader {
    async fn read_exact_at(&mut self, offset: u64, len: usize) -> Result<Bytes, StoreError> {
        if offset + len as u64 > self.size {
            return Err(StoreError::RangeOutOfBounds {
                offset,
                requested: len as u64,
                size: self.size,
            });
        }

        if len == 0 {
            return Ok(Bytes::new());
        }

        self.file.seek(SeekFrom::Start(offset)).await?;

        let mut buf = vec![0u8; len];
        self.file.read_exact(&mut buf).await?;

        Ok(Bytes::from(buf))
    }

    fn size(&self) -> u64 {
        self.size
    }
}
