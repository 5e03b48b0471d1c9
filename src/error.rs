use thiserror::Error;

/// Errors from the video storage layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No video with the requested name exists
    #[error("video not found: {0}")]
    NotFound(String),

    /// Video name contains path separators or traversal sequences
    #[error("unsafe video name: {0:?}")]
    UnsafeName(String),

    /// Requested range exceeds the video bounds
    #[error("range out of bounds: requested {requested} bytes at offset {offset}, size is {size}")]
    RangeOutOfBounds {
        offset: u64,
        requested: u64,
        size: u64,
    },

    /// Underlying filesystem error
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the range delivery engine.
#[derive(Debug, Error)]
pub enum StreamError {
    /// Error locating or reading the backing content
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Requested start offset is at or beyond the end of the video
    #[error("invalid range: start {start} is beyond end of content (size {size})")]
    InvalidRange { start: u64, size: u64 },
}
