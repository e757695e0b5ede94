//! Error types for BucketKV
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using BucketKvError
pub type Result<T> = std::result::Result<T, BucketKvError>;

/// Unified error type for BucketKV operations
#[derive(Debug, Error)]
pub enum BucketKvError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Page-level failure (open, map, write, flush) on a specific bucket
    #[error("Bucket {bucket} {op} failed: {source}")]
    BucketIo {
        bucket: u64,
        op: &'static str,
        #[source]
        source: std::io::Error,
    },

    // -------------------------------------------------------------------------
    // Storage Errors
    // -------------------------------------------------------------------------
    /// Bucket has no free slot. Consumed by the store's insert loop.
    #[error("Bucket is full")]
    BucketFull,

    #[error("Key not found")]
    KeyNotFound,

    /// Directory references a bucket the store does not know about
    #[error("Directory error: {0}")]
    Directory(String),

    #[error("Directory exhausted: global depth {0} cannot grow further")]
    DirectoryExhausted(u8),

    // -------------------------------------------------------------------------
    // Codec Errors
    // -------------------------------------------------------------------------
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("{field} too large: {len} bytes (max {max})")]
    RecordTooLarge {
        field: &'static str,
        len: usize,
        max: usize,
    },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl BucketKvError {
    /// Wrap an I/O error with the bucket and operation it came from
    pub(crate) fn bucket_io(bucket: u64, op: &'static str, source: std::io::Error) -> Self {
        Self::BucketIo { bucket, op, source }
    }
}
