//! # BucketKV
//!
//! A persistent key-value store built on extendible hashing:
//! - Growable in-memory directory over fixed-size buckets
//! - One 4096-byte page per bucket, accessed through short-lived mmaps
//! - Fixed 1365-byte records with varint length prefixes
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Store                               │
//! │                 (set / get, split / grow)                    │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │   Hasher    │          │  Directory  │
//!   │  (SHA-256)  │─────────▶│ (in memory) │
//!   └─────────────┘          └──────┬──────┘
//!                                   │ bucket id
//!                                   ▼
//!                           ┌─────────────┐
//!                           │   Bucket    │
//!                           │ (mmap page) │
//!                           └──────┬──────┘
//!                                  │
//!                                  ▼
//!                           ┌─────────────┐
//!                           │    Codec    │
//!                           │  (varint)   │
//!                           └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use bucketkv::Store;
//!
//! let mut store = Store::open_path("./bucketkv.data")?;
//! store.set("roma", "dolznik")?;
//! assert_eq!(store.get("roma")?, "dolznik");
//! # Ok::<(), bucketkv::BucketKvError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod codec;
pub mod hasher;
pub mod storage;
pub mod directory;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{BucketKvError, Result};
pub use config::Config;
pub use store::{Store, StoreStats};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of BucketKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
