//! Storage Module
//!
//! Page-backed buckets in a single append-only file.
//!
//! ## Responsibilities
//! - Allocate zero-filled pages at the end of the file
//! - Map exactly one page per bucket operation, then flush and unmap
//! - Store up to three fixed-size records per bucket
//!
//! ## File Format
//! ```text
//! ┌────────────────────────────────────────┐
//! │ Page 0 (4096)        bucket id 0       │
//! ├────────────────────────────────────────┤
//! │ Page 1 (4096)        bucket id 1       │
//! ├────────────────────────────────────────┤
//! │ ... pages appended in offset order     │
//! └────────────────────────────────────────┘
//!
//! Page layout:
//! ┌─────────┬──────────────┬──────────────┬──────────────┐
//! │Count (1)│ Slot 0 (1365)│ Slot 1 (1365)│ Slot 2 (1365)│
//! └─────────┴──────────────┴──────────────┴──────────────┘
//! ```

mod bucket;
mod page;

pub use bucket::{Bucket, BucketId};

use crate::codec::RECORD_SIZE;

/// Size of one page; every bucket occupies exactly one
pub const PAGE_SIZE: u64 = 4096;

/// Records per bucket
pub const BUCKET_CAPACITY: usize = 3;

/// Offset of slot 0 within a page (after the count byte)
pub(crate) const SLOTS_OFFSET: usize = 1;

const _: () = assert!(SLOTS_OFFSET + BUCKET_CAPACITY * RECORD_SIZE == PAGE_SIZE as usize);
