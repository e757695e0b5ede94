//! Directory
//!
//! In-memory routing table of the extendible hash.
//!
//! ## Layout
//! ```text
//!   global depth = 2
//!
//!   index  local  bucket
//!   ┌────┬───────┬──────┐
//!   │ 00 │   1   │  0   │──┐
//!   │ 01 │   2   │  1   │  │  entries 00 and 10 share bucket 0
//!   │ 10 │   1   │  0   │──┘
//!   │ 11 │   2   │  2   │
//!   └────┴───────┴──────┘
//! ```
//!
//! The table always holds `2^global_depth` entries and every local depth is
//! at most the global depth. Nothing here is persisted.

use crate::error::{BucketKvError, Result};
use crate::hasher::{depth_mask, directory_index, MAX_GLOBAL_DEPTH};
use crate::storage::BucketId;

/// Depth the directory starts with
pub const INITIAL_DEPTH: u8 = 1;

/// One slot of the directory table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Position of this entry in the table
    pub index: u8,
    /// Hash bits distinguishing the records of the referenced bucket
    pub local_depth: u8,
    /// Referenced bucket; may be shared with other entries
    pub bucket: BucketId,
}

/// The directory table and its global depth
#[derive(Debug, Clone)]
pub struct Directory {
    global_depth: u8,
    entries: Vec<DirectoryEntry>,
}

impl Directory {
    /// Two entries at depth 1, each owning its own bucket
    pub fn new(first: BucketId, second: BucketId) -> Self {
        Self {
            global_depth: INITIAL_DEPTH,
            entries: vec![
                DirectoryEntry {
                    index: 0,
                    local_depth: INITIAL_DEPTH,
                    bucket: first,
                },
                DirectoryEntry {
                    index: 1,
                    local_depth: INITIAL_DEPTH,
                    bucket: second,
                },
            ],
        }
    }

    /// Entry that `key` routes to at the current global depth
    pub fn resolve(&self, key: &str) -> DirectoryEntry {
        let index = directory_index(key, self.global_depth);
        self.entries[index as usize]
    }

    pub fn entry(&self, index: usize) -> Option<&DirectoryEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    pub fn global_depth(&self) -> u8 {
        self.global_depth
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Double the table
    ///
    /// Entry `i` of the new table copies entry `i & old_mask` of the old one.
    /// Fails once the depth would pass `max_depth` (never more than 8).
    pub fn grow(&mut self, max_depth: u8) -> Result<()> {
        let limit = max_depth.min(MAX_GLOBAL_DEPTH);
        if self.global_depth >= limit {
            return Err(BucketKvError::DirectoryExhausted(self.global_depth));
        }

        let new_depth = self.global_depth + 1;
        let old_mask = depth_mask(self.global_depth);
        let size = 1usize << new_depth;

        let entries = (0..size)
            .map(|i| {
                let index = i as u8;
                let source = self.entries[(index & old_mask) as usize];
                DirectoryEntry {
                    index,
                    local_depth: source.local_depth,
                    bucket: source.bucket,
                }
            })
            .collect();

        self.entries = entries;
        self.global_depth = new_depth;
        Ok(())
    }

    /// Re-point entries after `old` was split into `old` and `new`
    ///
    /// Every entry referencing `old` gains one bit of local depth. The first
    /// such entry fixes the bit pattern that stays on `old`; entries whose
    /// index differs from it under the new mask move to `new`.
    ///
    /// Returns the new local depth, or `None` if no entry referenced `old`.
    pub fn split(&mut self, old: BucketId, new: BucketId) -> Option<u8> {
        let mut pattern: Option<(u8, u8)> = None;

        for entry in self.entries.iter_mut().filter(|e| e.bucket == old) {
            entry.local_depth += 1;
            let mask = depth_mask(entry.local_depth);

            match pattern {
                None => pattern = Some((entry.index & mask, entry.local_depth)),
                Some((reference, _)) => {
                    if entry.index & mask != reference {
                        entry.bucket = new;
                    }
                }
            }
        }

        pattern.map(|(_, depth)| depth)
    }

    /// Number of entries referencing `bucket`
    pub fn references(&self, bucket: BucketId) -> usize {
        self.entries.iter().filter(|e| e.bucket == bucket).count()
    }
}
