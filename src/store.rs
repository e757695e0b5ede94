//! Store Module
//!
//! The extendible hash store: routes keys through the directory to buckets
//! and restructures on overflow.
//!
//! ## Responsibilities
//! - Create the backing file with the two initial buckets
//! - Route `set`/`get` through the directory
//! - Split a full bucket, or double the directory when it cannot be split
//!
//! ## Preconditions
//! One caller at a time. Mutation takes `&mut self`, but nothing guards the
//! backing file against a second process. The directory is held only in
//! memory: reopening a path starts an empty store.

use std::collections::VecDeque;
use std::fs::{self, OpenOptions};
use std::path::Path;

use tracing::{debug, info};

use crate::codec::{Record, MAX_KEY_LEN, MAX_VALUE_LEN};
use crate::config::Config;
use crate::directory::Directory;
use crate::error::{BucketKvError, Result};
use crate::storage::{Bucket, BucketId};

/// Point-in-time shape of a store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    pub global_depth: u8,
    pub directory_len: usize,
    pub bucket_count: usize,
    pub end_offset: u64,
}

/// Extendible hash key-value store over a page file
pub struct Store {
    /// Store configuration
    config: Config,

    /// Routing table (memory only)
    directory: Directory,

    /// Bucket arena indexed by `BucketId`
    buckets: Vec<Bucket>,

    /// Offset where the next bucket page is allocated
    end_offset: u64,
}

impl Store {
    /// Create a store at `config.path`
    ///
    /// Any existing file at the path is truncated; its pages cannot be routed
    /// without the directory, which is never written to disk.
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;

        if let Some(parent) = config.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&config.path)?;

        let (first, end_offset) = Bucket::create(&config.path, 0)?;
        let (second, end_offset) = Bucket::create(&config.path, end_offset)?;

        let directory = Directory::new(first.id(), second.id());

        info!(
            path = %config.path.display(),
            max_global_depth = config.max_global_depth,
            "Opened store"
        );

        Ok(Self {
            config,
            directory,
            buckets: vec![first, second],
            end_offset,
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified file
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self> {
        let config = Config::builder().path(path.as_ref()).build();
        Self::open(config)
    }

    /// Store `value` under `key`
    ///
    /// Keys are limited to 127 bytes and values to 1235 bytes. Storing an
    /// existing key again adds a second record; lookups return the first.
    ///
    /// A failed insert is not rolled back. When it ends in
    /// `DirectoryExhausted`, the splits and directory growth done while
    /// making room stay in place; every previously stored record is still
    /// reachable and later inserts keep working.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if key.len() > MAX_KEY_LEN {
            return Err(BucketKvError::RecordTooLarge {
                field: "key",
                len: key.len(),
                max: MAX_KEY_LEN,
            });
        }
        if value.len() > MAX_VALUE_LEN {
            return Err(BucketKvError::RecordTooLarge {
                field: "value",
                len: value.len(),
                max: MAX_VALUE_LEN,
            });
        }

        self.insert(Record::new(key, value))
    }

    /// Look up the value stored under `key`
    pub fn get(&self, key: &str) -> Result<String> {
        let entry = self.directory.resolve(key);
        let record = self.bucket(entry.bucket)?.get(key)?;

        debug!(directory = entry.index, bucket = entry.bucket, key, "Get data");

        Ok(record.value)
    }

    /// Whether `key` is present
    pub fn contains(&self, key: &str) -> Result<bool> {
        match self.get(key) {
            Ok(_) => Ok(true),
            Err(BucketKvError::KeyNotFound) => Ok(false),
            Err(e) => Err(e),
        }
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            global_depth: self.directory.global_depth(),
            directory_len: self.directory.len(),
            bucket_count: self.buckets.len(),
            end_offset: self.end_offset,
        }
    }

    pub fn global_depth(&self) -> u8 {
        self.directory.global_depth()
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    pub fn directory_len(&self) -> usize {
        self.directory.len()
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn end_offset(&self) -> u64 {
        self.end_offset
    }

    pub fn path(&self) -> &Path {
        &self.config.path
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // =========================================================================
    // Restructuring
    // =========================================================================

    /// Insert `record`, splitting and growing until it fits
    ///
    /// Records evicted by a split are queued ahead of the record that caused
    /// it. Every pass stores a record, splits a bucket, or grows the
    /// directory; growth stops at `max_global_depth`, which bounds the loop
    /// by [`max_insert_passes`].
    fn insert(&mut self, record: Record) -> Result<()> {
        let max_passes = max_insert_passes(self.config.max_global_depth);
        let mut pending = VecDeque::from([record]);
        let mut passes = 0usize;

        while let Some(record) = pending.front() {
            passes += 1;
            if passes > max_passes {
                return Err(BucketKvError::Directory(format!(
                    "insert of key {:?} did not settle after {} passes",
                    record.key, max_passes
                )));
            }

            let entry = self.directory.resolve(&record.key);

            let outcome = self.bucket(entry.bucket)?.put(record);

            match outcome {
                Ok(()) => {
                    debug!(
                        directory = entry.index,
                        bucket = entry.bucket,
                        key = %record.key,
                        "Save data"
                    );
                    pending.pop_front();
                }
                Err(BucketKvError::BucketFull) => {
                    if entry.local_depth < self.directory.global_depth() {
                        let evicted = self.split(entry.bucket)?;
                        for record in evicted.into_iter().rev() {
                            pending.push_front(record);
                        }
                    } else {
                        self.grow()?;
                    }
                }
                Err(e) => return Err(e),
            }
        }

        Ok(())
    }

    /// Split `old` into itself and a freshly allocated bucket
    ///
    /// Returns the records taken out of `old`; the caller re-inserts them.
    fn split(&mut self, old: BucketId) -> Result<Vec<Record>> {
        let (new_bucket, end_offset) = Bucket::create(&self.config.path, self.end_offset)?;
        self.end_offset = end_offset;
        let new = new_bucket.id();
        debug_assert_eq!(new as usize, self.buckets.len());
        self.buckets.push(new_bucket);

        let old_bucket = self.bucket(old)?;
        let records = old_bucket.get_all()?;
        old_bucket.clear()?;

        let local_depth = self.directory.split(old, new).ok_or_else(|| {
            BucketKvError::Directory(format!("bucket {} is not referenced by the directory", old))
        })?;

        info!(
            bucket = old,
            new_bucket = new,
            local_depth,
            records = records.len(),
            "Split bucket"
        );

        Ok(records)
    }

    /// Double the directory
    fn grow(&mut self) -> Result<()> {
        let old_depth = self.directory.global_depth();
        self.directory.grow(self.config.max_global_depth)?;

        info!(
            old_depth,
            new_depth = self.directory.global_depth(),
            "Global resize"
        );

        Ok(())
    }

    fn bucket(&self, id: BucketId) -> Result<&Bucket> {
        self.buckets
            .get(id as usize)
            .ok_or_else(|| BucketKvError::Directory(format!("unknown bucket id {}", id)))
    }
}

/// Upper bound on insert loop passes at the given maximum depth
///
/// At most `2^depth` buckets are addressable, so there are fewer than that
/// many splits, each re-storing up to three records, plus `depth - 1` grows
/// and the final store.
pub(crate) fn max_insert_passes(max_global_depth: u8) -> usize {
    let buckets = 1usize << max_global_depth;
    4 * buckets + max_global_depth as usize + 1
}
