//! Bucket
//!
//! A fixed-capacity group of records occupying one page of the backing file.
//! Nothing is cached in memory: each call maps the page, works on it, and
//! unmaps before returning.

use std::fs::OpenOptions;
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::codec::{decode_record, Record, RECORD_SIZE};
use crate::error::{BucketKvError, Result};

use super::page::Page;
use super::{BUCKET_CAPACITY, PAGE_SIZE, SLOTS_OFFSET};

/// Stable bucket identity: page offset / page size
pub type BucketId = u64;

/// Handle to a bucket page in the backing file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    /// Backing file path
    path: PathBuf,
    /// Byte offset of the bucket's page
    offset: u64,
}

impl Bucket {
    /// Reserve a zero-filled page at `end_offset`
    ///
    /// Returns the new bucket and the offset just past its page.
    pub fn create(path: &Path, end_offset: u64) -> Result<(Self, u64)> {
        let id = end_offset / PAGE_SIZE;

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|e| BucketKvError::bucket_io(id, "create", e))?;

        file.seek(SeekFrom::Start(end_offset))
            .and_then(|_| file.write_all(&[0u8; PAGE_SIZE as usize]))
            .map_err(|e| BucketKvError::bucket_io(id, "create", e))?;

        let bucket = Self {
            path: path.to_path_buf(),
            offset: end_offset,
        };

        Ok((bucket, end_offset + PAGE_SIZE))
    }

    /// Find the record stored under `key`
    pub fn get(&self, key: &str) -> Result<Record> {
        let page = Page::map(&self.path, self.offset)?;
        let data = page.bytes();
        let count = self.occupancy(data)?;

        for slot in 0..count {
            let record = self.decode_slot(data, slot)?;
            if record.key == key {
                return Ok(record);
            }
        }

        Err(BucketKvError::KeyNotFound)
    }

    /// Append a record into the next free slot
    ///
    /// Fails with `BucketFull` when all slots are taken.
    pub fn put(&self, record: &Record) -> Result<()> {
        let mut page = Page::map(&self.path, self.offset)?;
        let count = self.occupancy(page.bytes())?;

        if count == BUCKET_CAPACITY {
            return Err(BucketKvError::BucketFull);
        }

        let encoded = record.encode()?;
        let start = slot_offset(count);

        let data = page.bytes_mut();
        data[start..start + RECORD_SIZE].copy_from_slice(&encoded);
        data[0] += 1;

        page.flush()
    }

    /// All stored records in slot order
    pub fn get_all(&self) -> Result<Vec<Record>> {
        let page = Page::map(&self.path, self.offset)?;
        let data = page.bytes();
        let count = self.occupancy(data)?;

        (0..count).map(|slot| self.decode_slot(data, slot)).collect()
    }

    /// Zero the whole page, dropping every record
    pub fn clear(&self) -> Result<()> {
        let mut page = Page::map(&self.path, self.offset)?;
        page.bytes_mut().fill(0);
        page.flush()
    }

    /// Number of records currently stored
    pub fn len(&self) -> Result<usize> {
        let page = Page::map(&self.path, self.offset)?;
        self.occupancy(page.bytes())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    pub fn is_full(&self) -> Result<bool> {
        Ok(self.len()? == BUCKET_CAPACITY)
    }

    pub fn id(&self) -> BucketId {
        self.offset / PAGE_SIZE
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Read and validate the count byte
    fn occupancy(&self, data: &[u8]) -> Result<usize> {
        let count = data[0] as usize;
        if count > BUCKET_CAPACITY {
            return Err(BucketKvError::Decode(format!(
                "bucket {}: record count {} exceeds capacity {}",
                self.id(),
                count,
                BUCKET_CAPACITY
            )));
        }
        Ok(count)
    }

    fn decode_slot(&self, data: &[u8], slot: usize) -> Result<Record> {
        let start = slot_offset(slot);
        decode_record(&data[start..start + RECORD_SIZE]).map_err(|e| match e {
            BucketKvError::Decode(msg) => BucketKvError::Decode(format!(
                "bucket {} slot {}: {}",
                self.id(),
                slot,
                msg
            )),
            other => other,
        })
    }
}

fn slot_offset(slot: usize) -> usize {
    SLOTS_OFFSET + slot * RECORD_SIZE
}
