//! Mapped page
//!
//! Scoped mapping of a single page of the backing file. The file handle and
//! the mapping live exactly as long as the `Page`; dropping it unmaps.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

use memmap2::{MmapMut, MmapOptions};

use crate::error::{BucketKvError, Result};

use super::PAGE_SIZE;

pub(crate) struct Page {
    bucket: u64,
    map: MmapMut,
    _file: File,
}

impl Page {
    /// Open the file and map the page starting at `offset` read-write
    pub(crate) fn map(path: &Path, offset: u64) -> Result<Self> {
        let bucket = offset / PAGE_SIZE;

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| BucketKvError::bucket_io(bucket, "open", e))?;

        // Touching a mapping past EOF raises SIGBUS instead of an error
        let file_len = file
            .metadata()
            .map_err(|e| BucketKvError::bucket_io(bucket, "stat", e))?
            .len();
        if file_len < offset + PAGE_SIZE {
            return Err(BucketKvError::bucket_io(
                bucket,
                "map",
                io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("page at offset {} is past end of file ({} bytes)", offset, file_len),
                ),
            ));
        }

        // SAFETY: the store is the only writer of the file (single caller
        // precondition) and the range was checked to lie inside the file.
        let map = unsafe {
            MmapOptions::new()
                .offset(offset)
                .len(PAGE_SIZE as usize)
                .map_mut(&file)
        }
        .map_err(|e| BucketKvError::bucket_io(bucket, "map", e))?;

        tracing::trace!(bucket, offset, "mapped page");

        Ok(Self {
            bucket,
            map,
            _file: file,
        })
    }

    pub(crate) fn bytes(&self) -> &[u8] {
        &self.map
    }

    pub(crate) fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.map
    }

    /// Write dirty bytes of the page back to the file
    pub(crate) fn flush(&self) -> Result<()> {
        self.map
            .flush()
            .map_err(|e| BucketKvError::bucket_io(self.bucket, "flush", e))?;
        tracing::trace!(bucket = self.bucket, "flushed page");
        Ok(())
    }
}
