//! Hasher
//!
//! Maps a key to a directory index from the low bits of its SHA-256 digest.

use sha2::{Digest, Sha256};

/// Only the last digest byte is used, so at most 8 bits can index the directory
pub const MAX_GLOBAL_DEPTH: u8 = 8;

/// Compute the directory index of `key` at the given depth
///
/// Takes the last byte of the SHA-256 digest and keeps its low `depth` bits.
/// Depths above [`MAX_GLOBAL_DEPTH`] are clamped to it.
pub fn directory_index(key: &str, depth: u8) -> u8 {
    let digest = Sha256::digest(key.as_bytes());
    let last = digest[digest.len() - 1];
    last & depth_mask(depth)
}

/// Mask keeping the low `depth` bits of a byte
pub(crate) fn depth_mask(depth: u8) -> u8 {
    let depth = depth.min(MAX_GLOBAL_DEPTH);
    ((1u16 << depth) - 1) as u8
}
