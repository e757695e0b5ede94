//! Varint codec
//!
//! Unsigned base-128 integers used as length prefixes in record fields.

use crate::error::{BucketKvError, Result};

/// Longest encoding of a u64 (ceil(64 / 7))
pub const MAX_VARINT_LEN: usize = 10;

const CONTINUATION: u8 = 0x80;
const PAYLOAD_MASK: u8 = 0x7f;

/// Number of bytes `value` occupies when encoded
pub fn uvarint_len(value: u64) -> usize {
    let bits = 64 - value.leading_zeros() as usize;
    bits.div_ceil(7).max(1)
}

/// Append the varint encoding of `value` to `buf`
///
/// Returns the number of bytes written.
pub fn encode_uvarint(mut value: u64, buf: &mut Vec<u8>) -> usize {
    let start = buf.len();
    while value >= u64::from(CONTINUATION) {
        buf.push((value as u8 & PAYLOAD_MASK) | CONTINUATION);
        value >>= 7;
    }
    buf.push(value as u8);
    buf.len() - start
}

/// Decode a varint from the front of `bytes`
///
/// Returns the value and the number of bytes consumed. Fails when the
/// continuation bit never clears inside `bytes` or the value overflows u64.
pub fn decode_uvarint(bytes: &[u8]) -> Result<(u64, usize)> {
    let mut value: u64 = 0;

    for (i, &byte) in bytes.iter().enumerate() {
        if i >= MAX_VARINT_LEN {
            break;
        }

        let group = u64::from(byte & PAYLOAD_MASK);
        let shift = 7 * i as u32;

        // The 10th byte may only contribute the single remaining bit
        if i == MAX_VARINT_LEN - 1 && group > 1 {
            return Err(BucketKvError::Decode("varint overflows u64".to_string()));
        }

        value |= group << shift;

        if byte & CONTINUATION == 0 {
            return Ok((value, i + 1));
        }
    }

    if bytes.len() >= MAX_VARINT_LEN {
        Err(BucketKvError::Decode("varint overflows u64".to_string()))
    } else {
        Err(BucketKvError::Decode(format!(
            "unterminated varint in {} byte field",
            bytes.len()
        )))
    }
}
