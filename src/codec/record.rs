//! Record codec
//!
//! Serializes a key-value pair into a fixed 1365-byte slot.

use crate::error::{BucketKvError, Result};

use super::varint::{decode_uvarint, encode_uvarint};

/// Size of the key field: 1 length byte + 127 payload bytes
pub const KEY_FIELD_SIZE: usize = 128;

/// Size of the value field: 2 length bytes + 1235 payload bytes
pub const VALUE_FIELD_SIZE: usize = 1237;

/// Size of one encoded record
pub const RECORD_SIZE: usize = KEY_FIELD_SIZE + VALUE_FIELD_SIZE;

/// Largest key payload in bytes
pub const MAX_KEY_LEN: usize = 127;

/// Largest value payload in bytes
pub const MAX_VALUE_LEN: usize = 1235;

/// A key-value pair as stored in a bucket slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub key: String,
    pub value: String,
}

impl Record {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Encode this record into a fixed-size slot
    pub fn encode(&self) -> Result<[u8; RECORD_SIZE]> {
        encode_record(&self.key, &self.value)
    }
}

/// Encode a key-value pair into a fixed 1365-byte record
///
/// Keys longer than 127 bytes and values longer than 1235 bytes are rejected.
pub fn encode_record(key: &str, value: &str) -> Result<[u8; RECORD_SIZE]> {
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

    let mut record = [0u8; RECORD_SIZE];
    write_field(&mut record[..KEY_FIELD_SIZE], key.as_bytes());
    write_field(&mut record[KEY_FIELD_SIZE..], value.as_bytes());
    Ok(record)
}

/// Decode a 1365-byte record back into its key and value
pub fn decode_record(bytes: &[u8]) -> Result<Record> {
    if bytes.len() != RECORD_SIZE {
        return Err(BucketKvError::Decode(format!(
            "record must be {} bytes, got {}",
            RECORD_SIZE,
            bytes.len()
        )));
    }

    let key = read_field(&bytes[..KEY_FIELD_SIZE], "key")?;
    let value = read_field(&bytes[KEY_FIELD_SIZE..], "value")?;

    Ok(Record { key, value })
}

/// Write `[varint len][payload]` at the start of `field`; the rest stays zeroed
fn write_field(field: &mut [u8], payload: &[u8]) {
    let mut prefix = Vec::with_capacity(2);
    let prefix_len = encode_uvarint(payload.len() as u64, &mut prefix);

    field[..prefix_len].copy_from_slice(&prefix);
    field[prefix_len..prefix_len + payload.len()].copy_from_slice(payload);
}

fn read_field(field: &[u8], name: &str) -> Result<String> {
    let (len, prefix_len) = decode_uvarint(field).map_err(|e| match e {
        BucketKvError::Decode(msg) => BucketKvError::Decode(format!("{} length: {}", name, msg)),
        other => other,
    })?;

    let remaining = field.len() - prefix_len;
    if len > remaining as u64 {
        return Err(BucketKvError::Decode(format!(
            "{} length {} exceeds remaining {} field bytes",
            name, len, remaining
        )));
    }

    let payload = &field[prefix_len..prefix_len + len as usize];
    String::from_utf8(payload.to_vec())
        .map_err(|e| BucketKvError::Decode(format!("{} is not valid UTF-8: {}", name, e)))
}
