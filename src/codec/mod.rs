//! Codec Module
//!
//! Fixed-length binary encoding of key-value records.
//!
//! ## Record Format (1365 bytes)
//! ```text
//! ┌──────────────────────────────────┬──────────────────────────────────────┐
//! │ Key Field (128)                  │ Value Field (1237)                   │
//! │ ┌────────┬────────┬───────────┐  │ ┌────────┬──────────┬─────────────┐  │
//! │ │ Varint │  Key   │ Zero pad  │  │ │ Varint │  Value   │  Zero pad   │  │
//! │ └────────┴────────┴───────────┘  │ └────────┴──────────┴─────────────┘  │
//! └──────────────────────────────────┴──────────────────────────────────────┘
//! ```
//!
//! ### Varint
//! Base-128, least significant group first. Every byte except the last
//! carries the continuation bit `0x80`.

mod record;
mod varint;

pub use record::{
    decode_record, encode_record, Record, KEY_FIELD_SIZE, MAX_KEY_LEN, MAX_VALUE_LEN,
    RECORD_SIZE, VALUE_FIELD_SIZE,
};
pub use varint::{decode_uvarint, encode_uvarint, uvarint_len, MAX_VARINT_LEN};
