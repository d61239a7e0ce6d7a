//! Packed transaction codec
//!
//! Compact binary records for storing confirmed transactions:
//! - CompactSize-framed primitives
//! - Transaction pack and unpack with address resolution on read

pub mod buffer;
pub mod packed;

use crate::address::AddressError;
use thiserror::Error;

pub use buffer::{RecordReader, RecordWriter};
pub use packed::{InputFlags, TxCodec, DEFAULT_MAX_FIELD_LEN};

/// Transaction codec errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Corrupt record: {0}")]
    CorruptRecord(String),
    #[error("Field {field} is {len} bytes, limit is {max}")]
    FieldTooLarge {
        field: &'static str,
        len: usize,
        max: usize,
    },
    #[error(transparent)]
    Address(#[from] AddressError),
}

impl CodecError {
    pub(crate) fn corrupt(reason: impl Into<String>) -> Self {
        CodecError::CorruptRecord(reason.into())
    }
}
