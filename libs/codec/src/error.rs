//! Framing errors for header construction and parsing
//!
//! Header construction can only fail when a field value does not fit the
//! configured width; parsing fails on short or corrupt datagrams.

use crate::header_type::HeaderType;
use crate::layout::FieldWidth;
use thiserror::Error;

/// Header codec errors with enough context to diagnose a bad stream
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Numeric header type is not one of the wire codes 0-4
    #[error("Unknown header type {code}: valid codes are 0 (none), 1 (seq_num), 2 (seq_plus_size), 3 (stream_id), 4 (seq_size_checksum)")]
    UnknownHeaderType { code: u8 },

    /// Header type name could not be parsed
    #[error("Unknown header type name '{name}'")]
    UnknownHeaderName { name: String },

    /// Datagram is shorter than the header it claims to carry
    #[error("Datagram too short for {header_type} header: need {need} bytes, got {got}")]
    Truncated {
        header_type: HeaderType,
        need: usize,
        got: usize,
    },

    /// A field value exceeds what its configured width can carry
    #[error("Value {value} does not fit the {width} {field} field")]
    FieldOverflow {
        field: &'static str,
        value: u64,
        width: FieldWidth,
    },

    /// Payload does not hash to the checksum carried in the header
    #[error("Checksum mismatch: header carries {expected:#010x}, payload hashes to {calculated:#010x}")]
    ChecksumMismatch { expected: u32, calculated: u32 },
}

/// Result type alias for codec operations
pub type Result<T> = std::result::Result<T, CodecError>;
