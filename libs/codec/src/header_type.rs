//! Header type selector
//!
//! Each datagram is optionally prefixed with one of a small set of framing
//! headers. The numeric codes are part of the external configuration surface
//! and must not be renumbered.

use crate::error::{CodecError, Result};
use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Framing header prepended to every datagram
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    IntoPrimitive,
    TryFromPrimitive,
)]
#[repr(u8)]
#[serde(rename_all = "snake_case", try_from = "HeaderTypeRepr")]
pub enum HeaderType {
    /// Raw payload, no header bytes
    None = 0,
    /// Sequence number only
    SeqNum = 1,
    /// Sequence number followed by total datagram length
    SeqPlusSize = 2,
    /// CHDR-style: stream id, total length, 12-bit sequence packed with flags
    StreamId = 3,
    /// Sequence number, total length, trailing payload checksum
    SeqSizeChecksum = 4,
}

impl HeaderType {
    /// All header types in wire-code order
    pub const ALL: [HeaderType; 5] = [
        HeaderType::None,
        HeaderType::SeqNum,
        HeaderType::SeqPlusSize,
        HeaderType::StreamId,
        HeaderType::SeqSizeChecksum,
    ];

    /// Map a wire code to a header type
    pub fn from_code(code: u8) -> Result<Self> {
        Self::try_from_primitive(code).map_err(|e| CodecError::UnknownHeaderType { code: e.number })
    }

    /// Wire code of this header type
    pub fn code(self) -> u8 {
        self.into()
    }

    /// Whether the header carries a total-length field
    pub fn carries_length(self) -> bool {
        matches!(
            self,
            HeaderType::SeqPlusSize | HeaderType::StreamId | HeaderType::SeqSizeChecksum
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            HeaderType::None => "none",
            HeaderType::SeqNum => "seq_num",
            HeaderType::SeqPlusSize => "seq_plus_size",
            HeaderType::StreamId => "stream_id",
            HeaderType::SeqSizeChecksum => "seq_size_checksum",
        }
    }
}

impl Default for HeaderType {
    fn default() -> Self {
        HeaderType::None
    }
}

impl fmt::Display for HeaderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HeaderType {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        if let Ok(code) = normalized.parse::<u8>() {
            return Self::from_code(code);
        }
        match normalized.as_str() {
            "none" => Ok(HeaderType::None),
            "seq_num" | "seqnum" => Ok(HeaderType::SeqNum),
            "seq_plus_size" | "seqplussize" => Ok(HeaderType::SeqPlusSize),
            "stream_id" | "chdr" => Ok(HeaderType::StreamId),
            "seq_size_checksum" | "seq_size_crc" => Ok(HeaderType::SeqSizeChecksum),
            _ => Err(CodecError::UnknownHeaderName {
                name: s.to_string(),
            }),
        }
    }
}

/// Config files may name the header type or give its wire code
#[derive(Deserialize)]
#[serde(untagged)]
enum HeaderTypeRepr {
    Code(u8),
    Name(String),
}

impl TryFrom<HeaderTypeRepr> for HeaderType {
    type Error = CodecError;

    fn try_from(repr: HeaderTypeRepr) -> Result<Self> {
        match repr {
            HeaderTypeRepr::Code(code) => Self::from_code(code),
            HeaderTypeRepr::Name(name) => name.parse(),
        }
    }
}
