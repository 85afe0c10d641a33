//! Payload checksum for the `seq_size_checksum` header
//!
//! Receivers have not pinned down an algorithm for this header, so the
//! algorithm is an explicit, swappable choice rather than baked into the
//! encoder. CRC-32 (IEEE, zlib-compatible) over the payload bytes is the only
//! current member and is provisional.

use serde::{Deserialize, Serialize};

/// Checksum algorithm carried in the trailing header field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumAlgorithm {
    #[default]
    Crc32,
}

impl ChecksumAlgorithm {
    /// Checksum of a datagram payload
    pub fn compute(self, payload: &[u8]) -> u32 {
        match self {
            ChecksumAlgorithm::Crc32 => calculate_crc32(payload),
        }
    }
}

/// Calculate CRC32 checksum for a byte run
pub fn calculate_crc32(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}
