//! Header field-width table
//!
//! The widths of the sequence, length and stream-id fields are not fixed by
//! the framing scheme itself; they are agreed between sender and receiver.
//! `HeaderLayout` carries that agreement. Two fields are fixed: the packed
//! sequence+flags word of the stream-id header and the checksum.
//!
//! ```text
//! seq_num            [sequence]
//! seq_plus_size      [sequence][length]
//! stream_id          [stream_id][length][flags:4|sequence:12]
//! seq_size_checksum  [sequence][length][checksum:32]
//! ```

use crate::header_type::HeaderType;
use byteorder::{BigEndian, ByteOrder, LittleEndian};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Width of the packed sequence+flags word in the stream-id header
pub const SEQ_FLAGS_WIDTH: FieldWidth = FieldWidth::U16;

/// Width of the trailing checksum field
pub const CHECKSUM_WIDTH: FieldWidth = FieldWidth::U32;

/// Largest header any layout can produce (u64 sequence + u64 length + u32 checksum)
pub const MAX_HEADER_SIZE: usize = 20;

/// Width of a single integer header field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldWidth {
    U16,
    U32,
    U64,
}

impl FieldWidth {
    /// Number of bytes the field occupies on the wire
    pub const fn bytes(self) -> usize {
        match self {
            FieldWidth::U16 => 2,
            FieldWidth::U32 => 4,
            FieldWidth::U64 => 8,
        }
    }

    /// Largest value representable in the field
    pub const fn max_value(self) -> u64 {
        match self {
            FieldWidth::U16 => u16::MAX as u64,
            FieldWidth::U32 => u32::MAX as u64,
            FieldWidth::U64 => u64::MAX,
        }
    }

    /// Write `value` into the first `bytes()` bytes of `out`.
    ///
    /// The caller guarantees `value <= max_value()` and that `out` is long enough.
    pub(crate) fn write(self, endianness: Endianness, value: u64, out: &mut [u8]) {
        let out = &mut out[..self.bytes()];
        match (self, endianness) {
            (FieldWidth::U16, Endianness::Little) => LittleEndian::write_u16(out, value as u16),
            (FieldWidth::U16, Endianness::Big) => BigEndian::write_u16(out, value as u16),
            (FieldWidth::U32, Endianness::Little) => LittleEndian::write_u32(out, value as u32),
            (FieldWidth::U32, Endianness::Big) => BigEndian::write_u32(out, value as u32),
            (FieldWidth::U64, Endianness::Little) => LittleEndian::write_u64(out, value),
            (FieldWidth::U64, Endianness::Big) => BigEndian::write_u64(out, value),
        }
    }

    /// Read a field from the first `bytes()` bytes of `input`
    pub(crate) fn read(self, endianness: Endianness, input: &[u8]) -> u64 {
        let input = &input[..self.bytes()];
        match (self, endianness) {
            (FieldWidth::U16, Endianness::Little) => LittleEndian::read_u16(input) as u64,
            (FieldWidth::U16, Endianness::Big) => BigEndian::read_u16(input) as u64,
            (FieldWidth::U32, Endianness::Little) => LittleEndian::read_u32(input) as u64,
            (FieldWidth::U32, Endianness::Big) => BigEndian::read_u32(input) as u64,
            (FieldWidth::U64, Endianness::Little) => LittleEndian::read_u64(input),
            (FieldWidth::U64, Endianness::Big) => BigEndian::read_u64(input),
        }
    }
}

impl fmt::Display for FieldWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldWidth::U16 => f.write_str("u16"),
            FieldWidth::U32 => f.write_str("u32"),
            FieldWidth::U64 => f.write_str("u64"),
        }
    }
}

/// Byte order of multi-byte header fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endianness {
    #[default]
    Little,
    Big,
}

/// Field widths and byte order shared by sender and receiver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderLayout {
    pub sequence: FieldWidth,
    pub length: FieldWidth,
    pub stream_id: FieldWidth,
    pub endianness: Endianness,
}

impl Default for HeaderLayout {
    fn default() -> Self {
        Self {
            sequence: FieldWidth::U32,
            length: FieldWidth::U16,
            stream_id: FieldWidth::U32,
            endianness: Endianness::Little,
        }
    }
}

impl HeaderLayout {
    /// Size in bytes of the header `header_type` produces under this layout
    pub const fn header_size(&self, header_type: HeaderType) -> usize {
        match header_type {
            HeaderType::None => 0,
            HeaderType::SeqNum => self.sequence.bytes(),
            HeaderType::SeqPlusSize => self.sequence.bytes() + self.length.bytes(),
            HeaderType::StreamId => {
                self.stream_id.bytes() + self.length.bytes() + SEQ_FLAGS_WIDTH.bytes()
            }
            HeaderType::SeqSizeChecksum => {
                self.sequence.bytes() + self.length.bytes() + CHECKSUM_WIDTH.bytes()
            }
        }
    }

    /// Largest datagram length the length field can describe
    pub const fn max_length(&self) -> u64 {
        self.length.max_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_header_sizes() {
        let layout = HeaderLayout::default();
        assert_eq!(layout.header_size(HeaderType::None), 0);
        assert_eq!(layout.header_size(HeaderType::SeqNum), 4);
        assert_eq!(layout.header_size(HeaderType::SeqPlusSize), 6);
        assert_eq!(layout.header_size(HeaderType::StreamId), 8);
        assert_eq!(layout.header_size(HeaderType::SeqSizeChecksum), 10);
    }

    #[test]
    fn test_widest_layout_fits_max_header() {
        let layout = HeaderLayout {
            sequence: FieldWidth::U64,
            length: FieldWidth::U64,
            stream_id: FieldWidth::U64,
            endianness: Endianness::Big,
        };
        for header_type in HeaderType::ALL {
            assert!(layout.header_size(header_type) <= MAX_HEADER_SIZE);
        }
        assert_eq!(layout.header_size(HeaderType::SeqSizeChecksum), MAX_HEADER_SIZE);
    }

    #[test]
    fn test_field_byte_order() {
        let mut buf = [0u8; 4];
        FieldWidth::U32.write(Endianness::Little, 0x0102_0304, &mut buf);
        assert_eq!(buf, [0x04, 0x03, 0x02, 0x01]);
        FieldWidth::U32.write(Endianness::Big, 0x0102_0304, &mut buf);
        assert_eq!(buf, [0x01, 0x02, 0x03, 0x04]);
        assert_eq!(FieldWidth::U32.read(Endianness::Big, &buf), 0x0102_0304);
    }
}
