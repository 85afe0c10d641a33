//! Framing header values and their wire encoding
//!
//! A `Header` is the fully-resolved content of one datagram's header. Encoding
//! is a pure function of the header and the agreed `HeaderLayout`; the output
//! is a fixed-capacity byte array so building a header never allocates.

use crate::checksum::ChecksumAlgorithm;
use crate::error::{CodecError, Result};
use crate::header_type::HeaderType;
use crate::layout::{FieldWidth, HeaderLayout, CHECKSUM_WIDTH, MAX_HEADER_SIZE, SEQ_FLAGS_WIDTH};
use crate::sequence::STREAM_SEQUENCE_MAX;
use std::ops::Deref;

/// Flag bits occupy the top nibble of the stream-id sequence word
const STREAM_FLAGS_SHIFT: u32 = 12;

/// One datagram header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Header {
    None,
    SeqNum {
        sequence: u64,
    },
    SeqPlusSize {
        sequence: u64,
        /// Total datagram length, header included
        length: u64,
    },
    StreamId {
        stream_id: u64,
        length: u64,
        /// Low 12 bits of the packed word
        sequence: u16,
        /// High 4 bits of the packed word; always 0 on send
        flags: u8,
    },
    SeqSizeChecksum {
        sequence: u64,
        length: u64,
        checksum: u32,
    },
}

impl Header {
    pub fn header_type(&self) -> HeaderType {
        match self {
            Header::None => HeaderType::None,
            Header::SeqNum { .. } => HeaderType::SeqNum,
            Header::SeqPlusSize { .. } => HeaderType::SeqPlusSize,
            Header::StreamId { .. } => HeaderType::StreamId,
            Header::SeqSizeChecksum { .. } => HeaderType::SeqSizeChecksum,
        }
    }

    /// Sequence value carried by the header, if any
    pub fn sequence(&self) -> Option<u64> {
        match *self {
            Header::None => None,
            Header::SeqNum { sequence }
            | Header::SeqPlusSize { sequence, .. }
            | Header::SeqSizeChecksum { sequence, .. } => Some(sequence),
            Header::StreamId { sequence, .. } => Some(sequence as u64),
        }
    }

    /// Total datagram length carried by the header, if any
    pub fn length(&self) -> Option<u64> {
        match *self {
            Header::None | Header::SeqNum { .. } => None,
            Header::SeqPlusSize { length, .. }
            | Header::StreamId { length, .. }
            | Header::SeqSizeChecksum { length, .. } => Some(length),
        }
    }

    /// Serialize into the fixed-size wire form
    pub fn encode(&self, layout: &HeaderLayout) -> Result<HeaderBytes> {
        let mut out = HeaderBytes::empty();
        match *self {
            Header::None => {}
            Header::SeqNum { sequence } => {
                out.put("sequence", layout.sequence, layout, sequence)?;
            }
            Header::SeqPlusSize { sequence, length } => {
                out.put("sequence", layout.sequence, layout, sequence)?;
                out.put("length", layout.length, layout, length)?;
            }
            Header::StreamId {
                stream_id,
                length,
                sequence,
                flags,
            } => {
                if sequence as u64 > STREAM_SEQUENCE_MAX {
                    return Err(CodecError::FieldOverflow {
                        field: "stream sequence",
                        value: sequence as u64,
                        width: SEQ_FLAGS_WIDTH,
                    });
                }
                if flags > 0x0F {
                    return Err(CodecError::FieldOverflow {
                        field: "stream flags",
                        value: flags as u64,
                        width: SEQ_FLAGS_WIDTH,
                    });
                }
                let packed = ((flags as u64) << STREAM_FLAGS_SHIFT) | sequence as u64;
                out.put("stream_id", layout.stream_id, layout, stream_id)?;
                out.put("length", layout.length, layout, length)?;
                out.put("sequence_flags", SEQ_FLAGS_WIDTH, layout, packed)?;
            }
            Header::SeqSizeChecksum {
                sequence,
                length,
                checksum,
            } => {
                out.put("sequence", layout.sequence, layout, sequence)?;
                out.put("length", layout.length, layout, length)?;
                out.put("checksum", CHECKSUM_WIDTH, layout, checksum as u64)?;
            }
        }
        debug_assert_eq!(out.len(), layout.header_size(self.header_type()));
        Ok(out)
    }

    /// Split a received datagram into its header and payload
    pub fn decode<'a>(
        header_type: HeaderType,
        layout: &HeaderLayout,
        datagram: &'a [u8],
    ) -> Result<(Header, &'a [u8])> {
        let size = layout.header_size(header_type);
        if datagram.len() < size {
            return Err(CodecError::Truncated {
                header_type,
                need: size,
                got: datagram.len(),
            });
        }

        let (raw, payload) = datagram.split_at(size);
        let mut reader = FieldReader { raw, offset: 0, layout };
        let header = match header_type {
            HeaderType::None => Header::None,
            HeaderType::SeqNum => Header::SeqNum {
                sequence: reader.take(layout.sequence),
            },
            HeaderType::SeqPlusSize => Header::SeqPlusSize {
                sequence: reader.take(layout.sequence),
                length: reader.take(layout.length),
            },
            HeaderType::StreamId => {
                let stream_id = reader.take(layout.stream_id);
                let length = reader.take(layout.length);
                let packed = reader.take(SEQ_FLAGS_WIDTH);
                Header::StreamId {
                    stream_id,
                    length,
                    sequence: (packed & STREAM_SEQUENCE_MAX) as u16,
                    flags: (packed >> STREAM_FLAGS_SHIFT) as u8,
                }
            }
            HeaderType::SeqSizeChecksum => Header::SeqSizeChecksum {
                sequence: reader.take(layout.sequence),
                length: reader.take(layout.length),
                checksum: reader.take(CHECKSUM_WIDTH) as u32,
            },
        };
        Ok((header, payload))
    }

    /// Check the payload against the header's checksum; headers without one always pass
    pub fn verify(&self, payload: &[u8], algorithm: ChecksumAlgorithm) -> Result<()> {
        if let Header::SeqSizeChecksum { checksum, .. } = *self {
            let calculated = algorithm.compute(payload);
            if calculated != checksum {
                return Err(CodecError::ChecksumMismatch {
                    expected: checksum,
                    calculated,
                });
            }
        }
        Ok(())
    }
}

struct FieldReader<'a> {
    raw: &'a [u8],
    offset: usize,
    layout: &'a HeaderLayout,
}

impl FieldReader<'_> {
    fn take(&mut self, width: FieldWidth) -> u64 {
        let value = width.read(self.layout.endianness, &self.raw[self.offset..]);
        self.offset += width.bytes();
        value
    }
}

/// Encoded header bytes, at most `MAX_HEADER_SIZE` long
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct HeaderBytes {
    buf: [u8; MAX_HEADER_SIZE],
    len: usize,
}

impl HeaderBytes {
    pub const fn empty() -> Self {
        Self {
            buf: [0; MAX_HEADER_SIZE],
            len: 0,
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    fn put(
        &mut self,
        field: &'static str,
        width: FieldWidth,
        layout: &HeaderLayout,
        value: u64,
    ) -> Result<()> {
        if value > width.max_value() {
            return Err(CodecError::FieldOverflow { field, value, width });
        }
        width.write(layout.endianness, value, &mut self.buf[self.len..]);
        self.len += width.bytes();
        Ok(())
    }
}

impl Deref for HeaderBytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl std::fmt::Debug for HeaderBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("HeaderBytes").field(&self.as_slice()).finish()
    }
}
