//! Per-datagram header construction
//!
//! `HeaderFormatter` owns the sequence counter and turns "the next payload
//! about to go out" into that datagram's header. Length fields record the
//! total datagram length actually sent, so a short final chunk carries its
//! own short length.

use crate::checksum::ChecksumAlgorithm;
use crate::error::Result;
use crate::header::{Header, HeaderBytes};
use crate::header_type::HeaderType;
use crate::layout::HeaderLayout;
use crate::sequence::SequenceCounter;

#[derive(Debug, Clone)]
pub struct HeaderFormatter {
    header_type: HeaderType,
    layout: HeaderLayout,
    counter: SequenceCounter,
    stream_id: u64,
    checksum: ChecksumAlgorithm,
}

impl HeaderFormatter {
    /// `stream_id` is only emitted by the stream-id header
    pub fn new(header_type: HeaderType, layout: HeaderLayout, stream_id: u64) -> Self {
        Self {
            header_type,
            layout,
            counter: SequenceCounter::for_header(header_type, &layout),
            stream_id,
            checksum: ChecksumAlgorithm::default(),
        }
    }

    pub fn with_checksum(mut self, checksum: ChecksumAlgorithm) -> Self {
        self.checksum = checksum;
        self
    }

    pub fn with_counter(mut self, counter: SequenceCounter) -> Self {
        self.counter = counter;
        self
    }

    pub fn header_type(&self) -> HeaderType {
        self.header_type
    }

    pub fn layout(&self) -> &HeaderLayout {
        &self.layout
    }

    pub fn header_size(&self) -> usize {
        self.layout.header_size(self.header_type)
    }

    /// Sequence value of the last header built
    pub fn sequence(&self) -> u64 {
        self.counter.current()
    }

    /// Build the header for `payload`, advancing the sequence counter
    pub fn next_header(&mut self, payload: &[u8]) -> Header {
        let length = (self.header_size() + payload.len()) as u64;
        match self.header_type {
            HeaderType::None => Header::None,
            HeaderType::SeqNum => Header::SeqNum {
                sequence: self.counter.advance(),
            },
            HeaderType::SeqPlusSize => Header::SeqPlusSize {
                sequence: self.counter.advance(),
                length,
            },
            HeaderType::StreamId => Header::StreamId {
                stream_id: self.stream_id,
                length,
                sequence: self.counter.advance() as u16,
                flags: 0,
            },
            HeaderType::SeqSizeChecksum => Header::SeqSizeChecksum {
                sequence: self.counter.advance(),
                length,
                checksum: self.checksum.compute(payload),
            },
        }
    }

    /// Build and encode the header for `payload`
    pub fn format(&mut self, payload: &[u8]) -> Result<HeaderBytes> {
        let header = self.next_header(payload);
        header.encode(&self.layout)
    }
}
