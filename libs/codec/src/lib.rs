//! # Datagram Framing Codec
//!
//! Lightweight framing headers for a best-effort datagram stream:
//!
//! - **Header types**: none, sequence number, sequence + size, CHDR-style
//!   stream-id, sequence + size + checksum
//! - **Field-width table**: sequence/length/stream-id widths and byte order
//!   agreed between sender and receiver
//! - **Sequence rollover**: wrap-through-zero for generic headers, 12-bit
//!   skip-zero cycling for stream-id headers
//!
//! ## Architecture Role
//!
//! ```text
//! libs/codec → libs/network
//!     ↑              ↓
//! Header Rules   Queue, Packetizer, Socket
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use codec::{HeaderFormatter, HeaderLayout, HeaderType};
//!
//! let mut formatter = HeaderFormatter::new(HeaderType::SeqNum, HeaderLayout::default(), 0);
//! let header = formatter.format(b"payload").unwrap();
//! assert_eq!(header.as_slice(), &1u32.to_le_bytes());
//! ```

pub mod checksum;
pub mod error;
pub mod formatter;
pub mod header;
pub mod header_type;
pub mod layout;
pub mod sequence;

pub use checksum::{calculate_crc32, ChecksumAlgorithm};
pub use error::{CodecError, Result};
pub use formatter::HeaderFormatter;
pub use header::{Header, HeaderBytes};
pub use header_type::HeaderType;
pub use layout::{
    Endianness, FieldWidth, HeaderLayout, CHECKSUM_WIDTH, MAX_HEADER_SIZE, SEQ_FLAGS_WIDTH,
};
pub use sequence::{Rollover, SequenceCounter, STREAM_SEQUENCE_MAX};
