//! # Datagram Sink Configuration
//!
//! Construction parameters for the datagram sink and the size limits they are
//! checked against.
//!
//! ## Usage
//!
//! ```rust
//! use config::{SinkConfig, limits};
//! use codec::HeaderType;
//!
//! let config = SinkConfig {
//!     header_type: HeaderType::SeqPlusSize,
//!     ..SinkConfig::new("127.0.0.1", 5000)
//! };
//! assert_eq!(config.payload_capacity, limits::STANDARD_PAYLOAD_CAPACITY);
//! config.validate().unwrap();
//! ```

pub mod limits;
pub mod sink_config;

// Re-export commonly used types
pub use sink_config::{SinkConfig, ValidationError, ENV_PREFIX};
