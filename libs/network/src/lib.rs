//! # Packetizing UDP Sink
//!
//! Turns an unbounded byte stream, delivered in producer-sized batches, into
//! bounded UDP datagrams with optional framing headers.
//!
//! - **Staging queue**: FIFO bridging item-granularity pushes and
//!   payload-granularity sends
//! - **Packetizer**: carves the queue into maximum-size payloads, one datagram
//!   per payload, until the queue is empty
//! - **Lifecycle**: validated start, idempotent stop with an optional
//!   end-of-stream sentinel
//!
//! ## Usage
//!
//! ```no_run
//! use codec::HeaderType;
//! use config::SinkConfig;
//! use network::UdpSink;
//!
//! let config = SinkConfig {
//!     header_type: HeaderType::SeqNum,
//!     ..SinkConfig::new("127.0.0.1", 5000)
//! };
//! let sink = UdpSink::start(config)?;
//! sink.work(4, &[0u8; 4])?;
//! sink.stop();
//! # Ok::<(), network::TransportError>(())
//! ```

pub mod endpoint;
pub mod error;
pub mod queue;
pub mod sink;
pub mod transports;

// Re-export commonly used types
pub use endpoint::Endpoint;
pub use error::{Result, TransportError};
pub use queue::StagingQueue;
pub use sink::{UdpSink, EOF_SENTINEL_COUNT};
pub use transports::{DatagramTransport, MetricsTracker, SinkMetrics, UdpTransport};
