//! Datagram Transport Layer
//!
//! The packetizer hands each fully-assembled datagram to a `DatagramTransport`.
//! Framing never depends on how the bytes leave the process, so the blocking
//! UDP socket can be swapped for another sender without touching the drain
//! loop.

use std::io;
use std::net::SocketAddr;
use std::time::Instant;

pub mod metrics;
pub mod udp;

// Re-export transport types
pub use metrics::MetricsTracker;
pub use udp::UdpTransport;

/// Outbound datagram sender
pub trait DatagramTransport: Send {
    /// Send one datagram to the peer, blocking until the OS accepts it.
    ///
    /// `datagram` is sent as a single message; an empty slice sends a
    /// zero-length datagram.
    fn send(&mut self, datagram: &[u8]) -> io::Result<usize>;

    /// Release the underlying socket. Sends after close fail.
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Destination every datagram goes to
    fn peer(&self) -> SocketAddr;
}

impl<T: DatagramTransport + ?Sized> DatagramTransport for Box<T> {
    fn send(&mut self, datagram: &[u8]) -> io::Result<usize> {
        (**self).send(datagram)
    }

    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }

    fn peer(&self) -> SocketAddr {
        (**self).peer()
    }
}

/// Sink performance metrics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SinkMetrics {
    /// Data datagrams handed to the socket successfully
    pub datagrams_sent: u64,
    /// Total bytes sent, headers included
    pub bytes_sent: u64,
    /// Payload bytes sent, headers excluded
    pub payload_bytes_sent: u64,
    /// Datagrams dropped because the send failed
    pub send_errors: u64,
    /// Zero-length end-of-stream datagrams sent
    pub eof_sentinels: u64,
    pub last_send_latency_ns: u64,
    pub avg_send_latency_ns: u64,
    pub max_send_latency_ns: u64,
    pub last_activity: Option<Instant>,
}
