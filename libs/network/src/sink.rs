//! UDP Sink: packetizer and lifecycle
//!
//! The producer hands over item batches at its own cadence; the network wants
//! bounded datagrams. Each batch is appended to the staging queue and the
//! queue is drained completely before control returns:
//!
//! ```text
//! work(batch) → [StagingQueue] → take ≤ budget → [header][payload] → send_to
//!                     ↑                                 │
//!                     └──────── until empty ◄───────────┘
//! ```
//!
//! All mutable state (queue, sequence counter, socket) sits behind one lock,
//! held for a whole batch or a whole `stop()`, so a supervisor thread can stop
//! the sink while another thread is feeding it.
//!
//! Sends are best-effort. A failed send drops that datagram, bumps the error
//! counter and the drain continues; nothing is retried or re-queued.

use crate::endpoint::Endpoint;
use crate::queue::StagingQueue;
use crate::transports::{DatagramTransport, MetricsTracker, SinkMetrics, UdpTransport};
use crate::{Result, TransportError};
use bytes::BytesMut;
use codec::{HeaderFormatter, HeaderType};
use config::SinkConfig;
use parking_lot::Mutex;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Zero-length datagrams sent on stop to mark end of stream
pub const EOF_SENTINEL_COUNT: usize = 3;

/// Packetizing datagram sink
pub struct UdpSink<T: DatagramTransport = UdpTransport> {
    config: SinkConfig,
    endpoint: Endpoint,
    header_size: usize,
    payload_budget: usize,
    state: Mutex<SinkState<T>>,
    metrics: MetricsTracker,
}

struct SinkState<T> {
    queue: StagingQueue,
    formatter: HeaderFormatter,
    /// `None` once stopped
    transport: Option<T>,
    /// Reused assembly buffer for one outgoing datagram
    datagram: BytesMut,
}

impl UdpSink<UdpTransport> {
    /// Validate `config`, resolve the destination once and open the socket
    pub fn start(config: SinkConfig) -> Result<Self> {
        config.validate()?;
        let endpoint = Endpoint::resolve(&config.host, config.port)?;
        let transport = UdpTransport::open(&endpoint)?;
        Ok(Self::assemble(config, endpoint, transport))
    }
}

impl<T: DatagramTransport> UdpSink<T> {
    /// Build a sink around an already-open transport
    pub fn with_transport(config: SinkConfig, transport: T) -> Result<Self> {
        config.validate()?;
        let endpoint = Endpoint::from_addr(transport.peer());
        Ok(Self::assemble(config, endpoint, transport))
    }

    fn assemble(config: SinkConfig, endpoint: Endpoint, transport: T) -> Self {
        let header_size = config.header_size();
        let payload_budget = config.payload_budget();

        if config.may_fragment() {
            warn!(
                "Payload capacity {} exceeds the standard MTU payload; datagrams may be fragmented",
                config.payload_capacity
            );
        }

        let formatter = HeaderFormatter::new(config.header_type, config.layout, config.stream_id())
            .with_checksum(config.checksum);

        info!(
            endpoint = %endpoint,
            header_type = %config.header_type,
            header_size,
            payload_capacity = config.payload_capacity,
            min_batch_items = config.min_batch_items(),
            "UDP sink started"
        );

        Self {
            state: Mutex::new(SinkState {
                queue: StagingQueue::with_capacity(config.payload_capacity),
                formatter,
                transport: Some(transport),
                datagram: BytesMut::with_capacity(config.payload_capacity),
            }),
            config,
            endpoint,
            header_size,
            payload_budget,
            metrics: MetricsTracker::new(),
        }
    }

    /// Host entry point: transmit `n_items` items from `input`.
    ///
    /// Consumes exactly `n_items * block_size` bytes and always reports the
    /// whole batch consumed.
    pub fn work(&self, n_items: usize, input: &[u8]) -> Result<usize> {
        let expected = n_items.saturating_mul(self.config.block_size());
        if input.len() < expected {
            return Err(TransportError::InputLength {
                n_items,
                expected,
                actual: input.len(),
            });
        }

        self.push(&input[..expected])?;
        Ok(n_items)
    }

    /// Append raw bytes and send every queued byte before returning
    pub fn push(&self, bytes: &[u8]) -> Result<()> {
        let mut state = self.state.lock();
        if state.transport.is_none() {
            return Err(TransportError::Closed);
        }

        state.queue.append(bytes);
        self.drain(&mut state)
    }

    fn drain(&self, state: &mut SinkState<T>) -> Result<()> {
        let SinkState {
            queue,
            formatter,
            transport,
            datagram,
        } = state;
        let transport = transport.as_mut().ok_or(TransportError::Closed)?;

        let mut sent = 0usize;
        let mut failed = 0usize;

        while !queue.is_empty() {
            let payload = queue.take_up_to(self.payload_budget);

            datagram.clear();
            if formatter.header_type() != HeaderType::None {
                let header = formatter.format(&payload)?;
                datagram.extend_from_slice(&header);
            }
            datagram.extend_from_slice(&payload);

            let started = Instant::now();
            match transport.send(&datagram[..]) {
                Ok(_) => {
                    sent += 1;
                    self.metrics.record_send(
                        datagram.len(),
                        payload.len(),
                        started.elapsed().as_nanos() as u64,
                    );
                }
                Err(e) => {
                    failed += 1;
                    self.metrics.record_error();
                    debug!(
                        "Dropped {} byte datagram to {}: {}",
                        datagram.len(),
                        self.endpoint,
                        e
                    );
                }
            }
        }

        if failed > 0 {
            warn!(
                "{} of {} datagrams to {} failed to send",
                failed,
                sent + failed,
                self.endpoint
            );
        }

        Ok(())
    }

    /// Shut the sink down.
    ///
    /// The first call sends the end-of-stream sentinel (if configured),
    /// closes the socket and releases buffers, returning `true`. Later calls
    /// do nothing and return `false`.
    pub fn stop(&self) -> bool {
        let mut state = self.state.lock();
        let Some(mut transport) = state.transport.take() else {
            return false;
        };

        if self.config.send_eof_on_stop {
            for _ in 0..EOF_SENTINEL_COUNT {
                match transport.send(&[]) {
                    Ok(_) => self.metrics.record_sentinel(),
                    Err(e) => debug!("End-of-stream datagram to {} failed: {}", self.endpoint, e),
                }
            }
        }

        if let Err(e) = transport.close() {
            debug!("Closing socket to {} failed: {}", self.endpoint, e);
        }
        drop(transport);

        state.queue.release();
        state.datagram = BytesMut::new();

        let metrics = self.metrics.snapshot();
        info!(
            endpoint = %self.endpoint,
            datagrams_sent = metrics.datagrams_sent,
            bytes_sent = metrics.bytes_sent,
            send_errors = metrics.send_errors,
            "UDP sink stopped"
        );

        true
    }

    pub fn is_stopped(&self) -> bool {
        self.state.lock().transport.is_none()
    }

    pub fn config(&self) -> &SinkConfig {
        &self.config
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn header_size(&self) -> usize {
        self.header_size
    }

    /// Payload bytes per datagram after the header
    pub fn payload_budget(&self) -> usize {
        self.payload_budget
    }

    /// Smallest batch, in items, that fills at least one payload
    pub fn min_batch_items(&self) -> usize {
        self.config.min_batch_items()
    }

    /// Sequence value carried by the most recent datagram
    pub fn sequence(&self) -> u64 {
        self.state.lock().formatter.sequence()
    }

    /// Bytes waiting in the staging queue; 0 whenever no batch is in flight
    pub fn queued_bytes(&self) -> usize {
        self.state.lock().queue.len()
    }

    pub fn metrics(&self) -> SinkMetrics {
        self.metrics.snapshot()
    }
}

impl<T: DatagramTransport> Drop for UdpSink<T> {
    fn drop(&mut self) {
        self.stop();
    }
}
