//! Staging Queue
//!
//! FIFO byte buffer between the producer, which pushes whole item batches,
//! and the packetizer, which pulls payload-sized chunks. Backed by a single
//! growable `BytesMut`: appends extend the tail, takes split off the head in
//! O(1), and consumed head space is reclaimed when the buffer next grows.

use bytes::{Bytes, BytesMut};

/// Ordered, unbounded byte queue
#[derive(Debug, Default)]
pub struct StagingQueue {
    buf: BytesMut,
}

impl StagingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue with room for `capacity` bytes before reallocating
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
        }
    }

    /// Append `bytes` at the tail, in order
    pub fn append(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Remove up to `n` bytes from the head.
    ///
    /// Returns fewer than `n` only when fewer are queued, and an empty
    /// buffer when the queue is empty.
    pub fn take_up_to(&mut self, n: usize) -> Bytes {
        let n = n.min(self.buf.len());
        self.buf.split_to(n).freeze()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Drop queued bytes and give the backing allocation back
    pub fn release(&mut self) {
        self.buf = BytesMut::new();
    }
}
