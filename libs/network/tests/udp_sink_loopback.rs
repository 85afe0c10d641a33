//! UDP Sink Loopback Tests
//!
//! Drives the sink against a real UDP receiver on 127.0.0.1 and checks the
//! datagram stream on the wire: segmentation, headers, end-of-stream
//! sentinel and shutdown behaviour.

use codec::{Header, HeaderLayout, HeaderType};
use config::SinkConfig;
use network::{TransportError, UdpSink, EOF_SENTINEL_COUNT};
use std::io::ErrorKind;
use std::net::UdpSocket;
use std::time::Duration;

struct Receiver {
    socket: UdpSocket,
    buf: Vec<u8>,
}

impl Receiver {
    fn bind() -> Self {
        let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
        socket
            .set_read_timeout(Some(Duration::from_secs(2)))
            .unwrap();
        Self {
            socket,
            buf: vec![0u8; 65536],
        }
    }

    fn port(&self) -> u16 {
        self.socket.local_addr().unwrap().port()
    }

    fn config(&self, header_type: HeaderType, payload_capacity: usize) -> SinkConfig {
        SinkConfig {
            header_type,
            payload_capacity,
            ..SinkConfig::new("127.0.0.1", self.port())
        }
    }

    fn recv(&mut self) -> Vec<u8> {
        let len = self.socket.recv(&mut self.buf).unwrap();
        self.buf[..len].to_vec()
    }

    /// True if nothing arrives within a short window
    fn is_quiet(&mut self) -> bool {
        self.socket
            .set_read_timeout(Some(Duration::from_millis(200)))
            .unwrap();
        match self.socket.recv(&mut self.buf) {
            Ok(_) => false,
            Err(e) => matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut),
        }
    }
}

#[test]
fn test_seq_num_segmentation_on_the_wire() {
    let mut rx = Receiver::bind();
    let sink = UdpSink::start(rx.config(HeaderType::SeqNum, 16)).unwrap();

    let data: Vec<u8> = (100..130).collect();
    sink.push(&data).unwrap();

    let layout = HeaderLayout::default();
    let mut reassembled = Vec::new();
    for (expected_seq, expected_len) in [(1u64, 12usize), (2, 12), (3, 6)] {
        let datagram = rx.recv();
        assert_eq!(datagram.len(), 4 + expected_len);
        let (header, payload) = Header::decode(HeaderType::SeqNum, &layout, &datagram).unwrap();
        assert_eq!(header.sequence(), Some(expected_seq));
        reassembled.extend_from_slice(payload);
    }
    assert_eq!(reassembled, data);

    let metrics = sink.metrics();
    assert_eq!(metrics.datagrams_sent, 3);
    assert_eq!(metrics.bytes_sent, 42);
    assert_eq!(metrics.payload_bytes_sent, 30);
}

#[test]
fn test_stream_id_header_carries_port() {
    let mut rx = Receiver::bind();
    let sink = UdpSink::start(rx.config(HeaderType::StreamId, 64)).unwrap();
    assert_eq!(sink.header_size(), 8);

    sink.push(&[0xEE; 100]).unwrap();

    let layout = HeaderLayout::default();
    let first = rx.recv();
    let second = rx.recv();
    assert_eq!(first.len(), 64);
    assert_eq!(second.len(), 8 + 44);

    let (header, _) = Header::decode(HeaderType::StreamId, &layout, &second).unwrap();
    assert_eq!(
        header,
        Header::StreamId {
            stream_id: rx.port() as u64,
            length: 52,
            sequence: 2,
            flags: 0,
        }
    );
}

#[test]
fn test_stop_sends_three_empty_datagrams_then_nothing() {
    let mut rx = Receiver::bind();
    let sink = UdpSink::start(rx.config(HeaderType::SeqPlusSize, 1472)).unwrap();

    sink.push(b"last words").unwrap();
    assert_eq!(rx.recv().len(), 6 + 10);

    assert!(sink.stop());
    for _ in 0..EOF_SENTINEL_COUNT {
        assert!(rx.recv().is_empty());
    }

    assert!(!sink.stop());
    assert!(rx.is_quiet());
    assert!(matches!(sink.push(b"more"), Err(TransportError::Closed)));
}

#[test]
fn test_stop_without_sentinel_is_silent() {
    let mut rx = Receiver::bind();
    let config = SinkConfig {
        send_eof_on_stop: false,
        ..rx.config(HeaderType::None, 1472)
    };
    let sink = UdpSink::start(config).unwrap();

    assert!(sink.stop());
    assert!(rx.is_quiet());
}

#[test]
fn test_work_batches_items() {
    let mut rx = Receiver::bind();
    let config = SinkConfig {
        item_size: 8,
        vector_len: 2,
        ..rx.config(HeaderType::None, 1472)
    };
    let sink = UdpSink::start(config).unwrap();
    assert_eq!(sink.min_batch_items(), 92);

    let input = vec![0x42; 16 * 100];
    assert_eq!(sink.work(100, &input).unwrap(), 100);

    assert_eq!(rx.recv().len(), 1472);
    assert_eq!(rx.recv().len(), 128);
}

#[test]
fn test_bad_config_refuses_to_start() {
    let rx = Receiver::bind();

    let err = UdpSink::start(rx.config(HeaderType::None, 7)).err().unwrap();
    assert!(matches!(err, TransportError::Configuration { .. }));

    let unresolvable = SinkConfig::new("no-such-host.invalid", rx.port());
    let err = UdpSink::start(unresolvable).err().unwrap();
    assert!(matches!(err, TransportError::Resolution { .. }));
    assert!(err.is_fatal());
}
