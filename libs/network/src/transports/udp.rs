//! UDP Network Transport Implementation
//!
//! Blocking, unconnected UDP sender. The socket is bound to the unspecified
//! address of the destination's family and every datagram goes out with
//! `send_to`, so no association with the peer is ever made.

use super::DatagramTransport;
use crate::endpoint::Endpoint;
use crate::{Result, TransportError};
use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};
use tracing::{debug, info};

/// UDP transport for outbound datagrams
#[derive(Debug)]
pub struct UdpTransport {
    socket: Option<UdpSocket>,
    peer: SocketAddr,
}

impl UdpTransport {
    /// Open an outbound-only socket for `endpoint`
    pub fn open(endpoint: &Endpoint) -> Result<Self> {
        let peer = endpoint.addr();
        let bind_address = match peer {
            SocketAddr::V4(_) => SocketAddr::new(Ipv4Addr::UNSPECIFIED.into(), 0),
            SocketAddr::V6(_) => SocketAddr::new(Ipv6Addr::UNSPECIFIED.into(), 0),
        };

        let socket = UdpSocket::bind(bind_address).map_err(|e| {
            TransportError::io(format!("Failed to open UDP socket on {}", bind_address), e)
        })?;

        info!("UDP transport sending from {:?} to {}", socket.local_addr().ok(), endpoint);

        Ok(Self {
            socket: Some(socket),
            peer,
        })
    }

    /// Get local address
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.socket
            .as_ref()
            .ok_or_else(|| TransportError::io("Socket is closed", closed_error()))?
            .local_addr()
            .map_err(|e| TransportError::io("Failed to get local address", e))
    }

    pub fn is_open(&self) -> bool {
        self.socket.is_some()
    }
}

impl DatagramTransport for UdpTransport {
    fn send(&mut self, datagram: &[u8]) -> io::Result<usize> {
        let socket = self.socket.as_ref().ok_or_else(closed_error)?;
        socket.send_to(datagram, self.peer)
    }

    fn close(&mut self) -> io::Result<()> {
        if self.socket.take().is_some() {
            debug!("Closed UDP socket to {}", self.peer);
        }
        Ok(())
    }

    fn peer(&self) -> SocketAddr {
        self.peer
    }
}

fn closed_error() -> io::Error {
    io::Error::new(io::ErrorKind::NotConnected, "UDP socket is closed")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn receiver() -> (UdpSocket, Endpoint) {
        let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
        socket
            .set_read_timeout(Some(Duration::from_secs(2)))
            .unwrap();
        let endpoint = Endpoint::from_addr(socket.local_addr().unwrap());
        (socket, endpoint)
    }

    #[test]
    fn test_send_reaches_peer() {
        let (rx, endpoint) = receiver();
        let mut transport = UdpTransport::open(&endpoint).unwrap();
        assert_eq!(transport.peer(), endpoint.addr());

        assert_eq!(transport.send(b"hello").unwrap(), 5);

        let mut buf = [0u8; 64];
        let (len, from) = rx.recv_from(&mut buf).unwrap();
        assert_eq!(&buf[..len], b"hello");
        assert_eq!(from.port(), transport.local_addr().unwrap().port());
    }

    #[test]
    fn test_zero_length_datagram() {
        let (rx, endpoint) = receiver();
        let mut transport = UdpTransport::open(&endpoint).unwrap();

        assert_eq!(transport.send(&[]).unwrap(), 0);

        let mut buf = [0u8; 16];
        assert_eq!(rx.recv(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_send_after_close_fails() {
        let (_rx, endpoint) = receiver();
        let mut transport = UdpTransport::open(&endpoint).unwrap();

        transport.close().unwrap();
        assert!(!transport.is_open());
        assert_eq!(
            transport.send(b"late").unwrap_err().kind(),
            io::ErrorKind::NotConnected
        );
        // Closing twice is harmless
        transport.close().unwrap();
        assert!(transport.local_addr().is_err());
    }
}
