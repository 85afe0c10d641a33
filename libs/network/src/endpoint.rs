//! Destination endpoint
//!
//! Resolved exactly once at sink construction and immutable afterwards.

use crate::{Result, TransportError};
use std::fmt;
use std::net::{SocketAddr, ToSocketAddrs};
use tracing::debug;

/// Host used when the configured host is empty
pub const DEFAULT_HOST: &str = "localhost";

/// A resolved datagram destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    host: String,
    port: u16,
    addr: SocketAddr,
}

impl Endpoint {
    /// Resolve `host:port`, preferring an IPv4 address when the name has several
    pub fn resolve(host: &str, port: u16) -> Result<Self> {
        let host = if host.is_empty() { DEFAULT_HOST } else { host };

        let addrs: Vec<SocketAddr> = (host, port)
            .to_socket_addrs()
            .map_err(|e| TransportError::resolution(host, port, "address lookup failed", Some(e)))?
            .collect();

        let addr = addrs
            .iter()
            .find(|addr| addr.is_ipv4())
            .or_else(|| addrs.first())
            .copied()
            .ok_or_else(|| TransportError::resolution(host, port, "no addresses found", None))?;

        debug!("Resolved {}:{} to {} ({} candidates)", host, port, addr, addrs.len());

        Ok(Self {
            host: host.to_string(),
            port,
            addr,
        })
    }

    /// Endpoint for an address that needs no lookup
    pub fn from_addr(addr: SocketAddr) -> Self {
        Self {
            host: addr.ip().to_string(),
            port: addr.port(),
            addr,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host == self.addr.ip().to_string() {
            write!(f, "{}", self.addr)
        } else {
            write!(f, "{}:{} ({})", self.host, self.port, self.addr)
        }
    }
}
