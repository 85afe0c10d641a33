//! Datagram size limits
//!
//! Values that bound `payload_capacity`. These follow from the IP/UDP header
//! sizes and must not change.

/// Largest UDP payload that crosses a standard 1500-byte Ethernet MTU unfragmented
pub const STANDARD_PAYLOAD_CAPACITY: usize = 1472;

/// Largest UDP payload on a jumbo-frame (9000-byte MTU) network
pub const JUMBO_PAYLOAD_CAPACITY: usize = 8972;

/// Largest payload a single IPv4 UDP datagram can carry
pub const MAX_UDP_PAYLOAD: usize = 65507;

/// Smallest accepted payload capacity
pub const MIN_PAYLOAD_CAPACITY: usize = 8;
