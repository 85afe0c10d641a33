//! Sink Configuration Module
//!
//! Construction parameters for the datagram sink. Supports loading from a TOML
//! file with `UDPSINK_`-prefixed environment variable overrides; every field
//! has a default so a partial file is enough.

use crate::limits::{MAX_UDP_PAYLOAD, MIN_PAYLOAD_CAPACITY, STANDARD_PAYLOAD_CAPACITY};
use anyhow::{Context, Result};
use codec::{ChecksumAlgorithm, HeaderLayout, HeaderType};
use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Environment variable prefix for overrides (`UDPSINK_PAYLOAD_CAPACITY=9000`)
pub const ENV_PREFIX: &str = "UDPSINK";

/// A construction parameter the sink refuses to start with
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid {field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Immutable sink configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SinkConfig {
    /// Bytes per sample
    pub item_size: usize,
    /// Samples bundled per item
    pub vector_len: usize,
    /// Destination host; empty means local loopback
    pub host: String,
    pub port: u16,
    pub header_type: HeaderType,
    /// Maximum datagram size in bytes, header included
    pub payload_capacity: usize,
    /// Send the three-datagram end-of-stream sentinel on stop
    pub send_eof_on_stop: bool,
    pub layout: HeaderLayout,
    pub checksum: ChecksumAlgorithm,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            item_size: 1,
            vector_len: 1,
            host: String::new(),
            port: 2000,
            header_type: HeaderType::None,
            payload_capacity: STANDARD_PAYLOAD_CAPACITY,
            send_eof_on_stop: true,
            layout: HeaderLayout::default(),
            checksum: ChecksumAlgorithm::default(),
        }
    }
}

impl SinkConfig {
    /// Configuration for one destination, remaining fields defaulted
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// Load configuration from an optional TOML file with environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            debug!("Loading sink config: {:?}", path);
            builder = builder.add_source(File::from(path).required(true));
        }

        // Override with environment variables (UDPSINK_ prefix, __ for nesting)
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to build sink configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize sink configuration")
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse sink configuration TOML")
    }

    /// Bytes per item handed over by the producer
    pub fn block_size(&self) -> usize {
        self.item_size.saturating_mul(self.vector_len)
    }

    pub fn header_size(&self) -> usize {
        self.layout.header_size(self.header_type)
    }

    /// Payload bytes available per datagram once the header is accounted for
    pub fn payload_budget(&self) -> usize {
        self.payload_capacity.saturating_sub(self.header_size())
    }

    /// Smallest batch (in items) that fills at least one payload.
    ///
    /// A scheduling hint for the producer; 0 means a single item already
    /// exceeds one payload.
    pub fn min_batch_items(&self) -> usize {
        match self.block_size() {
            0 => 0,
            block => self.payload_budget() / block,
        }
    }

    /// Stream identifier emitted by the stream-id header
    pub fn stream_id(&self) -> u64 {
        self.port as u64
    }

    /// Host to resolve, with the loopback default applied
    pub fn resolved_host(&self) -> &str {
        if self.host.is_empty() {
            "localhost"
        } else {
            &self.host
        }
    }

    /// Check every constraint the sink needs before it can start
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        if self.item_size == 0 {
            return Err(ValidationError::new("item_size", "must be at least 1 byte"));
        }
        if self.vector_len == 0 {
            return Err(ValidationError::new("vector_len", "must be at least 1"));
        }
        if self.item_size.checked_mul(self.vector_len).is_none() {
            return Err(ValidationError::new(
                "vector_len",
                format!("item_size {} x vector_len {} overflows", self.item_size, self.vector_len),
            ));
        }
        if self.payload_capacity < MIN_PAYLOAD_CAPACITY {
            return Err(ValidationError::new(
                "payload_capacity",
                format!(
                    "{} is too small, must be at least {} bytes",
                    self.payload_capacity, MIN_PAYLOAD_CAPACITY
                ),
            ));
        }
        if self.payload_capacity > MAX_UDP_PAYLOAD {
            return Err(ValidationError::new(
                "payload_capacity",
                format!(
                    "{} exceeds the {} byte UDP datagram limit",
                    self.payload_capacity, MAX_UDP_PAYLOAD
                ),
            ));
        }

        let header_size = self.header_size();
        if header_size >= self.payload_capacity {
            return Err(ValidationError::new(
                "payload_capacity",
                format!(
                    "{} leaves no room for payload after the {} byte {} header",
                    self.payload_capacity, header_size, self.header_type
                ),
            ));
        }

        Ok(())
    }

    /// Whether datagrams of this capacity may be fragmented at the IP layer
    pub fn may_fragment(&self) -> bool {
        self.payload_capacity > STANDARD_PAYLOAD_CAPACITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codec::FieldWidth;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = SinkConfig::default();
        assert_eq!(config.payload_capacity, 1472);
        assert!(config.send_eof_on_stop);
        assert_eq!(config.header_type, HeaderType::None);
        assert_eq!(config.resolved_host(), "localhost");
        config.validate().unwrap();
    }

    #[test]
    fn test_derived_sizes() {
        let config = SinkConfig {
            item_size: 4,
            vector_len: 2,
            header_type: HeaderType::SeqNum,
            payload_capacity: 1472,
            ..SinkConfig::default()
        };
        assert_eq!(config.block_size(), 8);
        assert_eq!(config.header_size(), 4);
        assert_eq!(config.payload_budget(), 1468);
        assert_eq!(config.min_batch_items(), 183);
    }

    #[test]
    fn test_min_batch_items_zero_when_item_exceeds_payload() {
        let config = SinkConfig {
            item_size: 2048,
            ..SinkConfig::default()
        };
        assert_eq!(config.min_batch_items(), 0);
    }

    #[test]
    fn test_payload_capacity_floor() {
        let mut config = SinkConfig {
            payload_capacity: 7,
            ..SinkConfig::default()
        };
        assert_eq!(config.validate().unwrap_err().field, "payload_capacity");

        config.payload_capacity = 8;
        config.validate().unwrap();
    }

    #[test]
    fn test_header_must_leave_payload_room() {
        let config = SinkConfig {
            payload_capacity: 10,
            header_type: HeaderType::SeqSizeChecksum,
            ..SinkConfig::default()
        };
        assert!(config.validate().unwrap_err().message.contains("no room"));
    }

    #[test]
    fn test_jumbo_capacity_warns_but_validates() {
        let config = SinkConfig {
            payload_capacity: crate::limits::JUMBO_PAYLOAD_CAPACITY,
            ..SinkConfig::default()
        };
        config.validate().unwrap();
        assert!(config.may_fragment());
        assert!(!SinkConfig::default().may_fragment());
    }

    #[test]
    fn test_capacity_upper_bound() {
        let mut config = SinkConfig {
            payload_capacity: MAX_UDP_PAYLOAD,
            header_type: HeaderType::SeqPlusSize,
            ..SinkConfig::default()
        };
        config.validate().unwrap();
        assert!(config.may_fragment());

        config.payload_capacity = MAX_UDP_PAYLOAD + 1;
        assert!(config.validate().unwrap_err().message.contains("UDP datagram limit"));
    }

    #[test]
    fn test_zero_sized_items_rejected() {
        let config = SinkConfig {
            vector_len: 0,
            ..SinkConfig::default()
        };
        assert_eq!(config.validate().unwrap_err().field, "vector_len");
    }

    #[test]
    fn test_from_toml_accepts_names_and_codes() {
        let named = SinkConfig::from_toml_str(
            r#"
host = "10.0.0.5"
port = 5005
header_type = "stream_id"
payload_capacity = 1024
"#,
        )
        .unwrap();
        assert_eq!(named.header_type, HeaderType::StreamId);
        assert_eq!(named.port, 5005);
        assert_eq!(named.item_size, 1);

        let coded = SinkConfig::from_toml_str("header_type = 2").unwrap();
        assert_eq!(coded.header_type, HeaderType::SeqPlusSize);

        assert!(SinkConfig::from_toml_str("header_type = 7").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("sink.toml");

        let config_content = r#"
item_size = 8
vector_len = 4
host = "127.0.0.1"
port = 6000
header_type = 1

[layout]
sequence = "u64"
endianness = "big"
"#;

        fs::write(&config_path, config_content).unwrap();

        let config = SinkConfig::load(Some(&config_path)).unwrap();

        assert_eq!(config.block_size(), 32);
        assert_eq!(config.port, 6000);
        assert_eq!(config.header_type, HeaderType::SeqNum);
        assert_eq!(config.layout.sequence, FieldWidth::U64);
        assert_eq!(config.layout.length, FieldWidth::U16);
        assert_eq!(config.header_size(), 8);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempdir().unwrap();
        assert!(SinkConfig::load(Some(&dir.path().join("absent.toml"))).is_err());
    }
}
