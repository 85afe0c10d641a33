//! Sink Error Types
//!
//! Configuration and resolution failures are fatal and surface from
//! construction. Per-datagram send failures never appear here: delivery is
//! best-effort and those are absorbed by the drain loop.

use config::ValidationError;
use thiserror::Error;

/// Main transport error type
#[derive(Error, Debug)]
pub enum TransportError {
    /// Invalid construction parameters
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        field: Option<String>,
    },

    /// Destination host could not be resolved to an address
    #[error("Resolution error: {host}:{port}: {message}")]
    Resolution {
        host: String,
        port: u16,
        message: String,
        source: Option<std::io::Error>,
    },

    /// Socket setup I/O errors
    #[error("I/O error: {message}")]
    Io {
        message: String,
        source: std::io::Error,
    },

    /// Header could not be encoded
    #[error("Framing error: {0}")]
    Codec(#[from] codec::CodecError),

    /// Host handed over fewer bytes than the items it claims
    #[error("Input too short: {n_items} items need {expected} bytes, got {actual}")]
    InputLength {
        n_items: usize,
        expected: usize,
        actual: usize,
    },

    /// The sink has been stopped and no longer accepts data
    #[error("Sink is stopped")]
    Closed,
}

/// Result type alias for transport operations
pub type Result<T> = std::result::Result<T, TransportError>;

impl TransportError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>, field: Option<&str>) -> Self {
        Self::Configuration {
            message: message.into(),
            field: field.map(|s| s.to_string()),
        }
    }

    /// Create a resolution error
    pub fn resolution(
        host: impl Into<String>,
        port: u16,
        message: impl Into<String>,
        source: Option<std::io::Error>,
    ) -> Self {
        Self::Resolution {
            host: host.into(),
            port,
            message: message.into(),
            source,
        }
    }

    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Whether the error prevented the sink from being constructed
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            TransportError::Configuration { .. }
                | TransportError::Resolution { .. }
                | TransportError::Io { .. }
        )
    }

    /// Get error category for metrics
    pub fn category(&self) -> &'static str {
        match self {
            TransportError::Configuration { .. } => "configuration",
            TransportError::Resolution { .. } => "resolution",
            TransportError::Io { .. } => "io",
            TransportError::Codec(_) => "codec",
            TransportError::InputLength { .. } => "input_length",
            TransportError::Closed => "closed",
        }
    }
}

impl From<ValidationError> for TransportError {
    fn from(error: ValidationError) -> Self {
        TransportError::configuration(error.to_string(), Some(error.field))
    }
}

/// Convert standard I/O errors to transport errors
impl From<std::io::Error> for TransportError {
    fn from(error: std::io::Error) -> Self {
        TransportError::Io {
            message: error.to_string(),
            source: error,
        }
    }
}
