//! Error types for simple-step.
//!
//! Provides unified error handling across configuration, hardware access,
//! packet decoding and the transport collaborator.
//!
//! None of these ever reach the wire: the command protocol answers every
//! request, clamping or ignoring invalid values instead of failing.

use core::fmt;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all simple-step operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Pin or peripheral error
    Hardware(HardwareError),
    /// Malformed or unexpected packet
    Protocol(ProtocolError),
    /// Packet transport failure
    Transport(TransportError),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Timer clock frequency must be non-zero
    InvalidClock(u32),
    /// Prescaler is not one the step timer supports (1, 8, 64, 256, 1024)
    InvalidPrescaler(u16),
    /// Timer top range is empty or starts at zero
    InvalidTimerRange {
        /// Configured minimum top
        min: u16,
        /// Configured maximum top
        max: u16,
    },
    /// Maximum velocity does not fit the 16-bit wire format
    VelocityOverflow(u32),
    /// Startup travel velocity above the maximum velocity
    TravelVelocityOutOfRange {
        /// Configured travel velocity
        requested: u16,
        /// Maximum velocity derived from the timer
        max: u16,
    },
    /// A required component was not handed to the builder
    MissingComponent(&'static str),
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Hardware access errors.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HardwareError {
    /// Pin operation failed
    Pin,
}

/// Packet decoding errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Packet shorter than the fixed packet size
    ShortPacket {
        /// Bytes required
        expected: usize,
        /// Bytes received
        actual: usize,
    },
    /// Response did not echo the request's command id
    CommandMismatch {
        /// Id sent
        expected: u8,
        /// Id received
        received: u8,
    },
    /// Response control byte is not a known payload tag
    UnknownPayloadKind(u8),
    /// Response carried a different payload type than the command defines
    UnexpectedPayload {
        /// Command id
        command: u8,
        /// Payload tag received
        kind: u8,
    },
    /// Echoed value is outside the enumeration it encodes
    InvalidValue(u8),
}

/// Transport errors reported by the packet pipe or host link.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// No packet arrived in time
    Timeout,
    /// Peer is not connected
    Disconnected,
    /// Low-level I/O failure
    Io,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Hardware(e) => write!(f, "Hardware error: {}", e),
            Error::Protocol(e) => write!(f, "Protocol error: {}", e),
            Error::Transport(e) => write!(f, "Transport error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::InvalidClock(v) => write!(f, "Invalid clock frequency: {} Hz", v),
            ConfigError::InvalidPrescaler(v) => {
                write!(f, "Invalid prescaler: {}. Valid values: 1, 8, 64, 256, 1024", v)
            }
            ConfigError::InvalidTimerRange { min, max } => {
                write!(
                    f,
                    "Invalid timer range: top_min ({}) must be > 0 and < top_max ({})",
                    min, max
                )
            }
            ConfigError::VelocityOverflow(v) => {
                write!(f, "Maximum velocity {} steps/s exceeds 65535", v)
            }
            ConfigError::TravelVelocityOutOfRange { requested, max } => {
                write!(f, "Travel velocity {} exceeds maximum {}", requested, max)
            }
            ConfigError::MissingComponent(name) => write!(f, "{} is required", name),
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for HardwareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HardwareError::Pin => write!(f, "GPIO pin operation failed"),
        }
    }
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::ShortPacket { expected, actual } => {
                write!(f, "Packet of {} bytes, expected {}", actual, expected)
            }
            ProtocolError::CommandMismatch { expected, received } => {
                write!(f, "Response echoed command {} for request {}", received, expected)
            }
            ProtocolError::UnknownPayloadKind(tag) => write!(f, "Unknown payload tag {}", tag),
            ProtocolError::UnexpectedPayload { command, kind } => {
                write!(f, "Unexpected payload tag {} for command {}", kind, command)
            }
            ProtocolError::InvalidValue(v) => write!(f, "Invalid enumeration value {}", v),
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Timeout => write!(f, "timed out"),
            TransportError::Disconnected => write!(f, "disconnected"),
            TransportError::Io => write!(f, "I/O failure"),
        }
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<HardwareError> for Error {
    fn from(e: HardwareError) -> Self {
        Error::Hardware(e)
    }
}

impl From<ProtocolError> for Error {
    fn from(e: ProtocolError) -> Self {
        Error::Protocol(e)
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Error::Transport(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for HardwareError {}

#[cfg(feature = "std")]
impl std::error::Error for ProtocolError {}

#[cfg(feature = "std")]
impl std::error::Error for TransportError {}
