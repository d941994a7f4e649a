//! Fixed-size request/response packet.
//!
//! Layout (little-endian, 6 bytes):
//!
//! | byte | field                                   |
//! |------|-----------------------------------------|
//! | 0    | command id                              |
//! | 1    | control byte                            |
//! | 2..6 | payload: `u8`, `u16` or `i32` from byte 2 |
//!
//! The payload is a union: writing a narrow value leaves the upper payload
//! bytes untouched.

use crate::error::ProtocolError;

/// Size of every packet on the wire.
pub const PACKET_SIZE: usize = 6;

/// Payload width in bytes.
pub const PAYLOAD_SIZE: usize = 4;

/// Request control byte: run the mode update after the command.
pub const CTL_APPLY: u8 = 200;

/// Request control byte: skip the mode update.
pub const CTL_NO_APPLY: u8 = 201;

/// Whether a request asks for the motion mode update after its command.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Update {
    /// Re-plan and reload the step generator after the command.
    Apply,
    /// Leave the step generator as it is.
    Skip,
}

impl Update {
    /// Decode a request control byte; anything but `CTL_APPLY` skips.
    #[inline]
    pub fn from_control(control: u8) -> Self {
        if control == CTL_APPLY {
            Update::Apply
        } else {
            Update::Skip
        }
    }

    /// Request control byte.
    #[inline]
    pub fn control(self) -> u8 {
        match self {
            Update::Apply => CTL_APPLY,
            Update::Skip => CTL_NO_APPLY,
        }
    }
}

impl From<bool> for Update {
    fn from(apply: bool) -> Self {
        if apply {
            Update::Apply
        } else {
            Update::Skip
        }
    }
}

/// Response payload type tag, carried in the control byte.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    /// One unsigned byte.
    U8 = 0,
    /// Unsigned 16-bit.
    U16 = 1,
    /// Signed 32-bit.
    I32 = 2,
}

impl TryFrom<u8> for PayloadKind {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(PayloadKind::U8),
            1 => Ok(PayloadKind::U16),
            2 => Ok(PayloadKind::I32),
            other => Err(ProtocolError::UnknownPayloadKind(other)),
        }
    }
}

/// A typed payload value.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    /// One unsigned byte.
    U8(u8),
    /// Unsigned 16-bit.
    U16(u16),
    /// Signed 32-bit.
    I32(i32),
}

impl Value {
    /// Payload type tag.
    #[inline]
    pub fn kind(self) -> PayloadKind {
        match self {
            Value::U8(_) => PayloadKind::U8,
            Value::U16(_) => PayloadKind::U16,
            Value::I32(_) => PayloadKind::I32,
        }
    }
}

/// One request or response packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Packet {
    /// Command id (echoed in responses).
    pub command_id: u8,
    /// Update flag on requests, payload tag on responses.
    pub control: u8,
    /// Raw payload bytes.
    pub payload: [u8; PAYLOAD_SIZE],
}

impl Packet {
    /// Create a packet with a zero payload.
    pub const fn new(command_id: u8, control: u8) -> Self {
        Self {
            command_id,
            control,
            payload: [0; PAYLOAD_SIZE],
        }
    }

    /// Decode from exactly one packet of bytes.
    pub fn from_bytes(bytes: &[u8; PACKET_SIZE]) -> Self {
        let mut payload = [0; PAYLOAD_SIZE];
        payload.copy_from_slice(&bytes[2..]);
        Self {
            command_id: bytes[0],
            control: bytes[1],
            payload,
        }
    }

    /// Decode from a buffer holding at least one packet; trailing bytes
    /// (endpoint padding) are ignored.
    pub fn decode(bytes: &[u8]) -> Result<Self, ProtocolError> {
        let head = bytes
            .get(..PACKET_SIZE)
            .ok_or(ProtocolError::ShortPacket {
                expected: PACKET_SIZE,
                actual: bytes.len(),
            })?;
        let mut buf = [0; PACKET_SIZE];
        buf.copy_from_slice(head);
        Ok(Self::from_bytes(&buf))
    }

    /// Encode to wire bytes.
    pub fn to_bytes(&self) -> [u8; PACKET_SIZE] {
        let mut bytes = [0; PACKET_SIZE];
        bytes[0] = self.command_id;
        bytes[1] = self.control;
        bytes[2..].copy_from_slice(&self.payload);
        bytes
    }

    /// Payload read as `u8`.
    #[inline]
    pub fn payload_u8(&self) -> u8 {
        self.payload[0]
    }

    /// Payload read as little-endian `u16`.
    #[inline]
    pub fn payload_u16(&self) -> u16 {
        u16::from_le_bytes([self.payload[0], self.payload[1]])
    }

    /// Payload read as little-endian `i32`.
    #[inline]
    pub fn payload_i32(&self) -> i32 {
        i32::from_le_bytes(self.payload)
    }

    /// Write a value into the payload prefix without touching the tag.
    pub fn write_payload(&mut self, value: Value) {
        match value {
            Value::U8(v) => self.payload[0] = v,
            Value::U16(v) => self.payload[..2].copy_from_slice(&v.to_le_bytes()),
            Value::I32(v) => self.payload = v.to_le_bytes(),
        }
    }

    /// Write a value and tag the control byte with its type.
    pub fn set_value(&mut self, value: Value) {
        self.control = value.kind() as u8;
        self.write_payload(value);
    }

    /// Read the payload according to the control byte's type tag.
    pub fn value(&self) -> Result<Value, ProtocolError> {
        Ok(match PayloadKind::try_from(self.control)? {
            PayloadKind::U8 => Value::U8(self.payload_u8()),
            PayloadKind::U16 => Value::U16(self.payload_u16()),
            PayloadKind::I32 => Value::I32(self.payload_i32()),
        })
    }
}
