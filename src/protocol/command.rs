//! Command table.
//!
//! Ids and payload types are fixed by the wire protocol. Setters carry the
//! raw request value; range checks and clamping happen when the command is
//! executed, so an invalid value is ignored rather than rejected at decode.

use super::packet::{Packet, PayloadKind, Update, Value};

/// Fixed reply of the `Test` command.
pub const TEST_REPLY: u8 = 1;

/// Command identifiers.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CommandId {
    /// Read the position.
    GetPosition = 0,
    /// Write the position setpoint.
    SetPositionSetpoint = 1,
    /// Read the position setpoint.
    GetPositionSetpoint = 2,
    /// Write the velocity setpoint (clamped to the maximum).
    SetVelocitySetpoint = 3,
    /// Read the velocity setpoint.
    GetVelocitySetpoint = 4,
    /// Read the velocity loaded into the step generator.
    GetVelocity = 5,
    /// Write the velocity-mode direction.
    SetDirectionSetpoint = 6,
    /// Read the velocity-mode direction.
    GetDirectionSetpoint = 7,
    /// Write the operating mode.
    SetMode = 8,
    /// Read the operating mode.
    GetMode = 9,
    /// Write the position-mode travel velocity (clamped to the maximum).
    SetTravelVelocity = 10,
    /// Read the position-mode travel velocity.
    GetTravelVelocity = 11,
    /// Read `setpoint - position`.
    GetPositionError = 12,
    /// Shift position and setpoint by minus the payload.
    SetZeroPosition = 13,
    /// Read the maximum velocity.
    GetMaxVelocity = 14,
    /// Read the minimum velocity.
    GetMinVelocity = 15,
    /// Read the run status.
    GetStatus = 16,
    /// Write the run status.
    SetStatus = 17,
    /// Read the direction loaded into the step generator.
    GetDirection = 18,
    /// Write the motor enable line.
    SetEnable = 19,
    /// Read the motor enable line.
    GetEnable = 20,
    /// Drive one general-purpose output high.
    SetDioHigh = 21,
    /// Drive one general-purpose output low.
    SetDioLow = 22,
    /// Read the stop interlock flag.
    GetInterlock = 23,
    /// Write the stop interlock flag.
    SetInterlock = 24,
    /// Restart the device.
    DeviceReset = 200,
    /// Restart into the bootloader.
    BootloaderMode = 201,
    /// Diagnostic echo.
    Test = 251,
}

impl CommandId {
    /// Every defined command.
    pub const ALL: [CommandId; 28] = [
        CommandId::GetPosition,
        CommandId::SetPositionSetpoint,
        CommandId::GetPositionSetpoint,
        CommandId::SetVelocitySetpoint,
        CommandId::GetVelocitySetpoint,
        CommandId::GetVelocity,
        CommandId::SetDirectionSetpoint,
        CommandId::GetDirectionSetpoint,
        CommandId::SetMode,
        CommandId::GetMode,
        CommandId::SetTravelVelocity,
        CommandId::GetTravelVelocity,
        CommandId::GetPositionError,
        CommandId::SetZeroPosition,
        CommandId::GetMaxVelocity,
        CommandId::GetMinVelocity,
        CommandId::GetStatus,
        CommandId::SetStatus,
        CommandId::GetDirection,
        CommandId::SetEnable,
        CommandId::GetEnable,
        CommandId::SetDioHigh,
        CommandId::SetDioLow,
        CommandId::GetInterlock,
        CommandId::SetInterlock,
        CommandId::DeviceReset,
        CommandId::BootloaderMode,
        CommandId::Test,
    ];

    /// Wire id.
    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Payload type of the response; `None` for commands whose response
    /// carries only the echoed id.
    pub fn response_kind(self) -> Option<PayloadKind> {
        use CommandId::*;
        match self {
            GetPosition | SetPositionSetpoint | GetPositionSetpoint | GetPositionError
            | SetZeroPosition => Some(PayloadKind::I32),
            SetVelocitySetpoint | GetVelocitySetpoint | GetVelocity | SetTravelVelocity
            | GetTravelVelocity | GetMaxVelocity | GetMinVelocity => Some(PayloadKind::U16),
            SetDirectionSetpoint | GetDirectionSetpoint | SetMode | GetMode | GetStatus
            | SetStatus | GetDirection | SetEnable | GetEnable | SetDioHigh | SetDioLow
            | GetInterlock | SetInterlock | Test => Some(PayloadKind::U8),
            DeviceReset | BootloaderMode => None,
        }
    }
}

impl TryFrom<u8> for CommandId {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        CommandId::ALL
            .iter()
            .copied()
            .find(|id| id.as_u8() == value)
            .ok_or(value)
    }
}

/// A decoded request.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// See [`CommandId::GetPosition`].
    GetPosition,
    /// See [`CommandId::SetPositionSetpoint`].
    SetPositionSetpoint(i32),
    /// See [`CommandId::GetPositionSetpoint`].
    GetPositionSetpoint,
    /// See [`CommandId::SetVelocitySetpoint`].
    SetVelocitySetpoint(u16),
    /// See [`CommandId::GetVelocitySetpoint`].
    GetVelocitySetpoint,
    /// See [`CommandId::GetVelocity`].
    GetVelocity,
    /// See [`CommandId::SetDirectionSetpoint`].
    SetDirectionSetpoint(u8),
    /// See [`CommandId::GetDirectionSetpoint`].
    GetDirectionSetpoint,
    /// See [`CommandId::SetMode`].
    SetMode(u8),
    /// See [`CommandId::GetMode`].
    GetMode,
    /// See [`CommandId::SetTravelVelocity`].
    SetTravelVelocity(u16),
    /// See [`CommandId::GetTravelVelocity`].
    GetTravelVelocity,
    /// See [`CommandId::GetPositionError`].
    GetPositionError,
    /// See [`CommandId::SetZeroPosition`].
    SetZeroPosition(i32),
    /// See [`CommandId::GetMaxVelocity`].
    GetMaxVelocity,
    /// See [`CommandId::GetMinVelocity`].
    GetMinVelocity,
    /// See [`CommandId::GetStatus`].
    GetStatus,
    /// See [`CommandId::SetStatus`].
    SetStatus(u8),
    /// See [`CommandId::GetDirection`].
    GetDirection,
    /// See [`CommandId::SetEnable`].
    SetEnable(u8),
    /// See [`CommandId::GetEnable`].
    GetEnable,
    /// See [`CommandId::SetDioHigh`].
    SetDioHigh(u8),
    /// See [`CommandId::SetDioLow`].
    SetDioLow(u8),
    /// See [`CommandId::GetInterlock`].
    GetInterlock,
    /// See [`CommandId::SetInterlock`].
    SetInterlock(u8),
    /// See [`CommandId::DeviceReset`].
    DeviceReset,
    /// See [`CommandId::BootloaderMode`].
    BootloaderMode,
    /// See [`CommandId::Test`].
    Test,
}

impl Command {
    /// Decode a request; `None` for an unknown command id.
    pub fn decode(packet: &Packet) -> Option<Self> {
        use Command as C;
        let id = CommandId::try_from(packet.command_id).ok()?;
        Some(match id {
            CommandId::GetPosition => C::GetPosition,
            CommandId::SetPositionSetpoint => C::SetPositionSetpoint(packet.payload_i32()),
            CommandId::GetPositionSetpoint => C::GetPositionSetpoint,
            CommandId::SetVelocitySetpoint => C::SetVelocitySetpoint(packet.payload_u16()),
            CommandId::GetVelocitySetpoint => C::GetVelocitySetpoint,
            CommandId::GetVelocity => C::GetVelocity,
            CommandId::SetDirectionSetpoint => C::SetDirectionSetpoint(packet.payload_u8()),
            CommandId::GetDirectionSetpoint => C::GetDirectionSetpoint,
            CommandId::SetMode => C::SetMode(packet.payload_u8()),
            CommandId::GetMode => C::GetMode,
            CommandId::SetTravelVelocity => C::SetTravelVelocity(packet.payload_u16()),
            CommandId::GetTravelVelocity => C::GetTravelVelocity,
            CommandId::GetPositionError => C::GetPositionError,
            CommandId::SetZeroPosition => C::SetZeroPosition(packet.payload_i32()),
            CommandId::GetMaxVelocity => C::GetMaxVelocity,
            CommandId::GetMinVelocity => C::GetMinVelocity,
            CommandId::GetStatus => C::GetStatus,
            CommandId::SetStatus => C::SetStatus(packet.payload_u8()),
            CommandId::GetDirection => C::GetDirection,
            CommandId::SetEnable => C::SetEnable(packet.payload_u8()),
            CommandId::GetEnable => C::GetEnable,
            CommandId::SetDioHigh => C::SetDioHigh(packet.payload_u8()),
            CommandId::SetDioLow => C::SetDioLow(packet.payload_u8()),
            CommandId::GetInterlock => C::GetInterlock,
            CommandId::SetInterlock => C::SetInterlock(packet.payload_u8()),
            CommandId::DeviceReset => C::DeviceReset,
            CommandId::BootloaderMode => C::BootloaderMode,
            CommandId::Test => C::Test,
        })
    }

    /// Command id.
    pub fn id(&self) -> CommandId {
        use Command as C;
        match self {
            C::GetPosition => CommandId::GetPosition,
            C::SetPositionSetpoint(_) => CommandId::SetPositionSetpoint,
            C::GetPositionSetpoint => CommandId::GetPositionSetpoint,
            C::SetVelocitySetpoint(_) => CommandId::SetVelocitySetpoint,
            C::GetVelocitySetpoint => CommandId::GetVelocitySetpoint,
            C::GetVelocity => CommandId::GetVelocity,
            C::SetDirectionSetpoint(_) => CommandId::SetDirectionSetpoint,
            C::GetDirectionSetpoint => CommandId::GetDirectionSetpoint,
            C::SetMode(_) => CommandId::SetMode,
            C::GetMode => CommandId::GetMode,
            C::SetTravelVelocity(_) => CommandId::SetTravelVelocity,
            C::GetTravelVelocity => CommandId::GetTravelVelocity,
            C::GetPositionError => CommandId::GetPositionError,
            C::SetZeroPosition(_) => CommandId::SetZeroPosition,
            C::GetMaxVelocity => CommandId::GetMaxVelocity,
            C::GetMinVelocity => CommandId::GetMinVelocity,
            C::GetStatus => CommandId::GetStatus,
            C::SetStatus(_) => CommandId::SetStatus,
            C::GetDirection => CommandId::GetDirection,
            C::SetEnable(_) => CommandId::SetEnable,
            C::GetEnable => CommandId::GetEnable,
            C::SetDioHigh(_) => CommandId::SetDioHigh,
            C::SetDioLow(_) => CommandId::SetDioLow,
            C::GetInterlock => CommandId::GetInterlock,
            C::SetInterlock(_) => CommandId::SetInterlock,
            C::DeviceReset => CommandId::DeviceReset,
            C::BootloaderMode => CommandId::BootloaderMode,
            C::Test => CommandId::Test,
        }
    }

    /// Request argument, if the command carries one.
    pub fn argument(&self) -> Option<Value> {
        use Command as C;
        match *self {
            C::SetPositionSetpoint(v) | C::SetZeroPosition(v) => Some(Value::I32(v)),
            C::SetVelocitySetpoint(v) | C::SetTravelVelocity(v) => Some(Value::U16(v)),
            C::SetDirectionSetpoint(v)
            | C::SetMode(v)
            | C::SetStatus(v)
            | C::SetEnable(v)
            | C::SetDioHigh(v)
            | C::SetDioLow(v)
            | C::SetInterlock(v) => Some(Value::U8(v)),
            _ => None,
        }
    }

    /// Encode as a request packet.
    pub fn encode(&self, update: Update) -> Packet {
        let mut packet = Packet::new(self.id().as_u8(), update.control());
        if let Some(value) = self.argument() {
            packet.write_payload(value);
        }
        packet
    }
}
