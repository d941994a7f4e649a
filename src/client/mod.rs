//! Host-side client for simple-step.
//!
//! [`Client`] speaks the packet protocol over any [`Exchange`] link. Every
//! response is checked against its request: the echoed command id must match
//! and the payload tag must be the one the command defines.
//!
//! ```rust,ignore
//! let mut client = Client::new(link);
//! client.begin_move_to(2000, None)?;
//! client.wait_for_arrival(|| std::thread::sleep(Duration::from_millis(100)))?;
//! println!("{}", client.status_report()?);
//! ```

mod report;

pub use report::StatusReport;

use crate::error::{ProtocolError, Result};
use crate::protocol::{Command, CommandId, Packet, PayloadKind, Update, Value};
use crate::state::{Direction, Mode, RunStatus, Switch};
use crate::transport::Exchange;

/// Typed command API over a host link.
pub struct Client<L>
where
    L: Exchange,
{
    link: L,
}

impl<L> Client<L>
where
    L: Exchange,
{
    /// Wrap a link.
    pub fn new(link: L) -> Self {
        Self { link }
    }

    /// Get the link mutably.
    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    /// Release the link.
    pub fn into_inner(self) -> L {
        self.link
    }

    /// Send one command and return the raw response.
    ///
    /// # Errors
    ///
    /// Returns a transport error, or `CommandMismatch` if the response does
    /// not echo the command id.
    pub fn send(&mut self, command: Command, update: Update) -> Result<Packet> {
        let request = command.encode(update);
        let response = Packet::from_bytes(&self.link.exchange(&request.to_bytes())?);

        if response.command_id != request.command_id {
            return Err(ProtocolError::CommandMismatch {
                expected: request.command_id,
                received: response.command_id,
            }
            .into());
        }
        Ok(response)
    }

    /// Send one command and return its typed result.
    ///
    /// # Errors
    ///
    /// As [`send`](Self::send), plus `UnexpectedPayload` if the response tag
    /// is not the command's result type.
    pub fn call(&mut self, command: Command, update: Update) -> Result<Value> {
        let response = self.send(command, update)?;
        let value = response.value()?;

        if Some(value.kind()) != command.id().response_kind() {
            return Err(ProtocolError::UnexpectedPayload {
                command: response.command_id,
                kind: response.control,
            }
            .into());
        }
        Ok(value)
    }

    fn call_u8(&mut self, command: Command, update: Update) -> Result<u8> {
        match self.call(command, update)? {
            Value::U8(v) => Ok(v),
            other => Err(unexpected(command.id(), other.kind())),
        }
    }

    fn call_u16(&mut self, command: Command, update: Update) -> Result<u16> {
        match self.call(command, update)? {
            Value::U16(v) => Ok(v),
            other => Err(unexpected(command.id(), other.kind())),
        }
    }

    fn call_i32(&mut self, command: Command, update: Update) -> Result<i32> {
        match self.call(command, update)? {
            Value::I32(v) => Ok(v),
            other => Err(unexpected(command.id(), other.kind())),
        }
    }

    fn call_enum<E>(&mut self, command: Command, update: Update) -> Result<E>
    where
        E: TryFrom<u8, Error = u8>,
    {
        let raw = self.call_u8(command, update)?;
        E::try_from(raw).map_err(|v| ProtocolError::InvalidValue(v).into())
    }

    fn get_u16(&mut self, command: Command) -> Result<u16> {
        self.call_u16(command, Update::Skip)
    }

    fn get_i32(&mut self, command: Command) -> Result<i32> {
        self.call_i32(command, Update::Skip)
    }

    fn get_enum<E>(&mut self, command: Command) -> Result<E>
    where
        E: TryFrom<u8, Error = u8>,
    {
        self.call_enum(command, Update::Skip)
    }

    // ------------------------------------------------------------------
    // Position mode

    /// Current position in steps.
    pub fn position(&mut self) -> Result<i32> {
        self.get_i32(Command::GetPosition)
    }

    /// Set the position setpoint; returns the stored setpoint.
    pub fn set_position_setpoint(&mut self, setpoint: i32) -> Result<i32> {
        self.call_i32(Command::SetPositionSetpoint(setpoint), Update::Apply)
    }

    /// Position setpoint.
    pub fn position_setpoint(&mut self) -> Result<i32> {
        self.get_i32(Command::GetPositionSetpoint)
    }

    /// Set the travel velocity; returns the stored (clamped) value.
    pub fn set_travel_velocity(&mut self, velocity: u16) -> Result<u16> {
        self.call_u16(Command::SetTravelVelocity(velocity), Update::Apply)
    }

    /// Travel velocity used in position mode.
    pub fn travel_velocity(&mut self) -> Result<u16> {
        self.get_u16(Command::GetTravelVelocity)
    }

    /// `setpoint - position`.
    pub fn position_error(&mut self) -> Result<i32> {
        self.get_i32(Command::GetPositionError)
    }

    /// Shift the origin so the current `offset` becomes zero.
    pub fn set_zero_position(&mut self, offset: i32) -> Result<i32> {
        self.call_i32(Command::SetZeroPosition(offset), Update::Apply)
    }

    // ------------------------------------------------------------------
    // Velocity mode

    /// Set the velocity setpoint; returns the stored (clamped) value.
    pub fn set_velocity_setpoint(&mut self, velocity: u16, update: Update) -> Result<u16> {
        self.call_u16(Command::SetVelocitySetpoint(velocity), update)
    }

    /// Velocity setpoint.
    pub fn velocity_setpoint(&mut self) -> Result<u16> {
        self.get_u16(Command::GetVelocitySetpoint)
    }

    /// Set the velocity-mode direction; returns the stored direction.
    pub fn set_direction_setpoint(
        &mut self,
        direction: Direction,
        update: Update,
    ) -> Result<Direction> {
        self.call_enum(Command::SetDirectionSetpoint(direction.as_u8()), update)
    }

    /// Velocity-mode direction.
    pub fn direction_setpoint(&mut self) -> Result<Direction> {
        self.get_enum(Command::GetDirectionSetpoint)
    }

    // ------------------------------------------------------------------
    // Live values and limits

    /// Velocity loaded into the step generator.
    pub fn velocity(&mut self) -> Result<u16> {
        self.get_u16(Command::GetVelocity)
    }

    /// Direction loaded into the step generator.
    pub fn direction(&mut self) -> Result<Direction> {
        self.get_enum(Command::GetDirection)
    }

    /// Highest velocity the device accepts.
    pub fn max_velocity(&mut self) -> Result<u16> {
        self.get_u16(Command::GetMaxVelocity)
    }

    /// Lowest velocity the device runs at.
    pub fn min_velocity(&mut self) -> Result<u16> {
        self.get_u16(Command::GetMinVelocity)
    }

    // ------------------------------------------------------------------
    // Mode, status and lines

    /// Set the operating mode; returns the active mode.
    pub fn set_mode(&mut self, mode: Mode) -> Result<Mode> {
        self.call_enum(Command::SetMode(mode.as_u8()), Update::Apply)
    }

    /// Operating mode.
    pub fn mode(&mut self) -> Result<Mode> {
        self.get_enum(Command::GetMode)
    }

    /// Set the run status; returns the resulting status, which stays
    /// `Stopped` while the stop interlock refuses to run.
    pub fn set_status(&mut self, status: RunStatus) -> Result<RunStatus> {
        self.call_enum(Command::SetStatus(status.as_u8()), Update::Apply)
    }

    /// Run status.
    pub fn status(&mut self) -> Result<RunStatus> {
        self.get_enum(Command::GetStatus)
    }

    /// Drive the motor enable line.
    pub fn set_enable(&mut self, enable: Switch) -> Result<Switch> {
        self.call_enum(Command::SetEnable(enable.as_u8()), Update::Apply)
    }

    /// Motor enable line state.
    pub fn enable_state(&mut self) -> Result<Switch> {
        self.get_enum(Command::GetEnable)
    }

    /// Drive general-purpose output `index` (0..8).
    pub fn set_dio(&mut self, index: u8, high: bool) -> Result<()> {
        let command = if high {
            Command::SetDioHigh(index)
        } else {
            Command::SetDioLow(index)
        };
        let response = self.send(command, Update::Apply)?;
        match PayloadKind::try_from(response.control)? {
            PayloadKind::U8 => Ok(()),
            other => Err(unexpected(command.id(), other)),
        }
    }

    /// Set the stop interlock flag; returns the resulting flag, which stays
    /// `Disabled` while the stop input is asserted.
    pub fn set_interlock(&mut self, interlock: Switch) -> Result<Switch> {
        self.call_enum(Command::SetInterlock(interlock.as_u8()), Update::Apply)
    }

    /// Stop interlock flag.
    pub fn interlock(&mut self) -> Result<Switch> {
        self.get_enum(Command::GetInterlock)
    }

    /// Diagnostic echo.
    pub fn test(&mut self) -> Result<u8> {
        self.call_u8(Command::Test, Update::Skip)
    }

    /// Restart the device. The link is unusable until it re-enumerates.
    pub fn reset_device(&mut self) -> Result<()> {
        self.send(Command::DeviceReset, Update::Skip).map(|_| ())
    }

    /// Restart the device into its bootloader.
    pub fn enter_bootloader(&mut self) -> Result<()> {
        self.send(Command::BootloaderMode, Update::Skip).map(|_| ())
    }

    // ------------------------------------------------------------------
    // Sequences

    /// Open the run gate.
    pub fn start(&mut self) -> Result<RunStatus> {
        self.set_status(RunStatus::Running)
    }

    /// Close the run gate.
    pub fn stop(&mut self) -> Result<RunStatus> {
        self.set_status(RunStatus::Stopped)
    }

    /// Enable the motor driver.
    pub fn enable(&mut self) -> Result<Switch> {
        self.set_enable(Switch::Enabled)
    }

    /// Disable the motor driver.
    pub fn disable(&mut self) -> Result<Switch> {
        self.set_enable(Switch::Disabled)
    }

    /// Start a move to an absolute position.
    ///
    /// Stops, switches to position mode, loads the travel velocity (half the
    /// maximum when `None`) and the setpoint, then starts.
    pub fn begin_move_to(&mut self, position: i32, travel: Option<u16>) -> Result<RunStatus> {
        self.stop()?;
        self.set_mode(Mode::Position)?;

        let travel = match travel {
            Some(v) => v,
            None => self.max_velocity()? / 2,
        };
        self.set_travel_velocity(travel)?;
        self.set_position_setpoint(position)?;
        self.start()
    }

    /// Start a move relative to the current position.
    pub fn begin_move_by(&mut self, delta: i32, travel: Option<u16>) -> Result<RunStatus> {
        let target = self.position()?.wrapping_add(delta);
        self.begin_move_to(target, travel)
    }

    /// Poll until the position error is zero, calling `idle` between polls,
    /// then stop.
    pub fn wait_for_arrival(&mut self, mut idle: impl FnMut()) -> Result<()> {
        while self.position_error()? != 0 {
            idle();
        }
        self.stop()?;
        Ok(())
    }

    /// Run continuously at `velocity` in `direction`, switching to velocity
    /// mode first if needed.
    ///
    /// The motor is stopped before a mode or direction change.
    pub fn set_velocity_and_direction(
        &mut self,
        velocity: u16,
        direction: Direction,
    ) -> Result<RunStatus> {
        if self.mode()? != Mode::Velocity {
            self.stop()?;
            self.set_mode(Mode::Velocity)?;
        }
        if self.direction_setpoint()? != direction {
            self.stop()?;
            self.set_direction_setpoint(direction, Update::Apply)?;
        }
        self.set_velocity_setpoint(velocity, Update::Apply)?;
        self.start()
    }

    /// Read every state value.
    pub fn status_report(&mut self) -> Result<StatusReport> {
        Ok(StatusReport {
            mode: self.mode()?,
            status: self.status()?,
            enable: self.enable_state()?,
            position: self.position()?,
            velocity: self.velocity()?,
            direction: self.direction()?,
            position_error: self.position_error()?,
            max_velocity: self.max_velocity()?,
            min_velocity: self.min_velocity()?,
            interlock: self.interlock()?,
            position_setpoint: self.position_setpoint()?,
            travel_velocity: self.travel_velocity()?,
            velocity_setpoint: self.velocity_setpoint()?,
            direction_setpoint: self.direction_setpoint()?,
        })
    }
}

fn unexpected(id: CommandId, kind: PayloadKind) -> crate::Error {
    ProtocolError::UnexpectedPayload {
        command: id.as_u8(),
        kind: kind as u8,
    }
    .into()
}
