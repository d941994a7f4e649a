//! Command execution against the device core.
//!
//! Each command either reads state, runs a bounded setter or requests a
//! reset. Setters clamp numeric values and ignore enumeration values they do
//! not recognise; the response always carries the resulting value so the
//! host can tell a refused write from an accepted one.

use embedded_hal::digital::{InputPin, OutputPin};

use crate::config::VelocityLimits;
use crate::protocol::{Command, Packet, PayloadKind, Value, TEST_REPLY};
use crate::pulse::StepTimer;
use crate::safety::{permits_interlock, permits_status};
use crate::state::{Direction, Mode, RunStatus, Switch};

use super::engine::Engine;

/// Kind of restart requested by the host.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetKind {
    /// Plain restart.
    Restart,
    /// Restart into the firmware loader.
    Bootloader,
}

/// What the caller must do after a command ran.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Send the response.
    Respond,
    /// Send the response, then restart.
    Reset(ResetKind),
}

impl<TIMER, PIN, STOP> Engine<TIMER, PIN, STOP>
where
    TIMER: StepTimer,
    PIN: OutputPin,
    STOP: InputPin,
{
    /// Run one command and write its result into `response`.
    ///
    /// `response` is only written where the command defines a result; the
    /// caller sets the echoed id.
    pub(crate) fn execute(
        &mut self,
        command: Command,
        limits: &VelocityLimits,
        response: &mut Packet,
    ) -> Disposition {
        let value = match command {
            Command::GetPosition => Value::I32(self.state.position),

            Command::SetPositionSetpoint(setpoint) => {
                self.state.position_params.setpoint = setpoint;
                Value::I32(setpoint)
            }

            Command::GetPositionSetpoint => Value::I32(self.state.position_params.setpoint),

            Command::SetVelocitySetpoint(velocity) => {
                self.state.velocity_params.setpoint = limits.clamp(velocity);
                Value::U16(self.state.velocity_params.setpoint)
            }

            Command::GetVelocitySetpoint => Value::U16(self.state.velocity_params.setpoint),

            Command::GetVelocity => Value::U16(self.state.velocity),

            Command::SetDirectionSetpoint(raw) => {
                match Direction::try_from(raw) {
                    Ok(direction) => self.state.velocity_params.direction = direction,
                    Err(raw) => debug!("ignored direction {}", raw),
                }
                Value::U8(self.state.velocity_params.direction.as_u8())
            }

            Command::GetDirectionSetpoint => {
                Value::U8(self.state.velocity_params.direction.as_u8())
            }

            Command::SetMode(raw) => {
                match Mode::try_from(raw) {
                    Ok(mode) => self.state.mode = mode,
                    Err(raw) => debug!("ignored mode {}", raw),
                }
                Value::U8(self.state.mode.as_u8())
            }

            Command::GetMode => Value::U8(self.state.mode.as_u8()),

            Command::SetTravelVelocity(velocity) => {
                self.state.position_params.travel_velocity = limits.clamp(velocity);
                Value::U16(self.state.position_params.travel_velocity)
            }

            Command::GetTravelVelocity => Value::U16(self.state.position_params.travel_velocity),

            Command::GetPositionError => Value::I32(self.state.position_error()),

            Command::SetZeroPosition(offset) => {
                self.state.shift_origin(offset);
                Value::I32(0)
            }

            Command::GetMaxVelocity => Value::U16(limits.max),

            Command::GetMinVelocity => Value::U16(limits.min),

            Command::GetStatus => Value::U8(self.state.status.as_u8()),

            Command::SetStatus(raw) => {
                match RunStatus::try_from(raw) {
                    Ok(status) => {
                        let asserted = self.interlock_asserted();
                        if permits_status(&self.state, status, asserted) {
                            self.state.status = status;
                        } else {
                            info!("run refused, stop input asserted");
                        }
                    }
                    Err(raw) => debug!("ignored status {}", raw),
                }
                Value::U8(self.state.status.as_u8())
            }

            Command::GetDirection => Value::U8(self.state.direction.as_u8()),

            Command::SetEnable(raw) => {
                match Switch::try_from(raw) {
                    Ok(enable) => {
                        if self.outputs.set_enable(enable.is_enabled()).is_err() {
                            warn!("enable line write failed");
                        }
                        self.state.enable = enable;
                    }
                    Err(raw) => debug!("ignored enable {}", raw),
                }
                Value::U8(self.state.enable.as_u8())
            }

            Command::GetEnable => Value::U8(self.state.enable.as_u8()),

            Command::SetDioHigh(index) | Command::SetDioLow(index) => {
                let high = matches!(command, Command::SetDioHigh(_));
                match self.outputs.set_dio(index, high) {
                    Ok(true) => {}
                    Ok(false) => debug!("ignored output index {}", index),
                    Err(_) => warn!("output {} write failed", index),
                }
                // Tag only; the payload is left as it was.
                response.control = PayloadKind::U8 as u8;
                return Disposition::Respond;
            }

            Command::GetInterlock => Value::U8(self.state.interlock.as_u8()),

            Command::SetInterlock(raw) => {
                match Switch::try_from(raw) {
                    Ok(interlock) => {
                        let asserted = interlock.is_enabled() && self.stop.is_asserted();
                        if permits_interlock(interlock, asserted) {
                            self.state.interlock = interlock;
                        } else {
                            info!("interlock refused, stop input asserted");
                        }
                    }
                    Err(raw) => debug!("ignored interlock {}", raw),
                }
                Value::U8(self.state.interlock.as_u8())
            }

            Command::DeviceReset => {
                info!("restart requested");
                return Disposition::Reset(ResetKind::Restart);
            }

            Command::BootloaderMode => {
                info!("bootloader requested");
                return Disposition::Reset(ResetKind::Bootloader);
            }

            Command::Test => Value::U8(TEST_REPLY),
        };

        response.set_value(value);
        Disposition::Respond
    }
}
