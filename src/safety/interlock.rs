//! External stop input and interlock rules.

use embedded_hal::digital::InputPin;

use crate::config::StopPolarity;
use crate::state::{Mode, RunStatus, Switch, SystemState};

/// Stop input line with its configured polarity.
pub struct StopInput<STOP>
where
    STOP: InputPin,
{
    pin: STOP,
    polarity: StopPolarity,
}

impl<STOP> StopInput<STOP>
where
    STOP: InputPin,
{
    /// Wrap an input pin.
    pub fn new(pin: STOP, polarity: StopPolarity) -> Self {
        Self { pin, polarity }
    }

    /// Sample the stop condition.
    ///
    /// A pin that cannot be read counts as asserted.
    pub fn is_asserted(&mut self) -> bool {
        match self.pin.is_high() {
            Ok(high) => self.polarity.is_asserted(high),
            Err(_) => {
                warn!("stop input unreadable, treating as asserted");
                true
            }
        }
    }
}

/// Apply a stop event to the state.
///
/// With the interlock enabled: stops the run gate and retires the active
/// mode's in-motion target (position setpoint snaps to the current position,
/// velocity setpoint drops to zero). Returns whether the event was honored.
pub fn trip(state: &mut SystemState) -> bool {
    if !state.interlock.is_enabled() {
        return false;
    }

    state.status = RunStatus::Stopped;
    match state.mode {
        Mode::Position => state.position_params.setpoint = state.position,
        Mode::Velocity => state.velocity_params.setpoint = 0,
    }
    true
}

/// Whether a request to set `status` may be applied.
///
/// `Running` is refused while the interlock is enabled and the stop condition
/// is asserted; `Stopped` is always allowed.
pub fn permits_status(state: &SystemState, status: RunStatus, stop_asserted: bool) -> bool {
    !(status == RunStatus::Running && state.interlock.is_enabled() && stop_asserted)
}

/// Whether a request to set the interlock flag may be applied.
///
/// Enabling is refused while the stop condition is asserted, so the
/// interlock can never be armed in an already-tripped state.
pub fn permits_interlock(interlock: Switch, stop_asserted: bool) -> bool {
    !(interlock == Switch::Enabled && stop_asserted)
}
