//! Step-pulse generator.
//!
//! A free-running hardware timer produces one pulse per period. The period is
//! derived from the commanded velocity; the step and direction lines are
//! connected to the timer only while motion is wanted, so the timer cadence
//! (and its interrupt) keeps running while the output is idle.

use embedded_hal::digital::OutputPin;

use crate::config::TimerConfig;
use crate::error::{HardwareError, Result};
use crate::state::{Direction, Mode, SystemState};

/// Hardware timer driving the step line.
///
/// Implementations program a PWM timer whose overflow interrupt calls
/// [`Device::on_step_interrupt`](crate::device::Device::on_step_interrupt).
pub trait StepTimer {
    /// Load a new period. `compare` sets the pulse high time.
    ///
    /// Implementations should double-buffer `top` so the running period
    /// completes before the new one applies.
    fn set_period(&mut self, top: u16, compare: u16);

    /// Connect or disconnect the step and direction lines from the timer.
    fn set_output_connected(&mut self, connected: bool);
}

/// What a single step interrupt did.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Stopped or zero velocity; position unchanged.
    Idle,
    /// Position advanced by one step.
    Stepped,
    /// Position advanced onto the position-mode setpoint; motion halted.
    Arrived,
}

/// Advance the state by one step period.
///
/// Moves `position` by one step in the current direction while running with
/// a non-zero velocity. In position mode, reaching the setpoint zeroes the
/// velocity so the next period produces no step. `status` is left as is.
pub fn advance(state: &mut SystemState) -> StepOutcome {
    if !state.is_running() || state.velocity == 0 {
        return StepOutcome::Idle;
    }

    state.position = state.position.wrapping_add(state.direction.sign());

    if state.mode == Mode::Position && state.position == state.position_params.setpoint {
        state.velocity = 0;
        return StepOutcome::Arrived;
    }

    StepOutcome::Stepped
}

/// Step-pulse generator over a [`StepTimer`] and a direction pin.
pub struct PulseGenerator<TIMER, PIN>
where
    TIMER: StepTimer,
    PIN: OutputPin,
{
    /// Step timer.
    timer: TIMER,

    /// DIR pin.
    dir_pin: PIN,

    /// Timer parameters.
    config: TimerConfig,

    /// Whether direction pin logic is inverted.
    invert_direction: bool,

    /// Top currently loaded into the timer.
    top: u16,

    /// Whether the step/direction lines are connected.
    output_enabled: bool,
}

impl<TIMER, PIN> PulseGenerator<TIMER, PIN>
where
    TIMER: StepTimer,
    PIN: OutputPin,
{
    /// Create a generator. Call [`init`](Self::init) before use.
    pub fn new(timer: TIMER, dir_pin: PIN, config: TimerConfig, invert_direction: bool) -> Self {
        Self {
            timer,
            dir_pin,
            config,
            invert_direction,
            top: config.top_max,
            output_enabled: false,
        }
    }

    /// Bring the hardware to its idle state: slowest period, output
    /// disconnected, direction line for `Positive`.
    pub fn init(&mut self) -> Result<()> {
        self.timer.set_output_connected(false);
        self.output_enabled = false;
        self.load_top(self.config.top_max);
        self.set_direction(Direction::Positive)
    }

    /// Program the period for a velocity and return the loaded top.
    ///
    /// A zero velocity has no period: the output is disabled and the timer
    /// keeps its current cadence.
    pub fn configure_pulse_rate(&mut self, velocity: u16) -> u16 {
        match self.config.timer_top(velocity) {
            Some(top) => self.load_top(top),
            None => self.set_output_enabled(false),
        }
        self.top
    }

    /// Connect or disconnect the step and direction lines.
    pub fn set_output_enabled(&mut self, enabled: bool) {
        if self.output_enabled != enabled {
            self.timer.set_output_connected(enabled);
            self.output_enabled = enabled;
        }
    }

    /// Drive the direction line.
    pub fn set_direction(&mut self, direction: Direction) -> Result<()> {
        let pin_high = match direction {
            Direction::Positive => self.invert_direction,
            Direction::Negative => !self.invert_direction,
        };

        if pin_high {
            self.dir_pin.set_high().map_err(|_| HardwareError::Pin)?;
        } else {
            self.dir_pin.set_low().map_err(|_| HardwareError::Pin)?;
        }
        Ok(())
    }

    /// Step interrupt body: advance the state and cut the output on arrival.
    pub fn on_step(&mut self, state: &mut SystemState) -> StepOutcome {
        let outcome = advance(state);
        if outcome == StepOutcome::Arrived {
            self.set_output_enabled(false);
        }
        outcome
    }

    /// Check if the step/direction lines are connected.
    #[inline]
    pub fn is_output_enabled(&self) -> bool {
        self.output_enabled
    }

    fn load_top(&mut self, top: u16) {
        self.timer.set_period(top, top / 2);
        self.top = top;
    }
}
