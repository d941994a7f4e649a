//! Hardware and state owned together behind the device's critical section.

use embedded_hal::digital::{InputPin, OutputPin};

use crate::config::VelocityLimits;
use crate::motion::{plan, MotionTarget};
use crate::pulse::{PulseGenerator, StepOutcome, StepTimer};
use crate::safety::{trip, StopInput};
use crate::state::SystemState;

use super::outputs::AuxOutputs;

/// Everything the command loop and both interrupt handlers touch.
pub(crate) struct Engine<TIMER, PIN, STOP>
where
    TIMER: StepTimer,
    PIN: OutputPin,
    STOP: InputPin,
{
    pub(crate) state: SystemState,
    pub(crate) pulse: PulseGenerator<TIMER, PIN>,
    pub(crate) outputs: AuxOutputs<PIN>,
    pub(crate) stop: StopInput<STOP>,
}

impl<TIMER, PIN, STOP> Engine<TIMER, PIN, STOP>
where
    TIMER: StepTimer,
    PIN: OutputPin,
    STOP: InputPin,
{
    /// Re-plan the active mode and load the result into the hardware.
    pub(crate) fn update(&mut self, limits: &VelocityLimits) -> MotionTarget {
        let target = plan(&self.state, limits);
        self.load(target);
        target
    }

    /// Load a motion target: output gate, trigger line, direction line and
    /// timer period, then record what is running.
    fn load(&mut self, target: MotionTarget) {
        self.pulse.set_output_enabled(target.is_moving());

        if let Some(level) = target.trigger {
            if self.outputs.set_trigger(level).is_err() {
                warn!("trigger line write failed");
            }
        }

        if self.pulse.set_direction(target.direction).is_err() {
            warn!("direction line write failed");
        }
        self.pulse.configure_pulse_rate(target.velocity);

        self.state.direction = target.direction;
        self.state.velocity = target.velocity;
    }

    /// Step interrupt body.
    pub(crate) fn step(&mut self) -> StepOutcome {
        let outcome = self.pulse.on_step(&mut self.state);
        if outcome == StepOutcome::Arrived {
            debug!("arrived at {}", self.state.position);
        }
        outcome
    }

    /// Stop event: trip the interlock and cut the outputs right away.
    pub(crate) fn stop_event(&mut self, limits: &VelocityLimits) -> bool {
        if !trip(&mut self.state) {
            return false;
        }
        info!("stop input tripped at {}", self.state.position);
        self.update(limits);
        true
    }

    /// Sample the stop input, but only when the interlock would honor it.
    pub(crate) fn interlock_asserted(&mut self) -> bool {
        self.state.interlock.is_enabled() && self.stop.is_asserted()
    }
}
