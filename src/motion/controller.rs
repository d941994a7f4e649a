//! Mode controller: turns the active setpoints into a velocity/direction
//! target with the run and minimum-velocity interlocks applied.
//!
//! Planning is pure; [`Device`](crate::device::Device) applies the result to
//! the hardware inside one critical section.

use crate::config::VelocityLimits;
use crate::state::{Direction, Mode, SystemState};

/// Velocity and direction to load into the step generator.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionTarget {
    /// Pulse rate in steps/sec; zero when motion is inhibited.
    pub velocity: u16,
    /// Direction line state.
    pub direction: Direction,
    /// Velocity-mode trigger line state; `None` leaves it untouched.
    pub trigger: Option<bool>,
}

impl MotionTarget {
    /// Whether the step output should be connected.
    #[inline]
    pub fn is_moving(&self) -> bool {
        self.velocity > 0
    }
}

/// Target for position mode.
///
/// Travels toward the setpoint at the travel velocity while running, away
/// from the setpoint, and with a travel velocity the timer can produce.
pub fn plan_position(state: &SystemState, limits: &VelocityLimits) -> MotionTarget {
    let error = state.position_error();
    let direction = Direction::toward(error);
    let travel = state.position_params.travel_velocity;

    let velocity = if error != 0 && state.is_running() && limits.is_runnable(travel) {
        travel
    } else {
        0
    };

    MotionTarget {
        velocity,
        direction,
        trigger: None,
    }
}

/// Target for velocity mode.
///
/// Runs at the velocity setpoint while running and the setpoint is one the
/// timer can produce; the trigger line follows the motion.
pub fn plan_velocity(state: &SystemState, limits: &VelocityLimits) -> MotionTarget {
    let params = state.velocity_params;
    let run = state.is_running() && limits.is_runnable(params.setpoint);

    MotionTarget {
        velocity: if run { params.setpoint } else { 0 },
        direction: params.direction,
        trigger: Some(run),
    }
}

/// Target for whichever mode is active.
pub fn plan(state: &SystemState, limits: &VelocityLimits) -> MotionTarget {
    match state.mode {
        Mode::Position => plan_position(state, limits),
        Mode::Velocity => plan_velocity(state, limits),
    }
}
