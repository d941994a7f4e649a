//! Device configuration - root configuration structure.

use serde::Deserialize;

use super::timing::{TimerConfig, VelocityLimits};

/// Travel velocity used in position mode until the host sets one.
pub const DEFAULT_TRAVEL_VELOCITY: u16 = 5000;

/// Which level of the stop input means "stop".
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopPolarity {
    /// Asserted when the input is low (falling edge triggers).
    #[default]
    ActiveLow,
    /// Asserted when the input is high (rising edge triggers).
    ActiveHigh,
}

impl StopPolarity {
    /// Whether a sampled input level means the stop condition is asserted.
    #[inline]
    pub fn is_asserted(self, input_high: bool) -> bool {
        match self {
            StopPolarity::ActiveLow => !input_high,
            StopPolarity::ActiveHigh => input_high,
        }
    }
}

/// Power-on values for the runtime state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct StartupConfig {
    /// Position-mode travel velocity in steps/sec.
    #[serde(default = "default_travel_velocity")]
    pub travel_velocity: u16,

    /// Drive the motor-enable line active at power-on.
    #[serde(default = "default_true")]
    pub motor_enabled: bool,

    /// Honor the stop input from power-on.
    #[serde(default)]
    pub interlock_enabled: bool,
}

fn default_travel_velocity() -> u16 {
    DEFAULT_TRAVEL_VELOCITY
}

fn default_true() -> bool {
    true
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            travel_velocity: DEFAULT_TRAVEL_VELOCITY,
            motor_enabled: true,
            interlock_enabled: false,
        }
    }
}

/// Root configuration structure from TOML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct DeviceConfig {
    /// Step timer parameters.
    #[serde(default)]
    pub timer: TimerConfig,

    /// Power-on state.
    #[serde(default)]
    pub startup: StartupConfig,

    /// Stop input polarity.
    #[serde(default)]
    pub stop_polarity: StopPolarity,

    /// Invert direction pin logic.
    #[serde(default)]
    pub invert_direction: bool,
}

impl DeviceConfig {
    /// Velocity bounds implied by the timer.
    #[inline]
    pub fn velocity_limits(&self) -> VelocityLimits {
        VelocityLimits::from_timer(&self.timer)
    }
}
