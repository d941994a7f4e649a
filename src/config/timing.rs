//! Step timer configuration and pulse-rate math.
//!
//! The step timer runs in fast-PWM mode: it counts from zero to `top` and
//! emits one step pulse per period, so
//! `velocity = clock / (prescaler * (top + 1))` steps per second.
//! Lower `top` means faster pulses.

use libm::{ceil, floor, round};
use serde::Deserialize;

/// Prescalers the step timer hardware can divide its clock by.
pub const VALID_PRESCALERS: [u16; 5] = [1, 8, 64, 256, 1024];

/// Step timer parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TimerConfig {
    /// Timer input clock in Hz (before the prescaler).
    #[serde(default = "default_clock_hz")]
    pub clock_hz: u32,

    /// Clock prescaler.
    #[serde(default = "default_prescaler")]
    pub prescaler: u16,

    /// Smallest allowed top (highest pulse rate).
    #[serde(default = "default_top_min")]
    pub top_min: u16,

    /// Largest allowed top (lowest pulse rate).
    #[serde(default = "default_top_max")]
    pub top_max: u16,
}

fn default_clock_hz() -> u32 {
    8_000_000
}

fn default_prescaler() -> u16 {
    8
}

fn default_top_min() -> u16 {
    19
}

fn default_top_max() -> u16 {
    u16::MAX
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            clock_hz: default_clock_hz(),
            prescaler: default_prescaler(),
            top_min: default_top_min(),
            top_max: default_top_max(),
        }
    }
}

impl TimerConfig {
    /// Prescaled timer tick rate in Hz.
    #[inline]
    fn tick_hz(&self) -> f64 {
        self.clock_hz as f64 / self.prescaler as f64
    }

    /// Highest pulse rate, reached at `top_min`, without saturation.
    pub fn max_velocity_raw(&self) -> u32 {
        floor(self.tick_hz() / (self.top_min as f64 + 1.0)) as u32
    }

    /// Maximum velocity in steps/sec.
    ///
    /// Saturates at `u16::MAX`; validated configurations never saturate.
    pub fn max_velocity(&self) -> u16 {
        self.max_velocity_raw().min(u16::MAX as u32) as u16
    }

    /// Minimum velocity in steps/sec.
    ///
    /// Rounded up so that every velocity at or above it maps to a top
    /// no greater than `top_max`.
    pub fn min_velocity(&self) -> u16 {
        let vel = ceil(self.tick_hz() / (self.top_max as f64 + 1.0));
        vel.min(u16::MAX as f64) as u16
    }

    /// Timer top for a velocity, clamped to `[top_min, top_max]`.
    ///
    /// Returns `None` for a zero velocity, which has no finite period.
    pub fn timer_top(&self, velocity: u16) -> Option<u16> {
        if velocity == 0 {
            return None;
        }
        let top = round(self.tick_hz() / velocity as f64) - 1.0;
        let top = top.max(self.top_min as f64).min(self.top_max as f64);
        Some(top as u16)
    }

    /// Check if the prescaler is supported by the timer.
    #[inline]
    pub fn has_valid_prescaler(&self) -> bool {
        VALID_PRESCALERS.contains(&self.prescaler)
    }
}

/// Velocity bounds derived once from the timer configuration.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VelocityLimits {
    /// Lowest velocity the timer can produce (steps/sec).
    pub min: u16,
    /// Highest velocity the timer can produce (steps/sec).
    pub max: u16,
}

impl VelocityLimits {
    /// Derive the limits from a timer configuration.
    pub fn from_timer(timer: &TimerConfig) -> Self {
        Self {
            min: timer.min_velocity(),
            max: timer.max_velocity(),
        }
    }

    /// Clamp a requested velocity to the maximum.
    #[inline]
    pub fn clamp(&self, velocity: u16) -> u16 {
        velocity.min(self.max)
    }

    /// Whether a velocity is high enough to be run rather than treated as stopped.
    #[inline]
    pub fn is_runnable(&self, velocity: u16) -> bool {
        velocity >= self.min
    }
}
