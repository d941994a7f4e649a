//! Configuration validation.

use crate::error::{ConfigError, Error, Result};

use super::timing::TimerConfig;
use super::DeviceConfig;

/// Validate a device configuration.
///
/// Checks:
/// - Timer clock is non-zero and the prescaler is supported
/// - Timer top range is non-empty and starts above zero
/// - Maximum velocity fits the 16-bit wire format
/// - Startup travel velocity does not exceed the maximum
pub fn validate_config(config: &DeviceConfig) -> Result<()> {
    validate_timer(&config.timer)?;

    let max = config.timer.max_velocity();
    if config.startup.travel_velocity > max {
        return Err(Error::Config(ConfigError::TravelVelocityOutOfRange {
            requested: config.startup.travel_velocity,
            max,
        }));
    }

    Ok(())
}

fn validate_timer(timer: &TimerConfig) -> Result<()> {
    if timer.clock_hz == 0 {
        return Err(Error::Config(ConfigError::InvalidClock(timer.clock_hz)));
    }

    if !timer.has_valid_prescaler() {
        return Err(Error::Config(ConfigError::InvalidPrescaler(timer.prescaler)));
    }

    // top == 0 would leave no room for the half-period compare value
    if timer.top_min == 0 || timer.top_min >= timer.top_max {
        return Err(Error::Config(ConfigError::InvalidTimerRange {
            min: timer.top_min,
            max: timer.top_max,
        }));
    }

    let max = timer.max_velocity_raw();
    if max > u16::MAX as u32 {
        return Err(Error::Config(ConfigError::VelocityOverflow(max)));
    }

    Ok(())
}
