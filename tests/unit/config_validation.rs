//! Unit tests for configuration validation.

use simple_step::config::{validate_config, DeviceConfig, TimerConfig};
use simple_step::error::{ConfigError, Error};

/// Test validation of the default configuration.
#[test]
fn test_default_config_passes_validation() {
    assert!(validate_config(&DeviceConfig::default()).is_ok());
}

/// Test a zero clock is rejected.
#[test]
fn test_zero_clock() {
    let config = DeviceConfig {
        timer: TimerConfig {
            clock_hz: 0,
            ..TimerConfig::default()
        },
        ..DeviceConfig::default()
    };

    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidClock(0)))
    ));
}

/// Test a zero top_min is rejected.
#[test]
fn test_zero_top_min() {
    let config = DeviceConfig {
        timer: TimerConfig {
            top_min: 0,
            ..TimerConfig::default()
        },
        ..DeviceConfig::default()
    };

    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidTimerRange { min: 0, .. }))
    ));
}

/// Test every supported prescaler with a range that fits the wire width.
#[test]
fn test_supported_prescalers() {
    for prescaler in simple_step::config::VALID_PRESCALERS {
        let mut config = DeviceConfig {
            timer: TimerConfig {
                clock_hz: 16_000_000,
                prescaler,
                top_min: 999,
                top_max: u16::MAX,
            },
            ..DeviceConfig::default()
        };
        config.startup.travel_velocity = config.timer.max_velocity() / 2;

        assert!(validate_config(&config).is_ok(), "prescaler {}", prescaler);
    }
}

/// Test error messages are readable.
#[test]
fn test_error_display() {
    let err = Error::Config(ConfigError::InvalidPrescaler(3));
    assert_eq!(
        err.to_string(),
        "Configuration error: Invalid prescaler: 3. Valid values: 1, 8, 64, 256, 1024"
    );

    let err = Error::Config(ConfigError::MissingComponent("timer"));
    assert_eq!(err.to_string(), "Configuration error: timer is required");
}
