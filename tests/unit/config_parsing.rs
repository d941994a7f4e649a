//! Unit tests for TOML configuration parsing.

use simple_step::config::{load_config, parse_config, StopPolarity, TimerConfig};
use simple_step::error::{ConfigError, Error};

/// Test loading a configuration file from disk.
#[test]
fn test_load_config_from_file() {
    let path = std::env::temp_dir().join(format!("simple_step_{}.toml", std::process::id()));
    std::fs::write(
        &path,
        r#"
stop_polarity = "active_high"

[startup]
travel_velocity = 2500
"#,
    )
    .expect("write temp config");

    let config = load_config(&path).expect("config loads");
    let _ = std::fs::remove_file(&path);

    assert_eq!(config.stop_polarity, StopPolarity::ActiveHigh);
    assert_eq!(config.startup.travel_velocity, 2500);
    assert!(config.startup.motor_enabled);
    assert_eq!(config.timer, TimerConfig::default());
}

/// Test a missing file reports an I/O error.
#[test]
fn test_load_config_missing_file() {
    let result = load_config("/nonexistent/simple_step.toml");
    assert!(matches!(result, Err(Error::Config(ConfigError::IoError(_)))));
}

/// Test partial timer sections keep the remaining defaults.
#[test]
fn test_partial_timer_section() {
    let config = parse_config(
        r#"
[timer]
top_max = 40000
"#,
    )
    .expect("config parses");

    assert_eq!(config.timer.clock_hz, 8_000_000);
    assert_eq!(config.timer.prescaler, 8);
    assert_eq!(config.timer.top_min, 19);
    assert_eq!(config.timer.top_max, 40_000);
    // 1 MHz / 40001, rounded up
    assert_eq!(config.velocity_limits().min, 25);
}

/// Test type errors surface as parse errors with a message.
#[test]
fn test_wrong_type_is_parse_error() {
    let result = parse_config("invert_direction = \"yes\"");
    match result {
        Err(Error::Config(ConfigError::ParseError(msg))) => assert!(!msg.is_empty()),
        other => panic!("expected parse error, got {:?}", other),
    }
}
