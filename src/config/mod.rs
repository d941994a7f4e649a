//! Configuration module for simple-step.
//!
//! Provides the step timer parameters, the pure pulse-rate math derived from
//! them, and the power-on device configuration, loadable from TOML files
//! (with `std` feature) or built in code.

mod device;
pub mod timing;
#[cfg(feature = "std")]
mod loader;
mod validation;

pub use device::{DeviceConfig, StartupConfig, StopPolarity, DEFAULT_TRAVEL_VELOCITY};
pub use timing::{TimerConfig, VelocityLimits, VALID_PRESCALERS};
pub use validation::validate_config;

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};
