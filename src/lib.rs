//! # simple-step
//!
//! Core of a single-axis stepper-motor controller driven over a fixed 6-byte
//! binary command protocol.
//!
//! ## Features
//!
//! - **Timer-driven stepping**: one step per hardware timer period, period
//!   derived from the commanded velocity
//! - **Position and velocity modes**: travel to a setpoint and stop exactly on
//!   it, or run continuously
//! - **Stop interlock**: an external input stops motion and refuses to run
//!   while asserted
//! - **embedded-hal 1.0**: `OutputPin`/`InputPin` for every line, a small
//!   [`StepTimer`] trait for the step timer
//! - **no_std compatible**: all state statically sized, critical sections via
//!   `critical-section`
//! - **Host client**: typed API over the same packet format
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use simple_step::{Device, DeviceConfig, Server};
//!
//! let device = Device::builder()
//!     .config(DeviceConfig::default())
//!     .timer(step_timer)
//!     .dir_pin(dir)
//!     .enable_pin(enable)
//!     .trigger_pin(trigger)
//!     .dio_pins(dio)
//!     .stop_pin(stop)
//!     .build()?;
//!
//! // Step timer ISR:  device.on_step_interrupt();
//! // Stop input ISR:  device.on_stop_interrupt();
//!
//! let mut server = Server::new();
//! loop {
//!     server.poll(&device, &mut usb_pipe, &mut system)?;
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables TOML configuration files and `std::error::Error`
//! - `defmt`: Enables defmt logging for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

// Must come first so the logging macros are visible to every module
#[macro_use]
mod fmt;

// Core modules
pub mod client;
pub mod config;
pub mod device;
pub mod error;
pub mod motion;
pub mod protocol;
pub mod pulse;
pub mod safety;
pub mod state;
pub mod transport;

// Re-exports for ergonomic API
pub use client::{Client, StatusReport};
pub use config::{validate_config, DeviceConfig, TimerConfig, VelocityLimits};
pub use device::{Device, DeviceBuilder, Disposition, ResetKind};
pub use error::{Error, Result};
pub use protocol::{Command, CommandId, Packet, Update, Value};
pub use pulse::{StepOutcome, StepTimer};
pub use state::{Direction, Mode, RunStatus, Switch, SystemState};
pub use transport::{Exchange, Loopback, PacketPipe, Served, Server, SystemControl};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};
