//! Pulse module for simple-step.
//!
//! Provides the timer-driven step-pulse generator and the step interrupt logic.

mod generator;

pub use generator::{advance, PulseGenerator, StepOutcome, StepTimer};
