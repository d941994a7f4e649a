//! Motion module for simple-step.
//!
//! Provides the per-mode motion target planning.

mod controller;

pub use controller::{plan, plan_position, plan_velocity, MotionTarget};
