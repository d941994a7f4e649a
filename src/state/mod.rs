//! Shared system state.
//!
//! One [`SystemState`] record is mutated by the command loop, the step
//! interrupt and the stop interrupt; [`Shared`] provides the critical-section
//! discipline around it.

mod shared;
mod types;

pub use shared::Shared;
pub use types::{
    Direction, Mode, PositionParams, RunStatus, Switch, SystemState, VelocityParams,
};
