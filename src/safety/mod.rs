//! Safety module for simple-step.
//!
//! Provides the external stop input and the interlock rules applied by the
//! stop interrupt and the status/interlock setters.

mod interlock;

pub use crate::config::StopPolarity;
pub use interlock::{permits_interlock, permits_status, trip, StopInput};
