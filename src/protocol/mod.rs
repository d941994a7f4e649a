//! Protocol module for simple-step.
//!
//! Provides the fixed 6-byte packet format and the command table shared by
//! the device-side dispatcher and the host-side client.

mod command;
mod packet;

pub use command::{Command, CommandId, TEST_REPLY};
pub use packet::{
    Packet, PayloadKind, Update, Value, CTL_APPLY, CTL_NO_APPLY, PACKET_SIZE, PAYLOAD_SIZE,
};
