//! Transport module for simple-step.
//!
//! The packet transport and the reset sequencing are external collaborators.
//! This module defines the seams they plug into and the foreground command
//! task that drives a [`Device`] through them:
//!
//! - [`PacketPipe`]: device side, delivers requests and accepts responses
//! - [`SystemControl`]: persists the boot key and restarts the device
//! - [`Exchange`]: host side, one request out and one response back
//!
//! [`Loopback`] joins a host [`Exchange`] directly to an in-process device
//! for simulation and tests.

use embedded_hal::digital::{InputPin, OutputPin};

use crate::device::{Device, Disposition};
use crate::error::{Result, TransportError};
use crate::protocol::{Packet, PACKET_SIZE};
use crate::pulse::StepTimer;

pub use crate::device::ResetKind;

/// Value written to the boot-key location before a bootloader restart.
pub const BOOT_KEY: u32 = 0xAA55_AA55;

/// Device-side packet transport.
pub trait PacketPipe {
    /// Take the next request if one has arrived.
    ///
    /// Stall recovery and servicing the transport stack happen in here.
    fn poll_request(&mut self) -> core::result::Result<Option<[u8; PACKET_SIZE]>, TransportError>;

    /// Queue a response for the host.
    fn send_response(
        &mut self,
        packet: &[u8; PACKET_SIZE],
    ) -> core::result::Result<(), TransportError>;
}

/// Restart sequencing.
pub trait SystemControl {
    /// Persist a key checked by the bootloader after restart.
    fn write_boot_key(&mut self, key: u32);

    /// Restart the device. Does not return on hardware.
    fn reset(&mut self, kind: ResetKind);
}

/// Host-side link: send one request and wait for its response.
pub trait Exchange {
    /// Exchange one packet.
    fn exchange(
        &mut self,
        request: &[u8; PACKET_SIZE],
    ) -> core::result::Result<[u8; PACKET_SIZE], TransportError>;
}

/// Outcome of one [`Server::poll`].
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Served {
    /// No request was waiting.
    Idle,
    /// A request was answered.
    Handled,
    /// A reset request was answered and the reset issued.
    Reset(ResetKind),
}

/// Foreground command task.
///
/// Keeps the response buffer between requests: a request with an unknown id
/// is answered with the previous response's tag and payload.
#[derive(Debug, Default)]
pub struct Server {
    response: Packet,
}

impl Server {
    /// Create a server with a zeroed response buffer.
    pub const fn new() -> Self {
        Self {
            response: Packet::new(0, 0),
        }
    }

    /// Most recent response.
    pub fn last_response(&self) -> &Packet {
        &self.response
    }

    /// Serve at most one request.
    ///
    /// # Errors
    ///
    /// Returns the pipe's error if receiving or sending fails. A reset
    /// request is only carried out once its response was sent.
    pub fn poll<TIMER, PIN, STOP, PIPE, SYS>(
        &mut self,
        device: &Device<TIMER, PIN, STOP>,
        pipe: &mut PIPE,
        system: &mut SYS,
    ) -> Result<Served>
    where
        TIMER: StepTimer,
        PIN: OutputPin,
        STOP: InputPin,
        PIPE: PacketPipe,
        SYS: SystemControl,
    {
        let Some(bytes) = pipe.poll_request()? else {
            return Ok(Served::Idle);
        };

        let request = Packet::from_bytes(&bytes);
        let disposition = device.dispatch(&request, &mut self.response);
        pipe.send_response(&self.response.to_bytes())?;

        match disposition {
            Disposition::Respond => Ok(Served::Handled),
            Disposition::Reset(kind) => {
                if kind == ResetKind::Bootloader {
                    system.write_boot_key(BOOT_KEY);
                }
                system.reset(kind);
                Ok(Served::Reset(kind))
            }
        }
    }
}

/// In-process link from a host client straight to a device.
///
/// Reset requests are answered and recorded instead of carried out; see
/// [`take_reset`](Self::take_reset).
pub struct Loopback<'a, TIMER, PIN, STOP>
where
    TIMER: StepTimer,
    PIN: OutputPin,
    STOP: InputPin,
{
    device: &'a Device<TIMER, PIN, STOP>,
    response: Packet,
    reset: Option<ResetKind>,
}

impl<'a, TIMER, PIN, STOP> Loopback<'a, TIMER, PIN, STOP>
where
    TIMER: StepTimer,
    PIN: OutputPin,
    STOP: InputPin,
{
    /// Link to a device.
    pub fn new(device: &'a Device<TIMER, PIN, STOP>) -> Self {
        Self {
            device,
            response: Packet::default(),
            reset: None,
        }
    }

    /// Reset requested since the last call, if any.
    pub fn take_reset(&mut self) -> Option<ResetKind> {
        self.reset.take()
    }
}

impl<TIMER, PIN, STOP> Exchange for Loopback<'_, TIMER, PIN, STOP>
where
    TIMER: StepTimer,
    PIN: OutputPin,
    STOP: InputPin,
{
    fn exchange(
        &mut self,
        request: &[u8; PACKET_SIZE],
    ) -> core::result::Result<[u8; PACKET_SIZE], TransportError> {
        let request = Packet::from_bytes(request);
        if let Disposition::Reset(kind) = self.device.dispatch(&request, &mut self.response) {
            self.reset = Some(kind);
        }
        Ok(self.response.to_bytes())
    }
}
