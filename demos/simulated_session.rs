//! Simulated host session.
//!
//! Builds a device on in-memory pins and a software step timer, then drives
//! it through the host client the way a bench script would: a positioning
//! move, a velocity run and a full status readout.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use simple_step::transport::Loopback;
use simple_step::{Client, Device, DeviceConfig, Direction, Result, StepTimer};

/// Output pin that only remembers its level.
struct SimPin {
    state: bool,
}

impl SimPin {
    fn new() -> Self {
        Self { state: false }
    }
}

impl ErrorType for SimPin {
    type Error = Infallible;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> core::result::Result<(), Self::Error> {
        self.state = false;
        Ok(())
    }

    fn set_high(&mut self) -> core::result::Result<(), Self::Error> {
        self.state = true;
        Ok(())
    }
}

/// Stop input wired to nothing (pulled up, never asserted).
struct PulledUp;

impl ErrorType for PulledUp {
    type Error = Infallible;
}

impl InputPin for PulledUp {
    fn is_high(&mut self) -> core::result::Result<bool, Self::Error> {
        Ok(true)
    }

    fn is_low(&mut self) -> core::result::Result<bool, Self::Error> {
        Ok(false)
    }
}

/// Step timer that prints what it is programmed with.
struct SimTimer;

impl StepTimer for SimTimer {
    fn set_period(&mut self, top: u16, compare: u16) {
        println!("  timer: top={} compare={}", top, compare);
    }

    fn set_output_connected(&mut self, connected: bool) {
        println!("  timer: output {}", if connected { "connected" } else { "disconnected" });
    }
}

fn main() -> Result<()> {
    println!("=== simple-step simulated session ===\n");

    let device = Device::builder()
        .config(DeviceConfig::default())
        .timer(SimTimer)
        .dir_pin(SimPin::new())
        .enable_pin(SimPin::new())
        .trigger_pin(SimPin::new())
        .dio_pins(core::array::from_fn(|_| SimPin::new()))
        .stop_pin(PulledUp)
        .build()?;

    let limits = device.limits();
    println!("velocity range: {}..{} steps/s\n", limits.min, limits.max);

    let mut client = Client::new(Loopback::new(&device));

    println!("move to 200 at 4000 steps/s:");
    client.begin_move_to(200, Some(4000))?;
    let mut ticks = 0u32;
    client.wait_for_arrival(|| {
        // Stands in for the step timer interrupt.
        device.on_step_interrupt();
        ticks += 1;
    })?;
    println!("  arrived at {} after {} polls\n", client.position()?, ticks);

    println!("run at 1500 steps/s, negative:");
    client.set_velocity_and_direction(1500, Direction::Negative)?;
    for _ in 0..40 {
        device.on_step_interrupt();
    }
    client.stop()?;
    println!();

    println!("{}", client.status_report()?);

    Ok(())
}
