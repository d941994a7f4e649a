//! Shared fakes for the integration tests.
//!
//! Pins and the step timer are backed by shared cells so a test can keep a
//! probe on each line after the hardware has been moved into the device.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use simple_step::device::DIO_COUNT;
use simple_step::protocol::{CommandId, Packet, Update, Value, PACKET_SIZE};
use simple_step::transport::{PacketPipe, ResetKind, SystemControl};
use simple_step::error::TransportError;
use simple_step::{Device, DeviceConfig, Disposition, StepOutcome, StepTimer};

/// Probe on one digital line.
#[derive(Debug, Clone, Default)]
pub struct Line(Rc<Cell<bool>>);

impl Line {
    pub fn high() -> Self {
        Self(Rc::new(Cell::new(true)))
    }

    pub fn is_high(&self) -> bool {
        self.0.get()
    }

    pub fn set(&self, high: bool) {
        self.0.set(high);
    }
}

/// Output pin driving a [`Line`].
pub struct FakePin(pub Line);

impl ErrorType for FakePin {
    type Error = Infallible;
}

impl OutputPin for FakePin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.set(true);
        Ok(())
    }
}

/// Input pin sampling a [`Line`].
pub struct FakeInput(pub Line);

impl ErrorType for FakeInput {
    type Error = Infallible;
}

impl InputPin for FakeInput {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.0.is_high())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.0.is_high())
    }
}

/// Registers of the fake step timer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimerRegs {
    pub top: u16,
    pub compare: u16,
    pub connected: bool,
}

/// Probe on the fake step timer.
#[derive(Debug, Clone, Default)]
pub struct TimerProbe(Rc<Cell<TimerRegs>>);

impl TimerProbe {
    pub fn regs(&self) -> TimerRegs {
        self.0.get()
    }
}

/// Step timer recording what was programmed.
pub struct FakeTimer(pub TimerProbe);

impl StepTimer for FakeTimer {
    fn set_period(&mut self, top: u16, compare: u16) {
        let mut regs = self.0.regs();
        regs.top = top;
        regs.compare = compare;
        (self.0).0.set(regs);
    }

    fn set_output_connected(&mut self, connected: bool) {
        let mut regs = self.0.regs();
        regs.connected = connected;
        (self.0).0.set(regs);
    }
}

pub type TestDevice = Device<FakeTimer, FakePin, FakeInput>;

/// A device on fake hardware plus probes on every line.
pub struct Rig {
    pub device: TestDevice,
    pub timer: TimerProbe,
    pub dir: Line,
    pub enable: Line,
    pub trigger: Line,
    pub dio: [Line; DIO_COUNT],
    /// Stop input; idles high (not asserted with the default polarity).
    pub stop: Line,
}

pub fn rig() -> Rig {
    rig_with(DeviceConfig::default())
}

pub fn rig_with(config: DeviceConfig) -> Rig {
    rig_with_stop(config, Line::high())
}

pub fn rig_with_stop(config: DeviceConfig, stop: Line) -> Rig {
    let timer = TimerProbe::default();
    let dir = Line::default();
    let enable = Line::default();
    let trigger = Line::high();
    let dio: [Line; DIO_COUNT] = std::array::from_fn(|_| Line::high());

    let device = Device::builder()
        .config(config)
        .timer(FakeTimer(timer.clone()))
        .dir_pin(FakePin(dir.clone()))
        .enable_pin(FakePin(enable.clone()))
        .trigger_pin(FakePin(trigger.clone()))
        .dio_pins(std::array::from_fn(|i| FakePin(dio[i].clone())))
        .stop_pin(FakeInput(stop.clone()))
        .build()
        .expect("device builds");

    Rig {
        device,
        timer,
        dir,
        enable,
        trigger,
        dio,
        stop,
    }
}

impl Rig {
    /// Send one request and return the response.
    pub fn send(&self, id: CommandId, update: Update, value: Option<Value>) -> Packet {
        let mut request = Packet::new(id.as_u8(), update.control());
        if let Some(value) = value {
            request.write_payload(value);
        }
        let mut response = Packet::default();
        let disposition = self.device.dispatch(&request, &mut response);
        assert_eq!(disposition, Disposition::Respond);
        response
    }

    pub fn get(&self, id: CommandId) -> Value {
        self.send(id, Update::Skip, None).value().expect("tagged response")
    }

    pub fn set(&self, id: CommandId, value: Value) -> Value {
        self.send(id, Update::Apply, Some(value))
            .value()
            .expect("tagged response")
    }

    pub fn set_no_apply(&self, id: CommandId, value: Value) -> Value {
        self.send(id, Update::Skip, Some(value))
            .value()
            .expect("tagged response")
    }

    /// Fire the step interrupt `n` times.
    pub fn step(&self, n: usize) -> Vec<StepOutcome> {
        (0..n).map(|_| self.device.on_step_interrupt()).collect()
    }
}

/// Transport and reset events in the order they happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Sent([u8; PACKET_SIZE]),
    BootKey(u32),
    Reset(ResetKind),
}

pub type EventLog = Rc<RefCell<Vec<Event>>>;

/// Packet pipe fed from a queue.
pub struct QueuePipe {
    pub requests: VecDeque<[u8; PACKET_SIZE]>,
    pub log: EventLog,
}

impl QueuePipe {
    pub fn new(log: EventLog) -> Self {
        Self {
            requests: VecDeque::new(),
            log,
        }
    }

    pub fn push(&mut self, id: u8, control: u8, payload: [u8; 4]) {
        let mut packet = Packet::new(id, control);
        packet.payload = payload;
        self.requests.push_back(packet.to_bytes());
    }
}

impl PacketPipe for QueuePipe {
    fn poll_request(&mut self) -> Result<Option<[u8; PACKET_SIZE]>, TransportError> {
        Ok(self.requests.pop_front())
    }

    fn send_response(&mut self, packet: &[u8; PACKET_SIZE]) -> Result<(), TransportError> {
        self.log.borrow_mut().push(Event::Sent(*packet));
        Ok(())
    }
}

/// Reset collaborator that records instead of restarting.
pub struct RecordingSystem {
    pub log: EventLog,
}

impl SystemControl for RecordingSystem {
    fn write_boot_key(&mut self, key: u32) {
        self.log.borrow_mut().push(Event::BootKey(key));
    }

    fn reset(&mut self, kind: ResetKind) {
        self.log.borrow_mut().push(Event::Reset(kind));
    }
}
