//! Device module for simple-step.
//!
//! [`Device`] owns the state record and every piece of hardware behind one
//! critical section. The foreground command loop and the two interrupt
//! handlers all go through `&self`, so a single `static` device can be
//! shared between them.
//!
//! ```rust,ignore
//! #[interrupt]
//! fn TIMER1_OVF() {
//!     device().on_step_interrupt();
//! }
//!
//! #[interrupt]
//! fn INT0() {
//!     device().on_stop_interrupt();
//! }
//! ```

mod builder;
mod dispatch;
mod engine;
mod outputs;

pub use builder::DeviceBuilder;
pub use dispatch::{Disposition, ResetKind};
pub use outputs::{AuxOutputs, DIO_COUNT};

use embedded_hal::digital::{InputPin, OutputPin};

use crate::config::VelocityLimits;
use crate::motion::MotionTarget;
use crate::protocol::{Command, Packet, Update};
use crate::pulse::{StepOutcome, StepTimer};
use crate::state::{Shared, SystemState};

use self::engine::Engine;

/// Single-axis stepper controller.
pub struct Device<TIMER, PIN, STOP>
where
    TIMER: StepTimer,
    PIN: OutputPin,
    STOP: InputPin,
{
    core: Shared<Engine<TIMER, PIN, STOP>>,
    limits: VelocityLimits,
}

impl<TIMER, PIN, STOP> Device<TIMER, PIN, STOP>
where
    TIMER: StepTimer,
    PIN: OutputPin,
    STOP: InputPin,
{
    /// Create a builder.
    pub fn builder() -> DeviceBuilder<TIMER, PIN, STOP> {
        DeviceBuilder::new()
    }

    /// Velocity bounds of the step timer.
    #[inline]
    pub fn limits(&self) -> VelocityLimits {
        self.limits
    }

    /// Step timer interrupt: advance the position by one step if moving.
    pub fn on_step_interrupt(&self) -> StepOutcome {
        self.core.lock(|core| core.step())
    }

    /// Stop input interrupt (edge on the stop line).
    ///
    /// Returns whether the interlock honored the event.
    pub fn on_stop_interrupt(&self) -> bool {
        self.core.lock(|core| core.stop_event(&self.limits))
    }

    /// Level-sensed stop handling for ports without an edge interrupt on
    /// the stop line. Call periodically.
    pub fn poll_stop_input(&self) -> bool {
        self.core.lock(|core| {
            if core.interlock_asserted() {
                core.stop_event(&self.limits)
            } else {
                false
            }
        })
    }

    /// Re-plan the active mode and reload the step generator.
    pub fn update(&self) -> MotionTarget {
        self.core.lock(|core| core.update(&self.limits))
    }

    /// Consistent copy of the whole state record.
    pub fn snapshot(&self) -> SystemState {
        self.core.lock(|core| core.state)
    }

    /// Handle one request.
    ///
    /// Echoes the command id into `response` and writes the command's result.
    /// An unknown id leaves the rest of `response` as it was. When the
    /// request asks for it, the mode update runs after the command; the
    /// response keeps the value read before the update. Reset requests
    /// never run the update.
    pub fn dispatch(&self, request: &Packet, response: &mut Packet) -> Disposition {
        response.command_id = request.command_id;

        let disposition = match Command::decode(request) {
            Some(command) => {
                trace!("command {}", request.command_id);
                self.core.lock(|core| core.execute(command, &self.limits, response))
            }
            None => {
                debug!("unknown command {}", request.command_id);
                Disposition::Respond
            }
        };

        if disposition == Disposition::Respond
            && Update::from_control(request.control) == Update::Apply
        {
            self.update();
        }

        disposition
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{CommandId, PayloadKind, Value, CTL_APPLY, CTL_NO_APPLY};
    use crate::state::{Mode, RunStatus, Switch};
    use core::cell::Cell;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as MockState, Transaction as PinTransaction,
    };
    use embedded_hal_mock::eh1::MockError;
    use std::io::ErrorKind;

    struct NullTimer;

    impl StepTimer for NullTimer {
        fn set_period(&mut self, _top: u16, _compare: u16) {}
        fn set_output_connected(&mut self, _connected: bool) {}
    }

    struct NullPin;

    impl ErrorType for NullPin {
        type Error = Infallible;
    }

    impl OutputPin for NullPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    struct StopLine<'a>(&'a Cell<bool>);

    impl ErrorType for StopLine<'_> {
        type Error = Infallible;
    }

    impl InputPin for StopLine<'_> {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(self.0.get())
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.0.get())
        }
    }

    fn device(line: &Cell<bool>) -> Device<NullTimer, NullPin, StopLine<'_>> {
        Device::builder()
            .timer(NullTimer)
            .dir_pin(NullPin)
            .enable_pin(NullPin)
            .trigger_pin(NullPin)
            .dio_pins(core::array::from_fn(|_| NullPin))
            .stop_pin(StopLine(line))
            .build()
            .unwrap()
    }

    fn request(id: CommandId, control: u8, value: Option<Value>) -> Packet {
        let mut packet = Packet::new(id.as_u8(), control);
        if let Some(value) = value {
            packet.write_payload(value);
        }
        packet
    }

    #[test]
    fn test_build_requires_components() {
        let line = Cell::new(true);
        let result = Device::<NullTimer, NullPin, StopLine<'_>>::builder()
            .timer(NullTimer)
            .stop_pin(StopLine(&line))
            .build();
        assert!(matches!(
            result,
            Err(crate::Error::Config(crate::error::ConfigError::MissingComponent("dir_pin")))
        ));
    }

    #[test]
    fn test_unknown_command_only_echoes_id() {
        let line = Cell::new(true);
        let device = device(&line);
        let mut response = Packet::new(0, PayloadKind::I32 as u8);
        response.payload = [1, 2, 3, 4];

        let disposition = device.dispatch(&Packet::new(77, CTL_NO_APPLY), &mut response);

        assert_eq!(disposition, Disposition::Respond);
        assert_eq!(response.to_bytes(), [77, 2, 1, 2, 3, 4]);
    }

    #[test]
    fn test_response_reads_before_update() {
        let line = Cell::new(true);
        let device = device(&line);
        let mut response = Packet::default();

        device.dispatch(
            &request(CommandId::SetVelocitySetpoint, CTL_NO_APPLY, Some(Value::U16(6000))),
            &mut response,
        );
        device.dispatch(
            &request(CommandId::SetStatus, CTL_NO_APPLY, Some(Value::U8(1))),
            &mut response,
        );
        device.dispatch(&request(CommandId::GetVelocity, CTL_APPLY, None), &mut response);

        assert_eq!(response.value(), Ok(Value::U16(0)));
        assert_eq!(device.snapshot().velocity, 6000);
    }

    #[test]
    fn test_reset_skips_update() {
        let line = Cell::new(true);
        let device = device(&line);
        device.dispatch(
            &request(CommandId::SetStatus, CTL_NO_APPLY, Some(Value::U8(1))),
            &mut Packet::default(),
        );
        device.dispatch(
            &request(CommandId::SetVelocitySetpoint, CTL_NO_APPLY, Some(Value::U16(1000))),
            &mut Packet::default(),
        );

        let disposition = device.dispatch(
            &request(CommandId::BootloaderMode, CTL_APPLY, None),
            &mut Packet::default(),
        );

        assert_eq!(disposition, Disposition::Reset(ResetKind::Bootloader));
        assert_eq!(device.snapshot().velocity, 0);
    }

    #[test]
    fn test_poll_stop_input_is_level_sensed() {
        let line = Cell::new(true);
        let device = device(&line);
        let mut response = Packet::default();
        device.dispatch(
            &request(CommandId::SetInterlock, CTL_NO_APPLY, Some(Value::U8(1))),
            &mut response,
        );
        device.dispatch(
            &request(CommandId::SetMode, CTL_NO_APPLY, Some(Value::U8(1))),
            &mut response,
        );
        device.dispatch(
            &request(CommandId::SetStatus, CTL_NO_APPLY, Some(Value::U8(1))),
            &mut response,
        );

        assert!(!device.poll_stop_input());
        assert_eq!(device.snapshot().status, RunStatus::Running);

        line.set(false);
        assert!(device.poll_stop_input());
        let state = device.snapshot();
        assert_eq!(state.status, RunStatus::Stopped);
        assert_eq!(state.mode, Mode::Position);
    }

    // =========================================================================
    // Pin faults
    // =========================================================================

    fn io_error() -> MockError {
        MockError::Io(ErrorKind::NotConnected)
    }

    struct MockPins {
        dir: PinMock,
        enable: PinMock,
        trigger: PinMock,
        dio: [PinMock; DIO_COUNT],
        stop: PinMock,
    }

    /// Mock pins expecting the power-on writes (direction for positive,
    /// enable high, trigger and outputs low) followed by `dir`, `enable`
    /// and `trigger`.
    fn mock_pins(
        dir: &[PinTransaction],
        enable: &[PinTransaction],
        trigger: &[PinTransaction],
        stop: &[PinTransaction],
    ) -> MockPins {
        let after_power_on = |level: MockState, rest: &[PinTransaction]| {
            let mut all = vec![PinTransaction::set(level)];
            all.extend_from_slice(rest);
            PinMock::new(&all)
        };

        MockPins {
            dir: after_power_on(MockState::Low, dir),
            enable: after_power_on(MockState::High, enable),
            trigger: after_power_on(MockState::Low, trigger),
            dio: core::array::from_fn(|_| PinMock::new(&[PinTransaction::set(MockState::Low)])),
            stop: PinMock::new(stop),
        }
    }

    impl MockPins {
        fn device(&self) -> Device<NullTimer, PinMock, PinMock> {
            Device::builder()
                .timer(NullTimer)
                .dir_pin(self.dir.clone())
                .enable_pin(self.enable.clone())
                .trigger_pin(self.trigger.clone())
                .dio_pins(self.dio.clone())
                .stop_pin(self.stop.clone())
                .build()
                .unwrap()
        }

        fn done(mut self) {
            self.dir.done();
            self.enable.done();
            self.trigger.done();
            for pin in self.dio.iter_mut() {
                pin.done();
            }
            self.stop.done();
        }
    }

    #[test]
    fn test_unreadable_stop_input_refuses_run() {
        let pins = mock_pins(
            &[],
            &[],
            &[],
            &[
                PinTransaction::get(MockState::High),
                PinTransaction::get(MockState::High).with_error(io_error()),
            ],
        );
        let device = pins.device();
        let mut response = Packet::default();

        // Readable and released: the interlock arms.
        device.dispatch(
            &request(CommandId::SetInterlock, CTL_NO_APPLY, Some(Value::U8(1))),
            &mut response,
        );
        assert_eq!(response.value(), Ok(Value::U8(1)));

        device.dispatch(
            &request(CommandId::SetStatus, CTL_NO_APPLY, Some(Value::U8(1))),
            &mut response,
        );
        assert_eq!(response.value(), Ok(Value::U8(0)));
        assert_eq!(device.snapshot().status, RunStatus::Stopped);

        pins.done();
    }

    #[test]
    fn test_unreadable_stop_input_refuses_interlock() {
        let pins = mock_pins(
            &[],
            &[],
            &[],
            &[PinTransaction::get(MockState::High).with_error(io_error())],
        );
        let device = pins.device();
        let mut response = Packet::default();

        device.dispatch(
            &request(CommandId::SetInterlock, CTL_NO_APPLY, Some(Value::U8(1))),
            &mut response,
        );

        assert_eq!(response.value(), Ok(Value::U8(0)));
        assert_eq!(device.snapshot().interlock, Switch::Disabled);

        pins.done();
    }

    #[test]
    fn test_failed_line_writes_still_answer() {
        let pins = mock_pins(
            &[PinTransaction::set(MockState::Low).with_error(io_error())],
            &[PinTransaction::set(MockState::Low).with_error(io_error())],
            &[PinTransaction::set(MockState::Low).with_error(io_error())],
            &[],
        );
        let device = pins.device();
        let mut response = Packet::default();

        // Enable write fails, then the update fails on trigger and direction.
        let disposition = device.dispatch(
            &request(CommandId::SetEnable, CTL_APPLY, Some(Value::U8(0))),
            &mut response,
        );

        assert_eq!(disposition, Disposition::Respond);
        assert_eq!(response.command_id, CommandId::SetEnable.as_u8());
        assert_eq!(response.value(), Ok(Value::U8(0)));
        assert_eq!(device.snapshot().enable, Switch::Disabled);

        device.dispatch(&request(CommandId::GetEnable, CTL_NO_APPLY, None), &mut response);
        assert_eq!(response.value(), Ok(Value::U8(0)));

        pins.done();
    }
}
