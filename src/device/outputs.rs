//! Auxiliary output lines: motor enable, velocity trigger and the
//! general-purpose outputs.

use embedded_hal::digital::{OutputPin, PinState};

use crate::error::{HardwareError, Result};

/// Number of general-purpose outputs.
pub const DIO_COUNT: usize = 8;

/// Auxiliary output pins.
pub struct AuxOutputs<PIN>
where
    PIN: OutputPin,
{
    enable: PIN,
    trigger: PIN,
    dio: [PIN; DIO_COUNT],
}

impl<PIN> AuxOutputs<PIN>
where
    PIN: OutputPin,
{
    /// Group the output pins.
    pub fn new(enable: PIN, trigger: PIN, dio: [PIN; DIO_COUNT]) -> Self {
        Self {
            enable,
            trigger,
            dio,
        }
    }

    /// Drive the trigger and every general-purpose output low.
    pub fn init(&mut self) -> Result<()> {
        self.set_trigger(false)?;
        for pin in self.dio.iter_mut() {
            drive(pin, false)?;
        }
        Ok(())
    }

    /// Drive the motor-driver enable line (high = enabled).
    pub fn set_enable(&mut self, enabled: bool) -> Result<()> {
        drive(&mut self.enable, enabled)
    }

    /// Drive the velocity-mode trigger line.
    pub fn set_trigger(&mut self, high: bool) -> Result<()> {
        drive(&mut self.trigger, high)
    }

    /// Drive general-purpose output `index`.
    ///
    /// Indices past the last output are ignored; returns whether a pin was
    /// driven.
    pub fn set_dio(&mut self, index: u8, high: bool) -> Result<bool> {
        match self.dio.get_mut(index as usize) {
            Some(pin) => drive(pin, high).map(|_| true),
            None => Ok(false),
        }
    }
}

fn drive<PIN: OutputPin>(pin: &mut PIN, high: bool) -> Result<()> {
    pin.set_state(PinState::from(high))
        .map_err(|_| HardwareError::Pin.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as MockState, Transaction as PinTransaction,
    };

    fn idle_pins() -> [PinMock; DIO_COUNT] {
        core::array::from_fn(|_| PinMock::new(&[]))
    }

    #[test]
    fn test_init_drives_lines_low() {
        let mut enable = PinMock::new(&[]);
        let mut trigger = PinMock::new(&[PinTransaction::set(MockState::Low)]);
        let mut dio: [PinMock; DIO_COUNT] =
            core::array::from_fn(|_| PinMock::new(&[PinTransaction::set(MockState::Low)]));

        let mut outputs = AuxOutputs::new(enable.clone(), trigger.clone(), dio.clone());
        outputs.init().unwrap();

        enable.done();
        trigger.done();
        for pin in dio.iter_mut() {
            pin.done();
        }
    }

    #[test]
    fn test_dio_index_bounds() {
        let mut enable = PinMock::new(&[]);
        let mut trigger = PinMock::new(&[]);
        let mut dio: [PinMock; DIO_COUNT] = core::array::from_fn(|i| match i {
            7 => PinMock::new(&[
                PinTransaction::set(MockState::High),
                PinTransaction::set(MockState::Low),
            ]),
            _ => PinMock::new(&[]),
        });

        let mut outputs = AuxOutputs::new(enable.clone(), trigger.clone(), dio.clone());

        assert_eq!(outputs.set_dio(7, true), Ok(true));
        assert_eq!(outputs.set_dio(7, false), Ok(true));
        assert_eq!(outputs.set_dio(8, true), Ok(false));
        assert_eq!(outputs.set_dio(255, false), Ok(false));

        enable.done();
        trigger.done();
        for pin in dio.iter_mut() {
            pin.done();
        }
    }

    #[test]
    fn test_enable_line_polarity() {
        let mut enable = PinMock::new(&[
            PinTransaction::set(MockState::High),
            PinTransaction::set(MockState::Low),
        ]);
        let mut trigger = PinMock::new(&[]);
        let mut dio = idle_pins();
        let mut outputs = AuxOutputs::new(enable.clone(), trigger.clone(), dio.clone());

        outputs.set_enable(true).unwrap();
        outputs.set_enable(false).unwrap();

        enable.done();
        trigger.done();
        for pin in dio.iter_mut() {
            pin.done();
        }
    }
}
