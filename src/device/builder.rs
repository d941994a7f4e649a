//! Builder pattern for Device.

use embedded_hal::digital::{InputPin, OutputPin};

use crate::config::{validate_config, DeviceConfig};
use crate::error::{ConfigError, Error, Result};
use crate::pulse::{PulseGenerator, StepTimer};
use crate::safety::{permits_interlock, StopInput};
use crate::state::{Shared, Switch, SystemState};

use super::engine::Engine;
use super::outputs::{AuxOutputs, DIO_COUNT};
use super::Device;

/// Builder for creating Device instances.
pub struct DeviceBuilder<TIMER, PIN, STOP>
where
    TIMER: StepTimer,
    PIN: OutputPin,
    STOP: InputPin,
{
    config: DeviceConfig,
    timer: Option<TIMER>,
    dir_pin: Option<PIN>,
    enable_pin: Option<PIN>,
    trigger_pin: Option<PIN>,
    dio_pins: Option<[PIN; DIO_COUNT]>,
    stop_pin: Option<STOP>,
}

impl<TIMER, PIN, STOP> Default for DeviceBuilder<TIMER, PIN, STOP>
where
    TIMER: StepTimer,
    PIN: OutputPin,
    STOP: InputPin,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<TIMER, PIN, STOP> DeviceBuilder<TIMER, PIN, STOP>
where
    TIMER: StepTimer,
    PIN: OutputPin,
    STOP: InputPin,
{
    /// Create a new builder with the default configuration.
    pub fn new() -> Self {
        Self {
            config: DeviceConfig::default(),
            timer: None,
            dir_pin: None,
            enable_pin: None,
            trigger_pin: None,
            dio_pins: None,
            stop_pin: None,
        }
    }

    /// Use a device configuration.
    pub fn config(mut self, config: DeviceConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the step timer.
    pub fn timer(mut self, timer: TIMER) -> Self {
        self.timer = Some(timer);
        self
    }

    /// Set the DIR pin.
    pub fn dir_pin(mut self, pin: PIN) -> Self {
        self.dir_pin = Some(pin);
        self
    }

    /// Set the motor-driver enable pin.
    pub fn enable_pin(mut self, pin: PIN) -> Self {
        self.enable_pin = Some(pin);
        self
    }

    /// Set the velocity-mode trigger pin.
    pub fn trigger_pin(mut self, pin: PIN) -> Self {
        self.trigger_pin = Some(pin);
        self
    }

    /// Set the general-purpose output pins, index 0 first.
    pub fn dio_pins(mut self, pins: [PIN; DIO_COUNT]) -> Self {
        self.dio_pins = Some(pins);
        self
    }

    /// Set the stop input pin.
    pub fn stop_pin(mut self, pin: STOP) -> Self {
        self.stop_pin = Some(pin);
        self
    }

    /// Build the Device and bring the hardware to its power-on state.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, a component is
    /// missing, or a pin cannot be driven.
    pub fn build(self) -> Result<Device<TIMER, PIN, STOP>> {
        validate_config(&self.config)?;

        let timer = self.timer.ok_or_else(|| missing("timer"))?;
        let dir_pin = self.dir_pin.ok_or_else(|| missing("dir_pin"))?;
        let enable_pin = self.enable_pin.ok_or_else(|| missing("enable_pin"))?;
        let trigger_pin = self.trigger_pin.ok_or_else(|| missing("trigger_pin"))?;
        let dio_pins = self.dio_pins.ok_or_else(|| missing("dio_pins"))?;
        let stop_pin = self.stop_pin.ok_or_else(|| missing("stop_pin"))?;

        let config = self.config;
        let startup = config.startup;

        let mut engine = Engine {
            state: SystemState::new(startup.travel_velocity),
            pulse: PulseGenerator::new(timer, dir_pin, config.timer, config.invert_direction),
            outputs: AuxOutputs::new(enable_pin, trigger_pin, dio_pins),
            stop: StopInput::new(stop_pin, config.stop_polarity),
        };

        engine.pulse.init()?;
        engine.outputs.init()?;

        engine.state.enable = Switch::from(startup.motor_enabled);
        engine.outputs.set_enable(startup.motor_enabled)?;

        if startup.interlock_enabled {
            let asserted = engine.stop.is_asserted();
            if permits_interlock(Switch::Enabled, asserted) {
                engine.state.interlock = Switch::Enabled;
            } else {
                warn!("stop input asserted at startup, interlock left disabled");
            }
        }

        let limits = config.velocity_limits();
        info!("device ready: {}..{} steps/s", limits.min, limits.max);

        Ok(Device {
            core: Shared::new(engine),
            limits,
        })
    }
}

fn missing(component: &'static str) -> Error {
    Error::Config(ConfigError::MissingComponent(component))
}
