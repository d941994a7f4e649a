//! System state record and its wire-encoded enumerations.

use core::fmt;

use crate::config::DEFAULT_TRAVEL_VELOCITY;

/// Declares a `u8`-encoded enumeration with checked decoding.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $value:literal => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[cfg_attr(feature = "defmt", derive(defmt::Format))]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $value ),+
        }

        impl $name {
            /// Wire encoding.
            #[inline]
            pub const fn as_u8(self) -> u8 {
                self as u8
            }
        }

        impl TryFrom<u8> for $name {
            type Error = u8;

            fn try_from(value: u8) -> Result<Self, Self::Error> {
                match value {
                    $( $value => Ok($name::$variant), )+
                    other => Err(other),
                }
            }
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> u8 {
                value as u8
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $( $name::$variant => f.write_str($label), )+
                }
            }
        }
    };
}

wire_enum! {
    /// Operating mode; selects which setpoint block drives the motor.
    pub enum Mode {
        /// Run continuously at the velocity setpoint.
        Velocity = 0 => "velocity",
        /// Travel to the position setpoint and stop.
        Position = 1 => "position",
    }
}

wire_enum! {
    /// Direction of motor motion.
    pub enum Direction {
        /// Position counts up.
        Positive = 0 => "positive",
        /// Position counts down.
        Negative = 1 => "negative",
    }
}

wire_enum! {
    /// Master run gate; no position changes while stopped.
    pub enum RunStatus {
        /// Motion is inhibited.
        Stopped = 0 => "stopped",
        /// Motion is allowed.
        Running = 1 => "running",
    }
}

wire_enum! {
    /// Two-state flag used for the motor enable line and the stop interlock.
    pub enum Switch {
        /// Off.
        Disabled = 0 => "disabled",
        /// On.
        Enabled = 1 => "enabled",
    }
}

impl Direction {
    /// Direction that reduces a position error (`setpoint - position`).
    ///
    /// A zero error maps to `Negative`.
    #[inline]
    pub fn toward(error: i32) -> Self {
        if error > 0 {
            Direction::Positive
        } else {
            Direction::Negative
        }
    }

    /// Position increment for one step.
    #[inline]
    pub fn sign(self) -> i32 {
        match self {
            Direction::Positive => 1,
            Direction::Negative => -1,
        }
    }
}

impl Switch {
    /// Check if the switch is on.
    #[inline]
    pub fn is_enabled(self) -> bool {
        self == Switch::Enabled
    }
}

impl From<bool> for Switch {
    fn from(on: bool) -> Self {
        if on {
            Switch::Enabled
        } else {
            Switch::Disabled
        }
    }
}

/// Position mode parameters.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionParams {
    /// Target absolute position in steps.
    pub setpoint: i32,
    /// Speed used to travel to the setpoint (steps/sec).
    pub travel_velocity: u16,
}

/// Velocity mode parameters.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VelocityParams {
    /// Target velocity in steps/sec.
    pub setpoint: u16,
    /// Target direction.
    pub direction: Direction,
}

/// The single runtime state record shared by the command loop and both
/// interrupt handlers.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemState {
    /// Active operating mode.
    pub mode: Mode,
    /// Direction currently loaded into the step generator.
    pub direction: Direction,
    /// Velocity currently loaded into the step generator (0 = idle).
    pub velocity: u16,
    /// Absolute position in steps.
    pub position: i32,
    /// Position mode setpoints.
    pub position_params: PositionParams,
    /// Velocity mode setpoints.
    pub velocity_params: VelocityParams,
    /// Run gate.
    pub status: RunStatus,
    /// Motor-driver enable line.
    pub enable: Switch,
    /// Whether the stop input is honored.
    pub interlock: Switch,
}

impl SystemState {
    /// Power-on state with the given travel velocity.
    pub const fn new(travel_velocity: u16) -> Self {
        Self {
            mode: Mode::Velocity,
            direction: Direction::Positive,
            velocity: 0,
            position: 0,
            position_params: PositionParams {
                setpoint: 0,
                travel_velocity,
            },
            velocity_params: VelocityParams {
                setpoint: 0,
                direction: Direction::Positive,
            },
            status: RunStatus::Stopped,
            enable: Switch::Enabled,
            interlock: Switch::Disabled,
        }
    }

    /// Position error, `setpoint - position`.
    #[inline]
    pub fn position_error(&self) -> i32 {
        self.position_params.setpoint.wrapping_sub(self.position)
    }

    /// Check if the run gate is open.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.status == RunStatus::Running
    }

    /// Shift the coordinate origin: position and setpoint both move by `-offset`.
    #[inline]
    pub fn shift_origin(&mut self, offset: i32) {
        self.position = self.position.wrapping_sub(offset);
        self.position_params.setpoint = self.position_params.setpoint.wrapping_sub(offset);
    }
}

impl Default for SystemState {
    fn default() -> Self {
        Self::new(DEFAULT_TRAVEL_VELOCITY)
    }
}
