//! Full state readout.

use core::fmt;

use crate::state::{Direction, Mode, RunStatus, Switch};

/// Every value the device reports, read one command at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusReport {
    /// Operating mode.
    pub mode: Mode,
    /// Run status.
    pub status: RunStatus,
    /// Motor enable line.
    pub enable: Switch,
    /// Position in steps.
    pub position: i32,
    /// Loaded velocity.
    pub velocity: u16,
    /// Loaded direction.
    pub direction: Direction,
    /// `setpoint - position`.
    pub position_error: i32,
    /// Maximum velocity.
    pub max_velocity: u16,
    /// Minimum velocity.
    pub min_velocity: u16,
    /// Stop interlock.
    pub interlock: Switch,
    /// Position-mode setpoint.
    pub position_setpoint: i32,
    /// Position-mode travel velocity.
    pub travel_velocity: u16,
    /// Velocity-mode setpoint.
    pub velocity_setpoint: u16,
    /// Velocity-mode direction.
    pub direction_setpoint: Direction,
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "system state")?;
        writeln!(f, "  operating mode:       {}", self.mode)?;
        writeln!(f, "  status:               {}", self.status)?;
        writeln!(f, "  drive:                {}", self.enable)?;
        writeln!(f, "  position:             {}", self.position)?;
        writeln!(f, "  velocity:             {}", self.velocity)?;
        writeln!(f, "  direction:            {}", self.direction)?;
        writeln!(f, "  position error:       {}", self.position_error)?;
        writeln!(f, "  maximum velocity:     {}", self.max_velocity)?;
        writeln!(f, "  minimum velocity:     {}", self.min_velocity)?;
        writeln!(f, "  stop interlock:       {}", self.interlock)?;
        writeln!(f, "position mode")?;
        writeln!(f, "  position setpoint:    {}", self.position_setpoint)?;
        writeln!(f, "  travel velocity:      {}", self.travel_velocity)?;
        writeln!(f, "velocity mode")?;
        writeln!(f, "  velocity setpoint:    {}", self.velocity_setpoint)?;
        write!(f, "  direction setpoint:   {}", self.direction_setpoint)
    }
}
