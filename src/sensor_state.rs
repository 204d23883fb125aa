//! Session state of the driver.
//!
//! The SHT4x answers whatever command was sent last, so how a frame is read
//! and decoded depends only on that command. Every send replaces the state;
//! there is no way back to `Idle`.

use crate::commands::{Command, MeasurementMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorState {
    /// Nothing sent yet.
    #[default]
    Idle,
    AwaitingIdentifier,
    AwaitingMeasurement(MeasurementMode),
    /// Soft reset produces no frame.
    AwaitingReset,
}

impl SensorState {
    /// The command that produced this state.
    pub fn command(&self) -> Option<Command> {
        match self {
            SensorState::Idle => None,
            SensorState::AwaitingIdentifier => Some(Command::GetIdentifier),
            SensorState::AwaitingMeasurement(mode) => Some(Command::measure(*mode)),
            SensorState::AwaitingReset => Some(Command::SoftReset),
        }
    }

    /// Whether the last command makes the sensor send back a 6 byte frame.
    pub fn expects_frame(&self) -> bool {
        match self {
            SensorState::AwaitingIdentifier | SensorState::AwaitingMeasurement(_) => true,
            SensorState::Idle | SensorState::AwaitingReset => false,
        }
    }

    pub fn measurement_mode(&self) -> Option<MeasurementMode> {
        match self {
            SensorState::AwaitingMeasurement(mode) => Some(*mode),
            _ => None,
        }
    }
}
