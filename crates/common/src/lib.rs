use serde::{Deserialize, Serialize};

pub mod config;
pub mod diagnostics;
pub mod trace;

pub use config::ProfileConfig;
pub use diagnostics::RunDiagnostics;
pub use trace::{TickTrace, TraceRecorder};

/// Number of reflectance sensors in the array.
pub const NUM_SENSORS: usize = 5;

/// One raw or calibrated sample per physical sensor, left to right.
/// Calibrated values are normalized to 0..=1000.
pub type SensorReading = [u16; NUM_SENSORS];

/// Upper end of the line-position range: sensors sit 1000 units apart,
/// so position 0 is under sensor 0 and 4000 under sensor 4.
pub const POSITION_MAX: u16 = (NUM_SENSORS as u16 - 1) * 1000;

/// Position reported when the line is centered under the array.
pub const CENTER_POSITION: i32 = POSITION_MAX as i32 / 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotorCommand {
    pub left: i16,
    pub right: i16,
}

impl MotorCommand {
    pub const STOP: MotorCommand = MotorCommand { left: 0, right: 0 };
}

/// Reflectance sensor array, as provided by the platform.
pub trait LineSensors {
    fn read_raw(&mut self) -> SensorReading;
}

/// Differential-drive motor pair, as provided by the platform.
pub trait Motors {
    fn set_speeds(&mut self, left: i16, right: i16);
}

/// A platform exposing both the sensor array and the motors.
pub trait Chassis: LineSensors + Motors {}

impl<T: LineSensors + Motors> Chassis for T {}
