pub mod calibrate;
pub mod control;
pub mod gap;
pub mod sensors;
pub mod steering;

pub use calibrate::CalibrationProcedure;
pub use control::{ControlLoop, TickOutput};
pub use gap::{GapState, GapTraversal};
pub use sensors::{CalibrationBounds, LineEstimate, SensorFrontEnd};
pub use steering::SteeringController;
