pub mod robot;
pub mod track;

pub use robot::SimRobot;
pub use track::{GapSegment, Track};
