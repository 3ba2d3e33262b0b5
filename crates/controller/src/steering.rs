use common::config::GAIN_SCALE;
use common::{MotorCommand, ProfileConfig, CENTER_POSITION};

/// Proportional-derivative steering law.
///
/// Holds the gains and speed bounds from the session profile plus the
/// previous tick's error, which is the only history the derivative
/// term uses. Out-of-range computed speeds are saturated to
/// `[min_speed, max_speed]`; saturation is the contract, not an error.
#[derive(Debug)]
pub struct SteeringController {
    proportional: i32,
    derivative: i32,
    base_speed: i32,
    min_speed: i32,
    max_speed: i32,
    last_error: i32,
}

impl SteeringController {
    pub fn new(config: &ProfileConfig) -> Self {
        Self {
            proportional: config.proportional,
            derivative: config.derivative,
            base_speed: i32::from(config.base_speed),
            min_speed: i32::from(config.min_speed),
            max_speed: i32::from(config.max_speed),
            last_error: 0,
        }
    }

    /// Clears the derivative history. Only done at session start; gap
    /// traversal deliberately leaves it untouched.
    pub fn reset(&mut self) {
        self.last_error = 0;
    }

    pub fn last_error(&self) -> i32 {
        self.last_error
    }

    /// One PD step. `position` is the line-position estimate; error is
    /// its distance from the range midpoint. The correction steers by
    /// speeding up one side and slowing the other around `base_speed`.
    pub fn compute_speeds(&mut self, position: i32) -> MotorCommand {
        let error = position - CENTER_POSITION;
        let speed_difference = error * self.proportional / GAIN_SCALE
            + (error - self.last_error) * self.derivative / GAIN_SCALE;
        self.last_error = error;

        let left = (self.base_speed + speed_difference).clamp(self.min_speed, self.max_speed);
        let right = (self.base_speed - speed_difference).clamp(self.min_speed, self.max_speed);

        MotorCommand {
            left: left as i16,
            right: right as i16,
        }
    }
}
