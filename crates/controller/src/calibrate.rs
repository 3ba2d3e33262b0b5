use common::Chassis;

use crate::sensors::SensorFrontEnd;

/// Default tick budget for the calibration sweep.
pub const CALIBRATION_TICKS: u16 = 80;

/// Tick-driven calibration sweep.
///
/// Rotates the robot in place to sweep the sensor array across the
/// line, recording per-sensor reflectance bounds every tick. The sweep
/// is asymmetric on purpose: the first quarter of the budget rotates
/// one way, the middle half rotates back through the line, and the
/// final quarter returns to roughly the starting heading.
///
/// The budget is fixed: the procedure finishes after `budget` ticks no
/// matter what the sensors report, and stops the motors on its final
/// tick. Running a second procedure over the same front end simply
/// widens the existing bounds.
#[derive(Debug)]
pub struct CalibrationProcedure {
    speed: i16,
    budget: u16,
    elapsed: u16,
}

impl CalibrationProcedure {
    pub fn new(calibration_speed: i16, budget: u16) -> Self {
        Self {
            speed: calibration_speed,
            budget,
            elapsed: 0,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.budget
    }

    /// Runs one sweep tick: commands the rotation for this phase and
    /// samples the sensors into the calibration bounds. Returns false
    /// once the budget is spent, with the motors stopped.
    pub fn step(&mut self, front_end: &mut SensorFrontEnd, chassis: &mut dyn Chassis) -> bool {
        if self.is_complete() {
            return false;
        }

        let i = self.elapsed;
        if i > self.budget / 4 && i <= self.budget / 4 * 3 {
            chassis.set_speeds(-self.speed, self.speed);
        } else {
            chassis.set_speeds(self.speed, -self.speed);
        }
        let raw = chassis.read_raw();
        front_end.record_calibration_sample(&raw);

        self.elapsed += 1;
        if self.is_complete() {
            chassis.set_speeds(0, 0);
            return false;
        }
        true
    }
}

/// Blocking sweep for hosts where real time passes on its own (actual
/// hardware): runs the whole budget back to back.
pub fn calibrate(
    front_end: &mut SensorFrontEnd,
    chassis: &mut dyn Chassis,
    calibration_speed: i16,
    ticks: u16,
) {
    let mut procedure = CalibrationProcedure::new(calibration_speed, ticks);
    while procedure.step(front_end, chassis) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{LineSensors, Motors, SensorReading, NUM_SENSORS};

    /// Chassis stub whose readings swing with the commanded rotation,
    /// so the sweep actually observes a spread of raw values.
    struct SweepStub {
        heading: i32,
        commands: Vec<(i16, i16)>,
    }

    impl SweepStub {
        fn new() -> Self {
            Self {
                heading: 0,
                commands: Vec::new(),
            }
        }
    }

    impl LineSensors for SweepStub {
        fn read_raw(&mut self) -> SensorReading {
            let base = 500 + self.heading.clamp(-400, 400);
            [base as u16; NUM_SENSORS]
        }
    }

    impl Motors for SweepStub {
        fn set_speeds(&mut self, left: i16, right: i16) {
            self.heading += i32::from(left) - i32::from(right);
            self.commands.push((left, right));
        }
    }

    #[test]
    fn sweep_is_asymmetric_and_stops_motors() {
        let mut front = SensorFrontEnd::new();
        let mut stub = SweepStub::new();
        calibrate(&mut front, &mut stub, 50, CALIBRATION_TICKS);

        assert_eq!(stub.commands.len(), usize::from(CALIBRATION_TICKS) + 1);
        assert_eq!(stub.commands[0], (50, -50));
        // Middle half of the budget rotates the other way.
        assert_eq!(stub.commands[21], (-50, 50));
        assert_eq!(stub.commands[60], (-50, 50));
        assert_eq!(stub.commands[61], (50, -50));
        assert_eq!(*stub.commands.last().unwrap(), (0, 0));
    }

    #[test]
    fn budget_is_fixed() {
        let mut front = SensorFrontEnd::new();
        let mut stub = SweepStub::new();
        let mut procedure = CalibrationProcedure::new(50, 8);

        let mut ticks = 0;
        while procedure.step(&mut front, &mut stub) {
            ticks += 1;
        }
        assert_eq!(ticks, 7); // the final tick reports completion
        assert!(procedure.is_complete());
        // Stepping a finished procedure is a no-op.
        assert!(!procedure.step(&mut front, &mut stub));
        assert_eq!(stub.commands.len(), 9);
    }

    #[test]
    fn bounds_cover_observed_extremes() {
        let mut front = SensorFrontEnd::new();
        let mut stub = SweepStub::new();
        calibrate(&mut front, &mut stub, 50, CALIBRATION_TICKS);

        assert!(front.bounds().is_calibrated());
        for sensor in 0..NUM_SENSORS {
            let (min, max) = front.bounds().range(sensor);
            assert!(min < max);
        }
    }

    #[test]
    fn recalibration_is_idempotent() {
        let mut front = SensorFrontEnd::new();
        let mut stub = SweepStub::new();
        calibrate(&mut front, &mut stub, 50, CALIBRATION_TICKS);
        let first = front.bounds().range(0);

        let mut stub = SweepStub::new();
        calibrate(&mut front, &mut stub, 50, CALIBRATION_TICKS);
        let second = front.bounds().range(0);

        assert!(second.0 <= first.0);
        assert!(second.1 >= first.1);
    }
}
