use common::{LineSensors, MotorCommand, Motors, SensorReading, NUM_SENSORS};

use crate::track::Track;

/// Sim time covered by one control tick.
pub const TICK_SECONDS: f64 = 0.01;

/// Lateral spacing between adjacent sensors.
pub const SENSOR_SPACING_MM: f64 = 12.0;

/// The sensor bar sits this far ahead of the axle, which is what lets
/// a rotation-in-place sweep it across the line during calibration.
pub const SENSOR_FORWARD_MM: f64 = 60.0;

/// Forward millimetres per second per unit of commanded speed.
const SPEED_TO_MM_S: f64 = 1.0;

/// Turn rate in rad/s per unit of left/right speed differential.
const TURN_RATE: f64 = 0.03;

const LINE_HALF_WIDTH_MM: f64 = 8.0;
const EDGE_FALLOFF_MM: f64 = 4.0;

/// Kinematic differential-drive robot over a [`Track`], rendering raw
/// reflectance per sensor. Implements both hardware traits so it can
/// stand in for the whole chassis.
#[derive(Debug)]
pub struct SimRobot {
    track: Track,
    distance_mm: f64,
    lateral_mm: f64,
    heading_rad: f64,
    command: MotorCommand,
    // Distinct white/black levels per sensor so calibration has real
    // per-sensor bounds to discover.
    white_level: [f64; NUM_SENSORS],
    black_level: [f64; NUM_SENSORS],
}

impl SimRobot {
    pub fn new(track: Track) -> Self {
        Self::offset(track, 0.0)
    }

    /// Starts the robot with a lateral offset from the line.
    pub fn offset(track: Track, lateral_mm: f64) -> Self {
        let mut white_level = [0.0; NUM_SENSORS];
        let mut black_level = [0.0; NUM_SENSORS];
        for i in 0..NUM_SENSORS {
            white_level[i] = 120.0 + 15.0 * i as f64;
            black_level[i] = 880.0 - 10.0 * i as f64;
        }
        Self {
            track,
            distance_mm: 0.0,
            lateral_mm,
            heading_rad: 0.0,
            command: MotorCommand::STOP,
            white_level,
            black_level,
        }
    }

    pub fn distance_mm(&self) -> f64 {
        self.distance_mm
    }

    pub fn lateral_mm(&self) -> f64 {
        self.lateral_mm
    }

    pub fn heading_rad(&self) -> f64 {
        self.heading_rad
    }

    /// Lateral distance between the robot center and the line at the
    /// sensor bar's longitudinal position.
    pub fn lateral_error_mm(&self) -> f64 {
        self.lateral_mm - self.track.line_center(self.sensor_distance())
    }

    /// Integrates the last motor command over one tick of sim time.
    pub fn step(&mut self) {
        let left = f64::from(self.command.left);
        let right = f64::from(self.command.right);

        let forward = (left + right) / 2.0 * SPEED_TO_MM_S;
        let turn = (left - right) * TURN_RATE;

        self.heading_rad += turn * TICK_SECONDS;
        self.distance_mm += forward * self.heading_rad.cos() * TICK_SECONDS;
        self.lateral_mm += forward * self.heading_rad.sin() * TICK_SECONDS;
    }

    fn sensor_distance(&self) -> f64 {
        self.distance_mm + SENSOR_FORWARD_MM * self.heading_rad.cos()
    }

    fn sensor_lateral(&self, index: usize) -> f64 {
        let across = (index as f64 - (NUM_SENSORS as f64 - 1.0) / 2.0) * SENSOR_SPACING_MM;
        self.lateral_mm
            + across * self.heading_rad.cos()
            + SENSOR_FORWARD_MM * self.heading_rad.sin()
    }

    /// Fraction of a sensor's view covered by the line: 1 directly
    /// over it, falling off linearly past the line edge.
    fn coverage(&self, index: usize) -> f64 {
        if !self.track.has_line_at(self.sensor_distance()) {
            return 0.0;
        }
        let line = self.track.line_center(self.sensor_distance());
        let offset = (self.sensor_lateral(index) - line).abs();
        if offset <= LINE_HALF_WIDTH_MM {
            1.0
        } else {
            (1.0 - (offset - LINE_HALF_WIDTH_MM) / EDGE_FALLOFF_MM).max(0.0)
        }
    }
}

impl LineSensors for SimRobot {
    fn read_raw(&mut self) -> SensorReading {
        let mut reading = [0u16; NUM_SENSORS];
        for i in 0..NUM_SENSORS {
            let c = self.coverage(i);
            let value = self.white_level[i] + c * (self.black_level[i] - self.white_level[i]);
            reading[i] = value.round() as u16;
        }
        reading
    }
}

impl Motors for SimRobot {
    fn set_speeds(&mut self, left: i16, right: i16) {
        self.command = MotorCommand { left, right };
    }
}
