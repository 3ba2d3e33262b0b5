use common::{LineSensors, SensorReading, NUM_SENSORS, POSITION_MAX};

/// Calibrated values at or below this are treated as noise and left
/// out of the position average.
pub const NOISE_FLOOR: u16 = 50;

/// At least one sensor must read above this for the line to count as
/// visible; otherwise the position estimate falls back to the edge the
/// line was last seen drifting toward.
pub const ON_LINE_MIN: u16 = 200;

const RAW_FULL_SCALE: u16 = 1000;

/// Per-sensor reflectance bounds gathered by the calibration sweep.
///
/// Before the first sample is recorded the bounds are distinguished as
/// uninitialized and normalization treats each sensor as spanning the
/// full raw range, so an uncalibrated read degrades instead of
/// dividing by zero.
#[derive(Debug, Clone, Copy)]
pub struct CalibrationBounds {
    min: [u16; NUM_SENSORS],
    max: [u16; NUM_SENSORS],
    initialized: bool,
}

impl CalibrationBounds {
    pub fn new() -> Self {
        Self {
            min: [0; NUM_SENSORS],
            max: [0; NUM_SENSORS],
            initialized: false,
        }
    }

    pub fn is_calibrated(&self) -> bool {
        self.initialized
    }

    /// Widens the per-sensor bounds with one raw sample. The first
    /// sample seeds both bounds, so `min <= max` holds from then on.
    pub fn widen(&mut self, raw: &SensorReading) {
        if !self.initialized {
            self.min = *raw;
            self.max = *raw;
            self.initialized = true;
            return;
        }
        for i in 0..NUM_SENSORS {
            self.min[i] = self.min[i].min(raw[i]);
            self.max[i] = self.max[i].max(raw[i]);
        }
    }

    pub fn range(&self, sensor: usize) -> (u16, u16) {
        if self.initialized {
            (self.min[sensor], self.max[sensor])
        } else {
            (0, RAW_FULL_SCALE)
        }
    }
}

impl Default for CalibrationBounds {
    fn default() -> Self {
        Self::new()
    }
}

/// Scalar line-position estimate for one tick.
#[derive(Debug, Clone, Copy)]
pub struct LineEstimate {
    /// Weighted centroid in 0..=POSITION_MAX; CENTER_POSITION when the
    /// line sits under the middle of the array.
    pub position: u16,
    /// False when no sensor saw enough contrast and `position` is the
    /// last-seen-edge fallback.
    pub line_visible: bool,
}

/// Converts raw reflectance samples into calibrated readings and a
/// scalar line position.
#[derive(Debug)]
pub struct SensorFrontEnd {
    bounds: CalibrationBounds,
    last_position: u16,
}

impl SensorFrontEnd {
    pub fn new() -> Self {
        Self {
            bounds: CalibrationBounds::new(),
            last_position: POSITION_MAX / 2,
        }
    }

    pub fn bounds(&self) -> &CalibrationBounds {
        &self.bounds
    }

    /// Feeds one raw sample into the calibration bounds.
    pub fn record_calibration_sample(&mut self, raw: &SensorReading) {
        self.bounds.widen(raw);
    }

    /// Normalizes a raw sample to 0..=1000 per sensor against the
    /// calibration bounds: `(raw - min) * 1000 / (max - min)`, clamped.
    pub fn normalize(&self, raw: &SensorReading) -> SensorReading {
        let mut out = [0u16; NUM_SENSORS];
        for i in 0..NUM_SENSORS {
            let (min, max) = self.bounds.range(i);
            let denom = i32::from(max) - i32::from(min);
            if denom <= 0 {
                // Sensor never saw any contrast during calibration.
                out[i] = 0;
                continue;
            }
            let value = (i32::from(raw[i]) - i32::from(min)) * 1000 / denom;
            out[i] = value.clamp(0, 1000) as u16;
        }
        out
    }

    /// Reads the sensor array and returns the calibrated values.
    pub fn read_calibrated(&self, sensors: &mut dyn LineSensors) -> SensorReading {
        self.normalize(&sensors.read_raw())
    }

    /// Weighted centroid of the calibrated readings, 1000 units per
    /// sensor. When every sensor is at or below ON_LINE_MIN the line
    /// is lost and the estimate snaps to whichever edge it was last
    /// seen on, so the steering keeps turning the same way instead of
    /// jumping back to center.
    pub fn read_position(&mut self, calibrated: &SensorReading) -> LineEstimate {
        let mut on_line = false;
        let mut weighted: u32 = 0;
        let mut sum: u32 = 0;

        for (i, &value) in calibrated.iter().enumerate() {
            if value > ON_LINE_MIN {
                on_line = true;
            }
            if value > NOISE_FLOOR {
                weighted += u32::from(value) * (i as u32 * 1000);
                sum += u32::from(value);
            }
        }

        if !on_line {
            self.last_position = if self.last_position < POSITION_MAX / 2 {
                0
            } else {
                POSITION_MAX
            };
            return LineEstimate {
                position: self.last_position,
                line_visible: false,
            };
        }

        self.last_position = (weighted / sum) as u16;
        LineEstimate {
            position: self.last_position,
            line_visible: true,
        }
    }

    pub fn last_position(&self) -> u16 {
        self.last_position
    }
}

impl Default for SensorFrontEnd {
    fn default() -> Self {
        Self::new()
    }
}
