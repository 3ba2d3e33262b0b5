use common::{SensorReading, NUM_SENSORS};

/// Per-sensor low-contrast thresholds for gap detection. The outermost
/// left sensor runs hotter than the rest on the reference chassis, so
/// its threshold is higher; do not flatten these to a single value.
pub const GAP_THRESHOLDS: [u16; NUM_SENSORS] = [300, 200, 200, 200, 200];

/// Both motors run at this speed while traversing a gap blind.
pub const BLIND_SPEED: i16 = 50;

/// Minimum dwell per blind tick, in host time-units. The host loop is
/// expected to pace gap ticks at least this far apart; the tracking
/// path runs at whatever cadence the host provides.
pub const BLIND_TICK_PACING: u16 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapState {
    Tracking,
    TraversingGap,
}

/// Detects a deliberate dash in the line and rides it out blind.
///
/// Every sensor dropping below its threshold on a single tick means
/// the array is over a gap rather than drifting off the line sideways
/// (a sideways exit always leaves an edge sensor hot). The machine is
/// not re-entrant: one traversal at a time, and re-entering Tracking
/// restores PD control with no reset of the derivative history. If the
/// line never reappears the machine stays in TraversingGap and the
/// robot drives straight indefinitely; that is accepted degraded
/// behavior, not an error.
#[derive(Debug)]
pub struct GapTraversal {
    state: GapState,
}

impl GapTraversal {
    pub fn new() -> Self {
        Self {
            state: GapState::Tracking,
        }
    }

    pub fn state(&self) -> GapState {
        self.state
    }

    /// Session reset only; never forced mid-run.
    pub fn reset(&mut self) {
        self.state = GapState::Tracking;
    }

    /// Advances the machine with one tick's calibrated readings and
    /// returns the state that governs this same tick: a reappearing
    /// line resumes PD control immediately, not a tick later.
    pub fn update(&mut self, calibrated: &SensorReading) -> GapState {
        match self.state {
            GapState::Tracking if line_absent(calibrated) => {
                self.state = GapState::TraversingGap;
            }
            GapState::TraversingGap if line_detected(calibrated) => {
                self.state = GapState::Tracking;
            }
            _ => {}
        }
        self.state
    }
}

impl Default for GapTraversal {
    fn default() -> Self {
        Self::new()
    }
}

fn line_absent(calibrated: &SensorReading) -> bool {
    calibrated
        .iter()
        .zip(GAP_THRESHOLDS.iter())
        .all(|(&value, &threshold)| value < threshold)
}

fn line_detected(calibrated: &SensorReading) -> bool {
    calibrated
        .iter()
        .zip(GAP_THRESHOLDS.iter())
        .any(|(&value, &threshold)| value > threshold)
}
