use std::f64::consts::TAU;

/// A stretch of course where the line is deliberately absent.
#[derive(Debug, Clone, Copy)]
pub struct GapSegment {
    pub start_mm: f64,
    pub length_mm: f64,
}

/// 1-D course model: the line's lateral offset as a function of
/// distance travelled, with an optional dash gap.
#[derive(Debug, Clone, Copy)]
pub struct Track {
    curve_amplitude_mm: f64,
    curve_wavelength_mm: f64,
    gap: Option<GapSegment>,
}

impl Track {
    pub fn straight() -> Self {
        Self {
            curve_amplitude_mm: 0.0,
            curve_wavelength_mm: 1.0,
            gap: None,
        }
    }

    /// Sinusoidal course: the line weaves `amplitude_mm` either side
    /// of center over the given wavelength.
    pub fn curved(amplitude_mm: f64, wavelength_mm: f64) -> Self {
        Self {
            curve_amplitude_mm: amplitude_mm,
            curve_wavelength_mm: wavelength_mm,
            gap: None,
        }
    }

    pub fn with_gap(mut self, start_mm: f64, length_mm: f64) -> Self {
        self.gap = Some(GapSegment {
            start_mm,
            length_mm,
        });
        self
    }

    /// Lateral position of the line center at a given distance.
    pub fn line_center(&self, distance_mm: f64) -> f64 {
        if self.curve_amplitude_mm == 0.0 {
            return 0.0;
        }
        self.curve_amplitude_mm * (TAU * distance_mm / self.curve_wavelength_mm).sin()
    }

    pub fn has_line_at(&self, distance_mm: f64) -> bool {
        match self.gap {
            Some(gap) => {
                distance_mm < gap.start_mm || distance_mm >= gap.start_mm + gap.length_mm
            }
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_track_keeps_line_at_center() {
        let track = Track::straight();
        assert_eq!(track.line_center(0.0), 0.0);
        assert_eq!(track.line_center(500.0), 0.0);
        assert!(track.has_line_at(500.0));
    }

    #[test]
    fn gap_removes_line_over_its_segment() {
        let track = Track::straight().with_gap(400.0, 30.0);
        assert!(track.has_line_at(399.9));
        assert!(!track.has_line_at(400.0));
        assert!(!track.has_line_at(429.9));
        assert!(track.has_line_at(430.0));
    }

    #[test]
    fn curved_track_weaves_within_amplitude() {
        let track = Track::curved(20.0, 2000.0);
        for d in 0..40 {
            let offset = track.line_center(d as f64 * 100.0);
            assert!(offset.abs() <= 20.0 + 1e-9);
        }
    }
}
