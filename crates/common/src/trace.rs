use serde::Serialize;

use crate::SensorReading;

/// One line of the diagnostic dump: the five calibrated sensor values
/// and the emitter-state flag ('E' when the IR emitters were on).
#[derive(Debug, Serialize, Clone, Copy)]
pub struct TickTrace {
    pub tick: u64,
    pub s0: u16,
    pub s1: u16,
    pub s2: u16,
    pub s3: u16,
    pub s4: u16,
    pub emitters: char,
}

impl TickTrace {
    pub fn new(tick: u64, calibrated: &SensorReading, emitters_on: bool) -> Self {
        Self {
            tick,
            s0: calibrated[0],
            s1: calibrated[1],
            s2: calibrated[2],
            s3: calibrated[3],
            s4: calibrated[4],
            emitters: if emitters_on { 'E' } else { 'e' },
        }
    }
}

/// In-memory recorder for the per-tick sensor trace, persisted to CSV
/// after the run for offline inspection.
pub struct TraceRecorder {
    records: Vec<TickTrace>,
}

impl TraceRecorder {
    pub fn new() -> Self {
        Self {
            records: Vec::with_capacity(10_000),
        }
    }

    pub fn record(&mut self, trace: TickTrace) {
        self.records.push(trace);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[TickTrace] {
        &self.records
    }

    pub fn save_to_csv(&self, filename: &str) -> Result<(), Box<dyn std::error::Error>> {
        let mut wtr = csv::Writer::from_path(filename)?;
        for record in &self.records {
            wtr.serialize(record)?;
        }
        wtr.flush()?;
        println!("Saved {} records to {}", self.records.len(), filename);
        Ok(())
    }
}

impl Default for TraceRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_calibrated_values_in_order() {
        let mut recorder = TraceRecorder::new();
        recorder.record(TickTrace::new(0, &[10, 20, 990, 20, 10], true));
        recorder.record(TickTrace::new(1, &[0, 0, 0, 0, 0], false));

        assert_eq!(recorder.len(), 2);
        assert_eq!(recorder.records()[0].s2, 990);
        assert_eq!(recorder.records()[0].emitters, 'E');
        assert_eq!(recorder.records()[1].emitters, 'e');
    }

    #[test]
    fn saves_csv_to_disk() {
        let mut recorder = TraceRecorder::new();
        recorder.record(TickTrace::new(0, &[1, 2, 3, 4, 5], true));

        let path = std::env::temp_dir().join("line_follower_trace_test.csv");
        let path = path.to_str().unwrap().to_owned();
        recorder.save_to_csv(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("tick,s0,s1,s2,s3,s4,emitters"));
        assert!(contents.contains("0,1,2,3,4,5,E"));
    }
}
