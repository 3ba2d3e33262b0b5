use std::sync::atomic::{AtomicU64, Ordering};

/// Observation-only counters for a follow run. Nothing here feeds back
/// into the control logic.
#[derive(Default)]
pub struct RunDiagnostics {
    pub stale_positions: AtomicU64,
    pub gap_entries: AtomicU64,
    pub blind_ticks: AtomicU64,
}

impl RunDiagnostics {
    pub fn record_stale_position(&self) {
        self.stale_positions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_gap_entry(&self) {
        self.gap_entries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_blind_tick(&self) {
        self.blind_ticks.fetch_add(1, Ordering::Relaxed);
    }
}
