use std::sync::Arc;

use common::{Chassis, MotorCommand, ProfileConfig, RunDiagnostics, TickTrace, TraceRecorder};

use crate::calibrate;
use crate::gap::{GapState, GapTraversal, BLIND_SPEED, BLIND_TICK_PACING};
use crate::sensors::SensorFrontEnd;
use crate::steering::SteeringController;

/// What one control cycle decided, returned so hosts and tests can
/// observe the loop without reaching into its state.
#[derive(Debug, Clone, Copy)]
pub struct TickOutput {
    pub command: MotorCommand,
    /// Position estimate used this tick (last known while blind).
    pub position: u16,
    pub gap_state: GapState,
    /// Minimum time-units the host should dwell before the next tick;
    /// zero while tracking.
    pub pacing_ticks: u16,
}

/// Per-tick orchestration: read sensors, update the gap machine, then
/// steer by PD or drive blind. Purely sequential; the host provides
/// the cadence.
pub struct ControlLoop {
    config: ProfileConfig,
    front_end: SensorFrontEnd,
    steering: SteeringController,
    gap: GapTraversal,
    diagnostics: Arc<RunDiagnostics>,
    trace: Option<TraceRecorder>,
    emitters_on: bool,
    tick: u64,
}

impl ControlLoop {
    pub fn new(config: ProfileConfig, diagnostics: Arc<RunDiagnostics>) -> Self {
        Self {
            config,
            front_end: SensorFrontEnd::new(),
            steering: SteeringController::new(&config),
            gap: GapTraversal::new(),
            diagnostics,
            trace: None,
            emitters_on: true,
            tick: 0,
        }
    }

    /// Enables the per-tick diagnostic trace.
    pub fn with_trace(mut self) -> Self {
        self.trace = Some(TraceRecorder::new());
        self
    }

    pub fn trace(&self) -> Option<&TraceRecorder> {
        self.trace.as_ref()
    }

    pub fn front_end(&self) -> &SensorFrontEnd {
        &self.front_end
    }

    /// Mutable access for tick-driven hosts that step a
    /// [`calibrate::CalibrationProcedure`] themselves.
    pub fn front_end_mut(&mut self) -> &mut SensorFrontEnd {
        &mut self.front_end
    }

    pub fn gap_state(&self) -> GapState {
        self.gap.state()
    }

    /// Runs the calibration sweep back to back against this loop's
    /// sensor bounds. Hosts that must interleave their own work per
    /// sweep tick drive a [`calibrate::CalibrationProcedure`] through
    /// [`Self::front_end_mut`] instead.
    pub fn calibrate(&mut self, chassis: &mut dyn Chassis, ticks: u16) {
        calibrate::calibrate(
            &mut self.front_end,
            chassis,
            self.config.calibration_speed,
            ticks,
        );
    }

    /// Executes one control cycle and emits the motor command.
    pub fn tick(&mut self, chassis: &mut dyn Chassis) -> TickOutput {
        let raw = chassis.read_raw();
        let calibrated = self.front_end.normalize(&raw);

        let was_tracking = self.gap.state() == GapState::Tracking;
        let state = self.gap.update(&calibrated);
        if was_tracking && state == GapState::TraversingGap {
            self.diagnostics.record_gap_entry();
        }

        let (command, position, pacing_ticks) = match state {
            GapState::TraversingGap => {
                self.diagnostics.record_blind_tick();
                let command = MotorCommand {
                    left: BLIND_SPEED,
                    right: BLIND_SPEED,
                };
                (command, self.front_end.last_position(), BLIND_TICK_PACING)
            }
            GapState::Tracking => {
                let estimate = self.front_end.read_position(&calibrated);
                if !estimate.line_visible {
                    self.diagnostics.record_stale_position();
                }
                let command = self.steering.compute_speeds(i32::from(estimate.position));
                (command, estimate.position, 0)
            }
        };

        if let Some(trace) = &mut self.trace {
            trace.record(TickTrace::new(self.tick, &calibrated, self.emitters_on));
        }

        chassis.set_speeds(command.left, command.right);
        self.tick += 1;

        TickOutput {
            command,
            position,
            gap_state: state,
            pacing_ticks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{LineSensors, Motors, SensorReading, NUM_SENSORS};

    /// Chassis stub fed from a scripted list of raw readings.
    struct ScriptedChassis {
        readings: Vec<SensorReading>,
        cursor: usize,
        commands: Vec<MotorCommand>,
    }

    impl ScriptedChassis {
        fn new(readings: Vec<SensorReading>) -> Self {
            Self {
                readings,
                cursor: 0,
                commands: Vec::new(),
            }
        }
    }

    impl LineSensors for ScriptedChassis {
        fn read_raw(&mut self) -> SensorReading {
            let reading = self.readings[self.cursor.min(self.readings.len() - 1)];
            self.cursor += 1;
            reading
        }
    }

    impl Motors for ScriptedChassis {
        fn set_speeds(&mut self, left: i16, right: i16) {
            self.commands.push(MotorCommand { left, right });
        }
    }

    fn loop_with_seeded_bounds() -> (ControlLoop, Arc<RunDiagnostics>) {
        let diagnostics = Arc::new(RunDiagnostics::default());
        let mut control = ControlLoop::new(ProfileConfig::eco(), diagnostics.clone());
        // Seed bounds directly so raw readings pass through 1:1.
        let mut seeder = ScriptedChassis::new(vec![[0; NUM_SENSORS], [1000; NUM_SENSORS]]);
        control.front_end.record_calibration_sample(&seeder.read_raw());
        control.front_end.record_calibration_sample(&seeder.read_raw());
        (control, diagnostics)
    }

    #[test]
    fn centered_line_drives_both_wheels_at_base_speed() {
        let (mut control, _) = loop_with_seeded_bounds();
        let mut chassis = ScriptedChassis::new(vec![[0, 0, 1000, 0, 0]]);
        let output = control.tick(&mut chassis);
        assert_eq!(output.command, MotorCommand { left: 200, right: 200 });
        assert_eq!(output.gap_state, GapState::Tracking);
        assert_eq!(output.pacing_ticks, 0);
        assert_eq!(chassis.commands, vec![output.command]);
    }

    #[test]
    fn gap_ticks_drive_blind_and_pace_the_host() {
        let (mut control, diagnostics) = loop_with_seeded_bounds();
        let mut chassis = ScriptedChassis::new(vec![
            [0, 0, 1000, 0, 0],
            [100; NUM_SENSORS],
            [100; NUM_SENSORS],
            [0, 0, 1000, 0, 0],
        ]);

        control.tick(&mut chassis);

        let blind = control.tick(&mut chassis);
        assert_eq!(blind.gap_state, GapState::TraversingGap);
        assert_eq!(blind.command, MotorCommand { left: 50, right: 50 });
        assert_eq!(blind.pacing_ticks, BLIND_TICK_PACING);

        control.tick(&mut chassis);

        // Reappearing line resumes PD the same tick, not a tick later.
        let resumed = control.tick(&mut chassis);
        assert_eq!(resumed.gap_state, GapState::Tracking);
        assert_eq!(resumed.command, MotorCommand { left: 200, right: 200 });

        use std::sync::atomic::Ordering;
        assert_eq!(diagnostics.gap_entries.load(Ordering::Relaxed), 1);
        assert_eq!(diagnostics.blind_ticks.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn derivative_history_survives_a_gap() {
        let (mut control, _) = loop_with_seeded_bounds();
        let mut chassis = ScriptedChassis::new(vec![
            [0, 0, 500, 500, 0], // position 2500, error 500
            [100; NUM_SENSORS],
            [0, 0, 500, 500, 0],
        ]);

        control.tick(&mut chassis);
        assert_eq!(control.steering.last_error(), 500);
        control.tick(&mut chassis);
        // Blind tick must not touch the PD state.
        assert_eq!(control.steering.last_error(), 500);
        control.tick(&mut chassis);
        assert_eq!(control.steering.last_error(), 500);
    }

    #[test]
    fn lost_line_holds_last_edge_and_counts_stale_reads() {
        let (mut control, diagnostics) = loop_with_seeded_bounds();
        // Line fades toward the right edge, then one sensor sits
        // exactly at its gap threshold: the gap machine keeps
        // tracking, but no sensor clears the on-line minimum.
        let mut chassis = ScriptedChassis::new(vec![
            [0, 0, 0, 400, 900],
            [0, 200, 0, 0, 0],
        ]);

        control.tick(&mut chassis);
        let stale = control.tick(&mut chassis);
        assert_eq!(stale.gap_state, GapState::Tracking);
        assert_eq!(stale.position, common::POSITION_MAX);

        use std::sync::atomic::Ordering;
        assert_eq!(diagnostics.stale_positions.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn trace_records_one_line_per_tick() {
        let (control, _) = loop_with_seeded_bounds();
        let mut control = control.with_trace();
        let mut chassis = ScriptedChassis::new(vec![[0, 0, 1000, 0, 0]]);
        control.tick(&mut chassis);
        control.tick(&mut chassis);

        let trace = control.trace().unwrap();
        assert_eq!(trace.len(), 2);
        assert_eq!(trace.records()[0].s2, 1000);
        assert_eq!(trace.records()[0].emitters, 'E');
    }
}
