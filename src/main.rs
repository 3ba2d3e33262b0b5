mod menu;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use common::config::load_profile;
use common::{ProfileConfig, RunDiagnostics};
use controller::calibrate::CALIBRATION_TICKS;
use controller::{CalibrationProcedure, ControlLoop, GapState};
use sim::{SimRobot, Track};

const DEMO_TICKS: u32 = 3000;

fn main() {
    println!("===========================================");
    println!("Welcome to the Line Follower Control Core");
    println!("===========================================");

    loop {
        menu::show_menu();

        match menu::get_user_choice() {
            Ok(1) => run_follow_demo("Eco", ProfileConfig::eco()),
            Ok(2) => run_follow_demo("Strada", ProfileConfig::strada()),
            Ok(3) => run_follow_demo("Corsa", ProfileConfig::corsa()),
            Ok(4) => {
                let profile = load_profile("configs/profile_custom.toml")
                    .expect("Failed to load profile");
                run_follow_demo("Custom", profile);
            }
            Ok(5) => {
                let profile = menu::manual_profile();
                run_follow_demo("Manual", profile);
            }
            Ok(6) => {
                println!("Goodbye!");
                break;
            }
            _ => println!("Invalid choice. Please select 1-6."),
        }
    }
}

fn run_follow_demo(name: &str, profile: ProfileConfig) {
    println!("\n=== Running {} profile on the simulated course ===", name);
    println!(
        "Configuration: base speed {}, max {}, KP {}/256, KD {}/256",
        profile.base_speed, profile.max_speed, profile.proportional, profile.derivative
    );

    // Gently weaving course with a 30 mm dash gap two metres in.
    let track = Track::curved(20.0, 4000.0).with_gap(2000.0, 30.0);
    let mut robot = SimRobot::offset(track, 3.0);

    let diagnostics = Arc::new(RunDiagnostics::default());
    let mut control = ControlLoop::new(profile, diagnostics.clone()).with_trace();

    println!("Calibrating ({} ticks)...", CALIBRATION_TICKS);
    let mut sweep = CalibrationProcedure::new(profile.calibration_speed, CALIBRATION_TICKS);
    while sweep.step(control.front_end_mut(), &mut robot) {
        robot.step();
    }

    show_readings(&mut control, &mut robot);
    println!("Go!");

    let mut gap_ticks = 0u32;
    for _ in 0..DEMO_TICKS {
        let output = control.tick(&mut robot);
        if output.gap_state == GapState::TraversingGap {
            gap_ticks += 1;
        }
        robot.step();
    }

    println!("\n=== Run Results ===");
    println!("Ticks: {}", DEMO_TICKS);
    println!("Distance travelled: {:.0} mm", robot.distance_mm());
    println!("Final lateral error: {:.2} mm", robot.lateral_error_mm());
    println!("Final state: {:?}", control.gap_state());
    println!(
        "Gap entries: {}",
        diagnostics.gap_entries.load(Ordering::Relaxed)
    );
    println!("Blind ticks: {}", gap_ticks);
    println!(
        "Stale position fallbacks: {}",
        diagnostics.stale_positions.load(Ordering::Relaxed)
    );

    if let Some(trace) = control.trace() {
        if let Err(e) = trace.save_to_csv("trace.csv") {
            println!("Failed to save trace: {}", e);
        }
    }

    menu::wait_for_enter();
}

/// Prints one line of calibrated readings and the position estimate,
/// the quick post-calibration sanity check before the run starts.
fn show_readings(control: &mut ControlLoop, robot: &mut SimRobot) {
    use common::LineSensors;

    let raw = robot.read_raw();
    let calibrated = control.front_end().normalize(&raw);
    let estimate = control.front_end_mut().read_position(&calibrated);
    println!(
        "Calibrated readings: {:4} {:4} {:4} {:4} {:4}  position: {}",
        calibrated[0], calibrated[1], calibrated[2], calibrated[3], calibrated[4], estimate.position
    );
}
