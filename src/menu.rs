use std::io::{self, Write};

use common::ProfileConfig;

pub fn show_menu() {
    println!("\n===========================================");
    println!("Line Follower Control Core");
    println!("===========================================");
    println!("Select a driving profile:");
    println!("1. Eco (200, Kp 64, Kd 256)");
    println!("2. Strada (310, Kp 90, Kd 610)");
    println!("3. Corsa (400, Kp 110, Kd 1600)");
    println!("4. Custom (configs/profile_custom.toml)");
    println!("5. Manual tuning");
    println!("6. Exit");
    println!("===========================================");
    print!("Choice (1-6): ");
    io::stdout().flush().unwrap();
}

pub fn get_user_choice() -> Result<u32, std::num::ParseIntError> {
    let mut input = String::new();
    io::stdin().read_line(&mut input).unwrap();
    input.trim().parse::<u32>()
}

pub fn wait_for_enter() {
    println!("\nPress Enter to return to menu...");
    let mut input = String::new();
    io::stdin().read_line(&mut input).unwrap();
}

fn prompt_number(label: &str, default: i32) -> i32 {
    print!("{} [{}]: ", label, default);
    io::stdout().flush().unwrap();
    let mut input = String::new();
    io::stdin().read_line(&mut input).unwrap();
    input.trim().parse::<i32>().unwrap_or(default)
}

/// Manual tuning: max speed, Kp and Kd are prompted for; base speed
/// follows max speed and the remaining fields take the stock values.
pub fn manual_profile() -> ProfileConfig {
    println!("\n--- Manual tuning ---");
    let max_speed = prompt_number("Max speed", 200).clamp(10, 400) as i16;
    let proportional = prompt_number("KP (x/256)", 200);
    let derivative = prompt_number("KD (x/256)", 500);
    ProfileConfig::manual(max_speed, proportional, derivative)
}
