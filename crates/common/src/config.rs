use serde::Deserialize;
use std::fs;

/// Fixed-point divisor for the steering gains: the effective
/// proportional coefficient is `proportional / 256`.
pub const GAIN_SCALE: i32 = 256;

/// Per-session tuning parameters. Produced once by the configuration
/// front end (menu or TOML file) before the control loop starts and
/// read-only afterward.
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct ProfileConfig {
    pub max_speed: i16,
    pub min_speed: i16,
    pub base_speed: i16,
    pub calibration_speed: i16,
    pub proportional: i32,
    pub derivative: i32,
}

impl ProfileConfig {
    /// Slow profile, gentle gains. Suits tight courses.
    pub fn eco() -> Self {
        Self {
            max_speed: 200,
            min_speed: 0,
            base_speed: 200,
            calibration_speed: 50,
            proportional: 64,
            derivative: 256,
        }
    }

    /// Mid-speed profile.
    pub fn strada() -> Self {
        Self {
            max_speed: 310,
            min_speed: 0,
            base_speed: 310,
            calibration_speed: 60,
            proportional: 90,
            derivative: 610,
        }
    }

    /// Full-speed profile. Needs a smooth course to stay on the line.
    pub fn corsa() -> Self {
        Self {
            max_speed: 400,
            min_speed: 0,
            base_speed: 400,
            calibration_speed: 60,
            proportional: 110,
            derivative: 1600,
        }
    }

    /// Manually tuned profile: base speed follows max speed, minimum
    /// speed and calibration speed are pinned the way the stock tuning
    /// mode pins them.
    pub fn manual(max_speed: i16, proportional: i32, derivative: i32) -> Self {
        Self {
            max_speed,
            min_speed: 0,
            base_speed: max_speed,
            calibration_speed: 60,
            proportional,
            derivative,
        }
    }
}

pub fn load_profile(path: &str) -> Result<ProfileConfig, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)?;
    let config: ProfileConfig = toml::from_str(&content)?;
    Ok(config)
}

impl ProfileConfig {
    pub fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        load_profile(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_profile_toml() {
        let toml = r#"
            max_speed = 240
            min_speed = 0
            base_speed = 240
            calibration_speed = 60
            proportional = 90
            derivative = 400
        "#;
        let config: ProfileConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.max_speed, 240);
        assert_eq!(config.proportional, 90);
        assert_eq!(config.derivative, 400);
    }

    #[test]
    fn manual_profile_pins_base_to_max() {
        let config = ProfileConfig::manual(260, 80, 300);
        assert_eq!(config.base_speed, 260);
        assert_eq!(config.min_speed, 0);
        assert_eq!(config.calibration_speed, 60);
    }
}
