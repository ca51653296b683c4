/*!
Tunable motion parameters.

Loaded from JSON; every field is optional and falls back to its default. Validation runs on
every load path and again when a controller is built.

Units: meters, seconds, degrees. Frictions and decelerations are per-tick fractions in [0, 1].
*/

use std::{fs, path::Path};

use kinematic::BodySettings;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Shape of one jump arc.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpData {
    pub jump_height: f32,
    pub time_to_jump_apex: f32,
    /// Gravity multiplier while rising and holding jump.
    pub upward_movement_multiplier: f32,
    /// Gravity multiplier while falling.
    pub downward_movement_multiplier: f32,
    /// Gravity multiplier while rising after jump is released.
    pub jump_cut_off: f32,
}

impl Default for JumpData {
    fn default() -> Self {
        Self {
            jump_height: 2.0,
            time_to_jump_apex: 0.4,
            upward_movement_multiplier: 1.0,
            downward_movement_multiplier: 3.0,
            jump_cut_off: 2.0,
        }
    }
}

impl JumpData {
    fn validate(&self, field: &'static str) -> Result<(), ConfigError> {
        if !(self.time_to_jump_apex > 0.0) {
            return Err(invalid(field, "time_to_jump_apex must be positive"));
        }
        if !(self.jump_height >= 0.0) {
            return Err(invalid(field, "jump_height must be non-negative"));
        }
        for m in [
            self.upward_movement_multiplier,
            self.downward_movement_multiplier,
            self.jump_cut_off,
        ] {
            if !(m >= 0.0) || !m.is_finite() {
                return Err(invalid(field, "gravity multipliers must be finite and non-negative"));
            }
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    // Grounded movement
    pub acceleration: f32,
    pub ground_friction: f32,
    /// Extra friction on the ground without move input.
    pub ground_deceleration: f32,
    /// Applied to horizontal velocity while grounded and over `max_speed`.
    pub ground_speed_cap_mult: f32,
    pub max_speed: f32,

    // Air movement
    pub air_accel: f32,
    pub air_friction: f32,

    // Jump
    pub base_jump: JumpData,
    pub slide_jump: JumpData,
    pub coyote_time: f32,
    /// How long a jump press is remembered before landing.
    pub jump_buffer: f32,

    // Grab
    /// Minimum horizontal speed on entering a grab.
    pub grab_speed: f32,
    pub grab_duration: f32,
    /// Fraction of velocity lost when a grab ends without sliding.
    pub grab_deceleration: f32,
    pub grab_friction: f32,

    // Slide
    pub min_slide_time: f32,
    pub slide_friction: f32,
    /// Multiplier on move acceleration while sliding.
    pub slide_move_mult: f32,
    /// A slide bonks when the angle between the horizontal hit normal and the horizontal
    /// impact velocity exceeds this; 180 is head-on.
    pub max_slide_bonk_angle: f32,

    // Stun
    /// Multiplier on the reflected speed when a bonk starts a stun.
    pub stun_deceleration: f32,
    pub stun_upward_speed: f32,
    pub stun_duration: f32,

    pub body: BodySettings,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            acceleration: 60.0,
            ground_friction: 0.1,
            ground_deceleration: 0.2,
            ground_speed_cap_mult: 0.9,
            max_speed: 8.0,
            air_accel: 20.0,
            air_friction: 0.02,
            base_jump: JumpData::default(),
            slide_jump: JumpData {
                jump_height: 1.5,
                time_to_jump_apex: 0.35,
                ..JumpData::default()
            },
            coyote_time: 0.15,
            jump_buffer: 0.15,
            grab_speed: 12.0,
            grab_duration: 0.2,
            grab_deceleration: 0.3,
            grab_friction: 0.0,
            min_slide_time: 0.3,
            slide_friction: 0.01,
            slide_move_mult: 0.3,
            max_slide_bonk_angle: 135.0,
            stun_deceleration: 0.5,
            stun_upward_speed: 6.0,
            stun_duration: 0.5,
            body: BodySettings::default(),
        }
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

impl MotionConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("loaded motion config from {}", path.display());
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.body.validate()?;
        if !(self.body.gravity.y < 0.0) {
            return Err(invalid("body.gravity", "gravity must point down"));
        }

        self.base_jump.validate("base_jump")?;
        self.slide_jump.validate("slide_jump")?;

        for (field, value) in [
            ("ground_friction", self.ground_friction),
            ("ground_deceleration", self.ground_deceleration),
            ("ground_speed_cap_mult", self.ground_speed_cap_mult),
            ("air_friction", self.air_friction),
            ("grab_deceleration", self.grab_deceleration),
            ("grab_friction", self.grab_friction),
            ("slide_friction", self.slide_friction),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(field, format!("must be in [0, 1], got {value}")));
            }
        }

        for (field, value) in [
            ("acceleration", self.acceleration),
            ("max_speed", self.max_speed),
            ("air_accel", self.air_accel),
            ("coyote_time", self.coyote_time),
            ("jump_buffer", self.jump_buffer),
            ("grab_speed", self.grab_speed),
            ("min_slide_time", self.min_slide_time),
            ("slide_move_mult", self.slide_move_mult),
            ("stun_deceleration", self.stun_deceleration),
            ("stun_upward_speed", self.stun_upward_speed),
            ("stun_duration", self.stun_duration),
        ] {
            if !(value >= 0.0) || !value.is_finite() {
                return Err(invalid(field, format!("must be finite and non-negative, got {value}")));
            }
        }

        if !(self.grab_duration > 0.0) {
            return Err(invalid("grab_duration", "must be positive"));
        }
        if !(0.0..=180.0).contains(&self.max_slide_bonk_angle) {
            return Err(invalid("max_slide_bonk_angle", "must be in [0, 180] degrees"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(MotionConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config = MotionConfig::from_json_str(
            r#"{ "max_speed": 12.5, "base_jump": { "jump_height": 3.0 }, "body": { "skin_width": 0.02 } }"#,
        )
        .expect("valid partial config");
        assert_eq!(config.max_speed, 12.5);
        assert_eq!(config.base_jump.jump_height, 3.0);
        assert_eq!(
            config.base_jump.time_to_jump_apex,
            JumpData::default().time_to_jump_apex
        );
        assert_eq!(config.body.skin_width, 0.02);
        assert_eq!(config.acceleration, MotionConfig::default().acceleration);
    }

    #[test]
    fn zero_time_to_apex_is_a_startup_error() {
        let err = MotionConfig::from_json_str(r#"{ "slide_jump": { "time_to_jump_apex": 0.0 } }"#)
            .expect_err("zero apex time");
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "slide_jump",
                ..
            }
        ));
    }

    #[test]
    fn friction_out_of_range_is_rejected() {
        let config = MotionConfig {
            air_friction: 1.5,
            ..MotionConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "air_friction",
                ..
            })
        ));
    }

    #[test]
    fn invalid_body_settings_surface_as_body_error() {
        let err = MotionConfig::from_json_str(r#"{ "body": { "max_bounces": 0 } }"#)
            .expect_err("zero bounces");
        assert!(matches!(err, ConfigError::Body(_)));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = MotionConfig::from_json_str("{ not json").expect_err("malformed");
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = MotionConfig::from_path("/nonexistent/motion.json").expect_err("no file");
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn serialized_config_loads_back() {
        let config = MotionConfig {
            coyote_time: 0.25,
            ..MotionConfig::default()
        };
        let json = config.to_json_string().expect("serializable");
        assert_eq!(MotionConfig::from_json_str(&json).expect("valid"), config);
    }
}
