/*!
Motion body settings and tolerances.

These values parameterize the collide-and-slide resolver, the stair step, and the
ground probe. The constants are the defaults; per-actor overrides come from
configuration through [`BodySettings`].

Notes
- Distances are in meters, time in seconds, angles in degrees.
- Favor practical world-space tolerances over machine epsilon for robust behavior.
*/

use serde::{Deserialize, Serialize};

use super::{
    layers::{LayerMask, level_geometry},
    types::Vec3,
};
use crate::error::SettingsError;

/// Separation kept between the body's box and any surface (meters).
/// Too large creates visible gaps; too small risks jitter on contact.
pub const DEFAULT_SKIN: f32 = 0.015;

/// Recursion cap of the collide-and-slide resolver.
/// Higher values help with tight corners at the cost of more queries.
pub const DEFAULT_MAX_BOUNCES: u32 = 5;

/// Downward probe distance of the ground check (meters).
pub const DEFAULT_GROUND_CHECK_DIST: f32 = 0.1;

/// Extra probe distance per unit of speed while grounded; also the downward bias of the
/// settle pass on slopes.
pub const DEFAULT_GROUND_CHECK_SPEED_MULT: f32 = 0.1;

/// Steepest walkable surface (degrees between world-up and the surface normal).
pub const DEFAULT_MAX_SLOPE_ANGLE: f32 = 55.0;

/// Tallest ledge the stair step climbs (meters).
pub const DEFAULT_MAX_STAIR_HEIGHT: f32 = 0.15;

/// Free depth required on top of a stair for the step to be taken (meters).
pub const DEFAULT_MIN_STAIR_WIDTH: f32 = 0.1;

/// Gravity magnitude in meters per second squared (positive value).
pub const GRAVITY_MPS2: f32 = 9.81;

/// Squared lengths at or below this are treated as no movement (m^2).
pub const MIN_MOVE_SQ: f32 = 1.0e-12;

/// Practical small distance for comparisons (meters).
pub const DIST_EPS: f32 = 1.0e-6;

/// Vertical speeds at or below this magnitude count as "not moving vertically" (m/s).
pub const VERTICAL_SPEED_EPS: f32 = 1.0e-4;

/// Per-body tuning of the resolver and the ground probe.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodySettings {
    pub skin_width: f32,
    pub max_bounces: u32,
    pub ground_check_dist: f32,
    pub ground_check_speed_mult: f32,
    /// Degrees.
    pub max_slope_angle: f32,
    pub max_stair_height: f32,
    pub min_stair_width: f32,
    /// Acceleration used by the settle (gravity) pass and jump math.
    pub gravity: Vec3,
    /// Layers the collide-and-slide sweeps and stair raycast collide with.
    pub collision_mask: LayerMask,
    /// Layers counted as ground by the ground probe and stair overlaps.
    pub ground_mask: LayerMask,
}

impl Default for BodySettings {
    fn default() -> Self {
        Self {
            skin_width: DEFAULT_SKIN,
            max_bounces: DEFAULT_MAX_BOUNCES,
            ground_check_dist: DEFAULT_GROUND_CHECK_DIST,
            ground_check_speed_mult: DEFAULT_GROUND_CHECK_SPEED_MULT,
            max_slope_angle: DEFAULT_MAX_SLOPE_ANGLE,
            max_stair_height: DEFAULT_MAX_STAIR_HEIGHT,
            min_stair_width: DEFAULT_MIN_STAIR_WIDTH,
            gravity: Vec3::new(0.0, -GRAVITY_MPS2, 0.0),
            collision_mask: level_geometry(),
            ground_mask: level_geometry(),
        }
    }
}

impl BodySettings {
    /// Reject settings the resolver cannot run with.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.skin_width > 0.0) {
            return Err(SettingsError::SkinWidth(self.skin_width));
        }
        if self.max_bounces == 0 {
            return Err(SettingsError::MaxBounces);
        }
        if !(self.max_slope_angle > 0.0 && self.max_slope_angle <= 90.0) {
            return Err(SettingsError::SlopeAngle(self.max_slope_angle));
        }
        for (name, value) in [
            ("ground_check_dist", self.ground_check_dist),
            ("ground_check_speed_mult", self.ground_check_speed_mult),
            ("max_stair_height", self.max_stair_height),
            ("min_stair_width", self.min_stair_width),
        ] {
            if !(value >= 0.0) || !value.is_finite() {
                return Err(SettingsError::NegativeDistance { name, value });
            }
        }
        if !self.gravity.iter().all(|c| c.is_finite()) {
            return Err(SettingsError::Gravity);
        }
        Ok(())
    }

    /// Validate a box against these settings: it must stay non-degenerate once shrunk by the skin.
    pub fn validate_half_extents(&self, half_extents: Vec3) -> Result<(), SettingsError> {
        if half_extents.iter().any(|&h| !(h > self.skin_width)) {
            return Err(SettingsError::HalfExtents {
                x: half_extents.x,
                y: half_extents.y,
                z: half_extents.z,
                skin: self.skin_width,
            });
        }
        Ok(())
    }
}
