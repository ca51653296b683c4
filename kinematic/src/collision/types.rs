/*!
Core collision types and math aliases shared by the collision submodules.

This module contains no algorithms. It defines the data exchanged between:
- the geometry query capability (`query`), answered by `static_world` or `rapier_world`
- the collide-and-slide resolver and its stair step
- ground detection
- the motion body, which turns per-sweep hits into collision events

Notes
- Sweep hits are ephemeral: they live for one resolver call.
- Collision hits are what a body reports to its listeners after a move; they carry the
  velocity that produced the contact so listeners can reason about impact angles.
*/

use nalgebra as na;

/// Common math aliases for clarity and consistency.
pub type Vec3 = na::Vector3<f32>;
pub type Quat = na::UnitQuaternion<f32>;
pub type Iso = na::Isometry3<f32>;

/// Identifier of a static collider as reported by overlap queries.
pub type StaticId = u32;

/// Result of sweeping a box through static geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SweepHit {
    /// World-space contact point.
    pub point: Vec3,
    /// World-space unit surface normal, facing against the sweep direction.
    pub normal: Vec3,
    /// Distance travelled along the (unit) sweep direction before contact.
    pub distance: f32,
}

/// A contact recorded during a move, delivered to collision listeners once the move commits.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollisionHit {
    pub point: Vec3,
    pub normal: Vec3,
    pub distance: f32,
    /// The original desired displacement of the move divided by the tick duration.
    pub impact_velocity: Vec3,
}

impl CollisionHit {
    #[inline]
    pub fn from_sweep(hit: SweepHit, impact_velocity: Vec3) -> Self {
        Self {
            point: hit.point,
            normal: hit.normal,
            distance: hit.distance,
            impact_velocity,
        }
    }
}

/// Static collision shapes understood by the analytic world.
///
/// - Plane: infinite solid half-space below the plane, `normal ⋅ x <= dist`.
/// - Cuboid: axis-aligned box given by its center and half-extents.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StaticShape {
    Plane {
        /// World-space unit normal of the plane.
        normal: Vec3,
        /// Plane offset along the normal, i.e., normal ⋅ x = dist.
        dist: f32,
    },
    Cuboid {
        center: Vec3,
        half_extents: Vec3,
    },
}

impl StaticShape {
    /// Horizontal plane at height `y` facing up.
    #[inline]
    pub fn floor(y: f32) -> Self {
        StaticShape::Plane {
            normal: Vec3::y(),
            dist: y,
        }
    }

    /// Plane through `point`, normalizing `normal`.
    #[inline]
    pub fn plane_through(point: Vec3, normal: Vec3) -> Self {
        let n = normal.try_normalize(1.0e-6).unwrap_or_else(Vec3::y);
        StaticShape::Plane {
            normal: n,
            dist: n.dot(&point),
        }
    }

    /// Axis-aligned box from its min and max corners.
    #[inline]
    pub fn cuboid_from_bounds(min: Vec3, max: Vec3) -> Self {
        StaticShape::Cuboid {
            center: (min + max) * 0.5,
            half_extents: (max - min) * 0.5,
        }
    }
}
