/*!
Analytic narrow-phase queries between an axis-aligned box and a single [`StaticShape`].

These back [`StaticWorld`](super::static_world::StaticWorld); the Rapier-backed world uses
parry through the query pipeline instead.

Conventions
- Sweeps move a box of half-extents `h` from center `c` along a unit direction `u`.
- Returned normals face against `u`.
- Touching is not overlapping: all overlap and slab tests use strict inequalities.
- A box that already overlaps a shape reports a zero-distance hit only when moving into it.
*/

use super::{
    settings::DIST_EPS,
    types::{StaticShape, SweepHit, Vec3},
};

/// Sweep a box against one static shape.
pub fn sweep_box_against(
    center: Vec3,
    half_extents: Vec3,
    direction: Vec3,
    max_distance: f32,
    shape: &StaticShape,
) -> Option<SweepHit> {
    match *shape {
        StaticShape::Plane { normal, dist } => {
            sweep_box_plane(center, half_extents, direction, max_distance, normal, dist)
        }
        StaticShape::Cuboid {
            center: box_center,
            half_extents: box_half,
        } => sweep_box_aabb(
            center,
            half_extents,
            direction,
            max_distance,
            box_center,
            box_half,
        ),
    }
}

/// Strict overlap between a box and one static shape.
pub fn box_overlaps(center: Vec3, half_extents: Vec3, shape: &StaticShape) -> bool {
    match *shape {
        StaticShape::Plane { normal, dist } => {
            plane_separation(center, half_extents, normal, dist) < 0.0
        }
        StaticShape::Cuboid {
            center: box_center,
            half_extents: box_half,
        } => (0..3).all(|i| (center[i] - box_center[i]).abs() < half_extents[i] + box_half[i]),
    }
}

/// Ray test against one static shape. Rays starting inside a shape count as hits.
pub fn ray_hits(origin: Vec3, direction: Vec3, max_distance: f32, shape: &StaticShape) -> bool {
    match *shape {
        StaticShape::Plane { normal, dist } => {
            let s0 = normal.dot(&origin) - dist;
            if s0 <= 0.0 {
                return true;
            }
            let vn = normal.dot(&direction);
            vn < 0.0 && s0 / -vn <= max_distance
        }
        StaticShape::Cuboid {
            center,
            half_extents,
        } => slab_entry(origin, direction, center, half_extents)
            .is_some_and(|(t_enter, t_exit, _)| t_exit > 0.0 && t_enter <= max_distance),
    }
}

/// Signed gap between the box's lowest support point (along `-normal`) and the plane.
#[inline]
fn plane_separation(center: Vec3, half_extents: Vec3, normal: Vec3, dist: f32) -> f32 {
    let radius = normal.abs().dot(&half_extents);
    normal.dot(&center) - dist - radius
}

fn sweep_box_plane(
    center: Vec3,
    half_extents: Vec3,
    direction: Vec3,
    max_distance: f32,
    normal: Vec3,
    dist: f32,
) -> Option<SweepHit> {
    let vn = normal.dot(&direction);
    if vn >= 0.0 {
        // Moving parallel to or away from the surface.
        return None;
    }

    let s0 = plane_separation(center, half_extents, normal, dist);
    let t = (s0 / -vn).max(0.0);
    if t > max_distance {
        return None;
    }

    let moved = center + direction * t;
    let point = moved - normal * (normal.dot(&moved) - dist);
    Some(SweepHit {
        point,
        normal,
        distance: t,
    })
}

fn sweep_box_aabb(
    center: Vec3,
    half_extents: Vec3,
    direction: Vec3,
    max_distance: f32,
    box_center: Vec3,
    box_half: Vec3,
) -> Option<SweepHit> {
    let expanded = half_extents + box_half;

    if box_overlaps(center, half_extents, &StaticShape::Cuboid {
        center: box_center,
        half_extents: box_half,
    }) {
        // Already overlapping: resolve along the axis of least penetration.
        let offset = center - box_center;
        let axis = (0..3)
            .min_by(|&a, &b| {
                let pa = expanded[a] - offset[a].abs();
                let pb = expanded[b] - offset[b].abs();
                pa.total_cmp(&pb)
            })
            .unwrap_or(1);
        let mut normal = Vec3::zeros();
        normal[axis] = if offset[axis] >= 0.0 { 1.0 } else { -1.0 };
        if normal.dot(&direction) >= 0.0 {
            return None;
        }
        return Some(SweepHit {
            point: contact_point(center, half_extents, box_center, box_half, normal, axis),
            normal,
            distance: 0.0,
        });
    }

    let (t_enter, t_exit, axis) = slab_entry(center, direction, box_center, expanded)?;
    if t_exit <= 0.0 || t_enter < 0.0 || t_enter > max_distance {
        return None;
    }

    let mut normal = Vec3::zeros();
    normal[axis] = -direction[axis].signum();
    let moved = center + direction * t_enter;
    Some(SweepHit {
        point: contact_point(moved, half_extents, box_center, box_half, normal, axis),
        normal,
        distance: t_enter,
    })
}

/// Slab test of a ray against an AABB. Returns entry distance, exit distance and entry axis.
fn slab_entry(
    origin: Vec3,
    direction: Vec3,
    box_center: Vec3,
    box_half: Vec3,
) -> Option<(f32, f32, usize)> {
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    let mut axis = 0;

    for i in 0..3 {
        let lo = box_center[i] - box_half[i];
        let hi = box_center[i] + box_half[i];
        if direction[i].abs() <= DIST_EPS {
            if origin[i] <= lo || origin[i] >= hi {
                return None;
            }
            continue;
        }
        let inv = 1.0 / direction[i];
        let t1 = (lo - origin[i]) * inv;
        let t2 = (hi - origin[i]) * inv;
        let (near, far) = if t1 < t2 { (t1, t2) } else { (t2, t1) };
        if near > t_enter {
            t_enter = near;
            axis = i;
        }
        t_exit = t_exit.min(far);
    }

    (t_enter < t_exit).then_some((t_enter, t_exit, axis))
}

/// Contact on the static box face: the face coordinate on `axis`, and the middle of the
/// overlap between both boxes on the other axes.
fn contact_point(
    center: Vec3,
    half_extents: Vec3,
    box_center: Vec3,
    box_half: Vec3,
    normal: Vec3,
    axis: usize,
) -> Vec3 {
    let mut point = Vec3::zeros();
    for i in 0..3 {
        if i == axis {
            point[i] = box_center[i] + normal[i] * box_half[i];
        } else {
            let lo = (center[i] - half_extents[i]).max(box_center[i] - box_half[i]);
            let hi = (center[i] + half_extents[i]).min(box_center[i] + box_half[i]);
            point[i] = (lo + hi) * 0.5;
        }
    }
    point
}
