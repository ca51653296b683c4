use nalgebra::{Vector2, Vector3};

use crate::collision::settings::MIN_MOVE_SQ;

/// The horizontal (XZ) part of a vector, with `y` zeroed.
#[inline]
pub fn horizontal(v: Vector3<f32>) -> Vector3<f32> {
    Vector3::new(v.x, 0.0, v.z)
}

/// Unit vector in the direction of `v`, or zero for negligible input.
#[inline]
pub fn normalize_or_zero(v: Vector3<f32>) -> Vector3<f32> {
    if v.norm_squared() <= MIN_MOVE_SQ {
        Vector3::zeros()
    } else {
        v.normalize()
    }
}

/// Project `v` onto the plane with the given normal.
#[inline]
pub fn project_on_plane(v: Vector3<f32>, normal: Vector3<f32>) -> Vector3<f32> {
    let n_sq = normal.norm_squared();
    if n_sq <= MIN_MOVE_SQ {
        return v;
    }
    v - normal * (v.dot(&normal) / n_sq)
}

/// Project `v` onto the plane and rescale the result to `|v|`.
///
/// Returns zero when the projection vanishes (motion straight into the plane).
#[inline]
pub fn project_and_scale(v: Vector3<f32>, normal: Vector3<f32>) -> Vector3<f32> {
    normalize_or_zero(project_on_plane(v, normal)) * v.norm()
}

/// Unsigned angle between two vectors in degrees; 0 if either is negligible.
pub fn angle_deg(a: Vector3<f32>, b: Vector3<f32>) -> f32 {
    let denom = (a.norm_squared() * b.norm_squared()).sqrt();
    if denom <= MIN_MOVE_SQ {
        return 0.0;
    }
    (a.dot(&b) / denom).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Angle between world-up and a surface normal, in degrees.
#[inline]
pub fn slope_angle_deg(normal: Vector3<f32>) -> f32 {
    angle_deg(Vector3::y(), normal)
}

/// Reflect `v` about a unit normal.
#[inline]
pub fn reflect(v: Vector3<f32>, normal: Vector3<f32>) -> Vector3<f32> {
    v - normal * (2.0 * v.dot(&normal))
}

/// Rotate a planar input (x = right, y = forward) into world XZ by a yaw in radians.
///
/// Yaw 0 maps forward to +Z and right to +X.
pub fn planar_to_world(input: Vector2<f32>, yaw: f32) -> Vector3<f32> {
    let (sin, cos) = yaw.sin_cos();
    let forward = Vector3::new(sin, 0.0, cos);
    let right = Vector3::new(cos, 0.0, -sin);
    right * input.x + forward * input.y
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1.0e-5;

    #[test]
    fn project_and_scale_keeps_magnitude() {
        let v = Vector3::new(3.0, -4.0, 0.0);
        let slope = Vector3::new(0.0, 1.0, 1.0).normalize();
        let out = project_and_scale(v, slope);
        assert!((out.norm() - 5.0).abs() < EPS);
        assert!(out.dot(&slope).abs() < EPS);
    }

    #[test]
    fn project_straight_into_plane_vanishes() {
        let out = project_and_scale(Vector3::new(0.0, 0.0, 2.0), -Vector3::z());
        assert_eq!(out, Vector3::zeros());
    }

    #[test]
    fn slope_angles() {
        assert!(slope_angle_deg(Vector3::y()).abs() < EPS);
        assert!((slope_angle_deg(Vector3::x()) - 90.0).abs() < 1.0e-3);
        let tilted = Vector3::new(30f32.to_radians().sin(), 30f32.to_radians().cos(), 0.0);
        assert!((slope_angle_deg(tilted) - 30.0).abs() < 1.0e-3);
    }

    #[test]
    fn reflect_off_wall() {
        let out = reflect(Vector3::new(1.0, 0.0, 1.0), -Vector3::x());
        assert!((out - Vector3::new(-1.0, 0.0, 1.0)).norm() < EPS);
    }

    #[test]
    fn planar_input_follows_yaw() {
        let forward = planar_to_world(Vector2::new(0.0, 1.0), 0.0);
        assert!((forward - Vector3::z()).norm() < EPS);
        let right = planar_to_world(Vector2::new(1.0, 0.0), 0.0);
        assert!((right - Vector3::x()).norm() < EPS);
        let turned = planar_to_world(Vector2::new(0.0, 1.0), std::f32::consts::FRAC_PI_2);
        assert!((turned - Vector3::x()).norm() < EPS);
    }
}
