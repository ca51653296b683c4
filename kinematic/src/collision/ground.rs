use super::{settings::VERTICAL_SPEED_EPS, types::Vec3};
use crate::{body::MotionBody, utils::slope_angle_deg};

impl MotionBody {
    /// Whether the shrunk box at `position` rests on walkable ground.
    ///
    /// Sweeps straight down by `ground_check_dist`, extended by the current speed while
    /// already grounded and not moving vertically so fast runs over bumps stay grounded.
    /// Any walkable hit in reach counts, even behind a nearer steep one.
    pub fn is_grounded_at(&self, position: Vec3) -> bool {
        let s = &self.settings;
        let mut dist = s.ground_check_dist;
        if self.grounded && self.velocity.y.abs() <= VERTICAL_SPEED_EPS {
            dist += self.velocity.norm() * s.ground_check_speed_mult;
        }

        self.world
            .sweep_box_all(
                position,
                self.shrunk_extents(),
                -Vec3::y(),
                dist,
                s.ground_mask,
            )
            .iter()
            .any(|hit| slope_angle_deg(hit.normal) < s.max_slope_angle)
    }

    pub fn is_grounded(&self) -> bool {
        self.is_grounded_at(self.position)
    }

    /// Refresh the grounded flag from the current position.
    pub fn update_grounded(&mut self) -> bool {
        self.grounded = self.is_grounded();
        self.grounded
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::collision::{
        layers::CollisionLayer,
        query::GeometryQuery,
        settings::BodySettings,
        static_world::StaticWorld,
        types::StaticShape,
    };

    const HALF: f32 = 0.5;

    /// Body resting `gap` above a plane through the origin tilted `degrees` about Z.
    fn body_over_slope(degrees: f32, gap: f32, layer: CollisionLayer) -> MotionBody {
        let (sin, cos) = degrees.to_radians().sin_cos();
        let normal = Vec3::new(-sin, cos, 0.0);
        let world = StaticWorld::new().with(StaticShape::plane_through(Vec3::zeros(), normal), layer);
        let settings = BodySettings::default();
        let shrunk = HALF - settings.skin_width;
        // Support radius of the shrunk box along the normal, plus the vertical gap.
        let radius = shrunk * (sin + cos);
        let y = (radius + gap * cos) / cos;
        MotionBody::new(
            Arc::new(world),
            settings,
            Vec3::new(0.0, y, 0.0),
            Vec3::new(HALF, HALF, HALF),
        )
        .expect("valid body")
    }

    #[test]
    fn gentle_slope_is_ground() {
        let mut body = body_over_slope(30.0, 0.05, CollisionLayer::Ground);
        assert!(body.update_grounded());
        assert!(body.grounded);
    }

    #[test]
    fn steep_slope_is_not_ground() {
        let body = body_over_slope(70.0, 0.05, CollisionLayer::Ground);
        assert!(!body.is_grounded());
    }

    #[test]
    fn ground_beyond_probe_is_not_ground() {
        let body = body_over_slope(0.0, 0.5, CollisionLayer::Ground);
        assert!(!body.is_grounded());
    }

    #[test]
    fn probe_only_sees_ground_mask() {
        let body = body_over_slope(0.0, 0.05, CollisionLayer::Trigger);
        assert!(!body.is_grounded());
    }

    #[test]
    fn walkable_floor_behind_nearer_steep_face_is_ground() {
        let settings = BodySettings::default();
        let shrunk = HALF - settings.skin_width;
        let y = shrunk + 0.05;
        // A 70 degree face whose nearest point is 0.01 below the box, ahead of the floor.
        let (sin, cos) = 70.0_f32.to_radians().sin_cos();
        let normal = Vec3::new(-sin, cos, 0.0);
        let dist = cos * y - shrunk * (sin + cos) - 0.01 * cos;
        let world = StaticWorld::new()
            .with(StaticShape::floor(0.0), CollisionLayer::Ground)
            .with(StaticShape::Plane { normal, dist }, CollisionLayer::Ground);

        let earliest = world
            .sweep_box(
                Vec3::new(0.0, y, 0.0),
                Vec3::repeat(shrunk),
                -Vec3::y(),
                settings.ground_check_dist,
                settings.ground_mask,
            )
            .expect("steep face in reach");
        assert_eq!(earliest.normal, normal);

        let body = MotionBody::new(
            Arc::new(world),
            settings,
            Vec3::new(0.0, y, 0.0),
            Vec3::repeat(HALF),
        )
        .expect("valid body");
        assert!(body.is_grounded());
    }

    #[test]
    fn speed_extends_probe_while_grounded() {
        let mut body = body_over_slope(0.0, 0.5, CollisionLayer::Ground);
        body.velocity = Vec3::new(8.0, 0.0, 0.0);
        assert!(!body.is_grounded());
        body.grounded = true;
        assert!(body.is_grounded());
    }
}
