/*!
The motion body: the state a collide-and-slide move operates on.

A body owns its position, velocity and box, the grounded flag and last ground angle, and a
queue of hits recorded while resolving. `move_body` resolves the desired displacement, runs
an optional settle pass onto the ground, commits the position once, and only then delivers
the recorded hits to a listener, in the order they were recorded.
*/

use std::{collections::VecDeque, fmt, sync::Arc};

use crate::{
    collision::{
        query::GeometryQuery,
        resolver::SlideStep,
        settings::{BodySettings, VERTICAL_SPEED_EPS},
        types::{CollisionHit, Vec3},
    },
    error::SettingsError,
};

/// Receives the hits of a move after the position is committed.
pub trait CollisionListener {
    fn on_collision(&mut self, hit: &CollisionHit);
}

impl CollisionListener for Vec<CollisionHit> {
    fn on_collision(&mut self, hit: &CollisionHit) {
        self.push(*hit);
    }
}

impl CollisionListener for () {
    fn on_collision(&mut self, _hit: &CollisionHit) {}
}

impl<F: FnMut(&CollisionHit)> CollisionListener for F {
    fn on_collision(&mut self, hit: &CollisionHit) {
        self(hit)
    }
}

pub struct MotionBody {
    /// Center of the box, world space.
    pub position: Vec3,
    /// World units per second.
    pub velocity: Vec3,
    pub grounded: bool,
    /// Degrees, from the last walkable hit. Reset when a first sweep hits nothing.
    pub ground_angle: f32,
    pub(crate) half_extents: Vec3,
    pub(crate) settings: BodySettings,
    pub(crate) world: Arc<dyn GeometryQuery + Send + Sync>,
    pub(crate) hits: VecDeque<CollisionHit>,
}

impl fmt::Debug for MotionBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MotionBody")
            .field("position", &self.position)
            .field("velocity", &self.velocity)
            .field("grounded", &self.grounded)
            .field("ground_angle", &self.ground_angle)
            .field("half_extents", &self.half_extents)
            .finish_non_exhaustive()
    }
}

impl MotionBody {
    pub fn new(
        world: Arc<dyn GeometryQuery + Send + Sync>,
        settings: BodySettings,
        position: Vec3,
        half_extents: Vec3,
    ) -> Result<Self, SettingsError> {
        settings.validate()?;
        settings.validate_half_extents(half_extents)?;
        Ok(Self {
            position,
            velocity: Vec3::zeros(),
            grounded: false,
            ground_angle: 0.0,
            half_extents,
            settings,
            world,
            hits: VecDeque::new(),
        })
    }

    pub fn settings(&self) -> &BodySettings {
        &self.settings
    }

    pub fn half_extents(&self) -> Vec3 {
        self.half_extents
    }

    pub fn world(&self) -> &Arc<dyn GeometryQuery + Send + Sync> {
        &self.world
    }

    /// The box used for every query: the full box shrunk by the skin width on each side.
    #[inline]
    pub fn shrunk_extents(&self) -> Vec3 {
        self.half_extents.add_scalar(-self.settings.skin_width)
    }

    /// Resolve `delta` against the world, settle onto the ground if requested, commit the
    /// position, then drain recorded hits to `listener`. Returns the applied displacement.
    pub fn move_body(
        &mut self,
        delta: Vec3,
        gravity_pass: bool,
        dt: f32,
        listener: &mut impl CollisionListener,
    ) -> Vec3 {
        let mut total = self.collide_and_slide(SlideStep::new(delta, self.position), dt);

        if gravity_pass && self.is_grounded_at(self.position + total) {
            let gravity_delta = self.settings.gravity * dt;
            let mut settle = gravity_delta;
            if self.grounded
                && self.velocity.y.abs() <= VERTICAL_SPEED_EPS
                && self.ground_angle > 0.1
            {
                // Keeps the body glued to slopes it runs across.
                settle.y -= self.velocity.norm() * self.settings.ground_check_speed_mult;
            }
            total += self.collide_and_slide(
                SlideStep {
                    delta: settle,
                    position: self.position + total,
                    depth: 0,
                    gravity_pass: true,
                    original: gravity_delta,
                },
                dt,
            );
        }

        self.position += total;

        for hit in self.hits.drain(..) {
            listener.on_collision(&hit);
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{
        layers::CollisionLayer,
        static_world::StaticWorld,
        types::StaticShape,
    };

    const DT: f32 = 0.02;
    const EPS: f32 = 1.0e-4;

    fn body_in(world: StaticWorld, position: Vec3) -> MotionBody {
        MotionBody::new(
            Arc::new(world),
            BodySettings::default(),
            position,
            Vec3::new(0.5, 0.5, 0.5),
        )
        .expect("valid body")
    }

    fn floor() -> StaticWorld {
        StaticWorld::new().with(StaticShape::floor(0.0), CollisionLayer::Ground)
    }

    #[test]
    fn rejects_invalid_settings() {
        let settings = BodySettings {
            skin_width: 0.0,
            ..BodySettings::default()
        };
        let result = MotionBody::new(
            Arc::new(StaticWorld::new()),
            settings,
            Vec3::zeros(),
            Vec3::new(0.5, 0.5, 0.5),
        );
        assert_eq!(result.err(), Some(SettingsError::SkinWidth(0.0)));
    }

    #[test]
    fn free_move_commits_full_delta() {
        let mut body = body_in(StaticWorld::new(), Vec3::new(0.0, 5.0, 0.0));
        let mut hits = Vec::new();
        let applied = body.move_body(Vec3::new(0.1, -0.2, 0.3), true, DT, &mut hits);
        assert_eq!(applied, Vec3::new(0.1, -0.2, 0.3));
        assert_eq!(body.position, Vec3::new(0.1, 4.8, 0.3));
        assert!(hits.is_empty());
    }

    #[test]
    fn settle_pass_rests_body_on_floor() {
        // Shrunk box hovers 0.05 above the floor: within the ground probe.
        let mut body = body_in(floor(), Vec3::new(0.0, 0.55, 0.0));
        body.grounded = true;
        let mut hits = Vec::new();
        body.move_body(Vec3::new(0.1, 0.0, 0.0), true, DT, &mut hits);
        // Settle leaves one skin width between the shrunk box and the floor.
        assert!((body.position.y - 0.5).abs() < EPS);
        assert!((body.position.x - 0.1).abs() < EPS);
        // A gravity pass never records walkable hits.
        assert!(hits.is_empty());
    }

    #[test]
    fn no_settle_without_gravity_pass() {
        let mut body = body_in(floor(), Vec3::new(0.0, 0.55, 0.0));
        body.grounded = true;
        body.move_body(Vec3::new(0.1, 0.0, 0.0), false, DT, &mut ());
        assert!((body.position.y - 0.55).abs() < EPS);
    }

    #[test]
    fn hits_are_delivered_after_commit_in_order() {
        let world = floor().with(
            StaticShape::cuboid_from_bounds(Vec3::new(1.0, 0.0, -5.0), Vec3::new(2.0, 3.0, 5.0)),
            CollisionLayer::Environment,
        );
        let mut body = body_in(world, Vec3::new(0.4, 1.0, 0.0));
        let mut seen = Vec::new();
        let delta = Vec3::new(0.2, -0.6, 0.0);
        let mut listener = |hit: &CollisionHit| seen.push(hit.normal);
        body.move_body(delta, false, DT, &mut listener);

        assert!(!seen.is_empty());
        for n in &seen {
            assert!((n - Vec3::y()).norm() < EPS || (n + Vec3::x()).norm() < EPS);
        }
        assert!(body.hits.is_empty());
    }

    #[test]
    fn hit_carries_original_delta_as_impact_velocity() {
        let mut body = body_in(floor(), Vec3::new(0.0, 1.0, 0.0));
        let delta = Vec3::new(1.0, -1.0, 0.0);
        let mut hits = Vec::new();
        body.move_body(delta, false, DT, &mut hits);
        assert_eq!(hits.len(), 1);
        assert!((hits[0].impact_velocity - delta / DT).norm() < EPS);
    }
}
