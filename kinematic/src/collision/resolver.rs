/*!
Recursive collide-and-slide.

Each call sweeps the shrunk box along the desired displacement. On a hit it snaps to one skin
width off the surface and recurses with the leftover:
- walkable surfaces project the leftover onto the slope, keeping its length (a gravity pass
  stops there instead, it only settles);
- walls and steep slopes first try a stair step while grounded, otherwise they slide the
  horizontal part of the leftover, damped by how head-on the original motion was.

Recursion stops with zero displacement at `max_bounces`; the remaining leftover is dropped.
*/

use super::{
    settings::{MIN_MOVE_SQ, VERTICAL_SPEED_EPS},
    types::{CollisionHit, Vec3},
};
use crate::{
    body::MotionBody,
    utils::{horizontal, normalize_or_zero, project_and_scale, slope_angle_deg},
};

/// One level of the collide-and-slide recursion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlideStep {
    /// Displacement still to resolve at this level.
    pub delta: Vec3,
    /// Box center this level sweeps from.
    pub position: Vec3,
    pub depth: u32,
    /// Settle pass: walkable hits end the recursion and are not recorded.
    pub gravity_pass: bool,
    /// Displacement the whole resolve started with.
    pub original: Vec3,
}

impl SlideStep {
    /// Top-level step of a regular (non-gravity) resolve.
    pub fn new(delta: Vec3, position: Vec3) -> Self {
        Self {
            delta,
            position,
            depth: 0,
            gravity_pass: false,
            original: delta,
        }
    }

    fn next(self, leftover: Vec3, snap: Vec3) -> Self {
        Self {
            delta: leftover,
            position: self.position + snap,
            depth: self.depth + 1,
            ..self
        }
    }
}

impl MotionBody {
    /// Resolve one displacement against the world without moving the body.
    ///
    /// Updates the ground angle and, on wall hits, the horizontal velocity. Hits are queued
    /// and delivered by [`MotionBody::move_body`].
    pub fn collide_and_slide(&mut self, step: SlideStep, dt: f32) -> Vec3 {
        let settings = self.settings;
        if step.depth >= settings.max_bounces {
            log::trace!(
                "collide_and_slide: bounce budget exhausted, dropping {:?}",
                step.delta
            );
            return Vec3::zeros();
        }

        let len_sq = step.delta.norm_squared();
        if len_sq <= MIN_MOVE_SQ {
            return step.delta;
        }
        let len = len_sq.sqrt();
        let dir = step.delta / len;
        let skin = settings.skin_width;
        let extents = self.shrunk_extents();

        let Some(mut hit) = self.world.sweep_box(
            step.position,
            extents,
            dir,
            len + skin,
            settings.collision_mask,
        ) else {
            if step.delta == step.original {
                self.ground_angle = 0.0;
            }
            return step.delta;
        };

        let mut snap = dir * (hit.distance - skin);
        let mut leftover = step.delta - snap;
        if snap.norm() <= skin {
            snap = Vec3::zeros();
        }

        let inv_dt = if dt > 0.0 { dt.recip() } else { 0.0 };
        let angle = slope_angle_deg(hit.normal);

        if angle <= settings.max_slope_angle {
            self.ground_angle = angle;
            if step.gravity_pass {
                return snap;
            }
            leftover = project_and_scale(leftover, hit.normal);
        } else {
            let scale = 1.0
                - normalize_or_zero(horizontal(hit.normal))
                    .dot(&-normalize_or_zero(horizontal(step.original)));

            let mut stair_found = false;
            if self.grounded && self.velocity.y.abs() <= VERTICAL_SPEED_EPS && !step.gravity_pass
            {
                if let Some(stair) = self.step_up(&hit, step.position, step.delta, snap) {
                    snap = stair.snap;
                    hit = stair.hit;
                    stair_found = true;
                }
                leftover = project_and_scale(horizontal(leftover), horizontal(hit.normal)) * scale;
            } else {
                let slid = project_and_scale(leftover, hit.normal) * scale;
                leftover.x = slid.x;
                leftover.z = slid.z;
            }

            if !stair_found {
                // Stop feeding velocity into the wall next tick.
                self.velocity.x = leftover.x * inv_dt;
                self.velocity.z = leftover.z * inv_dt;
            }
        }

        log::trace!(
            "collide_and_slide: depth {} hit {:?} at {:.4}",
            step.depth,
            hit.normal,
            hit.distance
        );
        self.hits
            .push_back(CollisionHit::from_sweep(hit, step.original * inv_dt));

        snap + self.collide_and_slide(step.next(leftover, snap), dt)
    }
}
