//! Stair stepping for grounded bodies that run into a low ledge.
//!
//! An approximation rather than exact geometry: ground must be present at foot height ahead,
//! the band above the stair height ahead must be free, and the lip must have at least
//! `min_stair_width` of free depth. Then the body re-sweeps from one stair height up.

use super::types::{SweepHit, Vec3};
use crate::body::MotionBody;

/// Replacement snap (already raised by the stair height) and the hit it was derived from.
#[derive(Clone, Copy, Debug)]
pub(crate) struct StairStep {
    pub snap: Vec3,
    pub hit: SweepHit,
}

impl MotionBody {
    pub(crate) fn step_up(
        &self,
        hit: &SweepHit,
        position: Vec3,
        delta: Vec3,
        snap: Vec3,
    ) -> Option<StairStep> {
        let s = &self.settings;
        let ext = self.shrunk_extents();
        let bottom = position.y - ext.y;
        if hit.point.y >= bottom + s.max_stair_height {
            return None;
        }

        let ahead = position + delta;
        let mut foot = ahead;
        foot.y -= ext.y - s.max_stair_height * 0.5 - s.skin_width * 2.0;
        let mut band = ahead;
        band.y += s.max_stair_height * 0.5 + s.skin_width * 2.0;

        let band_half = Vec3::new(ext.x, (ext.y - s.max_stair_height).max(0.0), ext.z);
        if !self.world.overlap_box(band, band_half, s.ground_mask).is_empty() {
            return None;
        }
        let foot_half = Vec3::new(ext.x, s.max_stair_height, ext.z);
        if self.world.overlap_box(foot, foot_half, s.ground_mask).is_empty() {
            return None;
        }

        let mut lip = hit.point;
        lip.y = bottom + s.max_stair_height + s.skin_width;
        if self
            .world
            .raycast(lip, -hit.normal, s.min_stair_width, s.collision_mask)
        {
            return None;
        }

        let len = delta.norm();
        let dir = delta / len;
        let raised = position + Vec3::y() * s.max_stair_height;
        let (mut snap, hit) = match self.world.sweep_box(
            raised,
            ext,
            dir,
            len + s.skin_width,
            s.collision_mask,
        ) {
            Some(raised_hit) => (
                dir * (raised_hit.distance - s.skin_width).max(0.0),
                raised_hit,
            ),
            None => (snap + delta * 0.5, *hit),
        };
        snap.y += s.max_stair_height;

        log::trace!("step_up: climbing {:.3} at {:?}", s.max_stair_height, hit.point);
        Some(StairStep { snap, hit })
    }
}
