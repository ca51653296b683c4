//! The geometry query capability the resolver is written against.

use super::{
    layers::LayerMask,
    types::{StaticId, SweepHit, Vec3},
};

/// Read-only queries against static collision geometry.
///
/// Boxes are axis-aligned (identity rotation) and given by center and half-extents.
/// Every query only considers colliders whose layers intersect `mask`.
pub trait GeometryQuery {
    /// Sweep a box from `origin` along the unit `direction` for up to `max_distance`, returning
    /// the earliest hit. The hit normal faces against `direction`.
    fn sweep_box(
        &self,
        origin: Vec3,
        half_extents: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<SweepHit>;

    /// Like [`sweep_box`](Self::sweep_box), but one hit per collider in reach, earliest first.
    fn sweep_box_all(
        &self,
        origin: Vec3,
        half_extents: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Vec<SweepHit>;

    /// Ids of every collider overlapping the box.
    fn overlap_box(&self, center: Vec3, half_extents: Vec3, mask: LayerMask) -> Vec<StaticId>;

    /// True if a ray from `origin` along the unit `direction` hits anything within `max_distance`.
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32, mask: LayerMask) -> bool;
}
