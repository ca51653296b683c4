//! Deterministic analytic geometry: infinite planes and axis-aligned boxes tagged with layers.
//!
//! Used by tests and tools that want exact, engine-free answers. Queries are a linear scan,
//! which is fine for the handful of shapes a test level contains.

use super::{
    layers::{CollisionLayer, LayerMask},
    narrow_phase,
    query::GeometryQuery,
    types::{StaticId, StaticShape, SweepHit, Vec3},
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StaticEntry {
    pub id: StaticId,
    pub shape: StaticShape,
    pub layers: LayerMask,
}

#[derive(Clone, Debug, Default)]
pub struct StaticWorld {
    entries: Vec<StaticEntry>,
    next_id: StaticId,
}

impl StaticWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a shape on the given layers and return its id.
    pub fn insert(&mut self, shape: StaticShape, layers: LayerMask) -> StaticId {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(StaticEntry { id, shape, layers });
        id
    }

    /// Builder-style insert on a single layer.
    pub fn with(mut self, shape: StaticShape, layer: CollisionLayer) -> Self {
        self.insert(shape, layer.as_mask());
        self
    }

    pub fn entries(&self) -> &[StaticEntry] {
        &self.entries
    }

    fn visible(&self, mask: LayerMask) -> impl Iterator<Item = &StaticEntry> {
        self.entries.iter().filter(move |e| e.layers.intersects(mask))
    }
}

impl GeometryQuery for StaticWorld {
    fn sweep_box(
        &self,
        origin: Vec3,
        half_extents: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<SweepHit> {
        self.visible(mask)
            .filter_map(|e| {
                narrow_phase::sweep_box_against(
                    origin,
                    half_extents,
                    direction,
                    max_distance,
                    &e.shape,
                )
            })
            // Earliest wins; ties keep insertion order.
            .fold(None, |best: Option<SweepHit>, hit| match best {
                Some(b) if b.distance <= hit.distance => Some(b),
                _ => Some(hit),
            })
    }

    fn sweep_box_all(
        &self,
        origin: Vec3,
        half_extents: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Vec<SweepHit> {
        let mut hits: Vec<SweepHit> = self
            .visible(mask)
            .filter_map(|e| {
                narrow_phase::sweep_box_against(
                    origin,
                    half_extents,
                    direction,
                    max_distance,
                    &e.shape,
                )
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    fn overlap_box(&self, center: Vec3, half_extents: Vec3, mask: LayerMask) -> Vec<StaticId> {
        self.visible(mask)
            .filter(|e| narrow_phase::box_overlaps(center, half_extents, &e.shape))
            .map(|e| e.id)
            .collect()
    }

    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32, mask: LayerMask) -> bool {
        self.visible(mask)
            .any(|e| narrow_phase::ray_hits(origin, direction, max_distance, &e.shape))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level() -> StaticWorld {
        StaticWorld::new()
            .with(StaticShape::floor(0.0), CollisionLayer::Ground)
            .with(
                StaticShape::cuboid_from_bounds(
                    Vec3::new(2.0, 0.0, -1.0),
                    Vec3::new(3.0, 3.0, 1.0),
                ),
                CollisionLayer::Environment,
            )
    }

    #[test]
    fn sweep_returns_earliest_hit() {
        let world = level();
        let hit = world
            .sweep_box(
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(0.5, 0.5, 0.5),
                Vec3::new(1.0, -1.0, 0.0).normalize(),
                10.0,
                LayerMask::all(),
            )
            .expect("floor and wall ahead");
        // Floor first: 0.5 down at 45 degrees.
        assert!((hit.distance - 0.5 * std::f32::consts::SQRT_2).abs() < 1.0e-5);
        assert_eq!(hit.normal, Vec3::y());
    }

    #[test]
    fn sweep_all_reports_every_shape_in_order() {
        let world = level();
        let hits = world.sweep_box_all(
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.5, 0.5, 0.5),
            Vec3::new(1.0, -0.2, 0.0).normalize(),
            5.0,
            LayerMask::all(),
        );
        assert_eq!(hits.len(), 2);
        // The wall is reached before the shallow descent meets the floor.
        assert_eq!(hits[0].normal, -Vec3::x());
        assert_eq!(hits[1].normal, Vec3::y());
        assert!(hits[0].distance < hits[1].distance);
    }

    #[test]
    fn mask_filters_layers() {
        let world = level();
        let origin = Vec3::new(0.0, 1.0, 0.0);
        let half = Vec3::new(0.5, 0.5, 0.5);
        assert!(
            world
                .sweep_box(origin, half, Vec3::x(), 10.0, CollisionLayer::Ground.as_mask())
                .is_none()
        );
        let wall = world
            .sweep_box(origin, half, Vec3::x(), 10.0, CollisionLayer::Environment.as_mask())
            .expect("wall on environment layer");
        assert!((wall.distance - 1.5).abs() < 1.0e-5);
    }

    #[test]
    fn overlap_reports_ids() {
        let world = level();
        let ids = world.overlap_box(
            Vec3::new(2.0, 0.2, 0.0),
            Vec3::new(0.5, 0.5, 0.5),
            LayerMask::all(),
        );
        assert_eq!(ids, vec![0, 1]);
        assert!(
            world
                .overlap_box(Vec3::new(0.0, 5.0, 0.0), Vec3::new(0.5, 0.5, 0.5), LayerMask::all())
                .is_empty()
        );
    }

    #[test]
    fn raycast_against_wall() {
        let world = level();
        let origin = Vec3::new(0.0, 1.0, 0.0);
        assert!(world.raycast(origin, Vec3::x(), 2.5, LayerMask::all()));
        assert!(!world.raycast(origin, Vec3::x(), 1.5, LayerMask::all()));
    }
}
