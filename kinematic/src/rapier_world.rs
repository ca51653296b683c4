//! Rapier-backed geometry queries for immutable level geometry.
//!
//! Builds an in-memory Rapier scene once from a set of static collider definitions and answers
//! [`GeometryQuery`] calls through Rapier's query pipeline.
//!
//! Design goals
//! - Deterministic: given the same inputs (sorted by `id`), build identical in-memory sets.
//! - Query-only: no dynamics ever run; statics do not move after construction.
//! - Layer filtering: each collider carries its id and layers in `user_data`, and every query
//!   filters on them with a predicate.

pub use rapier3d;

use std::f32::consts::PI;

use rapier3d::{
    na::{Translation3, UnitQuaternion},
    parry::{
        query::{ShapeCastHit, ShapeCastOptions, cast_shapes},
        shape::Cuboid,
    },
    prelude::*,
};

use crate::collision::{
    layers::LayerMask,
    query::GeometryQuery,
    static_world::StaticWorld,
    types::{StaticId, StaticShape, SweepHit, Vec3},
};

/// Canonical definition of an immutable world collider.
///
/// Conventions
/// - Units are meters.
/// - Rotation is a unit quaternion.
/// - For planes, the normal is derived from the pose (`normal = rotation * +Y`) and
///   `dist = dot(normal, translation) + offset_along_normal`.
#[derive(Clone, Debug)]
pub struct WorldStaticDef {
    /// Stable unique identifier, reported by overlap queries and used for insertion order.
    pub id: StaticId,
    pub translation: Vector<f32>,
    pub rotation: UnitQuaternion<f32>,
    pub shape: ColliderShapeDef,
    pub layers: LayerMask,
}

/// Supported static collider shapes.
#[derive(Clone, Debug)]
pub enum ColliderShapeDef {
    /// Infinite plane (half-space below it is solid).
    Plane { offset_along_normal: f32 },
    /// Oriented cuboid.
    Cuboid { half_extents: Vector<f32> },
    Sphere { radius: f32 },
    CapsuleY { radius: f32, half_height: f32 },
    CylinderY { radius: f32, half_height: f32 },
    /// `border_radius` rounds all edges and corners.
    RoundCuboid {
        half_extents: Vector<f32>,
        border_radius: f32,
    },
}

impl WorldStaticDef {
    /// Convert one analytic entry: planes keep their normal and offset, boxes stay axis-aligned.
    pub fn from_static(id: StaticId, shape: &StaticShape, layers: LayerMask) -> Self {
        match *shape {
            StaticShape::Plane { normal, dist } => Self {
                id,
                translation: Vector::zeros(),
                rotation: UnitQuaternion::rotation_between(&Vector::y(), &normal)
                    .unwrap_or_else(|| UnitQuaternion::from_axis_angle(&Vector::x_axis(), PI)),
                shape: ColliderShapeDef::Plane {
                    offset_along_normal: dist,
                },
                layers,
            },
            StaticShape::Cuboid {
                center,
                half_extents,
            } => Self {
                id,
                translation: center,
                rotation: UnitQuaternion::identity(),
                shape: ColliderShapeDef::Cuboid { half_extents },
                layers,
            },
        }
    }
}

/// Pack id and layers into collider user data: id in the low 32 bits, layers above.
#[inline]
fn encode_user_data(id: StaticId, layers: LayerMask) -> u128 {
    id as u128 | (layers.bits as u128) << 32
}

#[inline]
fn decode_id(user_data: u128) -> StaticId {
    user_data as u32
}

#[inline]
fn decode_layers(user_data: u128) -> LayerMask {
    LayerMask::new((user_data >> 32) as u32)
}

/// In-memory Rapier structures needed for scene queries against a static world.
pub struct RapierQueryWorld {
    pub bodies: RigidBodySet,
    pub colliders: ColliderSet,
    pub broad_phase: BroadPhaseBvh,
    pub narrow_phase: NarrowPhase,
}

impl RapierQueryWorld {
    /// Build a query world from static collider definitions.
    ///
    /// The input is sorted by `id` before insertion. NaN or non-unit rotations should be
    /// rejected by the caller.
    pub fn build(mut defs: Vec<WorldStaticDef>) -> Self {
        defs.sort_by_key(|d| d.id);

        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();

        for def in defs.iter() {
            let iso = Isometry::from_parts(Translation3::from(def.translation), def.rotation);
            let rb_handle = bodies.insert(RigidBodyBuilder::fixed().pose(iso).build());
            colliders.insert_with_parent(collider_from_def(def), rb_handle, &mut bodies);
        }

        // Collision detection only: refreshes the broad-phase BVH so queries can run.
        let mut broad_phase = BroadPhaseBvh::new();
        let mut narrow_phase = NarrowPhase::new();
        let mut collision_pipeline = CollisionPipeline::new();
        collision_pipeline.step(
            0.0,
            &mut broad_phase,
            &mut narrow_phase,
            &mut bodies,
            &mut colliders,
            &(),
            &(),
        );

        log::info!("built rapier query world with {} statics", defs.len());

        Self {
            bodies,
            colliders,
            broad_phase,
            narrow_phase,
        }
    }

    /// Mirror an analytic world, keeping ids and layers.
    pub fn from_static_world(world: &StaticWorld) -> Self {
        Self::build(
            world
                .entries()
                .iter()
                .map(|e| WorldStaticDef::from_static(e.id, &e.shape, e.layers))
                .collect(),
        )
    }

    /// Borrowed `QueryPipeline` view; use it within the scope of the borrow.
    pub fn query_pipeline<'a>(&'a self, filter: QueryFilter<'a>) -> QueryPipeline<'a> {
        self.broad_phase.as_query_pipeline(
            self.narrow_phase.query_dispatcher(),
            &self.bodies,
            &self.colliders,
            filter,
        )
    }

    fn with_mask<R>(&self, mask: LayerMask, f: impl FnOnce(&QueryPipeline<'_>) -> R) -> R {
        let in_mask =
            |_: ColliderHandle, co: &Collider| decode_layers(co.user_data).intersects(mask);
        let pipeline = self.query_pipeline(QueryFilter::default().predicate(&in_mask));
        f(&pipeline)
    }
}

impl GeometryQuery for RapierQueryWorld {
    fn sweep_box(
        &self,
        origin: Vec3,
        half_extents: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<SweepHit> {
        let shape = Cuboid::new(half_extents);
        let pose = Isometry::translation(origin.x, origin.y, origin.z);
        // A zero-distance hit is only reported when moving into an overlapped shape.
        let mut opts = ShapeCastOptions::with_max_time_of_impact(max_distance);
        opts.stop_at_penetration = false;

        let (_handle, hit) =
            self.with_mask(mask, |qp| qp.cast_shape(&pose, &direction, &shape, opts))?;
        Some(sweep_hit(origin, direction, &hit))
    }

    fn sweep_box_all(
        &self,
        origin: Vec3,
        half_extents: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Vec<SweepHit> {
        let shape = Cuboid::new(half_extents);
        let pose = Isometry::translation(origin.x, origin.y, origin.z);
        let mut opts = ShapeCastOptions::with_max_time_of_impact(max_distance);
        opts.stop_at_penetration = false;

        // Statics never move, so each collider is cast against on its own.
        let mut hits: Vec<SweepHit> = self
            .colliders
            .iter()
            .filter(|(_, co)| decode_layers(co.user_data).intersects(mask))
            .filter_map(|(_, co)| {
                cast_shapes(
                    &pose,
                    &direction,
                    &shape,
                    co.position(),
                    &Vector::zeros(),
                    co.shape(),
                    opts,
                )
                .ok()
                .flatten()
            })
            .map(|hit| sweep_hit(origin, direction, &hit))
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    fn overlap_box(&self, center: Vec3, half_extents: Vec3, mask: LayerMask) -> Vec<StaticId> {
        let shape = Cuboid::new(half_extents);
        let pose = Isometry::translation(center.x, center.y, center.z);
        self.with_mask(mask, |qp| {
            qp.intersect_shape(pose, &shape)
                .map(|(_, co)| decode_id(co.user_data))
                .collect()
        })
    }

    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32, mask: LayerMask) -> bool {
        let ray = Ray::new(Point::from(origin), direction);
        self.with_mask(mask, |qp| qp.cast_ray(&ray, max_distance, true).is_some())
    }
}

/// Convert a cast of the moving box into a world-space hit.
fn sweep_hit(origin: Vec3, direction: Vec3, hit: &ShapeCastHit) -> SweepHit {
    // `normal1`/`witness1` are local to the moving box, which is never rotated.
    let mut normal = -hit.normal1.into_inner();
    if normal.dot(&direction) > 0.0 {
        normal = -normal;
    }
    SweepHit {
        point: origin + direction * hit.time_of_impact + hit.witness1.coords,
        normal,
        distance: hit.time_of_impact,
    }
}

/// Build a Rapier collider from a `WorldStaticDef`, with identity local transform: the pose
/// lives on the parent rigid-body.
fn collider_from_def(def: &WorldStaticDef) -> Collider {
    let builder = match &def.shape {
        ColliderShapeDef::Plane {
            offset_along_normal,
        } => {
            // Only the offset is expressed on the collider; the body pose carries the normal
            // and translation, so the plane is `n ⋅ x = n ⋅ t + offset`.
            let halfspace = HalfSpace::new(Vector::y_axis());
            ColliderBuilder::new(SharedShape::new(halfspace))
                .translation(Vector::y() * *offset_along_normal)
        }
        ColliderShapeDef::Cuboid { half_extents } => {
            ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
        }
        ColliderShapeDef::Sphere { radius } => ColliderBuilder::ball(*radius),
        ColliderShapeDef::CapsuleY {
            radius,
            half_height,
        } => ColliderBuilder::capsule_y(*half_height, *radius),
        ColliderShapeDef::CylinderY {
            radius,
            half_height,
        } => ColliderBuilder::cylinder(*half_height, *radius),
        ColliderShapeDef::RoundCuboid {
            half_extents,
            border_radius,
        } => ColliderBuilder::round_cuboid(
            half_extents.x,
            half_extents.y,
            half_extents.z,
            *border_radius,
        ),
    };
    builder
        .user_data(encode_user_data(def.id, def.layers))
        .build()
}
