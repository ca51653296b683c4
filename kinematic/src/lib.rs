pub mod bitmask_flags;
pub mod body;
pub mod collision;
pub mod error;
pub mod rapier_world;
pub mod utils;

pub use body::{CollisionListener, MotionBody};
pub use collision::{
    BodySettings, CollisionHit, CollisionLayer, GeometryQuery, LayerMask, SlideStep, StaticShape,
    StaticWorld, SweepHit, Vec3,
};
pub use error::SettingsError;
pub use rapier_world::{ColliderShapeDef, RapierQueryWorld, WorldStaticDef};
pub use utils::{
    angle_deg, horizontal, normalize_or_zero, planar_to_world, project_and_scale, reflect,
    slope_angle_deg,
};
