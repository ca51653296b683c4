/*!
Collision root module.

Box-based collide-and-slide for kinematic bodies against static geometry. The resolver only
needs the [`GeometryQuery`] capability, answered either analytically by [`StaticWorld`] or by
Rapier through `crate::rapier_world`.

- types:         shared data types (SweepHit, CollisionHit, StaticShape)
- settings:      per-body tuning and tolerance constants
- layers:        collision layers and masks
- query:         the geometry query trait
- narrow_phase:  analytic box sweeps, overlaps and rays
- static_world:  deterministic analytic world
- resolver:      recursive collide-and-slide
- stairs:        stair stepping for grounded bodies
- ground:        grounded check
*/

pub mod ground;
pub mod layers;
pub mod narrow_phase;
pub mod query;
pub mod resolver;
pub mod settings;
pub mod stairs;
pub mod static_world;
pub mod types;

pub use layers::{CollisionLayer, LayerMask};
pub use query::GeometryQuery;
pub use resolver::SlideStep;
pub use settings::BodySettings;
pub use static_world::{StaticEntry, StaticWorld};
pub use types::{CollisionHit, Iso, Quat, StaticId, StaticShape, SweepHit, Vec3};
