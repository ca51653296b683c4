//! Collision layers used to filter geometry queries.

use crate::{bitmask_flags::BitmaskFlags, define_bitmask_flags};

define_bitmask_flags!(CollisionLayer, u32, {
    Environment,
    Ground,
    Actor,
    Trigger,
});

/// Mask of [`CollisionLayer`]s. A query only sees colliders whose layers intersect its mask.
pub type LayerMask = BitmaskFlags<u32>;

impl CollisionLayer {
    /// Mask containing only this layer.
    #[inline]
    pub fn as_mask(self) -> LayerMask {
        LayerMask::empty().with(self)
    }
}

/// Default mask for both collision sweeps and ground probes: level geometry.
#[inline]
pub fn level_geometry() -> LayerMask {
    LayerMask::from_flags(&[CollisionLayer::Environment, CollisionLayer::Ground])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_geometry_excludes_actors_and_triggers() {
        let mask = level_geometry();
        assert!(mask.has(CollisionLayer::Environment));
        assert!(mask.has(CollisionLayer::Ground));
        assert!(!mask.has(CollisionLayer::Actor));
        assert!(!mask.intersects(CollisionLayer::Trigger.as_mask()));
    }

    #[test]
    fn remove_clears_only_the_given_layer() {
        let mut mask = LayerMask::all();
        mask.remove(CollisionLayer::Trigger);
        assert!(!mask.has(CollisionLayer::Trigger));
        assert!(mask.has(CollisionLayer::Actor));
        assert!(LayerMask::empty().is_empty());
    }
}
