use std::{fmt::Debug, hash::Hash};

/// Identity of a state. Keys are unique within a machine.
pub trait StateKey: Copy + Eq + Hash + Debug + 'static {}

impl<T: Copy + Eq + Hash + Debug + 'static> StateKey for T {}

/// Stable arena index of a state inside its machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(pub(crate) usize);

impl StateId {
    pub const ROOT: StateId = StateId(0);

    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Behavior of one node in the tree.
///
/// `C` is the shared context passed to every hook, `K` the key type, and `E` the event type
/// delivered by [`StateMachine::dispatch`](crate::StateMachine::dispatch).
pub trait State<C, K: StateKey, E = ()> {
    fn on_enter(&mut self, _ctx: &mut C) {}

    fn on_exit(&mut self, _ctx: &mut C) {}

    /// Runs after the active child's update.
    fn on_update(&mut self, _ctx: &mut C, _dt: f32) {}

    /// Child to enter after this state is entered. Must be a direct child.
    fn initial_state(&self, _ctx: &C) -> Option<K> {
        None
    }

    /// Every key `initial_state` may return. The builder checks each is a direct child.
    fn initial_children(&self) -> &[K] {
        &[]
    }

    /// Asked before updating. Returning a key transitions from this state to it and skips
    /// this pass's update of this state and its children.
    fn transition(&mut self, _ctx: &mut C, _active_child: Option<K>, _dt: f32) -> Option<K> {
        None
    }

    /// Handle an event while active. Returning a key transitions from this state to it.
    fn on_event(&mut self, _ctx: &mut C, _event: &E) -> Option<K> {
        None
    }

    /// Every key this state may transition to.
    fn targets(&self) -> &[K] {
        &[]
    }
}
