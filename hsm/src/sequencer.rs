use std::fmt::Debug;

use crate::state::StateId;

/// Budgets transitions per pass and finds lowest common ancestors.
///
/// A pass is one `update`, one `dispatch`/`dispatch_all` call, or one external
/// `change_state` call. The first request of a pass is honored; later ones are rejected.
/// Hooks never see the machine, so a request cannot arrive while a transition executes.
#[derive(Debug, Default, Clone)]
pub struct TransitionSequencer {
    in_pass: bool,
    honored: bool,
}

impl TransitionSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_pass(&mut self) {
        self.in_pass = true;
        self.honored = false;
    }

    pub fn end_pass(&mut self) {
        self.in_pass = false;
        self.honored = false;
    }

    pub fn in_pass(&self) -> bool {
        self.in_pass
    }

    /// Claim this pass's transition. Returns `false` (and logs) if it was already used.
    pub fn try_claim<K: Debug>(&mut self, from: K, to: K) -> bool {
        if self.honored {
            log::warn!("rejected transition {from:?} -> {to:?}: one transition per pass");
            return false;
        }
        self.honored = true;
        true
    }

    /// Deepest state that is an ancestor of (or equal to) both `a` and `b`.
    ///
    /// `parent_of` walks one level up; `None` marks the root. States of one tree always share
    /// the root, so this only returns `None` for ids of different trees.
    pub fn lowest_common_ancestor(
        a: StateId,
        b: StateId,
        parent_of: impl Fn(StateId) -> Option<StateId>,
    ) -> Option<StateId> {
        let chain_a: Vec<StateId> = std::iter::successors(Some(a), |&s| parent_of(s)).collect();
        std::iter::successors(Some(b), |&s| parent_of(s)).find(|s| chain_a.contains(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Tree: 0 -> {1 -> {3, 4}, 2 -> {5}}
    fn parent(id: StateId) -> Option<StateId> {
        match id.0 {
            1 | 2 => Some(StateId(0)),
            3 | 4 => Some(StateId(1)),
            5 => Some(StateId(2)),
            _ => None,
        }
    }

    #[test]
    fn lca_of_self_is_self() {
        let lca = TransitionSequencer::lowest_common_ancestor(StateId(3), StateId(3), parent);
        assert_eq!(lca, Some(StateId(3)));
    }

    #[test]
    fn lca_of_disjoint_branches_is_root() {
        let lca = TransitionSequencer::lowest_common_ancestor(StateId(4), StateId(5), parent);
        assert_eq!(lca, Some(StateId::ROOT));
    }

    #[test]
    fn lca_of_siblings_and_ancestors() {
        let lca = |a, b| TransitionSequencer::lowest_common_ancestor(StateId(a), StateId(b), parent);
        assert_eq!(lca(3, 4), Some(StateId(1)));
        assert_eq!(lca(3, 1), Some(StateId(1)));
        assert_eq!(lca(0, 5), Some(StateId(0)));
    }

    #[test]
    fn one_transition_per_pass() {
        let mut seq = TransitionSequencer::new();
        seq.begin_pass();
        assert!(seq.in_pass());
        assert!(seq.try_claim("a", "b"));
        assert!(!seq.try_claim("b", "c"));
        seq.end_pass();
        seq.begin_pass();
        assert!(seq.try_claim("b", "c"));
    }
}
