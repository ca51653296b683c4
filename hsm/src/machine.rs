use std::collections::HashMap;

use crate::{
    sequencer::TransitionSequencer,
    state::{State, StateId, StateKey},
};

pub(crate) struct Node<C, K: StateKey, E> {
    pub(crate) key: K,
    pub(crate) parent: Option<StateId>,
    pub(crate) children: Vec<StateId>,
    pub(crate) active_child: Option<StateId>,
    pub(crate) state: Box<dyn State<C, K, E>>,
}

impl<C, K: StateKey, E> Node<C, K, E> {
    pub(crate) fn new(key: K, parent: Option<StateId>, state: Box<dyn State<C, K, E>>) -> Self {
        Self {
            key,
            parent,
            children: Vec::new(),
            active_child: None,
            state,
        }
    }
}

/// A built state tree plus its transition sequencer.
///
/// The machine owns every state for its whole life; states are never recreated during play.
pub struct StateMachine<C, K: StateKey, E = ()> {
    nodes: Vec<Node<C, K, E>>,
    index: HashMap<K, StateId>,
    sequencer: TransitionSequencer,
    started: bool,
}

impl<C, K: StateKey, E> StateMachine<C, K, E> {
    pub(crate) fn from_parts(nodes: Vec<Node<C, K, E>>, index: HashMap<K, StateId>) -> Self {
        Self {
            nodes,
            index,
            sequencer: TransitionSequencer::new(),
            started: false,
        }
    }

    // --- Lifecycle ---

    /// Enter the default path from the root. No-op once started.
    pub fn start(&mut self, ctx: &mut C) {
        if self.started {
            return;
        }
        self.started = true;
        self.enter(StateId::ROOT, ctx, true);
        log::info!("state machine started in {:?}", self.active_leaf());
    }

    /// Exit every active state, leaves first. The next update starts the machine again.
    pub fn stop(&mut self, ctx: &mut C) {
        if !self.started {
            return;
        }
        self.exit(StateId::ROOT, ctx);
        self.started = false;
    }

    /// One tick: start if needed, then update from the root.
    pub fn update(&mut self, ctx: &mut C, dt: f32) {
        if !self.started {
            self.start(ctx);
        }
        self.sequencer.begin_pass();
        self.update_node(StateId::ROOT, ctx, dt);
        self.sequencer.end_pass();
    }

    /// Deliver one event to the active path, root first. The first state that answers with a
    /// transition wins. Returns whether a transition happened.
    pub fn dispatch(&mut self, ctx: &mut C, event: &E) -> bool {
        self.dispatch_all(ctx, std::iter::once(event))
    }

    /// Deliver events in order within a single pass: at most one transition results.
    pub fn dispatch_all<'e>(
        &mut self,
        ctx: &mut C,
        events: impl IntoIterator<Item = &'e E>,
    ) -> bool
    where
        E: 'e,
    {
        if !self.started {
            return false;
        }
        self.sequencer.begin_pass();
        let mut transitioned = false;
        for event in events {
            let mut current = Some(StateId::ROOT);
            while let Some(id) = current {
                if let Some(to) = self.nodes[id.0].state.on_event(ctx, event) {
                    let from = self.nodes[id.0].key;
                    transitioned |= self.request(ctx, from, to);
                    break;
                }
                current = self.nodes[id.0].active_child;
            }
        }
        self.sequencer.end_pass();
        transitioned
    }

    /// Transition from the active state `from` to `to` as its own pass (or within the current
    /// one). Returns `false` for unknown keys, an inactive source, a no-op, or a spent budget.
    pub fn change_state(&mut self, ctx: &mut C, from: K, to: K) -> bool {
        let own_pass = !self.sequencer.in_pass();
        if own_pass {
            self.sequencer.begin_pass();
        }
        let honored = self.request(ctx, from, to);
        if own_pass {
            self.sequencer.end_pass();
        }
        honored
    }

    /// Transition from the active leaf to `to`.
    pub fn transition_to(&mut self, ctx: &mut C, to: K) -> bool {
        match self.active_leaf() {
            Some(from) => self.change_state(ctx, from, to),
            None => false,
        }
    }

    // --- Queries ---

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn contains(&self, key: K) -> bool {
        self.index.contains_key(&key)
    }

    /// Keys from the root down to the active leaf; empty before start.
    pub fn active_path(&self) -> Vec<K> {
        if !self.started {
            return Vec::new();
        }
        std::iter::successors(Some(StateId::ROOT), |&id| self.nodes[id.0].active_child)
            .map(|id| self.nodes[id.0].key)
            .collect()
    }

    pub fn active_leaf(&self) -> Option<K> {
        self.active_path().last().copied()
    }

    pub fn is_active(&self, key: K) -> bool {
        self.index
            .get(&key)
            .is_some_and(|&id| self.is_active_id(id))
    }

    pub fn parent_of(&self, key: K) -> Option<K> {
        let id = *self.index.get(&key)?;
        self.nodes[id.0].parent.map(|p| self.nodes[p.0].key)
    }

    pub fn children_of(&self, key: K) -> Vec<K> {
        self.index
            .get(&key)
            .map(|&id| {
                self.nodes[id.0]
                    .children
                    .iter()
                    .map(|c| self.nodes[c.0].key)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn lca(&self, a: K, b: K) -> Option<K> {
        let a = *self.index.get(&a)?;
        let b = *self.index.get(&b)?;
        self.lca_id(a, b).map(|id| self.nodes[id.0].key)
    }

    // --- Internals ---

    fn lca_id(&self, a: StateId, b: StateId) -> Option<StateId> {
        TransitionSequencer::lowest_common_ancestor(a, b, |id| self.nodes[id.0].parent)
    }

    fn is_active_id(&self, id: StateId) -> bool {
        if !self.started {
            return false;
        }
        match self.nodes[id.0].parent {
            None => true,
            Some(p) => self.nodes[p.0].active_child == Some(id) && self.is_active_id(p),
        }
    }

    fn update_node(&mut self, id: StateId, ctx: &mut C, dt: f32) {
        let active = self.nodes[id.0].active_child;
        let active_key = active.map(|c| self.nodes[c.0].key);

        if let Some(to) = self.nodes[id.0].state.transition(ctx, active_key, dt) {
            let from = self.nodes[id.0].key;
            self.request(ctx, from, to);
            return;
        }

        if let Some(child) = active {
            self.update_node(child, ctx, dt);
        }
        self.nodes[id.0].state.on_update(ctx, dt);
    }

    fn request(&mut self, ctx: &mut C, from: K, to: K) -> bool {
        let (Some(&a), Some(&b)) = (self.index.get(&from), self.index.get(&to)) else {
            log::warn!("rejected transition {from:?} -> {to:?}: unknown state");
            return false;
        };
        if a == b {
            return false;
        }
        if !self.is_active_id(a) {
            log::warn!("rejected transition {from:?} -> {to:?}: source is not active");
            return false;
        }
        if !self.sequencer.try_claim(from, to) {
            return false;
        }

        let Some(lca) = self.lca_id(a, b) else {
            return false;
        };
        self.exit_up_to(a, lca, ctx);
        self.enter_down_from(lca, b, ctx);
        log::debug!(
            "transition {from:?} -> {to:?} (lca {:?})",
            self.nodes[lca.0].key
        );
        true
    }

    /// Exit `from` and its ancestors below `lca`; afterwards `lca` has no active child.
    fn exit_up_to(&mut self, from: StateId, lca: StateId, ctx: &mut C) {
        if from == lca {
            if let Some(child) = self.nodes[lca.0].active_child {
                self.exit(child, ctx);
            }
        } else {
            self.exit(from, ctx);
            let mut current = self.nodes[from.0].parent;
            while let Some(id) = current {
                if id == lca {
                    break;
                }
                self.nodes[id.0].active_child = None;
                self.nodes[id.0].state.on_exit(ctx);
                current = self.nodes[id.0].parent;
            }
        }
        self.nodes[lca.0].active_child = None;
    }

    /// Enter from just below `lca` down to `to`. Only `to` descends into its initial chain;
    /// when `to` is the LCA itself it settles into its initial chain without re-entering.
    fn enter_down_from(&mut self, lca: StateId, to: StateId, ctx: &mut C) {
        if to == lca {
            self.enter_initial(to, ctx);
            return;
        }
        let mut path: Vec<StateId> =
            std::iter::successors(Some(to), |&id| self.nodes[id.0].parent)
                .take_while(|&id| id != lca)
                .collect();
        path.reverse();
        for id in path {
            self.enter(id, ctx, id == to);
        }
    }

    fn enter(&mut self, id: StateId, ctx: &mut C, descend: bool) {
        if let Some(parent) = self.nodes[id.0].parent {
            self.nodes[parent.0].active_child = Some(id);
        }
        self.nodes[id.0].state.on_enter(ctx);
        log::trace!("entered {:?}", self.nodes[id.0].key);
        if descend {
            self.enter_initial(id, ctx);
        }
    }

    fn enter_initial(&mut self, id: StateId, ctx: &mut C) {
        let Some(child_key) = self.nodes[id.0].state.initial_state(ctx) else {
            return;
        };
        match self.index.get(&child_key) {
            Some(&child) if self.nodes[child.0].parent == Some(id) => {
                self.enter(child, ctx, true);
            }
            _ => {
                log::error!(
                    "initial state {child_key:?} of {:?} is not a direct child",
                    self.nodes[id.0].key
                );
                debug_assert!(false, "initial state {child_key:?} is not a direct child");
            }
        }
    }

    fn exit(&mut self, id: StateId, ctx: &mut C) {
        if let Some(child) = self.nodes[id.0].active_child {
            self.exit(child, ctx);
        }
        self.nodes[id.0].active_child = None;
        self.nodes[id.0].state.on_exit(ctx);
        log::trace!("exited {:?}", self.nodes[id.0].key);
    }
}
