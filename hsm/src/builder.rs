use std::collections::HashMap;

use crate::{
    error::BuildError,
    machine::{Node, StateMachine},
    state::{State, StateId, StateKey},
};

/// Registers every state with its parent, then validates the wiring once.
///
/// ```ignore
/// let machine = StateMachineBuilder::new(Key::Root, Root)
///     .add(Key::Root, Key::Grounded, Grounded)?
///     .add(Key::Grounded, Key::Idle, Idle)?
///     .build()?;
/// ```
pub struct StateMachineBuilder<C, K: StateKey, E = ()> {
    nodes: Vec<Node<C, K, E>>,
    index: HashMap<K, StateId>,
}

impl<C, K: StateKey, E> StateMachineBuilder<C, K, E> {
    pub fn new(root_key: K, root: impl State<C, K, E> + 'static) -> Self {
        let mut index = HashMap::new();
        index.insert(root_key, StateId::ROOT);
        Self {
            nodes: vec![Node::new(root_key, None, Box::new(root))],
            index,
        }
    }

    /// Register `state` under `key` as a child of `parent`. Parents must be added first.
    pub fn add(
        mut self,
        parent: K,
        key: K,
        state: impl State<C, K, E> + 'static,
    ) -> Result<Self, BuildError> {
        if self.index.contains_key(&key) {
            return Err(BuildError::DuplicateState(format!("{key:?}")));
        }
        let Some(&parent_id) = self.index.get(&parent) else {
            return Err(BuildError::UnknownParent {
                parent: format!("{parent:?}"),
                child: format!("{key:?}"),
            });
        };

        let id = StateId(self.nodes.len());
        self.nodes
            .push(Node::new(key, Some(parent_id), Box::new(state)));
        self.nodes[parent_id.0].children.push(id);
        self.index.insert(key, id);
        Ok(self)
    }

    /// Validate declared targets and initial children, then produce the machine. The machine
    /// starts on first update.
    pub fn build(self) -> Result<StateMachine<C, K, E>, BuildError> {
        for (i, node) in self.nodes.iter().enumerate() {
            if let Some(missing) = node
                .state
                .targets()
                .iter()
                .find(|to| !self.index.contains_key(*to))
            {
                return Err(BuildError::UnknownTarget {
                    from: format!("{:?}", node.key),
                    to: format!("{missing:?}"),
                });
            }
            let is_child = |key: &K| {
                self.index
                    .get(key)
                    .is_some_and(|id| self.nodes[id.0].parent == Some(StateId(i)))
            };
            if let Some(stray) = node.state.initial_children().iter().find(|&k| !is_child(k)) {
                return Err(BuildError::InitialNotChild {
                    parent: format!("{:?}", node.key),
                    child: format!("{stray:?}"),
                });
            }
        }
        log::debug!("built state machine with {} states", self.nodes.len());
        Ok(StateMachine::from_parts(self.nodes, self.index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    enum Key {
        Root,
        A,
        B,
        Elsewhere,
    }

    struct Plain(Vec<Key>);

    impl State<(), Key> for Plain {
        fn targets(&self) -> &[Key] {
            &self.0
        }
    }

    /// Starts in a fixed child.
    struct Starts(Key);

    impl State<(), Key> for Starts {
        fn initial_state(&self, _ctx: &()) -> Option<Key> {
            Some(self.0)
        }

        fn initial_children(&self) -> &[Key] {
            std::slice::from_ref(&self.0)
        }
    }

    #[test]
    fn builds_valid_tree() {
        let machine = StateMachineBuilder::new(Key::Root, Plain(vec![Key::A]))
            .add(Key::Root, Key::A, Plain(vec![Key::B]))
            .and_then(|b| b.add(Key::Root, Key::B, Plain(vec![])))
            .and_then(|b| b.build())
            .expect("valid tree");
        assert_eq!(machine.parent_of(Key::A), Some(Key::Root));
        assert!(!machine.is_started());
    }

    #[test]
    fn duplicate_key_is_rejected() {
        let err = StateMachineBuilder::new(Key::Root, Plain(vec![]))
            .add(Key::Root, Key::A, Plain(vec![]))
            .and_then(|b| b.add(Key::Root, Key::A, Plain(vec![])))
            .err();
        assert_eq!(err, Some(BuildError::DuplicateState("A".into())));
    }

    #[test]
    fn unknown_parent_is_rejected() {
        let err = StateMachineBuilder::new(Key::Root, Plain(vec![]))
            .add(Key::B, Key::A, Plain(vec![]))
            .err();
        assert_eq!(
            err,
            Some(BuildError::UnknownParent {
                parent: "B".into(),
                child: "A".into()
            })
        );
    }

    #[test]
    fn unwired_target_fails_at_build_time() {
        let err = StateMachineBuilder::new(Key::Root, Plain(vec![]))
            .add(Key::Root, Key::A, Plain(vec![Key::Elsewhere]))
            .and_then(|b| b.build())
            .err();
        assert_eq!(
            err,
            Some(BuildError::UnknownTarget {
                from: "A".into(),
                to: "Elsewhere".into()
            })
        );
    }

    #[test]
    fn initial_child_must_be_a_direct_child() {
        let ok = StateMachineBuilder::new(Key::Root, Starts(Key::A))
            .add(Key::Root, Key::A, Starts(Key::B))
            .and_then(|b| b.add(Key::A, Key::B, Plain(vec![])))
            .and_then(|b| b.build());
        assert!(ok.is_ok());

        // B hangs off the root, so A cannot start in it.
        let err = StateMachineBuilder::new(Key::Root, Starts(Key::A))
            .add(Key::Root, Key::A, Starts(Key::B))
            .and_then(|b| b.add(Key::Root, Key::B, Plain(vec![])))
            .and_then(|b| b.build())
            .err();
        assert_eq!(
            err,
            Some(BuildError::InitialNotChild {
                parent: "A".into(),
                child: "B".into()
            })
        );

        // A grandchild is not a direct child either.
        let err = StateMachineBuilder::new(Key::Root, Starts(Key::B))
            .add(Key::Root, Key::A, Plain(vec![]))
            .and_then(|b| b.add(Key::A, Key::B, Plain(vec![])))
            .and_then(|b| b.build())
            .err();
        assert_eq!(
            err,
            Some(BuildError::InitialNotChild {
                parent: "Root".into(),
                child: "B".into()
            })
        );

        let err = StateMachineBuilder::new(Key::Root, Starts(Key::Elsewhere))
            .build()
            .err();
        assert!(matches!(err, Some(BuildError::InitialNotChild { .. })));
    }
}
