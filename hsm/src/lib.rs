/*!
A hierarchical state machine runtime.

States live in an arena owned by the machine and are addressed by user keys. Each state has
at most one active child; the active children form a single path from the root to the active
leaf. The machine is built once through [`StateMachineBuilder`], which rejects transition
targets that are not wired into the tree.

Semantics
- Entering a state links it as its parent's active child, runs its enter hook, then enters its
  initial child (if any).
- Exiting a state exits its active child first, clears the link, then runs its exit hook.
- Updating a state first asks it for a transition. If one is returned, the transition runs and
  neither the state nor its children update this pass. Otherwise the active child updates,
  then the state itself.
- A transition exits from the source up to (excluding) the lowest common ancestor, then enters
  from just below it down to the destination.
- One transition is honored per pass; later requests in the same pass are rejected.
*/

pub mod builder;
pub mod error;
pub mod machine;
pub mod sequencer;
pub mod state;

pub use builder::StateMachineBuilder;
pub use error::BuildError;
pub use machine::StateMachine;
pub use sequencer::TransitionSequencer;
pub use state::{State, StateId, StateKey};
