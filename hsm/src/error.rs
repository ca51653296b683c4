use thiserror::Error;

/// Wiring errors detected while building a machine. Keys are rendered with `Debug`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("state {0} is registered more than once")]
    DuplicateState(String),
    #[error("state {child} names parent {parent}, which is not registered")]
    UnknownParent { parent: String, child: String },
    #[error("state {from} targets {to}, which is not wired into the machine")]
    UnknownTarget { from: String, to: String },
    #[error("state {parent} may start in {child}, which is not its direct child")]
    InitialNotChild { parent: String, child: String },
}
