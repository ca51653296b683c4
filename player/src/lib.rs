/*!
A character controller on top of the kinematic motion body and the hierarchical state machine.

Each fixed step [`PlayerController::tick`]:
1. latches input into the [`MotionContext`]
2. refreshes the grounded flag
3. recomputes airborne gravity
4. updates the state machine (the root moves the body last), then ages the jump buffer
5. dispatches the move's collision hits to the active states
6. closes an expired grab request
*/

pub mod config;
pub mod context;
pub mod controller;
pub mod error;
pub mod input;
pub mod jump;
pub mod states;

pub use config::{JumpData, MotionConfig};
pub use context::MotionContext;
pub use controller::PlayerController;
pub use error::{ConfigError, Error, Result};
pub use input::{ButtonState, InputSnapshot, move_direction};
pub use states::PlayerState;
