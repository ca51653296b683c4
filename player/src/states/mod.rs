/*!
The player state graph.

```text
Root
├── Grounded
│   ├── Idle
│   ├── Moving
│   ├── Sliding
│   └── GroundedStunned
└── Airborne
    ├── Falling
    ├── Grabbing
    ├── SlidingAirborne
    └── StunnedAirborne
```

States are unit structs; everything they change lives in [`MotionContext`]. Collision hits of
a tick arrive as events after the move, which is how both sliding states detect a bonk.
*/

mod airborne;
mod grounded;
mod root;

use hsm::{StateMachine, StateMachineBuilder};
use kinematic::{CollisionHit, Vec3, angle_deg, horizontal, normalize_or_zero, reflect};

use crate::context::MotionContext;

pub use airborne::{Airborne, Falling, Grabbing, SlidingAirborne, StunnedAirborne};
pub use grounded::{Grounded, GroundedStunned, Idle, Moving, Sliding};
pub use root::Root;

/// Keys of the player graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayerState {
    Root,
    Grounded,
    Idle,
    Moving,
    Sliding,
    GroundedStunned,
    Airborne,
    Falling,
    Grabbing,
    SlidingAirborne,
    StunnedAirborne,
}

pub type PlayerMachine = StateMachine<MotionContext, PlayerState, CollisionHit>;

/// Countdown timers at or below this have expired.
pub(crate) const TIMER_EPS: f32 = 1.0e-5;

pub fn build_machine() -> Result<PlayerMachine, hsm::BuildError> {
    use PlayerState as S;

    StateMachineBuilder::new(S::Root, Root)
        .add(S::Root, S::Grounded, Grounded)?
        .add(S::Grounded, S::Idle, Idle)?
        .add(S::Grounded, S::Moving, Moving)?
        .add(S::Grounded, S::Sliding, Sliding)?
        .add(S::Grounded, S::GroundedStunned, GroundedStunned)?
        .add(S::Root, S::Airborne, Airborne)?
        .add(S::Airborne, S::Falling, Falling)?
        .add(S::Airborne, S::Grabbing, Grabbing)?
        .add(S::Airborne, S::SlidingAirborne, SlidingAirborne)?
        .add(S::Airborne, S::StunnedAirborne, StunnedAirborne)?
        .build()
}

/// Whether a grab may start from the current state of the context.
pub(crate) fn can_grab(ctx: &MotionContext) -> bool {
    ctx.desired_grab && !ctx.has_grabbed && !ctx.is_stunned
}

/// Apply the slide bonk rule to `hit`. On a bonk the velocity is set to the stun launch and
/// the context is marked stunned; the caller transitions to `StunnedAirborne`.
///
/// Only the horizontal part of the normal counts, so flat floors never bonk while a ramp
/// struck head-on does.
pub(crate) fn try_bonk(ctx: &mut MotionContext, hit: &CollisionHit) -> bool {
    let wall = normalize_or_zero(horizontal(hit.normal));
    let impact = horizontal(hit.impact_velocity);
    if wall == Vec3::zeros() || impact == Vec3::zeros() {
        return false;
    }
    if angle_deg(wall, impact) <= ctx.config.max_slide_bonk_angle {
        return false;
    }

    let mut launch = reflect(impact, wall) * ctx.config.stun_deceleration;
    launch.y = ctx.config.stun_upward_speed;
    ctx.body.velocity = launch;
    ctx.is_stunned = true;
    // Skip the settle pass so the hop leaves the floor.
    ctx.currently_jumping = true;
    log::debug!("bonk: impact {impact:?} against {wall:?}");
    true
}
