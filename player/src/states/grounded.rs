use hsm::State;
use kinematic::CollisionHit;

use super::{PlayerState, TIMER_EPS, can_grab, try_bonk};
use crate::context::MotionContext;

type S = PlayerState;

fn is_moving(ctx: &MotionContext) -> bool {
    ctx.has_move_input() || ctx.horizontal_speed() > 0.0
}

/// On walkable ground.
pub struct Grounded;

impl State<MotionContext, PlayerState, CollisionHit> for Grounded {
    fn on_enter(&mut self, ctx: &mut MotionContext) {
        ctx.has_grabbed = false;
        ctx.current_friction = ctx.config.ground_friction;
        ctx.current_move_mult = 1.0;
        ctx.current_jump = ctx.config.base_jump;
    }

    fn initial_state(&self, ctx: &MotionContext) -> Option<PlayerState> {
        Some(if is_moving(ctx) { S::Moving } else { S::Idle })
    }

    fn initial_children(&self) -> &[PlayerState] {
        &[S::Idle, S::Moving]
    }

    fn transition(
        &mut self,
        ctx: &mut MotionContext,
        active: Option<PlayerState>,
        _dt: f32,
    ) -> Option<PlayerState> {
        if can_grab(ctx) {
            return Some(S::Grabbing);
        }
        if !ctx.body.grounded {
            return Some(match active {
                Some(S::Sliding) => S::SlidingAirborne,
                Some(S::GroundedStunned) => S::StunnedAirborne,
                _ => S::Airborne,
            });
        }
        None
    }

    fn on_update(&mut self, ctx: &mut MotionContext, dt: f32) {
        let cfg = ctx.config;
        if ctx.has_move_input() {
            ctx.accelerate(cfg.acceleration, dt);
        } else {
            ctx.scale_horizontal_velocity(1.0 - cfg.ground_deceleration);
        }
        if ctx.horizontal_speed() > cfg.max_speed {
            ctx.scale_horizontal_velocity(cfg.ground_speed_cap_mult);
        }
    }

    fn targets(&self) -> &[PlayerState] {
        &[
            S::Grabbing,
            S::Airborne,
            S::SlidingAirborne,
            S::StunnedAirborne,
        ]
    }
}

pub struct Idle;

impl State<MotionContext, PlayerState, CollisionHit> for Idle {
    fn transition(
        &mut self,
        ctx: &mut MotionContext,
        _active: Option<PlayerState>,
        _dt: f32,
    ) -> Option<PlayerState> {
        is_moving(ctx).then_some(S::Moving)
    }

    fn targets(&self) -> &[PlayerState] {
        &[S::Moving]
    }
}

pub struct Moving;

impl State<MotionContext, PlayerState, CollisionHit> for Moving {
    fn transition(
        &mut self,
        ctx: &mut MotionContext,
        _active: Option<PlayerState>,
        _dt: f32,
    ) -> Option<PlayerState> {
        (!is_moving(ctx)).then_some(S::Idle)
    }

    fn targets(&self) -> &[PlayerState] {
        &[S::Idle]
    }
}

/// Low-friction slide after landing from an airborne slide. Bonks on steep impacts.
pub struct Sliding;

impl State<MotionContext, PlayerState, CollisionHit> for Sliding {
    fn on_enter(&mut self, ctx: &mut MotionContext) {
        ctx.current_friction = ctx.config.slide_friction;
        ctx.current_move_mult = ctx.config.slide_move_mult;
        ctx.slide_timer = Some(0.0);
    }

    fn on_exit(&mut self, ctx: &mut MotionContext) {
        ctx.current_friction = ctx.config.ground_friction;
        ctx.current_move_mult = 1.0;
        ctx.slide_timer = None;
    }

    fn transition(
        &mut self,
        ctx: &mut MotionContext,
        _active: Option<PlayerState>,
        dt: f32,
    ) -> Option<PlayerState> {
        let elapsed = ctx.slide_timer.get_or_insert(0.0);
        *elapsed += dt;
        let done = *elapsed >= ctx.config.min_slide_time;
        (done && !ctx.pressing_grab).then_some(S::Grounded)
    }

    fn on_event(&mut self, ctx: &mut MotionContext, hit: &CollisionHit) -> Option<PlayerState> {
        try_bonk(ctx, hit).then_some(S::StunnedAirborne)
    }

    fn targets(&self) -> &[PlayerState] {
        &[S::Grounded, S::StunnedAirborne]
    }
}

/// Knocked down after a bonk; no control until the stun wears off.
pub struct GroundedStunned;

impl State<MotionContext, PlayerState, CollisionHit> for GroundedStunned {
    fn on_enter(&mut self, ctx: &mut MotionContext) {
        ctx.current_move_mult = 0.0;
        ctx.stun_timer = ctx.config.stun_duration;
        ctx.is_stunned = true;
    }

    fn on_exit(&mut self, ctx: &mut MotionContext) {
        ctx.current_move_mult = 1.0;
        ctx.is_stunned = false;
    }

    fn transition(
        &mut self,
        ctx: &mut MotionContext,
        _active: Option<PlayerState>,
        dt: f32,
    ) -> Option<PlayerState> {
        ctx.stun_timer -= dt;
        (ctx.stun_timer <= TIMER_EPS).then_some(S::Grounded)
    }

    fn targets(&self) -> &[PlayerState] {
        &[S::Grounded]
    }
}
