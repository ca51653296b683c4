use hsm::State;
use kinematic::{CollisionHit, horizontal, normalize_or_zero};

use super::{PlayerState, TIMER_EPS, can_grab, try_bonk};
use crate::{context::MotionContext, jump::VERTICAL_REST};

type S = PlayerState;

/// Off the ground. Integrates gravity and air control after the active child.
pub struct Airborne;

impl State<MotionContext, PlayerState, CollisionHit> for Airborne {
    fn on_enter(&mut self, ctx: &mut MotionContext) {
        ctx.current_friction = ctx.config.air_friction;
        ctx.coyote_timer = 0.0;
    }

    fn initial_state(&self, _ctx: &MotionContext) -> Option<PlayerState> {
        Some(S::Falling)
    }

    fn initial_children(&self) -> &[PlayerState] {
        &[S::Falling]
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
        // A grab runs its full duration before landing counts.
        if active == Some(S::Grabbing) {
            return None;
        }
        // Still rising off the floor (a jump or a bonk hop) is not a landing.
        if ctx.body.grounded && ctx.body.velocity.y <= VERTICAL_REST {
            return Some(match active {
                Some(S::SlidingAirborne) => S::Sliding,
                Some(S::StunnedAirborne) => S::GroundedStunned,
                _ => S::Grounded,
            });
        }
        None
    }

    fn on_update(&mut self, ctx: &mut MotionContext, dt: f32) {
        if !ctx.currently_jumping {
            ctx.coyote_timer += dt;
        }
        if ctx.has_move_input() {
            ctx.accelerate(ctx.config.air_accel, dt);
        }
        if ctx.use_gravity {
            ctx.body.velocity.y -= ctx.base_grav * dt;
        }
    }

    fn targets(&self) -> &[PlayerState] {
        &[S::Grabbing, S::Grounded, S::Sliding, S::GroundedStunned]
    }
}

pub struct Falling;

impl State<MotionContext, PlayerState, CollisionHit> for Falling {}

/// A short, gravity-free dash along the facing direction.
pub struct Grabbing;

impl State<MotionContext, PlayerState, CollisionHit> for Grabbing {
    fn on_enter(&mut self, ctx: &mut MotionContext) {
        ctx.use_gravity = false;
        ctx.has_grabbed = true;
        ctx.grab_timer = ctx.config.grab_duration;
        ctx.current_friction = ctx.config.grab_friction;

        let facing = normalize_or_zero(horizontal(ctx.facing));
        let speed = ctx.horizontal_speed().max(ctx.config.grab_speed);
        ctx.body.velocity = facing * speed;
    }

    fn on_exit(&mut self, ctx: &mut MotionContext) {
        ctx.use_gravity = true;
        ctx.current_friction = ctx.config.air_friction;
    }

    fn transition(
        &mut self,
        ctx: &mut MotionContext,
        _active: Option<PlayerState>,
        dt: f32,
    ) -> Option<PlayerState> {
        ctx.grab_timer -= dt;
        if ctx.grab_timer > TIMER_EPS {
            return None;
        }
        if ctx.pressing_grab {
            Some(S::SlidingAirborne)
        } else {
            ctx.body.velocity *= 1.0 - ctx.config.grab_deceleration;
            Some(S::Airborne)
        }
    }

    fn targets(&self) -> &[PlayerState] {
        &[S::SlidingAirborne, S::Airborne]
    }
}

/// Sliding through the air after a held grab. Bonks like its grounded counterpart.
pub struct SlidingAirborne;

impl State<MotionContext, PlayerState, CollisionHit> for SlidingAirborne {
    fn on_enter(&mut self, ctx: &mut MotionContext) {
        ctx.current_friction = ctx.config.slide_friction;
        ctx.current_move_mult = ctx.config.slide_move_mult;
        ctx.slide_timer = Some(0.0);
    }

    fn on_exit(&mut self, ctx: &mut MotionContext) {
        ctx.current_friction = ctx.config.air_friction;
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
        (done && !ctx.pressing_grab).then_some(S::Airborne)
    }

    fn on_event(&mut self, ctx: &mut MotionContext, hit: &CollisionHit) -> Option<PlayerState> {
        try_bonk(ctx, hit).then_some(S::StunnedAirborne)
    }

    fn targets(&self) -> &[PlayerState] {
        &[S::Airborne, S::StunnedAirborne]
    }
}

pub struct StunnedAirborne;

impl State<MotionContext, PlayerState, CollisionHit> for StunnedAirborne {
    fn on_enter(&mut self, ctx: &mut MotionContext) {
        ctx.current_move_mult = 0.0;
        ctx.is_stunned = true;
    }

    fn on_exit(&mut self, ctx: &mut MotionContext) {
        ctx.current_move_mult = 1.0;
    }
}
