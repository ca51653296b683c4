use hsm::State;
use kinematic::{CollisionHit, Vec3};

use super::PlayerState;
use crate::{
    context::{MotionContext, REST_SPEED_SQ},
    jump,
};

/// Top of the graph. Starts jumps before any child runs and moves the body after all of them.
pub struct Root;

impl State<MotionContext, PlayerState, CollisionHit> for Root {
    fn initial_state(&self, ctx: &MotionContext) -> Option<PlayerState> {
        Some(if ctx.body.grounded {
            PlayerState::Grounded
        } else {
            PlayerState::Airborne
        })
    }

    fn initial_children(&self) -> &[PlayerState] {
        &[PlayerState::Grounded, PlayerState::Airborne]
    }

    fn transition(
        &mut self,
        ctx: &mut MotionContext,
        _active: Option<PlayerState>,
        _dt: f32,
    ) -> Option<PlayerState> {
        ctx.current_velocity = ctx.body.velocity;
        if ctx.desired_jump && !ctx.is_stunned {
            ctx.current_jump = match ctx.slide_timer {
                Some(_) => ctx.config.slide_jump,
                None => ctx.config.base_jump,
            };
            if jump::perform_jump(ctx) {
                ctx.body.velocity = ctx.current_velocity;
                ctx.currently_jumping = true;
                log::debug!("jump at {:.3} m/s", ctx.jump_speed);
            }
        }
        jump::calculate_gravity(ctx);
        None
    }

    fn on_update(&mut self, ctx: &mut MotionContext, dt: f32) {
        let friction = ctx.current_friction;
        ctx.scale_horizontal_velocity(1.0 - friction);
        if ctx.body.velocity.norm_squared() < REST_SPEED_SQ {
            ctx.body.velocity = Vec3::zeros();
        }

        let delta = ctx.body.velocity * dt;
        let gravity_pass = !ctx.currently_jumping;
        ctx.body.move_body(delta, gravity_pass, dt, &mut ctx.collisions);
    }
}
