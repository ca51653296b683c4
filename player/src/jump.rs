//! Jump and gravity bookkeeping shared by the root state and the per-tick driver.

use crate::{config::JumpData, context::MotionContext};

/// Vertical speeds within this band count as neither rising nor falling.
pub(crate) const VERTICAL_REST: f32 = 0.01;

/// Grounded jumps are refused while falling faster than this.
const GROUNDED_JUMP_MIN_VY: f32 = -0.1;

/// Launch speed that reaches `height` under `gravity_y` (negative).
#[inline]
pub fn jump_speed(gravity_y: f32, height: f32) -> f32 {
    (-2.0 * gravity_y * height).max(0.0).sqrt()
}

/// Airborne gravity acceleration for a jump arc: `2h / t²`.
#[inline]
pub fn arc_gravity(jump: &JumpData) -> f32 {
    2.0 * jump.jump_height / (jump.time_to_jump_apex * jump.time_to_jump_apex)
}

/// Recompute `base_grav` from the current jump data and gravity multiplier.
pub fn set_physics(ctx: &mut MotionContext) {
    ctx.base_grav = arc_gravity(&ctx.current_jump) * ctx.grav_multiplier;
}

/// Age a pending jump request and drop it once it is older than the buffer window.
pub fn tick_jump_buffer(ctx: &mut MotionContext, dt: f32) {
    if !ctx.desired_jump {
        return;
    }
    ctx.jump_buffer_timer += dt;
    if ctx.jump_buffer_timer > ctx.config.jump_buffer {
        ctx.desired_jump = false;
        ctx.jump_buffer_timer = 0.0;
    }
}

/// Whether a jump may start now: standing (not already falling) or within coyote time.
pub fn can_jump(ctx: &MotionContext) -> bool {
    let grounded = ctx.body.grounded && ctx.body.velocity.y > GROUNDED_JUMP_MIN_VY;
    let coyote = ctx.coyote_timer > 0.0 && ctx.coyote_timer < ctx.config.coyote_time;
    grounded || coyote
}

/// Try to launch a jump into `current_velocity`. Returns whether it was honored.
///
/// Without a buffer window an unhonored request is dropped immediately.
pub fn perform_jump(ctx: &mut MotionContext) -> bool {
    let honored = can_jump(ctx);
    if honored {
        ctx.desired_jump = false;
        ctx.jump_buffer_timer = 0.0;
        ctx.coyote_timer = 0.0;
        ctx.jump_speed = jump_speed(ctx.body.settings().gravity.y, ctx.current_jump.jump_height);
        ctx.current_velocity.y = ctx.jump_speed;
    }
    if ctx.config.jump_buffer <= 0.0 {
        ctx.desired_jump = false;
    }
    honored
}

/// Pick the gravity multiplier for the current vertical motion.
pub fn calculate_gravity(ctx: &mut MotionContext) {
    let grounded = ctx.body.grounded;
    let vy = ctx.body.velocity.y;
    let jump = ctx.current_jump;

    ctx.grav_multiplier = if vy > VERTICAL_REST {
        if grounded {
            1.0
        } else if ctx.pressing_jump && ctx.currently_jumping {
            jump.upward_movement_multiplier
        } else {
            jump.jump_cut_off
        }
    } else if vy < -VERTICAL_REST {
        if grounded {
            ctx.body.velocity.y = 0.0;
            1.0
        } else {
            jump.downward_movement_multiplier
        }
    } else {
        if grounded {
            ctx.currently_jumping = false;
            ctx.body.velocity.y = 0.0;
        }
        1.0
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::tests::context_on_floor;

    const EPS: f32 = 1.0e-4;

    #[test]
    fn jump_speed_reaches_height() {
        assert!((jump_speed(-20.0, 3.0) - 120.0_f32.sqrt()).abs() < EPS);
        assert!((jump_speed(-20.0, 3.0) - 10.954).abs() < 1.0e-3);
        assert_eq!(jump_speed(-9.81, 0.0), 0.0);
    }

    #[test]
    fn base_gravity_follows_arc_and_multiplier() {
        let mut ctx = context_on_floor();
        ctx.current_jump.jump_height = 2.0;
        ctx.current_jump.time_to_jump_apex = 0.5;
        ctx.grav_multiplier = 3.0;
        set_physics(&mut ctx);
        assert!((ctx.base_grav - 48.0).abs() < EPS);
    }

    #[test]
    fn buffered_request_expires() {
        let mut ctx = context_on_floor();
        ctx.config.jump_buffer = 0.11;
        ctx.desired_jump = true;
        for _ in 0..5 {
            tick_jump_buffer(&mut ctx, 0.02);
        }
        assert!(ctx.desired_jump);
        tick_jump_buffer(&mut ctx, 0.02);
        assert!(!ctx.desired_jump);
        assert_eq!(ctx.jump_buffer_timer, 0.0);
    }

    #[test]
    fn grounded_jump_sets_launch_speed() {
        let mut ctx = context_on_floor();
        ctx.body.grounded = true;
        ctx.desired_jump = true;
        assert!(perform_jump(&mut ctx));
        let expected = jump_speed(ctx.body.settings().gravity.y, ctx.current_jump.jump_height);
        assert!((ctx.current_velocity.y - expected).abs() < EPS);
        assert!(!ctx.desired_jump);
    }

    #[test]
    fn coyote_window_allows_one_late_jump() {
        let mut ctx = context_on_floor();
        ctx.body.grounded = false;
        ctx.coyote_timer = 0.05;
        ctx.desired_jump = true;
        assert!(perform_jump(&mut ctx));
        assert_eq!(ctx.coyote_timer, 0.0);

        ctx.desired_jump = true;
        assert!(!perform_jump(&mut ctx));
        assert!(ctx.desired_jump, "request stays buffered");
    }

    #[test]
    fn late_request_without_buffer_is_dropped() {
        let mut ctx = context_on_floor();
        ctx.config.jump_buffer = 0.0;
        ctx.body.grounded = false;
        ctx.coyote_timer = 1.0;
        ctx.desired_jump = true;
        assert!(!perform_jump(&mut ctx));
        assert!(!ctx.desired_jump);
    }

    #[test]
    fn gravity_multiplier_per_phase() {
        let mut ctx = context_on_floor();
        let jump = ctx.current_jump;
        ctx.body.grounded = false;
        ctx.currently_jumping = true;

        ctx.body.velocity.y = 5.0;
        ctx.pressing_jump = true;
        calculate_gravity(&mut ctx);
        assert_eq!(ctx.grav_multiplier, jump.upward_movement_multiplier);

        ctx.pressing_jump = false;
        calculate_gravity(&mut ctx);
        assert_eq!(ctx.grav_multiplier, jump.jump_cut_off);

        ctx.body.velocity.y = -5.0;
        calculate_gravity(&mut ctx);
        assert_eq!(ctx.grav_multiplier, jump.downward_movement_multiplier);

        ctx.body.grounded = true;
        calculate_gravity(&mut ctx);
        assert_eq!(ctx.grav_multiplier, 1.0);
        assert_eq!(ctx.body.velocity.y, 0.0);

        calculate_gravity(&mut ctx);
        assert!(!ctx.currently_jumping);
    }
}
