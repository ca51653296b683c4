/*!
The motion context: the one mutable record every player state reads and writes.

It owns the motion body, the tunables, the per-tick input and all runtime bookkeeping
(timers, friction, gravity multiplier). Only the active path touches it during a tick, leaf
first, so no state keeps a copy of anything in here.
*/

use kinematic::{CollisionHit, MotionBody, Vec3, horizontal};
use nalgebra::Vector2;

use crate::{
    config::{JumpData, MotionConfig},
    input::{InputSnapshot, move_direction},
};

/// Ticks a grab press stays requested.
pub const GRAB_REQUEST_TICKS: u8 = 2;

/// Squared speeds below this are snapped to zero.
pub const REST_SPEED_SQ: f32 = 0.001;

#[derive(Debug)]
pub struct MotionContext {
    pub config: MotionConfig,
    pub body: MotionBody,

    // Input
    pub move_input: Vector2<f32>,
    /// Camera-relative, length follows the stick.
    pub move_direction: Vec3,
    /// Last non-zero move direction.
    pub facing: Vec3,
    pub desired_jump: bool,
    pub pressing_jump: bool,
    pub desired_grab: bool,
    pub pressing_grab: bool,
    grab_request_ticks: u8,

    // Jump
    pub coyote_timer: f32,
    pub jump_buffer_timer: f32,
    pub currently_jumping: bool,
    pub current_jump: JumpData,
    /// Airborne gravity acceleration, recomputed every tick.
    pub base_grav: f32,
    pub grav_multiplier: f32,
    pub jump_speed: f32,
    /// Working copy of the velocity while the jump check runs.
    pub current_velocity: Vec3,

    // Movement
    pub use_gravity: bool,
    pub current_friction: f32,
    pub current_move_mult: f32,

    // Abilities
    pub has_grabbed: bool,
    pub grab_timer: f32,
    /// Seconds spent sliding; `None` when not sliding.
    pub slide_timer: Option<f32>,
    pub stun_timer: f32,
    pub is_stunned: bool,

    /// Hits recorded by this tick's move, waiting to be dispatched.
    pub collisions: Vec<CollisionHit>,
}

impl MotionContext {
    pub fn new(config: MotionConfig, body: MotionBody) -> Self {
        Self {
            current_friction: config.ground_friction,
            current_jump: config.base_jump,
            config,
            body,
            move_input: Vector2::zeros(),
            move_direction: Vec3::zeros(),
            facing: Vec3::z(),
            desired_jump: false,
            pressing_jump: false,
            desired_grab: false,
            pressing_grab: false,
            grab_request_ticks: 0,
            coyote_timer: 0.0,
            jump_buffer_timer: 0.0,
            currently_jumping: false,
            base_grav: 0.0,
            grav_multiplier: 1.0,
            jump_speed: 0.0,
            current_velocity: Vec3::zeros(),
            use_gravity: true,
            current_move_mult: 1.0,
            has_grabbed: false,
            grab_timer: 0.0,
            slide_timer: None,
            stun_timer: 0.0,
            is_stunned: false,
            collisions: Vec::new(),
        }
    }

    /// Latch this tick's input: edges become requests, levels are copied, and the move
    /// direction is resolved against the camera.
    pub fn apply_input(&mut self, input: &InputSnapshot, camera_yaw: f32) {
        self.move_input = input.move_vector;
        self.move_direction = move_direction(input, camera_yaw);
        if self.move_direction != Vec3::zeros() {
            self.facing = self.move_direction;
        }

        if input.jump.pressed {
            self.desired_jump = true;
        }
        self.pressing_jump = input.jump.held;

        if input.grab.pressed {
            self.desired_grab = true;
            self.grab_request_ticks = GRAB_REQUEST_TICKS;
        }
        self.pressing_grab = input.grab.held;
    }

    /// Close the grab request once its window has run out. Call once per tick.
    pub fn tick_grab_window(&mut self) {
        if self.grab_request_ticks == 0 {
            return;
        }
        self.grab_request_ticks -= 1;
        if self.grab_request_ticks == 0 {
            self.desired_grab = false;
        }
    }

    pub fn has_move_input(&self) -> bool {
        self.move_input != Vector2::zeros()
    }

    pub fn horizontal_speed(&self) -> f32 {
        horizontal(self.body.velocity).norm()
    }

    /// Scale only the horizontal velocity.
    pub fn scale_horizontal_velocity(&mut self, factor: f32) {
        self.body.velocity.x *= factor;
        self.body.velocity.z *= factor;
    }

    /// Add `accel * current_move_mult * dt` along the move direction.
    pub fn accelerate(&mut self, accel: f32, dt: f32) {
        self.body.velocity += self.move_direction * (accel * self.current_move_mult * dt);
    }
}
