use std::sync::Arc;

use kinematic::{GeometryQuery, MotionBody, Vec3};

use crate::{
    config::MotionConfig,
    context::MotionContext,
    error::{ConfigError, Result},
    input::InputSnapshot,
    jump,
    states::{PlayerMachine, PlayerState, build_machine},
};

/// Drives one player: owns the state machine and the motion context, and runs the fixed
/// per-tick order.
pub struct PlayerController {
    machine: PlayerMachine,
    ctx: MotionContext,
}

impl PlayerController {
    pub fn new(
        config: MotionConfig,
        world: Arc<dyn GeometryQuery + Send + Sync>,
        spawn: Vec3,
        half_extents: Vec3,
    ) -> Result<Self> {
        config.validate()?;
        let body =
            MotionBody::new(world, config.body, spawn, half_extents).map_err(ConfigError::Body)?;
        let mut ctx = MotionContext::new(config, body);
        ctx.body.update_grounded();

        let mut machine = build_machine()?;
        machine.start(&mut ctx);
        log::info!(
            "player controller ready at {:?} in {:?}",
            ctx.body.position,
            machine.active_leaf()
        );
        Ok(Self { machine, ctx })
    }

    /// Advance one fixed step.
    pub fn tick(&mut self, input: &InputSnapshot, camera_yaw: f32, dt: f32) {
        let ctx = &mut self.ctx;

        ctx.apply_input(input, camera_yaw);
        ctx.body.update_grounded();
        jump::set_physics(ctx);

        self.machine.update(ctx, dt);
        // A fresh request is honored before it ages.
        jump::tick_jump_buffer(ctx, dt);

        let hits = std::mem::take(&mut ctx.collisions);
        if !hits.is_empty() {
            self.machine.dispatch_all(ctx, &hits);
        }

        ctx.tick_grab_window();
    }

    pub fn active_leaf(&self) -> Option<PlayerState> {
        self.machine.active_leaf()
    }

    pub fn active_path(&self) -> Vec<PlayerState> {
        self.machine.active_path()
    }

    pub fn is_in(&self, state: PlayerState) -> bool {
        self.machine.is_active(state)
    }

    pub fn context(&self) -> &MotionContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut MotionContext {
        &mut self.ctx
    }

    /// Transition from the active leaf to `state` outside the normal rules.
    pub fn force_state(&mut self, state: PlayerState) -> bool {
        self.machine.transition_to(&mut self.ctx, state)
    }
}
