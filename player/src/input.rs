use kinematic::{Vec3, planar_to_world};
use nalgebra::Vector2;

/// A button's state for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ButtonState {
    /// Went down this tick.
    pub pressed: bool,
    /// Is down this tick.
    pub held: bool,
}

impl ButtonState {
    pub const RELEASED: Self = Self {
        pressed: false,
        held: false,
    };

    pub fn press() -> Self {
        Self {
            pressed: true,
            held: true,
        }
    }

    pub fn hold() -> Self {
        Self {
            pressed: false,
            held: true,
        }
    }
}

/// Everything the controller reads from the player for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputSnapshot {
    /// x = right, y = forward; magnitude at most 1 for full speed.
    pub move_vector: Vector2<f32>,
    pub jump: ButtonState,
    pub grab: ButtonState,
}

impl InputSnapshot {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn moving(x: f32, y: f32) -> Self {
        Self {
            move_vector: Vector2::new(x, y),
            ..Self::default()
        }
    }

    pub fn with_jump(mut self, jump: ButtonState) -> Self {
        self.jump = jump;
        self
    }

    pub fn with_grab(mut self, grab: ButtonState) -> Self {
        self.grab = grab;
        self
    }
}

/// World-space move direction relative to a camera yaw (radians, 0 looks along +Z).
///
/// The length follows the stick, so half-tilt accelerates at half rate.
pub fn move_direction(input: &InputSnapshot, camera_yaw: f32) -> Vec3 {
    planar_to_world(input.move_vector, camera_yaw)
}
