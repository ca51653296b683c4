use thiserror::Error;

/// Invalid [`BodySettings`](crate::collision::settings::BodySettings) or body dimensions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    #[error("skin width must be positive, got {0}")]
    SkinWidth(f32),
    #[error("max bounces must be at least 1")]
    MaxBounces,
    #[error("max slope angle must be in (0, 90] degrees, got {0}")]
    SlopeAngle(f32),
    #[error("{name} must be a finite non-negative distance, got {value}")]
    NegativeDistance { name: &'static str, value: f32 },
    #[error("gravity must be finite")]
    Gravity,
    #[error("half extents ({x}, {y}, {z}) must all exceed the skin width {skin}")]
    HalfExtents { x: f32, y: f32, z: f32, skin: f32 },
}
