use hsm::BuildError;
use kinematic::SettingsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read motion config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse motion config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid motion config `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("invalid body settings: {0}")]
    Body(#[from] SettingsError),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("player state graph: {0}")]
    StateGraph(#[from] BuildError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
