use crate::ids::SpaceId;
use std::path::PathBuf;
use thiserror::Error;

/// Operational failures reported by a [`SpaceService`](crate::SpaceService).
///
/// Flows recover from these locally: they surface an indicator and stay
/// where they were so the user can retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpaceServiceError {
    #[error("space {0} not found")]
    NotFound(SpaceId),
    #[error("not allowed to {operation} space {space}")]
    Forbidden {
        operation: &'static str,
        space: SpaceId,
    },
    #[error("network error: {0}")]
    Network(String),
    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value `{value}` for {key}")]
    InvalidValue { key: &'static str, value: String },
}
