//! Planning errors.

use thiserror::Error;

/// Errors raised while planning artifacts.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("no artifact requested: both static and shared builds are disabled")]
    InconsistentArtifactRequest,

    #[error("configuration error: {0}")]
    Config(#[from] lz4build_config::ConfigError),
}
