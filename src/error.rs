/*
 * Error Module
 *
 * The simulation loop itself cannot fail; the only errors are rejected
 * parameters at construction and failures loading a parameter file.
 */

/// Reasons a flock refuses to be constructed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("agent count must be at least 1")]
    EmptyFlock,
    #[error("{name} must be positive and finite, got {value}")]
    NonPositive { name: &'static str, value: f32 },
    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f32 },
}

/// Error type for loading parameters from disk.
#[derive(Debug, thiserror::Error)]
pub enum ParamsLoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid parameters: {0}")]
    Invalid(#[from] ConfigError),
}
