use thiserror::Error;

/// Errors raised while resolving a single check.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckError {
    /// A manually entered d20 outside 1..=20. Never clamped.
    #[error("invalid manual roll {0}: enter a value between 1 and 20")]
    InvalidRoll(i32),
    /// A scripted die value outside 1..=20.
    #[error("scripted d20 value {0} is outside 1..=20")]
    ScriptedOutOfRange(u8),
    #[error("scripted dice need at least one value")]
    EmptyScript,
}

/// Errors raised while reading a check request payload.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("malformed check request JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed check request YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid check request: {0}")]
    Invalid(String),
}
