//! Construction and configuration faults
//!
//! Gameplay itself never fails: bad commands are ignored. Only building a
//! session and loading balance data can go wrong.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    /// A required collaborator was not supplied when building a session
    #[error("initialization fault: {collaborator} collaborator unavailable")]
    InitializationFault { collaborator: &'static str },

    /// Tuning value outside its usable range
    #[error("invalid tuning value for `{field}`: {reason}")]
    InvalidTuning {
        field: &'static str,
        reason: &'static str,
    },

    #[error("failed to parse tuning JSON: {0}")]
    TuningParse(#[from] serde_json::Error),
}

pub type GameResult<T> = Result<T, GameError>;
