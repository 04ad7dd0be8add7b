//! Engine error taxonomy.

use thiserror::Error;

use playback_types::UnknownLoopMode;

/// Errors surfaced to the command layer.
///
/// "Nothing to play" and "nothing previous" are not errors; those outcomes
/// are `Option` returns on the operations themselves.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Malformed input to a setter; session state is unchanged.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<UnknownLoopMode> for EngineError {
    fn from(err: UnknownLoopMode) -> Self {
        EngineError::InvalidArgument(err.to_string())
    }
}
