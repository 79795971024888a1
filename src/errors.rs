use std::io;

use thiserror::Error;

/// Error type for sequencer configuration and session-output failures.
///
/// Restart exhaustion in the main generator is deliberately not represented
/// here: a usable sequence is still produced, so it surfaces as the
/// `streak_satisfied` flag on [`crate::MainSequence`] instead.
#[derive(Debug, Error)]
pub enum SequencerError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}
