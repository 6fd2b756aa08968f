use agent_chat_sdk::ChatError;
use std::time::Duration;
use thiserror::Error;

/// Failures that abandon an assembly run
///
/// Research problems never surface here; they are recorded as placeholder
/// entries. Only the final composition call can fail a run.
#[derive(Debug, Error)]
pub enum SowError {
    #[error("SOW composition failed: {source}")]
    Composition {
        #[source]
        source: ChatError,
    },

    #[error("SOW composition timed out after {0:?}")]
    CompositionTimeout(Duration),

    #[error("SOW generation cancelled")]
    Cancelled,

    #[error("Failed to serialize personalization data: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<ChatError> for SowError {
    fn from(source: ChatError) -> Self {
        SowError::Composition { source }
    }
}
