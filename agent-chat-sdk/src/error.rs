//! Error types for chat calls

/// Result type for chat operations
pub type Result<T> = std::result::Result<T, ChatError>;

/// Errors that can occur while talking to the chat endpoint
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// Request never produced an HTTP response (DNS, connect, TLS, reset...)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Client-side request timeout configured on the HTTP client
    #[error("Request timed out")]
    Timeout,

    /// Endpoint rejected the bearer token
    #[error("Unauthorized ({status}): {body}")]
    Unauthorized { status: u16, body: String },

    /// Endpoint is throttling this caller
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Any other non-success status
    #[error("Chat API request failed: {status} {body}")]
    Status { status: u16, body: String },

    /// Endpoint answered 2xx but reported an error instead of text
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Response body was not the expected JSON
    #[error("Failed to decode chat response: {0}")]
    Decode(String),

    /// Client could not be constructed from the given configuration
    #[error("Invalid client configuration: {0}")]
    Config(String),
}

impl ChatError {
    /// Build the error matching a non-success HTTP status
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => ChatError::Unauthorized { status, body },
            429 => ChatError::RateLimited,
            _ => ChatError::Status { status, body },
        }
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ChatError::Timeout
        } else if err.is_decode() {
            ChatError::Decode(err.to_string())
        } else {
            ChatError::Transport(err.to_string())
        }
    }
}
