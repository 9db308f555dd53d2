//! Error types for the message channel.

use infinity_protocol::ArgsError;

/// Structured failure returned to the caller of a request.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("handler failed: {0}")]
    Handler(String),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("channel closed")]
    Closed,
}

impl From<ArgsError> for ChannelError {
    fn from(err: ArgsError) -> Self {
        ChannelError::InvalidArgs(err.to_string())
    }
}

impl From<serde_json::Error> for ChannelError {
    fn from(err: serde_json::Error) -> Self {
        ChannelError::Handler(format!("failed to encode response: {err}"))
    }
}
