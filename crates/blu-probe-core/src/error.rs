use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CoreError {
    pub(crate) fn invalid_address(reason: impl Into<String>) -> Self {
        Self::InvalidAddress(reason.into())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error("RPC transport failure: {0}")]
    Transport(#[source] std::io::Error),

    /// The peer closed the stream before a response with the awaited id
    /// arrived. `partial` holds whatever unterminated data was buffered.
    #[error("connection closed before a matching response arrived (buffered: {partial:?})")]
    ConnectionClosed { partial: String },

    #[error("timed out after {0:?} waiting for the server")]
    TimedOut(Duration),

    #[error("RPC server error {code}: {message}")]
    ServerError { code: i64, message: String },

    #[error("invalid RPC response: {0}")]
    InvalidResponse(String),

    #[error("incoming line exceeds {limit} bytes without a newline")]
    LineTooLong { limit: usize },
}
