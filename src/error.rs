// ABOUTME: Error type surfaced to callers of remote commands.
// ABOUTME: Every failure is scoped to one call; none of them poison the bridge.

use mcc_protocol::{RequestId, TransportError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    /// No reply arrived within the execution timeout
    #[error("Command with requestId {request_id} timed out ({command})")]
    Timeout {
        request_id: RequestId,
        command: &'static str,
    },

    /// The control channel refused the frame; nothing was left pending
    #[error("Transport unavailable: {0}")]
    TransportUnavailable(#[from] TransportError),

    /// The call was torn down before a reply or timeout settled it
    #[error("Command with requestId {request_id} was abandoned ({command})")]
    Abandoned {
        request_id: RequestId,
        command: &'static str,
    },

    #[error("Unexpected result for {command}: {source}")]
    UnexpectedResult {
        command: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Commands can only be issued from inside a tokio runtime
    #[error("{command} invoked outside a tokio runtime")]
    NoRuntime { command: &'static str },

    /// The command belongs to the connection handshake, not to bot code
    #[error("{command} is reserved for the connection handshake")]
    Reserved { command: &'static str },

    #[error("Failed to serialize request: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl BridgeError {
    /// Correlation id of the call this error settled, if it was registered
    pub fn request_id(&self) -> Option<&RequestId> {
        match self {
            Self::Timeout { request_id, .. } | Self::Abandoned { request_id, .. } => {
                Some(request_id)
            }
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
