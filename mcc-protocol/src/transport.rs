// ABOUTME: Outbound seam between the bridge and whatever owns the control-channel socket.
// ABOUTME: Sending is synchronous and fire-and-forget; replies come back through the inbound stream.

use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("control channel is closed")]
    Closed,

    #[error("control channel rejected the frame: {0}")]
    Rejected(String),
}

/// Sends serialized frames to the remote agent.
pub trait Transport: Send + Sync {
    /// Queue one text frame for transmission
    fn send(&self, frame: String) -> Result<(), TransportError>;
}

/// Transport backed by an unbounded channel drained by a socket task
#[derive(Debug, Clone)]
pub struct ChannelTransport {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelTransport {
    pub fn new(tx: mpsc::UnboundedSender<String>) -> Self {
        Self { tx }
    }

    /// Create a transport together with the receiving end a socket task reads from
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl Transport for ChannelTransport {
    fn send(&self, frame: String) -> Result<(), TransportError> {
        self.tx.send(frame).map_err(|_| TransportError::Closed)
    }
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn send(&self, frame: String) -> Result<(), TransportError> {
        (**self).send(frame)
    }
}
