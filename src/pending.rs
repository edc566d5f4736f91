// ABOUTME: Table of calls awaiting a reply, keyed by correlation id, each with its own timeout timer.
// ABOUTME: Removal from the table decides the winner, so every call settles exactly once.

use crate::error::BridgeError;
use mcc_protocol::RequestId;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::AbortHandle;

type Settlement = Result<Value, BridgeError>;

/// One outstanding call
struct PendingCall {
    command: &'static str,
    reply: oneshot::Sender<Settlement>,
    timer: Option<AbortHandle>,
}

impl PendingCall {
    fn settle(self, outcome: Settlement) {
        if let Some(timer) = &self.timer {
            timer.abort();
        }
        // The caller may have stopped waiting; nothing to do then
        let _ = self.reply.send(outcome);
    }
}

/// Shared state for outstanding calls
type PendingMap = Arc<Mutex<HashMap<RequestId, PendingCall>>>;

/// Outstanding calls, shared between the invoking side and the inbound side
#[derive(Clone)]
pub struct PendingCalls {
    calls: PendingMap,
    timeout: Duration,
}

impl PendingCalls {
    pub fn new(timeout: Duration) -> Self {
        Self {
            calls: Arc::new(Mutex::new(HashMap::new())),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Insert an entry for `request_id` and start its timer.
    ///
    /// Must be called from within a tokio runtime. An existing entry under the
    /// same id is displaced and its caller sees `Abandoned`.
    pub fn register(&self, request_id: RequestId, command: &'static str) -> PendingReply {
        let (tx, rx) = oneshot::channel();

        let displaced = {
            let mut calls = self.calls.lock().unwrap_or_else(|e| e.into_inner());

            // Spawned under the lock so expiry cannot run before the entry exists
            let table = self.clone();
            let id = request_id.clone();
            let timeout = self.timeout;
            let timer = tokio::spawn(async move {
                tokio::time::sleep(timeout).await;
                table.expire(&id);
            });

            calls.insert(
                request_id.clone(),
                PendingCall {
                    command,
                    reply: tx,
                    timer: Some(timer.abort_handle()),
                },
            )
        };

        if let Some(old) = displaced {
            tracing::warn!(
                request_id = %request_id,
                command = old.command,
                "Correlation id collision, abandoning older call"
            );
            let command = old.command;
            old.settle(Err(BridgeError::Abandoned {
                request_id: request_id.clone(),
                command,
            }));
        }

        PendingReply {
            request_id,
            command,
            rx,
        }
    }

    fn take(&self, request_id: &RequestId) -> Option<PendingCall> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(request_id)
    }

    /// Deliver a reply. Returns false if no call with this id is outstanding.
    pub fn resolve(&self, request_id: &RequestId, result: Value) -> bool {
        match self.take(request_id) {
            Some(call) => {
                tracing::debug!(request_id = %request_id, command = call.command, "Command settled");
                call.settle(Ok(result));
                true
            }
            None => false,
        }
    }

    /// Fail the call with a timeout. Returns false if it already settled.
    pub fn expire(&self, request_id: &RequestId) -> bool {
        match self.take(request_id) {
            Some(call) => {
                tracing::warn!(request_id = %request_id, command = call.command, "Command timed out");
                let command = call.command;
                call.settle(Err(BridgeError::Timeout {
                    request_id: request_id.clone(),
                    command,
                }));
                true
            }
            None => false,
        }
    }

    /// Drop an entry whose request never went out; no settlement is delivered
    pub fn cancel(&self, request_id: &RequestId) {
        if let Some(call) = self.take(request_id) {
            if let Some(timer) = call.timer {
                timer.abort();
            }
        }
    }

    /// Settle every outstanding call as `Abandoned`; returns how many there were
    pub fn abandon_all(&self) -> usize {
        let drained: Vec<(RequestId, PendingCall)> = self
            .calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .drain()
            .collect();

        let count = drained.len();
        for (request_id, call) in drained {
            tracing::debug!(request_id = %request_id, command = call.command, "Abandoning command");
            let command = call.command;
            call.settle(Err(BridgeError::Abandoned {
                request_id,
                command,
            }));
        }
        count
    }

    pub fn len(&self) -> usize {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, request_id: &RequestId) -> bool {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(request_id)
    }
}

/// Awaitable result of one registered call
#[derive(Debug)]
pub struct PendingReply {
    request_id: RequestId,
    command: &'static str,
    rx: oneshot::Receiver<Settlement>,
}

impl PendingReply {
    pub fn request_id(&self) -> &RequestId {
        &self.request_id
    }

    pub fn command(&self) -> &'static str {
        self.command
    }
}

impl Future for PendingReply {
    type Output = Settlement;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let polled = Pin::new(&mut self.rx).poll(cx);
        match polled {
            Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
            // Sender dropped without settling
            Poll::Ready(Err(_)) => Poll::Ready(Err(BridgeError::Abandoned {
                request_id: self.request_id.clone(),
                command: self.command,
            })),
            Poll::Pending => Poll::Pending,
        }
    }
}
