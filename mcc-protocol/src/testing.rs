// ABOUTME: Test transport that records every outbound frame instead of sending it.
// ABOUTME: Can be switched into a failing mode to exercise send-failure paths.

use crate::transport::{Transport, TransportError};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Records frames in memory; clones share the same log
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    frames: Arc<Mutex<Vec<String>>>,
    failing: Arc<AtomicBool>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent sends fail with `TransportError::Closed` (or succeed again)
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Copy of every frame sent so far
    pub fn frames(&self) -> Vec<String> {
        self.frames
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn sent_count(&self) -> usize {
        self.frames.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Most recent frame decoded as JSON
    pub fn last_envelope(&self) -> Option<Value> {
        let frames = self.frames.lock().unwrap_or_else(|e| e.into_inner());
        frames
            .last()
            .and_then(|frame| serde_json::from_str(frame).ok())
    }

    /// Correlation id of the most recent frame
    pub fn last_request_id(&self) -> Option<String> {
        self.last_envelope()
            .and_then(|envelope| envelope["requestId"].as_str().map(str::to_string))
    }

    pub fn clear(&self) {
        self.frames.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

impl Transport for RecordingTransport {
    fn send(&self, frame: String) -> Result<(), TransportError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(TransportError::Closed);
        }
        self.frames
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(frame);
        Ok(())
    }
}
