// ABOUTME: Outbound request envelope and the correlation id that ties a reply to its request.
// ABOUTME: Ids are 20 random alphanumeric characters generated client-side.

use crate::command::Command;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Length of generated correlation ids
pub const REQUEST_ID_LEN: usize = 20;

/// Opaque token correlating one request with its reply.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    /// Draw a fresh id from the 62-character alphanumeric alphabet
    pub fn generate() -> Self {
        let id = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(REQUEST_ID_LEN)
            .map(char::from)
            .collect();
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RequestId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for RequestId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for RequestId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A command stamped with its correlation id, ready to send.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandEnvelope {
    command: &'static str,
    #[serde(rename = "requestId")]
    request_id: RequestId,
    parameters: Vec<Value>,
}

impl CommandEnvelope {
    /// Build the envelope for `command` under a freshly generated id
    pub fn new(command: &Command) -> Self {
        Self {
            command: command.name(),
            request_id: RequestId::generate(),
            parameters: command.fields(),
        }
    }

    pub fn command(&self) -> &'static str {
        self.command
    }

    pub fn request_id(&self) -> &RequestId {
        &self.request_id
    }

    pub fn parameters(&self) -> &[Value] {
        &self.parameters
    }

    /// Serialize to the JSON text frame sent over the control channel
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
