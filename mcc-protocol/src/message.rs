// ABOUTME: Classifies inbound control-channel frames as command replies or event notifications.
// ABOUTME: Reply frames carry a requestId; event frames carry an "event" discriminator.

use crate::command::AUTHENTICATE_COMMAND;
use crate::envelope::RequestId;
use serde_json::{Map, Value};
use thiserror::Error;

/// Field naming the correlation id on reply frames
pub const REQUEST_ID_FIELD: &str = "requestId";

/// Field naming the event discriminator on event frames
pub const EVENT_FIELD: &str = "event";

/// Field holding the event payload, when the remote side nests it
pub const DATA_FIELD: &str = "data";

/// Reply to a previously sent command
#[derive(Debug, Clone, PartialEq)]
pub struct InboundReply {
    pub request_id: RequestId,
    /// Result payload; shape depends on the command and is not validated here
    pub result: Value,
    /// Echo of the command name, when the remote side includes it
    pub command: Option<String>,
}

impl InboundReply {
    /// Whether this reply answers the authentication handshake
    pub fn is_handshake(&self) -> bool {
        self.command.as_deref() == Some(AUTHENTICATE_COMMAND)
    }
}

/// Unsolicited notification from the remote agent
#[derive(Debug, Clone, PartialEq)]
pub struct InboundEvent {
    pub name: String,
    pub payload: Value,
}

/// One classified inbound frame
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    Reply(InboundReply),
    Event(InboundEvent),
}

#[derive(Debug, Error)]
pub enum MessageError {
    #[error("frame is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("frame is not a JSON object")]
    NotAnObject,

    #[error("frame has neither a requestId nor an event discriminator")]
    Unclassified,
}

impl InboundMessage {
    /// Parse and classify one text frame
    pub fn parse(text: &str) -> Result<Self, MessageError> {
        let value: Value = serde_json::from_str(text)?;
        Self::classify(value)
    }

    /// Classify an already-decoded frame
    pub fn classify(value: Value) -> Result<Self, MessageError> {
        let Value::Object(mut object) = value else {
            return Err(MessageError::NotAnObject);
        };

        if let Some(Value::String(request_id)) = object.remove(REQUEST_ID_FIELD) {
            let result = object.remove("result").unwrap_or(Value::Null);
            let command = match object.remove("command") {
                Some(Value::String(name)) => Some(name),
                _ => None,
            };
            return Ok(Self::Reply(InboundReply {
                request_id: RequestId::from(request_id),
                result,
                command,
            }));
        }

        match object.remove(EVENT_FIELD) {
            Some(Value::String(name)) => {
                let payload = extract_payload(object);
                Ok(Self::Event(InboundEvent { name, payload }))
            }
            _ => Err(MessageError::Unclassified),
        }
    }
}

/// Pull the event payload out of what remains of the frame.
///
/// A nested `data` field wins; the remote side sometimes sends it as a JSON
/// string, which is decoded when possible. Without `data`, the remaining
/// top-level fields are the payload.
fn extract_payload(mut object: Map<String, Value>) -> Value {
    match object.remove(DATA_FIELD) {
        Some(Value::String(text)) => match serde_json::from_str(&text) {
            Ok(decoded) => decoded,
            Err(_) => {
                tracing::trace!(len = text.len(), "Event data is plain text, passing through");
                Value::String(text)
            }
        },
        Some(data) => data,
        None => Value::Object(object),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reply_is_classified_by_request_id() {
        let message = InboundMessage::parse(r#"{"requestId":"abc","result":42.5}"#).unwrap();
        match message {
            InboundMessage::Reply(reply) => {
                assert_eq!(reply.request_id.as_str(), "abc");
                assert_eq!(reply.result, json!(42.5));
                assert!(reply.command.is_none());
                assert!(!reply.is_handshake());
            }
            other => panic!("Expected reply, got {:?}", other),
        }
    }

    #[test]
    fn test_reply_without_result_is_null() {
        let message = InboundMessage::parse(r#"{"requestId":"abc"}"#).unwrap();
        assert!(matches!(message, InboundMessage::Reply(r) if r.result.is_null()));
    }

    #[test]
    fn test_handshake_reply_is_recognized() {
        let message =
            InboundMessage::parse(r#"{"requestId":"x","command":"Authenticate","result":true}"#)
                .unwrap();
        assert!(matches!(message, InboundMessage::Reply(r) if r.is_handshake()));
    }

    #[test]
    fn test_event_with_flat_fields() {
        let message =
            InboundMessage::parse(r#"{"event":"OnHealthUpdate","health":20,"food":18}"#).unwrap();
        assert_eq!(
            message,
            InboundMessage::Event(InboundEvent {
                name: "OnHealthUpdate".to_string(),
                payload: json!({"health": 20, "food": 18}),
            })
        );
    }

    #[test]
    fn test_event_with_nested_data_object() {
        let message =
            InboundMessage::parse(r#"{"event":"OnServerTpsUpdate","data":{"tps":19.9}}"#).unwrap();
        assert!(matches!(message, InboundMessage::Event(e) if e.payload == json!({"tps": 19.9})));
    }

    #[test]
    fn test_event_with_stringified_data() {
        let message =
            InboundMessage::parse(r#"{"event":"OnPlayerJoin","data":"{\"uuid\":\"u\",\"name\":\"n\"}"}"#)
                .unwrap();
        assert!(
            matches!(message, InboundMessage::Event(e) if e.payload == json!({"uuid": "u", "name": "n"}))
        );
    }

    #[test]
    fn test_unclassified_frames_are_errors() {
        assert!(matches!(
            InboundMessage::parse(r#"{"hello":"world"}"#),
            Err(MessageError::Unclassified)
        ));
        assert!(matches!(
            InboundMessage::parse("[1,2]"),
            Err(MessageError::NotAnObject)
        ));
        assert!(matches!(
            InboundMessage::parse("not json"),
            Err(MessageError::Json(_))
        ));
    }
}
