// ABOUTME: Routes command replies to the call waiting on their correlation id.
// ABOUTME: Handshake replies are skipped; replies for unknown or settled ids are dropped.

use crate::pending::PendingCalls;
use mcc_protocol::InboundReply;

/// What happened to one inbound reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Delivered to a waiting caller
    Settled,
    /// Authentication handshake reply; owned by the connection layer
    Handshake,
    /// No outstanding call had this id (late, duplicate or foreign)
    Unknown,
}

#[derive(Clone)]
pub struct ResponseRouter {
    pending: PendingCalls,
}

impl ResponseRouter {
    pub fn new(pending: PendingCalls) -> Self {
        Self { pending }
    }

    pub fn route(&self, reply: InboundReply) -> RouteOutcome {
        if reply.is_handshake() {
            tracing::debug!(request_id = %reply.request_id, "Ignoring handshake reply");
            return RouteOutcome::Handshake;
        }

        if self.pending.resolve(&reply.request_id, reply.result) {
            RouteOutcome::Settled
        } else {
            tracing::debug!(request_id = %reply.request_id, "Received reply for unknown request");
            RouteOutcome::Unknown
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcc_protocol::RequestId;
    use serde_json::{json, Value};
    use std::time::Duration;

    fn reply(id: &str, command: Option<&str>, result: Value) -> InboundReply {
        InboundReply {
            request_id: RequestId::from(id),
            result,
            command: command.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_reply_settles_matching_call() {
        let pending = PendingCalls::new(Duration::from_secs(10));
        let router = ResponseRouter::new(pending.clone());
        let call = pending.register(RequestId::from("r1"), "GetUsername");

        assert_eq!(router.route(reply("r1", None, json!("steve"))), RouteOutcome::Settled);
        assert_eq!(call.await.unwrap(), json!("steve"));
    }

    #[tokio::test]
    async fn test_unknown_and_late_replies_are_dropped() {
        let pending = PendingCalls::new(Duration::from_secs(10));
        let router = ResponseRouter::new(pending.clone());
        let _call = pending.register(RequestId::from("r1"), "GetYaw");

        assert_eq!(router.route(reply("nope", None, json!(1))), RouteOutcome::Unknown);
        assert_eq!(router.route(reply("r1", None, json!(1))), RouteOutcome::Settled);
        assert_eq!(router.route(reply("r1", None, json!(2))), RouteOutcome::Unknown);
    }

    #[tokio::test]
    async fn test_handshake_reply_never_settles() {
        let pending = PendingCalls::new(Duration::from_secs(10));
        let router = ResponseRouter::new(pending.clone());
        let _call = pending.register(RequestId::from("auth"), "GetYaw");

        let outcome = router.route(reply("auth", Some("Authenticate"), json!(true)));
        assert_eq!(outcome, RouteOutcome::Handshake);
        assert!(pending.contains(&RequestId::from("auth")));
    }
}
