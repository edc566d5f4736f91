// ABOUTME: End-to-end tests for the bridge: command round trips, timeouts, event dispatch and lifecycle.
// ABOUTME: Uses the recording transport and a bot that reports each hook call over a channel.

use async_trait::async_trait;
use mcc_bridge::protocol::testing::RecordingTransport;
use mcc_bridge::protocol::{Command, Location, RequestId, TransportError};
use mcc_bridge::{
    Bridge, BotClient, BridgeError, ChatBot, Handled, MoveOptions, RouteOutcome,
};
use serde_json::{json, Value};
use std::time::Duration;
use tokio::sync::mpsc;

/// Bot that reports every hook it sees
struct RecordingBot {
    seen: mpsc::UnboundedSender<String>,
    fail_chat: bool,
    panic_on_respawn: bool,
    fail_initialize: bool,
}

impl RecordingBot {
    fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (seen, rx) = mpsc::unbounded_channel();
        (
            Self {
                seen,
                fail_chat: false,
                panic_on_respawn: false,
                fail_initialize: false,
            },
            rx,
        )
    }

    fn note(&self, entry: impl Into<String>) {
        let _ = self.seen.send(entry.into());
    }
}

#[async_trait]
impl ChatBot for RecordingBot {
    async fn on_initialize(&self, _client: &BotClient) -> anyhow::Result<()> {
        self.note("initialize");
        if self.fail_initialize {
            anyhow::bail!("not ready");
        }
        Ok(())
    }

    async fn on_destroy(&self, _client: &BotClient) -> anyhow::Result<()> {
        self.note("destroy");
        Ok(())
    }

    async fn on_event_error(
        &self,
        _client: &BotClient,
        event: &str,
        error: anyhow::Error,
    ) -> anyhow::Result<()> {
        self.note(format!("error:{event}:{error}"));
        Ok(())
    }

    async fn on_unhandled_event(
        &self,
        _client: &BotClient,
        event: &str,
        payload: Value,
    ) -> anyhow::Result<()> {
        self.note(format!("unhandled:{event}:{payload}"));
        Ok(())
    }

    async fn on_chat_public(
        &self,
        _client: &BotClient,
        username: &str,
        message: &str,
        _raw_text: &str,
    ) -> anyhow::Result<()> {
        if self.fail_chat {
            anyhow::bail!("cannot parse {message}");
        }
        self.note(format!("chat:{username}:{message}"));
        Ok(())
    }

    async fn on_game_joined(&self, _client: &BotClient) -> anyhow::Result<()> {
        self.note("joined");
        Ok(())
    }

    async fn on_death(&self, _client: &BotClient) -> anyhow::Result<()> {
        self.note("death");
        Ok(())
    }

    async fn on_respawn(&self, _client: &BotClient) -> anyhow::Result<()> {
        if self.panic_on_respawn {
            panic!("respawn exploded");
        }
        self.note("respawn");
        Ok(())
    }

    async fn on_held_item_change(&self, _client: &BotClient, item_slot: i64) -> anyhow::Result<()> {
        self.note(format!("slot:{item_slot}"));
        Ok(())
    }

    async fn on_health_update(
        &self,
        _client: &BotClient,
        health: f64,
        food: i64,
    ) -> anyhow::Result<()> {
        self.note(format!("health:{health}:{food}"));
        Ok(())
    }

    async fn on_player_join(
        &self,
        client: &BotClient,
        _uuid: &str,
        name: &str,
    ) -> anyhow::Result<()> {
        let me = client.get_username().await?;
        self.note(format!("greet:{name}:from:{me}"));
        Ok(())
    }
}

fn reply_frame(id: &str, result: Value) -> String {
    json!({ "requestId": id, "result": result }).to_string()
}

async fn wait_for_frames(transport: &RecordingTransport, count: usize) {
    while transport.sent_count() < count {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn test_get_yaw_resolves_with_reply_value() {
    let (bot, _seen) = RecordingBot::new();
    let transport = RecordingTransport::new();
    let bridge = Bridge::builder(bot, transport.clone()).build();

    let client = bridge.client().clone();
    let call = tokio::spawn(async move { client.get_yaw().await });
    wait_for_frames(&transport, 1).await;

    let envelope = transport.last_envelope().unwrap();
    assert_eq!(envelope["command"], "GetYaw");
    assert_eq!(envelope["parameters"], json!([]));

    let id = transport.last_request_id().unwrap();
    let handled = bridge.handle_message(&reply_frame(&id, json!(42.5)));
    assert!(matches!(handled, Handled::Reply(RouteOutcome::Settled)));

    assert_eq!(call.await.unwrap().unwrap(), 42.5);
    assert!(bridge.client().pending_calls().is_empty());
}

#[tokio::test]
async fn test_move_to_location_sends_parameters_in_order() {
    let (bot, _seen) = RecordingBot::new();
    let transport = RecordingTransport::new();
    let bridge = Bridge::builder(bot, transport.clone()).build();

    let client = bridge.client().clone();
    let call = tokio::spawn(async move {
        client
            .move_to_location(Location::new(1.0, 2.0, 3.0), MoveOptions::default())
            .await
    });
    wait_for_frames(&transport, 1).await;

    let envelope = transport.last_envelope().unwrap();
    assert_eq!(envelope["command"], "MoveToLocation");
    assert_eq!(
        envelope["parameters"],
        json!([1, 2, 3, false, false, 0, 0])
    );

    let id = transport.last_request_id().unwrap();
    bridge.handle_message(&reply_frame(&id, json!(true)));
    assert!(call.await.unwrap().unwrap());
}

#[tokio::test(start_paused = true)]
async fn test_unanswered_call_times_out_and_late_reply_is_ignored() {
    let (bot, _seen) = RecordingBot::new();
    let transport = RecordingTransport::new();
    let bridge = Bridge::builder(bot, transport.clone())
        .execution_timeout(Duration::from_secs(2))
        .build();

    let reply = bridge.client().invoke(Command::GetWorld).unwrap();
    let id = reply.request_id().clone();

    let err = reply.await.unwrap_err();
    match &err {
        BridgeError::Timeout {
            request_id,
            command,
        } => {
            assert_eq!(request_id, &id);
            assert_eq!(*command, "GetWorld");
        }
        other => panic!("Expected timeout, got {:?}", other),
    }
    assert!(err.to_string().contains(id.as_str()));
    assert!(bridge.client().pending_calls().is_empty());

    let late = bridge.handle_message(&reply_frame(id.as_str(), json!({})));
    assert!(matches!(late, Handled::Reply(RouteOutcome::Unknown)));
}

#[tokio::test(start_paused = true)]
async fn test_reply_before_deadline_disarms_timer() {
    let (bot, _seen) = RecordingBot::new();
    let transport = RecordingTransport::new();
    let bridge = Bridge::builder(bot, transport.clone())
        .execution_timeout(Duration::from_secs(2))
        .build();

    let reply = bridge.client().invoke(Command::GetPitch).unwrap();
    let id = reply.request_id().clone();

    tokio::time::advance(Duration::from_secs(1)).await;
    bridge.handle_message(&reply_frame(id.as_str(), json!(-12.0)));
    assert_eq!(reply.await.unwrap(), json!(-12.0));

    tokio::time::advance(Duration::from_secs(5)).await;
    assert!(!bridge.client().pending_calls().expire(&id));
}

#[tokio::test]
async fn test_concurrent_calls_settle_independently() {
    let (bot, _seen) = RecordingBot::new();
    let transport = RecordingTransport::new();
    let bridge = Bridge::builder(bot, transport.clone()).build();
    let client = bridge.client();

    let first = client.invoke(Command::GetUsername).unwrap();
    let second = client.invoke(Command::GetServerHost).unwrap();
    assert_ne!(first.request_id(), second.request_id());
    assert_eq!(client.pending_calls().len(), 2);

    bridge.handle_message(&reply_frame(second.request_id().as_str(), json!("mc.example.net")));
    bridge.handle_message(&reply_frame(first.request_id().as_str(), json!("steve")));

    assert_eq!(first.await.unwrap(), json!("steve"));
    assert_eq!(second.await.unwrap(), json!("mc.example.net"));
}

#[tokio::test]
async fn test_send_failure_is_reported_immediately() {
    let (bot, _seen) = RecordingBot::new();
    let transport = RecordingTransport::new();
    transport.set_failing(true);
    let bridge = Bridge::builder(bot, transport.clone()).build();

    let err = bridge.client().sneak(true).await.unwrap_err();
    assert!(matches!(
        err,
        BridgeError::TransportUnavailable(TransportError::Closed)
    ));
    assert!(bridge.client().pending_calls().is_empty());
}

#[tokio::test]
async fn test_handshake_reply_does_not_settle_anything() {
    let (bot, _seen) = RecordingBot::new();
    let transport = RecordingTransport::new();
    let bridge = Bridge::builder(bot, transport.clone()).build();

    let handled = bridge.handle_message(
        r#"{"requestId":"handshake1","command":"Authenticate","result":true}"#,
    );
    assert!(matches!(handled, Handled::Reply(RouteOutcome::Handshake)));
}

#[tokio::test]
async fn test_unclassifiable_frames_are_dropped() {
    let (bot, _seen) = RecordingBot::new();
    let bridge = Bridge::builder(bot, RecordingTransport::new()).build();

    assert!(matches!(bridge.handle_message("garbage"), Handled::Dropped));
    assert!(matches!(bridge.handle_message(r#"{"foo":1}"#), Handled::Dropped));
}

#[tokio::test]
async fn test_death_event_fires_only_death_hook() {
    let (bot, mut seen) = RecordingBot::new();
    let bridge = Bridge::builder(bot, RecordingTransport::new()).build();

    match bridge.handle_message(r#"{"event":"OnDeath"}"#) {
        Handled::Event(task) => task.await.unwrap(),
        other => panic!("Expected event, got {:?}", other),
    }

    assert_eq!(seen.recv().await.unwrap(), "death");
    assert!(seen.try_recv().is_err());
}

#[tokio::test]
async fn test_event_arguments_are_extracted() {
    let (bot, mut seen) = RecordingBot::new();
    let bridge = Bridge::builder(bot, RecordingTransport::new()).build();

    bridge
        .on_event("OnHealthUpdate", json!({"health": 19.5, "food": 17}))
        .await
        .unwrap();
    assert_eq!(seen.recv().await.unwrap(), "health:19.5:17");
}

#[tokio::test]
async fn test_unknown_event_goes_to_unhandled_hook() {
    let (bot, mut seen) = RecordingBot::new();
    let bridge = Bridge::builder(bot, RecordingTransport::new()).build();

    match bridge.handle_message(r#"{"event":"OnMystery","data":{"a":1}}"#) {
        Handled::Event(task) => task.await.unwrap(),
        other => panic!("Expected event, got {:?}", other),
    }

    assert_eq!(seen.recv().await.unwrap(), r#"unhandled:OnMystery:{"a":1}"#);
    assert!(seen.try_recv().is_err());
}

#[tokio::test]
async fn test_hook_failure_is_reported_once_and_does_not_block_next_event() {
    let (mut bot, mut seen) = RecordingBot::new();
    bot.fail_chat = true;
    let bridge = Bridge::builder(bot, RecordingTransport::new()).build();

    let failing = bridge.on_event(
        "OnChatPublic",
        json!({"username": "alex", "message": "!dig", "rawText": "<alex> !dig"}),
    );
    let next = bridge.on_event("OnGameJoined", json!({}));
    failing.await.unwrap();
    next.await.unwrap();

    let entries = vec![seen.recv().await.unwrap(), seen.recv().await.unwrap()];
    assert_eq!(entries, vec!["error:OnChatPublic:cannot parse !dig", "joined"]);
    assert!(seen.try_recv().is_err());
}

#[tokio::test]
async fn test_hook_panic_is_reported_as_error() {
    let (mut bot, mut seen) = RecordingBot::new();
    bot.panic_on_respawn = true;
    let bridge = Bridge::builder(bot, RecordingTransport::new()).build();

    bridge.on_event("OnRespawn", json!({})).await.unwrap();

    let entry = seen.recv().await.unwrap();
    assert!(entry.starts_with("error:OnRespawn:"));
    assert!(entry.contains("respawn exploded"));
}

#[tokio::test]
async fn test_hooks_can_call_commands_without_blocking_dispatch() {
    let (bot, mut seen) = RecordingBot::new();
    let transport = RecordingTransport::new();
    let bridge = Bridge::builder(bot, transport.clone()).build();

    let greeting = bridge.on_event("OnPlayerJoin", json!({"uuid": "u-1", "name": "alex"}));
    wait_for_frames(&transport, 1).await;
    assert_eq!(transport.last_envelope().unwrap()["command"], "GetUsername");

    // Another event is delivered while the first hook waits on its reply
    bridge.on_event("OnDeath", json!({})).await.unwrap();
    assert_eq!(seen.recv().await.unwrap(), "death");

    let id = transport.last_request_id().unwrap();
    bridge.handle_message(&reply_frame(&id, json!("bot")));
    greeting.await.unwrap();
    assert_eq!(seen.recv().await.unwrap(), "greet:alex:from:bot");
}

#[tokio::test]
async fn test_attach_and_detach_run_exactly_once() {
    let (bot, mut seen) = RecordingBot::new();
    let transport = RecordingTransport::new();
    let bridge = Bridge::builder(bot, transport.clone()).build();

    assert!(bridge.attach().await);
    assert!(!bridge.attach().await);
    assert_eq!(seen.recv().await.unwrap(), "initialize");

    let outstanding = bridge.client().invoke(Command::GetEntities).unwrap();

    assert!(bridge.detach().await);
    assert!(!bridge.detach().await);
    assert_eq!(seen.recv().await.unwrap(), "destroy");
    assert!(seen.try_recv().is_err());

    assert!(matches!(
        outstanding.await,
        Err(BridgeError::Abandoned { command: "GetEntities", .. })
    ));
    assert!(bridge.client().pending_calls().is_empty());
}

#[tokio::test]
async fn test_initialize_failure_is_reported_through_error_hook() {
    let (mut bot, mut seen) = RecordingBot::new();
    bot.fail_initialize = true;
    let bridge = Bridge::builder(bot, RecordingTransport::new()).build();

    assert!(bridge.attach().await);
    assert_eq!(seen.recv().await.unwrap(), "initialize");
    assert_eq!(seen.recv().await.unwrap(), "error:OnInitialize:not ready");
}

#[tokio::test]
async fn test_run_processes_frames_in_arrival_order() {
    let (bot, mut seen) = RecordingBot::new();
    let transport = RecordingTransport::new();
    let bridge = Bridge::builder(bot, transport.clone()).build();

    let reply = bridge.client().invoke(Command::GetServerTps).unwrap();
    let id = reply.request_id().clone();

    let (tx, rx) = mpsc::channel(8);
    tx.send(r#"{"event":"OnGameJoined"}"#.to_string()).await.unwrap();
    tx.send(reply_frame(id.as_str(), json!(19.8))).await.unwrap();
    tx.send(r#"{"event":"OnDeath"}"#.to_string()).await.unwrap();
    drop(tx);

    bridge.run(rx).await;

    assert_eq!(reply.await.unwrap(), json!(19.8));
    assert_eq!(seen.recv().await.unwrap(), "joined");
    assert_eq!(seen.recv().await.unwrap(), "death");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_hooks_start_in_arrival_order_on_multi_thread_runtime() {
    for round in 0..50 {
        let (bot, mut seen) = RecordingBot::new();
        let bridge = Bridge::builder(bot, RecordingTransport::new()).build();

        let (tx, rx) = mpsc::channel(8);
        for slot in 0..5 {
            let frame = json!({"event": "OnHeldItemChange", "itemSlot": slot}).to_string();
            tx.send(frame).await.unwrap();
        }
        drop(tx);

        bridge.run(rx).await;

        let mut entries = Vec::new();
        for _ in 0..5 {
            entries.push(seen.recv().await.unwrap());
        }
        let expected: Vec<String> = (0..5).map(|slot| format!("slot:{slot}")).collect();
        assert_eq!(entries, expected, "round {round}");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_slow_hook_does_not_hold_back_later_events_on_multi_thread_runtime() {
    let (bot, mut seen) = RecordingBot::new();
    let transport = RecordingTransport::new();
    let bridge = Bridge::builder(bot, transport.clone()).build();

    let greeting = bridge.on_event("OnPlayerJoin", json!({"uuid": "u-1", "name": "alex"}));
    let death = bridge.on_event("OnDeath", json!({}));
    death.await.unwrap();
    assert_eq!(seen.recv().await.unwrap(), "death");

    wait_for_frames(&transport, 1).await;
    let id = transport.last_request_id().unwrap();
    bridge.handle_message(&reply_frame(&id, json!("bot")));
    greeting.await.unwrap();
    assert_eq!(seen.recv().await.unwrap(), "greet:alex:from:bot");
}

#[tokio::test]
async fn test_bridges_do_not_share_state() {
    let (first_bot, _a) = RecordingBot::new();
    let (second_bot, _b) = RecordingBot::new();
    let first = Bridge::builder(first_bot, RecordingTransport::new()).build();
    let second = Bridge::builder(second_bot, RecordingTransport::new()).build();

    let reply = first.client().invoke(Command::GetYaw).unwrap();
    let routed = second.on_reply(mcc_bridge::protocol::InboundReply {
        request_id: RequestId::from(reply.request_id().as_str()),
        result: json!(1),
        command: None,
    });

    assert_eq!(routed, RouteOutcome::Unknown);
    assert_eq!(first.client().pending_calls().len(), 1);
    assert!(second.client().pending_calls().is_empty());
}
