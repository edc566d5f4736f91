// ABOUTME: Bridge facade wiring a bot to one control channel: outbound client, reply router, event dispatcher.
// ABOUTME: Inbound frames are classified one at a time and routed as replies or events.

use crate::client::BotClient;
use crate::config::BridgeConfig;
use crate::dispatcher::{guarded, Dispatcher, HookHandle};
use crate::hooks::ChatBot;
use crate::logging::{LogSink, TracingSink};
use crate::pending::PendingCalls;
use crate::router::{ResponseRouter, RouteOutcome};
use mcc_protocol::{InboundMessage, InboundReply, Transport};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// What the bridge did with one inbound frame
#[derive(Debug)]
pub enum Handled {
    Reply(RouteOutcome),
    /// Hook queued for the event; hooks start in arrival order
    Event(HookHandle),
    /// Frame could not be classified and was dropped
    Dropped,
}

pub struct Bridge<B: ChatBot> {
    bot: Arc<B>,
    client: BotClient,
    router: ResponseRouter,
    dispatcher: Dispatcher<B>,
    attached: AtomicBool,
    detached: AtomicBool,
}

pub struct BridgeBuilder<B: ChatBot> {
    bot: Arc<B>,
    transport: Arc<dyn Transport>,
    config: BridgeConfig,
    execution_timeout: Option<Duration>,
    sink: Option<Arc<dyn LogSink>>,
}

impl<B: ChatBot> BridgeBuilder<B> {
    pub fn config(mut self, config: BridgeConfig) -> Self {
        self.config = config;
        self
    }

    /// Override the configured call timeout for this bridge only
    pub fn execution_timeout(mut self, timeout: Duration) -> Self {
        self.execution_timeout = Some(timeout);
        self
    }

    pub fn log_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn build(self) -> Bridge<B> {
        let timeout = self
            .execution_timeout
            .unwrap_or_else(|| self.config.execution_timeout());
        let pending = PendingCalls::new(timeout);
        let sink = self
            .sink
            .unwrap_or_else(|| Arc::new(TracingSink) as Arc<dyn LogSink>);
        let client = BotClient::new(
            self.transport,
            pending.clone(),
            sink,
            self.config.log_level_mask(),
        );

        Bridge {
            dispatcher: Dispatcher::new(Arc::clone(&self.bot), client.clone()),
            router: ResponseRouter::new(pending),
            bot: self.bot,
            client,
            attached: AtomicBool::new(false),
            detached: AtomicBool::new(false),
        }
    }
}

impl<B: ChatBot> Bridge<B> {
    pub fn builder(bot: B, transport: impl Transport + 'static) -> BridgeBuilder<B> {
        Self::builder_shared(Arc::new(bot), Arc::new(transport))
    }

    /// Builder for a bot and transport that are already shared elsewhere
    pub fn builder_shared(bot: Arc<B>, transport: Arc<dyn Transport>) -> BridgeBuilder<B> {
        BridgeBuilder {
            bot,
            transport,
            config: BridgeConfig::default(),
            execution_timeout: None,
            sink: None,
        }
    }

    pub fn bot(&self) -> &Arc<B> {
        &self.bot
    }

    pub fn client(&self) -> &BotClient {
        &self.client
    }

    /// Run `on_initialize`. Only the first call does anything.
    pub async fn attach(&self) -> bool {
        if self.attached.swap(true, Ordering::SeqCst) {
            return false;
        }
        tracing::info!("Bridge attached");
        guarded(
            self.bot.as_ref(),
            &self.client,
            "OnInitialize",
            self.bot.on_initialize(&self.client),
        )
        .await;
        true
    }

    /// Run `on_destroy`, then abandon every outstanding call. Only the first call does anything.
    pub async fn detach(&self) -> bool {
        if self.detached.swap(true, Ordering::SeqCst) {
            return false;
        }
        guarded(
            self.bot.as_ref(),
            &self.client,
            "OnDestroy",
            self.bot.on_destroy(&self.client),
        )
        .await;
        let abandoned = self.client.pending_calls().abandon_all();
        tracing::info!(abandoned, "Bridge detached");
        true
    }

    /// Classify one inbound text frame and route it
    pub fn handle_message(&self, text: &str) -> Handled {
        match InboundMessage::parse(text) {
            Ok(InboundMessage::Reply(reply)) => Handled::Reply(self.on_reply(reply)),
            Ok(InboundMessage::Event(event)) => {
                Handled::Event(self.on_event(&event.name, event.payload))
            }
            Err(e) => {
                tracing::warn!(error = %e, len = text.len(), "Dropping unclassifiable message");
                Handled::Dropped
            }
        }
    }

    pub fn on_reply(&self, reply: InboundReply) -> RouteOutcome {
        self.router.route(reply)
    }

    pub fn on_event(&self, name: &str, payload: Value) -> HookHandle {
        self.dispatcher.dispatch(name, payload)
    }

    /// Process inbound frames in arrival order until the channel closes
    pub async fn run(&self, mut rx: mpsc::Receiver<String>) {
        while let Some(frame) = rx.recv().await {
            self.handle_message(&frame);
        }
        tracing::info!(
            pending = self.client.pending_calls().len(),
            "Inbound stream closed"
        );
    }
}
