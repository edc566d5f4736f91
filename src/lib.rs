// ABOUTME: Client-side bridge for scripting a Minecraft Console Client over its control channel.
// ABOUTME: Correlates command replies with callers and dispatches events to bot hooks.

pub mod bridge;
pub mod client;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod hooks;
pub mod logging;
pub mod pending;
pub mod router;

pub use bridge::{Bridge, BridgeBuilder, Handled};
pub use client::{BotClient, DigOptions, MoveOptions};
pub use config::BridgeConfig;
pub use dispatcher::{Dispatcher, HookDropped, HookHandle};
pub use error::BridgeError;
pub use hooks::ChatBot;
pub use logging::{ConsoleSink, LogLevel, LogLevels, LogSink, TracingSink};
pub use pending::{PendingCalls, PendingReply};
pub use router::{ResponseRouter, RouteOutcome};

pub use mcc_protocol as protocol;
