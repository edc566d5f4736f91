// ABOUTME: Turns inbound events into hook calls, started strictly in arrival order by one launcher task.
// ABOUTME: Hook errors and panics are caught per event and reported once through on_event_error.

use crate::client::BotClient;
use crate::hooks::{deliver, ChatBot};
use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use mcc_protocol::{BotEvent, EventKind};
use serde_json::Value;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

type Hook = BoxFuture<'static, ()>;

/// Completes once the hook for one event (and any error reporting) has finished
#[derive(Debug)]
pub struct HookHandle {
    done: oneshot::Receiver<()>,
}

/// The launcher went away before the hook finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("hook was dropped before it finished")]
pub struct HookDropped;

impl Future for HookHandle {
    type Output = Result<(), HookDropped>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let polled = Pin::new(&mut self.done).poll(cx);
        polled.map(|done| done.map_err(|_| HookDropped))
    }
}

pub struct Dispatcher<B: ChatBot> {
    bot: Arc<B>,
    client: BotClient,
    launcher: Arc<Mutex<Option<mpsc::UnboundedSender<Hook>>>>,
}

impl<B: ChatBot> Clone for Dispatcher<B> {
    fn clone(&self) -> Self {
        Self {
            bot: Arc::clone(&self.bot),
            client: self.client.clone(),
            launcher: Arc::clone(&self.launcher),
        }
    }
}

impl<B: ChatBot> Dispatcher<B> {
    pub fn new(bot: Arc<B>, client: BotClient) -> Self {
        Self {
            bot,
            client,
            launcher: Arc::new(Mutex::new(None)),
        }
    }

    /// Queue the hook for one event without waiting for it to finish.
    ///
    /// Hooks start in the order they are dispatched: each runs up to its first
    /// suspension point before the next one begins. Must be called from within
    /// a tokio runtime.
    pub fn dispatch(&self, name: &str, payload: Value) -> HookHandle {
        let bot = Arc::clone(&self.bot);
        let client = self.client.clone();
        let name = name.to_string();
        let (done_tx, done) = oneshot::channel();

        let hook: Hook = match name.parse::<EventKind>() {
            Ok(kind) => {
                let event = BotEvent::decode(kind, &payload);
                tracing::debug!(event = %name, "Dispatching event");
                async move {
                    guarded(bot.as_ref(), &client, &name, deliver(bot.as_ref(), &client, event))
                        .await;
                    let _ = done_tx.send(());
                }
                .boxed()
            }
            Err(_) => {
                tracing::debug!(event = %name, "Dispatching unhandled event");
                async move {
                    guarded(
                        bot.as_ref(),
                        &client,
                        &name,
                        bot.on_unhandled_event(&client, &name, payload),
                    )
                    .await;
                    let _ = done_tx.send(());
                }
                .boxed()
            }
        };

        self.launch(hook);
        HookHandle { done }
    }

    fn launch(&self, hook: Hook) {
        let mut launcher = self.launcher.lock().unwrap_or_else(|e| e.into_inner());
        let hook = match launcher.as_ref() {
            Some(tx) => match tx.send(hook) {
                Ok(()) => return,
                Err(mpsc::error::SendError(hook)) => hook,
            },
            None => hook,
        };

        // First hook, or the previous launcher's runtime is gone
        let (tx, rx) = mpsc::unbounded_channel();
        let _ = tx.send(hook);
        tokio::spawn(run_launcher(rx));
        *launcher = Some(tx);
    }
}

/// Start queued hooks one at a time, in queue order, and drive them to completion.
///
/// Each new hook is polled once before the next is taken, so hook bodies begin
/// in arrival order while slow hooks keep running alongside later ones.
async fn run_launcher(mut rx: mpsc::UnboundedReceiver<Hook>) {
    let mut running: FuturesUnordered<Hook> = FuturesUnordered::new();

    loop {
        tokio::select! {
            biased;

            next = rx.recv() => match next {
                Some(mut hook) => {
                    if futures::poll!(&mut hook).is_pending() {
                        running.push(hook);
                    }
                }
                None => break,
            },
            Some(()) = running.next(), if !running.is_empty() => {}
        }
    }

    while running.next().await.is_some() {}
    tracing::debug!("Hook launcher stopped");
}

/// Run one hook, reporting failure through `on_event_error`. Returns true on success.
pub(crate) async fn guarded<B, F>(bot: &B, client: &BotClient, event: &str, hook: F) -> bool
where
    B: ChatBot + ?Sized,
    F: Future<Output = anyhow::Result<()>>,
{
    let error = match AssertUnwindSafe(hook).catch_unwind().await {
        Ok(Ok(())) => return true,
        Ok(Err(error)) => error,
        Err(panic) => anyhow::anyhow!("hook panicked: {}", panic_message(panic.as_ref())),
    };

    tracing::warn!(event, error = %error, "Event hook failed");

    match AssertUnwindSafe(bot.on_event_error(client, event, error))
        .catch_unwind()
        .await
    {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::error!(event, error = %e, "Error hook failed"),
        Err(panic) => tracing::error!(
            event,
            panic = %panic_message(panic.as_ref()),
            "Error hook panicked"
        ),
    }
    false
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
