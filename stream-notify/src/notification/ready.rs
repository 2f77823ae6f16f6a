//! Startup barrier between the chat connection and the watchers.

use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::ChatSink;

/// Opens the gate once the chat connection is established.
#[derive(Debug)]
pub struct ReadySignal {
    tx: watch::Sender<bool>,
}

/// Waits for the chat connection. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ReadyGate {
    rx: watch::Receiver<bool>,
}

pub fn ready_gate() -> (ReadySignal, ReadyGate) {
    let (tx, rx) = watch::channel(false);
    (ReadySignal { tx }, ReadyGate { rx })
}

impl ReadySignal {
    pub fn open(&self) {
        self.tx.send_replace(true);
    }
}

impl ReadyGate {
    pub fn is_open(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once the gate opens. Returns `false` if the signal was dropped
    /// without ever opening it.
    pub async fn wait(&self) -> bool {
        let mut rx = self.rx.clone();
        rx.wait_for(|open| *open).await.is_ok()
    }
}

/// Connect `sink`, retrying every `retry` until it succeeds or `cancel` fires.
///
/// Opens `signal` on success and returns whether it did.
pub async fn connect_until_ready(
    sink: &dyn ChatSink,
    signal: ReadySignal,
    retry: Duration,
    cancel: &CancellationToken,
) -> bool {
    loop {
        match sink.connect().await {
            Ok(()) => {
                info!(sink = sink.sink_type(), "Chat connection established");
                signal.open();
                return true;
            }
            Err(e) => {
                warn!(
                    sink = sink.sink_type(),
                    error = %e,
                    "Chat connection failed, retrying in {:?}",
                    retry
                );
            }
        }

        tokio::select! {
            _ = cancel.cancelled() => return false,
            _ = tokio::time::sleep(retry) => {}
        }
    }
}
