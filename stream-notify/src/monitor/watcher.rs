//! The polling loop of one platform.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::source::PlatformClient;
use super::tracker::{LiveStateTracker, OnlineState};
use crate::Error;
use crate::config::ConfigStore;
use crate::notification::{ChatSink, ReadyGate};

/// How a tick ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The platform was polled and the tracker updated.
    Polled,
    /// The section is missing or disabled.
    Disabled,
    /// The platform's API quota is spent; nothing changed.
    QuotaExceeded,
    /// Config or platform error; nothing changed.
    Failed,
    /// Another tick still holds the tracker.
    Busy,
}

/// Summary of one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub outcome: TickOutcome,
    /// Streams that went live since the previous poll.
    pub newly_live: usize,
    /// Notifications posted.
    pub delivered: usize,
    /// Notifications that could not be posted.
    pub failed: usize,
}

impl TickReport {
    fn skipped(outcome: TickOutcome) -> Self {
        Self {
            outcome,
            newly_live: 0,
            delivered: 0,
            failed: 0,
        }
    }
}

/// Polls one platform and announces streams that went live.
pub struct Watcher<P: PlatformClient> {
    source: P,
    config_store: Arc<ConfigStore>,
    sink: Arc<dyn ChatSink>,
    tracker: Mutex<LiveStateTracker>,
}

impl<P: PlatformClient> Watcher<P> {
    pub fn new(source: P, config_store: Arc<ConfigStore>, sink: Arc<dyn ChatSink>) -> Self {
        Self {
            source,
            config_store,
            sink,
            tracker: Mutex::new(LiveStateTracker::new()),
        }
    }

    pub fn source(&self) -> &P {
        &self.source
    }

    /// Snapshot of the channels currently believed live.
    pub async fn online(&self) -> OnlineState {
        self.tracker.lock().await.online().clone()
    }

    /// Run one poll-diff-notify cycle.
    ///
    /// Never fails: errors are logged and reflected in the report, and the
    /// tracker is only updated after a successful poll.
    pub async fn tick(&self) -> TickReport {
        let platform = self.source.platform();
        let Ok(mut tracker) = self.tracker.try_lock() else {
            debug!(%platform, "Previous tick still running, skipping");
            return TickReport::skipped(TickOutcome::Busy);
        };

        let config = match self.config_store.load().await {
            Ok(config) => config,
            Err(e) => {
                warn!(%platform, error = %e, "Failed to load config");
                return TickReport::skipped(TickOutcome::Failed);
            }
        };
        let Some(settings) = self.source.watch_settings(&config).filter(|s| s.enabled) else {
            debug!(%platform, "Watcher disabled");
            return TickReport::skipped(TickOutcome::Disabled);
        };

        let polled = async {
            let channels = self
                .source
                .resolve_channels(&config, &settings.watchlist)
                .await?;
            let keys: Vec<String> = channels
                .iter()
                .map(|c| self.source.channel_key(c).to_string())
                .collect();
            let live = self.source.list_live_streams(&config, &channels).await?;
            Ok::<_, Error>((keys, live))
        }
        .await;

        let (watched, live) = match polled {
            Ok(polled) => polled,
            Err(e) if e.is_quota_exceeded() => {
                debug!(%platform, "API quota exceeded, skipping poll");
                return TickReport::skipped(TickOutcome::QuotaExceeded);
            }
            Err(Error::Credential(e)) if e.requires_config_change() => {
                error!(%platform, error = %e, "Credentials rejected, check the config");
                return TickReport::skipped(TickOutcome::Failed);
            }
            Err(e) => {
                warn!(%platform, error = %e, "Failed to poll live streams");
                return TickReport::skipped(TickOutcome::Failed);
            }
        };

        let live_count = live.len();
        let newly_live = tracker.observe(&watched, live);
        debug!(
            %platform,
            watched = watched.len(),
            live = live_count,
            newly_live = newly_live.len(),
            "Polled live streams"
        );

        let mut report = TickReport {
            outcome: TickOutcome::Polled,
            newly_live: newly_live.len(),
            delivered: 0,
            failed: 0,
        };
        for stream in &newly_live {
            let embed = self.source.render(stream);
            match self.sink.deliver(&settings.channel_id, &embed).await {
                Ok(()) => {
                    info!(%platform, title = %embed.title, url = %embed.url, "Sent live notification");
                    report.delivered += 1;
                }
                Err(e) => {
                    warn!(
                        %platform,
                        channel = %settings.channel_id,
                        url = %embed.url,
                        error = %e,
                        "Failed to send live notification"
                    );
                    report.failed += 1;
                }
            }
        }
        report
    }

    /// Tick every `interval` until `cancel` fires.
    ///
    /// Nothing happens before `ready` opens. If the ready signal goes away
    /// without opening, the loop exits without polling.
    pub async fn run(&self, interval: Duration, ready: ReadyGate, cancel: CancellationToken) {
        let platform = self.source.platform();

        tokio::select! {
            _ = cancel.cancelled() => return,
            opened = ready.wait() => {
                if !opened {
                    warn!(%platform, "Chat connection never became ready, watcher not started");
                    return;
                }
            }
        }

        info!(%platform, interval_secs = interval.as_secs(), "Watcher started");
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            tokio::select! {
                _ = cancel.cancelled() => break,
                report = self.tick() => {
                    if report.newly_live > 0 {
                        info!(
                            %platform,
                            newly_live = report.newly_live,
                            delivered = report.delivered,
                            failed = report.failed,
                            "Tick finished"
                        );
                    }
                }
            }
        }

        info!(%platform, "Watcher stopped");
    }
}
