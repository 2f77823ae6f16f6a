//! Builds the shared services and runs the watchers.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::config::{AppConfig, ConfigStore, DEFAULT_INTERVAL_SECS, WatchSettings};
use crate::credentials::{CredentialProvider, TwitchCredentialProvider};
use crate::monitor::{PlatformClient, TickReport, TwitchSource, Watcher, YouTubeSource};
use crate::notification::{
    ChatSink, DiscordChannel, DiscordConfig, ReadyGate, connect_until_ready, ready_gate,
};
use crate::{Error, Result};

/// Environment variable consulted when the config has no bot token.
pub const BOT_TOKEN_ENV: &str = "DISCORD_BOT_TOKEN";

/// Delay between chat connection attempts.
const CONNECT_RETRY: Duration = Duration::from_secs(15);

/// Owns everything the watchers share.
pub struct ServiceContainer {
    config_store: Arc<ConfigStore>,
    sink: Arc<dyn ChatSink>,
    twitch: Arc<Watcher<TwitchSource>>,
    youtube: Arc<Watcher<YouTubeSource>>,
    twitch_interval: Duration,
    youtube_interval: Duration,
    cancellation_token: CancellationToken,
}

impl ServiceContainer {
    /// Load the config at `config_path` and build the services from it.
    pub async fn new(config_path: impl Into<PathBuf>) -> Result<Self> {
        info!("Initializing service container");

        let config_store = Arc::new(ConfigStore::new(config_path));
        let config = config_store.load().await?;
        let client = platforms_api::default_client()?;

        let bot_token = config
            .discord
            .bot_token
            .clone()
            .filter(|t| !t.is_empty())
            .or_else(|| std::env::var(BOT_TOKEN_ENV).ok().filter(|t| !t.is_empty()))
            .ok_or_else(|| {
                Error::config(format!(
                    "no Discord bot token in 'discord.bot_token' or {BOT_TOKEN_ENV}"
                ))
            })?;
        let sink: Arc<dyn ChatSink> = Arc::new(DiscordChannel::new(
            DiscordConfig::new(bot_token).with_api_base(config.discord.api_base.clone()),
            client.clone(),
        ));

        let credentials = Self::twitch_credentials(&config, &config_store, &client);
        let twitch = Arc::new(Watcher::new(
            TwitchSource::new(client.clone(), credentials),
            config_store.clone(),
            sink.clone(),
        ));
        let youtube = Arc::new(Watcher::new(
            YouTubeSource::new(client),
            config_store.clone(),
            sink.clone(),
        ));

        let container = Self {
            twitch_interval: interval_of(config.twitch.as_ref().map(|s| &s.watch)),
            youtube_interval: interval_of(config.youtube.as_ref().map(|s| &s.watch)),
            config_store,
            sink,
            twitch,
            youtube,
            cancellation_token: CancellationToken::new(),
        };
        info!(
            config = %container.config_store.path().display(),
            twitch = config.twitch.as_ref().is_some_and(|s| s.watch.enabled),
            youtube = config.youtube.as_ref().is_some_and(|s| s.watch.enabled),
            "Service container initialized"
        );
        Ok(container)
    }

    fn twitch_credentials(
        config: &AppConfig,
        config_store: &Arc<ConfigStore>,
        client: &Client,
    ) -> Arc<dyn CredentialProvider> {
        let settings = config.twitch.as_ref();
        let provider = TwitchCredentialProvider::new(
            client.clone(),
            config_store.clone(),
            settings.and_then(|s| s.stored_token()),
        );
        match settings.and_then(|s| s.grant_url.clone()) {
            Some(url) => Arc::new(provider.with_grant_url(url)),
            None => Arc::new(provider),
        }
    }

    /// Connect to chat, then run both watchers until shutdown.
    ///
    /// With `once`, each watcher ticks a single time after the chat
    /// connection is up and the call returns.
    pub async fn run(&self, once: bool) -> Result<()> {
        let (signal, gate) = ready_gate();
        let connect = {
            let sink = self.sink.clone();
            let cancel = self.cancellation_token.clone();
            tokio::spawn(async move {
                connect_until_ready(sink.as_ref(), signal, CONNECT_RETRY, &cancel).await
            })
        };

        if once {
            tokio::select! {
                _ = self.cancellation_token.cancelled() => {}
                opened = gate.wait() => {
                    if opened {
                        let (twitch, youtube) = tokio::join!(self.twitch.tick(), self.youtube.tick());
                        log_report(self.twitch.source(), &twitch);
                        log_report(self.youtube.source(), &youtube);
                    }
                }
            }
            self.cancellation_token.cancel();
            let _ = connect.await;
            return Ok(());
        }

        let handles = vec![
            spawn_watcher(
                self.twitch.clone(),
                self.twitch_interval,
                gate.clone(),
                self.cancellation_token.clone(),
            ),
            spawn_watcher(
                self.youtube.clone(),
                self.youtube_interval,
                gate,
                self.cancellation_token.clone(),
            ),
        ];

        if let Err(e) = connect.await {
            error!(error = %e, "Chat connection task failed");
        }
        for handle in handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Watcher task failed");
            }
        }
        info!("All watchers stopped");
        Ok(())
    }

    /// Ask every running task to stop.
    pub fn shutdown(&self) {
        info!("Shutting down services");
        self.cancellation_token.cancel();
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation_token.clone()
    }

    pub fn is_shutting_down(&self) -> bool {
        self.cancellation_token.is_cancelled()
    }
}

fn interval_of(settings: Option<&WatchSettings>) -> Duration {
    settings
        .map(WatchSettings::interval)
        .unwrap_or(Duration::from_secs(DEFAULT_INTERVAL_SECS))
}

fn spawn_watcher<P>(
    watcher: Arc<Watcher<P>>,
    interval: Duration,
    gate: ReadyGate,
    cancel: CancellationToken,
) -> JoinHandle<()>
where
    P: PlatformClient + 'static,
{
    tokio::spawn(async move { watcher.run(interval, gate, cancel).await })
}

fn log_report<P: PlatformClient>(source: &P, report: &TickReport) {
    info!(
        platform = %source.platform(),
        outcome = ?report.outcome,
        newly_live = report.newly_live,
        delivered = report.delivered,
        failed = report.failed,
        "Tick finished"
    );
}
