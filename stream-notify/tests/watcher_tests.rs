mod common;

use std::sync::Arc;

use common::{FakeServices, read_config, write_config};
use serde_json::json;
use stream_notify::config::ConfigStore;
use stream_notify::credentials::{CredentialProvider, TwitchCredentialProvider};
use stream_notify::monitor::{TickOutcome, TwitchSource, Watcher, YouTubeSource};
use stream_notify::notification::{ChatSink, DiscordChannel, DiscordConfig};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items
        .iter()
        .map(|(a, b)| (a.to_string(), b.to_string()))
        .collect()
}

struct Harness {
    _dir: tempfile::TempDir,
    path: std::path::PathBuf,
    store: Arc<ConfigStore>,
    sink: Arc<dyn ChatSink>,
    client: reqwest::Client,
}

impl Harness {
    fn new(fake: &FakeServices, document: serde_json::Value) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, &document);
        let store = Arc::new(ConfigStore::new(&path));
        let client = platforms_api::default_client().unwrap();
        let sink: Arc<dyn ChatSink> = Arc::new(DiscordChannel::new(
            DiscordConfig::new("bot-token").with_api_base(format!("{}/discord", fake.base)),
            client.clone(),
        ));
        Self {
            _dir: dir,
            path,
            store,
            sink,
            client,
        }
    }

    async fn twitch(&self, fake: &FakeServices) -> Watcher<TwitchSource> {
        let seed = self
            .store
            .load()
            .await
            .unwrap()
            .twitch
            .and_then(|s| s.stored_token());
        let credentials: Arc<dyn CredentialProvider> = Arc::new(
            TwitchCredentialProvider::new(self.client.clone(), self.store.clone(), seed)
                .with_grant_url(format!("{}/oauth2/token", fake.base)),
        );
        Watcher::new(
            TwitchSource::new(self.client.clone(), credentials),
            self.store.clone(),
            self.sink.clone(),
        )
    }

    fn youtube(&self) -> Watcher<YouTubeSource> {
        Watcher::new(
            YouTubeSource::new(self.client.clone()),
            self.store.clone(),
            self.sink.clone(),
        )
    }
}

#[tokio::test]
async fn twitch_notifies_once_per_broadcast_in_watch_order() {
    let fake = FakeServices::start().await;
    {
        let mut state = fake.state.lock();
        state.twitch_users = strings(&["alice", "bob", "carol"]);
        state.twitch_live = pairs(&[("bob", "b1"), ("alice", "a1"), ("carol", "c1")]);
    }
    let harness = Harness::new(
        &fake,
        json!({"twitch": fake.twitch_section(&["carol", "Alice", "bob", "ghost"])}),
    );
    let watcher = harness.twitch(&fake).await;

    let first = watcher.tick().await;
    assert_eq!(first.outcome, TickOutcome::Polled);
    assert_eq!(first.delivered, 3);
    assert_eq!(fake.titles(), vec!["c1", "a1", "b1"]);

    let second = watcher.tick().await;
    assert_eq!(second.newly_live, 0);
    assert_eq!(fake.titles().len(), 3);

    // alice ends, bob restarts between polls.
    fake.state.lock().twitch_live = pairs(&[("bob", "b2"), ("carol", "c1")]);
    let third = watcher.tick().await;
    assert_eq!(third.newly_live, 1);
    assert_eq!(fake.titles().last().map(String::as_str), Some("b2"));
    assert!(!watcher.online().await.contains("id-alice"));

    fake.state.lock().twitch_live = pairs(&[("alice", "a2"), ("bob", "b2"), ("carol", "c1")]);
    watcher.tick().await;
    assert_eq!(fake.titles(), vec!["c1", "a1", "b1", "b2", "a2"]);

    let (channel, embed) = fake.state.lock().messages[0].clone();
    assert_eq!(channel, "1111");
    assert_eq!(embed["author"]["name"], "CAROL is now live on Twitch!");
    assert_eq!(embed["image"]["url"], "https://thumb.example/carol-1920x1080.jpg");
    assert_eq!(embed["fields"][2]["value"], "1,500");

    // One grant for the whole session.
    assert_eq!(fake.state.lock().grants, 1);
}

#[tokio::test]
async fn twitch_grants_and_persists_a_token_when_none_is_stored() {
    let fake = FakeServices::start().await;
    fake.state.lock().twitch_users = strings(&["alice"]);
    let mut document = json!({"twitch": fake.twitch_section(&["alice"]), "custom": {"keep": 1}});
    document["twitch"]["note"] = json!("untouched");
    let harness = Harness::new(&fake, document);
    let watcher = harness.twitch(&fake).await;

    let report = watcher.tick().await;

    assert_eq!(report.outcome, TickOutcome::Polled);
    assert_eq!(fake.state.lock().grants, 1);
    let persisted = read_config(&harness.path);
    assert_eq!(persisted["twitch"]["bearer_token"], "granted-1");
    assert!(persisted["twitch"]["expiry"].as_f64().unwrap() > 0.0);
    assert_eq!(persisted["twitch"]["note"], "untouched");
    assert_eq!(persisted["custom"]["keep"], 1);
}

#[tokio::test]
async fn twitch_retries_once_after_unauthorized() {
    let fake = FakeServices::start().await;
    {
        let mut state = fake.state.lock();
        state.twitch_users = strings(&["alice"]);
        state.twitch_live = pairs(&[("alice", "a1")]);
        state.revoked_tokens = strings(&["stale"]);
    }
    let mut section = fake.twitch_section(&["alice"]);
    section["bearer_token"] = json!("stale");
    section["expiry"] = json!(4102444800.0);
    let harness = Harness::new(&fake, json!({ "twitch": section }));
    let watcher = harness.twitch(&fake).await;

    let report = watcher.tick().await;

    assert_eq!(report.outcome, TickOutcome::Polled);
    assert_eq!(report.delivered, 1);
    assert_eq!(fake.state.lock().grants, 1);
    assert_eq!(read_config(&harness.path)["twitch"]["bearer_token"], "granted-1");
}

#[tokio::test]
async fn twitch_gives_up_when_the_fresh_token_is_rejected_too() {
    let fake = FakeServices::start().await;
    {
        let mut state = fake.state.lock();
        state.twitch_users = strings(&["alice"]);
        state.revoked_tokens = strings(&["stale", "granted-1", "granted-2"]);
    }
    let mut section = fake.twitch_section(&["alice"]);
    section["bearer_token"] = json!("stale");
    section["expiry"] = json!(4102444800.0);
    let harness = Harness::new(&fake, json!({ "twitch": section }));
    let watcher = harness.twitch(&fake).await;

    let report = watcher.tick().await;

    assert_eq!(report.outcome, TickOutcome::Failed);
    assert_eq!(fake.state.lock().grants, 1);
    assert!(fake.titles().is_empty());
}

#[tokio::test]
async fn twitch_grant_failure_fails_the_tick() {
    let fake = FakeServices::start().await;
    let mut section = fake.twitch_section(&["alice"]);
    section["client_id"] = json!("wrong");
    let harness = Harness::new(&fake, json!({ "twitch": section }));
    let watcher = harness.twitch(&fake).await;

    let report = watcher.tick().await;

    assert_eq!(report.outcome, TickOutcome::Failed);
    assert!(read_config(&harness.path)["twitch"].get("bearer_token").is_none());
}

#[tokio::test]
async fn youtube_quota_exhaustion_is_a_silent_skip() {
    let fake = FakeServices::start().await;
    {
        let mut state = fake.state.lock();
        state.youtube_channels = strings(&["one", "two"]);
        state.youtube_live = pairs(&[("two", "v2")]);
    }
    let harness = Harness::new(&fake, json!({"youtube": fake.youtube_section(&["one", "two"])}));
    let watcher = harness.youtube();

    let first = watcher.tick().await;
    assert_eq!(first.delivered, 1);
    let before = watcher.online().await;

    fake.state.lock().youtube_quota_exceeded = true;
    let skipped = watcher.tick().await;
    assert_eq!(skipped.outcome, TickOutcome::QuotaExceeded);
    assert_eq!(skipped.newly_live, 0);
    assert_eq!(watcher.online().await, before);

    fake.state.lock().youtube_quota_exceeded = false;
    let resumed = watcher.tick().await;
    assert_eq!(resumed.newly_live, 0);
    assert_eq!(fake.titles(), vec!["v2"]);

    let (channel, embed) = fake.state.lock().messages[0].clone();
    assert_eq!(channel, "2222");
    assert_eq!(embed["url"], "https://www.youtube.com/watch?v=v2");
    assert_eq!(embed["author"]["name"], "two channel is now live on YouTube!");
    assert_eq!(embed["description"], "live now");
}

#[tokio::test]
async fn failed_delivery_does_not_block_the_next_stream() {
    let fake = FakeServices::start().await;
    {
        let mut state = fake.state.lock();
        state.youtube_channels = strings(&["one", "two", "three"]);
        state.youtube_live = pairs(&[("one", "v1"), ("two", "v2"), ("three", "v3")]);
        state.rejected_titles = strings(&["v2"]);
    }
    let harness = Harness::new(
        &fake,
        json!({"youtube": fake.youtube_section(&["one", "two", "three"])}),
    );
    let watcher = harness.youtube();

    let report = watcher.tick().await;

    assert_eq!(report.newly_live, 3);
    assert_eq!(report.delivered, 2);
    assert_eq!(report.failed, 1);
    assert_eq!(fake.titles(), vec!["v1", "v3"]);
}

#[tokio::test]
async fn disabled_or_missing_sections_do_nothing() {
    let fake = FakeServices::start().await;
    fake.state.lock().youtube_channels = strings(&["one"]);
    fake.state.lock().youtube_live = pairs(&[("one", "v1")]);
    let mut section = fake.youtube_section(&["one"]);
    section["enabled"] = json!(false);
    let harness = Harness::new(&fake, json!({ "youtube": section }));
    let watcher = harness.youtube();

    assert_eq!(watcher.tick().await.outcome, TickOutcome::Disabled);
    assert_eq!(harness.twitch(&fake).await.tick().await.outcome, TickOutcome::Disabled);
    assert!(fake.titles().is_empty());

    // Enabling takes effect on the next tick without a restart.
    let mut document = read_config(&harness.path);
    document["youtube"]["enabled"] = json!(true);
    std::fs::write(&harness.path, document.to_string()).unwrap();
    assert_eq!(watcher.tick().await.delivered, 1);
}
