// src/status/feed.rs
use tokio::sync::watch;

use crate::models::status::ServerStatusSnapshot;
use crate::status::poller::{self, PollerConfig, PollerHandle};

/// One shared poller fanned out to every consumer. The hero panel and the
/// navigation bar used to each run their own poll loop against the same
/// upstream; a single feed removes the duplicate traffic.
pub struct StatusFeed {
    receiver: watch::Receiver<ServerStatusSnapshot>,
    handle: PollerHandle,
}

impl StatusFeed {
    /// Starts the backing poller. Until its first poll resolves, consumers
    /// see the unknown/offline snapshot.
    pub fn start(config: PollerConfig) -> Self {
        let initial = ServerStatusSnapshot::unknown(config.default_max_players);
        let (tx, receiver) = watch::channel(initial);
        let handle = poller::start(config, move |snapshot| {
            let _ = tx.send(snapshot);
        });
        Self { receiver, handle }
    }

    pub fn latest(&self) -> ServerStatusSnapshot {
        self.receiver.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ServerStatusSnapshot> {
        self.receiver.clone()
    }

    pub fn stop(&self) {
        self.handle.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::poller::PLACEHOLDER_SERVER_CODE;
    use std::time::Duration;
    use tokio::time::timeout;

    fn unconfigured(interval: Duration) -> PollerConfig {
        PollerConfig {
            endpoint_base_url: "http://127.0.0.1:1/".to_string(),
            server_code: PLACEHOLDER_SERVER_CODE.to_string(),
            refresh_interval: interval,
            default_max_players: 48,
        }
    }

    #[tokio::test]
    async fn starts_in_unknown_state() {
        let feed = StatusFeed::start(unconfigured(Duration::from_secs(3600)));
        let initial = feed.latest();
        assert_eq!(initial.player_count, 0);
        assert_eq!(initial.max_players, 48);
        assert!(!initial.is_online);
        feed.stop();
    }

    #[tokio::test]
    async fn fans_out_to_multiple_subscribers() {
        let feed = StatusFeed::start(unconfigured(Duration::from_secs(3600)));
        let mut a = feed.subscribe();
        let mut b = feed.subscribe();

        timeout(Duration::from_secs(2), a.changed()).await.unwrap().unwrap();
        timeout(Duration::from_secs(2), b.changed()).await.unwrap().unwrap();

        let from_a = a.borrow().clone();
        let from_b = b.borrow().clone();
        assert_eq!(from_a, from_b);
        assert!((10..60).contains(&from_a.player_count));
        assert_eq!(feed.latest(), from_a);
        feed.stop();
    }

    #[tokio::test]
    async fn stop_halts_updates() {
        let feed = StatusFeed::start(unconfigured(Duration::from_millis(50)));
        let mut rx = feed.subscribe();
        timeout(Duration::from_secs(2), rx.changed()).await.unwrap().unwrap();

        feed.stop();
        feed.stop();
        let _ = rx.borrow_and_update();
        tokio::time::sleep(Duration::from_millis(250)).await;
        assert!(!rx.has_changed().unwrap_or(false), "feed kept updating after stop");
    }
}
