//! Leaderboard poller
//!
//! Fetches one ranking on a fixed period, diffs every poll against the
//! previous settled one and resolves names/avatars through a shared cache
//! that only ever grows.

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use gamelayer_core::{
    LeaderboardEntry, LeaderboardInfo, LeaderboardPlayer, PlayerDetails, Result, ScoreEntry,
};
use gamelayer_networking::GameLayerApi;
use gamelayer_persistence::PlayerDirectoryCache;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// One settled ranking
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardBoard {
    pub leaderboard: Option<LeaderboardInfo>,
    pub entries: Vec<LeaderboardEntry>,
    pub total_players: u32,
    pub updated_at: DateTime<Utc>,
}

/// What the poller publishes after every attempt
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardState {
    /// Latest successful board; kept when a later poll fails
    pub board: Option<LeaderboardBoard>,
    /// Message of the most recent failed poll, cleared by the next success
    pub last_error: Option<String>,
    pub polls: u64,
}

/// Poll state: the board id, the previous snapshot and the name cache
pub struct LeaderboardPoller<A> {
    api: Arc<A>,
    leaderboard_id: String,
    previous: Vec<LeaderboardEntry>,
    cache: Arc<PlayerDirectoryCache>,
}

impl<A: GameLayerApi> LeaderboardPoller<A> {
    pub fn new(api: Arc<A>, leaderboard_id: impl Into<String>, cache: Arc<PlayerDirectoryCache>) -> Self {
        Self {
            api,
            leaderboard_id: leaderboard_id.into(),
            previous: Vec::new(),
            cache,
        }
    }

    pub fn leaderboard_id(&self) -> &str {
        &self.leaderboard_id
    }

    /// Entries of the last successful poll
    pub fn previous(&self) -> &[LeaderboardEntry] {
        &self.previous
    }

    /// Fetch the ranking once and diff it against the previous poll.
    ///
    /// On error the previous snapshot is left as it was.
    pub async fn poll_once(&mut self) -> Result<LeaderboardBoard> {
        let response = self.api.get_leaderboard(&self.leaderboard_id).await?;
        let (rows, total_players) = match response.scores {
            Some(scores) => (scores.data, scores.total_players),
            None => (Vec::new(), 0),
        };

        self.fill_cache(&rows).await;

        let entries: Vec<LeaderboardEntry> = rows.iter().map(|row| self.to_entry(row)).collect();
        self.previous = entries.clone();

        debug!(
            "Leaderboard {} polled: {} rows, {} cached players",
            self.leaderboard_id,
            entries.len(),
            self.cache.len()
        );

        Ok(LeaderboardBoard {
            leaderboard: response.leaderboard,
            entries,
            total_players,
            updated_at: Utc::now(),
        })
    }

    /// Look up every player id the cache has not seen yet
    async fn fill_cache(&self, rows: &[ScoreEntry]) {
        let missing = self.cache.missing(rows.iter().map(|r| r.player.as_str()));
        if missing.is_empty() {
            return;
        }

        let api = &self.api;
        let lookups = missing.into_iter().map(|id| async move {
            match api.get_player(&id).await {
                Ok(record) => Some((id, PlayerDetails::from(&record))),
                Err(e) => {
                    // not cached, so the next poll tries again
                    debug!("Player lookup for {} failed: {}", id, e);
                    None
                }
            }
        });
        let found: Vec<(String, PlayerDetails)> = join_all(lookups).await.into_iter().flatten().collect();
        self.cache.merge(found);
    }

    fn to_entry(&self, row: &ScoreEntry) -> LeaderboardEntry {
        let details = self.cache.get(&row.player);
        let name = details
            .as_ref()
            .map(|d| d.name.clone())
            .filter(|n| !n.is_empty())
            .or_else(|| Some(row.name.clone()).filter(|n| !n.is_empty()))
            .unwrap_or_else(|| row.player.clone());
        let previous = self.previous.iter().find(|e| e.player.id == row.player);

        LeaderboardEntry {
            rank: row.rank,
            player: LeaderboardPlayer {
                id: row.player.clone(),
                name,
                img_url: details.and_then(|d| d.img_url),
            },
            points: row.points(),
            previous_rank: previous.map(|p| p.rank),
            previous_points: previous.map(|p| p.points),
        }
    }
}

/// Handle to a running poller task; dropping it stops the task
pub struct LeaderboardPollerHandle {
    cancel: CancellationToken,
    state_rx: watch::Receiver<LeaderboardState>,
    task: Option<JoinHandle<()>>,
}

impl LeaderboardPollerHandle {
    /// Receiver that sees every published state
    pub fn subscribe(&self) -> watch::Receiver<LeaderboardState> {
        self.state_rx.clone()
    }

    /// Most recently published state
    pub fn latest(&self) -> LeaderboardState {
        self.state_rx.borrow().clone()
    }

    /// Stop polling; an in-flight poll is abandoned
    pub fn stop(&self) {
        self.cancel.cancel();
        info!("Leaderboard poller stopped");
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Stop and wait for the task to exit
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for LeaderboardPollerHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Spawn the poller on the current runtime.
///
/// The first poll runs immediately, then one per `period`. A poll always
/// settles before the next tick is taken and missed ticks are skipped, so
/// polls never overlap.
pub fn spawn_leaderboard_poller<A>(poller: LeaderboardPoller<A>, period: Duration) -> LeaderboardPollerHandle
where
    A: GameLayerApi + 'static,
{
    let cancel = CancellationToken::new();
    let (state_tx, state_rx) = watch::channel(LeaderboardState::default());

    let task = tokio::spawn(poller_loop(poller, period, cancel.clone(), state_tx));

    LeaderboardPollerHandle {
        cancel,
        state_rx,
        task: Some(task),
    }
}

async fn poller_loop<A: GameLayerApi>(
    mut poller: LeaderboardPoller<A>,
    period: Duration,
    cancel: CancellationToken,
    state_tx: watch::Sender<LeaderboardState>,
) {
    info!(
        "Leaderboard poller started for {} every {:?}",
        poller.leaderboard_id(),
        period
    );

    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("Leaderboard poller cancelled, exiting");
                return;
            }
            _ = ticker.tick() => {
                let outcome = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        info!("Leaderboard poller cancelled mid-poll, exiting");
                        return;
                    }
                    outcome = poller.poll_once() => outcome,
                };

                match outcome {
                    Ok(board) => state_tx.send_modify(|state| {
                        state.board = Some(board);
                        state.last_error = None;
                        state.polls += 1;
                    }),
                    Err(e) => {
                        warn!("Leaderboard poll failed: {}", e);
                        state_tx.send_modify(|state| {
                            state.last_error = Some(e.user_message());
                            state.polls += 1;
                        });
                    }
                }
            }
        }
    }
}
