//! Dashboard session: the selected player, its committed state and the
//! actions that refresh it.

use crate::aggregator::{load_player_state, PlayerSnapshot};
use crate::dispatcher::ActionDispatcher;
use crate::leaderboard::{spawn_leaderboard_poller, LeaderboardPoller, LeaderboardPollerHandle};
use crate::mystery::{MysteryBoxSession, SpinAnimation};
use gamelayer_core::{AnswerSelection, ClientConfig, CompletionReceipt, Error, Prize, Result, Survey};
use gamelayer_networking::GameLayerApi;
use gamelayer_persistence::PlayerDirectoryCache;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

#[derive(Default)]
struct ViewState {
    generation: u64,
    player_id: Option<String>,
    snapshot: Option<Arc<PlayerSnapshot>>,
}

/// The player currently on screen.
///
/// Every selection bumps a generation counter. Loads capture the
/// generation they started under and only commit if it is still current,
/// so a slow response for a player the user left is dropped.
#[derive(Default)]
pub struct PlayerView {
    state: Mutex<ViewState>,
}

impl PlayerView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch to `player_id`, discarding the old snapshot; returns the new generation
    pub fn select(&self, player_id: &str) -> u64 {
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        state.generation += 1;
        state.player_id = Some(player_id.to_string());
        state.snapshot = None;
        state.generation
    }

    /// Forget the selection; in-flight loads will not commit
    pub fn clear(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.generation += 1;
            state.player_id = None;
            state.snapshot = None;
        }
    }

    /// The selected player and the generation it was selected under
    pub fn current(&self) -> Option<(String, u64)> {
        let state = self.state.lock().ok()?;
        state.player_id.clone().map(|id| (id, state.generation))
    }

    pub fn generation(&self) -> u64 {
        self.state.lock().map(|s| s.generation).unwrap_or(0)
    }

    /// Store `snapshot` if `generation` is still current; `None` when it was dropped
    pub fn commit(&self, generation: u64, snapshot: PlayerSnapshot) -> Option<Arc<PlayerSnapshot>> {
        let mut state = self.state.lock().ok()?;
        if state.generation != generation {
            debug!(
                "Dropping stale snapshot for {} (generation {} != {})",
                snapshot.player.id, generation, state.generation
            );
            return None;
        }
        let snapshot = Arc::new(snapshot);
        state.snapshot = Some(Arc::clone(&snapshot));
        Some(snapshot)
    }

    pub fn snapshot(&self) -> Option<Arc<PlayerSnapshot>> {
        self.state.lock().ok()?.snapshot.clone()
    }
}

/// Client, view and dispatcher for one operator session
pub struct Dashboard<A> {
    api: Arc<A>,
    config: ClientConfig,
    view: PlayerView,
    dispatcher: ActionDispatcher<A>,
    directory: Arc<PlayerDirectoryCache>,
}

impl<A: GameLayerApi + 'static> Dashboard<A> {
    pub fn new(api: Arc<A>, config: ClientConfig) -> Self {
        Self {
            dispatcher: ActionDispatcher::new(Arc::clone(&api)),
            api,
            config,
            view: PlayerView::new(),
            directory: Arc::new(PlayerDirectoryCache::new()),
        }
    }

    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn view(&self) -> &PlayerView {
        &self.view
    }

    pub fn dispatcher(&self) -> &ActionDispatcher<A> {
        &self.dispatcher
    }

    /// Select a player and load its state
    pub async fn select_player(&self, player_id: &str) -> Result<Arc<PlayerSnapshot>> {
        let generation = self.view.select(player_id);
        info!("Selected player {}", player_id);
        self.load(player_id, generation)
            .await?
            .ok_or_else(|| Error::InvalidData(format!("Selection of {} was superseded", player_id)))
    }

    /// Reload the selected player; `Ok(None)` when the result went stale
    pub async fn refresh(&self) -> Result<Option<Arc<PlayerSnapshot>>> {
        let (player_id, generation) = self
            .view
            .current()
            .ok_or_else(|| Error::InvalidData("No player selected".to_string()))?;
        self.load(&player_id, generation).await
    }

    /// The action already went through, so a failed reload is only logged
    async fn refresh_after_action(&self) {
        if let Err(e) = self.refresh().await {
            warn!("Reload after action failed: {}", e);
        }
    }

    async fn load(&self, player_id: &str, generation: u64) -> Result<Option<Arc<PlayerSnapshot>>> {
        let snapshot = load_player_state(self.api.as_ref(), player_id).await?;
        Ok(self.view.commit(generation, snapshot))
    }

    fn selected(&self) -> Result<(String, Arc<PlayerSnapshot>)> {
        let (player_id, _) = self
            .view
            .current()
            .ok_or_else(|| Error::InvalidData("No player selected".to_string()))?;
        let snapshot = self
            .view
            .snapshot()
            .ok_or_else(|| Error::InvalidData(format!("Player {} is not loaded yet", player_id)))?;
        Ok((player_id, snapshot))
    }

    /// Complete a mission of the selected player, then reload
    pub async fn complete_mission(&self, mission_id: &str) -> Result<CompletionReceipt> {
        let (player_id, snapshot) = self.selected()?;
        let mission = snapshot
            .mission(mission_id)
            .ok_or_else(|| Error::InvalidData(format!("Unknown mission {}", mission_id)))?;
        let receipt = self.dispatcher.complete_mission(&player_id, mission).await?;
        self.refresh_after_action().await;
        Ok(receipt)
    }

    /// Complete today's step of a streak, then reload
    pub async fn complete_streak(&self, streak_id: &str) -> Result<CompletionReceipt> {
        let (player_id, snapshot) = self.selected()?;
        let streak = snapshot
            .streak(streak_id)
            .ok_or_else(|| Error::InvalidData(format!("Unknown streak {}", streak_id)))?;
        let receipt = self.dispatcher.complete_streak(&player_id, streak).await?;
        self.refresh_after_action().await;
        Ok(receipt)
    }

    pub async fn complete_event(&self, event_id: &str) -> Result<CompletionReceipt> {
        let (player_id, _) = self.selected()?;
        let receipt = self.dispatcher.complete_event(&player_id, event_id).await?;
        self.refresh_after_action().await;
        Ok(receipt)
    }

    /// The configured survey
    pub async fn survey(&self) -> Result<Survey> {
        self.api.get_survey(&self.config.survey_id).await
    }

    pub async fn submit_survey(
        &self,
        survey: &Survey,
        selection: &AnswerSelection,
    ) -> Result<CompletionReceipt> {
        let (player_id, _) = self.selected()?;
        let receipt = self
            .dispatcher
            .submit_survey(&player_id, survey, selection)
            .await?;
        self.refresh_after_action().await;
        Ok(receipt)
    }

    /// Open the configured mystery box
    pub async fn mystery_box(&self) -> Result<MysteryBoxSession<A>> {
        MysteryBoxSession::load(Arc::clone(&self.api), &self.config.mystery_box_id).await
    }

    /// Claim `session`'s box for the selected player and start the wheel.
    /// The player is reloaded once the claim went through.
    pub async fn spin_mystery_box(&self, session: &mut MysteryBoxSession<A>) -> Result<SpinAnimation> {
        let (player_id, _) = self.selected()?;
        let animation = session.spin(&self.dispatcher, &player_id).await?;
        self.refresh_after_action().await;
        Ok(animation)
    }

    /// Reveal the won prize and reload the box stock
    pub async fn finish_spin(&self, session: &mut MysteryBoxSession<A>) -> Option<Prize> {
        let prize = session.finish_spin().cloned()?;
        if let Err(e) = session.refresh().await {
            warn!("Reload of mystery box after spin failed: {}", e);
        }
        Some(prize)
    }

    /// Start polling the configured leaderboard
    pub fn watch_leaderboard(&self) -> LeaderboardPollerHandle {
        let poller = LeaderboardPoller::new(
            Arc::clone(&self.api),
            self.config.leaderboard_id.clone(),
            Arc::clone(&self.directory),
        );
        spawn_leaderboard_poller(poller, self.config.poll_interval)
    }
}
