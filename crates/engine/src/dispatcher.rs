//! Action dispatcher
//!
//! Sends the player's actions to the platform. Nothing local is mutated
//! on success; callers re-run the aggregator to see the new state.

use gamelayer_core::{
    AnswerSelection, ClaimResponse, CompletionReceipt, Error, Mission, RequestState, Result,
    Streak, Survey,
};
use gamelayer_networking::api::build_submission;
use gamelayer_networking::GameLayerApi;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// Shown for missions and streaks that have no event to complete
pub const NOT_COMPLETABLE_NOTICE: &str = "This mission cannot be completed yet";

/// Request state per entity key (`mission:<id>`, `survey:<id>`, ...)
#[derive(Default)]
pub struct ActionTracker {
    states: Mutex<HashMap<String, RequestState>>,
}

impl ActionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, key: &str) -> RequestState {
        self.states
            .lock()
            .ok()
            .and_then(|states| states.get(key).cloned())
            .unwrap_or_default()
    }

    pub fn is_pending(&self, key: &str) -> bool {
        self.state(key).is_pending()
    }

    /// Mark `key` pending, refusing when a request for it is still out
    pub fn begin(&self, key: &str) -> Result<PendingAction<'_>> {
        let mut states = self
            .states
            .lock()
            .map_err(|_| Error::InvalidData("action tracker poisoned".to_string()))?;
        if states.get(key).is_some_and(RequestState::is_pending) {
            return Err(Error::Busy(key.to_string()));
        }
        states.insert(key.to_string(), RequestState::Pending);
        Ok(PendingAction {
            tracker: self,
            key: key.to_string(),
            settled: false,
        })
    }

    fn set(&self, key: &str, state: RequestState) {
        if let Ok(mut states) = self.states.lock() {
            states.insert(key.to_string(), state);
        }
    }
}

/// A request in flight; settles its tracker entry, or resets it if dropped
pub struct PendingAction<'a> {
    tracker: &'a ActionTracker,
    key: String,
    settled: bool,
}

impl PendingAction<'_> {
    pub fn settle<T>(mut self, result: &Result<T>) {
        let state = match result {
            Ok(_) => RequestState::Idle,
            Err(e) => RequestState::Failed(e.user_message()),
        };
        self.tracker.set(&self.key, state);
        self.settled = true;
    }
}

impl Drop for PendingAction<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.tracker.set(&self.key, RequestState::Idle);
        }
    }
}

pub fn mission_key(mission_id: &str) -> String {
    format!("mission:{}", mission_id)
}

pub fn streak_key(streak_id: &str) -> String {
    format!("streak:{}", streak_id)
}

pub fn survey_key(survey_id: &str) -> String {
    format!("survey:{}", survey_id)
}

pub fn mystery_box_key(box_id: &str) -> String {
    format!("mysterybox:{}", box_id)
}

pub fn event_key(event_id: &str) -> String {
    format!("event:{}", event_id)
}

/// Relays user actions as single POSTs, one in flight per entity
pub struct ActionDispatcher<A> {
    api: Arc<A>,
    tracker: ActionTracker,
}

impl<A: GameLayerApi> ActionDispatcher<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            tracker: ActionTracker::new(),
        }
    }

    pub fn tracker(&self) -> &ActionTracker {
        &self.tracker
    }

    pub async fn complete_mission(&self, player_id: &str, mission: &Mission) -> Result<CompletionReceipt> {
        let event_id = match mission.primary_event_id() {
            Some(event_id) if mission.is_completable() => event_id,
            _ => return Err(Error::NotCompletable(NOT_COMPLETABLE_NOTICE.to_string())),
        };
        info!("Completing mission {} ({}) for {}", mission.id, event_id, player_id);
        self.complete_tracked(&mission_key(&mission.id), event_id, player_id)
            .await
    }

    pub async fn complete_streak(&self, player_id: &str, streak: &Streak) -> Result<CompletionReceipt> {
        let event_id = streak
            .event_id
            .as_deref()
            .ok_or_else(|| Error::NotCompletable(NOT_COMPLETABLE_NOTICE.to_string()))?;
        info!("Completing streak {} ({}) for {}", streak.id, event_id, player_id);
        self.complete_tracked(&streak_key(&streak.id), event_id, player_id)
            .await
    }

    /// Complete an arbitrary event by id
    pub async fn complete_event(&self, player_id: &str, event_id: &str) -> Result<CompletionReceipt> {
        if event_id.trim().is_empty() {
            return Err(Error::NotCompletable(NOT_COMPLETABLE_NOTICE.to_string()));
        }
        self.complete_tracked(&event_key(event_id), event_id, player_id)
            .await
    }

    async fn complete_tracked(
        &self,
        key: &str,
        event_id: &str,
        player_id: &str,
    ) -> Result<CompletionReceipt> {
        let pending = self.tracker.begin(key)?;
        let result = self.api.complete_event(event_id, player_id).await;
        if let Err(e) = &result {
            warn!("Completing {} failed: {}", key, e);
        }
        pending.settle(&result);
        result
    }

    /// Submit a fully answered survey
    pub async fn submit_survey(
        &self,
        player_id: &str,
        survey: &Survey,
        selection: &AnswerSelection,
    ) -> Result<CompletionReceipt> {
        let submission = build_submission(survey, selection, self.api.account(), player_id)?;
        let key = survey_key(&survey.id);
        let pending = self.tracker.begin(&key)?;

        info!("Submitting survey {} for {}", survey.id, player_id);
        let result = self.api.complete_survey(&survey.id, &submission).await;
        if let Err(e) = &result {
            warn!("Survey {} submission failed: {}", survey.id, e);
        }
        pending.settle(&result);
        result
    }

    /// Claim a mystery box; rejections come back as `Error::Rejected`
    pub async fn claim_mystery_box(&self, player_id: &str, box_id: &str) -> Result<ClaimResponse> {
        let key = mystery_box_key(box_id);
        let pending = self.tracker.begin(&key)?;

        info!("Claiming mystery box {} for {}", box_id, player_id);
        let result = self.api.claim_mystery_box(box_id, player_id).await;
        match &result {
            Err(e) if e.is_rejection() => info!("Mystery box claim rejected: {}", e),
            Err(e) => warn!("Mystery box claim failed: {}", e),
            Ok(_) => {}
        }
        pending.settle(&result);
        result
    }
}
