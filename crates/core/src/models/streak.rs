//! Streak models

use crate::models::Reward;
use serde::{Deserialize, Serialize};

/// Target used when a streak has no configured count limit
pub const DEFAULT_STREAK_TARGET: u32 = 7;

/// Response from `GET /players/{id}/streaks`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerStreaksResponse {
    #[serde(default)]
    pub streaks: StreakLists,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreakLists {
    #[serde(default)]
    pub started: Vec<StreakRecord>,
}

/// Streak progress record as the platform reports it
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Backing mission ids; the first one carries the completable event
    #[serde(default)]
    pub objectives: Vec<String>,
    #[serde(default)]
    pub actions: Option<StreakActions>,
    #[serde(default)]
    pub count_limit: Option<u32>,
    #[serde(default)]
    pub reward: Option<Reward>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreakActions {
    #[serde(default)]
    pub count: u32,
}

impl StreakRecord {
    pub fn backing_mission_id(&self) -> Option<&str> {
        self.objectives.first().map(String::as_str).filter(|id| !id.is_empty())
    }

    /// Build the view model once the backing mission's event has been looked up
    pub fn into_streak(self, event_id: Option<String>) -> Streak {
        let mission_id = self.backing_mission_id().map(str::to_string);
        Streak {
            id: self.id,
            name: self.name,
            description: self.description,
            current: self.actions.map(|a| a.count).unwrap_or(0),
            target: self.count_limit.filter(|&n| n > 0).unwrap_or(DEFAULT_STREAK_TARGET),
            reward: self.reward,
            event_id,
            mission_id,
        }
    }
}

/// Streak view model
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Streak {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub current: u32,
    pub target: u32,
    pub reward: Option<Reward>,
    pub event_id: Option<String>,
    pub mission_id: Option<String>,
}

/// One dot of the streak progress indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StreakSlot {
    Completed,
    Current,
    Pending,
}

impl Streak {
    /// Only streaks whose backing event resolved can be completed
    pub fn is_actionable(&self) -> bool {
        self.event_id.is_some()
    }

    /// Exactly `target` slots: done, then the current one, then pending
    pub fn progress_slots(&self) -> Vec<StreakSlot> {
        (0..self.target)
            .map(|i| {
                if i < self.current {
                    StreakSlot::Completed
                } else if i == self.current {
                    StreakSlot::Current
                } else {
                    StreakSlot::Pending
                }
            })
            .collect()
    }
}
