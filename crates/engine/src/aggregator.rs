//! Player-state aggregator
//!
//! Loads everything the dashboard shows for one player. The profile is
//! required; every other slice degrades to an empty value and records a
//! [`SliceFailure`] so one broken endpoint does not blank the page.

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use gamelayer_core::{
    display_missions, merge_achievements, Achievement, AchievementProgressLists, Mission, Player,
    PlayerTeam, Result, Streak, StreakRecord,
};
use gamelayer_networking::GameLayerApi;
use serde::Serialize;
use std::fmt;
use tracing::{debug, info, instrument, warn};

/// Which part of the player state a failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Slice {
    Team,
    Missions,
    Achievements,
    AchievementProgress,
    Streaks,
    StreakEvent,
}

impl fmt::Display for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Slice::Team => "team",
            Slice::Missions => "missions",
            Slice::Achievements => "achievements",
            Slice::AchievementProgress => "achievement progress",
            Slice::Streaks => "streaks",
            Slice::StreakEvent => "streak event",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SliceFailure {
    pub slice: Slice,
    pub message: String,
}

impl SliceFailure {
    fn new(slice: Slice, err: &gamelayer_core::Error) -> Self {
        warn!("Failed to load {}: {}", slice, err);
        Self {
            slice,
            message: err.user_message(),
        }
    }
}

/// Everything rendered for one player, produced once all slices settled
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshot {
    pub player: Player,
    pub missions: Vec<Mission>,
    pub achievements: Vec<Achievement>,
    pub streaks: Vec<Streak>,
    pub failures: Vec<SliceFailure>,
    pub loaded_at: DateTime<Utc>,
}

impl PlayerSnapshot {
    pub fn mission(&self, mission_id: &str) -> Option<&Mission> {
        self.missions.iter().find(|m| m.id == mission_id)
    }

    pub fn streak(&self, streak_id: &str) -> Option<&Streak> {
        self.streaks.iter().find(|s| s.id == streak_id)
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Fetch and merge the full state of `player_id`.
///
/// # Errors
/// Only the profile fetch is fatal; its error is returned as is.
#[instrument(skip(api))]
pub async fn load_player_state<A: GameLayerApi>(api: &A, player_id: &str) -> Result<PlayerSnapshot> {
    let (profile, missions, achievements, streaks) = tokio::join!(
        load_profile(api, player_id),
        load_missions(api, player_id),
        load_achievements(api, player_id),
        load_streaks(api, player_id),
    );

    let (player, team_failure) = profile?;
    let (missions, mission_failure) = missions;
    let (achievements, mut failures) = achievements;
    let (streaks, streak_failures) = streaks;

    failures.extend(team_failure);
    failures.extend(mission_failure);
    failures.extend(streak_failures);

    info!(
        "Loaded player {}: {} missions, {} achievements, {} streaks ({} failed slices)",
        player.id,
        missions.len(),
        achievements.len(),
        streaks.len(),
        failures.len()
    );

    Ok(PlayerSnapshot {
        player,
        missions,
        achievements,
        streaks,
        failures,
        loaded_at: Utc::now(),
    })
}

/// Profile first, then the team name it points at
async fn load_profile<A: GameLayerApi>(
    api: &A,
    player_id: &str,
) -> Result<(Player, Option<SliceFailure>)> {
    let record = api.get_player(player_id).await?;

    let team_id = record.team.clone().filter(|t| !t.trim().is_empty());
    let (team, failure) = match team_id {
        None => (None, None),
        Some(team_id) => match api.get_team(&team_id).await {
            Ok(team) => (Some(PlayerTeam::Named(team.name)), None),
            Err(e) => (
                Some(PlayerTeam::Unresolved(team_id)),
                Some(SliceFailure::new(Slice::Team, &e)),
            ),
        },
    };

    Ok((record.into_player(team), failure))
}

async fn load_missions<A: GameLayerApi>(
    api: &A,
    player_id: &str,
) -> (Vec<Mission>, Option<SliceFailure>) {
    match api.list_missions(Some(player_id)).await {
        Ok(records) => (display_missions(records), None),
        Err(e) => (Vec::new(), Some(SliceFailure::new(Slice::Missions, &e))),
    }
}

async fn load_achievements<A: GameLayerApi>(
    api: &A,
    player_id: &str,
) -> (Vec<Achievement>, Vec<SliceFailure>) {
    let (catalog, progress) = tokio::join!(
        api.list_achievements(),
        api.get_player_achievements(player_id)
    );

    let mut failures = Vec::new();
    let catalog = catalog.unwrap_or_else(|e| {
        failures.push(SliceFailure::new(Slice::Achievements, &e));
        Vec::new()
    });
    let progress = match progress {
        Ok(response) => response.achievements,
        Err(e) => {
            failures.push(SliceFailure::new(Slice::AchievementProgress, &e));
            AchievementProgressLists::default()
        }
    };

    (merge_achievements(catalog, &progress), failures)
}

async fn load_streaks<A: GameLayerApi>(
    api: &A,
    player_id: &str,
) -> (Vec<Streak>, Vec<SliceFailure>) {
    let records = match api.get_player_streaks(player_id).await {
        Ok(response) => response.streaks.started,
        Err(e) => return (Vec::new(), vec![SliceFailure::new(Slice::Streaks, &e)]),
    };

    let resolved = join_all(records.into_iter().map(|record| resolve_streak(api, record))).await;

    let mut streaks = Vec::with_capacity(resolved.len());
    let mut failures = Vec::new();
    for (streak, failure) in resolved {
        streaks.push(streak);
        failures.extend(failure);
    }
    (streaks, failures)
}

/// Streak -> backing mission -> first objective event
async fn resolve_streak<A: GameLayerApi>(
    api: &A,
    record: StreakRecord,
) -> (Streak, Option<SliceFailure>) {
    let mission_id = match record.backing_mission_id() {
        Some(id) => id.to_string(),
        None => {
            debug!("Streak {} has no backing mission", record.id);
            return (record.into_streak(None), None);
        }
    };

    match api.get_mission(&mission_id).await {
        Ok(mission) => {
            let event_id = mission.primary_event_id();
            if event_id.is_none() {
                debug!("Mission {} behind streak {} has no event", mission_id, record.id);
            }
            (record.into_streak(event_id), None)
        }
        Err(e) => (
            record.into_streak(None),
            Some(SliceFailure::new(Slice::StreakEvent, &e)),
        ),
    }
}
