//! Leaderboard-related models

use serde::{Deserialize, Serialize};

/// Full leaderboard response from `GET /leaderboards/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardResponse {
    #[serde(default)]
    pub leaderboard: Option<LeaderboardInfo>,
    #[serde(default)]
    pub scores: Option<LeaderboardScores>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardInfo {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub img_url: Option<String>,
    #[serde(default)]
    pub period: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardScores {
    #[serde(default)]
    pub data: Vec<ScoreEntry>,
    #[serde(default)]
    pub total_players: u32,
}

/// One ranked row as the platform returns it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreEntry {
    /// Player id
    pub player: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub scores: serde_json::Value,
    #[serde(default)]
    pub rank: u32,
    #[serde(default)]
    pub tags: Vec<String>,
}

fn parse_i64(v: &serde_json::Value) -> i64 {
    match v {
        serde_json::Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.round() as i64))
            .unwrap_or(0),
        serde_json::Value::String(s) => s.trim().parse::<f64>().map(|f| f.round() as i64).unwrap_or(0),
        _ => 0,
    }
}

impl ScoreEntry {
    pub fn points(&self) -> i64 {
        parse_i64(&self.scores)
    }
}

/// Player shown on a leaderboard row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardPlayer {
    pub id: String,
    pub name: String,
    pub img_url: Option<String>,
}

/// Leaderboard row view model, with movement since the previous poll
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub player: LeaderboardPlayer,
    pub points: i64,
    pub previous_rank: Option<u32>,
    pub previous_points: Option<i64>,
}

/// Direction a row moved since the previous poll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RankMovement {
    Up(u32),
    Down(u32),
    Unchanged,
    New,
}

impl LeaderboardEntry {
    pub fn rank_movement(&self) -> RankMovement {
        match self.previous_rank {
            None => RankMovement::New,
            Some(prev) if prev > self.rank => RankMovement::Up(prev - self.rank),
            Some(prev) if prev < self.rank => RankMovement::Down(self.rank - prev),
            Some(_) => RankMovement::Unchanged,
        }
    }

    /// Points gained since the previous poll (None on first sight)
    pub fn points_delta(&self) -> Option<i64> {
        self.previous_points.map(|prev| self.points.saturating_sub(prev))
    }
}
