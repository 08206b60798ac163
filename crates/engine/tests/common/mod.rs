//! Scripted in-memory GameLayer API shared by the engine tests

#![allow(dead_code)]

use gamelayer_core::{
    AchievementRecord, ClaimResponse, CompletionReceipt, Error, Event, LeaderboardResponse,
    MissionRecord, MysteryBox, NewPlayer, PlayerAchievementsResponse, PlayerPrize, PlayerRecord,
    PlayerStreaksResponse, PrizeRecord, Result, Survey, SurveySubmission, Team,
};
use gamelayer_networking::GameLayerApi;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

pub const ACCOUNT: &str = "acme";

/// Outcome of the next mystery box claim
#[derive(Clone)]
pub enum ClaimScript {
    Win(Value),
    Reject { code: i64, message: String },
    SuccessWithoutPrize,
}

pub struct FakeApi {
    pub players: Mutex<Vec<PlayerRecord>>,
    pub teams: Mutex<HashMap<String, String>>,
    pub missions: Mutex<Vec<MissionRecord>>,
    pub achievements: Mutex<Vec<AchievementRecord>>,
    pub progress: Mutex<PlayerAchievementsResponse>,
    pub streaks: Mutex<PlayerStreaksResponse>,
    /// Boards handed out in order; the last one repeats
    pub boards: Mutex<VecDeque<LeaderboardResponse>>,
    pub survey: Mutex<Option<Survey>>,
    pub mystery_box: Mutex<Option<MysteryBox>>,
    pub prizes: Mutex<Vec<PrizeRecord>>,
    pub claim: Mutex<ClaimScript>,
    /// Operation names that fail with a network error
    pub failing: Mutex<HashSet<&'static str>>,
    calls: Mutex<Vec<String>>,
}

impl Default for FakeApi {
    fn default() -> Self {
        Self {
            players: Mutex::new(Vec::new()),
            teams: Mutex::new(HashMap::new()),
            missions: Mutex::new(Vec::new()),
            achievements: Mutex::new(Vec::new()),
            progress: Mutex::new(PlayerAchievementsResponse::default()),
            streaks: Mutex::new(PlayerStreaksResponse::default()),
            boards: Mutex::new(VecDeque::new()),
            survey: Mutex::new(None),
            mystery_box: Mutex::new(None),
            prizes: Mutex::new(Vec::new()),
            claim: Mutex::new(ClaimScript::Reject {
                code: 2,
                message: "Not enough credits".to_string(),
            }),
            failing: Mutex::new(HashSet::new()),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(&self, operation: &'static str) {
        self.failing.lock().unwrap().insert(operation);
    }

    pub fn recover(&self, operation: &'static str) {
        self.failing.lock().unwrap().remove(operation);
    }

    /// Every call so far as `operation:argument`
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    pub fn push_board(&self, board: LeaderboardResponse) {
        self.boards.lock().unwrap().push_back(board);
    }

    fn record(&self, operation: &'static str, argument: &str) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{}:{}", operation, argument));
        if self.failing.lock().unwrap().contains(operation) {
            return Err(Error::NetworkError(format!("{} unreachable", operation)));
        }
        Ok(())
    }

    fn not_found(what: &str, id: &str) -> Error {
        Error::ApiError {
            status: 404,
            message: format!("{} {} not found", what, id),
        }
    }
}

impl GameLayerApi for FakeApi {
    fn account(&self) -> &str {
        ACCOUNT
    }

    async fn list_players(&self) -> Result<Vec<PlayerRecord>> {
        self.record("list_players", "")?;
        Ok(self.players.lock().unwrap().clone())
    }

    async fn get_player(&self, player_id: &str) -> Result<PlayerRecord> {
        self.record("get_player", player_id)?;
        self.players
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == player_id)
            .cloned()
            .ok_or_else(|| Self::not_found("Player", player_id))
    }

    async fn create_player(&self, player: &NewPlayer) -> Result<PlayerRecord> {
        self.record("create_player", &player.id)?;
        let record = player_record(&player.id, &player.name, None);
        self.players.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn get_team(&self, team_id: &str) -> Result<Team> {
        self.record("get_team", team_id)?;
        let name = self
            .teams
            .lock()
            .unwrap()
            .get(team_id)
            .cloned()
            .ok_or_else(|| Self::not_found("Team", team_id))?;
        Ok(Team {
            id: team_id.to_string(),
            name,
            img_url: None,
        })
    }

    async fn list_missions(&self, player_id: Option<&str>) -> Result<Vec<MissionRecord>> {
        self.record("list_missions", player_id.unwrap_or(""))?;
        Ok(self.missions.lock().unwrap().clone())
    }

    async fn get_mission(&self, mission_id: &str) -> Result<MissionRecord> {
        self.record("get_mission", mission_id)?;
        self.missions
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.id == mission_id)
            .cloned()
            .ok_or_else(|| Self::not_found("Mission", mission_id))
    }

    async fn list_achievements(&self) -> Result<Vec<AchievementRecord>> {
        self.record("list_achievements", "")?;
        Ok(self.achievements.lock().unwrap().clone())
    }

    async fn get_player_achievements(&self, player_id: &str) -> Result<PlayerAchievementsResponse> {
        self.record("get_player_achievements", player_id)?;
        Ok(self.progress.lock().unwrap().clone())
    }

    async fn get_player_streaks(&self, player_id: &str) -> Result<PlayerStreaksResponse> {
        self.record("get_player_streaks", player_id)?;
        Ok(self.streaks.lock().unwrap().clone())
    }

    async fn get_event(&self, event_id: &str, _player_id: Option<&str>) -> Result<Event> {
        self.record("get_event", event_id)?;
        Ok(serde_json::from_value(json!({"id": event_id, "name": "Event"}))?)
    }

    async fn complete_event(&self, event_id: &str, player_id: &str) -> Result<CompletionReceipt> {
        self.record("complete_event", &format!("{}@{}", event_id, player_id))?;
        Ok(CompletionReceipt {
            message: Some("Event completed".to_string()),
            points: Some(10),
            credits: None,
        })
    }

    async fn get_leaderboard(&self, leaderboard_id: &str) -> Result<LeaderboardResponse> {
        self.record("get_leaderboard", leaderboard_id)?;
        let mut boards = self.boards.lock().unwrap();
        let board = if boards.len() > 1 {
            boards.pop_front()
        } else {
            boards.front().cloned()
        };
        board.ok_or_else(|| Self::not_found("Leaderboard", leaderboard_id))
    }

    async fn get_survey(&self, survey_id: &str) -> Result<Survey> {
        self.record("get_survey", survey_id)?;
        self.survey
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| Self::not_found("Survey", survey_id))
    }

    async fn complete_survey(
        &self,
        survey_id: &str,
        submission: &SurveySubmission,
    ) -> Result<CompletionReceipt> {
        self.record("complete_survey", &format!("{}@{}", survey_id, submission.player))?;
        Ok(CompletionReceipt::default())
    }

    async fn get_mystery_box(&self, box_id: &str) -> Result<MysteryBox> {
        self.record("get_mystery_box", box_id)?;
        self.mystery_box
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| Self::not_found("Mystery box", box_id))
    }

    async fn list_prizes(&self) -> Result<Vec<PrizeRecord>> {
        self.record("list_prizes", "")?;
        Ok(self.prizes.lock().unwrap().clone())
    }

    async fn claim_mystery_box(&self, box_id: &str, player_id: &str) -> Result<ClaimResponse> {
        self.record("claim_mystery_box", &format!("{}@{}", box_id, player_id))?;
        let script = self.claim.lock().unwrap().clone();
        match script {
            ClaimScript::Win(prize) => Ok(serde_json::from_value(json!({
                "code": 1,
                "message": "Mystery box claimed",
                "prize": prize,
            }))?),
            ClaimScript::Reject { code, message } => Err(Error::Rejected { code, message }),
            ClaimScript::SuccessWithoutPrize => Ok(serde_json::from_value(json!({"code": 1}))?),
        }
    }

    async fn list_player_prizes(&self, player_id: &str) -> Result<Vec<PlayerPrize>> {
        self.record("list_player_prizes", player_id)?;
        Ok(Vec::new())
    }
}


pub fn player_record(id: &str, name: &str, team: Option<&str>) -> PlayerRecord {
    serde_json::from_value(json!({
        "id": id,
        "name": name,
        "imgUrl": format!("https://img.example/{}.png", id),
        "points": 120,
        "credits": 40,
        "level": {"number": 2, "name": "Silver"},
        "team": team,
    }))
    .unwrap()
}

pub fn mission(id: &str, priority: i64, available: bool, events: &[&str]) -> MissionRecord {
    let events: Vec<Value> = events.iter().map(|e| json!({"id": e})).collect();
    serde_json::from_value(json!({
        "id": id,
        "name": format!("Mission {}", id),
        "description": "",
        "priority": priority,
        "isAvailable": available,
        "objectives": {"events": events},
        "reward": {"points": 10, "credits": 1},
    }))
    .unwrap()
}

pub fn achievement(id: &str, steps: u32) -> AchievementRecord {
    serde_json::from_value(json!({
        "id": id,
        "name": format!("Achievement {}", id),
        "description": "",
        "steps": steps,
    }))
    .unwrap()
}

pub fn progress(started: &[(&str, u32)], completed: &[&str]) -> PlayerAchievementsResponse {
    let started: Vec<Value> = started
        .iter()
        .map(|(id, count)| json!({"id": id, "count": count}))
        .collect();
    let completed: Vec<Value> = completed.iter().map(|id| json!({"id": id})).collect();
    serde_json::from_value(json!({
        "achievements": {"started": started, "completed": completed}
    }))
    .unwrap()
}

pub fn streaks(entries: &[(&str, &str, u32, u32)]) -> PlayerStreaksResponse {
    let started: Vec<Value> = entries
        .iter()
        .map(|(id, mission_id, count, limit)| {
            json!({
                "id": id,
                "name": format!("Streak {}", id),
                "objectives": [mission_id],
                "actions": {"count": count},
                "countLimit": limit,
            })
        })
        .collect();
    serde_json::from_value(json!({"streaks": {"started": started}})).unwrap()
}

/// Board with `(player, name, points, rank)` rows
pub fn board(rows: &[(&str, &str, i64, u32)]) -> LeaderboardResponse {
    let data: Vec<Value> = rows
        .iter()
        .map(|(player, name, points, rank)| {
            json!({"player": player, "name": name, "scores": points, "rank": rank, "tags": []})
        })
        .collect();
    serde_json::from_value(json!({
        "leaderboard": {"id": "1-test-leaderboard", "name": "Weekly"},
        "scores": {"data": data, "totalPlayers": rows.len()},
    }))
    .unwrap()
}

pub fn mystery_box(available: bool) -> MysteryBox {
    serde_json::from_value(json!({
        "id": "1-test-wheel",
        "name": "Wheel",
        "description": "",
        "credits": 10,
        "isAvailable": available,
        "stock": {"redeemed": 0, "available": 10, "count": 10},
    }))
    .unwrap()
}

pub fn prize(id: &str, tags: &[&str]) -> Value {
    json!({
        "id": id,
        "name": format!("Prize {}", id),
        "description": "",
        "tags": tags,
        "stock": {"available": 5},
    })
}

pub fn prize_record(id: &str, tags: &[&str]) -> PrizeRecord {
    serde_json::from_value(prize(id, tags)).unwrap()
}
