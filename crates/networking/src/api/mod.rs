//! High-level API surface for GameLayer endpoints
//!
//! `GameLayerApi` is the seam the engine is written against; the HTTP
//! client implements it and tests substitute a scripted fake. The
//! submodules add validation on top of the raw calls.

mod players;
mod surveys;

pub use players::*;
pub use surveys::*;

use crate::GameLayerClient;
use gamelayer_core::{
    AchievementRecord, ClaimResponse, CompletionReceipt, Event, LeaderboardResponse,
    MissionRecord, MysteryBox, NewPlayer, PlayerAchievementsResponse, PlayerPrize, PlayerRecord,
    PlayerStreaksResponse, PrizeRecord, Result, Survey, SurveySubmission, Team,
};
use std::future::Future;

/// Every remote operation the dashboard performs
pub trait GameLayerApi: Send + Sync {
    /// Account the calls are made for (sent in request bodies)
    fn account(&self) -> &str;

    fn list_players(&self) -> impl Future<Output = Result<Vec<PlayerRecord>>> + Send;

    fn get_player(&self, player_id: &str) -> impl Future<Output = Result<PlayerRecord>> + Send;

    fn create_player(&self, player: &NewPlayer) -> impl Future<Output = Result<PlayerRecord>> + Send;

    fn get_team(&self, team_id: &str) -> impl Future<Output = Result<Team>> + Send;

    fn list_missions(
        &self,
        player_id: Option<&str>,
    ) -> impl Future<Output = Result<Vec<MissionRecord>>> + Send;

    fn get_mission(&self, mission_id: &str) -> impl Future<Output = Result<MissionRecord>> + Send;

    fn list_achievements(&self) -> impl Future<Output = Result<Vec<AchievementRecord>>> + Send;

    fn get_player_achievements(
        &self,
        player_id: &str,
    ) -> impl Future<Output = Result<PlayerAchievementsResponse>> + Send;

    fn get_player_streaks(
        &self,
        player_id: &str,
    ) -> impl Future<Output = Result<PlayerStreaksResponse>> + Send;

    fn get_event(
        &self,
        event_id: &str,
        player_id: Option<&str>,
    ) -> impl Future<Output = Result<Event>> + Send;

    fn complete_event(
        &self,
        event_id: &str,
        player_id: &str,
    ) -> impl Future<Output = Result<CompletionReceipt>> + Send;

    fn get_leaderboard(
        &self,
        leaderboard_id: &str,
    ) -> impl Future<Output = Result<LeaderboardResponse>> + Send;

    fn get_survey(&self, survey_id: &str) -> impl Future<Output = Result<Survey>> + Send;

    fn complete_survey(
        &self,
        survey_id: &str,
        submission: &SurveySubmission,
    ) -> impl Future<Output = Result<CompletionReceipt>> + Send;

    fn get_mystery_box(&self, box_id: &str) -> impl Future<Output = Result<MysteryBox>> + Send;

    fn list_prizes(&self) -> impl Future<Output = Result<Vec<PrizeRecord>>> + Send;

    /// Resolves to `Err(Error::Rejected)` for any non-success claim code
    fn claim_mystery_box(
        &self,
        box_id: &str,
        player_id: &str,
    ) -> impl Future<Output = Result<ClaimResponse>> + Send;

    fn list_player_prizes(
        &self,
        player_id: &str,
    ) -> impl Future<Output = Result<Vec<PlayerPrize>>> + Send;
}

impl GameLayerApi for GameLayerClient {
    fn account(&self) -> &str {
        GameLayerClient::account(self)
    }

    async fn list_players(&self) -> Result<Vec<PlayerRecord>> {
        GameLayerClient::list_players(self).await
    }

    async fn get_player(&self, player_id: &str) -> Result<PlayerRecord> {
        GameLayerClient::get_player(self, player_id).await
    }

    async fn create_player(&self, player: &NewPlayer) -> Result<PlayerRecord> {
        GameLayerClient::create_player(self, player).await
    }

    async fn get_team(&self, team_id: &str) -> Result<Team> {
        GameLayerClient::get_team(self, team_id).await
    }

    async fn list_missions(&self, player_id: Option<&str>) -> Result<Vec<MissionRecord>> {
        GameLayerClient::list_missions(self, player_id).await
    }

    async fn get_mission(&self, mission_id: &str) -> Result<MissionRecord> {
        GameLayerClient::get_mission(self, mission_id).await
    }

    async fn list_achievements(&self) -> Result<Vec<AchievementRecord>> {
        GameLayerClient::list_achievements(self).await
    }

    async fn get_player_achievements(&self, player_id: &str) -> Result<PlayerAchievementsResponse> {
        GameLayerClient::get_player_achievements(self, player_id).await
    }

    async fn get_player_streaks(&self, player_id: &str) -> Result<PlayerStreaksResponse> {
        GameLayerClient::get_player_streaks(self, player_id).await
    }

    async fn get_event(&self, event_id: &str, player_id: Option<&str>) -> Result<Event> {
        GameLayerClient::get_event(self, event_id, player_id).await
    }

    async fn complete_event(&self, event_id: &str, player_id: &str) -> Result<CompletionReceipt> {
        GameLayerClient::complete_event(self, event_id, player_id).await
    }

    async fn get_leaderboard(&self, leaderboard_id: &str) -> Result<LeaderboardResponse> {
        GameLayerClient::get_leaderboard(self, leaderboard_id).await
    }

    async fn get_survey(&self, survey_id: &str) -> Result<Survey> {
        GameLayerClient::get_survey(self, survey_id).await
    }

    async fn complete_survey(
        &self,
        survey_id: &str,
        submission: &SurveySubmission,
    ) -> Result<CompletionReceipt> {
        GameLayerClient::complete_survey(self, survey_id, submission).await
    }

    async fn get_mystery_box(&self, box_id: &str) -> Result<MysteryBox> {
        GameLayerClient::get_mystery_box(self, box_id).await
    }

    async fn list_prizes(&self) -> Result<Vec<PrizeRecord>> {
        GameLayerClient::list_prizes(self).await
    }

    async fn claim_mystery_box(&self, box_id: &str, player_id: &str) -> Result<ClaimResponse> {
        GameLayerClient::claim_mystery_box(self, box_id, player_id).await
    }

    async fn list_player_prizes(&self, player_id: &str) -> Result<Vec<PlayerPrize>> {
        GameLayerClient::list_player_prizes(self, player_id).await
    }
}
