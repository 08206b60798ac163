//! GameLayer HTTP client authenticated with an `api-key` header

use gamelayer_core::{
    AchievementRecord, ClaimResponse, ClientConfig, CompletionReceipt, Credentials, Error, Event,
    LeaderboardResponse, MissionRecord, MysteryBox, NewPlayer, PlayerActionRequest,
    PlayerAchievementsResponse, PlayerPrize, PlayerPrizesResponse, PlayerRecord,
    PlayerStreaksResponse, PrizeRecord, Result, Survey, SurveySubmission, Team,
};
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, CACHE_CONTROL, CONTENT_TYPE},
    Client, RequestBuilder, StatusCode,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error, instrument};

const USER_AGENT_VALUE: &str = concat!("gamelayer-dash/", env!("CARGO_PKG_VERSION"));

/// Longest slice of an unreadable body we put in the log
const BODY_PREVIEW_LEN: usize = 500;

/// HTTP client for the GameLayer REST API.
///
/// Every request carries the `api-key` header and the `account` query
/// parameter taken from the credentials the client was built with.
pub struct GameLayerClient {
    http: Client,
    base_url: String,
    credentials: Credentials,
}

impl GameLayerClient {
    /// Create a new client for the given account
    ///
    /// # Errors
    /// `MissingCredentials` when either credential is blank, `ConfigError`
    /// when the HTTP stack cannot be built.
    pub fn new(config: &ClientConfig, credentials: Credentials) -> Result<Self> {
        if !credentials.is_complete() {
            return Err(Error::MissingCredentials(
                "account name and API key are required".to_string(),
            ));
        }

        let http = Client::builder()
            .user_agent(USER_AGENT_VALUE)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| Error::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    pub fn account(&self) -> &str {
        &self.credentials.account_name
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn default_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let key = HeaderValue::from_str(&self.credentials.api_key)
            .map_err(|_| Error::ConfigError("API key contains invalid characters".to_string()))?;
        headers.insert("api-key", key);
        Ok(headers)
    }

    /// Join percent-encoded path segments onto the base URL
    fn endpoint(&self, segments: &[&str]) -> String {
        endpoint_url(&self.base_url, segments)
    }

    fn get(&self, segments: &[&str]) -> Result<RequestBuilder> {
        Ok(self
            .http
            .get(self.endpoint(segments))
            .headers(self.default_headers()?)
            .query(&[("account", self.account())]))
    }

    fn post<B: Serialize + ?Sized>(&self, segments: &[&str], body: &B) -> Result<RequestBuilder> {
        Ok(self
            .http
            .post(self.endpoint(segments))
            .headers(self.default_headers()?)
            .header(CONTENT_TYPE, "application/json")
            .query(&[("account", self.account())])
            .json(body))
    }

    /// Send a request and hand back the status with the raw body text
    async fn send(&self, request: RequestBuilder, what: &str) -> Result<(StatusCode, String)> {
        let response = request.send().await.map_err(|e| {
            error!("{} request failed: {}", what, e);
            Error::from(e)
        })?;
        let status = response.status();
        debug!("{} response status: {}", what, status);

        let body = response.text().await.map_err(|e| {
            error!("Failed to read {} response body: {}", what, e);
            Error::from(e)
        })?;
        Ok((status, body))
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder, what: &str) -> Result<T> {
        let (status, body) = self.send(request, what).await?;
        decode_response(status.as_u16(), &body, what)
    }

    fn player_action(&self, player_id: &str) -> PlayerActionRequest {
        PlayerActionRequest {
            account: self.account().to_string(),
            player: player_id.to_string(),
        }
    }

    #[instrument(skip(self))]
    pub async fn list_players(&self) -> Result<Vec<PlayerRecord>> {
        let players: Vec<PlayerRecord> = self.fetch(self.get(&["players"])?, "Players").await?;
        debug!("Fetched {} players", players.len());
        Ok(players)
    }

    #[instrument(skip(self))]
    pub async fn get_player(&self, player_id: &str) -> Result<PlayerRecord> {
        self.fetch(self.get(&["players", player_id])?, "Player").await
    }

    #[instrument(skip(self, player), fields(player_id = %player.id))]
    pub async fn create_player(&self, player: &NewPlayer) -> Result<PlayerRecord> {
        let body = CreatePlayerBody {
            account: self.account(),
            player,
        };
        self.fetch(self.post(&["players"], &body)?, "Create player").await
    }

    #[instrument(skip(self))]
    pub async fn get_team(&self, team_id: &str) -> Result<Team> {
        self.fetch(self.get(&["teams", team_id])?, "Team").await
    }

    #[instrument(skip(self))]
    pub async fn list_missions(&self, player_id: Option<&str>) -> Result<Vec<MissionRecord>> {
        let mut request = self.get(&["missions"])?;
        if let Some(player) = player_id {
            request = request.query(&[("player", player)]);
        }
        let missions: Vec<MissionRecord> = self.fetch(request, "Missions").await?;
        debug!("Fetched {} missions", missions.len());
        Ok(missions)
    }

    #[instrument(skip(self))]
    pub async fn get_mission(&self, mission_id: &str) -> Result<MissionRecord> {
        self.fetch(self.get(&["missions", mission_id])?, "Mission").await
    }

    #[instrument(skip(self))]
    pub async fn list_achievements(&self) -> Result<Vec<AchievementRecord>> {
        self.fetch(self.get(&["achievements"])?, "Achievements").await
    }

    #[instrument(skip(self))]
    pub async fn get_player_achievements(&self, player_id: &str) -> Result<PlayerAchievementsResponse> {
        self.fetch(
            self.get(&["players", player_id, "achievements"])?,
            "Player achievements",
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn get_player_streaks(&self, player_id: &str) -> Result<PlayerStreaksResponse> {
        self.fetch(self.get(&["players", player_id, "streaks"])?, "Player streaks")
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_event(&self, event_id: &str, player_id: Option<&str>) -> Result<Event> {
        let mut request = self.get(&["events", event_id])?;
        if let Some(player) = player_id {
            request = request.query(&[("player", player)]);
        }
        self.fetch(request, "Event").await
    }

    #[instrument(skip(self))]
    pub async fn complete_event(&self, event_id: &str, player_id: &str) -> Result<CompletionReceipt> {
        debug!("Completing event {} for {}", event_id, player_id);
        let body = self.player_action(player_id);
        self.fetch(
            self.post(&["events", event_id, "complete"], &body)?,
            "Complete event",
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn get_leaderboard(&self, leaderboard_id: &str) -> Result<LeaderboardResponse> {
        let request = self
            .get(&["leaderboards", leaderboard_id])?
            .header(CACHE_CONTROL, "no-cache");
        let board: LeaderboardResponse = self.fetch(request, "Leaderboard").await?;
        debug!(
            "Leaderboard fetched: {} rows",
            board.scores.as_ref().map_or(0, |s| s.data.len())
        );
        Ok(board)
    }

    #[instrument(skip(self))]
    pub async fn get_survey(&self, survey_id: &str) -> Result<Survey> {
        self.fetch(self.get(&["surveys", survey_id])?, "Survey").await
    }

    #[instrument(skip(self, submission), fields(player = %submission.player))]
    pub async fn complete_survey(
        &self,
        survey_id: &str,
        submission: &SurveySubmission,
    ) -> Result<CompletionReceipt> {
        self.fetch(
            self.post(&["surveys", survey_id, "complete"], submission)?,
            "Complete survey",
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn get_mystery_box(&self, box_id: &str) -> Result<MysteryBox> {
        self.fetch(self.get(&["mysteryboxes", box_id])?, "Mystery box").await
    }

    #[instrument(skip(self))]
    pub async fn list_prizes(&self) -> Result<Vec<PrizeRecord>> {
        self.fetch(self.get(&["prizes"])?, "Prizes").await
    }

    /// Claim a mystery box; anything but code 1 comes back as `Rejected`
    #[instrument(skip(self))]
    pub async fn claim_mystery_box(&self, box_id: &str, player_id: &str) -> Result<ClaimResponse> {
        let body = self.player_action(player_id);
        let (status, text) = self
            .send(
                self.post(&["mysteryboxes", box_id, "claim"], &body)?,
                "Mystery box claim",
            )
            .await?;
        decode_claim(status.as_u16(), &text)
    }

    #[instrument(skip(self))]
    pub async fn list_player_prizes(&self, player_id: &str) -> Result<Vec<PlayerPrize>> {
        let response: PlayerPrizesResponse = self
            .fetch(self.get(&["players", player_id, "prizes"])?, "Player prizes")
            .await?;
        Ok(response.into_prizes())
    }
}

#[derive(Serialize)]
struct CreatePlayerBody<'a> {
    account: &'a str,
    #[serde(flatten)]
    player: &'a NewPlayer,
}

pub(crate) fn endpoint_url(base_url: &str, segments: &[&str]) -> String {
    let mut url = base_url.trim_end_matches('/').to_string();
    for segment in segments {
        url.push('/');
        url.push_str(&urlencoding::encode(segment));
    }
    url
}

fn preview(body: &str) -> &str {
    let mut end = body.len().min(BODY_PREVIEW_LEN);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

/// Pull a human message out of an error body
fn error_message(value: &serde_json::Value) -> Option<String> {
    ["message", "error", "msg"]
        .iter()
        .find_map(|key| value.get(key).and_then(|v| v.as_str()))
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

/// Classify a finished HTTP exchange.
///
/// * 2xx with a body of the expected shape: `Ok`.
/// * non-2xx with a JSON body: `ApiError` carrying its `message` verbatim.
/// * anything unreadable: `UnexpectedResponse`, raw text logged at error level.
pub fn decode_response<T: DeserializeOwned>(status: u16, body: &str, what: &str) -> Result<T> {
    if (200..300).contains(&status) {
        return serde_json::from_str(body).map_err(|e| {
            error!(
                "Failed to parse {} response: {}. Body preview: {}",
                what,
                e,
                preview(body)
            );
            Error::UnexpectedResponse { status }
        });
    }

    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => {
            let message = error_message(&value)
                .unwrap_or_else(|| format!("{} request failed with status {}", what, status));
            error!("{} request failed: HTTP {}: {}", what, status, message);
            Err(Error::ApiError { status, message })
        }
        Err(_) => {
            error!(
                "{} request failed: HTTP {} with unreadable body: {}",
                what,
                status,
                preview(body)
            );
            Err(Error::UnexpectedResponse { status })
        }
    }
}

/// Claim responses carry a domain `code` on both success and failure
pub fn decode_claim(status: u16, body: &str) -> Result<ClaimResponse> {
    let claim: ClaimResponse = match serde_json::from_str(body) {
        Ok(claim) => claim,
        Err(e) => {
            error!(
                "Failed to parse claim response (HTTP {}): {}. Body preview: {}",
                status,
                e,
                preview(body)
            );
            return Err(Error::UnexpectedResponse { status });
        }
    };

    match claim.code {
        Some(_) if claim.is_success() && (200..300).contains(&status) => Ok(claim),
        Some(code) => Err(Error::Rejected {
            code,
            message: claim
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| "Failed to claim mystery box".to_string()),
        }),
        None if (200..300).contains(&status) => {
            error!("Claim response without a result code: {}", preview(body));
            Err(Error::UnexpectedResponse { status })
        }
        None => Err(Error::ApiError {
            status,
            message: claim
                .message
                .unwrap_or_else(|| "Failed to claim mystery box".to_string()),
        }),
    }
}
