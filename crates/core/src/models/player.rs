//! Player and team models

use serde::{Deserialize, Serialize};

/// Player record as returned by `GET /players` and `GET /players/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub img_url: Option<String>,
    #[serde(default)]
    pub points: Option<i64>,
    #[serde(default)]
    pub credits: Option<i64>,
    /// The platform has shipped this as a string, a number and an object
    #[serde(default)]
    pub level: Option<serde_json::Value>,
    /// Team id; resolved to a name through `GET /teams/{id}`
    #[serde(default)]
    pub team: Option<String>,
}

impl PlayerRecord {
    /// Human readable level label, whatever shape the server used
    pub fn level_label(&self) -> Option<String> {
        match self.level.as_ref()? {
            serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            serde_json::Value::Object(obj) => obj
                .get("name")
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .or_else(|| obj.get("number").map(|n| n.to_string())),
            _ => None,
        }
    }

    /// Build the view model once the team lookup has settled
    pub fn into_player(self, team: Option<PlayerTeam>) -> Player {
        let level = self.level_label();
        Player {
            id: self.id,
            name: self.name,
            img_url: self.img_url,
            points: self.points,
            credits: self.credits,
            level,
            team,
        }
    }
}

/// Team record from `GET /teams/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub img_url: Option<String>,
}

/// Team as shown on the profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "value")]
pub enum PlayerTeam {
    /// Lookup succeeded; the raw id is no longer displayed
    Named(String),
    /// Lookup failed; only the id is known
    Unresolved(String),
}

impl PlayerTeam {
    pub fn display(&self) -> &str {
        match self {
            PlayerTeam::Named(name) => name,
            PlayerTeam::Unresolved(id) => id,
        }
    }
}

/// Player profile view model
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: String,
    pub name: String,
    pub img_url: Option<String>,
    pub points: Option<i64>,
    pub credits: Option<i64>,
    pub level: Option<String>,
    pub team: Option<PlayerTeam>,
}

/// Name + avatar pair cached by the leaderboard poller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDetails {
    pub name: String,
    pub img_url: Option<String>,
}

impl From<&PlayerRecord> for PlayerDetails {
    fn from(record: &PlayerRecord) -> Self {
        PlayerDetails {
            name: record.name.clone(),
            img_url: record.img_url.clone(),
        }
    }
}

/// Body of `POST /players`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlayer {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub img_url: Option<String>,
}
