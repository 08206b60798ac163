//! Event models

use serde::{Deserialize, Serialize};

/// Event detail from `GET /events/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub img_url: Option<String>,
    #[serde(default)]
    pub points: Option<i64>,
    #[serde(default)]
    pub credits: Option<i64>,
    #[serde(default)]
    pub category: Option<String>,
}

/// Body shared by the player-scoped POST actions
#[derive(Debug, Clone, Serialize)]
pub struct PlayerActionRequest {
    pub account: String,
    pub player: String,
}

/// Whatever the platform echoes back after an event completion.
///
/// Only the fields we show are typed; the server's payload varies by event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionReceipt {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub points: Option<i64>,
    #[serde(default)]
    pub credits: Option<i64>,
}
