//! Shared type definitions and newtypes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of generated avatars offered when creating a player
pub const AVATAR_OPTION_COUNT: u32 = 30;

const AVATAR_BASE_URL: &str = "https://api.dicebear.com/7.x/avataaars/svg";

/// Account name + API key pair used on every request
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub account_name: String,
    pub api_key: String,
}

impl Credentials {
    pub fn new(account_name: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            account_name: account_name.into().trim().to_string(),
            api_key: api_key.into().trim().to_string(),
        }
    }

    /// Both fields must be filled in before any request goes out
    pub fn is_complete(&self) -> bool {
        !self.account_name.is_empty() && !self.api_key.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("account_name", &self.account_name)
            .field("api_key", &"***")
            .finish()
    }
}

/// Per-entity state of a user-triggered request
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase", tag = "state", content = "message")]
pub enum RequestState {
    #[default]
    Idle,
    Pending,
    Failed(String),
}

impl RequestState {
    pub fn is_pending(&self) -> bool {
        matches!(self, RequestState::Pending)
    }
}

/// A generated avatar the operator can pick for a new player
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvatarOption {
    pub seed: u32,
    pub url: String,
}

/// URL of the generated avatar for `seed`
pub fn avatar_url(seed: u32) -> String {
    format!("{}?seed={}", AVATAR_BASE_URL, seed)
}

/// The fixed avatar palette (seeds 1..=30)
pub fn avatar_options() -> Vec<AvatarOption> {
    (1..=AVATAR_OPTION_COUNT)
        .map(|seed| AvatarOption {
            seed,
            url: avatar_url(seed),
        })
        .collect()
}
