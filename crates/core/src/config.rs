//! Client configuration loaded from the environment (and an optional `.env` file).

use crate::{Error, Result};
use std::env;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.gamelayer.co/api/v0";
pub const DEFAULT_LEADERBOARD_ID: &str = "1-test-leaderboard";
pub const DEFAULT_MYSTERY_BOX_ID: &str = "1-test-wheel";
pub const DEFAULT_SURVEY_ID: &str = "1-test-survey";

/// Leaderboard refresh period
pub const DEFAULT_POLL_SECS: u64 = 10;

const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Everything the client needs besides the credentials
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// REST root, without trailing slash
    pub base_url: String,
    pub leaderboard_id: String,
    pub mystery_box_id: String,
    pub survey_id: String,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            leaderboard_id: DEFAULT_LEADERBOARD_ID.to_string(),
            mystery_box_id: DEFAULT_MYSTERY_BOX_ID.to_string(),
            survey_id: DEFAULT_SURVEY_ID.to_string(),
            poll_interval: Duration::from_secs(DEFAULT_POLL_SECS),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (env, test map, ...)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let text = |key: &str, fallback: String| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(fallback)
        };

        Ok(Self {
            base_url: text("GAMELAYER_BASE_URL", defaults.base_url)
                .trim_end_matches('/')
                .to_string(),
            leaderboard_id: text("GAMELAYER_LEADERBOARD_ID", defaults.leaderboard_id),
            mystery_box_id: text("GAMELAYER_MYSTERY_BOX_ID", defaults.mystery_box_id),
            survey_id: text("GAMELAYER_SURVEY_ID", defaults.survey_id),
            poll_interval: seconds(&lookup, "GAMELAYER_POLL_SECS", defaults.poll_interval)?,
            request_timeout: seconds(&lookup, "GAMELAYER_TIMEOUT_SECS", defaults.request_timeout)?,
        })
    }
}

fn seconds<F>(lookup: &F, key: &str, fallback: Duration) -> Result<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(fallback),
        Some(raw) => {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|_| Error::ConfigError(format!("{} must be a whole number of seconds, got {:?}", key, raw)))?;
            if secs == 0 {
                return Err(Error::ConfigError(format!("{} must be greater than zero", key)));
            }
            Ok(Duration::from_secs(secs))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = ClientConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.leaderboard_id, "1-test-leaderboard");
        assert_eq!(config.poll_interval, Duration::from_secs(10));
    }

    #[test]
    fn test_overrides() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("GAMELAYER_BASE_URL", "http://localhost:8080/api/v0/"),
            ("GAMELAYER_POLL_SECS", "3"),
            ("GAMELAYER_MYSTERY_BOX_ID", "spring-wheel"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "http://localhost:8080/api/v0");
        assert_eq!(config.poll_interval, Duration::from_secs(3));
        assert_eq!(config.mystery_box_id, "spring-wheel");
    }

    #[test]
    fn test_bad_interval_is_rejected() {
        assert!(ClientConfig::from_lookup(lookup_from(&[("GAMELAYER_POLL_SECS", "soon")])).is_err());
        assert!(ClientConfig::from_lookup(lookup_from(&[("GAMELAYER_POLL_SECS", "0")])).is_err());
    }
}
