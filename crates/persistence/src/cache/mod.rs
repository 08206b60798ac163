//! In-memory cache of player names and avatars
//!
//! Filled by the leaderboard poller and never expired: an id that has
//! been resolved once is not fetched again for the life of the session.

use gamelayer_core::PlayerDetails;
use std::collections::HashMap;
use std::sync::RwLock;

/// Thread-safe id -> name/avatar map
#[derive(Default)]
pub struct PlayerDirectoryCache {
    players: RwLock<HashMap<String, PlayerDetails>>,
}

impl PlayerDirectoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, player_id: &str) -> Option<PlayerDetails> {
        let cache = self.players.read().ok()?;
        cache.get(player_id).cloned()
    }

    /// Add new entries in one write, keeping everything already cached
    pub fn merge<I>(&self, entries: I)
    where
        I: IntoIterator<Item = (String, PlayerDetails)>,
    {
        if let Ok(mut cache) = self.players.write() {
            for (id, details) in entries {
                cache.entry(id).or_insert(details);
            }
        }
    }

    /// Ids from `ids` that have no cached entry yet, first occurrence order, no duplicates
    pub fn missing<'a, I>(&self, ids: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let cache = match self.players.read() {
            Ok(cache) => cache,
            Err(_) => return Vec::new(),
        };
        let mut out: Vec<String> = Vec::new();
        for id in ids {
            if !cache.contains_key(id) && !out.iter().any(|seen| seen == id) {
                out.push(id.to_string());
            }
        }
        out
    }

    pub fn len(&self) -> usize {
        self.players.read().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
