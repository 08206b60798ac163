//! Player directory operations with validation

use super::GameLayerApi;
use gamelayer_core::{avatar_url, Error, NewPlayer, PlayerRecord, Result, AVATAR_OPTION_COUNT};
use tracing::info;

/// Create a player after checking the form fields
///
/// # Arguments
/// * `id` - Player id chosen by the operator (must not be blank)
/// * `name` - Display name (must not be blank)
/// * `avatar_seed` - Optional generated avatar, 1 to 30
pub async fn register_player<A: GameLayerApi>(
    api: &A,
    id: &str,
    name: &str,
    avatar_seed: Option<u32>,
) -> Result<PlayerRecord> {
    let id = id.trim();
    let name = name.trim();
    if id.is_empty() {
        return Err(Error::InvalidData("Player ID is required".to_string()));
    }
    if name.is_empty() {
        return Err(Error::InvalidData("Player name is required".to_string()));
    }

    let img_url = match avatar_seed {
        Some(seed) if (1..=AVATAR_OPTION_COUNT).contains(&seed) => Some(avatar_url(seed)),
        Some(seed) => {
            return Err(Error::InvalidData(format!(
                "Avatar must be between 1 and {} (got {})",
                AVATAR_OPTION_COUNT, seed
            )))
        }
        None => None,
    };

    let player = NewPlayer {
        id: id.to_string(),
        name: name.to_string(),
        img_url,
    };

    info!("Creating player {} ({})", player.id, player.name);
    api.create_player(&player).await
}

/// Case-insensitive lookup by id or name in the account's player list
pub async fn find_player<A: GameLayerApi>(api: &A, query: &str) -> Result<Option<PlayerRecord>> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Ok(None);
    }
    let players = api.list_players().await?;
    Ok(players
        .into_iter()
        .find(|p| p.id.to_lowercase() == needle || p.name.to_lowercase() == needle))
}
