use crate::error::AppError;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: String,
    pub name: String,
}

/// Parses a `{ "<player id>": "<display name>" }` mapping, sorted by id.
pub fn parse_players(json: &str) -> Result<Vec<Player>, AppError> {
    let mapping: BTreeMap<String, String> = serde_json::from_str(json)?;
    mapping
        .into_iter()
        .map(|(id, name)| {
            let id = id.trim().to_string();
            if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(AppError::player_mapping_error(format!(
                    "invalid player id '{id}'"
                )));
            }
            Ok(Player { id, name })
        })
        .collect()
}

pub async fn load_players(path: &Path) -> Result<Vec<Player>, AppError> {
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        AppError::player_mapping_error(format!("cannot read {}: {e}", path.display()))
    })?;
    let players = parse_players(&content)?;
    info!("Loaded {} players from {}", players.len(), path.display());
    Ok(players)
}

/// Keeps only the listed ids; an empty filter keeps everyone.
pub fn filter_players(players: Vec<Player>, only: &[String]) -> Vec<Player> {
    if only.is_empty() {
        return players;
    }
    players
        .into_iter()
        .filter(|p| only.iter().any(|id| id == &p.id))
        .collect()
}
