//! URL building utilities for game log pages

/// Builds the game log URL of one player and season.
///
/// The site files players under the first letter of their id and numbers
/// seasons by the year they end in.
///
/// # Example
/// ```
/// use hoops_rest::acquisition::build_gamelog_url;
///
/// let url = build_gamelog_url("https://example.com/players", "jamesle01", 2012);
/// assert_eq!(url, "https://example.com/players/j/jamesle01/gamelog/2012");
/// ```
pub fn build_gamelog_url(base_url: &str, player_id: &str, season: i32) -> String {
    let base_url = base_url.trim_end_matches('/');
    let letter = player_id
        .chars()
        .next()
        .map(|c| c.to_ascii_lowercase().to_string())
        .unwrap_or_default();
    format!("{base_url}/{letter}/{player_id}/gamelog/{season}")
}

/// All season URLs of a player, oldest first.
pub fn season_urls(base_url: &str, player_id: &str, start: i32, end: i32) -> Vec<(i32, String)> {
    (start..=end)
        .map(|season| (season, build_gamelog_url(base_url, player_id, season)))
        .collect()
}
