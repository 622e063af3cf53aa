//! Character lookup for the Discord bot.

use tracing::{debug, warn};

use crate::db::CodexStorage;
use crate::db::models::PublicCharacter;
use crate::error::CodexError;

/// Canonical form of a Discord identifier for comparison.
///
/// Case, surrounding and repeated whitespace, a leading `@` and the `#0`
/// discriminator carried by migrated usernames are not significant.
pub fn normalize_discord_id(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let lowered = collapsed.trim_start_matches('@').trim_start().to_lowercase();
    match lowered.strip_suffix("#0") {
        Some(base) => base.trim_end().to_string(),
        None => lowered,
    }
}

/// Public characters of every user whose Discord id matches `discord_id`.
/// No match yields an empty list.
pub async fn public_characters_for_discord_id(
    storage: &CodexStorage,
    apikey: &str,
    discord_id: &str,
) -> Result<Vec<PublicCharacter>, CodexError> {
    if !storage.api_key_exists(apikey.trim()).await? {
        warn!("discord lookup with invalid api key");
        return Err(CodexError::InvalidApiKey);
    }

    let wanted = normalize_discord_id(discord_id);
    if wanted.is_empty() {
        return Ok(Vec::new());
    }

    let player_ids: Vec<i64> = storage
        .users_with_discord_id()
        .await?
        .into_iter()
        .filter(|user| {
            user.discord_id
                .as_deref()
                .is_some_and(|stored| normalize_discord_id(stored) == wanted)
        })
        .map(|user| user.id)
        .collect();

    debug!(discord_id = %wanted, matches = player_ids.len(), "discord lookup");
    storage.public_characters_for_players(&player_ids).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_and_whitespace_are_ignored() {
        assert_eq!(normalize_discord_id("  TestUser#1234 "), "testuser#1234");
        assert_eq!(
            normalize_discord_id("Volothamp   Gedarm#1337"),
            "volothamp gedarm#1337"
        );
    }

    #[test]
    fn migrated_usernames_match_without_discriminator() {
        assert_eq!(normalize_discord_id("@Meepo_Fan#0"), "meepo_fan");
        assert_eq!(normalize_discord_id("meepo_fan"), "meepo_fan");
        assert_eq!(normalize_discord_id("meepo#10"), "meepo#10");
        assert_eq!(normalize_discord_id("Meepo #0"), "meepo");
    }

    #[test]
    fn mention_prefix_with_space_is_dropped() {
        assert_eq!(normalize_discord_id("@ Volo"), "volo");
        assert_eq!(normalize_discord_id("@@  Volo  "), "volo");
    }

    #[test]
    fn case_folding_covers_non_ascii() {
        assert_eq!(normalize_discord_id("ÉLODIE"), normalize_discord_id("élodie"));
    }

    #[test]
    fn blank_input_normalizes_to_empty() {
        assert_eq!(normalize_discord_id("   "), "");
    }
}
