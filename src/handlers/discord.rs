use axum::{Json, extract::State};

use crate::db::models::PublicCharacter;
use crate::error::CodexError;
use crate::middleware::Payload;
use crate::router::CodexState;
use crate::service::discord;
use crate::types::payloads::DiscordLookup;

/// POST /api/discord/characters -> public characters of the matching Discord user(s).
pub async fn discord_characters_list(
    State(state): State<CodexState>,
    Payload(body): Payload,
) -> Result<Json<Vec<PublicCharacter>>, CodexError> {
    let lookup: DiscordLookup = body
        .decode()
        .map_err(|e| CodexError::BadRequest(e.to_string()))?;
    let characters = discord::public_characters_for_discord_id(
        &state.storage,
        &lookup.apikey,
        &lookup.discord_id,
    )
    .await?;
    Ok(Json(characters))
}
