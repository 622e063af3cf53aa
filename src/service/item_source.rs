use sqlx::SqliteConnection;
use tracing::{debug, warn};

use crate::db::DbCharacter;
use crate::db::events;
use crate::error::CodexError;
use crate::types::{ItemOrigin, SourceKind};

fn bad_origin() -> CodexError {
    CodexError::bad_request("Error with item origin event")
}

/// Turn a requested origin into a stored source event.
///
/// Games must already exist and list the character as a participant. Every
/// other origin records a new manual creation event on the character.
pub async fn resolve(
    conn: &mut SqliteConnection,
    character: &DbCharacter,
    origin: &ItemOrigin,
) -> Result<(SourceKind, i64), CodexError> {
    if let ItemOrigin::Game(game_uuid) = origin {
        let Some(game) = events::game_by_uuid(&mut *conn, game_uuid).await? else {
            debug!(game = %game_uuid, "item origin game not found");
            return Err(bad_origin());
        };
        if !events::game_includes_character(&mut *conn, game.id, character.id).await? {
            warn!(
                game = %game.uuid,
                character = %character.uuid,
                "character not associated with game"
            );
            return Err(bad_origin());
        }
        return Ok((SourceKind::Game, game.id));
    }

    let name = origin.manual_event_name().ok_or_else(bad_origin)?;
    let id = events::insert_manual_creation(&mut *conn, character.id, name).await?;
    Ok((SourceKind::ManualCreation, id))
}
