//! Source events (games, manual creations, manual edits) and trading-post adverts.
//!
//! Writers take a bare connection so callers can compose them inside one
//! transaction with the item write they belong to.

use crate::db::models::{DbAdvert, DbGame, DbManualEdit};
use crate::db::sqlite::{CodexStorage, decode_time, decode_uuid};
use crate::error::CodexError;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};
use uuid::Uuid;

pub async fn game_by_uuid(
    conn: &mut SqliteConnection,
    uuid: &Uuid,
) -> Result<Option<DbGame>, CodexError> {
    let row = sqlx::query("SELECT id, uuid, name, played_at FROM games WHERE uuid = ?")
        .bind(uuid.to_string())
        .fetch_optional(&mut *conn)
        .await?;
    let Some(row) = row else {
        return Ok(None);
    };
    Ok(Some(DbGame {
        id: row.try_get("id")?,
        uuid: decode_uuid(&row, "uuid")?,
        name: row.try_get("name")?,
        played_at: decode_time(&row, "played_at")?,
    }))
}

pub async fn game_includes_character(
    conn: &mut SqliteConnection,
    game_id: i64,
    character_id: i64,
) -> Result<bool, CodexError> {
    let rec: Option<(i64,)> = sqlx::query_as(
        "SELECT game_id FROM game_characters WHERE game_id = ? AND character_id = ?",
    )
    .bind(game_id)
    .bind(character_id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(rec.is_some())
}

/// Insert a manual creation event and return its row id.
pub async fn insert_manual_creation(
    conn: &mut SqliteConnection,
    character_id: i64,
    name: &str,
) -> Result<i64, CodexError> {
    let rec: (i64,) = sqlx::query_as(
        r#"INSERT INTO manual_creations (uuid, character_id, name, created_at)
           VALUES (?, ?, ?, ?) RETURNING id"#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(character_id)
    .bind(name)
    .bind(Utc::now().to_rfc3339())
    .fetch_one(&mut *conn)
    .await?;
    Ok(rec.0)
}

/// Insert a manual edit audit record and return its row id.
pub async fn insert_manual_edit(
    conn: &mut SqliteConnection,
    character_id: i64,
    item_id: Option<i64>,
    name: &str,
    details: &str,
) -> Result<i64, CodexError> {
    let rec: (i64,) = sqlx::query_as(
        r#"INSERT INTO manual_edits (uuid, character_id, item_id, name, details, created_at)
           VALUES (?, ?, ?, ?, ?, ?) RETURNING id"#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(character_id)
    .bind(item_id)
    .bind(name)
    .bind(details)
    .bind(Utc::now().to_rfc3339())
    .fetch_one(&mut *conn)
    .await?;
    Ok(rec.0)
}

/// Remove every trading-post advert for a magic item. Returns rows removed.
pub async fn delete_adverts_for_item(
    conn: &mut SqliteConnection,
    item_id: i64,
) -> Result<u64, CodexError> {
    let res = sqlx::query("DELETE FROM adverts WHERE item_id = ?")
        .bind(item_id)
        .execute(&mut *conn)
        .await?;
    Ok(res.rows_affected())
}

impl CodexStorage {
    pub async fn manual_edits_for_item(
        &self,
        item_id: i64,
    ) -> Result<Vec<DbManualEdit>, CodexError> {
        let rows = sqlx::query(
            r#"SELECT id, uuid, character_id, item_id, name, details, created_at
               FROM manual_edits WHERE item_id = ? ORDER BY id"#,
        )
        .bind(item_id)
        .fetch_all(self.pool())
        .await?;
        rows.into_iter().map(row_to_manual_edit).collect()
    }

    pub async fn create_advert(
        &self,
        item_id: i64,
        description: Option<&str>,
    ) -> Result<DbAdvert, CodexError> {
        let uuid = Uuid::new_v4();
        let created_at = Utc::now();
        let rec: (i64,) = sqlx::query_as(
            r#"INSERT INTO adverts (uuid, item_id, description, created_at)
               VALUES (?, ?, ?, ?) RETURNING id"#,
        )
        .bind(uuid.to_string())
        .bind(item_id)
        .bind(description)
        .bind(created_at.to_rfc3339())
        .fetch_one(self.pool())
        .await?;
        Ok(DbAdvert {
            id: rec.0,
            uuid,
            item_id,
            description: description.map(str::to_string),
            created_at,
        })
    }

    pub async fn adverts_for_item(&self, item_id: i64) -> Result<Vec<DbAdvert>, CodexError> {
        let rows = sqlx::query(
            r#"SELECT id, uuid, item_id, description, created_at
               FROM adverts WHERE item_id = ? ORDER BY id"#,
        )
        .bind(item_id)
        .fetch_all(self.pool())
        .await?;
        rows.into_iter()
            .map(|row| -> Result<DbAdvert, CodexError> {
                Ok(DbAdvert {
                    id: row.try_get("id")?,
                    uuid: decode_uuid(&row, "uuid")?,
                    item_id: row.try_get("item_id")?,
                    description: row.try_get("description")?,
                    created_at: decode_time(&row, "created_at")?,
                })
            })
            .collect()
    }
}

fn row_to_manual_edit(row: SqliteRow) -> Result<DbManualEdit, CodexError> {
    Ok(DbManualEdit {
        id: row.try_get("id")?,
        uuid: decode_uuid(&row, "uuid")?,
        character_id: row.try_get("character_id")?,
        item_id: row.try_get("item_id")?,
        name: row.try_get("name")?,
        details: row.try_get("details")?,
        created_at: decode_time(&row, "created_at")?,
    })
}
