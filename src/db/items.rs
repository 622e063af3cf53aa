//! Magic item and consumable rows.

use crate::db::models::{DbConsumable, DbMagicItem};
use crate::db::sqlite::{CodexStorage, decode_uuid};
use crate::error::CodexError;
use crate::types::{ConsumableFields, ItemSource, MagicItemFields, SourceKind};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};
use url::Url;
use uuid::Uuid;

const MAGIC_ITEM_SELECT: &str = r#"
SELECT m.id, m.uuid, m.character_id, c.uuid AS character_uuid, c.player_id,
       m.name, m.description, m.flavour, m.rp_name, m.minor_properties, m.url,
       m.rarity, m.attunement, m.equipped, m.market,
       m.source_type, m.source_id,
       CASE m.source_type
           WHEN 'game' THEN (SELECT g.name FROM games g WHERE g.id = m.source_id)
           WHEN 'manualcreation' THEN (SELECT mc.name FROM manual_creations mc WHERE mc.id = m.source_id)
           WHEN 'manualedit' THEN (SELECT me.name FROM manual_edits me WHERE me.id = m.source_id)
       END AS source_name
FROM magic_items m
JOIN characters c ON c.id = m.character_id
"#;

const CONSUMABLE_SELECT: &str = r#"
SELECT i.id, i.uuid, i.character_id, c.uuid AS character_uuid, c.player_id,
       i.name, i.consumable_type, i.equipped, i.charges, i.rarity, i.description,
       i.source_type, i.source_id,
       CASE i.source_type
           WHEN 'game' THEN (SELECT g.name FROM games g WHERE g.id = i.source_id)
           WHEN 'manualcreation' THEN (SELECT mc.name FROM manual_creations mc WHERE mc.id = i.source_id)
           WHEN 'manualedit' THEN (SELECT me.name FROM manual_edits me WHERE me.id = i.source_id)
       END AS source_name
FROM consumables i
JOIN characters c ON c.id = i.character_id
"#;

impl CodexStorage {
    pub async fn magic_item_by_uuid(&self, uuid: &Uuid) -> Result<Option<DbMagicItem>, CodexError> {
        let sql = format!(
            "{MAGIC_ITEM_SELECT} WHERE m.uuid = ?"
        );
        let row = sqlx::query(&sql)
            .bind(uuid.to_string())
            .fetch_optional(self.pool())
            .await?;
        row.map(row_to_magic_item).transpose()
    }

    /// All magic items of one character, ordered by name.
    pub async fn magic_items_for_character(
        &self,
        character_uuid: &Uuid,
    ) -> Result<Vec<DbMagicItem>, CodexError> {
        let sql = format!(
            "{MAGIC_ITEM_SELECT} WHERE c.uuid = ? ORDER BY m.name COLLATE NOCASE, m.id"
        );
        let rows = sqlx::query(&sql)
            .bind(character_uuid.to_string())
            .fetch_all(self.pool())
            .await?;
        rows.into_iter().map(row_to_magic_item).collect()
    }

    /// All magic items across a player's characters, ordered by name.
    pub async fn magic_items_for_player(
        &self,
        player_id: i64,
    ) -> Result<Vec<DbMagicItem>, CodexError> {
        let sql = format!(
            "{MAGIC_ITEM_SELECT} WHERE c.player_id = ? ORDER BY m.name COLLATE NOCASE, m.id"
        );
        let rows = sqlx::query(&sql)
            .bind(player_id)
            .fetch_all(self.pool())
            .await?;
        rows.into_iter().map(row_to_magic_item).collect()
    }

    pub async fn delete_magic_item(&self, id: i64) -> Result<(), CodexError> {
        sqlx::query("DELETE FROM magic_items WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    pub async fn consumable_by_uuid(
        &self,
        uuid: &Uuid,
    ) -> Result<Option<DbConsumable>, CodexError> {
        let sql = format!(
            "{CONSUMABLE_SELECT} WHERE i.uuid = ?"
        );
        let row = sqlx::query(&sql)
            .bind(uuid.to_string())
            .fetch_optional(self.pool())
            .await?;
        row.map(row_to_consumable).transpose()
    }

    pub async fn consumables_for_character(
        &self,
        character_uuid: &Uuid,
    ) -> Result<Vec<DbConsumable>, CodexError> {
        let sql = format!(
            "{CONSUMABLE_SELECT} WHERE c.uuid = ? ORDER BY i.name COLLATE NOCASE, i.id"
        );
        let rows = sqlx::query(&sql)
            .bind(character_uuid.to_string())
            .fetch_all(self.pool())
            .await?;
        rows.into_iter().map(row_to_consumable).collect()
    }

    pub async fn consumables_for_player(
        &self,
        player_id: i64,
    ) -> Result<Vec<DbConsumable>, CodexError> {
        let sql = format!(
            "{CONSUMABLE_SELECT} WHERE c.player_id = ? ORDER BY i.name COLLATE NOCASE, i.id"
        );
        let rows = sqlx::query(&sql)
            .bind(player_id)
            .fetch_all(self.pool())
            .await?;
        rows.into_iter().map(row_to_consumable).collect()
    }

    pub async fn delete_consumable(&self, id: i64) -> Result<(), CodexError> {
        sqlx::query("DELETE FROM consumables WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(())
    }
}

/// Insert a magic item and return its generated uuid.
pub async fn insert_magic_item(
    conn: &mut SqliteConnection,
    character_id: i64,
    fields: &MagicItemFields,
    source: Option<(SourceKind, i64)>,
) -> Result<Uuid, CodexError> {
    let uuid = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO magic_items (
            uuid, name, description, flavour, rp_name, minor_properties, url,
            rarity, attunement, character_id, equipped, market, source_type, source_id
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(uuid.to_string())
    .bind(&fields.name)
    .bind(&fields.description)
    .bind(&fields.flavour)
    .bind(&fields.rp_name)
    .bind(&fields.minor_properties)
    .bind(fields.url.as_ref().map(Url::as_str))
    .bind(fields.rarity)
    .bind(fields.attunement)
    .bind(character_id)
    .bind(fields.equipped)
    .bind(fields.market)
    .bind(source.map(|(kind, _)| kind))
    .bind(source.map(|(_, id)| id))
    .execute(&mut *conn)
    .await?;
    Ok(uuid)
}

/// Overwrite the editable fields of a magic item.
pub async fn update_magic_item(
    conn: &mut SqliteConnection,
    id: i64,
    fields: &MagicItemFields,
) -> Result<(), CodexError> {
    sqlx::query(
        r#"UPDATE magic_items SET
            name = ?,
            description = ?,
            flavour = ?,
            rp_name = ?,
            minor_properties = ?,
            url = ?,
            rarity = ?,
            attunement = ?,
            equipped = ?,
            market = ?
          WHERE id = ?"#,
    )
    .bind(&fields.name)
    .bind(&fields.description)
    .bind(&fields.flavour)
    .bind(&fields.rp_name)
    .bind(&fields.minor_properties)
    .bind(fields.url.as_ref().map(Url::as_str))
    .bind(fields.rarity)
    .bind(fields.attunement)
    .bind(fields.equipped)
    .bind(fields.market)
    .bind(id)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn insert_consumable(
    conn: &mut SqliteConnection,
    character_id: i64,
    fields: &ConsumableFields,
    source: Option<(SourceKind, i64)>,
) -> Result<Uuid, CodexError> {
    let uuid = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO consumables (
            uuid, name, character_id, consumable_type, equipped, charges,
            rarity, description, source_type, source_id
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(uuid.to_string())
    .bind(&fields.name)
    .bind(character_id)
    .bind(fields.kind)
    .bind(fields.equipped)
    .bind(fields.charges)
    .bind(fields.rarity)
    .bind(&fields.description)
    .bind(source.map(|(kind, _)| kind))
    .bind(source.map(|(_, id)| id))
    .execute(&mut *conn)
    .await?;
    Ok(uuid)
}

pub async fn update_consumable(
    conn: &mut SqliteConnection,
    id: i64,
    fields: &ConsumableFields,
) -> Result<(), CodexError> {
    sqlx::query(
        r#"UPDATE consumables SET
            name = ?,
            consumable_type = ?,
            equipped = ?,
            charges = ?,
            rarity = ?,
            description = ?
          WHERE id = ?"#,
    )
    .bind(&fields.name)
    .bind(fields.kind)
    .bind(fields.equipped)
    .bind(fields.charges)
    .bind(fields.rarity)
    .bind(&fields.description)
    .bind(id)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

fn decode_source(row: &SqliteRow) -> Result<Option<ItemSource>, sqlx::Error> {
    let kind: Option<SourceKind> = row.try_get("source_type")?;
    let id: Option<i64> = row.try_get("source_id")?;
    match (kind, id) {
        (Some(kind), Some(id)) => Ok(Some(ItemSource {
            kind,
            id,
            name: row.try_get("source_name")?,
        })),
        _ => Ok(None),
    }
}

fn row_to_magic_item(row: SqliteRow) -> Result<DbMagicItem, CodexError> {
    let url: Option<String> = row.try_get("url")?;
    let url = url
        .as_deref()
        .map(Url::parse)
        .transpose()
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

    Ok(DbMagicItem {
        id: row.try_get("id")?,
        uuid: decode_uuid(&row, "uuid")?,
        character_id: row.try_get("character_id")?,
        character_uuid: decode_uuid(&row, "character_uuid")?,
        player_id: row.try_get("player_id")?,
        fields: MagicItemFields {
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            flavour: row.try_get("flavour")?,
            rp_name: row.try_get("rp_name")?,
            minor_properties: row.try_get("minor_properties")?,
            url,
            rarity: row.try_get("rarity")?,
            attunement: row.try_get("attunement")?,
            equipped: row.try_get("equipped")?,
            market: row.try_get("market")?,
        },
        source: decode_source(&row)?,
    })
}

fn row_to_consumable(row: SqliteRow) -> Result<DbConsumable, CodexError> {
    Ok(DbConsumable {
        id: row.try_get("id")?,
        uuid: decode_uuid(&row, "uuid")?,
        character_id: row.try_get("character_id")?,
        character_uuid: decode_uuid(&row, "character_uuid")?,
        player_id: row.try_get("player_id")?,
        fields: ConsumableFields {
            name: row.try_get("name")?,
            kind: row.try_get("consumable_type")?,
            equipped: row.try_get("equipped")?,
            charges: row.try_get("charges")?,
            rarity: row.try_get("rarity")?,
            description: row.try_get("description")?,
        },
        source: decode_source(&row)?,
    })
}
