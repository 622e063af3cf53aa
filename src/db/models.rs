use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::types::{ConsumableFields, ItemSource, MagicItemFields};

#[derive(Debug, Clone, PartialEq)]
pub struct DbUser {
    pub id: i64,
    pub username: String,
    pub discord_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DbCharacter {
    pub id: i64,
    pub uuid: Uuid,
    pub name: String,
    pub level: i64,
    pub player_id: i64,
    pub public: bool,
}

/// Character summary returned to the Discord bot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicCharacter {
    pub uuid: Uuid,
    pub name: String,
    pub level: i64,
    pub player: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DbGame {
    pub id: i64,
    pub uuid: Uuid,
    pub name: String,
    pub played_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DbManualEdit {
    pub id: i64,
    pub uuid: Uuid,
    pub character_id: i64,
    pub item_id: Option<i64>,
    pub name: String,
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DbAdvert {
    pub id: i64,
    pub uuid: Uuid,
    pub item_id: i64,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Magic item row joined with its owning character.
#[derive(Debug, Clone, PartialEq)]
pub struct DbMagicItem {
    pub id: i64,
    pub uuid: Uuid,
    pub character_id: i64,
    pub character_uuid: Uuid,
    pub player_id: i64,
    pub fields: MagicItemFields,
    pub source: Option<ItemSource>,
}

/// Consumable row joined with its owning character.
#[derive(Debug, Clone, PartialEq)]
pub struct DbConsumable {
    pub id: i64,
    pub uuid: Uuid,
    pub character_id: i64,
    pub character_uuid: Uuid,
    pub player_id: i64,
    pub fields: ConsumableFields,
    pub source: Option<ItemSource>,
}
