use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

use crate::db::items;
use crate::db::{CodexStorage, DbCharacter, DbConsumable, DbMagicItem, DbUser};
use crate::db::events;
use crate::error::CodexError;
use crate::service::{item_source, trade};
use crate::types::ItemOrigin;
use crate::types::payloads::{
    ConsumablePatch, MagicItemPatch, NewConsumable, NewMagicItem, OriginRequest, RawBody,
};

pub const NAME_CHANGED_EVENT: &str = "Item name changed";

const NOT_YOUR_CHARACTER: &str = "This character does not belong to you";
const NOT_YOUR_ITEM: &str = "This item does not belong to you";
const CREATE_FAILED: &str = "Item creation failed";
const UPDATE_INVALID: &str = "Invalid data in item update";

/// Ownership-checked item operations over the store.
#[derive(Clone)]
pub struct Inventory {
    storage: CodexStorage,
}

/// Item uuids arrive as raw path segments; anything unparseable cannot exist.
pub fn parse_item_uuid(raw: &str) -> Result<Uuid, CodexError> {
    Uuid::parse_str(raw.trim()).map_err(|_| CodexError::NotFound("Item not found"))
}

fn ensure_owner(user: &DbUser, player_id: i64) -> Result<(), CodexError> {
    if user.id != player_id {
        return Err(CodexError::Forbidden(NOT_YOUR_ITEM));
    }
    Ok(())
}

/// Decode a body once ownership is settled; any field error becomes `message`.
fn decode_body<T: serde::de::DeserializeOwned>(
    body: RawBody,
    message: &'static str,
) -> Result<T, CodexError> {
    body.decode().map_err(|e| {
        debug!(error = %e, "item payload rejected");
        CodexError::bad_request(message)
    })
}

fn parse_origin(origin: &OriginRequest) -> Result<ItemOrigin, CodexError> {
    ItemOrigin::parse(
        origin.item_source_type.as_deref(),
        origin.item_source.as_deref(),
    )
}

impl Inventory {
    pub fn new(storage: CodexStorage) -> Self {
        Self { storage }
    }

    /// The character named by a create request, provided the requester plays it.
    async fn owned_character(
        &self,
        user: &DbUser,
        character_uuid: Option<&str>,
    ) -> Result<DbCharacter, CodexError> {
        let parsed = character_uuid.and_then(|raw| Uuid::parse_str(raw.trim()).ok());
        let character = match parsed {
            Some(uuid) => self.storage.character_by_uuid(&uuid).await?,
            None => None,
        };
        let character = character.ok_or_else(|| CodexError::bad_request("Invalid character"))?;
        if character.player_id != user.id {
            return Err(CodexError::Forbidden(NOT_YOUR_CHARACTER));
        }
        Ok(character)
    }

    pub async fn magic_item(&self, uuid: &Uuid) -> Result<DbMagicItem, CodexError> {
        self.storage
            .magic_item_by_uuid(uuid)
            .await?
            .ok_or(CodexError::NotFound("Item not found"))
    }

    /// Items of one character when a filter is given, else all of the requester's.
    /// An unparseable filter matches nothing.
    pub async fn list_magic_items(
        &self,
        user: &DbUser,
        character: Option<&str>,
    ) -> Result<Vec<DbMagicItem>, CodexError> {
        match character.filter(|c| !c.is_empty()) {
            Some(raw) => match Uuid::parse_str(raw.trim()) {
                Ok(uuid) => self.storage.magic_items_for_character(&uuid).await,
                Err(_) => Ok(Vec::new()),
            },
            None => self.storage.magic_items_for_player(user.id).await,
        }
    }

    pub async fn create_magic_item(
        &self,
        user: &DbUser,
        body: RawBody,
    ) -> Result<DbMagicItem, CodexError> {
        let character = self
            .owned_character(user, body.str_field("character_uuid"))
            .await?;

        let (fields, origin) = decode_body::<NewMagicItem>(body, CREATE_FAILED)?.into_parts();
        fields.validate().map_err(|e| {
            debug!(error = %e, "magic item rejected");
            CodexError::bad_request(CREATE_FAILED)
        })?;
        let origin = parse_origin(&origin)?;

        let mut tx = self.storage.begin().await?;
        let source = item_source::resolve(&mut *tx, &character, &origin).await?;
        let uuid = items::insert_magic_item(&mut *tx, character.id, &fields, Some(source)).await?;
        tx.commit().await?;

        info!(item = %uuid, character = %character.uuid, "magic item created");
        self.magic_item(&uuid).await
    }

    /// Apply a partial update. Renames are audited and delisting withdraws adverts.
    pub async fn update_magic_item(
        &self,
        user: &DbUser,
        uuid: &Uuid,
        body: RawBody,
    ) -> Result<DbMagicItem, CodexError> {
        let item = self.magic_item(uuid).await?;
        ensure_owner(user, item.player_id)?;

        let patch: MagicItemPatch = decode_body(body, UPDATE_INVALID)?;
        let delisted = patch.market == Some(false);
        let mut fields = item.fields.clone();
        patch.apply(&mut fields);
        fields.validate().map_err(|e| {
            debug!(error = %e, "magic item update rejected");
            CodexError::bad_request(UPDATE_INVALID)
        })?;

        let mut tx = self.storage.begin().await?;
        if delisted {
            trade::remove_adverts_for_item(&mut *tx, &item).await?;
        }
        if fields.name != item.fields.name {
            let details = format!("{} >> {}", item.fields.name, fields.name);
            events::insert_manual_edit(
                &mut *tx,
                item.character_id,
                Some(item.id),
                NAME_CHANGED_EVENT,
                &details,
            )
            .await?;
        }
        items::update_magic_item(&mut *tx, item.id, &fields).await?;
        tx.commit().await?;

        info!(item = %item.uuid, "magic item updated");
        self.magic_item(uuid).await
    }

    pub async fn delete_magic_item(&self, user: &DbUser, uuid: &Uuid) -> Result<(), CodexError> {
        let item = self.magic_item(uuid).await?;
        ensure_owner(user, item.player_id)?;
        self.storage.delete_magic_item(item.id).await?;
        info!(item = %item.uuid, "magic item destroyed");
        Ok(())
    }

    pub async fn consumable(&self, uuid: &Uuid) -> Result<DbConsumable, CodexError> {
        self.storage
            .consumable_by_uuid(uuid)
            .await?
            .ok_or(CodexError::NotFound("Item not found"))
    }

    pub async fn list_consumables(
        &self,
        user: &DbUser,
        character: Option<&str>,
    ) -> Result<Vec<DbConsumable>, CodexError> {
        match character.filter(|c| !c.is_empty()) {
            Some(raw) => match Uuid::parse_str(raw.trim()) {
                Ok(uuid) => self.storage.consumables_for_character(&uuid).await,
                Err(_) => Ok(Vec::new()),
            },
            None => self.storage.consumables_for_player(user.id).await,
        }
    }

    pub async fn create_consumable(
        &self,
        user: &DbUser,
        body: RawBody,
    ) -> Result<DbConsumable, CodexError> {
        let character = self
            .owned_character(user, body.str_field("character_uuid"))
            .await?;

        let (fields, origin) = decode_body::<NewConsumable>(body, CREATE_FAILED)?.into_parts();
        fields.validate().map_err(|e| {
            debug!(error = %e, "consumable rejected");
            CodexError::bad_request(CREATE_FAILED)
        })?;
        let origin = parse_origin(&origin)?;

        let mut tx = self.storage.begin().await?;
        let source = item_source::resolve(&mut *tx, &character, &origin).await?;
        let uuid = items::insert_consumable(&mut *tx, character.id, &fields, Some(source)).await?;
        tx.commit().await?;

        info!(item = %uuid, character = %character.uuid, "consumable created");
        self.consumable(&uuid).await
    }

    pub async fn update_consumable(
        &self,
        user: &DbUser,
        uuid: &Uuid,
        body: RawBody,
    ) -> Result<DbConsumable, CodexError> {
        let item = self.consumable(uuid).await?;
        ensure_owner(user, item.player_id)?;

        let patch: ConsumablePatch = decode_body(body, UPDATE_INVALID)?;
        let mut fields = item.fields.clone();
        patch.apply(&mut fields);
        fields.validate().map_err(|e| {
            debug!(error = %e, "consumable update rejected");
            CodexError::bad_request(UPDATE_INVALID)
        })?;

        let mut tx = self.storage.begin().await?;
        items::update_consumable(&mut *tx, item.id, &fields).await?;
        tx.commit().await?;

        info!(item = %item.uuid, "consumable updated");
        self.consumable(uuid).await
    }

    pub async fn delete_consumable(&self, user: &DbUser, uuid: &Uuid) -> Result<(), CodexError> {
        let item = self.consumable(uuid).await?;
        ensure_owner(user, item.player_id)?;
        self.storage.delete_consumable(item.id).await?;
        info!(item = %item.uuid, "consumable destroyed");
        Ok(())
    }
}
