//! Request bodies and response views for the HTTP layer.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use url::Url;
use uuid::Uuid;

use crate::db::{DbConsumable, DbMagicItem};
use crate::types::{ConsumableFields, ConsumableType, ItemSource, MagicItemFields, Rarity, SourceKind};

/// A request body whose fields have not been typed yet.
///
/// Form bodies arrive with every value as a string, so the item payloads below
/// read booleans and counts from either representation.
#[derive(Debug, Clone, Default)]
pub struct RawBody(Map<String, Value>);

impl RawBody {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn decode<T: DeserializeOwned>(self) -> Result<T, serde_json::Error> {
        serde_json::from_value(Value::Object(self.0))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose<T> {
    Typed(T),
    Text(String),
}

fn flag<'de, D>(de: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Loose::<bool>::deserialize(de)? {
        Loose::Typed(value) => Ok(value),
        Loose::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "on" | "1" => Ok(true),
            "false" | "off" | "0" => Ok(false),
            other => Err(D::Error::custom(format!("invalid boolean `{other}`"))),
        },
    }
}

fn optional_flag<'de, D>(de: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    flag(de).map(Some)
}

fn count<'de, D>(de: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Loose<i64>>::deserialize(de)? {
        None => Ok(None),
        Some(Loose::Typed(value)) => i32::try_from(value)
            .map(Some)
            .map_err(|_| D::Error::custom(format!("count `{value}` out of range"))),
        Some(Loose::Text(text)) => text
            .trim()
            .parse::<i32>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid count `{text}`"))),
    }
}

fn nullable_count<'de, D>(de: D) -> Result<Option<Option<i32>>, D::Error>
where
    D: Deserializer<'de>,
{
    count(de).map(Some)
}

/// Distinguishes an explicit `null` (clear the field) from an absent key.
fn nullable<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

/// A key that may be omitted but never set to `null`.
fn present<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(de).map(Some)
}

/// How the item was obtained, as sent by the client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OriginRequest {
    pub item_source_type: Option<String>,
    pub item_source: Option<String>,
}

/// Fields of a new magic item. The owning character is resolved separately.
#[derive(Debug, Clone, Deserialize)]
pub struct NewMagicItem {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub flavour: Option<String>,
    #[serde(default)]
    pub rp_name: Option<String>,
    #[serde(default)]
    pub minor_properties: Option<String>,
    #[serde(default)]
    pub url: Option<Url>,
    #[serde(default)]
    pub rarity: Rarity,
    #[serde(default, deserialize_with = "flag")]
    pub attunement: bool,
    #[serde(default, deserialize_with = "flag")]
    pub equipped: bool,
    #[serde(default, deserialize_with = "flag")]
    pub market: bool,
    #[serde(default)]
    pub item_source_type: Option<String>,
    #[serde(default)]
    pub item_source: Option<String>,
}

impl NewMagicItem {
    pub fn into_parts(self) -> (MagicItemFields, OriginRequest) {
        let fields = MagicItemFields {
            name: self.name,
            description: self.description,
            flavour: self.flavour,
            rp_name: self.rp_name,
            minor_properties: self.minor_properties,
            url: self.url,
            rarity: self.rarity,
            attunement: self.attunement,
            equipped: self.equipped,
            market: self.market,
        };
        let origin = OriginRequest {
            item_source_type: self.item_source_type,
            item_source: self.item_source,
        };
        (fields, origin)
    }
}

/// Partial update of a magic item. Ownership and source are not editable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MagicItemPatch {
    #[serde(default, deserialize_with = "present")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub flavour: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub rp_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub minor_properties: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub url: Option<Option<Url>>,
    #[serde(default, deserialize_with = "present")]
    pub rarity: Option<Rarity>,
    #[serde(default, deserialize_with = "optional_flag")]
    pub attunement: Option<bool>,
    #[serde(default, deserialize_with = "optional_flag")]
    pub equipped: Option<bool>,
    #[serde(default, deserialize_with = "optional_flag")]
    pub market: Option<bool>,
}

impl MagicItemPatch {
    pub fn apply(self, fields: &mut MagicItemFields) {
        if let Some(name) = self.name {
            fields.name = name;
        }
        if let Some(description) = self.description {
            fields.description = description;
        }
        if let Some(flavour) = self.flavour {
            fields.flavour = flavour;
        }
        if let Some(rp_name) = self.rp_name {
            fields.rp_name = rp_name;
        }
        if let Some(minor_properties) = self.minor_properties {
            fields.minor_properties = minor_properties;
        }
        if let Some(url) = self.url {
            fields.url = url;
        }
        if let Some(rarity) = self.rarity {
            fields.rarity = rarity;
        }
        if let Some(attunement) = self.attunement {
            fields.attunement = attunement;
        }
        if let Some(equipped) = self.equipped {
            fields.equipped = equipped;
        }
        if let Some(market) = self.market {
            fields.market = market;
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewConsumable {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: ConsumableType,
    #[serde(default, deserialize_with = "flag")]
    pub equipped: bool,
    #[serde(default, deserialize_with = "count")]
    pub charges: Option<i32>,
    #[serde(default)]
    pub rarity: Rarity,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub item_source_type: Option<String>,
    #[serde(default)]
    pub item_source: Option<String>,
}

impl NewConsumable {
    pub fn into_parts(self) -> (ConsumableFields, OriginRequest) {
        let fields = ConsumableFields {
            name: self.name,
            kind: self.kind,
            equipped: self.equipped,
            charges: self.charges,
            rarity: self.rarity,
            description: self.description,
        };
        let origin = OriginRequest {
            item_source_type: self.item_source_type,
            item_source: self.item_source,
        };
        (fields, origin)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConsumablePatch {
    #[serde(default, deserialize_with = "present")]
    pub name: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "present")]
    pub kind: Option<ConsumableType>,
    #[serde(default, deserialize_with = "optional_flag")]
    pub equipped: Option<bool>,
    #[serde(default, deserialize_with = "nullable_count")]
    pub charges: Option<Option<i32>>,
    #[serde(default, deserialize_with = "present")]
    pub rarity: Option<Rarity>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
}

impl ConsumablePatch {
    pub fn apply(self, fields: &mut ConsumableFields) {
        if let Some(name) = self.name {
            fields.name = name;
        }
        if let Some(kind) = self.kind {
            fields.kind = kind;
        }
        if let Some(equipped) = self.equipped {
            fields.equipped = equipped;
        }
        if let Some(charges) = self.charges {
            fields.charges = charges;
        }
        if let Some(rarity) = self.rarity {
            fields.rarity = rarity;
        }
        if let Some(description) = self.description {
            fields.description = description;
        }
    }
}

/// `?character=<uuid>` filter for list endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemListQuery {
    pub character: Option<String>,
}

/// Missing fields read as blank: no key is rejected, no id matches nothing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiscordLookup {
    #[serde(default)]
    pub apikey: String,
    #[serde(default)]
    pub discord_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceView {
    #[serde(rename = "type")]
    pub kind: SourceKind,
    pub name: Option<String>,
}

impl From<ItemSource> for SourceView {
    fn from(source: ItemSource) -> Self {
        Self {
            kind: source.kind,
            name: source.name,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MagicItemView {
    pub uuid: Uuid,
    pub character_uuid: Uuid,
    #[serde(flatten)]
    pub fields: MagicItemFields,
    pub source: Option<SourceView>,
    pub display: String,
}

impl From<DbMagicItem> for MagicItemView {
    fn from(item: DbMagicItem) -> Self {
        Self {
            uuid: item.uuid,
            character_uuid: item.character_uuid,
            display: item.fields.display(),
            fields: item.fields,
            source: item.source.map(Into::into),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConsumableView {
    pub uuid: Uuid,
    pub character_uuid: Uuid,
    #[serde(flatten)]
    pub fields: ConsumableFields,
    pub source: Option<SourceView>,
    pub display: String,
}

impl From<DbConsumable> for ConsumableView {
    fn from(item: DbConsumable) -> Self {
        Self {
            uuid: item.uuid,
            character_uuid: item.character_uuid,
            display: item.fields.display(),
            fields: item.fields,
            source: item.source.map(Into::into),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
