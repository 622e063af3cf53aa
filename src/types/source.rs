use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CodexError;

pub const LEVEL5_EVENT: &str = "Level 5 item selection";
pub const TRADE_EVENT: &str = "Item trade (non-MSC)";
pub const DM_REWARD_EVENT: &str = "Manual DM reward";

/// Table an item's source reference points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum SourceKind {
    Game,
    ManualCreation,
    ManualEdit,
}

/// Resolved polymorphic source of an item.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemSource {
    pub kind: SourceKind,
    pub id: i64,
    /// Name of the referenced event, if the row still exists.
    pub name: Option<String>,
}

/// How the requester says an item was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOrigin {
    Game(Uuid),
    Level5,
    Trade,
    DmReward,
    Custom(String),
}

impl ItemOrigin {
    /// Parse the `item_source_type` / `item_source` pair of a create request.
    pub fn parse(kind: Option<&str>, source: Option<&str>) -> Result<Self, CodexError> {
        let bad_origin = || CodexError::bad_request("Error with item origin event");
        match kind.map(str::trim) {
            Some("game") => source
                .and_then(|s| Uuid::parse_str(s.trim()).ok())
                .map(ItemOrigin::Game)
                .ok_or_else(bad_origin),
            Some("level5") => Ok(ItemOrigin::Level5),
            Some("trade") => Ok(ItemOrigin::Trade),
            Some("dmreward") => Ok(ItemOrigin::DmReward),
            _ => source
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| ItemOrigin::Custom(s.to_string()))
                .ok_or_else(bad_origin),
        }
    }

    /// Name of the manual creation event recorded for this origin.
    pub fn manual_event_name(&self) -> Option<&str> {
        match self {
            ItemOrigin::Game(_) => None,
            ItemOrigin::Level5 => Some(LEVEL5_EVENT),
            ItemOrigin::Trade => Some(TRADE_EVENT),
            ItemOrigin::DmReward => Some(DM_REWARD_EVENT),
            ItemOrigin::Custom(name) => Some(name.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_tags_map_to_named_events() {
        let origin = ItemOrigin::parse(Some("level5"), None).unwrap();
        assert_eq!(origin.manual_event_name(), Some(LEVEL5_EVENT));

        let origin = ItemOrigin::parse(Some("trade"), Some("ignored")).unwrap();
        assert_eq!(origin.manual_event_name(), Some(TRADE_EVENT));

        let origin = ItemOrigin::parse(Some("dmreward"), None).unwrap();
        assert_eq!(origin.manual_event_name(), Some(DM_REWARD_EVENT));
    }

    #[test]
    fn game_origin_needs_a_uuid() {
        let id = Uuid::new_v4();
        let origin = ItemOrigin::parse(Some("game"), Some(&id.to_string())).unwrap();
        assert_eq!(origin, ItemOrigin::Game(id));

        assert!(ItemOrigin::parse(Some("game"), Some("not-a-uuid")).is_err());
        assert!(ItemOrigin::parse(Some("game"), None).is_err());
    }

    #[test]
    fn other_origins_use_the_source_text() {
        let origin = ItemOrigin::parse(Some("other"), Some("  Found in a tomb ")).unwrap();
        assert_eq!(origin, ItemOrigin::Custom("Found in a tomb".into()));

        assert!(ItemOrigin::parse(None, None).is_err());
        assert!(ItemOrigin::parse(Some("other"), Some("   ")).is_err());
    }
}
