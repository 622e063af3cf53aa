use serde::{Deserialize, Serialize};
use url::Url;
use validator::Validate;

/// Item classifications.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    #[default]
    Uncommon,
    Rare,
    VeryRare,
    Legendary,
}

impl Rarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
            Rarity::VeryRare => "veryrare",
            Rarity::Legendary => "legendary",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ConsumableType {
    #[default]
    Scroll,
    Potion,
    Ammo,
    Gear,
    Other,
}

/// Editable fields of a permanent magic item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct MagicItemFields {
    #[validate(length(min = 1, max = 256))]
    pub name: String,
    pub description: Option<String>,
    pub flavour: Option<String>,
    pub rp_name: Option<String>,
    pub minor_properties: Option<String>,
    pub url: Option<Url>,
    pub rarity: Rarity,
    pub attunement: bool,
    pub equipped: bool,
    pub market: bool,
}

impl MagicItemFields {
    /// `"<roleplay name or name> (<rarity>)"`
    pub fn display(&self) -> String {
        let name = self
            .rp_name
            .as_deref()
            .filter(|rp| !rp.is_empty())
            .unwrap_or(&self.name);
        format!("{} ({})", name, self.rarity.as_str())
    }
}

/// Editable fields of a depletable item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct ConsumableFields {
    #[validate(length(min = 1, max = 256))]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ConsumableType,
    pub equipped: bool,
    #[validate(range(min = 0))]
    pub charges: Option<i32>,
    pub rarity: Rarity,
    pub description: Option<String>,
}

impl ConsumableFields {
    pub fn display(&self) -> String {
        match self.charges {
            Some(charges) if charges != 0 => format!("{} [{}]", self.name, charges),
            _ => self.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rarity_tags_match_stored_values() {
        let parsed: Rarity = serde_json::from_str(r#""veryrare""#).unwrap();
        assert_eq!(parsed, Rarity::VeryRare);
        assert_eq!(serde_json::to_string(&parsed).unwrap(), r#""veryrare""#);
        assert!(serde_json::from_str::<Rarity>(r#""mythic""#).is_err());
    }

    #[test]
    fn magic_item_display_prefers_roleplay_name() {
        let mut fields = MagicItemFields {
            name: "Cloak of Protection".into(),
            rarity: Rarity::Uncommon,
            ..Default::default()
        };
        assert_eq!(fields.display(), "Cloak of Protection (uncommon)");

        fields.rp_name = Some("Mantle of the Moon".into());
        assert_eq!(fields.display(), "Mantle of the Moon (uncommon)");
    }

    #[test]
    fn consumable_display_shows_charges() {
        let mut fields = ConsumableFields {
            name: "Wand of Magic Missiles".into(),
            charges: Some(7),
            ..Default::default()
        };
        assert_eq!(fields.display(), "Wand of Magic Missiles [7]");

        fields.charges = Some(0);
        assert_eq!(fields.display(), "Wand of Magic Missiles");
    }

    #[test]
    fn validation_rejects_empty_names_and_negative_charges() {
        let item = MagicItemFields::default();
        assert!(item.validate().is_err());

        let potion = ConsumableFields {
            name: "Potion of Healing".into(),
            charges: Some(-1),
            ..Default::default()
        };
        assert!(potion.validate().is_err());
    }
}
