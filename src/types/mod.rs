//! Wire and domain types shared by the storage, service and handler layers.

pub mod items;
pub mod payloads;
pub mod source;

pub use items::{ConsumableFields, ConsumableType, MagicItemFields, Rarity};
pub use source::{ItemOrigin, ItemSource, SourceKind};
