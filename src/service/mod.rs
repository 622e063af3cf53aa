pub mod discord;
pub mod inventory;
pub mod item_source;
pub mod trade;

pub use inventory::Inventory;
