pub mod consumables;
pub mod discord;
pub mod health;
pub mod magic_items;
