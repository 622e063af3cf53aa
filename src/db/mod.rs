//! Database module: schema, row models and queries for persistent storage.
//!
//! Layout:
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `models.rs`: Rust structs mirroring DB rows
//! - `sqlite.rs`: pool wrapper plus users, tokens, API keys, characters, games
//! - `items.rs`: magic items and consumables
//! - `events.rs`: source events, audit records, trading-post adverts

pub mod events;
pub mod items;
pub mod models;
pub mod schema;
pub mod sqlite;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::info;

pub use models::{DbAdvert, DbCharacter, DbConsumable, DbMagicItem, DbManualEdit, DbUser};
pub use schema::SQLITE_INIT;
pub use sqlite::{CodexStorage, SqlitePool};

use crate::error::CodexError;

/// Open (creating if missing) the SQLite database and apply the schema.
pub async fn connect(database_url: &str) -> Result<CodexStorage, CodexError> {
    let connect_opts = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new().connect_with(connect_opts).await?;

    let storage = CodexStorage::new(pool);
    storage.init_schema().await?;
    info!(database_url, "database ready");
    Ok(storage)
}
