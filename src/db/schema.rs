//! SQL DDL for initializing the codex store.
//! SQLite-first; every statement is idempotent so it runs on each start-up.

/// Schema notes:
/// - user-facing rows carry a text `uuid` (hyphenated, lowercase) used in URLs
/// - timestamps are RFC3339 text
/// - booleans are INTEGER 0/1
/// - `source_type`/`source_id` is a polymorphic pointer into `games`,
///   `manual_creations` or `manual_edits`; both NULL when the origin is unknown
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    discord_id TEXT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS auth_tokens (
    key TEXT PRIMARY KEY,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS api_keys (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    value TEXT NOT NULL UNIQUE,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS characters (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    uuid TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    level INTEGER NOT NULL DEFAULT 1,
    player_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    public INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_characters_player ON characters(player_id);

CREATE TABLE IF NOT EXISTS games (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    uuid TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    played_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS game_characters (
    game_id INTEGER NOT NULL REFERENCES games(id) ON DELETE CASCADE,
    character_id INTEGER NOT NULL REFERENCES characters(id) ON DELETE CASCADE,
    PRIMARY KEY (game_id, character_id)
);

CREATE TABLE IF NOT EXISTS manual_creations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    uuid TEXT NOT NULL UNIQUE,
    character_id INTEGER NOT NULL REFERENCES characters(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS magic_items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    uuid TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    description TEXT NULL,
    flavour TEXT NULL,
    rp_name TEXT NULL,
    minor_properties TEXT NULL,
    url TEXT NULL,
    rarity TEXT NOT NULL DEFAULT 'uncommon',
    attunement INTEGER NOT NULL DEFAULT 0,
    character_id INTEGER NOT NULL REFERENCES characters(id) ON DELETE CASCADE,
    equipped INTEGER NOT NULL DEFAULT 0,
    market INTEGER NOT NULL DEFAULT 0,
    source_type TEXT NULL,
    source_id INTEGER NULL
);

CREATE INDEX IF NOT EXISTS item_character_idx ON magic_items(character_id);
CREATE INDEX IF NOT EXISTS item_name_idx ON magic_items(name);
CREATE INDEX IF NOT EXISTS item_rp_name_idx ON magic_items(rp_name);
CREATE INDEX IF NOT EXISTS item_name_upper_idx ON magic_items(UPPER(name));
CREATE INDEX IF NOT EXISTS item_rp_name_upper_idx ON magic_items(UPPER(rp_name));
CREATE INDEX IF NOT EXISTS item_tradable_idx ON magic_items(market);
CREATE INDEX IF NOT EXISTS item_source_idx ON magic_items(source_type, source_id);

CREATE TABLE IF NOT EXISTS manual_edits (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    uuid TEXT NOT NULL UNIQUE,
    character_id INTEGER NOT NULL REFERENCES characters(id) ON DELETE CASCADE,
    item_id INTEGER NULL REFERENCES magic_items(id) ON DELETE SET NULL,
    name TEXT NOT NULL,
    details TEXT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS consumables (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    uuid TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    character_id INTEGER NOT NULL REFERENCES characters(id) ON DELETE CASCADE,
    consumable_type TEXT NOT NULL DEFAULT 'scroll',
    equipped INTEGER NOT NULL DEFAULT 0,
    charges INTEGER NULL,
    rarity TEXT NOT NULL DEFAULT 'uncommon',
    description TEXT NULL,
    source_type TEXT NULL,
    source_id INTEGER NULL
);

CREATE INDEX IF NOT EXISTS consumable_character_idx ON consumables(character_id);
CREATE INDEX IF NOT EXISTS consumable_source_idx ON consumables(source_type, source_id);

CREATE TABLE IF NOT EXISTS adverts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    uuid TEXT NOT NULL UNIQUE,
    item_id INTEGER NOT NULL REFERENCES magic_items(id) ON DELETE CASCADE,
    description TEXT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS advert_item_idx ON adverts(item_id)
"#;
