use crate::db::models::{DbCharacter, DbGame, DbUser, PublicCharacter};
use crate::db::schema::SQLITE_INIT;
use crate::error::CodexError;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, QueryBuilder, Row, Sqlite, Transaction};
use uuid::Uuid;

pub type SqlitePool = Pool<Sqlite>;

#[derive(Clone)]
pub struct CodexStorage {
    pool: SqlitePool,
}

impl CodexStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), CodexError> {
        // sqlx::query runs one statement at a time
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>, CodexError> {
        Ok(self.pool.begin().await?)
    }

    pub async fn ping(&self) -> Result<(), CodexError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn create_user(
        &self,
        username: &str,
        discord_id: Option<&str>,
    ) -> Result<DbUser, CodexError> {
        let rec: (i64,) = sqlx::query_as(
            "INSERT INTO users (username, discord_id, created_at) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(username)
        .bind(discord_id)
        .bind(Utc::now().to_rfc3339())
        .fetch_one(&self.pool)
        .await?;
        Ok(DbUser {
            id: rec.0,
            username: username.to_string(),
            discord_id: discord_id.map(str::to_string),
        })
    }

    pub async fn set_discord_id(&self, user_id: i64, discord_id: &str) -> Result<(), CodexError> {
        sqlx::query("UPDATE users SET discord_id = ? WHERE id = ?")
            .bind(discord_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Issue a fresh bearer token for the user and return it.
    pub async fn issue_token(&self, user_id: i64) -> Result<String, CodexError> {
        let key = Uuid::new_v4().simple().to_string();
        sqlx::query("INSERT INTO auth_tokens (key, user_id, created_at) VALUES (?, ?, ?)")
            .bind(&key)
            .bind(user_id)
            .bind(Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await?;
        Ok(key)
    }

    pub async fn user_for_token(&self, token: &str) -> Result<Option<DbUser>, CodexError> {
        let row = sqlx::query(
            r#"SELECT u.id, u.username, u.discord_id
               FROM auth_tokens t JOIN users u ON u.id = t.user_id
               WHERE t.key = ?"#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Self::row_to_user).transpose()
    }

    /// Register a Discord bot API key and return its value.
    pub async fn create_api_key(&self, name: &str) -> Result<String, CodexError> {
        let value = Uuid::new_v4().simple().to_string();
        sqlx::query("INSERT INTO api_keys (name, value, created_at) VALUES (?, ?, ?)")
            .bind(name)
            .bind(&value)
            .bind(Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await?;
        Ok(value)
    }

    pub async fn api_key_exists(&self, value: &str) -> Result<bool, CodexError> {
        let rec: Option<(i64,)> = sqlx::query_as("SELECT id FROM api_keys WHERE value = ?")
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;
        Ok(rec.is_some())
    }

    /// Every user with a Discord id on record.
    pub async fn users_with_discord_id(&self) -> Result<Vec<DbUser>, CodexError> {
        let rows = sqlx::query(
            r#"SELECT id, username, discord_id FROM users
               WHERE discord_id IS NOT NULL AND discord_id <> ''
               ORDER BY id"#,
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Self::row_to_user).collect()
    }

    pub async fn create_character(
        &self,
        player_id: i64,
        name: &str,
        level: i64,
        public: bool,
    ) -> Result<DbCharacter, CodexError> {
        let uuid = Uuid::new_v4();
        let rec: (i64,) = sqlx::query_as(
            r#"INSERT INTO characters (uuid, name, level, player_id, public, created_at)
               VALUES (?, ?, ?, ?, ?, ?) RETURNING id"#,
        )
        .bind(uuid.to_string())
        .bind(name)
        .bind(level)
        .bind(player_id)
        .bind(public)
        .bind(Utc::now().to_rfc3339())
        .fetch_one(&self.pool)
        .await?;
        Ok(DbCharacter {
            id: rec.0,
            uuid,
            name: name.to_string(),
            level,
            player_id,
            public,
        })
    }

    pub async fn character_by_uuid(&self, uuid: &Uuid) -> Result<Option<DbCharacter>, CodexError> {
        let row = sqlx::query(
            r#"SELECT id, uuid, name, level, player_id, public
               FROM characters WHERE uuid = ?"#,
        )
        .bind(uuid.to_string())
        .fetch_optional(&self.pool)
        .await?;
        row.map(Self::row_to_character).transpose()
    }

    /// Public characters of the given players, ordered by name.
    pub async fn public_characters_for_players(
        &self,
        player_ids: &[i64],
    ) -> Result<Vec<PublicCharacter>, CodexError> {
        if player_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb = QueryBuilder::<Sqlite>::new(
            r#"SELECT c.uuid, c.name, c.level, u.username
               FROM characters c JOIN users u ON u.id = c.player_id
               WHERE c.public = 1 AND c.player_id IN ("#,
        );
        let mut ids = qb.separated(", ");
        for id in player_ids {
            ids.push_bind(*id);
        }
        qb.push(") ORDER BY c.name COLLATE NOCASE, c.id");

        let rows = qb.build().fetch_all(&self.pool).await?;
        rows.into_iter()
            .map(|row| -> Result<PublicCharacter, CodexError> {
                Ok(PublicCharacter {
                    uuid: decode_uuid(&row, "uuid")?,
                    name: row.try_get("name")?,
                    level: row.try_get("level")?,
                    player: row.try_get("username")?,
                })
            })
            .collect()
    }

    pub async fn create_game(
        &self,
        name: &str,
        played_at: DateTime<Utc>,
    ) -> Result<DbGame, CodexError> {
        let uuid = Uuid::new_v4();
        let rec: (i64,) = sqlx::query_as(
            "INSERT INTO games (uuid, name, played_at) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(uuid.to_string())
        .bind(name)
        .bind(played_at.to_rfc3339())
        .fetch_one(&self.pool)
        .await?;
        Ok(DbGame {
            id: rec.0,
            uuid,
            name: name.to_string(),
            played_at,
        })
    }

    pub async fn add_game_character(
        &self,
        game_id: i64,
        character_id: i64,
    ) -> Result<(), CodexError> {
        sqlx::query(
            "INSERT OR IGNORE INTO game_characters (game_id, character_id) VALUES (?, ?)",
        )
        .bind(game_id)
        .bind(character_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    fn row_to_user(row: SqliteRow) -> Result<DbUser, CodexError> {
        Ok(DbUser {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            discord_id: row.try_get("discord_id")?,
        })
    }

    fn row_to_character(row: SqliteRow) -> Result<DbCharacter, CodexError> {
        Ok(DbCharacter {
            id: row.try_get("id")?,
            uuid: decode_uuid(&row, "uuid")?,
            name: row.try_get("name")?,
            level: row.try_get("level")?,
            player_id: row.try_get("player_id")?,
            public: row.try_get("public")?,
        })
    }
}

pub(crate) fn decode_uuid(row: &SqliteRow, column: &str) -> Result<Uuid, sqlx::Error> {
    let raw: String = row.try_get(column)?;
    Uuid::parse_str(&raw).map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

pub(crate) fn decode_time(row: &SqliteRow, column: &str) -> Result<DateTime<Utc>, sqlx::Error> {
    let raw: String = row.try_get(column)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))
}
