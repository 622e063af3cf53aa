//! Trading-post upkeep.

use sqlx::SqliteConnection;
use tracing::info;

use crate::db::DbMagicItem;
use crate::db::events;
use crate::error::CodexError;

/// Withdraw every trading-post advert for an item that left the market.
pub async fn remove_adverts_for_item(
    conn: &mut SqliteConnection,
    item: &DbMagicItem,
) -> Result<u64, CodexError> {
    let removed = events::delete_adverts_for_item(conn, item.id).await?;
    if removed > 0 {
        info!(item = %item.uuid, removed, "removed trading post adverts");
    }
    Ok(removed)
}
