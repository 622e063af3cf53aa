use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::error::CodexError;
use crate::middleware::{CurrentUser, Payload};
use crate::router::CodexState;
use crate::service::inventory::parse_item_uuid;
use crate::types::payloads::{ItemListQuery, MagicItemView, MessageBody};

/// GET /api/data/magicitems
pub async fn list_magic_items(
    State(state): State<CodexState>,
    user: CurrentUser,
    Query(query): Query<ItemListQuery>,
) -> Result<Json<Vec<MagicItemView>>, CodexError> {
    let user = user.require()?;
    let items = state
        .inventory
        .list_magic_items(&user, query.character.as_deref())
        .await?;
    Ok(Json(items.into_iter().map(MagicItemView::from).collect()))
}

/// POST /api/data/magicitems
pub async fn create_magic_item(
    State(state): State<CodexState>,
    user: CurrentUser,
    Payload(body): Payload,
) -> Result<(StatusCode, Json<MagicItemView>), CodexError> {
    let user = user.require()?;
    let item = state.inventory.create_magic_item(&user, body).await?;
    Ok((StatusCode::CREATED, Json(item.into())))
}

/// GET /api/data/magicitems/{uuid}; readable without logging in.
pub async fn retrieve_magic_item(
    State(state): State<CodexState>,
    Path(uuid): Path<String>,
) -> Result<Json<MagicItemView>, CodexError> {
    let uuid = parse_item_uuid(&uuid)?;
    let item = state.inventory.magic_item(&uuid).await?;
    Ok(Json(item.into()))
}

/// PATCH /api/data/magicitems/{uuid}
pub async fn update_magic_item(
    State(state): State<CodexState>,
    user: CurrentUser,
    Path(uuid): Path<String>,
    Payload(body): Payload,
) -> Result<Json<MagicItemView>, CodexError> {
    let user = user.require()?;
    let uuid = parse_item_uuid(&uuid)?;
    let item = state.inventory.update_magic_item(&user, &uuid, body).await?;
    Ok(Json(item.into()))
}

/// DELETE /api/data/magicitems/{uuid}
pub async fn destroy_magic_item(
    State(state): State<CodexState>,
    user: CurrentUser,
    Path(uuid): Path<String>,
) -> Result<Json<MessageBody>, CodexError> {
    let user = user.require()?;
    let uuid = parse_item_uuid(&uuid)?;
    state.inventory.delete_magic_item(&user, &uuid).await?;
    Ok(Json(MessageBody::new("Item destroyed")))
}
