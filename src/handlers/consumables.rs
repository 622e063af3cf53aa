use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::error::CodexError;
use crate::middleware::{CurrentUser, Payload};
use crate::router::CodexState;
use crate::service::inventory::parse_item_uuid;
use crate::types::payloads::{ConsumableView, ItemListQuery, MessageBody};

pub async fn list_consumables(
    State(state): State<CodexState>,
    user: CurrentUser,
    Query(query): Query<ItemListQuery>,
) -> Result<Json<Vec<ConsumableView>>, CodexError> {
    let user = user.require()?;
    let items = state
        .inventory
        .list_consumables(&user, query.character.as_deref())
        .await?;
    Ok(Json(items.into_iter().map(ConsumableView::from).collect()))
}

pub async fn create_consumable(
    State(state): State<CodexState>,
    user: CurrentUser,
    Payload(body): Payload,
) -> Result<(StatusCode, Json<ConsumableView>), CodexError> {
    let user = user.require()?;
    let item = state.inventory.create_consumable(&user, body).await?;
    Ok((StatusCode::CREATED, Json(item.into())))
}

pub async fn retrieve_consumable(
    State(state): State<CodexState>,
    Path(uuid): Path<String>,
) -> Result<Json<ConsumableView>, CodexError> {
    let uuid = parse_item_uuid(&uuid)?;
    let item = state.inventory.consumable(&uuid).await?;
    Ok(Json(item.into()))
}

pub async fn update_consumable(
    State(state): State<CodexState>,
    user: CurrentUser,
    Path(uuid): Path<String>,
    Payload(body): Payload,
) -> Result<Json<ConsumableView>, CodexError> {
    let user = user.require()?;
    let uuid = parse_item_uuid(&uuid)?;
    let item = state.inventory.update_consumable(&user, &uuid, body).await?;
    Ok(Json(item.into()))
}

pub async fn destroy_consumable(
    State(state): State<CodexState>,
    user: CurrentUser,
    Path(uuid): Path<String>,
) -> Result<Json<MessageBody>, CodexError> {
    let user = user.require()?;
    let uuid = parse_item_uuid(&uuid)?;
    state.inventory.delete_consumable(&user, &uuid).await?;
    Ok(Json(MessageBody::new("Item destroyed")))
}
