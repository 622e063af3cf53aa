use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::db::CodexStorage;
use crate::handlers::{consumables, discord, health, magic_items};
use crate::service::Inventory;

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Clone)]
pub struct CodexState {
    pub storage: CodexStorage,
    pub inventory: Inventory,
}

impl CodexState {
    pub fn new(storage: CodexStorage) -> Self {
        let inventory = Inventory::new(storage.clone());
        Self { storage, inventory }
    }
}

pub fn codex_router(state: CodexState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route(
            "/api/data/magicitems",
            get(magic_items::list_magic_items).post(magic_items::create_magic_item),
        )
        .route(
            "/api/data/magicitems/{uuid}",
            get(magic_items::retrieve_magic_item)
                .patch(magic_items::update_magic_item)
                .delete(magic_items::destroy_magic_item),
        )
        .route(
            "/api/data/consumables",
            get(consumables::list_consumables).post(consumables::create_consumable),
        )
        .route(
            "/api/data/consumables/{uuid}",
            get(consumables::retrieve_consumable)
                .patch(consumables::update_consumable)
                .delete(consumables::destroy_consumable),
        )
        .route(
            "/api/discord/characters",
            post(discord::discord_characters_list),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
