use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::error::CodexError;
use crate::router::CodexState;

pub async fn health(State(state): State<CodexState>) -> Result<Json<Value>, CodexError> {
    state.storage.ping().await?;
    Ok(Json(json!({ "status": "ok" })))
}
