use std::sync::Arc;

use axum::extract::State;
use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::RequireSession;
use crate::error::AppError;
use crate::state::AppState;

/// GET /api/packs
///
/// Sync the pack catalog from the card API and return the stored rows
/// (including the household's enablement flags).
pub async fn list_packs(
    _session: RequireSession,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let packs = state
        .shelf
        .run(|s| s.collection().sync_packs())
        .await?;
    Ok(Json(json!({ "packs": packs })))
}

#[derive(Deserialize)]
pub struct SetEnabledBody {
    pub pack_code: String,
    pub enabled: bool,
}

/// PATCH /api/packs
pub async fn set_enabled(
    _session: RequireSession,
    State(state): State<Arc<AppState>>,
    Json(body): Json<SetEnabledBody>,
) -> Result<Json<Value>, AppError> {
    state
        .shelf
        .run(move |s| s.collection().set_pack_enabled(&body.pack_code, body.enabled))
        .await?;
    Ok(Json(json!({ "ok": true })))
}
