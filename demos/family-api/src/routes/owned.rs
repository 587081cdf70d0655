use std::sync::Arc;

use axum::extract::{RawQuery, State};
use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use ringshelf::models::OwnedRow;

use crate::auth::RequireSession;
use crate::error::AppError;
use crate::routes::codes_from_query;
use crate::state::AppState;

/// GET /api/owned?code=01001&code=01012
///
/// Owned quantities for the requested card codes.
pub async fn get_owned(
    _session: RequireSession,
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Result<Json<Value>, AppError> {
    let codes = codes_from_query(query.as_deref());
    if codes.is_empty() {
        return Ok(Json(json!({ "owned": {} })));
    }
    let owned = state
        .shelf
        .run(move |s| s.collection().owned(&codes))
        .await?;
    Ok(Json(json!({ "owned": owned })))
}

#[derive(Deserialize)]
pub struct SetOwnedBody {
    pub card_code: String,
    #[serde(default)]
    pub owned_qty: u32,
}

/// POST /api/owned
pub async fn set_owned(
    _session: RequireSession,
    State(state): State<Arc<AppState>>,
    Json(body): Json<SetOwnedBody>,
) -> Result<Json<Value>, AppError> {
    state
        .shelf
        .run(move |s| s.collection().set_owned(&body.card_code, body.owned_qty))
        .await?;
    Ok(Json(json!({ "ok": true })))
}

#[derive(Deserialize)]
pub struct BulkBody {
    #[serde(default)]
    pub rows: Vec<OwnedRow>,
}

/// POST /api/owned/bulk
pub async fn set_owned_bulk(
    _session: RequireSession,
    State(state): State<Arc<AppState>>,
    Json(body): Json<BulkBody>,
) -> Result<Json<Value>, AppError> {
    let count = body.rows.len();
    state
        .shelf
        .run(move |s| s.collection().set_owned_bulk(&body.rows))
        .await?;
    Ok(Json(json!({ "ok": true, "count": count })))
}

/// GET /api/usage?code=01001&code=01012
///
/// For each requested code, the decks using it and at what quantity.
pub async fn get_usage(
    _session: RequireSession,
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Result<Json<Value>, AppError> {
    let codes = codes_from_query(query.as_deref());
    if codes.is_empty() {
        return Ok(Json(json!({ "usage": {} })));
    }
    let usage = state
        .shelf
        .run(move |s| s.collection().usage(&codes))
        .await?;
    Ok(Json(json!({ "usage": usage })))
}
