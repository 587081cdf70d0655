use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use ringshelf::models::{DeckCardRow, DeckContents};

use crate::auth::RequireSession;
use crate::error::AppError;
use crate::state::AppState;

/// GET /api/decks
pub async fn list_decks(
    _session: RequireSession,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let decks = state.shelf.run(|s| s.decks().list()).await?;
    Ok(Json(json!({ "decks": decks })))
}

/// GET /api/decks/summary
pub async fn deck_summaries(
    _session: RequireSession,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let decks = state.shelf.run(|s| s.decks().summaries()).await?;
    Ok(Json(json!({ "decks": decks })))
}

#[derive(Deserialize)]
pub struct CreateDeckBody {
    #[serde(default)]
    pub name: String,
}

/// POST /api/decks
pub async fn create_deck(
    _session: RequireSession,
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateDeckBody>,
) -> Result<Json<Value>, AppError> {
    let deck = state
        .shelf
        .run(move |s| s.decks().create(&body.name))
        .await?;
    Ok(Json(json!({ "deck": deck })))
}

/// GET /api/decks/:id
///
/// Deck header plus hero codes and main-deck rows.
pub async fn get_deck(
    _session: RequireSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let detail = state.shelf.run(move |s| s.decks().get(&id)).await?;
    Ok(Json(json!({
        "deck": detail.deck,
        "heroes": detail.heroes,
        "cards": detail.cards,
    })))
}

#[derive(Deserialize)]
pub struct RenameBody {
    #[serde(default)]
    pub name: String,
}

/// PATCH /api/decks/:id
pub async fn rename_deck(
    _session: RequireSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<RenameBody>,
) -> Result<Json<Value>, AppError> {
    state
        .shelf
        .run(move |s| s.decks().rename(&id, &body.name))
        .await?;
    Ok(Json(json!({ "ok": true })))
}

#[derive(Deserialize)]
pub struct SetCardBody {
    pub card_code: String,
    #[serde(default)]
    pub qty: u32,
}

/// POST /api/decks/:id/cards
pub async fn set_card(
    _session: RequireSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<SetCardBody>,
) -> Result<Json<Value>, AppError> {
    state
        .shelf
        .run(move |s| s.decks().set_card_qty(&id, &body.card_code, body.qty))
        .await?;
    Ok(Json(json!({ "ok": true })))
}

#[derive(Deserialize)]
pub struct SetHeroesBody {
    #[serde(default)]
    pub heroes: Vec<String>,
}

/// POST /api/decks/:id/heroes
pub async fn set_heroes(
    _session: RequireSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<SetHeroesBody>,
) -> Result<Json<Value>, AppError> {
    state
        .shelf
        .run(move |s| s.decks().set_heroes(&id, &body.heroes))
        .await?;
    Ok(Json(json!({ "ok": true })))
}

#[derive(Deserialize)]
pub struct ReplaceBody {
    #[serde(default)]
    pub heroes: Vec<String>,
    #[serde(default)]
    pub cards: Vec<DeckCardRow>,
}

/// POST /api/decks/:id/replace
///
/// Full replacement: the stored heroes and quantities become exactly the
/// submitted set.
pub async fn replace_deck(
    _session: RequireSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<ReplaceBody>,
) -> Result<Json<Value>, AppError> {
    if body.heroes.len() > 3 {
        return Err(AppError::bad_request("Too many heroes (max 3)"));
    }
    let contents = DeckContents::from_parts(
        body.heroes,
        body.cards.into_iter().map(|c| (c.card_code, c.qty)),
    );
    state
        .shelf
        .run(move |s| s.decks().replace(&id, &contents))
        .await?;
    Ok(Json(json!({ "ok": true })))
}

/// POST /api/decks/:id/delete
pub async fn delete_deck(
    _session: RequireSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    state.shelf.run(move |s| s.decks().delete(&id)).await?;
    Ok(Json(json!({ "ok": true })))
}

/// GET /api/decks/:id/export
///
/// The deck as copyable text.
pub async fn export_deck(
    _session: RequireSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let text = state.shelf.run(move |s| s.decks().export_text(&id)).await?;
    Ok(Json(json!({ "text": text })))
}

#[derive(Deserialize)]
pub struct ImportBody {
    #[serde(default)]
    pub text: String,
}

/// POST /api/decks/:id/import
///
/// Parse pasted deck-list text and apply it as a full replacement. Text
/// with no recognizable card lines is rejected.
pub async fn import_deck(
    _session: RequireSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<ImportBody>,
) -> Result<Json<Value>, AppError> {
    let contents = state
        .shelf
        .run(move |s| s.decks().import_text(&id, &body.text))
        .await?;
    Ok(Json(json!({
        "ok": true,
        "heroes": contents.heroes,
        "cards": contents.card_rows(),
    })))
}
