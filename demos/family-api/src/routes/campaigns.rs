use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use ringshelf::models::{CampaignPatch, CampaignStatePatch, NewRun, NewScenario};
use ringshelf::ordering::Direction;

use crate::auth::RequireSession;
use crate::error::AppError;
use crate::state::AppState;

/// GET /api/campaigns
pub async fn list_campaigns(
    _session: RequireSession,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let campaigns = state.shelf.run(|s| s.campaigns().list()).await?;
    Ok(Json(json!({ "campaigns": campaigns })))
}

/// GET /api/campaigns/summary
pub async fn campaign_summaries(
    _session: RequireSession,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let campaigns = state.shelf.run(|s| s.campaigns().summaries()).await?;
    Ok(Json(json!({ "campaigns": campaigns })))
}

#[derive(Deserialize)]
pub struct CreateCampaignBody {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub ruleset: String,
}

/// POST /api/campaigns
pub async fn create_campaign(
    _session: RequireSession,
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateCampaignBody>,
) -> Result<Json<Value>, AppError> {
    let campaign = state
        .shelf
        .run(move |s| {
            s.campaigns()
                .create(&body.name, body.description.as_deref(), &body.ruleset)
        })
        .await?;
    Ok(Json(json!({ "campaign": campaign })))
}

/// GET /api/campaigns/:id
pub async fn get_campaign(
    _session: RequireSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let campaign = state.shelf.run(move |s| s.campaigns().get(&id)).await?;
    Ok(Json(json!({ "campaign": campaign })))
}

/// PATCH /api/campaigns/:id
pub async fn update_campaign(
    _session: RequireSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<CampaignPatch>,
) -> Result<Json<Value>, AppError> {
    let campaign = state
        .shelf
        .run(move |s| s.campaigns().update(&id, &patch))
        .await?;
    Ok(Json(json!({ "campaign": campaign })))
}

/// DELETE /api/campaigns/:id
pub async fn delete_campaign(
    _session: RequireSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    state.shelf.run(move |s| s.campaigns().delete(&id)).await?;
    Ok(Json(json!({ "ok": true })))
}

// -- scenarios -------------------------------------------------------------

/// GET /api/campaigns/:id/scenarios
pub async fn list_scenarios(
    _session: RequireSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let scenarios = state
        .shelf
        .run(move |s| s.campaigns().scenarios(&id))
        .await?;
    Ok(Json(json!({ "scenarios": scenarios })))
}

/// POST /api/campaigns/:id/scenarios
pub async fn add_scenario(
    _session: RequireSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(new): Json<NewScenario>,
) -> Result<Json<Value>, AppError> {
    let scenario = state
        .shelf
        .run(move |s| s.campaigns().add_scenario(&id, &new))
        .await?;
    Ok(Json(json!({ "scenario": scenario })))
}

#[derive(Deserialize)]
pub struct ReorderBody {
    pub scenario_id: String,
    #[serde(default)]
    pub direction: Direction,
}

/// POST /api/campaigns/:id/scenarios/reorder
///
/// Move one scenario one step up or down; boundary moves are no-ops.
pub async fn reorder_scenario(
    _session: RequireSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<ReorderBody>,
) -> Result<Json<Value>, AppError> {
    if body.scenario_id.is_empty() {
        return Err(AppError::bad_request("scenario_id required"));
    }
    state
        .shelf
        .run(move |s| {
            s.campaigns()
                .reorder_scenario(&id, &body.scenario_id, body.direction)
        })
        .await?;
    Ok(Json(json!({ "ok": true })))
}

// -- runs ------------------------------------------------------------------

/// GET /api/campaigns/:id/runs
pub async fn list_runs(
    _session: RequireSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let runs = state.shelf.run(move |s| s.campaigns().runs(&id)).await?;
    Ok(Json(json!({ "runs": runs })))
}

/// POST /api/campaigns/:id/runs
pub async fn log_run(
    _session: RequireSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(new): Json<NewRun>,
) -> Result<Json<Value>, AppError> {
    let run = state
        .shelf
        .run(move |s| s.campaigns().log_run(&id, &new))
        .await?;
    Ok(Json(json!({ "run": run })))
}

/// GET /api/campaigns/:id/runs/latest
///
/// The most recent run with its decks and resolved hero names.
pub async fn latest_run(
    _session: RequireSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let latest = state
        .shelf
        .run(move |s| s.campaigns().latest_run_decks(&id))
        .await?;
    match latest {
        None => Ok(Json(json!({ "run": null, "decks": [] }))),
        Some((run, decks)) => Ok(Json(json!({ "run": run, "decks": decks }))),
    }
}

// -- narrative state -------------------------------------------------------

/// GET /api/campaigns/:id/state
///
/// Return the campaign's state row, creating it on first access.
pub async fn get_state(
    _session: RequireSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let row = state.shelf.run(move |s| s.campaigns().state(&id)).await?;
    Ok(Json(json!({ "state": row })))
}

/// PATCH /api/campaigns/:id/state
pub async fn patch_state(
    _session: RequireSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<CampaignStatePatch>,
) -> Result<Json<Value>, AppError> {
    let row = state
        .shelf
        .run(move |s| s.campaigns().patch_state(&id, &patch))
        .await?;
    Ok(Json(json!({ "state": row })))
}
