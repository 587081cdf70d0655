mod auth;
mod error;
mod routes;
mod state;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let passcode = std::env::var("FAMILY_PASSCODE")
        .expect("FAMILY_PASSCODE must be set (the shared household passcode)");

    let mut builder = ringshelf::AsyncRingshelf::builder();
    match (std::env::var("STORE_URL"), std::env::var("STORE_KEY")) {
        (Ok(url), Ok(key)) => {
            info!(store = %url, "using hosted REST store");
            builder = builder.rest_store(&url, &key);
        }
        _ => {
            warn!("STORE_URL/STORE_KEY not set; using in-memory store (data is lost on exit)");
        }
    }

    let shelf = builder.build().await.expect("failed to initialize shelf");

    let state = Arc::new(AppState {
        shelf,
        signer: ringshelf::SessionSigner::new(&passcode),
    });

    let app = Router::new()
        .route("/api/login", post(routes::session::login))
        .route("/api/logout", post(routes::session::logout))
        .route("/api/me", get(routes::session::me))
        .route(
            "/api/packs",
            get(routes::packs::list_packs).patch(routes::packs::set_enabled),
        )
        .route(
            "/api/owned",
            get(routes::owned::get_owned).post(routes::owned::set_owned),
        )
        .route("/api/owned/bulk", post(routes::owned::set_owned_bulk))
        .route("/api/usage", get(routes::owned::get_usage))
        .route(
            "/api/decks",
            get(routes::decks::list_decks).post(routes::decks::create_deck),
        )
        .route("/api/decks/summary", get(routes::decks::deck_summaries))
        .route(
            "/api/decks/{id}",
            get(routes::decks::get_deck).patch(routes::decks::rename_deck),
        )
        .route("/api/decks/{id}/cards", post(routes::decks::set_card))
        .route("/api/decks/{id}/heroes", post(routes::decks::set_heroes))
        .route("/api/decks/{id}/replace", post(routes::decks::replace_deck))
        .route("/api/decks/{id}/delete", post(routes::decks::delete_deck))
        .route("/api/decks/{id}/export", get(routes::decks::export_deck))
        .route("/api/decks/{id}/import", post(routes::decks::import_deck))
        .route(
            "/api/campaigns",
            get(routes::campaigns::list_campaigns).post(routes::campaigns::create_campaign),
        )
        .route(
            "/api/campaigns/summary",
            get(routes::campaigns::campaign_summaries),
        )
        .route(
            "/api/campaigns/{id}",
            get(routes::campaigns::get_campaign)
                .patch(routes::campaigns::update_campaign)
                .delete(routes::campaigns::delete_campaign),
        )
        .route(
            "/api/campaigns/{id}/scenarios",
            get(routes::campaigns::list_scenarios).post(routes::campaigns::add_scenario),
        )
        .route(
            "/api/campaigns/{id}/scenarios/reorder",
            post(routes::campaigns::reorder_scenario),
        )
        .route(
            "/api/campaigns/{id}/runs",
            get(routes::campaigns::list_runs).post(routes::campaigns::log_run),
        )
        .route(
            "/api/campaigns/{id}/runs/latest",
            get(routes::campaigns::latest_run),
        )
        .route(
            "/api/campaigns/{id}/state",
            get(routes::campaigns::get_state).patch(routes::campaigns::patch_state),
        )
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = std::env::var("BIND").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
