//! Access to the external relational store.
//!
//! The hosted store owns the schema, persistence and transactional behavior;
//! this crate only issues single-operation round trips against it. [`Store`]
//! is the seam: domain operations are written against the trait, the REST
//! implementation talks to the hosted service, and the in-memory
//! implementation backs tests and store-less demo runs.
//!
//! There are deliberately no multi-write primitives here. Sequences such as
//! "swap two positions" or "delete children, then parent" are composed one
//! call at a time by the ops layer, which also owns the compensation logic
//! for partial failures.

pub mod memory;
pub mod rest;

pub use memory::MemoryStore;
pub use rest::RestStore;

use std::collections::HashMap;

use crate::error::Result;
use crate::models::{
    Campaign, CampaignPatch, CampaignState, CampaignStatePatch, CampaignSummary, Deck,
    DeckCardRow, DeckSummary, LogEntry, NewRun, NewScenario, OwnedRow, PackRow, Run,
    RunDeckLink, Scenario,
};

/// One `deck_cards` row joined with its deck id, for usage aggregation.
#[derive(Debug, Clone)]
pub struct UsageRow {
    pub deck_id: String,
    pub card_code: String,
    pub qty: u32,
}

/// The persisted collections, one method per single round-trip operation.
pub trait Store: Send {
    // -- campaigns ---------------------------------------------------------

    /// All campaigns, most recently updated first.
    fn list_campaigns(&self) -> Result<Vec<Campaign>>;
    /// The campaign summaries view, most recently updated first.
    fn campaign_summaries(&self) -> Result<Vec<CampaignSummary>>;
    fn get_campaign(&self, id: &str) -> Result<Option<Campaign>>;
    fn insert_campaign(
        &self,
        name: &str,
        description: Option<&str>,
        ruleset: &str,
    ) -> Result<Campaign>;
    /// Fails with `NotFound` when the campaign does not exist.
    fn update_campaign(&self, id: &str, patch: &CampaignPatch) -> Result<Campaign>;
    fn delete_campaign(&self, id: &str) -> Result<()>;

    // -- scenarios ---------------------------------------------------------

    /// Scenarios of one campaign, ascending by position then creation.
    fn list_scenarios(&self, campaign_id: &str) -> Result<Vec<Scenario>>;
    fn insert_scenario(
        &self,
        campaign_id: &str,
        new: &NewScenario,
        position: i64,
    ) -> Result<Scenario>;
    fn set_scenario_position(&self, scenario_id: &str, position: i64) -> Result<()>;

    // -- runs --------------------------------------------------------------

    /// Runs of one campaign, newest played first.
    fn list_runs(&self, campaign_id: &str) -> Result<Vec<Run>>;
    fn latest_run(&self, campaign_id: &str) -> Result<Option<Run>>;
    fn insert_run(&self, campaign_id: &str, new: &NewRun) -> Result<Run>;
    fn insert_run_decks(&self, run_id: &str, links: &[RunDeckLink]) -> Result<()>;
    fn run_decks(&self, run_id: &str) -> Result<Vec<RunDeckLink>>;

    // -- campaign state ----------------------------------------------------

    fn get_state(&self, campaign_id: &str) -> Result<Option<CampaignState>>;
    /// Insert a default state row for a campaign that has none yet.
    fn insert_state(&self, campaign_id: &str) -> Result<CampaignState>;
    /// Apply a patch; `Ok(None)` when no row exists for the campaign.
    fn update_state(
        &self,
        campaign_id: &str,
        patch: &CampaignStatePatch,
    ) -> Result<Option<CampaignState>>;

    // -- campaign log ------------------------------------------------------

    fn append_log(&self, entry: &LogEntry) -> Result<()>;
    fn list_log(&self, campaign_id: &str) -> Result<Vec<LogEntry>>;

    // -- decks -------------------------------------------------------------

    fn list_decks(&self) -> Result<Vec<Deck>>;
    fn deck_summaries(&self) -> Result<Vec<DeckSummary>>;
    fn get_deck(&self, id: &str) -> Result<Option<Deck>>;
    fn insert_deck(&self, name: &str) -> Result<Deck>;
    fn rename_deck(&self, id: &str, name: &str) -> Result<()>;
    /// Delete the deck header row only; children are separate calls.
    fn delete_deck_row(&self, id: &str) -> Result<()>;

    fn deck_heroes(&self, deck_id: &str) -> Result<Vec<String>>;
    fn insert_deck_heroes(&self, deck_id: &str, codes: &[String]) -> Result<()>;
    fn delete_deck_heroes(&self, deck_id: &str) -> Result<()>;

    fn deck_cards(&self, deck_id: &str) -> Result<Vec<DeckCardRow>>;
    fn upsert_deck_card(&self, deck_id: &str, card_code: &str, qty: u32) -> Result<()>;
    fn delete_deck_card(&self, deck_id: &str, card_code: &str) -> Result<()>;
    fn insert_deck_cards(&self, deck_id: &str, rows: &[DeckCardRow]) -> Result<()>;
    fn delete_deck_cards(&self, deck_id: &str) -> Result<()>;

    // -- collection --------------------------------------------------------

    fn owned_quantities(&self, codes: &[String]) -> Result<HashMap<String, u32>>;
    fn upsert_owned(&self, rows: &[OwnedRow]) -> Result<()>;
    fn list_packs(&self) -> Result<Vec<PackRow>>;
    fn upsert_packs(&self, rows: &[PackRow]) -> Result<()>;
    fn set_pack_enabled(&self, pack_code: &str, enabled: bool) -> Result<()>;

    // -- usage -------------------------------------------------------------

    /// All deck_cards rows matching the given codes.
    fn usage_rows(&self, codes: &[String]) -> Result<Vec<UsageRow>>;
    /// Deck display names for a set of ids.
    fn deck_names(&self, deck_ids: &[String]) -> Result<HashMap<String, String>>;
}
