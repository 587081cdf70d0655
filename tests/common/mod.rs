//! Shared test fixtures for the ringshelf integration tests.
//!
//! Provides `shelf()` (a memory-store shelf with an offline card cache in a
//! temp directory), `sample_index()` (a small card-metadata index), and
//! `FlakyStore` (a memory store with per-operation failure injection, for
//! exercising the compensation paths of multi-write sequences).

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use ringshelf::decklist::CardIndex;
use ringshelf::error::{Result, RingshelfError};
use ringshelf::models::{
    Campaign, CampaignPatch, CampaignState, CampaignStatePatch, CampaignSummary, Deck,
    DeckCardRow, DeckSummary, LogEntry, NewRun, NewScenario, OwnedRow, PackRow, Run,
    RunDeckLink, Scenario,
};
use ringshelf::store::{MemoryStore, Store, UsageRow};
use ringshelf::Ringshelf;

/// A shelf on a memory store with an offline card cache rooted in a temp
/// directory. The caller must keep the `TempDir` alive for the duration of
/// the test so the cache directory is not deleted prematurely.
pub fn shelf() -> (Ringshelf, tempfile::TempDir) {
    let tmp_dir = tempfile::tempdir().unwrap();
    let shelf = Ringshelf::builder()
        .cache_dir(tmp_dir.path())
        .offline(true)
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap();
    (shelf, tmp_dir)
}

/// Same fixture, but on a caller-provided store.
pub fn shelf_with_store(store: Box<dyn Store>) -> (Ringshelf, tempfile::TempDir) {
    let tmp_dir = tempfile::tempdir().unwrap();
    let shelf = Ringshelf::builder()
        .cache_dir(tmp_dir.path())
        .offline(true)
        .timeout(Duration::from_secs(5))
        .store(store)
        .build()
        .unwrap();
    (shelf, tmp_dir)
}

/// A standalone offline card client, for wiring ops wrappers directly to a
/// test-owned store (e.g. a [`FlakyStore`]).
pub fn cards_client() -> (ringshelf::CardsClient, tempfile::TempDir) {
    let tmp_dir = tempfile::tempdir().unwrap();
    let cache = ringshelf::ApiCache::new(
        Some(tmp_dir.path().to_path_buf()),
        true,
        Duration::from_secs(3600),
        Duration::from_secs(5),
    )
    .unwrap();
    (ringshelf::CardsClient::new(cache), tmp_dir)
}

/// A small card pool: two heroes, three spheres' worth of player cards, and
/// one card with no type metadata.
pub fn sample_index() -> CardIndex {
    let mut index = CardIndex::new();
    index.insert("01001", "Aragorn", Some("hero"), Some("leadership"));
    index.insert("01002", "Eowyn", Some("hero"), Some("spirit"));
    index.insert("01012", "Gandalf", Some("ally"), Some("neutral"));
    index.insert("01014", "Faramir", Some("ally"), Some("leadership"));
    index.insert("01026", "Steward of Gondor", Some("attachment"), Some("leadership"));
    index.insert("01023", "Sneak Attack", Some("event"), Some("leadership"));
    index.insert("99901", "Mystery Relic", None, None);
    index
}

// ---------------------------------------------------------------------------
// FlakyStore -- failure injection around a MemoryStore
// ---------------------------------------------------------------------------

/// Delegates everything to a [`MemoryStore`], but can be armed to fail the
/// Nth invocation of a named operation with a store error.
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    calls: Mutex<HashMap<String, u32>>,
    fail_plan: Mutex<HashMap<String, Vec<u32>>>,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the listed (1-based) invocations of `op` fail.
    pub fn fail_on(&self, op: &str, invocations: &[u32]) {
        self.fail_plan
            .lock()
            .unwrap()
            .insert(op.to_string(), invocations.to_vec());
    }

    fn gate(&self, op: &str) -> Result<()> {
        let mut calls = self.calls.lock().unwrap();
        let n = calls.entry(op.to_string()).or_insert(0);
        *n += 1;
        let should_fail = self
            .fail_plan
            .lock()
            .unwrap()
            .get(op)
            .map(|plan| plan.contains(n))
            .unwrap_or(false);
        if should_fail {
            return Err(RingshelfError::Store(format!("injected failure in {}", op)));
        }
        Ok(())
    }
}

impl Store for FlakyStore {
    fn list_campaigns(&self) -> Result<Vec<Campaign>> {
        self.inner.list_campaigns()
    }
    fn campaign_summaries(&self) -> Result<Vec<CampaignSummary>> {
        self.inner.campaign_summaries()
    }
    fn get_campaign(&self, id: &str) -> Result<Option<Campaign>> {
        self.inner.get_campaign(id)
    }
    fn insert_campaign(
        &self,
        name: &str,
        description: Option<&str>,
        ruleset: &str,
    ) -> Result<Campaign> {
        self.inner.insert_campaign(name, description, ruleset)
    }
    fn update_campaign(&self, id: &str, patch: &CampaignPatch) -> Result<Campaign> {
        self.inner.update_campaign(id, patch)
    }
    fn delete_campaign(&self, id: &str) -> Result<()> {
        self.inner.delete_campaign(id)
    }

    fn list_scenarios(&self, campaign_id: &str) -> Result<Vec<Scenario>> {
        self.inner.list_scenarios(campaign_id)
    }
    fn insert_scenario(
        &self,
        campaign_id: &str,
        new: &NewScenario,
        position: i64,
    ) -> Result<Scenario> {
        self.inner.insert_scenario(campaign_id, new, position)
    }
    fn set_scenario_position(&self, scenario_id: &str, position: i64) -> Result<()> {
        self.gate("set_scenario_position")?;
        self.inner.set_scenario_position(scenario_id, position)
    }

    fn list_runs(&self, campaign_id: &str) -> Result<Vec<Run>> {
        self.inner.list_runs(campaign_id)
    }
    fn latest_run(&self, campaign_id: &str) -> Result<Option<Run>> {
        self.inner.latest_run(campaign_id)
    }
    fn insert_run(&self, campaign_id: &str, new: &NewRun) -> Result<Run> {
        self.inner.insert_run(campaign_id, new)
    }
    fn insert_run_decks(&self, run_id: &str, links: &[RunDeckLink]) -> Result<()> {
        self.inner.insert_run_decks(run_id, links)
    }
    fn run_decks(&self, run_id: &str) -> Result<Vec<RunDeckLink>> {
        self.inner.run_decks(run_id)
    }

    fn get_state(&self, campaign_id: &str) -> Result<Option<CampaignState>> {
        self.inner.get_state(campaign_id)
    }
    fn insert_state(&self, campaign_id: &str) -> Result<CampaignState> {
        self.inner.insert_state(campaign_id)
    }
    fn update_state(
        &self,
        campaign_id: &str,
        patch: &CampaignStatePatch,
    ) -> Result<Option<CampaignState>> {
        self.inner.update_state(campaign_id, patch)
    }

    fn append_log(&self, entry: &LogEntry) -> Result<()> {
        self.inner.append_log(entry)
    }
    fn list_log(&self, campaign_id: &str) -> Result<Vec<LogEntry>> {
        self.inner.list_log(campaign_id)
    }

    fn list_decks(&self) -> Result<Vec<Deck>> {
        self.inner.list_decks()
    }
    fn deck_summaries(&self) -> Result<Vec<DeckSummary>> {
        self.inner.deck_summaries()
    }
    fn get_deck(&self, id: &str) -> Result<Option<Deck>> {
        self.inner.get_deck(id)
    }
    fn insert_deck(&self, name: &str) -> Result<Deck> {
        self.inner.insert_deck(name)
    }
    fn rename_deck(&self, id: &str, name: &str) -> Result<()> {
        self.inner.rename_deck(id, name)
    }
    fn delete_deck_row(&self, id: &str) -> Result<()> {
        self.gate("delete_deck_row")?;
        self.inner.delete_deck_row(id)
    }

    fn deck_heroes(&self, deck_id: &str) -> Result<Vec<String>> {
        self.inner.deck_heroes(deck_id)
    }
    fn insert_deck_heroes(&self, deck_id: &str, codes: &[String]) -> Result<()> {
        self.gate("insert_deck_heroes")?;
        self.inner.insert_deck_heroes(deck_id, codes)
    }
    fn delete_deck_heroes(&self, deck_id: &str) -> Result<()> {
        self.gate("delete_deck_heroes")?;
        self.inner.delete_deck_heroes(deck_id)
    }

    fn deck_cards(&self, deck_id: &str) -> Result<Vec<DeckCardRow>> {
        self.inner.deck_cards(deck_id)
    }
    fn upsert_deck_card(&self, deck_id: &str, card_code: &str, qty: u32) -> Result<()> {
        self.inner.upsert_deck_card(deck_id, card_code, qty)
    }
    fn delete_deck_card(&self, deck_id: &str, card_code: &str) -> Result<()> {
        self.inner.delete_deck_card(deck_id, card_code)
    }
    fn insert_deck_cards(&self, deck_id: &str, rows: &[DeckCardRow]) -> Result<()> {
        self.gate("insert_deck_cards")?;
        self.inner.insert_deck_cards(deck_id, rows)
    }
    fn delete_deck_cards(&self, deck_id: &str) -> Result<()> {
        self.gate("delete_deck_cards")?;
        self.inner.delete_deck_cards(deck_id)
    }

    fn owned_quantities(&self, codes: &[String]) -> Result<HashMap<String, u32>> {
        self.inner.owned_quantities(codes)
    }
    fn upsert_owned(&self, rows: &[OwnedRow]) -> Result<()> {
        self.inner.upsert_owned(rows)
    }
    fn list_packs(&self) -> Result<Vec<PackRow>> {
        self.inner.list_packs()
    }
    fn upsert_packs(&self, rows: &[PackRow]) -> Result<()> {
        self.inner.upsert_packs(rows)
    }
    fn set_pack_enabled(&self, pack_code: &str, enabled: bool) -> Result<()> {
        self.inner.set_pack_enabled(pack_code, enabled)
    }

    fn usage_rows(&self, codes: &[String]) -> Result<Vec<UsageRow>> {
        self.inner.usage_rows(codes)
    }
    fn deck_names(&self, deck_ids: &[String]) -> Result<HashMap<String, String>> {
        self.inner.deck_names(deck_ids)
    }
}
