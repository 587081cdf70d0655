//! In-memory [`Store`] implementation.
//!
//! Backs the integration tests and store-less demo runs. Behaves like the
//! hosted store where that matters: ids and timestamps are generated by the
//! store (as opaque monotonic strings, so creation order is total and
//! unique), campaign deletion cascades to children the way the hosted
//! schema's foreign keys do, and pack upserts never clobber an existing
//! row's enablement flag.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use crate::error::{Result, RingshelfError};
use crate::models::{
    Campaign, CampaignPatch, CampaignState, CampaignStatePatch, CampaignSummary, Deck,
    DeckCardRow, DeckSummary, LogEntry, NewRun, NewScenario, OwnedRow, PackRow, Run,
    RunDeckLink, Scenario,
};
use crate::store::{Store, UsageRow};

#[derive(Default)]
struct Inner {
    seq: u64,
    campaigns: BTreeMap<String, Campaign>,
    scenarios: BTreeMap<String, Scenario>,
    runs: BTreeMap<String, Run>,
    run_decks: Vec<(String, RunDeckLink)>,
    states: BTreeMap<String, CampaignState>,
    log: Vec<LogEntry>,
    decks: BTreeMap<String, Deck>,
    deck_heroes: Vec<(String, String)>,
    deck_cards: BTreeMap<(String, String), u32>,
    owned: BTreeMap<String, u32>,
    packs: BTreeMap<String, PackRow>,
}

impl Inner {
    /// Opaque monotonic timestamp; lexicographic order == creation order.
    fn stamp(&mut self) -> String {
        self.seq += 1;
        format!("t{:012}", self.seq)
    }

    fn id(&mut self, prefix: &str) -> String {
        self.seq += 1;
        format!("{}-{:06}", prefix, self.seq)
    }

    fn touch_deck(&mut self, deck_id: &str) {
        let stamp = self.stamp();
        if let Some(deck) = self.decks.get_mut(deck_id) {
            deck.updated_at = Some(stamp);
        }
    }
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| RingshelfError::Store("store lock poisoned".into()))
    }
}

impl Store for MemoryStore {
    // -- campaigns ---------------------------------------------------------

    fn list_campaigns(&self) -> Result<Vec<Campaign>> {
        let inner = self.lock()?;
        let mut out: Vec<Campaign> = inner.campaigns.values().cloned().collect();
        out.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(out)
    }

    fn campaign_summaries(&self) -> Result<Vec<CampaignSummary>> {
        let inner = self.lock()?;
        let mut out = Vec::new();
        for c in inner.campaigns.values() {
            let players = inner
                .states
                .get(&c.id)
                .map(|s| {
                    [&s.player1, &s.player2, &s.player3, &s.player4]
                        .iter()
                        .filter(|p| p.as_deref().map(|v| !v.trim().is_empty()).unwrap_or(false))
                        .count() as u32
                })
                .unwrap_or(0);

            let runs: Vec<&Run> = inner
                .runs
                .values()
                .filter(|r| r.campaign_id == c.id)
                .collect();
            let mut deck_ids: Vec<&str> = runs
                .iter()
                .flat_map(|r| {
                    inner
                        .run_decks
                        .iter()
                        .filter(|(run_id, _)| *run_id == r.id)
                        .map(|(_, link)| link.deck_id.as_str())
                })
                .collect();
            deck_ids.sort_unstable();
            deck_ids.dedup();

            let score_sum: i64 = runs.iter().filter_map(|r| r.score).sum();
            let score_total = inner
                .states
                .get(&c.id)
                .and_then(|s| s.campaign_total_override)
                .unwrap_or(score_sum);

            out.push(CampaignSummary {
                id: c.id.clone(),
                name: c.name.clone(),
                ruleset: c.ruleset.clone(),
                created_at: c.created_at.clone(),
                updated_at: c.updated_at.clone(),
                players,
                decks: deck_ids.len() as u32,
                score_total,
            });
        }
        out.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(out)
    }

    fn get_campaign(&self, id: &str) -> Result<Option<Campaign>> {
        Ok(self.lock()?.campaigns.get(id).cloned())
    }

    fn insert_campaign(
        &self,
        name: &str,
        description: Option<&str>,
        ruleset: &str,
    ) -> Result<Campaign> {
        let mut inner = self.lock()?;
        let id = inner.id("cmp");
        let now = inner.stamp();
        let campaign = Campaign {
            id: id.clone(),
            name: name.to_string(),
            description: description.map(str::to_string),
            ruleset: ruleset.to_string(),
            created_at: Some(now.clone()),
            updated_at: Some(now),
        };
        inner.campaigns.insert(id, campaign.clone());
        Ok(campaign)
    }

    fn update_campaign(&self, id: &str, patch: &CampaignPatch) -> Result<Campaign> {
        let mut inner = self.lock()?;
        let now = inner.stamp();
        let campaign = inner
            .campaigns
            .get_mut(id)
            .ok_or_else(|| RingshelfError::NotFound(format!("campaign {}", id)))?;
        if let Some(name) = &patch.name {
            campaign.name = name.clone();
        }
        if let Some(description) = &patch.description {
            campaign.description = description.clone();
        }
        if let Some(ruleset) = &patch.ruleset {
            campaign.ruleset = ruleset.clone();
        }
        campaign.updated_at = Some(now);
        Ok(campaign.clone())
    }

    fn delete_campaign(&self, id: &str) -> Result<()> {
        let mut inner = self.lock()?;
        inner.campaigns.remove(id);
        // Foreign keys on the hosted store cascade; mirror that here.
        let run_ids: Vec<String> = inner
            .runs
            .values()
            .filter(|r| r.campaign_id == id)
            .map(|r| r.id.clone())
            .collect();
        inner.runs.retain(|_, r| r.campaign_id != id);
        inner
            .run_decks
            .retain(|(run_id, _)| !run_ids.contains(run_id));
        inner.scenarios.retain(|_, s| s.campaign_id != id);
        inner.states.remove(id);
        inner.log.retain(|e| e.campaign_id != id);
        Ok(())
    }

    // -- scenarios ---------------------------------------------------------

    fn list_scenarios(&self, campaign_id: &str) -> Result<Vec<Scenario>> {
        let inner = self.lock()?;
        let mut out: Vec<Scenario> = inner
            .scenarios
            .values()
            .filter(|s| s.campaign_id == campaign_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| {
            a.position
                .cmp(&b.position)
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        Ok(out)
    }

    fn insert_scenario(
        &self,
        campaign_id: &str,
        new: &NewScenario,
        position: i64,
    ) -> Result<Scenario> {
        let mut inner = self.lock()?;
        let id = inner.id("scn");
        let now = inner.stamp();
        let scenario = Scenario {
            id: id.clone(),
            campaign_id: campaign_id.to_string(),
            title: new.title.clone(),
            pack_code: new.pack_code.clone(),
            scenario_code: new.scenario_code.clone(),
            position,
            created_at: Some(now),
        };
        inner.scenarios.insert(id, scenario.clone());
        Ok(scenario)
    }

    fn set_scenario_position(&self, scenario_id: &str, position: i64) -> Result<()> {
        let mut inner = self.lock()?;
        let scenario = inner
            .scenarios
            .get_mut(scenario_id)
            .ok_or_else(|| RingshelfError::NotFound(format!("scenario {}", scenario_id)))?;
        scenario.position = position;
        Ok(())
    }

    // -- runs --------------------------------------------------------------

    fn list_runs(&self, campaign_id: &str) -> Result<Vec<Run>> {
        let inner = self.lock()?;
        let mut out: Vec<Run> = inner
            .runs
            .values()
            .filter(|r| r.campaign_id == campaign_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| {
            b.played_at
                .cmp(&a.played_at)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(out)
    }

    fn latest_run(&self, campaign_id: &str) -> Result<Option<Run>> {
        Ok(self.list_runs(campaign_id)?.into_iter().next())
    }

    fn insert_run(&self, campaign_id: &str, new: &NewRun) -> Result<Run> {
        let mut inner = self.lock()?;
        let id = inner.id("run");
        let now = inner.stamp();
        let run = Run {
            id: id.clone(),
            campaign_id: campaign_id.to_string(),
            scenario_id: new.scenario_id.clone(),
            played_at: new.played_at.clone().or_else(|| Some(now.clone())),
            result: new.result,
            score: new.score,
            threat_end: new.threat_end,
            rounds: new.rounds,
            notes: new.notes.clone(),
            created_at: Some(now),
        };
        inner.runs.insert(id, run.clone());
        Ok(run)
    }

    fn insert_run_decks(&self, run_id: &str, links: &[RunDeckLink]) -> Result<()> {
        let mut inner = self.lock()?;
        for link in links {
            inner.run_decks.push((run_id.to_string(), link.clone()));
        }
        Ok(())
    }

    fn run_decks(&self, run_id: &str) -> Result<Vec<RunDeckLink>> {
        let inner = self.lock()?;
        Ok(inner
            .run_decks
            .iter()
            .filter(|(id, _)| id.as_str() == run_id)
            .map(|(_, link)| link.clone())
            .collect())
    }

    // -- campaign state ----------------------------------------------------

    fn get_state(&self, campaign_id: &str) -> Result<Option<CampaignState>> {
        Ok(self.lock()?.states.get(campaign_id).cloned())
    }

    fn insert_state(&self, campaign_id: &str) -> Result<CampaignState> {
        let mut inner = self.lock()?;
        let now = inner.stamp();
        let state = CampaignState {
            campaign_id: campaign_id.to_string(),
            updated_at: Some(now),
            ..CampaignState::default()
        };
        inner.states.insert(campaign_id.to_string(), state.clone());
        Ok(state)
    }

    fn update_state(
        &self,
        campaign_id: &str,
        patch: &CampaignStatePatch,
    ) -> Result<Option<CampaignState>> {
        let mut inner = self.lock()?;
        let now = inner.stamp();
        let Some(state) = inner.states.get_mut(campaign_id) else {
            return Ok(None);
        };
        patch.apply(state);
        state.updated_at = Some(now);
        Ok(Some(state.clone()))
    }

    // -- campaign log ------------------------------------------------------

    fn append_log(&self, entry: &LogEntry) -> Result<()> {
        self.lock()?.log.push(entry.clone());
        Ok(())
    }

    fn list_log(&self, campaign_id: &str) -> Result<Vec<LogEntry>> {
        Ok(self
            .lock()?
            .log
            .iter()
            .filter(|e| e.campaign_id == campaign_id)
            .cloned()
            .collect())
    }

    // -- decks -------------------------------------------------------------

    fn list_decks(&self) -> Result<Vec<Deck>> {
        let inner = self.lock()?;
        let mut out: Vec<Deck> = inner.decks.values().cloned().collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    fn deck_summaries(&self) -> Result<Vec<DeckSummary>> {
        let inner = self.lock()?;
        let mut out = Vec::new();
        for deck in inner.decks.values() {
            let heroes: Vec<String> = inner
                .deck_heroes
                .iter()
                .filter(|(deck_id, _)| *deck_id == deck.id)
                .map(|(_, code)| code.clone())
                .collect();
            let cards: Vec<DeckCardRow> = inner
                .deck_cards
                .iter()
                .filter(|((deck_id, _), _)| *deck_id == deck.id)
                .map(|((_, code), qty)| DeckCardRow {
                    card_code: code.clone(),
                    qty: *qty,
                })
                .collect();
            out.push(DeckSummary {
                id: deck.id.clone(),
                name: deck.name.clone(),
                created_at: deck.created_at.clone(),
                updated_at: deck.updated_at.clone(),
                heroes,
                cards,
            });
        }
        out.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(out)
    }

    fn get_deck(&self, id: &str) -> Result<Option<Deck>> {
        Ok(self.lock()?.decks.get(id).cloned())
    }

    fn insert_deck(&self, name: &str) -> Result<Deck> {
        let mut inner = self.lock()?;
        let id = inner.id("dck");
        let now = inner.stamp();
        let deck = Deck {
            id: id.clone(),
            name: name.to_string(),
            created_at: Some(now.clone()),
            updated_at: Some(now),
        };
        inner.decks.insert(id, deck.clone());
        Ok(deck)
    }

    fn rename_deck(&self, id: &str, name: &str) -> Result<()> {
        let mut inner = self.lock()?;
        let now = inner.stamp();
        let deck = inner
            .decks
            .get_mut(id)
            .ok_or_else(|| RingshelfError::NotFound(format!("deck {}", id)))?;
        deck.name = name.to_string();
        deck.updated_at = Some(now);
        Ok(())
    }

    fn delete_deck_row(&self, id: &str) -> Result<()> {
        self.lock()?.decks.remove(id);
        Ok(())
    }

    fn deck_heroes(&self, deck_id: &str) -> Result<Vec<String>> {
        Ok(self
            .lock()?
            .deck_heroes
            .iter()
            .filter(|(id, _)| id.as_str() == deck_id)
            .map(|(_, code)| code.clone())
            .collect())
    }

    fn insert_deck_heroes(&self, deck_id: &str, codes: &[String]) -> Result<()> {
        let mut inner = self.lock()?;
        for code in codes {
            inner.deck_heroes.push((deck_id.to_string(), code.clone()));
        }
        inner.touch_deck(deck_id);
        Ok(())
    }

    fn delete_deck_heroes(&self, deck_id: &str) -> Result<()> {
        let mut inner = self.lock()?;
        inner.deck_heroes.retain(|(id, _)| id.as_str() != deck_id);
        inner.touch_deck(deck_id);
        Ok(())
    }

    fn deck_cards(&self, deck_id: &str) -> Result<Vec<DeckCardRow>> {
        Ok(self
            .lock()?
            .deck_cards
            .iter()
            .filter(|((id, _), _)| id.as_str() == deck_id)
            .map(|((_, code), qty)| DeckCardRow {
                card_code: code.clone(),
                qty: *qty,
            })
            .collect())
    }

    fn upsert_deck_card(&self, deck_id: &str, card_code: &str, qty: u32) -> Result<()> {
        let mut inner = self.lock()?;
        inner
            .deck_cards
            .insert((deck_id.to_string(), card_code.to_string()), qty);
        inner.touch_deck(deck_id);
        Ok(())
    }

    fn delete_deck_card(&self, deck_id: &str, card_code: &str) -> Result<()> {
        let mut inner = self.lock()?;
        inner
            .deck_cards
            .remove(&(deck_id.to_string(), card_code.to_string()));
        inner.touch_deck(deck_id);
        Ok(())
    }

    fn insert_deck_cards(&self, deck_id: &str, rows: &[DeckCardRow]) -> Result<()> {
        let mut inner = self.lock()?;
        for row in rows {
            inner
                .deck_cards
                .insert((deck_id.to_string(), row.card_code.clone()), row.qty);
        }
        inner.touch_deck(deck_id);
        Ok(())
    }

    fn delete_deck_cards(&self, deck_id: &str) -> Result<()> {
        let mut inner = self.lock()?;
        inner.deck_cards.retain(|(id, _), _| id.as_str() != deck_id);
        inner.touch_deck(deck_id);
        Ok(())
    }

    // -- collection --------------------------------------------------------

    fn owned_quantities(&self, codes: &[String]) -> Result<HashMap<String, u32>> {
        let inner = self.lock()?;
        Ok(codes
            .iter()
            .filter_map(|code| inner.owned.get(code).map(|qty| (code.clone(), *qty)))
            .collect())
    }

    fn upsert_owned(&self, rows: &[OwnedRow]) -> Result<()> {
        let mut inner = self.lock()?;
        for row in rows {
            inner.owned.insert(row.card_code.clone(), row.owned_qty);
        }
        Ok(())
    }

    fn list_packs(&self) -> Result<Vec<PackRow>> {
        let inner = self.lock()?;
        let mut out: Vec<PackRow> = inner.packs.values().cloned().collect();
        out.sort_by(|a, b| a.pack_name.cmp(&b.pack_name));
        Ok(out)
    }

    fn upsert_packs(&self, rows: &[PackRow]) -> Result<()> {
        let mut inner = self.lock()?;
        for row in rows {
            match inner.packs.get_mut(&row.pack_code) {
                // Catalog syncs must not clobber the household's choice.
                Some(existing) => existing.pack_name = row.pack_name.clone(),
                None => {
                    inner.packs.insert(row.pack_code.clone(), row.clone());
                }
            }
        }
        Ok(())
    }

    fn set_pack_enabled(&self, pack_code: &str, enabled: bool) -> Result<()> {
        let mut inner = self.lock()?;
        let pack = inner
            .packs
            .get_mut(pack_code)
            .ok_or_else(|| RingshelfError::NotFound(format!("pack {}", pack_code)))?;
        pack.enabled = enabled;
        Ok(())
    }

    // -- usage -------------------------------------------------------------

    fn usage_rows(&self, codes: &[String]) -> Result<Vec<UsageRow>> {
        let inner = self.lock()?;
        Ok(inner
            .deck_cards
            .iter()
            .filter(|((_, code), _)| codes.iter().any(|c| c == code))
            .map(|((deck_id, code), qty)| UsageRow {
                deck_id: deck_id.clone(),
                card_code: code.clone(),
                qty: *qty,
            })
            .collect())
    }

    fn deck_names(&self, deck_ids: &[String]) -> Result<HashMap<String, String>> {
        let inner = self.lock()?;
        Ok(deck_ids
            .iter()
            .filter_map(|id| inner.decks.get(id).map(|d| (id.clone(), d.name.clone())))
            .collect())
    }
}
