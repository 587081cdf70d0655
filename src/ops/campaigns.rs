//! Campaign operations: CRUD, ordered scenarios, run logging, narrative
//! state, and the append-only campaign log.

use serde_json::json;

use crate::client::CardsClient;
use crate::error::{Result, RingshelfError};
use crate::models::{
    Campaign, CampaignPatch, CampaignState, CampaignStatePatch, CampaignSummary, HeroName,
    LogEntry, NewRun, NewScenario, Run, RunDeckHeroes, RunDeckLink, Scenario,
};
use crate::ordering::{plan_swap, next_position, Direction};
use crate::store::Store;

/// How many distinct hero codes the latest-run view resolves to names.
const HERO_NAME_LOOKUP_CAP: usize = 24;

/// Query/command interface for campaigns, bound to the store and the card
/// client (hero-name resolution).
pub struct CampaignOps<'a> {
    store: &'a dyn Store,
    cards: &'a CardsClient,
}

impl<'a> CampaignOps<'a> {
    pub fn new(store: &'a dyn Store, cards: &'a CardsClient) -> Self {
        Self { store, cards }
    }

    // -- campaign CRUD -----------------------------------------------------

    pub fn list(&self) -> Result<Vec<Campaign>> {
        self.store.list_campaigns()
    }

    pub fn summaries(&self) -> Result<Vec<CampaignSummary>> {
        self.store.campaign_summaries()
    }

    pub fn get(&self, id: &str) -> Result<Campaign> {
        self.store
            .get_campaign(id)?
            .ok_or_else(|| RingshelfError::NotFound(format!("campaign {}", id)))
    }

    /// Create a campaign. Name is required; an empty ruleset falls back to
    /// `custom`.
    pub fn create(
        &self,
        name: &str,
        description: Option<&str>,
        ruleset: &str,
    ) -> Result<Campaign> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RingshelfError::InvalidArgument("Name is required".into()));
        }
        let ruleset = match ruleset.trim() {
            "" => "custom",
            r => r,
        };

        let campaign = self.store.insert_campaign(name, description, ruleset)?;
        self.store.append_log(&LogEntry {
            campaign_id: campaign.id.clone(),
            run_id: None,
            kind: "campaign_created".into(),
            message: format!("Campaign created: {}", campaign.name),
            meta: json!({ "ruleset": campaign.ruleset }),
        })?;
        Ok(campaign)
    }

    pub fn update(&self, id: &str, patch: &CampaignPatch) -> Result<Campaign> {
        if let Some(name) = &patch.name {
            if name.trim().is_empty() {
                return Err(RingshelfError::InvalidArgument("Name is required".into()));
            }
        }
        let campaign = self.store.update_campaign(id, patch)?;
        self.store.append_log(&LogEntry {
            campaign_id: id.to_string(),
            run_id: None,
            kind: "campaign_updated".into(),
            message: "Campaign updated".into(),
            meta: patch.to_json(),
        })?;
        Ok(campaign)
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        self.store.delete_campaign(id)
    }

    pub fn log(&self, campaign_id: &str) -> Result<Vec<LogEntry>> {
        self.store.list_log(campaign_id)
    }

    // -- scenarios ---------------------------------------------------------

    pub fn scenarios(&self, campaign_id: &str) -> Result<Vec<Scenario>> {
        self.store.list_scenarios(campaign_id)
    }

    /// Append a scenario at the end of the campaign's order.
    pub fn add_scenario(&self, campaign_id: &str, new: &NewScenario) -> Result<Scenario> {
        if new.title.trim().is_empty() {
            return Err(RingshelfError::InvalidArgument("Title is required".into()));
        }
        let existing = self.store.list_scenarios(campaign_id)?;
        let position = next_position(&existing);

        let mut new = new.clone();
        new.title = new.title.trim().to_string();
        let scenario = self.store.insert_scenario(campaign_id, &new, position)?;

        self.store.append_log(&LogEntry {
            campaign_id: campaign_id.to_string(),
            run_id: None,
            kind: "scenario_added".into(),
            message: format!("Scenario added: {}", scenario.title),
            meta: json!({ "scenario_id": scenario.id }),
        })?;
        Ok(scenario)
    }

    /// Move a scenario one step up or down.
    ///
    /// Boundary moves (first up, last down) are successful no-ops. The swap
    /// is two independent position writes; if the second fails the first is
    /// rolled back, and only when that compensation also fails does the
    /// distinct `PartiallyApplied` error surface.
    pub fn reorder_scenario(
        &self,
        campaign_id: &str,
        scenario_id: &str,
        direction: Direction,
    ) -> Result<()> {
        let scenarios = self.store.list_scenarios(campaign_id)?;
        let Some(plan) = plan_swap(&scenarios, scenario_id, direction)? else {
            return Ok(());
        };

        self.store
            .set_scenario_position(&plan.first.scenario_id, plan.first.position)?;

        if let Err(second_err) = self
            .store
            .set_scenario_position(&plan.second.scenario_id, plan.second.position)
        {
            return match self
                .store
                .set_scenario_position(&plan.rollback.scenario_id, plan.rollback.position)
            {
                Ok(()) => Err(second_err),
                Err(_) => Err(RingshelfError::PartiallyApplied(format!(
                    "position swap for scenario {} committed one of two writes: {}",
                    scenario_id, second_err
                ))),
            };
        }
        Ok(())
    }

    // -- runs --------------------------------------------------------------

    pub fn runs(&self, campaign_id: &str) -> Result<Vec<Run>> {
        self.store.list_runs(campaign_id)
    }

    /// Log a played run, link its decks, and append a campaign-log entry.
    pub fn log_run(&self, campaign_id: &str, new: &NewRun) -> Result<Run> {
        let run = self.store.insert_run(campaign_id, new)?;

        let links: Vec<RunDeckLink> = new
            .deck_links
            .iter()
            .filter(|l| !l.deck_id.is_empty())
            .cloned()
            .collect();
        if !links.is_empty() {
            self.store.insert_run_decks(&run.id, &links)?;
        }

        let deck_ids: Vec<String> = links.iter().map(|l| l.deck_id.clone()).collect();
        self.store.append_log(&LogEntry {
            campaign_id: campaign_id.to_string(),
            run_id: Some(run.id.clone()),
            kind: "run_created".into(),
            message: format!("Run logged: {}", run.result.as_str()),
            meta: json!({
                "scenario_id": run.scenario_id.clone(),
                "deck_ids": deck_ids,
                "deck_links": links,
            }),
        })?;

        Ok(run)
    }

    /// The most recent run with its decks' hero codes resolved to display
    /// names (best effort -- unknown codes keep a `None` name).
    pub fn latest_run_decks(
        &self,
        campaign_id: &str,
    ) -> Result<Option<(Run, Vec<RunDeckHeroes>)>> {
        let Some(run) = self.store.latest_run(campaign_id)? else {
            return Ok(None);
        };

        let links = self.store.run_decks(&run.id)?;
        let deck_ids: Vec<String> = links.iter().map(|l| l.deck_id.clone()).collect();
        if deck_ids.is_empty() {
            return Ok(Some((run, Vec::new())));
        }

        let names = self.store.deck_names(&deck_ids)?;

        let mut decks = Vec::new();
        let mut unique_codes: Vec<String> = Vec::new();
        for link in &links {
            let Some(name) = names.get(&link.deck_id) else {
                continue; // deck deleted since the run was logged
            };
            let hero_codes = self.store.deck_heroes(&link.deck_id)?;
            for code in &hero_codes {
                if !unique_codes.contains(code) && unique_codes.len() < HERO_NAME_LOOKUP_CAP {
                    unique_codes.push(code.clone());
                }
            }
            decks.push((link.clone(), name.clone(), hero_codes));
        }

        let resolved: Vec<(String, Option<String>)> = unique_codes
            .iter()
            .map(|code| (code.clone(), self.cards.card_name(code)))
            .collect();

        let out = decks
            .into_iter()
            .map(|(link, name, hero_codes)| RunDeckHeroes {
                id: link.deck_id,
                name,
                role: link.role,
                heroes: hero_codes
                    .into_iter()
                    .map(|code| HeroName {
                        name: resolved
                            .iter()
                            .find(|(c, _)| *c == code)
                            .and_then(|(_, n)| n.clone()),
                        code,
                    })
                    .collect(),
            })
            .collect();

        Ok(Some((run, out)))
    }

    // -- narrative state ---------------------------------------------------

    /// The campaign's state row, created on first access.
    pub fn state(&self, campaign_id: &str) -> Result<CampaignState> {
        match self.store.get_state(campaign_id)? {
            Some(state) => Ok(state),
            None => self.store.insert_state(campaign_id),
        }
    }

    /// Apply a partial state update, inserting the row first when the
    /// campaign has none yet.
    pub fn patch_state(
        &self,
        campaign_id: &str,
        patch: &CampaignStatePatch,
    ) -> Result<CampaignState> {
        if let Some(updated) = self.store.update_state(campaign_id, patch)? {
            return Ok(updated);
        }
        self.store.insert_state(campaign_id)?;
        self.store
            .update_state(campaign_id, patch)?
            .ok_or_else(|| {
                RingshelfError::Store(format!(
                    "state row for campaign {} vanished during upsert",
                    campaign_id
                ))
            })
    }
}
