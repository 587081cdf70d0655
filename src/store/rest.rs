//! REST [`Store`] implementation for the hosted relational store.
//!
//! The hosted service exposes a PostgREST-style JSON dialect: one table (or
//! view) per path segment, filters and ordering as query parameters, writes
//! as POST/PATCH/DELETE with `Prefer` headers controlling upsert resolution
//! and returned representations. Every trait method is a single round trip;
//! nothing here opens a transaction (spec'd behavior -- the ops layer
//! compensates when a multi-write sequence fails halfway).

use std::collections::HashMap;
use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use crate::error::{Result, RingshelfError};
use crate::models::{
    Campaign, CampaignPatch, CampaignState, CampaignStatePatch, CampaignSummary, Deck,
    DeckCardRow, DeckSummary, LogEntry, NewRun, NewScenario, OwnedRow, PackRow, Run,
    RunDeckLink, Scenario,
};
use crate::query_builder::QueryBuilder;
use crate::store::{Store, UsageRow};

pub struct RestStore {
    base_url: String,
    client: Client,
}

impl RestStore {
    /// Create a store client for the given REST root (e.g.
    /// `https://example.supabase.co/rest/v1`) and service key.
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(api_key)
            .map_err(|_| RingshelfError::InvalidArgument("invalid store API key".into()))?;
        headers.insert("apikey", key.clone());
        let bearer = HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|_| RingshelfError::InvalidArgument("invalid store API key".into()))?;
        headers.insert("Authorization", bearer);

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, table: &str) -> String {
        format!("{}/{}", self.base_url, table)
    }

    /// Turn a non-success response into a `Store` error carrying the
    /// service's own message as verbatim as possible.
    fn check(resp: Response) -> Result<Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| {
                v.get("message")
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .unwrap_or(body);
        Err(RingshelfError::Store(format!("{}: {}", status, message)))
    }

    fn fetch<T: DeserializeOwned>(&self, table: &str, query: &QueryBuilder) -> Result<Vec<T>> {
        let resp = self
            .client
            .get(self.url(table))
            .query(&query.build())
            .send()?;
        let resp = Self::check(resp)?;
        Ok(resp.json()?)
    }

    fn send_rows<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<Vec<T>> {
        let resp = req.header("Prefer", "return=representation").send()?;
        let resp = Self::check(resp)?;
        Ok(resp.json()?)
    }

    fn send_ok(&self, req: RequestBuilder) -> Result<()> {
        let resp = req.send()?;
        Self::check(resp)?;
        Ok(())
    }

    /// Insert rows and return the single created row.
    fn insert_one<T: DeserializeOwned>(
        &self,
        table: &str,
        body: serde_json::Value,
    ) -> Result<T> {
        let rows: Vec<T> =
            self.send_rows(self.client.post(self.url(table)).json(&body))?;
        rows.into_iter().next().ok_or_else(|| {
            RingshelfError::Store(format!("insert into {} returned no rows", table))
        })
    }
}

#[derive(Deserialize)]
struct HeroRow {
    card_code: String,
}

#[derive(Deserialize)]
struct NameRow {
    id: String,
    name: String,
}

impl Store for RestStore {
    // -- campaigns ---------------------------------------------------------

    fn list_campaigns(&self) -> Result<Vec<Campaign>> {
        self.fetch(
            "campaigns",
            QueryBuilder::new().order_desc("updated_at"),
        )
    }

    fn campaign_summaries(&self) -> Result<Vec<CampaignSummary>> {
        self.fetch(
            "campaign_summaries",
            QueryBuilder::new().order_desc("updated_at"),
        )
    }

    fn get_campaign(&self, id: &str) -> Result<Option<Campaign>> {
        let rows: Vec<Campaign> =
            self.fetch("campaigns", QueryBuilder::new().where_eq("id", id).limit(1))?;
        Ok(rows.into_iter().next())
    }

    fn insert_campaign(
        &self,
        name: &str,
        description: Option<&str>,
        ruleset: &str,
    ) -> Result<Campaign> {
        self.insert_one(
            "campaigns",
            json!([{ "name": name, "description": description, "ruleset": ruleset }]),
        )
    }

    fn update_campaign(&self, id: &str, patch: &CampaignPatch) -> Result<Campaign> {
        let rows: Vec<Campaign> = self.send_rows(
            self.client
                .patch(self.url("campaigns"))
                .query(&QueryBuilder::new().where_eq("id", id).build())
                .json(&patch.to_json()),
        )?;
        rows.into_iter()
            .next()
            .ok_or_else(|| RingshelfError::NotFound(format!("campaign {}", id)))
    }

    fn delete_campaign(&self, id: &str) -> Result<()> {
        self.send_ok(
            self.client
                .delete(self.url("campaigns"))
                .query(&QueryBuilder::new().where_eq("id", id).build()),
        )
    }

    // -- scenarios ---------------------------------------------------------

    fn list_scenarios(&self, campaign_id: &str) -> Result<Vec<Scenario>> {
        self.fetch(
            "campaign_scenarios",
            QueryBuilder::new()
                .where_eq("campaign_id", campaign_id)
                .order_asc("position")
                .order_asc("created_at"),
        )
    }

    fn insert_scenario(
        &self,
        campaign_id: &str,
        new: &NewScenario,
        position: i64,
    ) -> Result<Scenario> {
        self.insert_one(
            "campaign_scenarios",
            json!([{
                "campaign_id": campaign_id,
                "title": new.title,
                "pack_code": new.pack_code,
                "scenario_code": new.scenario_code,
                "position": position,
            }]),
        )
    }

    fn set_scenario_position(&self, scenario_id: &str, position: i64) -> Result<()> {
        let rows: Vec<serde_json::Value> = self.send_rows(
            self.client
                .patch(self.url("campaign_scenarios"))
                .query(&QueryBuilder::new().where_eq("id", scenario_id).build())
                .json(&json!({ "position": position })),
        )?;
        if rows.is_empty() {
            return Err(RingshelfError::NotFound(format!(
                "scenario {}",
                scenario_id
            )));
        }
        Ok(())
    }

    // -- runs --------------------------------------------------------------

    fn list_runs(&self, campaign_id: &str) -> Result<Vec<Run>> {
        self.fetch(
            "campaign_runs",
            QueryBuilder::new()
                .where_eq("campaign_id", campaign_id)
                .order_desc("played_at")
                .order_desc("created_at"),
        )
    }

    fn latest_run(&self, campaign_id: &str) -> Result<Option<Run>> {
        let rows: Vec<Run> = self.fetch(
            "campaign_runs",
            QueryBuilder::new()
                .where_eq("campaign_id", campaign_id)
                .order_desc("played_at")
                .order_desc("created_at")
                .limit(1),
        )?;
        Ok(rows.into_iter().next())
    }

    fn insert_run(&self, campaign_id: &str, new: &NewRun) -> Result<Run> {
        let mut body = serde_json::Map::new();
        body.insert("campaign_id".into(), json!(campaign_id));
        body.insert("scenario_id".into(), json!(new.scenario_id));
        if let Some(played_at) = &new.played_at {
            // Omitted entirely when unset so the store applies its default.
            body.insert("played_at".into(), json!(played_at));
        }
        body.insert("result".into(), json!(new.result));
        body.insert("score".into(), json!(new.score));
        body.insert("threat_end".into(), json!(new.threat_end));
        body.insert("rounds".into(), json!(new.rounds));
        body.insert("notes".into(), json!(new.notes));
        self.insert_one("campaign_runs", json!([body]))
    }

    fn insert_run_decks(&self, run_id: &str, links: &[RunDeckLink]) -> Result<()> {
        let rows: Vec<serde_json::Value> = links
            .iter()
            .map(|l| json!({ "run_id": run_id, "deck_id": l.deck_id, "role": l.role }))
            .collect();
        self.send_ok(self.client.post(self.url("campaign_run_decks")).json(&rows))
    }

    fn run_decks(&self, run_id: &str) -> Result<Vec<RunDeckLink>> {
        self.fetch(
            "campaign_run_decks",
            QueryBuilder::new()
                .select(&["deck_id", "role"])
                .where_eq("run_id", run_id),
        )
    }

    // -- campaign state ----------------------------------------------------

    fn get_state(&self, campaign_id: &str) -> Result<Option<CampaignState>> {
        let rows: Vec<CampaignState> = self.fetch(
            "campaign_state",
            QueryBuilder::new()
                .where_eq("campaign_id", campaign_id)
                .limit(1),
        )?;
        Ok(rows.into_iter().next())
    }

    fn insert_state(&self, campaign_id: &str) -> Result<CampaignState> {
        self.insert_one("campaign_state", json!([{ "campaign_id": campaign_id }]))
    }

    fn update_state(
        &self,
        campaign_id: &str,
        patch: &CampaignStatePatch,
    ) -> Result<Option<CampaignState>> {
        let rows: Vec<CampaignState> = self.send_rows(
            self.client
                .patch(self.url("campaign_state"))
                .query(
                    &QueryBuilder::new()
                        .where_eq("campaign_id", campaign_id)
                        .build(),
                )
                .json(&patch.to_json()),
        )?;
        Ok(rows.into_iter().next())
    }

    // -- campaign log ------------------------------------------------------

    fn append_log(&self, entry: &LogEntry) -> Result<()> {
        self.send_ok(
            self.client
                .post(self.url("campaign_log"))
                .json(&json!([entry])),
        )
    }

    fn list_log(&self, campaign_id: &str) -> Result<Vec<LogEntry>> {
        self.fetch(
            "campaign_log",
            QueryBuilder::new()
                .where_eq("campaign_id", campaign_id)
                .order_asc("created_at"),
        )
    }

    // -- decks -------------------------------------------------------------

    fn list_decks(&self) -> Result<Vec<Deck>> {
        self.fetch(
            "decks",
            QueryBuilder::new()
                .select(&["id", "name", "created_at", "updated_at"])
                .order_desc("created_at"),
        )
    }

    fn deck_summaries(&self) -> Result<Vec<DeckSummary>> {
        self.fetch(
            "deck_summaries",
            QueryBuilder::new().order_desc("updated_at"),
        )
    }

    fn get_deck(&self, id: &str) -> Result<Option<Deck>> {
        let rows: Vec<Deck> =
            self.fetch("decks", QueryBuilder::new().where_eq("id", id).limit(1))?;
        Ok(rows.into_iter().next())
    }

    fn insert_deck(&self, name: &str) -> Result<Deck> {
        self.insert_one("decks", json!([{ "name": name }]))
    }

    fn rename_deck(&self, id: &str, name: &str) -> Result<()> {
        let rows: Vec<serde_json::Value> = self.send_rows(
            self.client
                .patch(self.url("decks"))
                .query(&QueryBuilder::new().where_eq("id", id).build())
                .json(&json!({ "name": name })),
        )?;
        if rows.is_empty() {
            return Err(RingshelfError::NotFound(format!("deck {}", id)));
        }
        Ok(())
    }

    fn delete_deck_row(&self, id: &str) -> Result<()> {
        self.send_ok(
            self.client
                .delete(self.url("decks"))
                .query(&QueryBuilder::new().where_eq("id", id).build()),
        )
    }

    fn deck_heroes(&self, deck_id: &str) -> Result<Vec<String>> {
        let rows: Vec<HeroRow> = self.fetch(
            "deck_heroes",
            QueryBuilder::new()
                .select(&["card_code"])
                .where_eq("deck_id", deck_id),
        )?;
        Ok(rows.into_iter().map(|r| r.card_code).collect())
    }

    fn insert_deck_heroes(&self, deck_id: &str, codes: &[String]) -> Result<()> {
        let rows: Vec<serde_json::Value> = codes
            .iter()
            .map(|code| json!({ "deck_id": deck_id, "card_code": code }))
            .collect();
        self.send_ok(self.client.post(self.url("deck_heroes")).json(&rows))
    }

    fn delete_deck_heroes(&self, deck_id: &str) -> Result<()> {
        self.send_ok(
            self.client
                .delete(self.url("deck_heroes"))
                .query(&QueryBuilder::new().where_eq("deck_id", deck_id).build()),
        )
    }

    fn deck_cards(&self, deck_id: &str) -> Result<Vec<DeckCardRow>> {
        self.fetch(
            "deck_cards",
            QueryBuilder::new()
                .select(&["card_code", "qty"])
                .where_eq("deck_id", deck_id),
        )
    }

    fn upsert_deck_card(&self, deck_id: &str, card_code: &str, qty: u32) -> Result<()> {
        self.send_ok(
            self.client
                .post(self.url("deck_cards"))
                .query(
                    &QueryBuilder::new()
                        .on_conflict("deck_id,card_code")
                        .build(),
                )
                .header("Prefer", "resolution=merge-duplicates")
                .json(&json!([{
                    "deck_id": deck_id,
                    "card_code": card_code,
                    "qty": qty,
                }])),
        )
    }

    fn delete_deck_card(&self, deck_id: &str, card_code: &str) -> Result<()> {
        self.send_ok(
            self.client.delete(self.url("deck_cards")).query(
                &QueryBuilder::new()
                    .where_eq("deck_id", deck_id)
                    .where_eq("card_code", card_code)
                    .build(),
            ),
        )
    }

    fn insert_deck_cards(&self, deck_id: &str, rows: &[DeckCardRow]) -> Result<()> {
        let body: Vec<serde_json::Value> = rows
            .iter()
            .map(|r| json!({ "deck_id": deck_id, "card_code": r.card_code, "qty": r.qty }))
            .collect();
        self.send_ok(self.client.post(self.url("deck_cards")).json(&body))
    }

    fn delete_deck_cards(&self, deck_id: &str) -> Result<()> {
        self.send_ok(
            self.client
                .delete(self.url("deck_cards"))
                .query(&QueryBuilder::new().where_eq("deck_id", deck_id).build()),
        )
    }

    // -- collection --------------------------------------------------------

    fn owned_quantities(&self, codes: &[String]) -> Result<HashMap<String, u32>> {
        if codes.is_empty() {
            return Ok(HashMap::new());
        }
        let refs: Vec<&str> = codes.iter().map(String::as_str).collect();
        let rows: Vec<OwnedRow> = self.fetch(
            "collection_cards",
            QueryBuilder::new()
                .select(&["card_code", "owned_qty"])
                .where_in("card_code", &refs),
        )?;
        Ok(rows
            .into_iter()
            .map(|r| (r.card_code, r.owned_qty))
            .collect())
    }

    fn upsert_owned(&self, rows: &[OwnedRow]) -> Result<()> {
        self.send_ok(
            self.client
                .post(self.url("collection_cards"))
                .query(&QueryBuilder::new().on_conflict("card_code").build())
                .header("Prefer", "resolution=merge-duplicates")
                .json(rows),
        )
    }

    fn list_packs(&self) -> Result<Vec<PackRow>> {
        self.fetch(
            "collection_packs",
            QueryBuilder::new()
                .select(&["pack_code", "pack_name", "enabled"])
                .order_asc("pack_name"),
        )
    }

    fn upsert_packs(&self, rows: &[PackRow]) -> Result<()> {
        // ignore-duplicates: catalog syncs insert newly released packs but
        // never clobber the household's enablement choices.
        self.send_ok(
            self.client
                .post(self.url("collection_packs"))
                .query(&QueryBuilder::new().on_conflict("pack_code").build())
                .header("Prefer", "resolution=ignore-duplicates")
                .json(rows),
        )
    }

    fn set_pack_enabled(&self, pack_code: &str, enabled: bool) -> Result<()> {
        let rows: Vec<serde_json::Value> = self.send_rows(
            self.client
                .patch(self.url("collection_packs"))
                .query(&QueryBuilder::new().where_eq("pack_code", pack_code).build())
                .json(&json!({ "enabled": enabled })),
        )?;
        if rows.is_empty() {
            return Err(RingshelfError::NotFound(format!("pack {}", pack_code)));
        }
        Ok(())
    }

    // -- usage -------------------------------------------------------------

    fn usage_rows(&self, codes: &[String]) -> Result<Vec<UsageRow>> {
        if codes.is_empty() {
            return Ok(Vec::new());
        }
        #[derive(Deserialize)]
        struct Row {
            deck_id: String,
            card_code: String,
            qty: u32,
        }
        let refs: Vec<&str> = codes.iter().map(String::as_str).collect();
        let rows: Vec<Row> = self.fetch(
            "deck_cards",
            QueryBuilder::new()
                .select(&["deck_id", "card_code", "qty"])
                .where_in("card_code", &refs),
        )?;
        Ok(rows
            .into_iter()
            .map(|r| UsageRow {
                deck_id: r.deck_id,
                card_code: r.card_code,
                qty: r.qty,
            })
            .collect())
    }

    fn deck_names(&self, deck_ids: &[String]) -> Result<HashMap<String, String>> {
        if deck_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let refs: Vec<&str> = deck_ids.iter().map(String::as_str).collect();
        let rows: Vec<NameRow> = self.fetch(
            "decks",
            QueryBuilder::new()
                .select(&["id", "name"])
                .where_in("id", &refs),
        )?;
        Ok(rows.into_iter().map(|r| (r.id, r.name)).collect())
    }
}
