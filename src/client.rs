//! Client for the public card database API.
//!
//! Read-only, third-party-owned. All responses pass through the on-disk
//! [`ApiCache`], so repeated pack loads (deck building, index construction)
//! do not hammer the service.

use std::cell::RefCell;

use serde_json::Value;

use crate::cache::ApiCache;
use crate::config;
use crate::decklist::CardIndex;
use crate::error::Result;
use crate::models::{Card, Pack};

pub struct CardsClient {
    /// The cache used to fetch/locate API responses.
    pub cache: RefCell<ApiCache>,
}

impl CardsClient {
    pub fn new(cache: ApiCache) -> Self {
        Self {
            cache: RefCell::new(cache),
        }
    }

    /// Fetch the pack catalog.
    ///
    /// The API sometimes returns an array and sometimes an object keyed by
    /// pack code; both shapes are accepted.
    pub fn fetch_packs(&self) -> Result<Vec<Pack>> {
        let data = self
            .cache
            .borrow_mut()
            .load_json(config::PACKS_URL, "packs.json")?;

        let items: Vec<Value> = match data {
            Value::Array(arr) => arr,
            Value::Object(map) => map.into_values().collect(),
            _ => Vec::new(),
        };

        let mut packs = Vec::with_capacity(items.len());
        for item in items {
            packs.push(serde_json::from_value(item)?);
        }
        Ok(packs)
    }

    /// Fetch all cards of one pack.
    pub fn fetch_cards_by_pack(&self, pack_code: &str) -> Result<Vec<Card>> {
        let url = format!("{}/cards/{}.json", config::API_BASE, pack_code);
        let data = self
            .cache
            .borrow_mut()
            .load_json(&url, &config::pack_cache_file(pack_code))?;
        Ok(serde_json::from_value(data)?)
    }

    /// Fetch a single card by code.
    pub fn fetch_card(&self, code: &str) -> Result<Card> {
        let url = format!("{}/card/{}.json", config::API_BASE, code);
        let data = self
            .cache
            .borrow_mut()
            .load_json(&url, &config::card_cache_file(code))?;
        Ok(serde_json::from_value(data)?)
    }

    /// Best-effort display name for a card code; lookup failures (unknown
    /// code, API unreachable with a cold cache) resolve to `None`.
    pub fn card_name(&self, code: &str) -> Option<String> {
        self.fetch_card(code).ok().map(|c| c.name)
    }

    /// The combined player-card pool of the given packs (encounter and
    /// quest cards filtered out).
    pub fn player_cards_for_packs(&self, pack_codes: &[String]) -> Result<Vec<Card>> {
        let mut all = Vec::new();
        for code in pack_codes {
            let cards = self.fetch_cards_by_pack(code)?;
            all.extend(cards.into_iter().filter(Card::is_player_card));
        }
        Ok(all)
    }

    /// Build a display-metadata index over the given packs' player cards.
    pub fn card_index_for_packs(&self, pack_codes: &[String]) -> Result<CardIndex> {
        let cards = self.player_cards_for_packs(pack_codes)?;
        Ok(CardIndex::from_cards(cards.iter()))
    }
}
