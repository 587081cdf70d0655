//! Collection operations: pack catalog sync and enablement, owned-copy
//! counts, and cross-deck usage aggregation.

use std::collections::HashMap;

use crate::client::CardsClient;
use crate::config;
use crate::error::{Result, RingshelfError};
use crate::models::{DeckUsage, OwnedRow, PackRow};
use crate::store::Store;

pub struct CollectionOps<'a> {
    store: &'a dyn Store,
    cards: &'a CardsClient,
}

impl<'a> CollectionOps<'a> {
    pub fn new(store: &'a dyn Store, cards: &'a CardsClient) -> Self {
        Self { store, cards }
    }

    // -- packs -------------------------------------------------------------

    /// Sync the pack catalog from the card API into the store and return the
    /// full pack list (name-sorted).
    ///
    /// Newly released packs are inserted with the default enablement;
    /// existing rows keep the household's choice.
    pub fn sync_packs(&self) -> Result<Vec<PackRow>> {
        let catalog = self.cards.fetch_packs()?;
        let rows: Vec<PackRow> = catalog
            .into_iter()
            .map(|p| PackRow {
                enabled: config::DEFAULT_ENABLED_PACKS.contains(&p.code.as_str()),
                pack_code: p.code,
                pack_name: p.name,
            })
            .collect();
        self.store.upsert_packs(&rows)?;
        self.store.list_packs()
    }

    pub fn list_packs(&self) -> Result<Vec<PackRow>> {
        self.store.list_packs()
    }

    pub fn set_pack_enabled(&self, pack_code: &str, enabled: bool) -> Result<()> {
        if pack_code.is_empty() {
            return Err(RingshelfError::InvalidArgument("pack_code required".into()));
        }
        self.store.set_pack_enabled(pack_code, enabled)
    }

    /// Codes of the currently enabled packs.
    pub fn enabled_pack_codes(&self) -> Result<Vec<String>> {
        Ok(self
            .store
            .list_packs()?
            .into_iter()
            .filter(|p| p.enabled)
            .map(|p| p.pack_code)
            .collect())
    }

    // -- owned quantities --------------------------------------------------

    pub fn owned(&self, codes: &[String]) -> Result<HashMap<String, u32>> {
        if codes.is_empty() {
            return Ok(HashMap::new());
        }
        self.store.owned_quantities(codes)
    }

    pub fn set_owned(&self, card_code: &str, owned_qty: u32) -> Result<()> {
        if card_code.is_empty() {
            return Err(RingshelfError::InvalidArgument("card_code required".into()));
        }
        self.store.upsert_owned(&[OwnedRow {
            card_code: card_code.to_string(),
            owned_qty,
        }])
    }

    pub fn set_owned_bulk(&self, rows: &[OwnedRow]) -> Result<()> {
        if rows.is_empty() {
            return Err(RingshelfError::InvalidArgument("No rows provided".into()));
        }
        self.store.upsert_owned(rows)
    }

    // -- usage -------------------------------------------------------------

    /// For each requested code, which decks use it and at what quantity.
    pub fn usage(&self, codes: &[String]) -> Result<HashMap<String, Vec<DeckUsage>>> {
        if codes.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = self.store.usage_rows(codes)?;
        let mut deck_ids: Vec<String> = rows.iter().map(|r| r.deck_id.clone()).collect();
        deck_ids.sort();
        deck_ids.dedup();
        let names = self.store.deck_names(&deck_ids)?;

        let mut usage: HashMap<String, Vec<DeckUsage>> = HashMap::new();
        for row in rows {
            let deck_name = names
                .get(&row.deck_id)
                .cloned()
                .unwrap_or_else(|| row.deck_id.clone());
            usage.entry(row.card_code).or_default().push(DeckUsage {
                deck_id: row.deck_id,
                deck_name,
                qty: row.qty,
            });
        }
        Ok(usage)
    }
}
