//! Deck operations: CRUD, hero/card writes, full-replacement import and
//! text export, plus the summary aggregations the deck shelf renders.

use std::collections::HashMap;

use serde::Serialize;

use crate::client::CardsClient;
use crate::config;
use crate::decklist::{decode_deck, encode_deck, CardIndex};
use crate::error::{Result, RingshelfError};
use crate::models::{Deck, DeckCardRow, DeckContents, DeckSummary};
use crate::store::Store;

/// A deck with its heroes and main-deck rows, as served by the detail
/// endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct DeckDetail {
    pub deck: Deck,
    pub heroes: Vec<String>,
    pub cards: Vec<DeckCardRow>,
}

pub struct DeckOps<'a> {
    store: &'a dyn Store,
    cards: &'a CardsClient,
}

impl<'a> DeckOps<'a> {
    pub fn new(store: &'a dyn Store, cards: &'a CardsClient) -> Self {
        Self { store, cards }
    }

    // -- CRUD --------------------------------------------------------------

    pub fn list(&self) -> Result<Vec<Deck>> {
        self.store.list_decks()
    }

    pub fn summaries(&self) -> Result<Vec<DeckSummary>> {
        self.store.deck_summaries()
    }

    pub fn get(&self, id: &str) -> Result<DeckDetail> {
        let deck = self
            .store
            .get_deck(id)?
            .ok_or_else(|| RingshelfError::NotFound(format!("deck {}", id)))?;
        let heroes = self.store.deck_heroes(id)?;
        let cards = self.store.deck_cards(id)?;
        Ok(DeckDetail {
            deck,
            heroes,
            cards,
        })
    }

    pub fn create(&self, name: &str) -> Result<Deck> {
        let name = match name.trim() {
            "" => "New Deck",
            n => n,
        };
        self.store.insert_deck(name)
    }

    pub fn rename(&self, id: &str, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RingshelfError::InvalidArgument("name required".into()));
        }
        self.store.rename_deck(id, name)
    }

    /// Delete a deck and its children. Children go first (the hosted store
    /// has no cascading delete on these tables); a failure after the first
    /// delete triggers a restore of the snapshot taken up front.
    pub fn delete(&self, id: &str) -> Result<()> {
        let heroes = self.store.deck_heroes(id)?;
        let cards = self.store.deck_cards(id)?;

        let result = (|| -> Result<()> {
            self.store.delete_deck_heroes(id)?;
            self.store.delete_deck_cards(id)?;
            self.store.delete_deck_row(id)?;
            Ok(())
        })();

        if let Err(err) = result {
            return Err(self.restore_children(id, &heroes, &cards, err));
        }
        Ok(())
    }

    // -- heroes and cards --------------------------------------------------

    /// Replace the hero assignment (1 to 3 card codes).
    pub fn set_heroes(&self, deck_id: &str, heroes: &[String]) -> Result<()> {
        if heroes.is_empty() || heroes.len() > config::MAX_HEROES {
            return Err(RingshelfError::InvalidArgument(
                "heroes must be 1 to 3 card codes".into(),
            ));
        }

        let prior = self.store.deck_heroes(deck_id)?;
        self.store.delete_deck_heroes(deck_id)?;
        if let Err(err) = self.store.insert_deck_heroes(deck_id, heroes) {
            // Hero-only sequence, hero-only restore.
            let restored = (|| -> Result<()> {
                self.store.delete_deck_heroes(deck_id)?;
                if !prior.is_empty() {
                    self.store.insert_deck_heroes(deck_id, &prior)?;
                }
                Ok(())
            })();
            return Err(match restored {
                Ok(()) => err,
                Err(_) => RingshelfError::PartiallyApplied(format!(
                    "deck {} left without heroes: {}",
                    deck_id, err
                )),
            });
        }
        Ok(())
    }

    /// Set one main-deck quantity; zero removes the row.
    pub fn set_card_qty(&self, deck_id: &str, card_code: &str, qty: u32) -> Result<()> {
        if card_code.is_empty() {
            return Err(RingshelfError::InvalidArgument("card_code required".into()));
        }
        if qty == 0 {
            self.store.delete_deck_card(deck_id, card_code)
        } else {
            self.store.upsert_deck_card(deck_id, card_code, qty)
        }
    }

    /// Full replacement: all prior heroes and quantities are discarded and
    /// replaced by `contents`. Anything not mentioned ends up absent.
    ///
    /// The store offers no transaction spanning the four writes, so a
    /// snapshot is taken first and restored on partial failure; only a
    /// failed restore surfaces as `PartiallyApplied`.
    pub fn replace(&self, deck_id: &str, contents: &DeckContents) -> Result<()> {
        if contents.heroes.len() > config::MAX_HEROES {
            return Err(RingshelfError::InvalidArgument(
                "Too many heroes (max 3)".into(),
            ));
        }

        let prior_heroes = self.store.deck_heroes(deck_id)?;
        let prior_cards = self.store.deck_cards(deck_id)?;

        let result = (|| -> Result<()> {
            self.store.delete_deck_heroes(deck_id)?;
            self.store.delete_deck_cards(deck_id)?;
            if !contents.heroes.is_empty() {
                self.store.insert_deck_heroes(deck_id, &contents.heroes)?;
            }
            let rows = contents.card_rows();
            if !rows.is_empty() {
                self.store.insert_deck_cards(deck_id, &rows)?;
            }
            Ok(())
        })();

        if let Err(err) = result {
            return Err(self.restore_children(deck_id, &prior_heroes, &prior_cards, err));
        }
        Ok(())
    }

    /// Best-effort restore of a deck's children after a failed multi-write
    /// sequence. Returns the original error when the restore succeeds, the
    /// distinct partially-applied error when it does not.
    fn restore_children(
        &self,
        deck_id: &str,
        heroes: &[String],
        cards: &[DeckCardRow],
        err: RingshelfError,
    ) -> RingshelfError {
        let restored = (|| -> Result<()> {
            self.store.delete_deck_heroes(deck_id)?;
            self.store.delete_deck_cards(deck_id)?;
            if !heroes.is_empty() {
                self.store.insert_deck_heroes(deck_id, heroes)?;
            }
            if !cards.is_empty() {
                self.store.insert_deck_cards(deck_id, cards)?;
            }
            Ok(())
        })();

        match restored {
            Ok(()) => err,
            Err(_) => RingshelfError::PartiallyApplied(format!(
                "deck {} left with partial contents: {}",
                deck_id, err
            )),
        }
    }

    // -- text import/export ------------------------------------------------

    /// Parse pasted deck-list text and apply it as a full replacement.
    ///
    /// Text in which nothing is recognizable fails with the dedicated
    /// empty-import error instead of silently wiping the deck.
    pub fn import_text(&self, deck_id: &str, text: &str) -> Result<DeckContents> {
        let contents = decode_deck(text);
        if contents.is_empty() {
            return Err(RingshelfError::EmptyImport);
        }
        self.replace(deck_id, &contents)?;
        Ok(contents)
    }

    /// Render a deck as copyable text, resolving display names against the
    /// enabled packs' card pool.
    pub fn export_text(&self, deck_id: &str) -> Result<String> {
        let detail = self.get(deck_id)?;
        let contents = DeckContents::from_parts(
            detail.heroes,
            detail
                .cards
                .into_iter()
                .map(|row| (row.card_code, row.qty)),
        );
        let index = self.enabled_card_index()?;
        Ok(encode_deck(&detail.deck.name, &contents, &index))
    }

    /// Display-metadata index over the currently enabled packs.
    pub fn enabled_card_index(&self) -> Result<CardIndex> {
        let enabled: Vec<String> = self
            .store
            .list_packs()?
            .into_iter()
            .filter(|p| p.enabled)
            .map(|p| p.pack_code)
            .collect();
        self.cards.card_index_for_packs(&enabled)
    }
}

// ---------------------------------------------------------------------------
// Summary aggregations
// ---------------------------------------------------------------------------

/// Total main-deck cards (hero codes excluded even if present in the rows).
pub fn deck_main_size(summary: &DeckSummary) -> u32 {
    summary
        .cards
        .iter()
        .filter(|c| !summary.heroes.contains(&c.card_code))
        .map(|c| c.qty)
        .sum()
}

/// Main-deck quantities grouped by type code; unknown metadata counts as
/// `other`.
pub fn deck_type_counts(summary: &DeckSummary, index: &CardIndex) -> HashMap<String, u32> {
    let mut out = HashMap::new();
    for c in &summary.cards {
        if summary.heroes.contains(&c.card_code) {
            continue;
        }
        let t = index
            .type_code(&c.card_code)
            .unwrap_or("other")
            .to_lowercase();
        *out.entry(t).or_insert(0) += c.qty;
    }
    out
}

/// Main-deck quantities grouped by sphere code; unknown metadata counts as
/// `unknown`.
pub fn deck_sphere_counts(summary: &DeckSummary, index: &CardIndex) -> HashMap<String, u32> {
    let mut out = HashMap::new();
    for c in &summary.cards {
        if summary.heroes.contains(&c.card_code) {
            continue;
        }
        let s = index
            .sphere_code(&c.card_code)
            .unwrap_or("unknown")
            .to_lowercase();
        *out.entry(s).or_insert(0) += c.qty;
    }
    out
}

/// The deck's up-to-three most represented spheres, heaviest first.
pub fn deck_primary_spheres(summary: &DeckSummary, index: &CardIndex) -> Vec<String> {
    let counts = deck_sphere_counts(summary, index);
    let mut entries: Vec<(String, u32)> = counts
        .into_iter()
        .filter(|(sphere, _)| sphere != "unknown")
        .collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries.into_iter().take(3).map(|(sphere, _)| sphere).collect()
}
