use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config;

// ---------------------------------------------------------------------------
// Deck — stored deck header row
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deck {
    pub id: String,
    pub name: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// One main-deck entry as persisted (and as accepted by the replace
/// endpoint).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckCardRow {
    pub card_code: String,
    pub qty: u32,
}

/// Deck header plus denormalized heroes and cards, as served by the
/// summaries view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckSummary {
    pub id: String,
    pub name: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    #[serde(default)]
    pub heroes: Vec<String>,
    #[serde(default)]
    pub cards: Vec<DeckCardRow>,
}

// ---------------------------------------------------------------------------
// DeckContents — the structured form the text codec round-trips
// ---------------------------------------------------------------------------

/// Hero codes plus main-deck quantities.
///
/// Invariants: at most 3 heroes, hero codes unique, main-card quantities
/// always >= 1, and no code appears both as a hero and as a main card.
/// Construct through [`DeckContents::from_parts`] (or the codec) to get
/// these enforced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckContents {
    pub heroes: Vec<String>,
    pub cards: BTreeMap<String, u32>,
}

impl DeckContents {
    /// Build contents from raw parts, normalizing to the invariants:
    /// heroes deduplicated and capped at 3 (first occurrences win), card
    /// entries with qty 0 dropped, later duplicates overwriting earlier
    /// ones, and hero codes excluded from the card map.
    pub fn from_parts<H, C>(heroes: H, cards: C) -> Self
    where
        H: IntoIterator<Item = String>,
        C: IntoIterator<Item = (String, u32)>,
    {
        let mut out = DeckContents::default();
        for code in heroes {
            out.add_hero(&code);
        }
        for (code, qty) in cards {
            out.set_card(&code, qty);
        }
        out
    }

    /// Append a hero code. Returns false when the cap is reached or the
    /// code is already present. Removes the code from the main deck so the
    /// disjointness invariant holds.
    pub fn add_hero(&mut self, code: &str) -> bool {
        if self.heroes.len() >= config::MAX_HEROES
            || self.heroes.iter().any(|h| h == code)
        {
            return false;
        }
        self.heroes.push(code.to_string());
        self.cards.remove(code);
        true
    }

    /// Set a main-deck quantity. Qty 0 removes the entry; a code currently
    /// held as a hero is ignored.
    pub fn set_card(&mut self, code: &str, qty: u32) {
        if self.heroes.iter().any(|h| h == code) {
            return;
        }
        if qty == 0 {
            self.cards.remove(code);
        } else {
            self.cards.insert(code.to_string(), qty);
        }
    }

    /// Main-deck entries as persistence rows, code-ascending.
    pub fn card_rows(&self) -> Vec<DeckCardRow> {
        self.cards
            .iter()
            .map(|(code, qty)| DeckCardRow {
                card_code: code.clone(),
                qty: *qty,
            })
            .collect()
    }

    /// True when nothing was recognized (no heroes and no cards).
    pub fn is_empty(&self) -> bool {
        self.heroes.is_empty() && self.cards.is_empty()
    }
}

// ---------------------------------------------------------------------------
// DeckUsage — where else a card shows up
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckUsage {
    pub deck_id: String,
    pub deck_name: String,
    pub qty: u32,
}
