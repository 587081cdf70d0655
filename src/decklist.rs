//! Deck-list text codec.
//!
//! Converts between [`DeckContents`] and the human-readable multi-line deck
//! format used for "copy as text" export and paste-to-import. The decoder's
//! line heuristics are the interchange contract: they accept the encoder's
//! own output as well as hand-typed or third-party variants, and they never
//! fail -- unrecognizable lines are simply skipped. An import that yields
//! nothing at all is rejected one level up (see `DeckOps::import_text`).
//!
//! # Example
//!
//! ```
//! use ringshelf::decklist::{decode_deck, encode_deck, CardIndex};
//! use ringshelf::models::DeckContents;
//!
//! let mut index = CardIndex::new();
//! index.insert("01001", "Aragorn", Some("hero"), Some("leadership"));
//! index.insert("01012", "Gandalf", Some("ally"), Some("neutral"));
//!
//! let contents = DeckContents::from_parts(
//!     vec!["01001".to_string()],
//!     vec![("01012".to_string(), 3)],
//! );
//! let text = encode_deck("Fellowship", &contents, &index);
//! assert_eq!(decode_deck(&text), contents);
//! ```

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::config;
use crate::models::{Card, DeckContents};

// ---------------------------------------------------------------------------
// CardIndex
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct CardMeta {
    name: String,
    type_code: Option<String>,
    sphere_code: Option<String>,
}

/// Display metadata lookup used by the encoder and the summary aggregations.
///
/// Codes absent from the index have no resolvable display name; the encoder
/// silently omits them.
#[derive(Debug, Clone, Default)]
pub struct CardIndex {
    by_code: HashMap<String, CardMeta>,
}

impl CardIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from card records (typically the enabled packs'
    /// player cards).
    pub fn from_cards<'a, I>(cards: I) -> Self
    where
        I: IntoIterator<Item = &'a Card>,
    {
        let mut index = Self::new();
        for c in cards {
            index.insert(
                &c.code,
                &c.name,
                c.type_code.as_deref(),
                c.sphere_code.as_deref(),
            );
        }
        index
    }

    pub fn insert(
        &mut self,
        code: &str,
        name: &str,
        type_code: Option<&str>,
        sphere_code: Option<&str>,
    ) {
        self.by_code.insert(
            code.to_string(),
            CardMeta {
                name: name.to_string(),
                type_code: type_code.map(str::to_string),
                sphere_code: sphere_code.map(str::to_string),
            },
        );
    }

    pub fn name(&self, code: &str) -> Option<&str> {
        self.by_code.get(code).map(|m| m.name.as_str())
    }

    pub fn type_code(&self, code: &str) -> Option<&str> {
        self.by_code.get(code).and_then(|m| m.type_code.as_deref())
    }

    pub fn sphere_code(&self, code: &str) -> Option<&str> {
        self.by_code.get(code).and_then(|m| m.sphere_code.as_deref())
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Encode
// ---------------------------------------------------------------------------

/// Render deck contents as the export text format.
///
/// Layout: a `Deck:` header, a heroes section, then one section per
/// non-empty type bucket in fixed order (ally, attachment, event,
/// player-side-quest, contract, treasure, other), each card line as
/// `<qty>x <code> <display name>` sorted by display name. Cards whose
/// display name is not in `index` are omitted entirely; cards with a name
/// but no recognized type land in the `OTHER` bucket.
pub fn encode_deck(name: &str, contents: &DeckContents, index: &CardIndex) -> String {
    let mut out = String::new();
    out.push_str(&format!("Deck: {}\n\n", name));

    let hero_lines: Vec<String> = contents
        .heroes
        .iter()
        .filter_map(|code| index.name(code).map(|n| format!("1x {} {}", code, n)))
        .collect();
    out.push_str(&format!("Heroes ({}):\n", hero_lines.len()));
    for line in &hero_lines {
        out.push_str(line);
        out.push('\n');
    }
    out.push('\n');

    // (display name, code, qty) per bucket, keyed by export order index
    let mut buckets: Vec<Vec<(String, String, u32)>> =
        vec![Vec::new(); config::EXPORT_TYPE_ORDER.len()];
    for (code, qty) in &contents.cards {
        let Some(card_name) = index.name(code) else {
            continue;
        };
        let bucket = index
            .type_code(code)
            .and_then(|t| {
                config::EXPORT_TYPE_ORDER
                    .iter()
                    .position(|known| *known == t)
            })
            .unwrap_or(config::EXPORT_TYPE_ORDER.len() - 1);
        buckets[bucket].push((card_name.to_string(), code.clone(), *qty));
    }

    for (bucket, entries) in buckets.iter_mut().enumerate() {
        if entries.is_empty() {
            continue;
        }
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        let total: u32 = entries.iter().map(|(_, _, qty)| qty).sum();
        out.push_str(&format!(
            "{} ({}):\n",
            config::EXPORT_TYPE_ORDER[bucket].to_uppercase(),
            total
        ));
        for (card_name, code, qty) in entries.iter() {
            out.push_str(&format!("{}x {} {}\n", qty, code, card_name));
        }
        out.push('\n');
    }

    out
}

// ---------------------------------------------------------------------------
// Decode
// ---------------------------------------------------------------------------

/// `<qty>x <code> ...` -- anything after the code is display text and is
/// ignored.
static CARD_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s*x\s*([A-Za-z0-9]+)\b").unwrap());

static HEROES_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^heroes").unwrap());

/// Parse deck-list text into structured contents.
///
/// Tolerant by construction: lines that match nothing are skipped and the
/// function never fails. A result where [`DeckContents::is_empty`] holds
/// means no card lines were recognized; callers importing text must treat
/// that as an error rather than silently wiping the deck.
pub fn decode_deck(text: &str) -> DeckContents {
    let mut contents = DeckContents::default();
    let mut in_heroes = false;

    for raw in text.split(['\n', '\r']) {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if HEROES_HEADER.is_match(line) {
            in_heroes = true;
            continue;
        }
        if line.ends_with("):") {
            // Some other section header; heroes are over.
            in_heroes = false;
            continue;
        }

        let Some(caps) = CARD_LINE.captures(line) else {
            continue;
        };
        let qty = caps[1].parse::<u64>().unwrap_or(u64::MAX).min(u32::MAX as u64) as u32;
        let code = &caps[2];

        if in_heroes {
            // Quantity is irrelevant for heroes; they always count as one.
            contents.add_hero(code);
        } else if qty > 0 {
            contents.set_card(code, qty);
        }
    }

    contents
}
