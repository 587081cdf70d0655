//! Unit tests for the deck-list text codec.

mod common;

use common::sample_index;
use ringshelf::decklist::{decode_deck, encode_deck, CardIndex};
use ringshelf::models::DeckContents;

fn contents(heroes: &[&str], cards: &[(&str, u32)]) -> DeckContents {
    DeckContents::from_parts(
        heroes.iter().map(|h| h.to_string()),
        cards.iter().map(|(c, q)| (c.to_string(), *q)),
    )
}

// ---------------------------------------------------------------------------
// Round trips
// ---------------------------------------------------------------------------

#[test]
fn round_trip_preserves_heroes_and_quantities() {
    let index = sample_index();
    let original = contents(&["01001", "01002"], &[("01012", 2), ("01026", 1)]);

    let text = encode_deck("Family deck", &original, &index);
    let decoded = decode_deck(&text);

    assert_eq!(decoded.heroes, vec!["01001", "01002"]);
    assert_eq!(decoded.cards.get("01012"), Some(&2));
    assert_eq!(decoded.cards.get("01026"), Some(&1));
    assert_eq!(decoded.cards.len(), 2);
}

#[test]
fn decode_is_idempotent_on_canonical_export() {
    let index = sample_index();
    let original = contents(&["01001"], &[("01012", 3), ("01023", 2), ("01014", 1)]);
    let text = encode_deck("Stable", &original, &index);

    let first = decode_deck(&text);
    let second = decode_deck(&text);
    assert_eq!(first, second);
    assert_eq!(first, original);
}

// ---------------------------------------------------------------------------
// Encoder layout
// ---------------------------------------------------------------------------

#[test]
fn encode_emits_header_heroes_and_ordered_buckets() {
    let index = sample_index();
    let deck = contents(
        &["01001"],
        &[("01012", 2), ("01014", 1), ("01026", 2), ("01023", 1)],
    );

    let text = encode_deck("Gondor", &deck, &index);
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "Deck: Gondor");
    assert_eq!(lines[1], "");
    assert_eq!(lines[2], "Heroes (1):");
    assert_eq!(lines[3], "1x 01001 Aragorn");

    // Buckets in fixed order: ALLY before ATTACHMENT before EVENT, with
    // quantity sums in the headers and names sorted within each bucket.
    let ally = lines.iter().position(|l| *l == "ALLY (3):").unwrap();
    let attach = lines.iter().position(|l| *l == "ATTACHMENT (2):").unwrap();
    let event = lines.iter().position(|l| *l == "EVENT (1):").unwrap();
    assert!(ally < attach && attach < event);

    // Faramir sorts before Gandalf by display name.
    assert_eq!(lines[ally + 1], "1x 01014 Faramir");
    assert_eq!(lines[ally + 2], "2x 01012 Gandalf");
}

#[test]
fn encode_omits_cards_with_unresolvable_names() {
    let index = sample_index();
    let deck = contents(&["01001", "nosuch"], &[("01012", 1), ("zzz99", 3)]);

    let text = encode_deck("Partial", &deck, &index);

    // The unknown hero and unknown card never appear, and the counts
    // reflect only what was emitted.
    assert!(!text.contains("nosuch"));
    assert!(!text.contains("zzz99"));
    assert!(text.contains("Heroes (1):"));
    assert!(text.contains("ALLY (1):"));
}

#[test]
fn encode_routes_unrecognized_types_to_other() {
    let index = sample_index();
    let deck = contents(&[], &[("99901", 2)]);

    let text = encode_deck("Oddities", &deck, &index);
    assert!(text.contains("OTHER (2):"));
    assert!(text.contains("2x 99901 Mystery Relic"));
}

// ---------------------------------------------------------------------------
// Decoder heuristics
// ---------------------------------------------------------------------------

#[test]
fn hero_cap_keeps_first_three_in_encounter_order() {
    let text = "Heroes (4):\n1x AAA01 First\n1x BBB02 Second\n1x CCC03 Third\n1x DDD04 Fourth\n";
    let decoded = decode_deck(text);
    assert_eq!(decoded.heroes, vec!["AAA01", "BBB02", "CCC03"]);
    assert!(decoded.cards.is_empty());
}

#[test]
fn hero_quantity_is_ignored() {
    let decoded = decode_deck("Heroes:\n3x AAA01 Triplicate\n");
    assert_eq!(decoded.heroes, vec!["AAA01"]);
    assert!(decoded.cards.is_empty());
}

#[test]
fn duplicate_hero_code_is_kept_once() {
    let decoded = decode_deck("Heroes:\n1x AAA01 Twin\n1x AAA01 Twin\n1x BBB02 Other\n");
    assert_eq!(decoded.heroes, vec!["AAA01", "BBB02"]);
}

#[test]
fn duplicate_card_code_last_write_wins() {
    let decoded = decode_deck("2x ABC01\n5x ABC01");
    assert_eq!(decoded.heroes.len(), 0);
    assert_eq!(decoded.cards.get("ABC01"), Some(&5));
    assert_eq!(decoded.cards.len(), 1);
}

#[test]
fn garbage_input_yields_empty_contents() {
    let decoded = decode_deck("not a deck list at all");
    assert!(decoded.heroes.is_empty());
    assert!(decoded.cards.is_empty());
    assert!(decoded.is_empty());
}

#[test]
fn section_header_ends_the_heroes_section() {
    let text = "HEROES (1):\n1x AAA01 Hero\nALLY (2):\n2x BBB02 Friend\n";
    let decoded = decode_deck(text);
    assert_eq!(decoded.heroes, vec!["AAA01"]);
    assert_eq!(decoded.cards.get("BBB02"), Some(&2));
}

#[test]
fn heroes_header_matches_case_insensitively_with_any_suffix() {
    for header in ["heroes", "Heroes:", "HEROES (2):", "heroes (whatever):"] {
        let text = format!("{}\n1x AAA01 Hero\n", header);
        let decoded = decode_deck(&text);
        assert_eq!(decoded.heroes, vec!["AAA01"], "header {:?}", header);
    }
}

#[test]
fn card_lines_before_any_header_are_main_deck() {
    let decoded = decode_deck("3x AAA01 Early Bird\n");
    assert!(decoded.heroes.is_empty());
    assert_eq!(decoded.cards.get("AAA01"), Some(&3));
}

#[test]
fn zero_quantity_lines_are_ignored() {
    let decoded = decode_deck("0x AAA01 Nothing\n2x BBB02 Something\n");
    assert!(decoded.cards.get("AAA01").is_none());
    assert_eq!(decoded.cards.get("BBB02"), Some(&2));
}

#[test]
fn display_names_after_the_code_are_ignored() {
    let decoded = decode_deck("2x ABC01 Steward of Gondor (Core Set)\n");
    assert_eq!(decoded.cards.get("ABC01"), Some(&2));
}

#[test]
fn whitespace_around_the_x_is_tolerated() {
    let decoded = decode_deck("2 x ABC01 Loose\n3x DEF02 Tight\n");
    assert_eq!(decoded.cards.get("ABC01"), Some(&2));
    assert_eq!(decoded.cards.get("DEF02"), Some(&3));
}

#[test]
fn any_line_ending_convention_is_accepted() {
    let unix = decode_deck("2x AAA01 One\n3x BBB02 Two\n");
    let windows = decode_deck("2x AAA01 One\r\n3x BBB02 Two\r\n");
    let old_mac = decode_deck("2x AAA01 One\r3x BBB02 Two\r");
    assert_eq!(unix, windows);
    assert_eq!(unix, old_mac);
}

// ---------------------------------------------------------------------------
// Disjointness
// ---------------------------------------------------------------------------

#[test]
fn hero_codes_never_appear_in_main_cards() {
    // Same code recorded as a card first, then as a hero.
    let text = "2x AAA01 Early\nHeroes:\n1x AAA01 Late Hero\n";
    let decoded = decode_deck(text);
    assert_eq!(decoded.heroes, vec!["AAA01"]);
    assert!(decoded.cards.get("AAA01").is_none());

    // And the other way around: hero first, card mention later.
    let text = "Heroes:\n1x BBB02 Hero\nALLY (2):\n2x BBB02 Also An Ally\n";
    let decoded = decode_deck(text);
    assert_eq!(decoded.heroes, vec!["BBB02"]);
    assert!(decoded.cards.get("BBB02").is_none());
}

#[test]
fn decoded_contents_always_satisfy_disjointness() {
    let samples = [
        "Heroes:\n1x A1 H\n2x A1 C\n",
        "1x B2\nHeroes (1):\n1x B2\n",
        "Heroes:\n1x C3\nOTHER (1):\n1x C3\n",
    ];
    for text in samples {
        let decoded = decode_deck(text);
        for hero in &decoded.heroes {
            assert!(
                !decoded.cards.contains_key(hero),
                "code {} on both sides for {:?}",
                hero,
                text
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Encoder/decoder contract
// ---------------------------------------------------------------------------

#[test]
fn every_encoder_header_is_recognized_as_a_section_boundary() {
    // If an encoder bucket header ever stopped ending in "):", hero parsing
    // would leak into the next section. Pin the contract.
    let index = sample_index();
    let deck = contents(&["01001"], &[("01012", 1), ("01026", 1), ("01023", 1), ("99901", 1)]);
    let text = encode_deck("Contract", &deck, &index);

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("Deck:") {
            continue;
        }
        let is_card_line = trimmed
            .chars()
            .next()
            .map(|c| c.is_ascii_digit())
            .unwrap_or(false);
        if !is_card_line {
            assert!(
                trimmed.ends_with("):"),
                "section header {:?} must end with \"):\"",
                trimmed
            );
        }
    }
}

#[test]
fn empty_contents_encode_to_a_deck_with_no_card_lines() {
    let index = CardIndex::new();
    let text = encode_deck("Empty", &DeckContents::default(), &index);
    assert!(text.contains("Heroes (0):"));
    let decoded = decode_deck(&text);
    assert!(decoded.is_empty());
}
