//! Tests for collection operations: pack enablement, owned counts, and
//! cross-deck usage aggregation.

mod common;

use common::shelf;
use ringshelf::error::RingshelfError;
use ringshelf::models::{OwnedRow, PackRow};
use ringshelf::store::Store;

fn pack(code: &str, name: &str, enabled: bool) -> PackRow {
    PackRow {
        pack_code: code.into(),
        pack_name: name.into(),
        enabled,
    }
}

// ---------------------------------------------------------------------------
// Packs
// ---------------------------------------------------------------------------

#[test]
fn pack_sync_preserves_existing_enablement() {
    let (shelf, _tmp) = shelf();
    let store = shelf.store();

    store
        .upsert_packs(&[pack("Core", "Core Set", true), pack("DoG", "Dawn of Gold", false)])
        .unwrap();
    shelf.collection().set_pack_enabled("DoG", true).unwrap();

    // A later catalog sync re-upserts the same codes with default flags.
    store
        .upsert_packs(&[pack("Core", "Core Set", true), pack("DoG", "Dawn of Gold", false)])
        .unwrap();

    let packs = store.list_packs().unwrap();
    let dog = packs.iter().find(|p| p.pack_code == "DoG").unwrap();
    assert!(dog.enabled, "sync must not clobber the household's choice");
}

#[test]
fn packs_are_listed_name_sorted() {
    let (shelf, _tmp) = shelf();
    shelf
        .store()
        .upsert_packs(&[
            pack("ZZZ", "Zenith", false),
            pack("AAA", "Aurora", false),
            pack("MMM", "Midpoint", false),
        ])
        .unwrap();

    let names: Vec<String> = shelf
        .collection()
        .list_packs()
        .unwrap()
        .into_iter()
        .map(|p| p.pack_name)
        .collect();
    assert_eq!(names, vec!["Aurora", "Midpoint", "Zenith"]);
}

#[test]
fn enabling_an_unknown_pack_is_not_found() {
    let (shelf, _tmp) = shelf();
    let err = shelf
        .collection()
        .set_pack_enabled("nope", true)
        .unwrap_err();
    assert!(matches!(err, RingshelfError::NotFound(_)));
}

#[test]
fn enabled_pack_codes_filters_disabled_packs() {
    let (shelf, _tmp) = shelf();
    shelf
        .store()
        .upsert_packs(&[pack("Core", "Core Set", true), pack("DoG", "Dawn", false)])
        .unwrap();
    assert_eq!(shelf.collection().enabled_pack_codes().unwrap(), ["Core"]);
}

// ---------------------------------------------------------------------------
// Owned quantities
// ---------------------------------------------------------------------------

#[test]
fn owned_round_trips_and_requires_a_code() {
    let (shelf, _tmp) = shelf();
    let ops = shelf.collection();

    assert!(matches!(
        ops.set_owned("", 2).unwrap_err(),
        RingshelfError::InvalidArgument(_)
    ));

    ops.set_owned("01012", 3).unwrap();
    ops.set_owned("01014", 1).unwrap();

    let codes: Vec<String> = vec!["01012".into(), "01014".into(), "01099".into()];
    let owned = ops.owned(&codes).unwrap();
    assert_eq!(owned.get("01012"), Some(&3));
    assert_eq!(owned.get("01014"), Some(&1));
    assert!(owned.get("01099").is_none());
}

#[test]
fn bulk_upsert_requires_rows() {
    let (shelf, _tmp) = shelf();
    let ops = shelf.collection();

    assert!(matches!(
        ops.set_owned_bulk(&[]).unwrap_err(),
        RingshelfError::InvalidArgument(_)
    ));

    let rows = vec![
        OwnedRow {
            card_code: "01012".into(),
            owned_qty: 3,
        },
        OwnedRow {
            card_code: "01023".into(),
            owned_qty: 0,
        },
    ];
    ops.set_owned_bulk(&rows).unwrap();

    let codes: Vec<String> = vec!["01012".into(), "01023".into()];
    let owned = ops.owned(&codes).unwrap();
    assert_eq!(owned.get("01012"), Some(&3));
    assert_eq!(owned.get("01023"), Some(&0));
}

// ---------------------------------------------------------------------------
// Usage
// ---------------------------------------------------------------------------

#[test]
fn usage_groups_by_code_with_deck_names() {
    let (shelf, _tmp) = shelf();
    let rohan = shelf.decks().create("Rohan").unwrap();
    let gondor = shelf.decks().create("Gondor").unwrap();

    shelf.decks().set_card_qty(&rohan.id, "01012", 3).unwrap();
    shelf.decks().set_card_qty(&gondor.id, "01012", 1).unwrap();
    shelf.decks().set_card_qty(&gondor.id, "01026", 2).unwrap();

    let codes: Vec<String> = vec!["01012".into(), "01026".into()];
    let usage = shelf.collection().usage(&codes).unwrap();

    let gandalf = usage.get("01012").unwrap();
    assert_eq!(gandalf.len(), 2);
    assert!(gandalf
        .iter()
        .any(|u| u.deck_name == "Rohan" && u.qty == 3));
    assert!(gandalf
        .iter()
        .any(|u| u.deck_name == "Gondor" && u.qty == 1));

    let steward = usage.get("01026").unwrap();
    assert_eq!(steward.len(), 1);
    assert_eq!(steward[0].deck_name, "Gondor");
}

#[test]
fn usage_with_no_codes_is_empty() {
    let (shelf, _tmp) = shelf();
    assert!(shelf.collection().usage(&[]).unwrap().is_empty());
}
