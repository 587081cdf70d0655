//! Tests for the scenario repositioner: pure swap planning, the max+1
//! insertion rule, and the two-write apply path with compensation.

mod common;

use common::{cards_client, shelf, FlakyStore};
use ringshelf::error::RingshelfError;
use ringshelf::models::NewScenario;
use ringshelf::ops::CampaignOps;
use ringshelf::ordering::{next_position, plan_swap, Direction};
use ringshelf::store::Store;

fn scenario(title: &str) -> NewScenario {
    NewScenario {
        title: title.to_string(),
        pack_code: None,
        scenario_code: None,
    }
}

// ---------------------------------------------------------------------------
// Pure planning
// ---------------------------------------------------------------------------

#[test]
fn plan_swaps_positions_of_adjacent_scenarios() {
    let (shelf, _tmp) = shelf();
    let campaign = shelf.campaigns().create("Quest", None, "custom").unwrap();
    for title in ["S1", "S2", "S3"] {
        shelf
            .campaigns()
            .add_scenario(&campaign.id, &scenario(title))
            .unwrap();
    }
    let scenarios = shelf.campaigns().scenarios(&campaign.id).unwrap();

    let plan = plan_swap(&scenarios, &scenarios[1].id, Direction::Up)
        .unwrap()
        .unwrap();
    assert_eq!(plan.first.scenario_id, scenarios[1].id);
    assert_eq!(plan.first.position, scenarios[0].position);
    assert_eq!(plan.second.scenario_id, scenarios[0].id);
    assert_eq!(plan.second.position, scenarios[1].position);
    assert_eq!(plan.rollback.scenario_id, scenarios[1].id);
    assert_eq!(plan.rollback.position, scenarios[1].position);
}

#[test]
fn plan_is_none_at_the_boundaries() {
    let (shelf, _tmp) = shelf();
    let campaign = shelf.campaigns().create("Quest", None, "custom").unwrap();
    for title in ["S1", "S2"] {
        shelf
            .campaigns()
            .add_scenario(&campaign.id, &scenario(title))
            .unwrap();
    }
    let scenarios = shelf.campaigns().scenarios(&campaign.id).unwrap();

    assert!(plan_swap(&scenarios, &scenarios[0].id, Direction::Up)
        .unwrap()
        .is_none());
    assert!(plan_swap(&scenarios, &scenarios[1].id, Direction::Down)
        .unwrap()
        .is_none());
}

#[test]
fn plan_fails_with_not_found_for_unknown_scenario() {
    let err = plan_swap(&[], "ghost", Direction::Up).unwrap_err();
    assert!(matches!(err, RingshelfError::NotFound(_)));
}

// ---------------------------------------------------------------------------
// Insertion positions
// ---------------------------------------------------------------------------

#[test]
fn first_scenario_gets_position_zero() {
    let (shelf, _tmp) = shelf();
    let campaign = shelf.campaigns().create("Quest", None, "custom").unwrap();
    let s = shelf
        .campaigns()
        .add_scenario(&campaign.id, &scenario("Opening"))
        .unwrap();
    assert_eq!(s.position, 0);
}

#[test]
fn insertion_appends_one_past_the_max_position() {
    let (shelf, _tmp) = shelf();
    let campaign = shelf.campaigns().create("Quest", None, "custom").unwrap();
    // Seed a gap-y order directly through the store: max position 4.
    shelf
        .store()
        .insert_scenario(&campaign.id, &scenario("Seeded"), 4)
        .unwrap();

    let s = shelf
        .campaigns()
        .add_scenario(&campaign.id, &scenario("Next"))
        .unwrap();
    assert_eq!(s.position, 5);
}

#[test]
fn next_position_is_zero_for_an_empty_list() {
    assert_eq!(next_position(&[]), 0);
}

// ---------------------------------------------------------------------------
// Applying moves through the store
// ---------------------------------------------------------------------------

fn titles_in_order(ops: &CampaignOps<'_>, campaign_id: &str) -> Vec<String> {
    ops.scenarios(campaign_id)
        .unwrap()
        .into_iter()
        .map(|s| s.title)
        .collect()
}

#[test]
fn reorder_moves_one_step_and_is_a_noop_at_the_edges() {
    let (shelf, _tmp) = shelf();
    let ops = shelf.campaigns();
    let campaign = ops.create("Quest", None, "custom").unwrap();
    let mut ids = Vec::new();
    for title in ["S1", "S2", "S3"] {
        ids.push(ops.add_scenario(&campaign.id, &scenario(title)).unwrap().id);
    }

    // Boundary up: no writes, success.
    ops.reorder_scenario(&campaign.id, &ids[0], Direction::Up)
        .unwrap();
    assert_eq!(titles_in_order(&ops, &campaign.id), ["S1", "S2", "S3"]);

    // Middle up: S1 and S2 trade positions.
    ops.reorder_scenario(&campaign.id, &ids[1], Direction::Up)
        .unwrap();
    assert_eq!(titles_in_order(&ops, &campaign.id), ["S2", "S1", "S3"]);

    // Boundary down: no writes, success.
    ops.reorder_scenario(&campaign.id, &ids[2], Direction::Down)
        .unwrap();
    assert_eq!(titles_in_order(&ops, &campaign.id), ["S2", "S1", "S3"]);
}

#[test]
fn reorder_unknown_scenario_is_not_found() {
    let (shelf, _tmp) = shelf();
    let ops = shelf.campaigns();
    let campaign = ops.create("Quest", None, "custom").unwrap();
    let err = ops
        .reorder_scenario(&campaign.id, "ghost", Direction::Up)
        .unwrap_err();
    assert!(matches!(err, RingshelfError::NotFound(_)));
}

#[test]
fn failed_second_write_is_rolled_back() {
    let store = FlakyStore::new();
    let (cards, _tmp) = cards_client();
    let ops = CampaignOps::new(&store, &cards);

    let campaign = ops.create("Quest", None, "custom").unwrap();
    let mut ids = Vec::new();
    for title in ["S1", "S2"] {
        ids.push(ops.add_scenario(&campaign.id, &scenario(title)).unwrap().id);
    }

    // First write succeeds, second fails, rollback (third call) succeeds.
    store.fail_on("set_scenario_position", &[2]);
    let err = ops
        .reorder_scenario(&campaign.id, &ids[1], Direction::Up)
        .unwrap_err();
    assert!(matches!(err, RingshelfError::Store(_)));

    // The compensation restored the original order.
    assert_eq!(titles_in_order(&ops, &campaign.id), ["S1", "S2"]);
}

#[test]
fn failed_rollback_surfaces_as_partially_applied() {
    let store = FlakyStore::new();
    let (cards, _tmp) = cards_client();
    let ops = CampaignOps::new(&store, &cards);

    let campaign = ops.create("Quest", None, "custom").unwrap();
    let mut ids = Vec::new();
    for title in ["S1", "S2"] {
        ids.push(ops.add_scenario(&campaign.id, &scenario(title)).unwrap().id);
    }

    // Second write and the compensating third write both fail.
    store.fail_on("set_scenario_position", &[2, 3]);
    let err = ops
        .reorder_scenario(&campaign.id, &ids[1], Direction::Up)
        .unwrap_err();
    assert!(matches!(err, RingshelfError::PartiallyApplied(_)));
}
