//! Unit tests for the QueryBuilder query-pair construction.

use ringshelf::QueryBuilder;

fn pair(k: &str, v: &str) -> (String, String) {
    (k.to_string(), v.to_string())
}

// ---------------------------------------------------------------------------
// Basic construction
// ---------------------------------------------------------------------------

#[test]
fn new_builds_no_pairs() {
    let pairs = QueryBuilder::new().build();
    assert!(pairs.is_empty());
}

#[test]
fn select_joins_columns() {
    let pairs = QueryBuilder::new().select(&["id", "position"]).build();
    assert_eq!(pairs, vec![pair("select", "id,position")]);
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

#[test]
fn where_eq_adds_an_eq_expression() {
    let pairs = QueryBuilder::new().where_eq("campaign_id", "c1").build();
    assert_eq!(pairs, vec![pair("campaign_id", "eq.c1")]);
}

#[test]
fn where_in_wraps_the_values() {
    let pairs = QueryBuilder::new()
        .where_in("card_code", &["a", "b", "c"])
        .build();
    assert_eq!(pairs, vec![pair("card_code", "in.(a,b,c)")]);
}

#[test]
fn where_in_empty_matches_nothing() {
    let pairs = QueryBuilder::new().where_in("card_code", &[]).build();
    assert_eq!(pairs, vec![pair("card_code", "in.()")]);
}

#[test]
fn filters_keep_insertion_order() {
    let pairs = QueryBuilder::new()
        .where_eq("deck_id", "d1")
        .where_eq("card_code", "01012")
        .build();
    assert_eq!(
        pairs,
        vec![pair("deck_id", "eq.d1"), pair("card_code", "eq.01012")]
    );
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

#[test]
fn order_keys_accumulate_left_to_right() {
    let pairs = QueryBuilder::new()
        .order_asc("position")
        .order_asc("created_at")
        .build();
    assert_eq!(pairs, vec![pair("order", "position.asc,created_at.asc")]);
}

#[test]
fn order_desc_marks_the_key() {
    let pairs = QueryBuilder::new().order_desc("updated_at").build();
    assert_eq!(pairs, vec![pair("order", "updated_at.desc")]);
}

// ---------------------------------------------------------------------------
// Paging and upserts
// ---------------------------------------------------------------------------

#[test]
fn limit_and_offset_render_as_numbers() {
    let pairs = QueryBuilder::new().limit(10).offset(20).build();
    assert_eq!(pairs, vec![pair("limit", "10"), pair("offset", "20")]);
}

#[test]
fn on_conflict_names_the_target_columns() {
    let pairs = QueryBuilder::new().on_conflict("deck_id,card_code").build();
    assert_eq!(pairs, vec![pair("on_conflict", "deck_id,card_code")]);
}

// ---------------------------------------------------------------------------
// Combined / chained
// ---------------------------------------------------------------------------

#[test]
fn combined_builder_orders_sections_stably() {
    let pairs = QueryBuilder::new()
        .select(&["id", "position"])
        .where_eq("campaign_id", "c1")
        .order_asc("position")
        .limit(1)
        .build();

    assert_eq!(
        pairs,
        vec![
            pair("select", "id,position"),
            pair("campaign_id", "eq.c1"),
            pair("order", "position.asc"),
            pair("limit", "1"),
        ]
    );
}

#[test]
fn builder_is_reusable_after_build() {
    let mut qb = QueryBuilder::new();
    qb.where_eq("id", "x");
    let first = qb.build();
    let second = qb.build();
    assert_eq!(first, second);
}
