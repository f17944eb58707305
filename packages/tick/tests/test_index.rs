use soroban_sdk::Env;
use strikepool_math::{MAX_TICK_PRICE, MIN_TICK_DISTANCE, MIN_TICK_PRICE};
use strikepool_tick::index;

fn tick(n: u128) -> u128 {
    n * MIN_TICK_DISTANCE
}

// ============================================================
// MEMBERSHIP AND NEIGHBOR TESTS
// ============================================================

#[test]
fn test_new_index_holds_sentinels() {
    let env = Env::default();
    let idx = index::new_index(&env);

    assert_eq!(idx.len(), 2);
    assert!(index::contains(&idx, MIN_TICK_PRICE));
    assert!(index::contains(&idx, MAX_TICK_PRICE));
}

#[test]
fn test_insert_and_neighbors() {
    let env = Env::default();
    let mut idx = index::new_index(&env);

    index::insert(&mut idx, tick(250)).unwrap();
    index::insert(&mut idx, tick(750)).unwrap();

    assert_eq!(index::next_above(&idx, MIN_TICK_PRICE), Some(tick(250)));
    assert_eq!(index::next_above(&idx, tick(250)), Some(tick(750)));
    assert_eq!(index::next_above(&idx, tick(750)), Some(MAX_TICK_PRICE));
    assert_eq!(index::next_above(&idx, MAX_TICK_PRICE), None);

    assert_eq!(index::prev_below(&idx, MAX_TICK_PRICE), Some(tick(750)));
    assert_eq!(index::prev_below(&idx, tick(250)), Some(MIN_TICK_PRICE));
    assert_eq!(index::prev_below(&idx, MIN_TICK_PRICE), None);
}

#[test]
fn test_neighbors_between_members() {
    let env = Env::default();
    let mut idx = index::new_index(&env);
    index::insert(&mut idx, tick(500)).unwrap();

    // queries for non-member prices still resolve
    assert_eq!(index::next_above(&idx, tick(300)), Some(tick(500)));
    assert_eq!(index::prev_below(&idx, tick(300)), Some(MIN_TICK_PRICE));
    assert_eq!(index::nearest_below(&idx, tick(300)), Some(MIN_TICK_PRICE));
    assert_eq!(index::nearest_below(&idx, tick(500)), Some(tick(500)));
}

// ============================================================
// INSERT / REMOVE VALIDATION
// ============================================================

#[test]
fn test_insert_duplicate_fails() {
    let env = Env::default();
    let mut idx = index::new_index(&env);

    index::insert(&mut idx, tick(100)).unwrap();
    assert_eq!(
        index::insert(&mut idx, tick(100)),
        Err("tick already in index")
    );
}

#[test]
fn test_insert_off_lattice_fails() {
    let env = Env::default();
    let mut idx = index::new_index(&env);

    assert_eq!(
        index::insert(&mut idx, tick(100) + 1),
        Err("tick price not on lattice")
    );
    assert_eq!(index::insert(&mut idx, 0), Err("tick price not on lattice"));
    assert_eq!(
        index::insert(&mut idx, MAX_TICK_PRICE + MIN_TICK_DISTANCE),
        Err("tick price not on lattice")
    );
}

#[test]
fn test_remove_sentinel_fails() {
    let env = Env::default();
    let mut idx = index::new_index(&env);

    assert_eq!(
        index::remove(&mut idx, MIN_TICK_PRICE),
        Err("cannot remove sentinel tick")
    );
    assert_eq!(
        index::remove(&mut idx, MAX_TICK_PRICE),
        Err("cannot remove sentinel tick")
    );
}

#[test]
fn test_remove_missing_fails() {
    let env = Env::default();
    let mut idx = index::new_index(&env);

    assert_eq!(index::remove(&mut idx, tick(42)), Err("tick not in index"));
}

#[test]
fn test_insert_remove_roundtrip() {
    let env = Env::default();
    let mut idx = index::new_index(&env);

    index::insert(&mut idx, tick(300)).unwrap();
    index::insert(&mut idx, tick(600)).unwrap();
    index::remove(&mut idx, tick(300)).unwrap();

    assert!(!index::contains(&idx, tick(300)));
    assert_eq!(index::next_above(&idx, MIN_TICK_PRICE), Some(tick(600)));
    assert_eq!(idx.len(), 3);
}

// ============================================================
// REFERENCE HINT RESOLUTION
// ============================================================

#[test]
fn test_resolve_reference_accepts_correct_hint() {
    let env = Env::default();
    let mut idx = index::new_index(&env);
    index::insert(&mut idx, tick(250)).unwrap();
    index::insert(&mut idx, tick(750)).unwrap();

    assert_eq!(
        index::resolve_reference(&idx, tick(250), tick(400)),
        Some(tick(250))
    );
    // exact member is its own floor
    assert_eq!(
        index::resolve_reference(&idx, tick(250), tick(250)),
        Some(tick(250))
    );
}

#[test]
fn test_resolve_reference_rejects_bad_hint() {
    let env = Env::default();
    let mut idx = index::new_index(&env);
    index::insert(&mut idx, tick(250)).unwrap();
    index::insert(&mut idx, tick(750)).unwrap();

    // hint not a member
    assert_eq!(
        index::resolve_reference(&idx, tick(300), tick(400)),
        Some(tick(250))
    );
    // hint a member but too far below
    assert_eq!(
        index::resolve_reference(&idx, MIN_TICK_PRICE, tick(800)),
        Some(tick(750))
    );
    // hint above the price
    assert_eq!(
        index::resolve_reference(&idx, tick(750), tick(400)),
        Some(tick(250))
    );
}
