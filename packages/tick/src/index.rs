// Ordered tick index.
//
// The set of active tick prices is one sorted Vec held in a single
// storage slot, binary-searched on every query. The linked-list shape
// of comparable AMMs is replaced by an ordered structure: neighbor
// lookups are O(log n) and caller-supplied reference hints become an
// optimization instead of a correctness requirement.

use soroban_sdk::{Env, Vec};
use strikepool_math::{is_on_lattice, MAX_TICK_PRICE, MIN_TICK_PRICE};

/// A fresh index holding only the two permanent sentinels.
pub fn new_index(env: &Env) -> Vec<u128> {
    let mut index = Vec::new(env);
    index.push_back(MIN_TICK_PRICE);
    index.push_back(MAX_TICK_PRICE);
    index
}

pub fn contains(index: &Vec<u128>, price: u128) -> bool {
    index.binary_search(price).is_ok()
}

/// Smallest member strictly greater than `price`.
pub fn next_above(index: &Vec<u128>, price: u128) -> Option<u128> {
    let pos = match index.binary_search(price) {
        Ok(found) => found + 1,
        Err(insertion) => insertion,
    };
    index.get(pos)
}

/// Largest member strictly less than `price`.
pub fn prev_below(index: &Vec<u128>, price: u128) -> Option<u128> {
    let pos = match index.binary_search(price) {
        Ok(found) => found,
        Err(insertion) => insertion,
    };
    if pos == 0 {
        None
    } else {
        index.get(pos - 1)
    }
}

/// Largest member at or below `price`. The fallback search used when a
/// caller's reference hint does not check out.
pub fn nearest_below(index: &Vec<u128>, price: u128) -> Option<u128> {
    match index.binary_search(price) {
        Ok(found) => index.get(found),
        Err(insertion) => {
            if insertion == 0 {
                None
            } else {
                index.get(insertion - 1)
            }
        }
    }
}

/// Validate a caller-supplied reference tick for `price`; fall back to
/// the index search when the hint is absent or misplaced.
pub fn resolve_reference(index: &Vec<u128>, hint: u128, price: u128) -> Option<u128> {
    if contains(index, hint) && hint <= price {
        match next_above(index, hint) {
            Some(next) if next > price => return Some(hint),
            None => return Some(hint),
            _ => {}
        }
    }
    nearest_below(index, price)
}

/// Insert a tick price. Fails on duplicates, off-lattice prices, and
/// prices outside the sentinel bounds.
pub fn insert(index: &mut Vec<u128>, price: u128) -> Result<(), &'static str> {
    if !is_on_lattice(price) {
        return Err("tick price not on lattice");
    }
    match index.binary_search(price) {
        Ok(_) => Err("tick already in index"),
        Err(insertion) => {
            index.insert(insertion, price);
            Ok(())
        }
    }
}

/// Remove a tick price. The sentinels are permanent.
pub fn remove(index: &mut Vec<u128>, price: u128) -> Result<(), &'static str> {
    if price == MIN_TICK_PRICE || price == MAX_TICK_PRICE {
        return Err("cannot remove sentinel tick");
    }
    match index.binary_search(price) {
        Ok(found) => {
            index.remove(found);
            Ok(())
        }
        Err(_) => Err("tick not in index"),
    }
}
