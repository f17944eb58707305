// Range fee-rate computation.

use strikepool_math::wad_sub;

/// Fee rate accrued strictly inside `[lower, upper)`, derived from the
/// global accumulator and the two endpoints' external snapshots in
/// O(1). Each side's contribution depends on whether the current tick
/// has passed that boundary; the crossing mirror keeps the snapshots
/// consistent with this decomposition.
pub fn range_fee_rate(
    global_fee_rate: u128,
    current_tick: u128,
    lower: u128,
    upper: u128,
    lower_external: u128,
    upper_external: u128,
) -> u128 {
    let fees_below = if current_tick >= lower {
        lower_external
    } else {
        wad_sub(global_fee_rate, lower_external)
    };

    let fees_above = if current_tick < upper {
        upper_external
    } else {
        wad_sub(global_fee_rate, upper_external)
    };

    wad_sub(wad_sub(global_fee_rate, fees_below), fees_above)
}
