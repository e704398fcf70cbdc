//! Standard penalty weights.

use std::collections::BTreeMap;

use slotforge_core::PenaltyTable;

/// Weight of `session_requires_trim` in [`standard_penalties`].
pub const TRIM_PENALTY: u64 = 100_000;

/// Penalty weights for every business rule and constraint category.
pub fn standard_penalties() -> BTreeMap<String, u64> {
    [
        ("bof_overlapping_prg", 10_000),
        ("bof_overlapping_bof", 10_000),
        ("bof_overlapping_area_wg", 10_000),
        ("bof_overlapping_area_meeting", 10_000),
        ("area_overlapping_in_area", 10_000),
        ("area_overlapping_other_area", 10_000),
        ("session_overlap_ad", 100),
        ("sessions_out_of_order", 100_000),
        ("session_requires_trim", TRIM_PENALTY),
        ("conflict", 100_000),
        ("conflic2", 10_000),
        ("conflic3", 1_000),
        ("bethere", 200_000),
        ("time_relation", 1_000),
        ("wg_adjacent", 10_000),
        ("timerange", 100_000),
    ]
    .into_iter()
    .map(|(slug, weight)| (slug.to_string(), weight))
    .collect()
}

pub fn penalty_table() -> PenaltyTable {
    PenaltyTable::new(standard_penalties()).expect("standard penalties are complete")
}
