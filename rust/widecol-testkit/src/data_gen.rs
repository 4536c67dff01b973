//! Generators of synthetic rows and columns.

use widecol_codec::{pack, pack_double};
use widecol_store::{Column, MemoryStore, RowKey, Tags, TierLayout};

/// Row family used throughout the test suites.
pub const ROW_FAMILY: &str = "data_points";

/// Builds a tag set from `(name, value)` pairs.
pub fn tags(pairs: &[(&str, &str)]) -> Tags {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

/// Builds a legacy row key with a single `host` tag.
pub fn host_row(metric: &str, tier_start: i64, host: &str) -> RowKey {
    RowKey::new(metric, tier_start, tags(&[("host", host)]))
}

/// Legacy long columns at `tier_start + delta` for each delta, valued `delta * 10`.
pub fn legacy_long_columns(
    layout: &TierLayout,
    tier_start: i64,
    deltas: impl IntoIterator<Item = i64>,
) -> Vec<Column> {
    deltas
        .into_iter()
        .map(|delta| {
            Column::new(
                layout.long_offset(tier_start, tier_start + delta),
                pack(delta * 10),
            )
        })
        .collect()
}

/// Legacy double columns at `tier_start + delta` for each delta, valued `delta / 2`.
pub fn legacy_double_columns(
    layout: &TierLayout,
    tier_start: i64,
    deltas: impl IntoIterator<Item = i64>,
) -> Vec<Column> {
    deltas
        .into_iter()
        .map(|delta| {
            Column::new(
                layout.double_offset(tier_start, tier_start + delta),
                pack_double(delta as f64 / 2.0),
            )
        })
        .collect()
}

/// Typed long columns (no discriminator) at `tier_start + delta`, valued `-delta`.
pub fn typed_long_columns(
    layout: &TierLayout,
    tier_start: i64,
    deltas: impl IntoIterator<Item = i64>,
) -> Vec<Column> {
    deltas
        .into_iter()
        .map(|delta| {
            Column::new(
                layout.long_offset(tier_start, tier_start + delta),
                pack(-delta),
            )
        })
        .collect()
}

/// Stores `count` legacy long samples one millisecond apart, starting at the tier start.
pub fn populate_legacy_longs(
    store: &MemoryStore,
    layout: &TierLayout,
    key: &RowKey,
    count: i64,
) {
    store.put_all(
        ROW_FAMILY,
        key,
        legacy_long_columns(layout, key.tier_start(), 0..count),
    );
}
