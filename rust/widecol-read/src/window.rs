//! Time window of a fetch and its translation into column offsets.

use widecol_common::{Result, verify_arg};
use widecol_store::{ColumnLayout, ColumnOffset, Order, SliceRange};

/// Absolute time window (milliseconds, both ends inclusive) and traversal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchWindow {
    pub start: i64,
    pub end: i64,
    pub order: Order,
}

impl FetchWindow {
    pub fn new(start: i64, end: i64, order: Order) -> Result<FetchWindow> {
        verify_arg!(end, end >= start);
        Ok(FetchWindow { start, end, order })
    }

    pub fn ascending(start: i64, end: i64) -> Result<FetchWindow> {
        Self::new(start, end, Order::Asc)
    }

    pub fn descending(start: i64, end: i64) -> Result<FetchWindow> {
        Self::new(start, end, Order::Desc)
    }

    /// Translates the window into inclusive column offsets of the tier starting at
    /// `tier_start`.
    ///
    /// Both ends are clamped to the tier. The end offset is extended by one so that
    /// both discriminator variants of the last timestamp are covered.
    pub fn offsets(&self, layout: &dyn ColumnLayout, tier_start: i64) -> OffsetBounds {
        let tier_end = tier_start.saturating_add(layout.tier_width());
        let start = if self.start < tier_start {
            0
        } else {
            layout.column_offset(tier_start, self.start.min(tier_end))
        };
        let end = layout.column_offset(tier_start, self.end.clamp(tier_start, tier_end)) + 1;
        OffsetBounds { start, end }
    }
}

/// Inclusive column offsets of a fetch within one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetBounds {
    pub start: ColumnOffset,
    pub end: ColumnOffset,
}

impl OffsetBounds {
    /// The slice covering the whole window.
    pub fn full_slice(&self, order: Order, limit: usize) -> SliceRange {
        SliceRange {
            start: self.start,
            end: self.end,
            order,
            limit,
        }
    }

    /// The slice resuming after the column at `last`, which was the final column of
    /// the previous batch.
    ///
    /// Ascending slices restart one past `last` and run to the window end; descending
    /// ones restart one before `last` and run down to the window start. Returns `None`
    /// once the boundary has passed the window.
    pub fn resume_after(
        &self,
        last: ColumnOffset,
        order: Order,
        limit: usize,
    ) -> Option<SliceRange> {
        let (start, end) = match order {
            Order::Asc => (last.checked_add(1)?, self.end),
            Order::Desc => (self.start, last.checked_sub(1)?),
        };
        (start <= end).then_some(SliceRange {
            start,
            end,
            order,
            limit,
        })
    }
}
