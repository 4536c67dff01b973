//! Mapping between absolute timestamps and within-tier column offsets.
//!
//! The default [`TierLayout`] stores a column at
//!
//! ```text
//! offset = (timestamp - tier_start) << 1 | flag
//! ```
//!
//! where `flag` is the legacy value-kind discriminator: `0` for long samples, `1` for
//! double samples. Rows with a registered sample type always use a zero flag. This
//! layout is persisted and must be reproduced bit for bit.

use widecol_common::{Error, Result};

use crate::ColumnOffset;

/// Discriminator bit value marking a legacy long sample.
pub const LONG_FLAG: ColumnOffset = 0x0;

/// Discriminator bit value marking a legacy double sample.
pub const DOUBLE_FLAG: ColumnOffset = 0x1;

/// Converts between absolute timestamps and column offsets of a tiered row.
pub trait ColumnLayout: Send + Sync + 'static {
    /// Duration, in milliseconds, covered by one row.
    fn tier_width(&self) -> i64;

    /// Returns the offset of the time component of `timestamp` within the row starting
    /// at `tier_start`, with a zero discriminator bit.
    ///
    /// `timestamp` is expected to lie within `[tier_start, tier_start + tier_width]`;
    /// values outside are saturated to those bounds.
    fn column_offset(&self, tier_start: i64, timestamp: i64) -> ColumnOffset;

    /// Returns the absolute timestamp of the column at `offset`.
    fn column_timestamp(&self, tier_start: i64, offset: ColumnOffset) -> i64;

    /// Returns `true` if the legacy discriminator bit of `offset` marks a long value.
    fn is_long_value(&self, offset: ColumnOffset) -> bool;
}

/// Default tier layout: fixed-width rows, one bit of the offset reserved for the
/// legacy value-kind discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierLayout {
    width: i64,
}

impl TierLayout {
    /// Default row width: three weeks in milliseconds.
    pub const DEFAULT_WIDTH: i64 = 1_814_400_000;

    /// Creates a layout with the given row width in milliseconds.
    ///
    /// Fails if the width is not positive or if the last column of the row would not
    /// fit into a 32-bit offset.
    pub fn new(width: i64) -> Result<TierLayout> {
        if width <= 0 || width > (ColumnOffset::MAX >> 1) as i64 {
            return Err(Error::invalid_arg(
                "width",
                format!("tier width {width} out of range"),
            ));
        }
        Ok(TierLayout { width })
    }

    /// Offset of a legacy long sample at `timestamp`.
    pub fn long_offset(&self, tier_start: i64, timestamp: i64) -> ColumnOffset {
        self.column_offset(tier_start, timestamp) | LONG_FLAG
    }

    /// Offset of a legacy double sample at `timestamp`.
    pub fn double_offset(&self, tier_start: i64, timestamp: i64) -> ColumnOffset {
        self.column_offset(tier_start, timestamp) | DOUBLE_FLAG
    }
}

impl Default for TierLayout {
    fn default() -> Self {
        TierLayout {
            width: Self::DEFAULT_WIDTH,
        }
    }
}

impl ColumnLayout for TierLayout {
    fn tier_width(&self) -> i64 {
        self.width
    }

    fn column_offset(&self, tier_start: i64, timestamp: i64) -> ColumnOffset {
        let delta = timestamp.saturating_sub(tier_start).clamp(0, self.width);
        (delta as ColumnOffset) << 1
    }

    fn column_timestamp(&self, tier_start: i64, offset: ColumnOffset) -> i64 {
        tier_start + (offset >> 1) as i64
    }

    fn is_long_value(&self, offset: ColumnOffset) -> bool {
        offset & 0x1 == LONG_FLAG
    }
}
