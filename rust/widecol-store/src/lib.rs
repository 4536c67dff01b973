//! Wide-column store abstractions consumed by the read path:
//! - `RowKey`: identity of one physical row (metric, tier start, tags, sample type).
//! - `WideColumnStore`: slice-query capability over one or many rows.
//! - `ColumnLayout`: mapping between absolute timestamps and within-tier column offsets.
//!
//! Provides an in-memory implementation of the store, [`MemoryStore`].

pub mod layout;
pub mod memory_store;
pub mod row_key;

use serde::{Deserialize, Serialize};

pub use layout::{ColumnLayout, TierLayout};
pub use memory_store::MemoryStore;
pub use row_key::{RowKey, Tags};

/// Within-tier column identifier.
pub type ColumnOffset = u32;

/// One column of a row: its offset and the raw stored value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub offset: ColumnOffset,
    pub value: Vec<u8>,
}

impl Column {
    pub fn new(offset: ColumnOffset, value: impl Into<Vec<u8>>) -> Column {
        Column {
            offset,
            value: value.into(),
        }
    }
}

/// The columns returned for one row of a multi-row slice, in store order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowSlice {
    pub key: RowKey,
    pub columns: Vec<Column>,
}

/// Column traversal direction within a row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    #[default]
    Asc,
    Desc,
}

/// Parameters of a slice query.
///
/// Both bounds are inclusive and always given as `start <= end`, regardless of the
/// traversal order. A descending slice walks from `end` down to `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceRange {
    pub start: ColumnOffset,
    pub end: ColumnOffset,
    pub order: Order,
    /// Maximum number of columns returned per row.
    pub limit: usize,
}

impl SliceRange {
    /// Returns `true` if the bounds have crossed and the slice can match nothing.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start > self.end || self.limit == 0
    }
}

/// A "wide-column store" client capable of slice queries.
///
/// Calls are synchronous. Timeouts, retries and connection management are the
/// responsibility of the implementation; failures are reported as
/// `ErrorKind::Store`.
pub trait WideColumnStore: Send + Sync + 'static {
    /// Reads up to `range.limit` columns from each of the given rows.
    ///
    /// # Arguments
    ///
    /// * `row_family` - The named collection of rows to query.
    /// * `keys` - The rows to read.
    /// * `range` - Column bounds, direction and per-row column cap.
    ///
    /// # Returns
    ///
    /// One entry per row that the store returned, in store order. Columns within
    /// each entry follow `range.order`. Rows may be returned with no columns.
    fn multi_row_slice(
        &self,
        row_family: &str,
        keys: &[RowKey],
        range: &SliceRange,
    ) -> widecol_common::Result<Vec<RowSlice>>;

    /// Reads up to `range.limit` columns from a single row, ordered by `range.order`.
    fn single_row_slice(
        &self,
        row_family: &str,
        key: &RowKey,
        range: &SliceRange,
    ) -> widecol_common::Result<Vec<Column>>;
}

impl<S: WideColumnStore + ?Sized> WideColumnStore for std::sync::Arc<S> {
    fn multi_row_slice(
        &self,
        row_family: &str,
        keys: &[RowKey],
        range: &SliceRange,
    ) -> widecol_common::Result<Vec<RowSlice>> {
        (**self).multi_row_slice(row_family, keys, range)
    }

    fn single_row_slice(
        &self,
        row_family: &str,
        key: &RowKey,
        range: &SliceRange,
    ) -> widecol_common::Result<Vec<Column>> {
        (**self).single_row_slice(row_family, key, range)
    }
}
