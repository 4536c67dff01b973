//! In-memory implementation of the `WideColumnStore` trait.

use std::{
    collections::BTreeMap,
    sync::{Mutex, RwLock},
};

use widecol_common::Result;

use crate::{Column, ColumnOffset, Order, RowKey, RowSlice, SliceRange, WideColumnStore};

type Row = BTreeMap<ColumnOffset, Vec<u8>>;
type Family = ahash::HashMap<RowKey, Row>;

/// A slice request observed by a [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SliceRequest {
    MultiRow {
        row_family: String,
        keys: Vec<RowKey>,
        range: SliceRange,
    },
    SingleRow {
        row_family: String,
        key: RowKey,
        range: SliceRange,
    },
}

impl SliceRequest {
    pub fn range(&self) -> &SliceRange {
        match self {
            SliceRequest::MultiRow { range, .. } | SliceRequest::SingleRow { range, .. } => range,
        }
    }

    pub fn is_single_row(&self) -> bool {
        matches!(self, SliceRequest::SingleRow { .. })
    }
}

/// Wide-column store kept entirely in memory.
///
/// Rows are sorted by column offset. Every slice request is recorded in a journal,
/// which makes the store handy for inspecting the request pattern of a reader.
/// Multi-row slices return one entry per requested key, in request order, including
/// keys that have no columns.
#[derive(Default)]
pub struct MemoryStore {
    families: RwLock<ahash::HashMap<String, Family>>,
    journal: Mutex<Vec<SliceRequest>>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        Default::default()
    }

    /// Stores a single column, replacing any previous value at the same offset.
    pub fn put(&self, row_family: &str, key: &RowKey, column: Column) {
        let mut families = self.families.write().unwrap();
        families
            .entry(row_family.to_string())
            .or_default()
            .entry(key.clone())
            .or_default()
            .insert(column.offset, column.value);
    }

    /// Stores a batch of columns for one row.
    pub fn put_all(
        &self,
        row_family: &str,
        key: &RowKey,
        columns: impl IntoIterator<Item = Column>,
    ) {
        let mut families = self.families.write().unwrap();
        let row = families
            .entry(row_family.to_string())
            .or_default()
            .entry(key.clone())
            .or_default();
        for column in columns {
            row.insert(column.offset, column.value);
        }
    }

    /// Number of columns stored for the given row.
    pub fn column_count(&self, row_family: &str, key: &RowKey) -> usize {
        let families = self.families.read().unwrap();
        families
            .get(row_family)
            .and_then(|family| family.get(key))
            .map_or(0, Row::len)
    }

    /// Returns a copy of all requests served so far, oldest first.
    pub fn requests(&self) -> Vec<SliceRequest> {
        self.journal.lock().unwrap().clone()
    }

    /// Drains the request journal.
    pub fn take_requests(&self) -> Vec<SliceRequest> {
        std::mem::take(&mut *self.journal.lock().unwrap())
    }

    fn slice(family: Option<&Family>, key: &RowKey, range: &SliceRange) -> Vec<Column> {
        let Some(row) = family.and_then(|family| family.get(key)) else {
            return Vec::new();
        };
        if range.is_empty() {
            return Vec::new();
        }
        let columns = row.range(range.start..=range.end);
        let to_column =
            |(&offset, value): (&ColumnOffset, &Vec<u8>)| Column::new(offset, value.clone());
        match range.order {
            Order::Asc => columns.take(range.limit).map(to_column).collect(),
            Order::Desc => columns.rev().take(range.limit).map(to_column).collect(),
        }
    }

    fn record(&self, request: SliceRequest) {
        self.journal.lock().unwrap().push(request);
    }
}

impl WideColumnStore for MemoryStore {
    fn multi_row_slice(
        &self,
        row_family: &str,
        keys: &[RowKey],
        range: &SliceRange,
    ) -> Result<Vec<RowSlice>> {
        self.record(SliceRequest::MultiRow {
            row_family: row_family.to_string(),
            keys: keys.to_vec(),
            range: *range,
        });
        let families = self.families.read().unwrap();
        let family = families.get(row_family);
        Ok(keys
            .iter()
            .map(|key| RowSlice {
                key: key.clone(),
                columns: Self::slice(family, key, range),
            })
            .collect())
    }

    fn single_row_slice(
        &self,
        row_family: &str,
        key: &RowKey,
        range: &SliceRange,
    ) -> Result<Vec<Column>> {
        self.record(SliceRequest::SingleRow {
            row_family: row_family.to_string(),
            key: key.clone(),
            range: *range,
        });
        let families = self.families.read().unwrap();
        Ok(Self::slice(families.get(row_family), key, range))
    }
}
