//! Conversion of a row's raw columns into samples.

use std::sync::Arc;

use widecol_common::Result;
use widecol_store::{Column, ColumnLayout, RowKey};

use crate::{
    registry::{LEGACY_TYPE, TypeRegistry},
    sink::SampleSink,
};

/// Decodes batches of raw `(offset, bytes)` columns of one row and forwards them to a
/// sink as one sample set per batch.
#[derive(Clone)]
pub struct RowDecoder {
    registry: Arc<dyn TypeRegistry>,
    layout: Arc<dyn ColumnLayout>,
}

impl RowDecoder {
    pub fn new(registry: Arc<dyn TypeRegistry>, layout: Arc<dyn ColumnLayout>) -> RowDecoder {
        RowDecoder { registry, layout }
    }

    pub fn layout(&self) -> &Arc<dyn ColumnLayout> {
        &self.layout
    }

    /// Decodes `columns` read from the row identified by `key` and forwards them to
    /// `sink`, in the given order.
    ///
    /// An empty batch produces no sink calls. Otherwise the sample type is resolved
    /// once for the whole batch and a single sample set is opened for it.
    ///
    /// # Returns
    ///
    /// The number of samples forwarded.
    ///
    /// # Errors
    ///
    /// `UnknownType` if the row's sample type is not registered, `InvalidFormat` if a
    /// value cannot be decoded, or any error raised by the sink. Samples forwarded
    /// before the failure stay delivered.
    pub fn decode<S>(&self, key: &RowKey, columns: &[Column], sink: &mut S) -> Result<usize>
    where
        S: SampleSink + ?Sized,
    {
        if columns.is_empty() {
            return Ok(0);
        }

        let data_type = key.data_type().unwrap_or(LEGACY_TYPE);
        let decoder = self.registry.resolve(data_type)?;
        let layout = self.layout.as_ref();
        let tier_start = key.tier_start();

        sink.begin_sample_set(data_type, key.tags())?;
        for column in columns {
            let timestamp = layout.column_timestamp(tier_start, column.offset);
            let sample = decoder.decode_column(timestamp, column.offset, layout, &column.value)?;
            sink.add_sample(sample)?;
        }
        sink.end_sample_set()?;
        Ok(columns.len())
    }
}
