//! JSON descriptions of store content.
//!
//! ```json
//! {
//!   "tier_width": 1000,
//!   "rows": [
//!     {
//!       "metric": "cpu",
//!       "tier_start": 0,
//!       "tags": { "host": "a" },
//!       "samples": [
//!         { "timestamp": 5, "value": { "long": 3 } },
//!         { "timestamp": 6, "value": { "double": 1.5 } }
//!       ]
//!     }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::Deserialize;
use widecol_codec::{pack, pack_double};
use widecol_store::{Column, MemoryStore, RowKey, Tags, TierLayout};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Dataset {
    #[serde(default = "default_tier_width")]
    pub tier_width: i64,
    pub rows: Vec<DatasetRow>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatasetRow {
    pub metric: String,
    pub tier_start: i64,
    #[serde(default)]
    pub tags: Tags,
    #[serde(default)]
    pub data_type: Option<String>,
    pub samples: Vec<DatasetSample>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatasetSample {
    pub timestamp: i64,
    pub value: StoredValue,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoredValue {
    Long(i64),
    Double(f64),
}

fn default_tier_width() -> i64 {
    TierLayout::DEFAULT_WIDTH
}

impl Dataset {
    pub fn from_json(json: &str) -> anyhow::Result<Dataset> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Dataset> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn layout(&self) -> anyhow::Result<TierLayout> {
        Ok(TierLayout::new(self.tier_width)?)
    }

    /// Writes every row into `store` under `row_family`, returning the row keys in
    /// dataset order.
    ///
    /// Legacy rows encode the value kind in the column offset; typed rows use the
    /// plain time offset.
    pub fn populate(
        &self,
        store: &MemoryStore,
        row_family: &str,
    ) -> anyhow::Result<Vec<RowKey>> {
        let layout = self.layout()?;
        let mut keys = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            let mut key = RowKey::new(&row.metric, row.tier_start, row.tags.clone());
            if let Some(data_type) = &row.data_type {
                key = key.with_data_type(data_type);
            }
            let columns = row.samples.iter().map(|sample| {
                let legacy = key.data_type().is_none();
                let (flagged, value) = match sample.value {
                    StoredValue::Long(v) => (
                        layout.long_offset(row.tier_start, sample.timestamp),
                        pack(v),
                    ),
                    StoredValue::Double(v) => (
                        layout.double_offset(row.tier_start, sample.timestamp),
                        pack_double(v),
                    ),
                };
                let offset = if legacy {
                    flagged
                } else {
                    flagged & !0x1
                };
                Column::new(offset, value)
            });
            store.put_all(row_family, &key, columns);
            keys.push(key);
        }
        Ok(keys)
    }
}
