//! Row identity.

use std::collections::BTreeMap;

/// Tag set of a series. Membership matters, insertion order does not.
pub type Tags = BTreeMap<String, String>;

/// Identity of one physical row: a metric's series within one tier.
///
/// Immutable once built. Row keys are produced by the caller before a fetch and
/// passed to the store as is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowKey {
    metric: String,
    tier_start: i64,
    tags: Tags,
    data_type: Option<String>,
}

impl RowKey {
    /// Creates a row key without an explicit sample type (legacy row format).
    pub fn new(metric: impl Into<String>, tier_start: i64, tags: Tags) -> RowKey {
        RowKey {
            metric: metric.into(),
            tier_start,
            tags,
            data_type: None,
        }
    }

    /// Returns a copy of this key carrying the given registered sample type.
    pub fn with_data_type(mut self, data_type: impl Into<String>) -> RowKey {
        self.data_type = Some(data_type.into());
        self
    }

    pub fn metric(&self) -> &str {
        &self.metric
    }

    /// Absolute timestamp (milliseconds) at which this row's tier begins.
    pub fn tier_start(&self) -> i64 {
        self.tier_start
    }

    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    /// Registered sample type name, `None` for legacy rows.
    pub fn data_type(&self) -> Option<&str> {
        self.data_type.as_deref()
    }
}

impl std::fmt::Display for RowKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.metric, self.tier_start)?;
        for (name, value) in &self.tags {
            write!(f, ",{name}={value}")?;
        }
        if let Some(data_type) = &self.data_type {
            write!(f, ":{data_type}")?;
        }
        Ok(())
    }
}
