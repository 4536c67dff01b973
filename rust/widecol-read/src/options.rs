//! Fetch configuration.

use serde::{Deserialize, Serialize};
use widecol_common::{Error, Result, verify_arg};

/// Page sizes and parallelism of a range fetch.
///
/// Usually deserialized from the application's configuration, every field is optional:
///
/// ```
/// use widecol_read::FetchOptions;
///
/// let options = FetchOptions::from_json(r#"{ "multi_row_read_size": 256 }"#).unwrap();
/// assert_eq!(options.multi_row_read_size, 256);
/// assert_eq!(options.single_row_read_size, FetchOptions::DEFAULT_SINGLE_ROW_READ_SIZE);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchOptions {
    /// Column cap of each per-row continuation request.
    pub single_row_read_size: usize,
    /// Per-row column cap of the initial fan-out request.
    pub multi_row_read_size: usize,
    /// Hard limit on the number of columns read per row, `0` when unset.
    ///
    /// When set, it replaces both read sizes and disables continuation requests.
    pub limit: usize,
    /// Maximum number of rows drained concurrently by continuation requests.
    /// `1` drains them one after another.
    pub continuation_parallelism: usize,
}

impl FetchOptions {
    pub const DEFAULT_SINGLE_ROW_READ_SIZE: usize = 10240;
    pub const DEFAULT_MULTI_ROW_READ_SIZE: usize = 1024;

    /// Parses and validates options from a JSON document.
    pub fn from_json(json: &str) -> Result<FetchOptions> {
        let options: FetchOptions = serde_json::from_str(json)
            .map_err(|e| Error::invalid_arg("fetch options", e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_read_sizes(mut self, multi_row: usize, single_row: usize) -> Self {
        self.multi_row_read_size = multi_row;
        self.single_row_read_size = single_row;
        self
    }

    pub fn with_continuation_parallelism(mut self, parallelism: usize) -> Self {
        self.continuation_parallelism = parallelism;
        self
    }

    pub fn validate(&self) -> Result<()> {
        verify_arg!(single_row_read_size, self.single_row_read_size > 0);
        verify_arg!(multi_row_read_size, self.multi_row_read_size > 0);
        verify_arg!(
            continuation_parallelism,
            self.continuation_parallelism > 0
        );
        Ok(())
    }

    /// Resolves the interaction between the hard limit and the read sizes.
    pub fn page_sizes(&self) -> PageSizes {
        if self.limit != 0 {
            PageSizes {
                multi_row: self.limit,
                single_row: self.limit,
                limited: true,
            }
        } else {
            PageSizes {
                multi_row: self.multi_row_read_size,
                single_row: self.single_row_read_size,
                limited: false,
            }
        }
    }
}

impl Default for FetchOptions {
    fn default() -> Self {
        FetchOptions {
            single_row_read_size: Self::DEFAULT_SINGLE_ROW_READ_SIZE,
            multi_row_read_size: Self::DEFAULT_MULTI_ROW_READ_SIZE,
            limit: 0,
            continuation_parallelism: 1,
        }
    }
}

/// Effective per-request column caps of one fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSizes {
    pub multi_row: usize,
    pub single_row: usize,
    /// A hard limit is active: every row is considered complete after the fan-out.
    pub limited: bool,
}

impl PageSizes {
    /// Returns `true` if a row that returned `column_count` columns from the fan-out
    /// request may hold more columns within the window.
    ///
    /// A row holding exactly `multi_row` columns is reported as truncated as well and
    /// costs one empty continuation request.
    #[inline]
    pub fn is_truncated(&self, column_count: usize) -> bool {
        !self.limited && column_count == self.multi_row
    }

    /// Returns `true` if a continuation batch of `column_count` columns calls for
    /// another continuation request.
    #[inline]
    pub fn continues(&self, column_count: usize) -> bool {
        column_count == self.single_row
    }
}
