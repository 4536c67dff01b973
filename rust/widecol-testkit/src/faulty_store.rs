//! Store wrapper failing a chosen request.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use widecol_common::{Error, Result};
use widecol_store::{Column, RowKey, RowSlice, SliceRange, WideColumnStore};

/// Forwards requests to an inner store, failing the request with the given
/// zero-based sequence number with a timeout error.
pub struct FaultyStore {
    inner: Arc<dyn WideColumnStore>,
    fail_at: usize,
    issued: AtomicUsize,
}

impl FaultyStore {
    pub fn new(inner: Arc<dyn WideColumnStore>, fail_at: usize) -> FaultyStore {
        FaultyStore {
            inner,
            fail_at,
            issued: AtomicUsize::new(0),
        }
    }

    /// Number of requests received so far, including the failed one.
    pub fn issued(&self) -> usize {
        self.issued.load(Ordering::SeqCst)
    }

    fn check(&self, context: &str) -> Result<()> {
        if self.issued.fetch_add(1, Ordering::SeqCst) == self.fail_at {
            Err(Error::store(
                context,
                std::io::Error::new(std::io::ErrorKind::TimedOut, "injected timeout"),
            ))
        } else {
            Ok(())
        }
    }
}

impl WideColumnStore for FaultyStore {
    fn multi_row_slice(
        &self,
        row_family: &str,
        keys: &[RowKey],
        range: &SliceRange,
    ) -> Result<Vec<RowSlice>> {
        self.check("multi_row_slice")?;
        self.inner.multi_row_slice(row_family, keys, range)
    }

    fn single_row_slice(
        &self,
        row_family: &str,
        key: &RowKey,
        range: &SliceRange,
    ) -> Result<Vec<Column>> {
        self.check("single_row_slice")?;
        self.inner.single_row_slice(row_family, key, range)
    }
}
