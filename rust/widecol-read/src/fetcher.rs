//! Paginated range reads over the rows of one tier.
//!
//! A fetch proceeds in two tiers of requests:
//!
//! 1. One multi-row slice over all row keys, capped at `multi_row` columns per row.
//!    Every returned row is decoded and forwarded immediately. A row that returned
//!    exactly `multi_row` columns is presumed truncated.
//! 2. Every truncated row is drained with single-row slices that resume just past
//!    (ascending) or before (descending) the last column received, capped at
//!    `single_row` columns, until a short batch arrives or the boundary leaves the
//!    window.
//!
//! With a hard limit both caps equal the limit and step 2 never happens.

use std::sync::Arc;

use log::Level;
use widecol_common::{Error, Result, widecol_log};
use widecol_store::{Column, ColumnOffset, Order, RowKey, WideColumnStore};

use crate::{
    fetch_pool::ContinuationPool,
    options::{FetchOptions, PageSizes},
    row_decoder::RowDecoder,
    sink::SampleSink,
    window::{FetchWindow, OffsetBounds},
};

/// What to read: a row family, the rows of one tier, and a time window.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub row_family: String,
    pub row_keys: Vec<RowKey>,
    pub window: FetchWindow,
}

impl FetchRequest {
    pub fn new(
        row_family: impl Into<String>,
        row_keys: Vec<RowKey>,
        window: FetchWindow,
    ) -> FetchRequest {
        FetchRequest {
            row_family: row_family.into(),
            row_keys,
            window,
        }
    }

    /// Checks that the request names at least one row and that all rows share a tier.
    ///
    /// Returns the shared tier start.
    fn shared_tier_start(&self) -> Result<i64> {
        let Some(first) = self.row_keys.first() else {
            return Err(Error::invalid_arg("row_keys", "must not be empty"));
        };
        let tier_start = first.tier_start();
        if let Some(other) = self
            .row_keys
            .iter()
            .find(|key| key.tier_start() != tier_start)
        {
            return Err(Error::invalid_arg(
                "row_keys",
                format!(
                    "all rows must share one tier, found {} and {}",
                    tier_start,
                    other.tier_start()
                ),
            ));
        }
        Ok(tier_start)
    }
}

/// Counters describing a completed fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchStats {
    /// Rows returned by the fan-out request.
    pub rows: usize,
    /// Rows presumed truncated by the fan-out request.
    pub truncated_rows: usize,
    /// Single-row continuation requests issued.
    pub continuation_requests: usize,
    /// Samples forwarded to the sink.
    pub samples: usize,
}

/// A row queued for continuation, with the offset of the last column received.
struct Continuation {
    key: RowKey,
    last: ColumnOffset,
}

/// Single-use reader of one time window across the rows of one tier.
///
/// Results are streamed into the sink as a side effect of [`run`](RangeFetcher::run).
/// The sink stays borrowed by the caller so that samples delivered before a failure
/// remain observable.
pub struct RangeFetcher<'a, S: SampleSink + ?Sized> {
    store: Arc<dyn WideColumnStore>,
    decoder: RowDecoder,
    row_family: String,
    row_keys: Vec<RowKey>,
    bounds: OffsetBounds,
    order: Order,
    pages: PageSizes,
    parallelism: usize,
    pool: Option<Arc<ContinuationPool>>,
    sink: &'a mut S,
}

impl<'a, S: SampleSink + ?Sized> RangeFetcher<'a, S> {
    /// Creates a fetcher for `request`.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if the request has no row keys, if its row keys span several
    /// tiers, or if `options` do not validate.
    pub fn new(
        store: Arc<dyn WideColumnStore>,
        decoder: RowDecoder,
        request: FetchRequest,
        options: &FetchOptions,
        sink: &'a mut S,
    ) -> Result<RangeFetcher<'a, S>> {
        options.validate()?;
        let tier_start = request.shared_tier_start()?;
        let bounds = request
            .window
            .offsets(decoder.layout().as_ref(), tier_start);

        Ok(RangeFetcher {
            store,
            decoder,
            row_family: request.row_family,
            row_keys: request.row_keys,
            bounds,
            order: request.window.order,
            pages: options.page_sizes(),
            parallelism: options.continuation_parallelism,
            pool: None,
            sink,
        })
    }

    /// Drains truncated rows on the given pool instead of the shared one.
    ///
    /// Only used when the continuation parallelism is greater than one.
    pub fn with_pool(mut self, pool: Arc<ContinuationPool>) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Column offsets requested from every row.
    pub fn bounds(&self) -> OffsetBounds {
        self.bounds
    }

    pub fn page_sizes(&self) -> PageSizes {
        self.pages
    }

    /// Runs the fetch, forwarding every decoded batch to the sink.
    ///
    /// # Errors
    ///
    /// Store, decode and sink errors abort the fetch and are returned unmodified.
    /// Samples forwarded before the failure are not retracted.
    pub fn run(mut self) -> Result<FetchStats> {
        let mut stats = FetchStats::default();
        let fanout = self.bounds.full_slice(self.order, self.pages.multi_row);

        widecol_log!(
            Level::Debug,
            "fanout_issued",
            "row_family={} rows={} start={} end={} order={:?} limit={}",
            self.row_family,
            self.row_keys.len(),
            fanout.start,
            fanout.end,
            fanout.order,
            fanout.limit,
        );
        let rows = self
            .store
            .multi_row_slice(&self.row_family, &self.row_keys, &fanout)?;

        let mut unfinished = Vec::new();
        for row in rows {
            stats.rows += 1;
            stats.samples += self.forward(&row.key, &row.columns)?;
            if self.pages.is_truncated(row.columns.len()) {
                if let Some(last) = row.columns.last() {
                    unfinished.push(Continuation {
                        last: last.offset,
                        key: row.key,
                    });
                }
            }
        }
        stats.truncated_rows = unfinished.len();
        widecol_log!(
            Level::Debug,
            "fanout_completed",
            "rows={} truncated_rows={} samples={}",
            stats.rows,
            stats.truncated_rows,
            stats.samples,
        );

        if self.parallelism > 1 && unfinished.len() > 1 {
            self.drain_concurrently(&unfinished, &mut stats)?;
        } else {
            for row in &unfinished {
                self.drain(row, &mut stats)?;
            }
        }

        widecol_log!(
            Level::Debug,
            "fetch_finished",
            "row_family={} rows={} truncated_rows={} continuation_requests={} samples={}",
            self.row_family,
            stats.rows,
            stats.truncated_rows,
            stats.continuation_requests,
            stats.samples,
        );
        Ok(stats)
    }

    /// Reads the rest of one truncated row, forwarding each batch as it arrives.
    fn drain(&mut self, row: &Continuation, stats: &mut FetchStats) -> Result<()> {
        widecol_log!(
            Level::Debug,
            "continuation_started",
            "row={} last={}",
            row.key,
            row.last
        );
        let mut last = row.last;
        while let Some(range) = self
            .bounds
            .resume_after(last, self.order, self.pages.single_row)
        {
            let columns = self
                .store
                .single_row_slice(&self.row_family, &row.key, &range)?;
            stats.continuation_requests += 1;
            stats.samples += self.forward(&row.key, &columns)?;
            match columns.last() {
                Some(column) if self.pages.continues(columns.len()) => last = column.offset,
                _ => break,
            }
        }
        Ok(())
    }

    /// Reads the rest of several truncated rows concurrently.
    ///
    /// Rows are processed in groups of at most `parallelism` rows. Within a group
    /// every row's batches are buffered, then forwarded row after row in queue order,
    /// so a row's batches always reach the sink contiguously and in sequence.
    fn drain_concurrently(
        &mut self,
        unfinished: &[Continuation],
        stats: &mut FetchStats,
    ) -> Result<()> {
        let pool = self.pool.clone().unwrap_or_else(ContinuationPool::get);
        for group in unfinished.chunks(self.parallelism) {
            widecol_log!(
                Level::Debug,
                "continuation_group_started",
                "rows={} threads={}",
                group.len(),
                pool.num_threads()
            );
            let fetched = pool.map(group, |row| {
                fetch_remaining(
                    self.store.as_ref(),
                    &self.row_family,
                    &self.bounds,
                    self.order,
                    &self.pages,
                    row,
                )
            });
            for (row, batches) in group.iter().zip(fetched) {
                let (batches, requests) = batches?;
                stats.continuation_requests += requests;
                for columns in &batches {
                    stats.samples += self.forward(&row.key, columns)?;
                }
            }
        }
        Ok(())
    }

    fn forward(&mut self, key: &RowKey, columns: &[Column]) -> Result<usize> {
        widecol_log!(
            Level::Trace,
            "batch_received",
            "row={} columns={}",
            key,
            columns.len()
        );
        self.decoder.decode(key, columns, &mut *self.sink)
    }
}

/// Collects every remaining batch of one truncated row without forwarding it.
///
/// Returns the non-empty batches and the number of requests issued.
fn fetch_remaining(
    store: &dyn WideColumnStore,
    row_family: &str,
    bounds: &OffsetBounds,
    order: Order,
    pages: &PageSizes,
    row: &Continuation,
) -> Result<(Vec<Vec<Column>>, usize)> {
    let mut batches = Vec::new();
    let mut requests = 0;
    let mut last = row.last;
    while let Some(range) = bounds.resume_after(last, order, pages.single_row) {
        let columns = store.single_row_slice(row_family, &row.key, &range)?;
        requests += 1;
        let next = match columns.last() {
            Some(column) if pages.continues(columns.len()) => Some(column.offset),
            _ => None,
        };
        if !columns.is_empty() {
            batches.push(columns);
        }
        match next {
            Some(offset) => last = offset,
            None => break,
        }
    }
    Ok((batches, requests))
}
