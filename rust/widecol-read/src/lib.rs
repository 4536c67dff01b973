//! Time-range read path over a wide-column store.
//!
//! A [`RangeFetcher`] reads one time window from a set of rows sharing a tier: a single
//! fan-out slice across all rows, followed by per-row continuation slices for every row
//! whose first page came back full. Raw columns are turned into [`Sample`]s by the
//! [`RowDecoder`] and streamed into a [`SampleSink`] batch by batch.

pub mod fetch_pool;
pub mod fetcher;
pub mod options;
pub mod registry;
pub mod row_decoder;
pub mod sample;
pub mod sink;
pub mod window;

pub use fetch_pool::ContinuationPool;
pub use fetcher::{FetchRequest, FetchStats, RangeFetcher};
pub use options::{FetchOptions, PageSizes};
pub use registry::{DecoderRegistry, SampleDecoder, TypeRegistry};
pub use row_decoder::RowDecoder;
pub use sample::{Sample, SampleValue};
pub use sink::{CollectingSink, SampleSet, SampleSink};
pub use window::{FetchWindow, OffsetBounds};
