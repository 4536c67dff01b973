//! # widecol: time-range reads over a wide-column time-series store
//!
//! Samples of a series are stored in tiered rows: each row covers a fixed time span
//! (its tier), and each sample is one column whose offset encodes its time within the
//! tier. This crate re-exports the components of the read path:
//!
//! * [`codec`] - byte layouts of stored values
//! * [`common`] - errors, result helpers and logging shared by all crates
//! * [`read`] - range fetcher, row decoder, sample-type registry and sinks
//! * [`store`] - wide-column store abstraction, row keys and tier layout
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use widecol::read::{
//!     CollectingSink, DecoderRegistry, FetchOptions, FetchRequest, FetchWindow, RangeFetcher,
//!     RowDecoder,
//! };
//! use widecol::store::{Column, MemoryStore, RowKey, Tags, TierLayout};
//!
//! let layout = TierLayout::default();
//! let store = Arc::new(MemoryStore::new());
//! let key = RowKey::new("cpu.load", 0, Tags::new());
//! store.put_all(
//!     "data_points",
//!     &key,
//!     (1..=3).map(|t| Column::new(layout.long_offset(0, t), widecol::codec::pack(t * 100))),
//! );
//!
//! let decoder = RowDecoder::new(Arc::new(DecoderRegistry::default()), Arc::new(layout));
//! let request = FetchRequest::new("data_points", vec![key], FetchWindow::ascending(0, 10)?);
//! let mut sink = CollectingSink::new();
//! let stats = RangeFetcher::new(store, decoder, request, &FetchOptions::default(), &mut sink)?
//!     .run()?;
//!
//! assert_eq!(stats.samples, 3);
//! assert_eq!(sink.sets()[0].samples[2].as_long(), Some(300));
//! # Ok::<(), widecol::common::Error>(())
//! ```

pub use widecol_codec as codec;
pub use widecol_common as common;
pub use widecol_read as read;
pub use widecol_store as store;
