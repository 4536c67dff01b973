use std::sync::Arc;

use widecol_codec::pack;
use widecol_common::Result;
use widecol_read::{
    CollectingSink, ContinuationPool, DecoderRegistry, FetchOptions, FetchRequest, FetchStats,
    FetchWindow, RangeFetcher, RowDecoder, Sample,
    registry::{LEGACY_TYPE, LONG_TYPE},
};
use widecol_store::{
    Column, MemoryStore, Order, RowKey, TierLayout, WideColumnStore, memory_store::SliceRequest,
};
use widecol_testkit::{
    FaultyStore,
    data_gen::{
        ROW_FAMILY, host_row, legacy_double_columns, legacy_long_columns, populate_legacy_longs,
        typed_long_columns,
    },
};

const TIER: i64 = 1_814_400_000 * 800;

struct Fixture {
    store: Arc<MemoryStore>,
    layout: TierLayout,
}

impl Fixture {
    fn new() -> Fixture {
        Fixture {
            store: Arc::new(MemoryStore::new()),
            layout: TierLayout::default(),
        }
    }

    fn decoder(&self) -> RowDecoder {
        RowDecoder::new(
            Arc::new(DecoderRegistry::with_builtins()),
            Arc::new(self.layout),
        )
    }

    fn legacy_row(&self, host: &str, count: i64) -> RowKey {
        let key = host_row("cpu", TIER, host);
        populate_legacy_longs(&self.store, &self.layout, &key, count);
        key
    }

    fn fetch_from(
        &self,
        store: Arc<dyn WideColumnStore>,
        keys: Vec<RowKey>,
        window: FetchWindow,
        options: &FetchOptions,
        sink: &mut CollectingSink,
    ) -> Result<FetchStats> {
        let request = FetchRequest::new(ROW_FAMILY, keys, window);
        RangeFetcher::new(store, self.decoder(), request, options, sink)?.run()
    }

    fn fetch(
        &self,
        keys: Vec<RowKey>,
        window: FetchWindow,
        options: &FetchOptions,
    ) -> (FetchStats, CollectingSink) {
        let mut sink = CollectingSink::new();
        let stats = self
            .fetch_from(self.store.clone(), keys, window, options, &mut sink)
            .unwrap();
        (stats, sink)
    }

    fn single_row_requests(&self) -> Vec<SliceRequest> {
        self.store
            .take_requests()
            .into_iter()
            .filter(SliceRequest::is_single_row)
            .collect()
    }
}

fn whole_tier() -> FetchWindow {
    FetchWindow::ascending(TIER, TIER + 1_000_000).unwrap()
}

fn timestamps(samples: &[Sample]) -> Vec<i64> {
    samples.iter().map(|s| s.timestamp).collect()
}

#[test]
fn test_row_split_across_continuation() {
    let fixture = Fixture::new();
    let row_a = fixture.legacy_row("a", 5);
    let options = FetchOptions::default().with_read_sizes(3, 3);

    let (stats, sink) = fixture.fetch(vec![row_a.clone()], whole_tier(), &options);

    let requests = fixture.store.take_requests();
    assert_eq!(requests.len(), 2);
    let continuation = requests[1].range();
    assert_eq!(
        continuation.start,
        fixture.layout.long_offset(TIER, TIER + 2) + 1
    );
    assert_eq!(continuation.limit, 3);

    assert_eq!(stats.rows, 1);
    assert_eq!(stats.truncated_rows, 1);
    assert_eq!(stats.continuation_requests, 1);
    assert_eq!(stats.samples, 5);

    let sets = sink.sets();
    assert_eq!(sets.len(), 2);
    assert_eq!(sets[0].data_type, LEGACY_TYPE);
    assert_eq!(sets[0].data_type, sets[1].data_type);
    assert_eq!(sets[0].tags, sets[1].tags);
    assert_eq!(&sets[0].tags, row_a.tags());
    assert_eq!(timestamps(&sets[0].samples), vec![TIER, TIER + 1, TIER + 2]);
    assert_eq!(timestamps(&sets[1].samples), vec![TIER + 3, TIER + 4]);

    let merged = sink.merged();
    assert_eq!(merged.len(), 1);
    assert_eq!(
        merged[0].samples.iter().map(|s| s.as_long().unwrap()).collect::<Vec<_>>(),
        vec![0, 10, 20, 30, 40]
    );
}

#[test]
fn test_truncation_detection() {
    let fixture = Fixture::new();
    let full = fixture.legacy_row("full", 3);
    let short = fixture.legacy_row("short", 2);
    let options = FetchOptions::default().with_read_sizes(3, 10);

    let (stats, sink) = fixture.fetch(vec![full.clone(), short], whole_tier(), &options);

    // The row holding exactly the page width costs one empty probe.
    let continuations = fixture.single_row_requests();
    assert_eq!(continuations.len(), 1);
    match &continuations[0] {
        SliceRequest::SingleRow { key, .. } => assert_eq!(key, &full),
        other => panic!("unexpected request {other:?}"),
    }
    assert_eq!(stats.truncated_rows, 1);
    assert_eq!(stats.samples, 5);
    // The empty probe opens no sample set.
    assert_eq!(sink.sets().len(), 2);
}

#[test]
fn test_continuation_termination() {
    let fixture = Fixture::new();
    let exact = fixture.legacy_row("exact", 6);
    let options = FetchOptions::default().with_read_sizes(2, 2);
    let (stats, sink) = fixture.fetch(vec![exact], whole_tier(), &options);
    // 2 from the fan-out, then 2, 2 and an empty batch.
    assert_eq!(stats.continuation_requests, 3);
    assert_eq!(sink.sets().len(), 3);
    assert_eq!(stats.samples, 6);

    let fixture = Fixture::new();
    let uneven = fixture.legacy_row("uneven", 5);
    let (stats, sink) = fixture.fetch(vec![uneven], whole_tier(), &options);
    // 2 from the fan-out, then 2 and a short batch of 1.
    assert_eq!(stats.continuation_requests, 2);
    assert_eq!(sink.sets().len(), 3);
    assert_eq!(
        timestamps(&sink.merged()[0].samples),
        (0..5).map(|d| TIER + d).collect::<Vec<_>>()
    );
}

#[test]
fn test_limit_disables_continuation() {
    let fixture = Fixture::new();
    let key = fixture.legacy_row("a", 10);
    let options = FetchOptions::default().with_read_sizes(100, 100).with_limit(4);

    let (stats, sink) = fixture.fetch(vec![key], whole_tier(), &options);

    let requests = fixture.store.take_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].range().limit, 4);
    assert_eq!(stats.truncated_rows, 0);
    assert_eq!(stats.samples, 4);
    assert_eq!(sink.sets().len(), 1);
}

#[test]
fn test_descending_follows_store_order() {
    let fixture = Fixture::new();
    let key = fixture.legacy_row("a", 7);
    let options = FetchOptions::default().with_read_sizes(3, 3);
    let window = FetchWindow::descending(TIER, TIER + 1_000).unwrap();

    let (stats, sink) = fixture.fetch(vec![key], window, &options);

    let requests = fixture.store.take_requests();
    assert_eq!(requests.len(), 3);
    assert!(requests.iter().all(|r| r.range().order == Order::Desc));
    // Continuations move the upper bound just below the last column received.
    assert_eq!(
        requests[1].range().end,
        fixture.layout.long_offset(TIER, TIER + 4) - 1
    );
    assert_eq!(requests[1].range().start, requests[0].range().start);
    assert_eq!(stats.continuation_requests, 2);

    let delivered: Vec<_> = sink
        .sets()
        .iter()
        .flat_map(|set| timestamps(&set.samples))
        .collect();
    assert_eq!(delivered, (0..7).rev().map(|d| TIER + d).collect::<Vec<_>>());
    assert!(delivered.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn test_window_bounds() {
    let fixture = Fixture::new();
    let key = host_row("cpu", TIER, "a");
    let mut columns = legacy_long_columns(&fixture.layout, TIER, 0..10);
    columns.extend(legacy_double_columns(&fixture.layout, TIER, [6]));
    fixture.store.put_all(ROW_FAMILY, &key, columns);

    let window = FetchWindow::ascending(TIER + 3, TIER + 6).unwrap();
    let (_, sink) = fixture.fetch(vec![key], window, &FetchOptions::default());

    let samples = &sink.sets()[0].samples;
    // Both the long and the double column of the last timestamp are included.
    assert_eq!(
        samples,
        &vec![
            Sample::long(TIER + 3, 30),
            Sample::long(TIER + 4, 40),
            Sample::long(TIER + 5, 50),
            Sample::long(TIER + 6, 60),
            Sample::double(TIER + 6, 3.0),
        ]
    );
}

#[test]
fn test_window_before_tier_start_is_clamped() {
    let fixture = Fixture::new();
    let key = fixture.legacy_row("a", 4);
    let window = FetchWindow::ascending(TIER - 5_000, TIER + 1).unwrap();
    let (stats, _) = fixture.fetch(vec![key], window, &FetchOptions::default());
    assert_eq!(stats.samples, 2);
    assert_eq!(fixture.store.take_requests()[0].range().start, 0);
}

#[test]
fn test_legacy_and_typed_rows() {
    let fixture = Fixture::new();
    let legacy = host_row("cpu", TIER, "legacy");
    let mut columns = legacy_long_columns(&fixture.layout, TIER, [1, 3]);
    columns.extend(legacy_double_columns(&fixture.layout, TIER, [2]));
    fixture.store.put_all(ROW_FAMILY, &legacy, columns);

    let typed = host_row("cpu", TIER, "typed").with_data_type(LONG_TYPE);
    fixture.store.put_all(
        ROW_FAMILY,
        &typed,
        typed_long_columns(&fixture.layout, TIER, [1, 2]),
    );

    let (_, sink) = fixture.fetch(
        vec![legacy, typed],
        whole_tier(),
        &FetchOptions::default(),
    );

    let sets = sink.sets();
    assert_eq!(sets.len(), 2);
    assert_eq!(
        sets[0].samples,
        vec![
            Sample::long(TIER + 1, 10),
            Sample::double(TIER + 2, 1.0),
            Sample::long(TIER + 3, 30),
        ]
    );
    assert_eq!(sets[1].data_type, LONG_TYPE);
    assert_eq!(
        sets[1].samples,
        vec![Sample::long(TIER + 1, -1), Sample::long(TIER + 2, -2)]
    );
}

#[test]
fn test_unknown_type_aborts_run() {
    let fixture = Fixture::new();
    let first = fixture.legacy_row("a", 2);
    let unknown = host_row("cpu", TIER, "b").with_data_type("histogram");
    fixture
        .store
        .put(ROW_FAMILY, &unknown, Column::new(0, pack(1)));
    let last = fixture.legacy_row("c", 2);

    let mut sink = CollectingSink::new();
    let err = fixture
        .fetch_from(
            fixture.store.clone(),
            vec![first.clone(), unknown, last],
            whole_tier(),
            &FetchOptions::default(),
            &mut sink,
        )
        .unwrap_err();

    assert!(err.is_unknown_type());
    assert_eq!(sink.sets().len(), 1);
    assert_eq!(&sink.sets()[0].tags, first.tags());
}

#[test]
fn test_store_error_keeps_delivered_samples() {
    let fixture = Fixture::new();
    let key = fixture.legacy_row("a", 10);
    let faulty = Arc::new(FaultyStore::new(fixture.store.clone(), 1));

    let mut sink = CollectingSink::new();
    let err = fixture
        .fetch_from(
            faulty.clone(),
            vec![key],
            whole_tier(),
            &FetchOptions::default().with_read_sizes(4, 4),
            &mut sink,
        )
        .unwrap_err();

    assert!(err.is_store());
    assert_eq!(faulty.issued(), 2);
    assert_eq!(sink.sample_count(), 4);
}

#[test]
fn test_fanout_store_error() {
    let fixture = Fixture::new();
    let key = fixture.legacy_row("a", 3);
    let faulty = Arc::new(FaultyStore::new(fixture.store.clone(), 0));
    let mut sink = CollectingSink::new();
    let err = fixture
        .fetch_from(
            faulty,
            vec![key],
            whole_tier(),
            &FetchOptions::default(),
            &mut sink,
        )
        .unwrap_err();
    assert!(err.is_store());
    assert!(sink.sets().is_empty());
}

#[test]
fn test_invalid_requests() {
    let fixture = Fixture::new();
    let mut sink = CollectingSink::new();

    let err = fixture
        .fetch_from(
            fixture.store.clone(),
            Vec::new(),
            whole_tier(),
            &FetchOptions::default(),
            &mut sink,
        )
        .unwrap_err();
    assert!(err.is_invalid_arg());

    let err = fixture
        .fetch_from(
            fixture.store.clone(),
            vec![
                host_row("cpu", TIER, "a"),
                host_row("cpu", TIER + 1_814_400_000, "a"),
            ],
            whole_tier(),
            &FetchOptions::default(),
            &mut sink,
        )
        .unwrap_err();
    assert!(err.is_invalid_arg());

    let err = fixture
        .fetch_from(
            fixture.store.clone(),
            vec![host_row("cpu", TIER, "a")],
            whole_tier(),
            &FetchOptions::default().with_read_sizes(10, 0),
            &mut sink,
        )
        .unwrap_err();
    assert!(err.is_invalid_arg());

    assert!(fixture.store.requests().is_empty());
}

#[test]
fn test_parallel_continuation_matches_sequential() {
    let fixture = Fixture::new();
    let keys: Vec<_> = (0..6)
        .map(|i| fixture.legacy_row(&format!("host{i}"), 3 + i * 4))
        .collect();
    let sequential = FetchOptions::default().with_read_sizes(3, 2);
    let (seq_stats, seq_sink) = fixture.fetch(keys.clone(), whole_tier(), &sequential);

    let parallel = sequential.clone().with_continuation_parallelism(4);
    let pool = ContinuationPool::new(3).unwrap();
    let mut par_sink = CollectingSink::new();
    let request = FetchRequest::new(ROW_FAMILY, keys, whole_tier());
    let par_stats = RangeFetcher::new(
        fixture.store.clone(),
        fixture.decoder(),
        request,
        &parallel,
        &mut par_sink,
    )
    .unwrap()
    .with_pool(pool)
    .run()
    .unwrap();

    assert_eq!(seq_stats, par_stats);
    assert_eq!(seq_sink.sets(), par_sink.sets());
}

#[test]
fn test_parallel_continuation_store_error() {
    let fixture = Fixture::new();
    let keys: Vec<_> = (0..4)
        .map(|i| fixture.legacy_row(&format!("host{i}"), 8))
        .collect();
    // The fan-out succeeds, one of the continuation requests fails.
    let faulty = Arc::new(FaultyStore::new(fixture.store.clone(), 3));
    let mut sink = CollectingSink::new();
    let err = fixture
        .fetch_from(
            faulty,
            keys,
            whole_tier(),
            &FetchOptions::default()
                .with_read_sizes(2, 2)
                .with_continuation_parallelism(4),
            &mut sink,
        )
        .unwrap_err();
    assert!(err.is_store());
    // Every fan-out batch was delivered before the failure.
    assert!(sink.sets().len() >= 4);
}

#[test]
fn test_rows_without_columns_produce_nothing() {
    let fixture = Fixture::new();
    let empty = host_row("cpu", TIER, "empty");
    let (stats, sink) = fixture.fetch(vec![empty], whole_tier(), &FetchOptions::default());
    assert_eq!(stats.rows, 1);
    assert_eq!(stats.samples, 0);
    assert!(sink.sets().is_empty());
}
