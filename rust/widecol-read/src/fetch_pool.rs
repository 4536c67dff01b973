//! Thread pool draining truncated rows with concurrent continuation requests.

use std::sync::{Arc, OnceLock};

use rayon::prelude::*;
use widecol_common::{Error, Result};

/// Fixed-size thread pool dedicated to blocking continuation requests.
///
/// The pool only performs store round-trips; decoding and sink delivery stay on the
/// thread that runs the fetch.
pub struct ContinuationPool {
    thread_pool: rayon::ThreadPool,
}

impl ContinuationPool {
    /// Number of threads of the shared pool.
    const NUM_THREADS: usize = 16;

    /// Returns the shared pool, lazily started on first use.
    pub fn get() -> Arc<ContinuationPool> {
        static POOL: OnceLock<Arc<ContinuationPool>> = OnceLock::new();
        POOL.get_or_init(|| {
            Arc::new(
                ContinuationPool::start(Self::NUM_THREADS).expect("continuation thread pool"),
            )
        })
        .clone()
    }

    /// Creates a dedicated pool with `num_threads` workers.
    pub fn new(num_threads: usize) -> Result<Arc<ContinuationPool>> {
        ContinuationPool::start(num_threads).map(Arc::new)
    }

    pub fn num_threads(&self) -> usize {
        self.thread_pool.current_num_threads()
    }

    /// Applies `f` to every item on the pool's threads.
    ///
    /// Results are returned in the order of `items`, whatever the completion order.
    pub fn map<T, R, F>(&self, items: &[T], f: F) -> Vec<R>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> R + Send + Sync,
    {
        self.thread_pool
            .install(|| items.par_iter().map(f).collect())
    }

    fn start(num_threads: usize) -> Result<ContinuationPool> {
        let thread_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|i| format!("widecol_continuation_{i}"))
            .build()
            .map_err(|e| Error::invalid_arg("num_threads", e.to_string()))?;
        Ok(ContinuationPool { thread_pool })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_keeps_input_order() {
        let pool = ContinuationPool::new(4).unwrap();
        let items: Vec<u64> = (0..64).collect();
        let results = pool.map(&items, |&i| {
            std::thread::sleep(std::time::Duration::from_micros((64 - i) * 10));
            i * 2
        });
        assert_eq!(results, items.iter().map(|i| i * 2).collect::<Vec<_>>());
        assert_eq!(pool.num_threads(), 4);
    }

    #[test]
    fn test_shared_pool() {
        let pool = ContinuationPool::get();
        assert!(Arc::ptr_eq(&pool, &ContinuationPool::get()));
        assert_eq!(pool.map(&[1, 2, 3], |i| i + 1), vec![2, 3, 4]);
    }
}
