//! Worker pools that strip tasks are submitted to.

use std::sync::Arc;

use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};

/// A unit of work handed to a pool.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Something that runs submitted jobs, now or later, on some thread.
pub trait WorkerPool {
    fn submit(&self, job: Job);
}

impl WorkerPool for ThreadPool {
    fn submit(&self, job: Job) {
        self.spawn(job);
    }
}

impl<P: WorkerPool + ?Sized> WorkerPool for Arc<P> {
    fn submit(&self, job: Job) {
        (**self).submit(job);
    }
}

/// Runs every job immediately on the submitting thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct InlinePool;

impl WorkerPool for InlinePool {
    fn submit(&self, job: Job) {
        job();
    }
}

/// Build a rayon pool with named worker threads.
///
/// `None` lets rayon pick the thread count (one per logical CPU).
pub fn build_thread_pool(threads: Option<usize>) -> Result<ThreadPool, ThreadPoolBuildError> {
    let mut builder = ThreadPoolBuilder::new().thread_name(|i| format!("glint-worker-{i}"));
    if let Some(threads) = threads {
        builder = builder.num_threads(threads);
    }
    let pool = builder.build()?;
    log::info!("Worker pool started with {} threads", pool.current_num_threads());
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;

    #[test]
    fn test_inline_pool_runs_immediately() {
        let counter = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&counter);
        InlinePool.submit(Box::new(move || {
            c.fetch_add(1, Ordering::SeqCst);
        }));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_thread_pool_names_workers() {
        let pool = build_thread_pool(Some(2)).unwrap();
        assert_eq!(pool.current_num_threads(), 2);

        let (tx, rx) = mpsc::channel();
        pool.submit(Box::new(move || {
            let name = std::thread::current().name().map(str::to_owned);
            let _ = tx.send(name);
        }));
        let name = rx.recv().unwrap().unwrap();
        assert!(name.starts_with("glint-worker-"));
    }
}
