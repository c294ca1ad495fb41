use anyhow::{Result, anyhow};
use crossbeam::channel::{Receiver, Sender, bounded};
use tracing::{debug, trace};

/// Configuration for the worker pool
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Upper bound on worker threads; never more workers than work items
    pub workers: usize,
    /// Channel buffer size multiplier (buffer = workers * multiplier)
    pub channel_buffer_multiplier: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            workers: 1,
            channel_buffer_multiplier: 2,
        }
    }
}

/// Result from processing a work item, handed back together with the item
#[derive(Debug)]
pub struct WorkResult<T, R> {
    pub item: T,
    pub worker_id: usize,
    pub outcome: Result<R>,
}

/// Fixed-size pool of scoped threads pulling from a closable queue
pub struct WorkerPool {
    config: PoolConfig,
}

impl WorkerPool {
    pub fn new(config: PoolConfig) -> Self {
        Self { config }
    }

    /// Number of threads a run over `work_count` items spawns
    pub fn effective_workers(&self, work_count: usize) -> usize {
        std::cmp::min(self.config.workers.max(1), work_count)
    }

    /// Process work items on the pool, streaming results to `on_result`.
    ///
    /// Items are enqueued in order by a producer thread which then closes the
    /// queue; workers exit once it is closed and drained. `on_result` runs on
    /// the calling thread in completion order, so it may borrow freely. An
    /// error from `on_result` stops collection and is returned after every
    /// worker has been joined.
    ///
    /// # Returns
    /// Number of results handed to `on_result`
    pub fn run<T, R, F, C>(&self, work_items: Vec<T>, worker_fn: F, mut on_result: C) -> Result<usize>
    where
        T: Send,
        R: Send,
        F: Fn(&T) -> Result<R> + Sync,
        C: FnMut(WorkResult<T, R>) -> Result<()>,
    {
        let work_count = work_items.len();
        if work_count == 0 {
            return Ok(0);
        }

        let workers = self.effective_workers(work_count);
        let buffer = workers * self.config.channel_buffer_multiplier.max(1);

        let (work_tx, work_rx): (Sender<T>, Receiver<T>) = bounded(buffer);
        let (result_tx, result_rx): (Sender<WorkResult<T, R>>, Receiver<WorkResult<T, R>>) =
            bounded(buffer * 2);

        let worker_fn = &worker_fn;
        debug!("Starting {} workers for {} work items", workers, work_count);

        crossbeam::thread::scope(|s| -> Result<usize> {
            for worker_id in 0..workers {
                let work_rx = work_rx.clone();
                let result_tx = result_tx.clone();
                s.spawn(move |_| worker_loop(worker_id, work_rx, result_tx, worker_fn));
            }

            // Producer thread: enqueue everything, then close the queue
            s.spawn(move |_| {
                for work_item in work_items {
                    if work_tx.send(work_item).is_err() {
                        break; // Workers dropped
                    }
                }
                trace!("Work queue closed");
            });

            // Drop our own handles so workers and collector see disconnection
            drop(work_rx);
            drop(result_tx);
            let result_rx = result_rx;

            let mut received = 0;
            for result in result_rx.iter() {
                received += 1;
                on_result(result)?;
            }
            Ok(received)
        })
        .map_err(|_| anyhow!("Thread panic occurred during parallel processing"))?
    }
}

fn worker_loop<T, R, F>(
    worker_id: usize,
    work_rx: Receiver<T>,
    result_tx: Sender<WorkResult<T, R>>,
    worker_fn: &F,
) where
    F: Fn(&T) -> Result<R>,
{
    debug!("Worker {} started", worker_id);
    let mut processed = 0usize;
    // recv() fails only once the queue is closed and empty
    while let Ok(item) = work_rx.recv() {
        debug!("Worker {} claimed item {}", worker_id, processed + 1);
        let outcome = worker_fn(&item);
        processed += 1;

        let result = WorkResult {
            item,
            worker_id,
            outcome,
        };
        if result_tx.send(result).is_err() {
            break; // Collector dropped
        }
    }
    debug!("Worker {} finished after {} items", worker_id, processed);
}
