use anyhow::Result;
use crossbeam::channel::{Receiver, TryRecvError, unbounded};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Cooperative cancellation flag shared by every worker of a run.
///
/// Workers look at it between tasks (and the redundancy check between
/// candidates); nothing in flight is interrupted.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Fixed-size pool of threads draining a pre-filled queue
#[derive(Debug, Clone)]
pub struct WorkerPool {
    workers: usize,
}

/// Per-thread state handed to each worker
struct WorkerContext<'a, T, F> {
    worker_id: usize,
    work_rx: Receiver<T>,
    processed: &'a AtomicUsize,
    stop: &'a StopSignal,
    processor: &'a F,
}

impl WorkerPool {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Worker count for a configured value, where 0 means one per CPU core
    pub fn calculate_workers(configured: usize) -> usize {
        if configured > 0 {
            configured
        } else {
            num_cpus::get().max(1)
        }
    }

    /// Process every item once, using at most `workers` threads.
    ///
    /// The queue is filled completely before any worker starts, so a worker
    /// that finds it empty simply exits. Once `stop` is requested workers
    /// finish their current item and take no more. Blocks until all workers
    /// have exited and returns how many items were processed.
    pub fn run<T, F>(&self, work_items: Vec<T>, stop: &StopSignal, processor: F) -> Result<usize>
    where
        T: Send,
        F: Fn(T, usize) + Sync,
    {
        if work_items.is_empty() {
            return Ok(0);
        }

        let actual_workers = self.workers.min(work_items.len());

        let (work_tx, work_rx) = unbounded();
        for item in work_items {
            // The receiver is alive for the whole fill
            let _ = work_tx.send(item);
        }
        drop(work_tx);

        let processed = AtomicUsize::new(0);

        crossbeam::thread::scope(|s| {
            for worker_id in 0..actual_workers {
                let ctx = WorkerContext {
                    worker_id,
                    work_rx: work_rx.clone(),
                    processed: &processed,
                    stop,
                    processor: &processor,
                };

                s.spawn(move |_| Self::worker_thread(ctx));
            }
        })
        .map_err(|_| anyhow::anyhow!("Thread panic occurred during parallel execution"))?;

        Ok(processed.into_inner())
    }

    fn worker_thread<T, F>(ctx: WorkerContext<'_, T, F>)
    where
        F: Fn(T, usize),
    {
        tracing::trace!("Worker {} started", ctx.worker_id);

        while !ctx.stop.is_requested() {
            let work_item = match ctx.work_rx.try_recv() {
                Ok(item) => item,
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            };

            (ctx.processor)(work_item, ctx.worker_id);
            ctx.processed.fetch_add(1, Ordering::Relaxed);
        }

        tracing::trace!("Worker {} finished", ctx.worker_id);
    }
}
