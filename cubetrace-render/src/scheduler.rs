//! Distributing a frame's pixels across worker threads.
//!
//! Pixels are claimed in small batches from a shared atomic counter rather than divided
//! into fixed ranges up front, so that workers which draw cheap pixels (sky) go on to
//! help with expensive ones (deep water, glass).

use core::ops::Range;
use core::sync::atomic::{AtomicUsize, Ordering};
use core::time::Duration;
use std::time::Instant;

use crate::RenderError;

/// Granularity at which the calling thread checks whether the workers are done.
const POLL_STEP: Duration = Duration::from_millis(5);

/// A counter from which batches of pixel indices are claimed.
///
/// Every index in `0..total` is returned by exactly one call to [`WorkQueue::claim()`].
#[derive(Debug)]
pub(crate) struct WorkQueue {
    next: AtomicUsize,
    total: usize,
    batch: usize,
}

impl WorkQueue {
    pub fn new(total: usize, batch: usize) -> Self {
        Self {
            next: AtomicUsize::new(0),
            total,
            batch: batch.max(1),
        }
    }

    /// Claims the next batch, or returns [`None`] if every index has been claimed.
    pub fn claim(&self) -> Option<Range<usize>> {
        let start = self.next.fetch_add(self.batch, Ordering::Relaxed);
        if start >= self.total {
            None
        } else {
            Some(start..start.saturating_add(self.batch).min(self.total))
        }
    }
}

/// How far a frame has progressed, as reported to a progress callback.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct RenderProgress {
    /// Pixels finished so far.
    pub completed: usize,
    /// Pixels in the frame.
    pub total: usize,
}

impl RenderProgress {
    /// Fraction of the frame completed, from 0 to 1.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}

/// Runs batches of pixels on a thread pool which is kept between frames.
pub(crate) struct FrameScheduler {
    pool: Option<(usize, rayon::ThreadPool)>,
}

/// Parameters of one [`FrameScheduler::run()`].
#[derive(Clone, Copy, Debug)]
pub(crate) struct RunParams {
    pub threads: usize,
    pub pixel_count: usize,
    pub batch_size: usize,
    /// If [`None`], progress is reported only when the frame is complete.
    pub progress_interval: Option<Duration>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self { pool: None }
    }

    /// Renders every pixel index in `0..params.pixel_count` exactly once.
    ///
    /// Each worker `w` starts with `init(w)` as its state and calls `work` on each batch
    /// it claims. Returns the final states of all workers. `progress` is called only on
    /// the calling thread.
    pub fn run<S, I, W, P>(
        &mut self,
        params: RunParams,
        init: I,
        work: W,
        mut progress: P,
    ) -> Result<Vec<S>, RenderError>
    where
        S: Send,
        I: Fn(usize) -> S + Sync,
        W: Fn(&mut S, Range<usize>) + Sync,
        P: FnMut(RenderProgress),
    {
        let total = params.pixel_count;
        let queue = WorkQueue::new(total, params.batch_size);
        let report = |completed| RenderProgress { completed, total };

        if params.threads <= 1 {
            let mut state = init(0);
            let mut last_report = Instant::now();
            let mut completed = 0;
            while let Some(batch) = queue.claim() {
                completed += batch.len();
                work(&mut state, batch);
                if let Some(interval) = params.progress_interval {
                    if last_report.elapsed() >= interval {
                        progress(report(completed));
                        last_report = Instant::now();
                    }
                }
            }
            progress(report(total));
            return Ok(vec![state]);
        }

        let pool = self.pool_for(params.threads)?;
        let completed = AtomicUsize::new(0);
        let finished_workers = AtomicUsize::new(0);
        let mut states: Vec<Option<S>> = (0..params.threads).map(|_| None).collect();

        pool.in_place_scope(|scope| {
            for (worker, slot) in states.iter_mut().enumerate() {
                let (queue, completed, finished_workers) = (&queue, &completed, &finished_workers);
                let (init, work) = (&init, &work);
                scope.spawn(move |_| {
                    // Counted even if the worker panics, so the polling loop ends.
                    scopeguard::defer! {
                        finished_workers.fetch_add(1, Ordering::Release);
                    }
                    let mut state = init(worker);
                    while let Some(batch) = queue.claim() {
                        let len = batch.len();
                        work(&mut state, batch);
                        completed.fetch_add(len, Ordering::Relaxed);
                    }
                    *slot = Some(state);
                });
            }

            if let Some(interval) = params.progress_interval {
                let mut last_report = Instant::now();
                while finished_workers.load(Ordering::Acquire) < params.threads {
                    std::thread::sleep(POLL_STEP.min(interval));
                    if last_report.elapsed() >= interval {
                        progress(report(completed.load(Ordering::Relaxed)));
                        last_report = Instant::now();
                    }
                }
            }
        });
        progress(report(total));

        Ok(states.into_iter().flatten().collect())
    }

    /// Returns a pool with the given number of threads, reusing the previous one if it
    /// has that many.
    fn pool_for(&mut self, threads: usize) -> Result<&rayon::ThreadPool, RenderError> {
        let pool = match self.pool.take() {
            Some((count, pool)) if count == threads => pool,
            _ => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|index| format!("cubetrace-render-{index}"))
                    .build()
                    .map_err(RenderError::ThreadPool)?;
                log::debug!("created render thread pool with {threads} threads");
                pool
            }
        };
        Ok(&self.pool.insert((threads, pool)).1)
    }
}

impl core::fmt::Debug for FrameScheduler {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FrameScheduler")
            .field("threads", &self.pool.as_ref().map(|(threads, _)| threads))
            .finish_non_exhaustive()
    }
}

/// Derives the random seed for one worker's generator from the frame seed.
pub(crate) fn worker_seed(frame_seed: u64, worker: usize) -> u64 {
    frame_seed ^ (worker as u64).wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}
