//! Bounded scheduler: a fixed-size worker pool pulling jobs from a shared channel.
//!
//! `min(ceiling, jobs)` workers each run one job at a time, so at most `ceiling` jobs are in
//! flight and a worker picks up the next pending job as soon as its current one completes.
//! Results are sent back over a channel and handled on the calling thread, which is the only
//! place completion state is mutated.

use crossbeam_channel::{Receiver, Sender, bounded, unbounded};
use log::debug;
use std::thread;

use crate::utils::config::ConcurrencyLimits;

#[derive(Clone, Copy, Debug)]
pub struct BoundedScheduler {
    ceiling: usize,
}

impl Default for BoundedScheduler {
    fn default() -> Self {
        Self::new(None)
    }
}

impl BoundedScheduler {
    /// `ceiling: None` uses all available threads. The ceiling is never below one.
    pub fn new(ceiling: Option<usize>) -> Self {
        Self {
            ceiling: ConcurrencyLimits::current().ceiling(ceiling),
        }
    }

    pub fn ceiling(&self) -> usize {
        self.ceiling
    }

    /// Run every job exactly once with `work` on the pool, calling `on_complete` on this thread for
    /// each completion (in completion order). Returns the AND of all `on_complete` results;
    /// a `false` never stops the remaining jobs.
    pub fn run<J, R, W, C>(&self, jobs: Vec<J>, work: W, mut on_complete: C) -> bool
    where
        J: Send,
        R: Send,
        W: Fn(&J) -> R + Sync,
        C: FnMut(J, R) -> bool,
    {
        if jobs.is_empty() {
            return true;
        }
        let num_workers = self.ceiling.min(jobs.len());
        debug!(
            "Scheduling {} jobs on {} workers (ceiling {})",
            jobs.len(),
            num_workers,
            self.ceiling
        );

        let (job_tx, job_rx) = bounded::<J>(jobs.len());
        for job in jobs {
            // Capacity equals the job count and the receiver is alive: cannot fail.
            let _ = job_tx.send(job);
        }
        // Workers see the channel close once it is drained.
        drop(job_tx);

        let (result_tx, result_rx) = unbounded::<(J, R)>();
        let work = &work;
        thread::scope(|scope| {
            for _ in 0..num_workers {
                let job_rx = job_rx.clone();
                let result_tx = result_tx.clone();
                scope.spawn(move || worker_loop(job_rx, result_tx, work));
            }
            drop(result_tx);

            let mut success = true;
            for (job, result) in result_rx.iter() {
                success &= on_complete(job, result);
            }
            success
        })
    }
}

/// Single worker: pull a job, run it, send the result back. Exits when the job channel is drained.
fn worker_loop<J, R, W>(job_rx: Receiver<J>, result_tx: Sender<(J, R)>, work: &W)
where
    W: Fn(&J) -> R,
{
    while let Ok(job) = job_rx.recv() {
        let result = work(&job);
        if result_tx.send((job, result)).is_err() {
            break;
        }
    }
}
