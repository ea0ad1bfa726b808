//! Background handler execution.
//!
//! Planned invocations run on a private rayon::ThreadPool (not the global
//! pool) bounded by `worker_threads`. Completions come back to the main
//! thread over an `mpsc` channel and are published there, so the scheduler
//! itself is only ever touched by the UI thread.

use std::sync::mpsc::{self, Receiver, Sender};

use anyhow::{Context, Result};
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::debug;

use tickerdash_core::dashboard::DashboardOutput;
use tickerdash_core::scheduler::{Completion, Invocation};

pub struct Worker {
    pool: ThreadPool,
    tx: Sender<Completion<DashboardOutput>>,
    rx: Receiver<Completion<DashboardOutput>>,
}

impl Worker {
    pub fn new(threads: usize) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("tickerdash-worker-{i}"))
            .build()
            .context("failed to build worker pool")?;
        let (tx, rx) = mpsc::channel();
        Ok(Self { pool, tx, rx })
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Queue invocations. Each posts its completion when done.
    pub fn submit(&self, invocations: Vec<Invocation<DashboardOutput>>) {
        for invocation in invocations {
            debug!(
                binding = invocation.binding_name(),
                ticket = invocation.ticket(),
                "queued"
            );
            let tx = self.tx.clone();
            self.pool.spawn(move || {
                // The receiver only goes away on shutdown.
                let _ = tx.send(invocation.run());
            });
        }
    }

    /// Completions that arrived since the last call, without blocking.
    pub fn drain(&self) -> Vec<Completion<DashboardOutput>> {
        self.rx.try_iter().collect()
    }

    /// Block until one completion arrives.
    pub fn recv(&self) -> Option<Completion<DashboardOutput>> {
        self.rx.recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tickerdash_core::scheduler::{Binding, HandlerContext, InputValue, Scheduler, Update};

    fn scheduler() -> Scheduler<DashboardOutput> {
        let mut s = Scheduler::new();
        s.register(
            Binding::new("answer", |h: &HandlerContext| {
                Ok(Update::Set(vec![DashboardOutput::Answer(
                    h.int("n").map(|n| n as u8),
                )]))
            })
            .on(["n"])
            .producing(["out"]),
        )
        .unwrap();
        s
    }

    #[test]
    fn completions_come_back() {
        let worker = Worker::new(2).unwrap();
        let mut s = scheduler();
        worker.submit(s.plan("n", InputValue::Int(3)));
        let completion = worker.recv().unwrap();
        let published = s.complete(completion);
        assert_eq!(published.len(), 1);
    }

    #[test]
    fn worker_uses_private_pool() {
        let global_threads = rayon::current_num_threads();
        let worker = Worker::new(3).unwrap();
        assert_eq!(worker.threads(), 3);
        assert_eq!(rayon::current_num_threads(), global_threads);
    }
}
