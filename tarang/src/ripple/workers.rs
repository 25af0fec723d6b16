//! Phase 3: master/worker run.
//!
//! Each searching worker advances its own front in bursts. After a burst it
//! publishes the outcome in its [`WorkerStatus`], raises `awaiting_check`
//! and spins until the master clears it. The master sweeps the workers that
//! are not done yet, marks a worker done once it has met all of its goals or
//! ran out of nodes, and clears the flag so the worker either resumes or
//! sees `done` and exits. The master returns once every worker is done.
//!
//! All coordination state lives in a per-run [`RunState`]. An `abort` flag
//! lets any thread unwind the others if a spawn fails or a worker panics.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;

use crate::error::{Result, TarangError};
use crate::search::{FringeSearch, SearchStatus};

/// Final state of one worker as seen by the master.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkerVerdict {
    /// All goals met
    Complete,
    /// Frontier emptied with goals still unmet
    Exhausted,
    /// The run was torn down before the worker finished
    Aborted,
}

/// Shared flags for one worker.
#[derive(Debug, Default)]
pub(crate) struct WorkerStatus {
    out_of_nodes: AtomicBool,
    goals_found: AtomicUsize,
    awaiting_check: AtomicBool,
    done: AtomicBool,
}

impl WorkerStatus {
    fn publish(&self, status: SearchStatus, goals_found: usize) {
        self.out_of_nodes
            .store(status == SearchStatus::Exhausted, Ordering::Relaxed);
        self.goals_found.store(goals_found, Ordering::Relaxed);
        // Release makes the two stores above visible to the master
        self.awaiting_check.store(true, Ordering::Release);
    }

    fn is_done(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }
}

/// Coordination state for one run.
#[derive(Debug)]
pub(crate) struct RunState {
    workers: Vec<WorkerStatus>,
    abort: AtomicBool,
}

impl RunState {
    pub(crate) fn new(workers: usize) -> Self {
        Self {
            workers: (0..workers).map(|_| WorkerStatus::default()).collect(),
            abort: AtomicBool::new(false),
        }
    }

    fn abort(&self) {
        self.abort.store(true, Ordering::Release);
    }

    fn is_aborted(&self) -> bool {
        self.abort.load(Ordering::Acquire)
    }
}

/// Raises the abort flag if the owning thread unwinds.
struct AbortOnPanic<'a>(&'a RunState);

impl Drop for AbortOnPanic<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            self.0.abort();
        }
    }
}

/// Searching worker loop.
fn search_worker(front: &mut FringeSearch<'_>, index: usize, state: &RunState, burst: usize) {
    let _guard = AbortOnPanic(state);
    let status = &state.workers[index];
    let mut bursts = 0u64;

    while !status.is_done() && !state.is_aborted() {
        let outcome = front.advance(burst);
        bursts += 1;
        status.publish(outcome, front.goals_found());

        while status.awaiting_check.load(Ordering::Acquire) {
            if state.is_aborted() {
                return;
            }
            thread::yield_now();
        }
    }

    tracing::debug!(
        "Worker {} from {} stopped after {} bursts ({} iterations)",
        index,
        front.start(),
        bursts,
        front.iterations()
    );
}

/// Master loop: inspect acknowledged workers until all are done.
fn master(state: &RunState, goal_counts: &[usize]) -> Vec<WorkerVerdict> {
    let _guard = AbortOnPanic(state);
    let mut verdicts = vec![WorkerVerdict::Aborted; state.workers.len()];
    let mut remaining = state.workers.len();

    while remaining > 0 && !state.is_aborted() {
        for (index, status) in state.workers.iter().enumerate() {
            if status.is_done() || !status.awaiting_check.load(Ordering::Acquire) {
                continue;
            }

            let found = status.goals_found.load(Ordering::Relaxed);
            let verdict = if found == goal_counts[index] {
                Some(WorkerVerdict::Complete)
            } else if status.out_of_nodes.load(Ordering::Relaxed) {
                Some(WorkerVerdict::Exhausted)
            } else {
                None
            };

            if let Some(verdict) = verdict {
                match verdict {
                    WorkerVerdict::Complete => tracing::debug!("Worker {} complete", index),
                    _ => tracing::warn!(
                        "Worker {} exhausted with {}/{} goals",
                        index,
                        found,
                        goal_counts[index]
                    ),
                }
                verdicts[index] = verdict;
                status.done.store(true, Ordering::Release);
                remaining -= 1;
            }
            status.awaiting_check.store(false, Ordering::Release);
        }
        thread::yield_now();
    }

    verdicts
}

/// Run every front on its own thread with one extra master thread.
///
/// Blocks until all threads have joined. Returns one verdict per front.
pub(crate) fn run_workers(
    fronts: &mut [FringeSearch<'_>],
    burst: usize,
) -> Result<Vec<WorkerVerdict>> {
    let state = RunState::new(fronts.len());
    let goal_counts: Vec<usize> = fronts.iter().map(FringeSearch::goal_count).collect();

    thread::scope(|scope| {
        let state = &state;
        let mut spawn_error = None;
        let mut handles = Vec::with_capacity(fronts.len());

        for (index, front) in fronts.iter_mut().enumerate() {
            let spawned = thread::Builder::new()
                .name(format!("ripple-{}", index))
                .spawn_scoped(scope, move || search_worker(front, index, state, burst));
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    spawn_error = Some(e);
                    state.abort();
                    break;
                }
            }
        }

        let master_handle = if spawn_error.is_none() {
            let goal_counts = &goal_counts;
            let spawned = thread::Builder::new()
                .name("ripple-master".into())
                .spawn_scoped(scope, move || master(state, goal_counts));
            match spawned {
                Ok(handle) => Some(handle),
                Err(e) => {
                    spawn_error = Some(e);
                    state.abort();
                    None
                }
            }
        } else {
            None
        };

        let panicked: Vec<usize> = handles
            .into_iter()
            .enumerate()
            .filter_map(|(index, handle)| handle.join().is_err().then_some(index))
            .collect();
        let verdicts = master_handle.map(|handle| handle.join());

        if let Some(e) = spawn_error {
            return Err(TarangError::Thread(format!("failed to spawn search thread: {}", e)));
        }
        if !panicked.is_empty() {
            tracing::error!("Search workers {:?} panicked", panicked);
            return Err(TarangError::Thread(format!("workers {:?} panicked", panicked)));
        }
        match verdicts {
            Some(Ok(verdicts)) => Ok(verdicts),
            _ => Err(TarangError::Thread("master thread panicked".into())),
        }
    })
}
