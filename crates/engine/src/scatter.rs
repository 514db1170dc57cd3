//! Scatter-gather runner for independent named computations.

use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, unbounded};
use ratewin_types::Stats;

use crate::error::EngineError;

type Job = Box<dyn FnOnce() -> Result<Stats, EngineError> + Send + 'static>;

/// A named unit of work producing one aggregate.
pub struct Task {
    name: String,
    job: Job,
}

impl Task {
    /// Wraps a closure as a task.
    pub fn new<F>(name: impl Into<String>, job: F) -> Self
    where
        F: FnOnce() -> Result<Stats, EngineError> + Send + 'static,
    {
        Self {
            name: name.into(),
            job: Box::new(job),
        }
    }

    /// Task name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task").field("name", &self.name).finish()
    }
}

/// Result of one completed task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskOutcome {
    /// Task name
    pub name: String,
    /// Computed aggregate
    pub stats: Stats,
    /// Wall time spent inside the task
    pub elapsed: Duration,
}

/// Stream of task outcomes in completion order.
///
/// Iteration yields `None` exactly once every task has reported, because
/// each task owns the only remaining senders.
#[derive(Debug)]
pub struct Gather {
    rx: Receiver<Result<TaskOutcome, EngineError>>,
    expected: usize,
}

impl Gather {
    /// Number of tasks submitted.
    #[must_use]
    pub fn expected(&self) -> usize {
        self.expected
    }

    /// Drains the stream, failing on the first task error.
    ///
    /// # Errors
    /// - The first [`EngineError::TaskFailed`] or [`EngineError::TaskPanicked`]
    ///   delivered; outcomes collected so far are discarded.
    pub fn wait_all(self) -> Result<Vec<TaskOutcome>, EngineError> {
        let mut outcomes = Vec::with_capacity(self.expected);
        for outcome in self {
            outcomes.push(outcome?);
        }
        Ok(outcomes)
    }
}

impl Iterator for Gather {
    type Item = Result<TaskOutcome, EngineError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.rx.recv().ok()
    }
}

/// Spawns every task on `pool` and returns the completion stream.
///
/// Each task runs exactly once. Errors and panics are delivered as `Err`
/// items rather than swallowed. The caller must consume the stream from a
/// thread outside `pool`, otherwise a small pool can be starved by its
/// own consumer.
pub fn run_all<I>(pool: &rayon::ThreadPool, tasks: I) -> Gather
where
    I: IntoIterator<Item = Task>,
{
    let (tx, rx) = unbounded();
    let mut expected = 0usize;

    for Task { name, job } in tasks {
        expected += 1;
        let tx = tx.clone();
        pool.spawn(move || {
            let started = Instant::now();
            let outcome = match catch_unwind(AssertUnwindSafe(job)) {
                Ok(Ok(stats)) => Ok(TaskOutcome {
                    elapsed: started.elapsed(),
                    name,
                    stats,
                }),
                Ok(Err(err)) => Err(match err {
                    err @ EngineError::EmptyWindow { .. } => err,
                    other => EngineError::TaskFailed {
                        name,
                        reason: other.to_string(),
                    },
                }),
                Err(_) => Err(EngineError::TaskPanicked { name }),
            };
            // A dropped Gather means nobody is listening any more.
            let _ = tx.send(outcome);
        });
    }

    tracing::debug!(tasks = expected, "scatter-gather batch submitted");

    Gather { rx, expected }
}
