use std::sync::Arc;
use std::thread;

use crate::error::{Error, Result, TaskPanic, panic_reason};
use crate::pool::WorkerPool;

/// A strategy for applying a function to every element of a sequence in
/// parallel and returning the outputs in input order.
///
/// The two provided strategies are [`ThreadPerTask`] (one short-lived thread
/// per input) and [`WorkerPool`] (reuse of a fixed set of long-lived workers).
/// Panics raised by `task` are reported as [`Error::TaskFailure`] either way.
pub trait Executor {
    /// Run `task` on every element of `inputs`, in parallel, and return the
    /// outputs in input order.
    fn execute<T, R, F>(&self, task: F, inputs: Vec<T>) -> Result<Vec<R>>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> R + Send + Sync + 'static;
}

impl<E: Executor> Executor for &E {
    fn execute<T, R, F>(&self, task: F, inputs: Vec<T>) -> Result<Vec<R>>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> R + Send + Sync + 'static,
    {
        (**self).execute(task, inputs)
    }
}

impl Executor for WorkerPool {
    /// Delegate to [`WorkerPool::map`], reusing the pool's worker threads.
    fn execute<T, R, F>(&self, task: F, inputs: Vec<T>) -> Result<Vec<R>>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> R + Send + Sync + 'static,
    {
        self.map(task, inputs)
    }
}

/// Runs every input on its own short-lived thread and joins them all.
///
/// This is the zero-setup strategy: nothing is constructed up front and no
/// threads outlive the call. It spawns exactly one thread per input, so it is
/// meant for small batches of coarse work such as the partitions built by
/// [`Aggregator`](crate::Aggregator).
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadPerTask;

impl Executor for ThreadPerTask {
    fn execute<T, R, F>(&self, task: F, inputs: Vec<T>) -> Result<Vec<R>>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> R + Send + Sync + 'static,
    {
        let task = Arc::new(task);
        let mut spawned = Vec::with_capacity(inputs.len());
        for (index, input) in inputs.into_iter().enumerate() {
            let task = Arc::clone(&task);
            let builder = thread::Builder::new().name(format!("task-{index}"));
            match builder.spawn(move || task(input)) {
                Ok(handle) => spawned.push(handle),
                Err(cause) => {
                    for handle in spawned {
                        let _ = handle.join();
                    }
                    return Err(Error::Spawn(cause));
                }
            }
        }

        let mut outputs = Vec::with_capacity(spawned.len());
        let mut failures = Vec::new();
        for (index, handle) in spawned.into_iter().enumerate() {
            match handle.join() {
                Ok(output) => outputs.push(output),
                Err(payload) => failures.push(TaskPanic {
                    index,
                    reason: panic_reason(payload),
                }),
            }
        }

        if !failures.is_empty() {
            return Err(Error::TaskFailure(failures));
        }
        Ok(outputs)
    }
}
