use std::io;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::bounded;
use log::{error, trace};

use crate::error::{Error, Result, TaskPanic, panic_reason};
use crate::internal::TaskQueue;

type Task = Box<dyn FnOnce() + Send>;

/// A fixed set of worker threads sharing one FIFO task queue.
///
/// Workers are started by the constructor and live until the pool is closed or
/// dropped. The only way to run work on the pool is [`WorkerPool::map`], which
/// blocks the calling thread until every input has been processed and returns
/// the outputs in input order. Several threads may call `map` on the same pool
/// at once; their calls share the queue but nothing else.
///
/// ## Example
/// ```rust
/// use parallel_mapper::WorkerPool;
///
/// fn main() -> parallel_mapper::Result<()> {
///     let pool = WorkerPool::new(4)?;
///
///     let lengths = pool.map(|word: &str| word.len(), ["fast", "ordered", "pool"])?;
///     assert_eq!(lengths, vec![4, 7, 4]);
///
///     pool.close();
///     Ok(())
/// }
/// ```
pub struct WorkerPool {
    queue: TaskQueue<Task>,
    workers: Vec<Worker>,
}

impl WorkerPool {
    /// Create a pool with `workers` worker threads, started immediately.
    /// The workers begin blocking on the empty queue.
    ///
    /// Fails with [`Error::InvalidConfiguration`] if `workers` is zero and with
    /// [`Error::Spawn`] if the operating system refuses a thread; in the latter
    /// case every worker spawned so far is stopped and joined before returning.
    pub fn new(workers: usize) -> Result<WorkerPool> {
        if workers == 0 {
            return Err(Error::InvalidConfiguration);
        }

        let queue = TaskQueue::new();
        let mut started = Vec::with_capacity(workers);
        for id in 0..workers {
            match Worker::spawn(id, queue.clone()) {
                Ok(worker) => started.push(worker),
                Err(cause) => {
                    queue.stop();
                    for worker in started {
                        worker.join();
                    }
                    return Err(Error::Spawn(cause));
                }
            }
        }

        Ok(WorkerPool {
            queue,
            workers: started,
        })
    }

    /// Create a pool with one worker per available logical core.
    pub fn with_default_workers() -> Result<WorkerPool> {
        let workers = thread::available_parallelism()
            .map(|cores| cores.get())
            .unwrap_or(1);
        WorkerPool::new(workers)
    }

    /// Apply `transform` to every element of `inputs` on the pool's workers and
    /// return the outputs in input order.
    ///
    /// Enqueues one task per input, tagged with its slot index, then blocks
    /// until a completion has arrived for every slot. The output has the same
    /// length and index correspondence as the input; an empty input returns an
    /// empty output without touching the queue.
    ///
    /// If `transform` panics for some inputs, the panics are caught in the
    /// workers (which keep serving tasks) and the call returns
    /// [`Error::TaskFailure`] listing every failed input index. The remaining
    /// tasks of the call still run to completion.
    pub fn map<T, R, F>(&self, transform: F, inputs: impl IntoIterator<Item = T>) -> Result<Vec<R>>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> R + Send + Sync + 'static,
    {
        let inputs: Vec<T> = inputs.into_iter().collect();
        let pending = inputs.len();
        if pending == 0 {
            return Ok(Vec::new());
        }

        let transform = Arc::new(transform);
        let (completion_tx, completion_rx) = bounded(pending);

        for (index, input) in inputs.into_iter().enumerate() {
            let transform = Arc::clone(&transform);
            let completion = completion_tx.clone();
            let accepted = self.queue.push(Box::new(move || {
                let outcome = catch_unwind(AssertUnwindSafe(|| transform(input))).map_err(
                    |payload| {
                        let reason = panic_reason(payload);
                        error!("task {index} panicked: {reason}");
                        TaskPanic { index, reason }
                    },
                );
                // The receiver disappears only when the call itself is gone.
                let _ = completion.send((index, outcome));
            }));
            if !accepted {
                return Err(Error::Interrupted);
            }
        }
        drop(completion_tx);

        let mut slots: Vec<Option<R>> = Vec::with_capacity(pending);
        slots.resize_with(pending, || None);
        let mut failures = Vec::new();
        for _ in 0..pending {
            match completion_rx.recv() {
                Ok((index, Ok(output))) => slots[index] = Some(output),
                Ok((_, Err(failure))) => failures.push(failure),
                Err(_) => return Err(Error::Interrupted),
            }
        }

        if !failures.is_empty() {
            failures.sort_by_key(|failure| failure.index);
            return Err(Error::TaskFailure(failures));
        }
        Ok(slots.into_iter().map(|slot| slot.unwrap()).collect())
    }

    /// Number of worker threads owned by the pool.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Number of tasks enqueued but not yet picked up by a worker.
    pub fn pending_tasks(&self) -> usize {
        self.queue.len()
    }

    /// Stop the workers and wait for every worker thread to terminate.
    ///
    /// Workers finish the task they are currently executing before observing
    /// the stop signal; tasks still waiting in the queue are abandoned.
    /// Consuming the pool makes submitting after the close unrepresentable.
    pub fn close(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.queue.stop();
        for worker in self.workers.drain(..) {
            worker.join();
        }
    }
}

impl Drop for WorkerPool {
    /// Same teardown as [`WorkerPool::close`].
    fn drop(&mut self) {
        self.shutdown();
    }
}

struct Worker {
    id: usize,
    handle: JoinHandle<()>,
}

impl Worker {
    fn spawn(id: usize, queue: TaskQueue<Task>) -> io::Result<Worker> {
        let handle = thread::Builder::new()
            .name(format!("pool-worker-{id}"))
            .spawn(move || {
                trace!("worker {id} started");
                while let Some(task) = queue.recv() {
                    task();
                }
                trace!("worker {id} stopped");
            })?;
        Ok(Worker { id, handle })
    }

    fn join(self) {
        if self.handle.join().is_err() {
            error!("worker {} terminated by panic", self.id);
        }
    }
}
