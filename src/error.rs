use std::any::Any;
use std::io;

use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// A single task that panicked while a user-supplied function was applied to
/// the input at `index`.
///
/// `index` is the position of the input in the sequence handed to the executing
/// call: for [`WorkerPool::map`](crate::WorkerPool::map) the element index, for
/// an [`Aggregator`](crate::Aggregator) operation the partition index.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("task for input {index} panicked: {reason}")]
pub struct TaskPanic {
    /// Index of the input whose task panicked.
    pub index: usize,
    /// The panic message, or a placeholder for non-string payloads.
    pub reason: String,
}

/// Errors reported by the worker pool and the aggregator.
#[derive(Debug, Error)]
pub enum Error {
    /// A thread count of zero was passed to the pool constructor or to an
    /// aggregator operation.
    #[error("thread count must be at least 1")]
    InvalidConfiguration,

    /// A reduction without an identity element (maximum/minimum) was requested
    /// over an empty input sequence.
    #[error("cannot reduce an empty input sequence")]
    EmptyInput,

    /// One or more user-supplied functions panicked during execution. Every
    /// failed input is listed, sorted by input index; all remaining tasks of
    /// the call still ran to completion.
    #[error("{} task(s) panicked during execution", .0.len())]
    TaskFailure(Vec<TaskPanic>),

    /// The operating system refused to spawn a thread. Any threads spawned
    /// earlier by the failing call have been stopped and joined.
    #[error("failed to spawn a worker thread")]
    Spawn(#[source] io::Error),

    /// The pool stopped delivering completions before every result arrived.
    /// Unreachable as long as the pool outlives the call, which single
    /// ownership of [`WorkerPool`](crate::WorkerPool) enforces; kept so a
    /// mapping call can never block forever on a torn-down pool.
    #[error("worker pool stopped before all results were delivered")]
    Interrupted,
}

/// Render a payload caught from a panicking task.
pub(crate) fn panic_reason(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "opaque panic payload".to_string()
    }
}
