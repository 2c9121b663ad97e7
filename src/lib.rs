//! # Parallel Mapper
//!
//! This crate provides a bounded pool of worker threads for applying a function
//! to many inputs at once. The [`WorkerPool`] struct dispatches one task per
//! input to its workers and hands back the outputs in input order. The
//! [`Aggregator`] struct builds scalar reductions such as [`maximum`] and
//! [`count`] on top of the same machinery.
//!
//! ## Ordered parallel map
//! ```rust
//! use parallel_mapper::prelude::*;
//!
//! fn main() -> parallel_mapper::Result<()> {
//!     let pool = WorkerPool::new(4)?;
//!
//!     let squares = pool.map(|n: u64| n * n, 1..=5)?;
//!     assert_eq!(squares, vec![1, 4, 9, 16, 25]);
//!
//!     pool.close();
//!     Ok(())
//! }
//! ```
//!
//! ## Scalar reductions
//! Reductions split their input into contiguous partitions and reduce the
//! partitions in parallel. They run on throwaway threads by default and on a
//! [`WorkerPool`] when handed one:
//! ```rust
//! use parallel_mapper::prelude::*;
//!
//! fn main() -> parallel_mapper::Result<()> {
//!     let pool = WorkerPool::new(4)?;
//!     let aggregator = Aggregator::with_executor(&pool);
//!
//!     let readings = vec![271, 314, 99, 314, 162];
//!     assert_eq!(aggregator.maximum(3, readings.clone(), |a, b| a.cmp(b))?, 314);
//!     assert_eq!(aggregator.count(3, readings, |value| *value > 200)?, 3);
//!
//!     pool.close();
//!     Ok(())
//! }
//! ```
//!
//! ## When tasks panic
//! A panicking task never tears down the pool and never yields torn output.
//! The call that submitted it fails with [`Error::TaskFailure`], which lists
//! every panicking input, and the workers stay available for later calls.
//!
//! [`maximum`]: Aggregator::maximum
//! [`count`]: Aggregator::count

mod internal;

mod aggregate;
mod error;
mod executor;
mod pool;

pub use aggregate::Aggregator;
pub use error::{Error, Result, TaskPanic};
pub use executor::{Executor, ThreadPerTask};
pub use pool::WorkerPool;

pub mod prelude {
    pub use crate::aggregate::Aggregator;
    pub use crate::executor::{Executor, ThreadPerTask};
    pub use crate::pool::WorkerPool;
}
