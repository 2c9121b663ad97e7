use std::cmp::Ordering;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::executor::{Executor, ThreadPerTask};

/// Parallel scalar reductions over owned sequences.
///
/// Every operation takes a thread count, splits the input into at most that
/// many contiguous partitions of near-equal length, reduces each partition on
/// the chosen [`Executor`] and combines the partial results. The outcome is
/// always the same as the sequential reduction, whatever the thread count.
///
/// By default partitions run on [`ThreadPerTask`]. Use
/// [`with_executor`](Aggregator::with_executor) to reuse the threads of a
/// [`WorkerPool`](crate::WorkerPool) instead.
///
/// # Examples
///
/// ```
/// use parallel_mapper::Aggregator;
///
/// let aggregator = Aggregator::new();
/// let digits = vec![3, 1, 4, 1, 5, 9, 2, 6];
///
/// let largest = aggregator.maximum(3, digits.clone(), |a, b| a.cmp(b))?;
/// assert_eq!(largest, 9);
///
/// let above_three = aggregator.count(3, digits, |digit| *digit > 3)?;
/// assert_eq!(above_three, 4);
/// # Ok::<(), parallel_mapper::Error>(())
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Aggregator<E = ThreadPerTask> {
    executor: E,
}

impl Aggregator {
    /// Creates an aggregator that spawns one thread per partition.
    pub fn new() -> Self {
        Aggregator {
            executor: ThreadPerTask,
        }
    }
}

impl<E: Executor> Aggregator<E> {
    /// Creates an aggregator that runs its partitions on `executor`.
    pub fn with_executor(executor: E) -> Self {
        Aggregator { executor }
    }

    /// Returns the largest element according to `compare`.
    ///
    /// When several elements compare equal to the largest, the one that comes
    /// first in `values` wins. Fails with [`Error::EmptyInput`] when `values`
    /// is empty.
    pub fn maximum<T, C>(&self, threads: usize, values: Vec<T>, compare: C) -> Result<T>
    where
        T: Send + 'static,
        C: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        self.extremum(threads, values, compare, Ordering::Greater)
    }

    /// Returns the smallest element according to `compare`.
    ///
    /// When several elements compare equal to the smallest, the one that comes
    /// first in `values` wins. Fails with [`Error::EmptyInput`] when `values`
    /// is empty.
    pub fn minimum<T, C>(&self, threads: usize, values: Vec<T>, compare: C) -> Result<T>
    where
        T: Send + 'static,
        C: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        self.extremum(threads, values, compare, Ordering::Less)
    }

    /// Returns whether `predicate` holds for at least one element.
    ///
    /// Empty input yields `false`.
    pub fn any<T, P>(&self, threads: usize, values: Vec<T>, predicate: P) -> Result<bool>
    where
        T: Send + 'static,
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let verdicts = self.run_partitioned(threads, values, move |partition: Vec<T>| {
            partition.iter().any(|value| predicate(value))
        })?;
        Ok(verdicts.into_iter().any(|found| found))
    }

    /// Returns whether `predicate` holds for every element.
    ///
    /// Empty input yields `true`.
    pub fn all<T, P>(&self, threads: usize, values: Vec<T>, predicate: P) -> Result<bool>
    where
        T: Send + 'static,
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Ok(!self.any(threads, values, move |value| !predicate(value))?)
    }

    /// Returns how many elements satisfy `predicate`.
    ///
    /// Empty input yields `0`.
    pub fn count<T, P>(&self, threads: usize, values: Vec<T>, predicate: P) -> Result<usize>
    where
        T: Send + 'static,
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let counts = self.run_partitioned(threads, values, move |partition: Vec<T>| {
            partition.into_iter().filter(|value| predicate(value)).count()
        })?;
        Ok(counts.into_iter().sum())
    }

    fn extremum<T, C>(
        &self,
        threads: usize,
        values: Vec<T>,
        compare: C,
        keep: Ordering,
    ) -> Result<T>
    where
        T: Send + 'static,
        C: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        if threads == 0 {
            return Err(Error::InvalidConfiguration);
        }
        if values.is_empty() {
            return Err(Error::EmptyInput);
        }
        let compare = Arc::new(compare);
        let partition_compare = Arc::clone(&compare);
        let champions = self.executor.execute(
            move |partition: Vec<T>| select(partition, &*partition_compare, keep),
            split_into(values, threads),
        )?;
        Ok(select(champions, &*compare, keep))
    }

    fn run_partitioned<T, R, F>(&self, threads: usize, values: Vec<T>, task: F) -> Result<Vec<R>>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(Vec<T>) -> R + Send + Sync + 'static,
    {
        if threads == 0 {
            return Err(Error::InvalidConfiguration);
        }
        self.executor.execute(task, split_into(values, threads))
    }
}

/// Picks the element to keep out of `values`, favoring the earliest one on
/// ties. Panics on empty input, which partitioning never produces.
fn select<T, C>(values: Vec<T>, compare: &C, keep: Ordering) -> T
where
    C: Fn(&T, &T) -> Ordering,
{
    values
        .into_iter()
        .reduce(|best, candidate| {
            if compare(&candidate, &best) == keep {
                candidate
            } else {
                best
            }
        })
        .expect("partition is never empty")
}

/// Splits `values` into `min(threads, values.len())` contiguous runs whose
/// lengths differ by at most one. The first `values.len() % count` runs get
/// the extra element.
fn split_into<T>(mut values: Vec<T>, threads: usize) -> Vec<Vec<T>> {
    let count = threads.min(values.len());
    if count == 0 {
        return Vec::new();
    }
    let base = values.len() / count;
    let extra = values.len() % count;
    let mut partitions = Vec::with_capacity(count);
    for index in 0..count {
        let size = if index < extra { base + 1 } else { base };
        let rest = values.split_off(size);
        partitions.push(values);
        values = rest;
    }
    partitions
}
