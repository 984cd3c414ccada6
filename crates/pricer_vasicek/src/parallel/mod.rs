//! Index-range fork-join executors.
//!
//! The moment engines evaluate every output cell independently, so the only
//! concurrency primitive they need is a map over `[0, n)` that returns
//! results in index order. [`Executor`] abstracts that primitive so tests can
//! swap the Rayon-backed executor for a serial one and compare results.
//!
//! # Determinism
//!
//! `sum` always folds the index-ordered map output serially, so floating-point
//! reductions are bit-identical across executors.

use std::iter::Sum;
use std::ops::Range;

use rayon::prelude::*;

/// Minimum range length before Rayon is engaged.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 64;

/// Map-over-range and sum-over-range primitive.
///
/// Evaluation order of individual indices is unspecified; the returned
/// sequence is always index-aligned with the range.
pub trait Executor: Sync {
    /// Evaluates `f` for every index in `range`, in index order.
    fn map<R, F>(&self, range: Range<usize>, f: F) -> Vec<R>
    where
        R: Send,
        F: Fn(usize) -> R + Sync + Send;

    /// Sums `f` over `range`.
    fn sum<S, F>(&self, range: Range<usize>, f: F) -> S
    where
        S: Send + Sum<S>,
        F: Fn(usize) -> S + Sync + Send,
    {
        self.map(range, f).into_iter().sum()
    }
}

/// Single-threaded executor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SerialExecutor;

impl Executor for SerialExecutor {
    fn map<R, F>(&self, range: Range<usize>, f: F) -> Vec<R>
    where
        R: Send,
        F: Fn(usize) -> R + Sync + Send,
    {
        range.map(f).collect()
    }
}

/// Configuration for parallel execution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParallelConfig {
    /// Minimum items before using parallelism
    pub parallel_threshold: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl ParallelConfig {
    /// Creates a new parallel configuration.
    pub fn new(parallel_threshold: usize) -> Self {
        Self { parallel_threshold }
    }

    /// Returns whether to use parallel processing for the given item count.
    #[inline]
    pub fn should_parallelize(&self, n_items: usize) -> bool {
        n_items >= self.parallel_threshold
    }
}

/// Rayon-backed executor on the global thread pool.
///
/// Ranges shorter than the configured threshold are evaluated serially.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RayonExecutor {
    config: ParallelConfig,
}

impl RayonExecutor {
    /// Creates an executor with the given configuration.
    pub fn new(config: ParallelConfig) -> Self {
        Self { config }
    }

    /// Returns the parallel configuration.
    #[inline]
    pub fn config(&self) -> ParallelConfig {
        self.config
    }
}

impl Executor for RayonExecutor {
    fn map<R, F>(&self, range: Range<usize>, f: F) -> Vec<R>
    where
        R: Send,
        F: Fn(usize) -> R + Sync + Send,
    {
        if self.config.should_parallelize(range.len()) {
            range.into_par_iter().map(f).collect()
        } else {
            range.map(f).collect()
        }
    }
}
