//! Independent per-index work, optionally spread across threads.
//!
//! Only analysis loops whose outputs are disjoint go through here. Overlap-add
//! synthesis always accumulates sequentially.

/// Evaluate `f(0..n)` and collect the results in index order.
#[cfg(feature = "parallel")]
pub(crate) fn collect_indexed<T, F>(n: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    use rayon::prelude::*;
    (0..n).into_par_iter().map(f).collect()
}

/// Evaluate `f(0..n)` and collect the results in index order.
#[cfg(not(feature = "parallel"))]
pub(crate) fn collect_indexed<T, F>(n: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    (0..n).map(f).collect()
}
