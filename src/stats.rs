//! Test-instrumentation counters for the primitive intersection tests.
//!
//! Every frustum-vs-AABB classification and every ray-vs-AABB test bumps one
//! of these counters. They exist so the test suite can verify that the
//! hierarchy actually prunes work; they carry no other meaning. The counters
//! are thread-local, so concurrent readers see only their own thread's
//! numbers and no synchronization is needed.

use std::cell::Cell;

thread_local! {
    static FRUSTUM_VS_AABB: Cell<usize> = const { Cell::new(0) };
    static RAY_VS_AABB: Cell<usize> = const { Cell::new(0) };
}

/// Resets both counters of the current thread to zero.
pub fn reset() {
    FRUSTUM_VS_AABB.with(|c| c.set(0));
    RAY_VS_AABB.with(|c| c.set(0));
}

/// Number of frustum-vs-AABB classifications performed on this thread since
/// the last [`reset`].
pub fn frustum_vs_aabb() -> usize {
    FRUSTUM_VS_AABB.with(|c| c.get())
}

/// Number of ray-vs-AABB tests performed on this thread since the last
/// [`reset`].
pub fn ray_vs_aabb() -> usize {
    RAY_VS_AABB.with(|c| c.get())
}

pub(crate) fn record_frustum_vs_aabb() {
    FRUSTUM_VS_AABB.with(|c| c.set(c.get() + 1));
}

pub(crate) fn record_ray_vs_aabb() {
    RAY_VS_AABB.with(|c| c.set(c.get() + 1));
}
