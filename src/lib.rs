//! # rawsort
//!
//! A generic, in-place comparison sort engine over runtime-sized, opaque
//! elements: an introspective quicksort (three-way partitioning, adaptive
//! already-sorted/reverse-sorted short-circuit, no heap allocation) and a
//! full stable Timsort (galloping merges, run-stack invariant maintenance),
//! both operating on a base pointer, an element count, and an element size
//! known only at run time — the shape a `qsort`-style C collaborator would
//! see across an FFI boundary.
//!
//! ## Two layers
//!
//! - [`raw`]: the opaque-byte-array engines themselves, taking a base
//!   pointer, `nel`, `elem_size`, and a [`comparator::RawCompare`]
//!   capability. This is the layer a real FFI caller (or a caller sorting
//!   something that isn't a Rust `[T]` at all, e.g. a flat buffer of
//!   variable-width records) uses directly.
//! - The crate root: safe, generic, monomorphized wrappers
//!   ([`sort_unstable_by`], [`sort_by`], and friends) over a `&mut [T]`,
//!   for the common case where the data to sort really is a typed Rust
//!   slice.
//!
//! ## Usage
//!
//! ```rust
//! use rawsort::sort_unstable_by;
//!
//! let mut data = vec![5, 3, 1, 4, 2];
//! sort_unstable_by(&mut data, |a, b| a.cmp(b));
//! assert_eq!(data, vec![1, 2, 3, 4, 5]);
//! ```
//!
//! Stability matters when sorting by a derived key and the original
//! relative order of equal keys must survive:
//!
//! ```rust
//! use rawsort::sort_by;
//!
//! let mut data = vec![(1, "a"), (0, "b"), (1, "c"), (0, "d")];
//! sort_by(&mut data, |a, b| a.0.cmp(&b.0));
//! assert_eq!(data, vec![(0, "b"), (0, "d"), (1, "a"), (1, "c")]);
//! ```
//!
//! ## Performance characteristics
//!
//! - [`sort_unstable_by`]/[`sort_unstable`]: O(N log N) average, not stable,
//!   no allocation. Degrades toward O(N log N) worst case via the ninther
//!   pivot strategy on large partitions rather than true O(N²) blowup on
//!   adversarial inputs, but unlike the stable path has no formal worst-case
//!   bound.
//! - [`sort_by`]/[`sort`]: O(N log N) worst case, stable, allocates scratch
//!   proportional to the smaller of two runs being merged at any one time.

pub mod buffer;
pub mod comparator;
pub mod config;
pub mod cursor;
pub mod error;
pub mod gallop;
pub mod movement;
pub mod quicksort;
pub mod raw;
pub mod timsort;

use std::cell::RefCell;
use std::cmp::Ordering;

use comparator::TypedCompare;
use config::Tuning;
use error::{FatalErrorSink, PanicOnFailure};

/// Sort `data` in place using `compare`. Not stable; allocates nothing.
/// Uses [`Tuning::default`] thresholds; see [`sort_unstable_by_with_tuning`]
/// to override them.
pub fn sort_unstable_by<T>(data: &mut [T], compare: impl FnMut(&T, &T) -> Ordering) {
    sort_unstable_by_with_tuning(data, compare, &Tuning::default());
}

/// [`sort_unstable_by`] with an explicit [`Tuning`] override.
pub fn sort_unstable_by_with_tuning<T>(
    data: &mut [T],
    compare: impl FnMut(&T, &T) -> Ordering,
    tuning: &Tuning,
) {
    if data.len() <= 1 {
        return;
    }
    let cmp = RefCell::new(TypedCompare::new(compare));
    unsafe {
        raw::quicksort_raw(
            data.as_mut_ptr() as *mut u8,
            data.len(),
            std::mem::size_of::<T>(),
            &cmp,
            tuning,
        );
    }
}

/// Sort `data` in place by its natural [`Ord`]. Not stable; allocates
/// nothing.
pub fn sort_unstable<T: Ord>(data: &mut [T]) {
    sort_unstable_by(data, |a, b| a.cmp(b));
}

/// Sort `data` in place using `compare`, preserving the relative order of
/// elements `compare` considers equal. Allocates scratch memory
/// proportional to the smaller of two runs being merged; panics (via the
/// default [`FatalErrorSink`]) if that allocation fails. See
/// [`sort_by_with_sink`] to supply a different failure policy.
pub fn sort_by<T>(data: &mut [T], compare: impl FnMut(&T, &T) -> Ordering) {
    sort_by_with_tuning(data, compare, &Tuning::default());
}

/// [`sort_by`] with an explicit [`Tuning`] override.
pub fn sort_by_with_tuning<T>(
    data: &mut [T],
    compare: impl FnMut(&T, &T) -> Ordering,
    tuning: &Tuning,
) {
    sort_by_with_sink(data, compare, tuning, &PanicOnFailure);
}

/// [`sort_by`] with an explicit [`Tuning`] override and [`FatalErrorSink`]
/// for scratch-buffer allocation failure, for callers that need a
/// terminal action other than panicking (process abort, unwinding to a VM
/// boundary, etc.).
pub fn sort_by_with_sink<T>(
    data: &mut [T],
    compare: impl FnMut(&T, &T) -> Ordering,
    tuning: &Tuning,
    sink: &dyn FatalErrorSink,
) {
    if data.len() <= 1 {
        return;
    }
    let cmp = RefCell::new(TypedCompare::new(compare));
    unsafe {
        raw::timsort_raw(
            data.as_mut_ptr() as *mut u8,
            data.len(),
            std::mem::size_of::<T>(),
            &cmp,
            tuning,
            sink,
        );
    }
}

/// Sort `data` in place by its natural [`Ord`], preserving the relative
/// order of equal elements.
pub fn sort<T: Ord>(data: &mut [T]) {
    sort_by(data, |a, b| a.cmp(b));
}

pub mod prelude {
    pub use crate::{sort, sort_by, sort_unstable, sort_unstable_by};
}
