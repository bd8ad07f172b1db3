//! The raw, opaque-element entry points: a base pointer, an element count,
//! an element size known only at run time, and a [`RawCompare`]
//! capability. This is the surface a real FFI caller (or a caller sorting
//! something that isn't a Rust `[T]` at all) uses directly; the generic
//! `sort_by`/`sort_unstable_by` family in the crate root are monomorphized
//! adapters on top of it.

use crate::comparator::{ContextCompare, ContextCompareFn, RawCompare};
use crate::config::Tuning;
use crate::cursor::Region;
use crate::error::FatalErrorSink;
use crate::{quicksort, timsort};

/// Sort `nel` elements of `elem_size` bytes each, starting at `base`, using
/// `cmp` as the ordering relation. Not stable; allocates nothing.
///
/// # Safety
/// `base` must point to `nel * elem_size` valid, initialized, mutable
/// bytes, and `cmp` must be able to compare any two `elem_size`-byte
/// elements drawn from that range.
pub unsafe fn quicksort_raw(
    base: *mut u8,
    nel: usize,
    elem_size: usize,
    cmp: &dyn RawCompare,
    tuning: &Tuning,
) {
    unsafe { quicksort::run(Region::new(base, elem_size), nel, cmp, tuning) }
}

/// Sort `nel` elements of `elem_size` bytes each, starting at `base`, using
/// `cmp` as the ordering relation. Stable; may allocate scratch memory
/// proportional to the smaller of two runs being merged, reported to
/// `sink` on failure.
///
/// # Safety
/// Same requirements as [`quicksort_raw`].
pub unsafe fn timsort_raw(
    base: *mut u8,
    nel: usize,
    elem_size: usize,
    cmp: &dyn RawCompare,
    tuning: &Tuning,
    sink: &dyn FatalErrorSink,
) {
    unsafe { timsort::run(Region::new(base, elem_size), nel, cmp, tuning, sink) }
}

/// [`quicksort_raw`] taking a C-ABI-shaped comparator (function pointer
/// plus an opaque context pointer) instead of a [`RawCompare`] object,
/// for callers crossing a real FFI boundary.
///
/// # Safety
/// Same requirements as [`quicksort_raw`]; additionally, `cmp` must be
/// safe to call with `ctx` and any two element pointers in range.
pub unsafe fn quicksort_raw_ctx(
    base: *mut u8,
    nel: usize,
    elem_size: usize,
    cmp: ContextCompareFn,
    ctx: *mut std::ffi::c_void,
    tuning: &Tuning,
) {
    let comparator = ContextCompare { cmp, ctx };
    unsafe { quicksort_raw(base, nel, elem_size, &comparator, tuning) }
}

/// [`timsort_raw`] taking a C-ABI-shaped comparator; see
/// [`quicksort_raw_ctx`].
///
/// # Safety
/// Same requirements as [`timsort_raw`]; additionally, `cmp` must be safe
/// to call with `ctx` and any two element pointers in range.
pub unsafe fn timsort_raw_ctx(
    base: *mut u8,
    nel: usize,
    elem_size: usize,
    cmp: ContextCompareFn,
    ctx: *mut std::ffi::c_void,
    tuning: &Tuning,
    sink: &dyn FatalErrorSink,
) {
    let comparator = ContextCompare { cmp, ctx };
    unsafe { timsort_raw(base, nel, elem_size, &comparator, tuning, sink) }
}
