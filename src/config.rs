//! Tunable thresholds for both engines, collected into one struct so
//! benchmarking against adversarial inputs doesn't require recompiling.
//! Defaults reproduce the literal constants this crate's algorithms were
//! distilled from.

/// Quicksort and Timsort tuning knobs.
#[derive(Clone, Copy, Debug)]
pub struct Tuning {
    /// Below this element count, pivot selection just takes the midpoint.
    pub median_of_three_threshold: usize,
    /// At or above this element count, pivot selection uses a ninther
    /// (median-of-medians over three groups of three).
    pub ninther_threshold: usize,
    /// Quicksort's adaptive already-sorted/reverse-sorted scan only runs
    /// once per top-level call, and only when the region is at least this
    /// large.
    pub chklim_initial: usize,
    /// Below this element count, Timsort sorts the whole input with one
    /// binary-insertion pass instead of building runs.
    pub small_sort_threshold: usize,
    /// Number of runs pushed before the run-stack invariant is first
    /// checked.
    pub check_inv_amount: u32,
    /// Initial `minGallop`: consecutive wins by one side before the merge
    /// switches to galloping mode.
    pub min_gallop_initial: i32,
}

impl Default for Tuning {
    fn default() -> Self {
        Tuning {
            median_of_three_threshold: 60,
            ninther_threshold: 200,
            chklim_initial: 63,
            small_sort_threshold: 64,
            check_inv_amount: 3,
            min_gallop_initial: 7,
        }
    }
}
