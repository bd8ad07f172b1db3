//! Timsort's only failure mode: growing the scratch buffer it merges
//! through. Quicksort never allocates and cannot fail.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SortError {
    #[error("failed to grow Timsort scratch buffer to {requested_bytes} bytes")]
    AllocationFailed { requested_bytes: usize },
}

/// The fatal-error collaborator: invoked when allocation fails, never
/// returns control to the sort.
pub trait FatalErrorSink {
    fn on_fatal_error(&self, error: SortError) -> !;
}

/// Default sink: logs at `error!` and panics with the error's message.
#[derive(Default)]
pub struct PanicOnFailure;

impl FatalErrorSink for PanicOnFailure {
    fn on_fatal_error(&self, error: SortError) -> ! {
        log::error!("rawsort: {error}");
        panic!("{error}");
    }
}
