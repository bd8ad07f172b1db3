//! Grow-only scratch buffer for Timsort's merges, sized to the smaller of
//! the two runs being merged per call. Never shrinks across a sort, so
//! repeated merges of similar size don't re-allocate.

use cuneiform::cuneiform;

use crate::error::{FatalErrorSink, SortError};

// Cache-line aligned so two unrelated sorts running on different threads,
// each growing their own scratch buffer, don't false-share the control
// block.
#[cuneiform]
struct ScratchHeader {
    capacity_elems: usize,
    elem_size: usize,
}

pub(crate) struct ScratchBuffer {
    data: Vec<u8>,
    header: ScratchHeader,
}

impl ScratchBuffer {
    pub(crate) fn new(elem_size: usize) -> Self {
        ScratchBuffer {
            data: Vec::new(),
            header: ScratchHeader {
                capacity_elems: 0,
                elem_size,
            },
        }
    }

    /// Ensure capacity for at least `min_elems` elements and return a
    /// pointer to the start of the buffer. Calls the sink (never returning)
    /// on allocation failure.
    pub(crate) fn ensure(&mut self, min_elems: usize, sink: &dyn FatalErrorSink) -> *mut u8 {
        if min_elems > self.header.capacity_elems {
            let needed_bytes = min_elems * self.header.elem_size;
            let additional = needed_bytes.saturating_sub(self.data.len());
            if self.data.try_reserve_exact(additional).is_err() {
                sink.on_fatal_error(SortError::AllocationFailed {
                    requested_bytes: needed_bytes,
                });
            }
            log::debug!("rawsort: growing Timsort scratch buffer to {min_elems} elements");
            self.data.resize(needed_bytes, 0);
            self.header.capacity_elems = min_elems;
        }
        self.data.as_mut_ptr()
    }
}
