//! Stable sort: natural-run detection, minrun padding via binary insertion,
//! a run stack maintaining Timsort's merge invariants, and adaptive
//! galloping merges. Ported from `rb_calc_minrun`/`rb_timsort*` in
//! `util.c`.

use std::cmp::Ordering;
use std::mem;
use std::ptr;

use crate::buffer::ScratchBuffer;
use crate::comparator::RawCompare;
use crate::config::Tuning;
use crate::cursor::Region;
use crate::error::FatalErrorSink;
use crate::gallop::gallop;
use crate::movement::{self, MovementPlan};

const STACK_CAPACITY: usize = mem::size_of::<usize>() * 8;

#[derive(Clone, Copy)]
struct RunDesc {
    start: usize,
    len: usize,
}

struct RunStack {
    buf: [RunDesc; STACK_CAPACITY],
    len: usize,
}

impl RunStack {
    fn new() -> Self {
        RunStack {
            buf: [RunDesc { start: 0, len: 0 }; STACK_CAPACITY],
            len: 0,
        }
    }

    fn push(&mut self, d: RunDesc) {
        self.buf[self.len] = d;
        self.len += 1;
    }

    fn get(&self, i: usize) -> RunDesc {
        self.buf[i]
    }

    /// Merge runs at `pos` and `pos + 1`, leaving a single run at `pos`.
    fn collapse(&mut self, pos: usize, merged_len: usize) {
        self.buf[pos].len = merged_len;
        for i in (pos + 1)..(self.len - 1) {
            self.buf[i] = self.buf[i + 1];
        }
        self.len -= 1;
    }
}

pub(crate) unsafe fn run(
    region: Region,
    nel: usize,
    cmp: &dyn RawCompare,
    tuning: &Tuning,
    sink: &dyn FatalErrorSink,
) {
    if nel <= 1 {
        return;
    }
    let elem_size = region.elem_size();
    let plan = MovementPlan::compute(region.base_ptr(), elem_size);
    log::trace!("timsort: nel={nel} elem_size={elem_size} plan={plan:?}");

    let is_lt = |a: usize, b: usize| unsafe { cmp.compare(region.at(a).as_ptr(), region.at(b).as_ptr()) };
    let swap = |a: usize, b: usize| unsafe {
        movement::swap(
            region.at(a).as_mut_ptr(),
            region.at(b).as_mut_ptr(),
            elem_size,
            &plan,
        )
    };

    let mut tmp = vec![0u8; elem_size];

    if nel < tuning.small_sort_threshold {
        binary_insertion_sort(region, cmp, elem_size, 0, 1, nel, tmp.as_mut_ptr());
        return;
    }

    let min_run = calc_minrun(nel);
    let mut scratch = ScratchBuffer::new(elem_size);
    let mut min_gallop = tuning.min_gallop_initial;
    let mut stack = RunStack::new();
    let mut check_inv_amount = tuning.check_inv_amount;

    let mut cur = 0usize;
    loop {
        let remaining = nel - cur;
        let mut run_len = detect_run(cur, remaining, &is_lt, &swap);
        let trun = min_run.min(remaining);
        if trun > run_len {
            binary_insertion_sort(region, cmp, elem_size, cur, run_len, trun, tmp.as_mut_ptr());
            run_len = trun;
        }
        log::trace!("timsort: run [{cur}, {}) len={run_len}", cur + run_len);
        stack.push(RunDesc { start: cur, len: run_len });
        cur += run_len;
        if cur >= nel {
            break;
        }
        if check_inv_amount > 0 {
            check_inv_amount -= 1;
            continue;
        }
        enforce_invariants(
            &mut stack,
            region,
            cmp,
            elem_size,
            &mut scratch,
            &mut min_gallop,
            sink,
        );
    }

    while stack.len > 1 {
        merge_at(
            &mut stack,
            stack.len - 2,
            region,
            cmp,
            elem_size,
            &mut scratch,
            &mut min_gallop,
            sink,
        );
    }
}

fn calc_minrun(nel: usize) -> usize {
    let bitlen = usize::BITS - nel.leading_zeros();
    let shift = bitlen.max(6) - 6;
    let mask = (1usize << shift) - 1;
    (nel >> shift) + if nel & mask != 0 { 1 } else { 0 }
}

fn detect_run(
    cur: usize,
    remaining: usize,
    is_lt: &impl Fn(usize, usize) -> Ordering,
    swap: &impl Fn(usize, usize),
) -> usize {
    if remaining == 1 {
        return 1;
    }
    if remaining == 2 {
        if is_lt(cur, cur + 1) == Ordering::Greater {
            swap(cur, cur + 1);
        }
        return 2;
    }
    let end = cur + remaining;
    let mut pos = cur + 2;
    if is_lt(cur, cur + 1) != Ordering::Greater {
        while pos != end && is_lt(pos - 1, pos) != Ordering::Greater {
            pos += 1;
        }
        pos - cur
    } else {
        while pos != end && is_lt(pos - 1, pos) == Ordering::Greater {
            pos += 1;
        }
        let run_len = pos - cur;
        let (mut l, mut r) = (cur, pos - 1);
        while l < r {
            swap(l, r);
            l += 1;
            r -= 1;
        }
        run_len
    }
}

/// Sorts `[cur, cur+to)` given `[cur, cur+from)` is already sorted, via
/// binary search plus a byte-range shift — not a [`crate::movement`]
/// primitive, since this is a directed shift-and-insert, not a swap.
fn binary_insertion_sort(
    region: Region,
    cmp: &dyn RawCompare,
    elem_size: usize,
    cur: usize,
    from: usize,
    to: usize,
    tmp: *mut u8,
) {
    let at = |k: usize| region.at(cur + k).as_mut_ptr();
    let cmp_at = |x: usize, y: usize| unsafe { cmp.compare(at(x), at(y)) };

    for i in from..to {
        if cmp_at(i - 1, i) != Ordering::Greater {
            continue;
        }
        unsafe {
            ptr::copy_nonoverlapping(at(i), tmp, elem_size);
        }
        let cmp_tmp = |y: usize| unsafe { cmp.compare(tmp, at(y)) };

        let loc = if cmp_tmp(0) == Ordering::Less {
            0
        } else if cmp_tmp(i - 1) == Ordering::Greater {
            i - 1
        } else {
            let (mut l, mut r) = (0usize, i - 1);
            loop {
                let c = l + (r - l) / 2;
                if cmp_tmp(c) == Ordering::Less {
                    if c - l <= 1 {
                        break c;
                    }
                    r = c;
                } else {
                    if r - c <= 1 {
                        break c + 1;
                    }
                    l = c;
                }
            }
        };

        unsafe {
            ptr::copy(at(loc), at(loc + 1), (i - loc) * elem_size);
            ptr::copy_nonoverlapping(tmp, at(loc), elem_size);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn enforce_invariants(
    stack: &mut RunStack,
    region: Region,
    cmp: &dyn RawCompare,
    elem_size: usize,
    scratch: &mut ScratchBuffer,
    min_gallop: &mut i32,
    sink: &dyn FatalErrorSink,
) {
    loop {
        let top = stack.len;
        if top <= 1 {
            break;
        }
        let holds = if top == 2 {
            stack.get(top - 2).len > stack.get(top - 1).len
        } else {
            stack.get(top - 3).len > stack.get(top - 2).len + stack.get(top - 1).len
                && stack.get(top - 2).len > stack.get(top - 1).len
        };
        if holds {
            break;
        }
        if top == 2 || stack.get(top - 2).len <= stack.get(top - 1).len {
            merge_at(stack, top - 2, region, cmp, elem_size, scratch, min_gallop, sink);
        } else {
            let four_level_violated = stack.get(top - 3).len <= stack.get(top - 2).len + stack.get(top - 1).len
                || (top >= 4 && stack.get(top - 4).len <= stack.get(top - 3).len + stack.get(top - 2).len);
            if four_level_violated {
                merge_at(stack, top - 3, region, cmp, elem_size, scratch, min_gallop, sink);
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn merge_at(
    stack: &mut RunStack,
    pos: usize,
    region: Region,
    cmp: &dyn RawCompare,
    elem_size: usize,
    scratch: &mut ScratchBuffer,
    min_gallop: &mut i32,
    sink: &dyn FatalErrorSink,
) {
    let left = stack.get(pos);
    let right = stack.get(pos + 1);
    log::trace!(
        "timsort: merging run [{}, {}) with run [{}, {})",
        left.start,
        left.start + left.len,
        right.start,
        right.start + right.len
    );
    merge_runs(region, cmp, elem_size, left, right, scratch, min_gallop, sink);
    stack.collapse(pos, left.len + right.len);
}

#[allow(clippy::too_many_arguments)]
fn merge_runs(
    region: Region,
    cmp: &dyn RawCompare,
    elem_size: usize,
    left: RunDesc,
    right: RunDesc,
    scratch: &mut ScratchBuffer,
    min_gallop: &mut i32,
    sink: &dyn FatalErrorSink,
) {
    let l_base = region.at(left.start).as_ptr();
    let r_base = region.at(right.start).as_ptr();

    let k = unsafe { gallop(cmp, elem_size, l_base, left.len, r_base, 0, true) };
    let l_start = left.start + k;
    let l_len = left.len - k;
    if l_len == 0 {
        *min_gallop /= 2;
        return;
    }

    // `l_start`'s element is strictly greater than `right`'s first element
    // (the trim above guarantees it), so this gallop can never return 0:
    // at least `right`'s first element precedes it.
    let before_r = region.at(right.start - 1).as_ptr();
    let r_len = unsafe { gallop(cmp, elem_size, r_base, right.len, before_r, right.len - 1, false) };

    let cap = l_len.min(r_len);
    let scratch_ptr = scratch.ensure(cap, sink);

    let base_ptr = region.at(l_start).as_mut_ptr();
    let r_ptr = region.at(right.start).as_ptr();

    if l_len < r_len {
        left_merge(cmp, elem_size, base_ptr, r_ptr, l_len, r_len, scratch_ptr, min_gallop);
    } else {
        right_merge(cmp, elem_size, base_ptr, r_ptr, l_len, r_len, scratch_ptr, min_gallop);
    }
}

const MIN_GALLOP_CONST: i32 = 7;

#[allow(clippy::too_many_arguments)]
fn left_merge(
    cmp: &dyn RawCompare,
    elem_size: usize,
    base_ptr: *mut u8,
    r_ptr: *const u8,
    l_len: usize,
    r_len: usize,
    scratch: *mut u8,
    min_gallop: &mut i32,
) {
    unsafe {
        ptr::copy_nonoverlapping(base_ptr, scratch, l_len * elem_size);
    }
    let l_ptr = scratch as *const u8;
    let elem = |p: *const u8, i: usize| unsafe { p.add(i * elem_size) };
    let dest = |pb: usize| unsafe { base_ptr.add(pb * elem_size) };

    let mut pl: usize = 0;
    let mut pr: usize = 0;
    let mut pb: usize = 0;
    let mut ming = *min_gallop;

    macro_rules! emit_l {
        () => {{
            unsafe { ptr::copy_nonoverlapping(elem(l_ptr, pl), dest(pb), elem_size) };
            pb += 1;
            pl += 1;
        }};
    }
    macro_rules! emit_r {
        () => {{
            unsafe { ptr::copy(elem(r_ptr, pr), dest(pb), elem_size) };
            pb += 1;
            pr += 1;
        }};
    }
    macro_rules! finalize {
        () => {{
            unsafe { ptr::copy_nonoverlapping(elem(l_ptr, pl), dest(pb), (l_len - pl) * elem_size) };
            *min_gallop = ming;
            return;
        }};
    }

    emit_r!();
    if r_len == 1 {
        finalize!();
    }

    loop {
        let mut l_num = 0i32;
        let mut r_num = 0i32;
        loop {
            let ord = unsafe { cmp.compare(elem(l_ptr, pl), elem(r_ptr, pr)) };
            if ord != Ordering::Greater {
                emit_l!();
                l_num += 1;
                r_num = 0;
                if ming <= l_num {
                    break;
                }
            } else {
                emit_r!();
                r_num += 1;
                l_num = 0;
                if pr == r_len {
                    finalize!();
                }
                if ming <= r_num {
                    break;
                }
            }
        }
        ming += 1;
        loop {
            if ming != 0 {
                ming -= 1;
            }
            let k = unsafe { gallop(cmp, elem_size, elem(l_ptr, pl), l_len - pl, elem(r_ptr, pr), 0, true) };
            unsafe { ptr::copy_nonoverlapping(elem(l_ptr, pl), dest(pb), k * elem_size) };
            pb += k;
            pl += k;
            emit_r!();
            if pr == r_len {
                finalize!();
            }
            if l_num != 0 && (k as i32) < MIN_GALLOP_CONST {
                ming += 1;
                break;
            }
            let k2 = unsafe { gallop(cmp, elem_size, elem(r_ptr, pr), r_len - pr, elem(l_ptr, pl), 0, false) };
            unsafe { ptr::copy(elem(r_ptr, pr), dest(pb), k2 * elem_size) };
            pb += k2;
            pr += k2;
            if pr == r_len {
                finalize!();
            }
            emit_l!();
            if r_num != 0 && (k2 as i32) < MIN_GALLOP_CONST {
                ming += 1;
                break;
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn right_merge(
    cmp: &dyn RawCompare,
    elem_size: usize,
    base_ptr: *mut u8,
    r_ptr: *const u8,
    l_len: usize,
    r_len: usize,
    scratch: *mut u8,
    min_gallop: &mut i32,
) {
    let es = elem_size as isize;
    unsafe {
        ptr::copy_nonoverlapping(r_ptr, scratch, r_len * elem_size);
    }
    let r_ptr2 = scratch as *const u8;
    let l_elem = |i: isize| unsafe { base_ptr.offset(i * es) as *const u8 };
    let r_elem = |i: isize| unsafe { r_ptr2.offset(i * es) };
    let dest = |i: isize| unsafe { base_ptr.offset(i * es) };

    let mut pl: isize = l_len as isize - 1;
    let mut pr: isize = r_len as isize - 1;
    let mut pb: isize = (l_len + r_len) as isize - 1;
    let mut ming = *min_gallop;

    macro_rules! emit_l {
        () => {{
            unsafe { ptr::copy(l_elem(pl), dest(pb), elem_size) };
            pb -= 1;
            pl -= 1;
        }};
    }
    macro_rules! emit_r {
        () => {{
            unsafe { ptr::copy_nonoverlapping(r_elem(pr), dest(pb), elem_size) };
            pb -= 1;
            pr -= 1;
        }};
    }
    macro_rules! finalize {
        () => {{
            unsafe { ptr::copy_nonoverlapping(r_elem(0), base_ptr, elem_size * (pr as usize + 1)) };
            *min_gallop = ming;
            return;
        }};
    }

    emit_l!();
    if l_len == 1 {
        finalize!();
    }

    loop {
        let mut l_num = 0i32;
        let mut r_num = 0i32;
        loop {
            let ord = unsafe { cmp.compare(l_elem(pl), r_elem(pr)) };
            if ord != Ordering::Greater {
                emit_r!();
                r_num += 1;
                l_num = 0;
                if ming <= r_num {
                    break;
                }
            } else {
                emit_l!();
                l_num += 1;
                r_num = 0;
                if pl == -1 {
                    finalize!();
                }
                if ming <= l_num {
                    break;
                }
            }
        }
        ming += 1;
        loop {
            if ming != 0 {
                ming -= 1;
            }
            let k = unsafe { gallop(cmp, elem_size, base_ptr as *const u8, (pl + 1) as usize, r_elem(pr), pl as usize, true) };
            let kk = k as isize;
            unsafe {
                ptr::copy(l_elem(kk), dest(pr + kk + 1), ((pl + 1 - kk) as usize) * elem_size);
            }
            pb = pr + kk;
            pl = kk - 1;
            if pl == -1 {
                finalize!();
            }
            emit_r!();
            if l_num != 0 && (pl + 1 - kk) < MIN_GALLOP_CONST as isize {
                ming += 1;
                break;
            }
            let k2 = unsafe { gallop(cmp, elem_size, r_ptr2, (pr + 1) as usize, l_elem(pl), pr as usize, false) };
            let kk2 = k2 as isize;
            unsafe {
                ptr::copy_nonoverlapping(r_elem(kk2), dest(pl + kk2 + 1), ((pr + 1 - kk2) as usize) * elem_size);
            }
            pb = pl + kk2;
            pr = kk2 - 1;
            emit_l!();
            if pl == -1 {
                finalize!();
            }
            if r_num != 0 && (pr + 1 - kk2) < MIN_GALLOP_CONST as isize {
                ming += 1;
                break;
            }
        }
    }
}
