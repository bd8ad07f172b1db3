//! Introspective quicksort with three-way partitioning, explicit recursion
//! stack (no call-stack recursion, no heap allocation), and an adaptive
//! short-circuit for already-sorted and reverse-sorted inputs. Ported from
//! `ruby_qsort` (`qs6.c`, by Tomoyuki Kawamura) in `util.c`.

use std::cmp::Ordering;
use std::mem;

use crate::comparator::RawCompare;
use crate::config::Tuning;
use crate::cursor::Region;
use crate::movement::{self, MovementPlan};

// Bounded by the index's bit width, exactly as qs6.c sizes its stack array:
// quicksort always recurses into the smaller partition and pushes the
// larger one, so depth is O(log2 N) and this bound is never close to tight.
const STACK_CAPACITY: usize = mem::size_of::<usize>() * 8;

struct Stack {
    buf: [(usize, usize); STACK_CAPACITY],
    len: usize,
}

impl Stack {
    fn new() -> Self {
        Stack {
            buf: [(0, 0); STACK_CAPACITY],
            len: 0,
        }
    }

    fn push(&mut self, l: usize, r: usize) {
        self.buf[self.len] = (l, r);
        self.len += 1;
    }

    fn pop(&mut self) -> Option<(usize, usize)> {
        if self.len == 0 {
            None
        } else {
            self.len -= 1;
            Some(self.buf[self.len])
        }
    }
}

enum Branch {
    A,
    B,
}

pub(crate) unsafe fn run(region: Region, nel: usize, cmp: &dyn RawCompare, tuning: &Tuning) {
    if nel <= 1 {
        return;
    }
    let elem_size = region.elem_size();
    let plan = MovementPlan::compute(region.base_ptr(), elem_size);
    log::trace!("quicksort: nel={nel} elem_size={elem_size} plan={plan:?}");

    let is_lt = |a: usize, b: usize| unsafe { cmp.compare(region.at(a).as_ptr(), region.at(b).as_ptr()) };
    let swap = |a: usize, b: usize| unsafe {
        movement::swap(
            region.at(a).as_mut_ptr(),
            region.at(b).as_mut_ptr(),
            elem_size,
            &plan,
        )
    };
    let rot3 = |a: usize, b: usize, c: usize| unsafe {
        movement::rot3(
            region.at(a).as_mut_ptr(),
            region.at(b).as_mut_ptr(),
            region.at(c).as_mut_ptr(),
            elem_size,
            &plan,
        )
    };

    let mut stack = Stack::new();
    let mut l: usize = 0;
    let mut r: usize = nel - 1;
    let mut chklim: usize = tuning.chklim_initial;

    'outer: loop {
        if l + 1 == r {
            if is_lt(l, r) == Ordering::Greater {
                swap(l, r);
            }
            match stack.pop() {
                Some((nl, nr)) => {
                    l = nl;
                    r = nr;
                    continue 'outer;
                }
                None => return,
            }
        }

        let n = r - l + 1;
        let mut m = l + n / 2;

        if n >= tuning.ninther_threshold {
            let step = n / 8;
            let (p1, p2, p3) = (l + step, l + step * 2, l + step * 3);
            let m1 = med3(p1, p2, p3, &is_lt);
            let (q1, q2, q3) = (m + step, m + step * 2, m + step * 3);
            let m3 = med3(q1, q2, q3, &is_lt);
            m = med3(m1, m, m3, &is_lt);
        } else if n >= tuning.median_of_three_threshold {
            let step = n / 4;
            let m1 = l + step;
            let m3 = m + step;
            m = med3(m1, m, m3, &is_lt);
        }

        let outcome = dispatch(l, r, m, nel, &mut chklim, tuning, &is_lt, &swap, &rot3);
        let (branch, m) = match outcome {
            PivotOutcome::Done => match stack.pop() {
                Some((nl, nr)) => {
                    l = nl;
                    r = nr;
                    continue 'outer;
                }
                None => return,
            },
            PivotOutcome::Partition(branch, m) => (branch, m),
        };

        let (l_fin, r_fin, eq_l, eq_r) = match branch {
            Branch::A => partition_a(l, r, m, &is_lt, &swap),
            Branch::B => partition_b(l, r, m, &is_lt, &swap),
        };

        match (eq_l, eq_r) {
            (false, false) => {
                if l_fin - l < r - r_fin {
                    stack.push(r_fin, r);
                    r = l_fin;
                } else {
                    stack.push(l, l_fin);
                    l = r_fin;
                }
            }
            (false, true) => r = l_fin,
            (true, false) => l = r_fin,
            (true, true) => match stack.pop() {
                Some((nl, nr)) => {
                    l = nl;
                    r = nr;
                }
                None => return,
            },
        }
    }
}

enum PivotOutcome {
    Done,
    Partition(Branch, usize),
}

#[allow(clippy::too_many_arguments)]
fn dispatch(
    l: usize,
    r: usize,
    m: usize,
    nel: usize,
    chklim: &mut usize,
    tuning: &Tuning,
    is_lt: &impl Fn(usize, usize) -> Ordering,
    swap: &impl Fn(usize, usize),
    rot3: &impl Fn(usize, usize, usize),
) -> PivotOutcome {
    match is_lt(l, m) {
        Ordering::Less => match is_lt(m, r) {
            Ordering::Less => {
                // 3-5-7
                if *chklim != 0 && nel >= *chklim {
                    *chklim = 0;
                    if scan_ascending(l, r, is_lt) {
                        log::debug!("quicksort: already-sorted short-circuit, nel={nel}");
                        return PivotOutcome::Done;
                    }
                }
                PivotOutcome::Partition(Branch::A, m)
            }
            Ordering::Greater => {
                // 3-5-4 / 3-5-2
                if is_lt(l, r) != Ordering::Greater {
                    swap(m, r);
                } else {
                    rot3(r, m, l);
                }
                PivotOutcome::Partition(Branch::A, m)
            }
            Ordering::Equal => PivotOutcome::Partition(Branch::B, m), // 3-5-5
        },
        Ordering::Greater => match is_lt(m, r) {
            Ordering::Greater => {
                // 7-5-3
                if *chklim != 0 && nel >= *chklim {
                    *chklim = 0;
                    if scan_descending_and_reverse(l, r, is_lt, swap) {
                        log::debug!("quicksort: reverse-sorted short-circuit, nel={nel}");
                        return PivotOutcome::Done;
                    }
                    swap(l, r);
                } else {
                    swap(l, r);
                }
                PivotOutcome::Partition(Branch::A, m)
            }
            Ordering::Less => {
                // 7-5-8 / 7-5-6
                if is_lt(l, r) != Ordering::Greater {
                    swap(l, m);
                    PivotOutcome::Partition(Branch::B, m)
                } else {
                    rot3(l, m, r);
                    PivotOutcome::Partition(Branch::A, m)
                }
            }
            Ordering::Equal => {
                // 7-5-5
                swap(l, r);
                PivotOutcome::Partition(Branch::A, m)
            }
        },
        Ordering::Equal => match is_lt(m, r) {
            Ordering::Less => PivotOutcome::Partition(Branch::A, m), // 5-5-7
            Ordering::Greater => {
                swap(l, r);
                PivotOutcome::Partition(Branch::B, m) // 5-5-3
            }
            Ordering::Equal => {
                // 5-5-5: everything seen so far equals the pivot; scan the
                // interior for the first element that differs.
                for p in (l + 1)..r {
                    if p == m {
                        continue;
                    }
                    match is_lt(p, m) {
                        Ordering::Greater => {
                            swap(l, r);
                            return PivotOutcome::Partition(Branch::A, m);
                        }
                        Ordering::Less => {
                            swap(l, p);
                            return PivotOutcome::Partition(Branch::B, m);
                        }
                        Ordering::Equal => {}
                    }
                }
                PivotOutcome::Done
            }
        },
    }
}

fn scan_ascending(l: usize, r: usize, is_lt: &impl Fn(usize, usize) -> Ordering) -> bool {
    for p in l..r {
        if is_lt(p, p + 1) == Ordering::Greater {
            return false;
        }
    }
    true
}

fn scan_descending_and_reverse(
    l: usize,
    r: usize,
    is_lt: &impl Fn(usize, usize) -> Ordering,
    swap: &impl Fn(usize, usize),
) -> bool {
    for p in l..r {
        if is_lt(p, p + 1) != Ordering::Greater {
            return false;
        }
    }
    let (mut a, mut b) = (l, r);
    while a < b {
        swap(a, b);
        a += 1;
        b -= 1;
    }
    true
}

fn med3(a: usize, b: usize, c: usize, is_lt: &impl Fn(usize, usize) -> Ordering) -> usize {
    if is_lt(a, b) == Ordering::Less {
        if is_lt(b, c) == Ordering::Less {
            b
        } else if is_lt(a, c) == Ordering::Less {
            c
        } else {
            a
        }
    } else if is_lt(b, c) == Ordering::Greater {
        b
    } else if is_lt(a, c) == Ordering::Less {
        a
    } else {
        c
    }
}

/// Three-way partition, scanning from both ends inward (the "A" split:
/// `l` leads the scan from the left, `r` trails from the right).
fn partition_a(
    l0: usize,
    r0: usize,
    mut m: usize,
    is_lt: &impl Fn(usize, usize) -> Ordering,
    swap: &impl Fn(usize, usize),
) -> (usize, usize, bool, bool) {
    let mut l = l0;
    let mut r = r0;
    let mut eq_l = true;
    let mut eq_r = true;
    loop {
        loop {
            l += 1;
            if l == r {
                l -= 1;
                if l != m {
                    swap(m, l);
                }
                l -= 1;
                return (l, r, eq_l, eq_r);
            }
            if l == m {
                continue;
            }
            match is_lt(l, m) {
                Ordering::Greater => {
                    eq_r = false;
                    break;
                }
                Ordering::Less => eq_l = false,
                Ordering::Equal => {}
            }
        }
        loop {
            r -= 1;
            if l == r {
                l -= 1;
                if l != m {
                    swap(m, l);
                }
                l -= 1;
                return (l, r, eq_l, eq_r);
            }
            if r == m {
                m = l;
                break;
            }
            match is_lt(r, m) {
                Ordering::Less => {
                    eq_l = false;
                    break;
                }
                Ordering::Equal => break,
                Ordering::Greater => {}
            }
        }
        swap(l, r);
    }
}

/// Mirror image of [`partition_a`]: `r` leads the scan from the right.
fn partition_b(
    l0: usize,
    r0: usize,
    mut m: usize,
    is_lt: &impl Fn(usize, usize) -> Ordering,
    swap: &impl Fn(usize, usize),
) -> (usize, usize, bool, bool) {
    let mut l = l0;
    let mut r = r0;
    let mut eq_l = true;
    let mut eq_r = true;
    loop {
        loop {
            r -= 1;
            if l == r {
                r += 1;
                if r != m {
                    swap(r, m);
                }
                r += 1;
                return (l, r, eq_l, eq_r);
            }
            if r == m {
                continue;
            }
            match is_lt(r, m) {
                Ordering::Less => {
                    eq_l = false;
                    break;
                }
                Ordering::Greater => eq_r = false,
                Ordering::Equal => {}
            }
        }
        loop {
            l += 1;
            if l == r {
                r += 1;
                if r != m {
                    swap(r, m);
                }
                r += 1;
                return (l, r, eq_l, eq_r);
            }
            if l == m {
                m = r;
                break;
            }
            match is_lt(l, m) {
                Ordering::Greater => {
                    eq_r = false;
                    break;
                }
                Ordering::Equal => break,
                Ordering::Less => {}
            }
        }
        swap(l, r);
    }
}
