//! Galloping search: given a sorted run and a key, find the key's insertion
//! point by exponentially widening probes from an anchor index, then
//! bisecting the bracket that was found. Ported from `rb_timsort_galloping`
//! in `util.c`.
//!
//! `is_right` selects which side of a run of values equal to the key the
//! result should land on: `true` finds the rightmost insertion point
//! (used when searching for where an element from the *other* run should
//! be inserted among an equal-valued stretch of *this* run, which is what
//! keeps the merge stable), `false` finds the leftmost.

use std::cmp::Ordering;

use crate::comparator::RawCompare;

/// Returns the index in `[0, len]` where `key` should be inserted into the
/// `len`-element run starting at `base`, searching outward from `anchor`.
pub(crate) unsafe fn gallop(
    cmp: &dyn RawCompare,
    elem_size: usize,
    base: *const u8,
    len: usize,
    key: *const u8,
    anchor: usize,
    is_right: bool,
) -> usize {
    unsafe {
        let at = |i: usize| base.add(i * elem_size);

        let mut cp = cmp.compare(key, at(anchor));
        let mut o: isize;
        let o_sign: isize;
        let max_o: isize;

        if cp == Ordering::Less || (!is_right && cp == Ordering::Equal) {
            if anchor == 0 {
                return 0;
            }
            o = -1;
            o_sign = -1;
            max_o = -(anchor as isize);
        } else {
            if anchor == len - 1 {
                return len;
            }
            o = 1;
            o_sign = 1;
            max_o = (len - anchor - 1) as isize;
        }

        let mut last_o: isize = 0;
        loop {
            if max_o / o <= 1 {
                o = max_o;
                if o < 0 {
                    cp = cmp.compare(key, base);
                    if (is_right && cp == Ordering::Less) || (!is_right && cp != Ordering::Greater) {
                        return 0;
                    }
                } else {
                    cp = cmp.compare(at(len - 1), key);
                    if (is_right && cp != Ordering::Greater) || (!is_right && cp == Ordering::Less) {
                        return len;
                    }
                }
                break;
            }
            let c = (anchor as isize + o) as usize;
            cp = cmp.compare(key, at(c));
            if o > 0 {
                if (is_right && cp == Ordering::Less) || (!is_right && cp != Ordering::Greater) {
                    break;
                }
            } else if (is_right && cp != Ordering::Less) || (!is_right && cp == Ordering::Greater) {
                break;
            }
            last_o = o;
            o = (o << 1) + o_sign;
        }

        let (mut l, mut r) = if o < 0 {
            (anchor as isize + o, anchor as isize + last_o)
        } else {
            (anchor as isize + last_o, anchor as isize + o)
        };

        while r - l > 1 {
            let c = l + ((r - l) >> 1);
            cp = cmp.compare(key, at(c as usize));
            if (is_right && cp == Ordering::Less) || (!is_right && cp != Ordering::Greater) {
                r = c;
            } else {
                l = c;
            }
        }
        r as usize
    }
}
