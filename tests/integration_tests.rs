use rawsort::prelude::*;
use std::cmp::Ordering;

#[test]
fn seed_1_quicksort_small_integers() {
    let mut data = vec![5, 2, 8, 1, 9, 3, 7, 4, 6];
    sort_unstable(&mut data);
    assert_eq!(data, vec![1, 2, 3, 4, 5, 6, 7, 8, 9]);
}

#[test]
fn seed_2_timsort_all_equal_preserves_order() {
    #[derive(Clone, Debug, PartialEq)]
    struct Tagged {
        key: &'static str,
        origin: usize,
    }

    let mut data = vec![
        Tagged { key: "a", origin: 0 },
        Tagged { key: "a", origin: 1 },
        Tagged { key: "a", origin: 2 },
        Tagged { key: "a", origin: 3 },
    ];
    sort_by(&mut data, |a, b| a.key.cmp(b.key));
    let origins: Vec<usize> = data.iter().map(|t| t.origin).collect();
    assert_eq!(origins, vec![0, 1, 2, 3]);
}

#[test]
fn seed_3_timsort_alternating_bits_stable() {
    let mut data: Vec<(u8, usize)> = (0..1000).map(|i| (i % 2, i)).collect();
    sort_by(&mut data, |a, b| a.0.cmp(&b.0));

    let values: Vec<u8> = data.iter().map(|(v, _)| *v).collect();
    assert_eq!(&values[..500], &vec![0u8; 500][..]);
    assert_eq!(&values[500..], &vec![1u8; 500][..]);

    let zero_origins: Vec<usize> = data[..500].iter().map(|(_, o)| *o).collect();
    assert!(zero_origins.windows(2).all(|w| w[0] < w[1]));
    let one_origins: Vec<usize> = data[500..].iter().map(|(_, o)| *o).collect();
    assert!(one_origins.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn seed_4_quicksort_descending_short_circuit_bounds_comparisons() {
    use std::cell::Cell;

    let n = 10_000;
    let mut data: Vec<i64> = (0..n).rev().collect();
    let calls = Cell::new(0usize);
    sort_unstable_by(&mut data, |a, b| {
        calls.set(calls.get() + 1);
        a.cmp(b)
    });
    assert_eq!(data, (0..n).collect::<Vec<i64>>());
    // The reverse-sorted short-circuit should keep this well under the
    // O(N log N) a naive quicksort would spend on a reversed input.
    assert!(
        calls.get() < (n as usize) * 4,
        "expected near-linear comparator count, got {}",
        calls.get()
    );
}

#[test]
fn seed_5_timsort_two_ascending_runs_gallops() {
    use std::cell::Cell;

    let mut data: Vec<i64> = (0..1000).chain(0..1000).collect();
    let calls = Cell::new(0usize);
    sort_by(&mut data, |a, b| {
        calls.set(calls.get() + 1);
        a.cmp(b)
    });
    assert!(data.windows(2).all(|w| w[0] <= w[1]));
    assert!(
        calls.get() < 4000,
        "expected galloping to keep comparator count low, got {}",
        calls.get()
    );
}

#[test]
fn seed_6_timsort_awkward_element_size() {
    #[derive(Clone, Copy, Debug, PartialEq)]
    #[repr(C)]
    struct Awkward {
        key: u32,
        padding: [u8; 33],
    }

    let mut rng_state: u64 = 0xC0FFEE;
    let mut next = move || {
        rng_state ^= rng_state << 13;
        rng_state ^= rng_state >> 7;
        rng_state ^= rng_state << 17;
        rng_state
    };

    let mut data: Vec<Awkward> = (0..100)
        .map(|_| Awkward {
            key: (next() % 1000) as u32,
            padding: [0u8; 33],
        })
        .collect();
    assert_eq!(std::mem::size_of::<Awkward>(), 37);

    sort_by(&mut data, |a, b| a.key.cmp(&b.key));
    assert!(data.windows(2).all(|w| w[0].key <= w[1].key));
}

#[test]
fn sort_unstable_by_on_strings() {
    let mut data = vec!["banana", "apple", "cherry", "date"];
    sort_unstable_by(&mut data, |a: &&str, b: &&str| a.cmp(b));
    assert_eq!(data, vec!["apple", "banana", "cherry", "date"]);
}

#[test]
fn sort_by_with_reverse_comparator() {
    let mut data = vec![1, 5, 3, 2, 4];
    sort_by(&mut data, |a: &i32, b: &i32| b.cmp(a));
    assert_eq!(data, vec![5, 4, 3, 2, 1]);
}

#[test]
fn empty_and_singleton_are_no_ops() {
    let mut empty: Vec<i32> = vec![];
    sort(&mut empty);
    assert!(empty.is_empty());

    let mut one = vec![42];
    sort(&mut one);
    assert_eq!(one, vec![42]);
}

#[test]
fn two_element_fast_path() {
    let mut data = vec![2, 1];
    sort_unstable(&mut data);
    assert_eq!(data, vec![1, 2]);

    let mut data = vec![1, 2];
    sort_unstable(&mut data);
    assert_eq!(data, vec![1, 2]);
}

#[test]
fn idempotence() {
    let mut data: Vec<i32> = vec![9, 1, 8, 2, 7, 3, 6, 4, 5, 0];
    sort(&mut data);
    let once = data.clone();
    sort(&mut data);
    assert_eq!(data, once);
}

#[test]
fn element_size_invariance() {
    for size in [1usize, 3, 4, 7, 8, 16, 24, 64, 1024] {
        let mut rows: Vec<Vec<u8>> = (0..200)
            .map(|i| {
                let mut row = vec![0u8; size];
                row[0] = (i % 256) as u8;
                if size > 1 {
                    row[size - 1] = ((200 - i) % 256) as u8;
                }
                row
            })
            .collect();
        let mut expected = rows.clone();
        expected.sort();
        sort_by(&mut rows, |a: &Vec<u8>, b: &Vec<u8>| a.cmp(b));
        assert_eq!(rows, expected, "mismatch at element size {size}");
    }
}

#[test]
fn alignment_invariance() {
    // Deliberately misalign the base pointer handed to the raw engine by
    // 1, 2, and 3 bytes and check the logical result matches the aligned
    // case, exercising the BYTE movement path the aligned run never takes.
    use rawsort::comparator::RawCompare;
    use rawsort::config::Tuning;
    use rawsort::raw::quicksort_raw;
    use std::cmp::Ordering as Ord2;

    struct U64Compare;
    unsafe impl RawCompare for U64Compare {
        unsafe fn compare(&self, a: *const u8, b: *const u8) -> Ord2 {
            unsafe {
                let av = (a as *const u64).read_unaligned();
                let bv = (b as *const u64).read_unaligned();
                av.cmp(&bv)
            }
        }
    }

    const N: usize = 64;
    const ELEM: usize = 8;

    let values: Vec<u64> = (0..N as u64).rev().collect();
    let mut expected = values.clone();
    expected.sort();

    for offset in 0..4 {
        let mut buf = vec![0u8; offset + N * ELEM];
        for (i, v) in values.iter().enumerate() {
            buf[offset + i * ELEM..offset + (i + 1) * ELEM].copy_from_slice(&v.to_ne_bytes());
        }
        unsafe {
            quicksort_raw(
                buf.as_mut_ptr().add(offset),
                N,
                ELEM,
                &U64Compare,
                &Tuning::default(),
            );
        }
        let sorted: Vec<u64> = (0..N)
            .map(|i| {
                u64::from_ne_bytes(
                    buf[offset + i * ELEM..offset + (i + 1) * ELEM]
                        .try_into()
                        .unwrap(),
                )
            })
            .collect();
        assert_eq!(sorted, expected, "mismatch at offset {offset}");
    }
}

#[test]
fn ordering_and_permutation_hold_across_random_inputs() {
    use rand::Rng;

    let mut rng = rand::rng();
    for _ in 0..200 {
        let len = rng.random_range(0..200);
        let mut data: Vec<i32> = (0..len).map(|_| rng.random_range(-50..50)).collect();
        let original = data.clone();
        sort(&mut data);

        assert_eq!(data.windows(2).all(|w| w[0] <= w[1]), true);

        let mut sorted_original = original.clone();
        sorted_original.sort();
        assert_eq!(data, sorted_original);
    }
}

#[test]
fn quicksort_matches_std_sort_unstable_logically() {
    use rand::Rng;

    let mut rng = rand::rng();
    for _ in 0..200 {
        let len = rng.random_range(0..500);
        let mut data: Vec<i32> = (0..len).map(|_| rng.random_range(-1000..1000)).collect();
        let mut expected = data.clone();
        sort_unstable(&mut data);
        expected.sort_unstable();
        assert_eq!(data, expected);
    }
}

#[test]
fn comparator_returning_equal_never_panics_on_degenerate_input() {
    let mut data = vec![0i32; 500];
    sort_by(&mut data, |_: &i32, _: &i32| Ordering::Equal);
    assert_eq!(data, vec![0i32; 500]);
}
