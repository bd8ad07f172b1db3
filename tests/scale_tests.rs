use rand::Rng;
use rawsort::prelude::*;
use std::time::Instant;

#[test]
fn test_sort_1m_unstable() {
    let count = 1_000_000;
    let mut rng = rand::rng();
    let mut data: Vec<u64> = (0..count).map(|_| rng.random()).collect();

    let start = Instant::now();
    sort_unstable(&mut data);
    println!("Sorted {count} u64s (unstable) in {:?}", start.elapsed());

    assert!(data.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_sort_1m_stable_variable_width_rows() {
    let count = 1_000_000;
    let mut rng = rand::rng();
    let mut data: Vec<Vec<u8>> = Vec::with_capacity(count);
    for _ in 0..count {
        let len = rng.random_range(4..16);
        let mut row = vec![0u8; len];
        rng.fill(&mut row[..]);
        data.push(row);
    }
    let mut expected = data.clone();
    expected.sort();

    let start = Instant::now();
    sort_by(&mut data, |a: &Vec<u8>, b: &Vec<u8>| a.cmp(b));
    println!("Sorted {count} byte rows (stable) in {:?}", start.elapsed());

    assert_eq!(data, expected);
}

#[test]
#[ignore]
fn test_sort_1b_raw_u32() {
    // WARNING: requires several GB of RAM; run explicitly with
    // `cargo test --release -- --ignored test_sort_1b_raw_u32`.
    use rawsort::raw::quicksort_raw;
    use rawsort::comparator::RawCompare;
    use rawsort::config::Tuning;
    use std::cmp::Ordering;

    struct U32Compare;
    unsafe impl RawCompare for U32Compare {
        unsafe fn compare(&self, a: *const u8, b: *const u8) -> Ordering {
            unsafe { (*(a as *const u32)).cmp(&*(b as *const u32)) }
        }
    }

    let count: usize = 1_000_000_000;
    let mut rng = rand::rng();
    let mut data: Vec<u32> = Vec::with_capacity(count);
    for _ in 0..count {
        data.push(rng.random());
    }

    let start = Instant::now();
    unsafe {
        quicksort_raw(
            data.as_mut_ptr() as *mut u8,
            count,
            4,
            &U32Compare,
            &Tuning::default(),
        );
    }
    println!("Sorted {count} u32s in {:?}", start.elapsed());

    for i in (0..count - 1).step_by(10_000) {
        assert!(data[i] <= data[i + 1], "sort failed at index {i}");
    }
}
