//! Simplified Timsort - fixed-size runs, pairwise merges of doubling width

use std::sync::atomic::{AtomicUsize, Ordering};

use super::insertion::insertion_sort_range;
use super::merge::merge;
use super::Comparator;
use crate::errors::RtResult;
use crate::logging::log_sort_phase;

/// Default run threshold
pub const MIN_MERGE: usize = 64;

static MIN_MERGE_SETTING: AtomicUsize = AtomicUsize::new(MIN_MERGE);

/// Override the run threshold (values below 2 are clamped)
pub fn set_min_merge(threshold: usize) {
    MIN_MERGE_SETTING.store(threshold.max(2), Ordering::Relaxed);
}

pub fn min_merge() -> usize {
    MIN_MERGE_SETTING.load(Ordering::Relaxed)
}

/// Run length for `n` elements under the configured threshold
pub fn min_run_length(n: usize) -> usize {
    min_run_length_with(n, min_merge())
}

/// Shift `n` right until it drops below `threshold`, OR-ing in any bit shifted out
pub fn min_run_length_with(mut n: usize, threshold: usize) -> usize {
    let mut r = 0;
    while n >= threshold {
        r |= n & 1;
        n >>= 1;
    }
    (n + r).max(1)
}

pub fn timsort<T: Clone, C: Comparator<T>>(items: &mut [T], cmp: &mut C) -> RtResult<()> {
    let n = items.len();
    if n < 2 {
        return Ok(());
    }

    let run = min_run_length(n);
    log_sort_phase("timsort", "runs", n);
    let mut start = 0;
    while start < n {
        let end = (start + run - 1).min(n - 1);
        insertion_sort_range(items, start, end, cmp)?;
        start += run;
    }

    let mut size = run;
    while size < n {
        log_sort_phase("timsort", "merge", size);
        let mut left = 0;
        while left < n {
            let mid = (left + size).min(n);
            let right = (left + 2 * size).min(n);
            if mid < right {
                let merged = merge(&items[left..mid], &items[mid..right], cmp)?;
                items[left..right].clone_from_slice(&merged);
            }
            left += 2 * size;
        }
        size *= 2;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::NaturalOrder;
    use super::*;

    #[test]
    fn test_min_run_length() {
        assert_eq!(min_run_length_with(0, 64), 1);
        assert_eq!(min_run_length_with(10, 64), 10);
        assert_eq!(min_run_length_with(63, 64), 63);
        assert_eq!(min_run_length_with(64, 64), 32);
        assert_eq!(min_run_length_with(65, 64), 33);
        assert_eq!(min_run_length_with(1000, 64), 63);
        for n in 64..5000 {
            let run = min_run_length_with(n, 64);
            assert!((32..=64).contains(&run), "n={} run={}", n, run);
        }
    }

    #[test]
    fn test_timsort_many_runs() {
        let mut data: Vec<i64> = (0..1000).map(|i| (i * 7919) % 1009).collect();
        let mut expected = data.clone();
        expected.sort();
        timsort(&mut data, &mut NaturalOrder).unwrap();
        assert_eq!(data, expected);
    }
}
