//! Merge sort

use super::Comparator;
use crate::errors::RtResult;

/// Merge two sorted runs, taking from `left` on ties
pub fn merge<T: Clone, C: Comparator<T>>(left: &[T], right: &[T], cmp: &mut C) -> RtResult<Vec<T>> {
    let mut out = Vec::with_capacity(left.len() + right.len());
    let (mut i, mut j) = (0, 0);

    while i < left.len() && j < right.len() {
        if cmp.le(&left[i], &right[j])? {
            out.push(left[i].clone());
            i += 1;
        } else {
            out.push(right[j].clone());
            j += 1;
        }
    }

    out.extend_from_slice(&left[i..]);
    out.extend_from_slice(&right[j..]);
    Ok(out)
}

/// Stable sort returning a new vector
pub fn merge_sort<T: Clone, C: Comparator<T>>(items: &[T], cmp: &mut C) -> RtResult<Vec<T>> {
    if items.len() <= 1 {
        return Ok(items.to_vec());
    }
    let mid = items.len() / 2;
    let left = merge_sort(&items[..mid], cmp)?;
    let right = merge_sort(&items[mid..], cmp)?;
    merge(&left, &right, cmp)
}
