//! Sorting - insertion sort, merge sort and a simplified Timsort
//!
//! Design: The kernels are generic over the element type and a fallible
//! `Comparator`, so the same code sorts runtime values through rich
//! comparison and plain Rust values in property tests and benchmarks.
//! Runtime sequences are sorted on a snapshot that is written back only
//! when the whole sort succeeds.

mod insertion;
mod merge;
mod timsort;

pub use insertion::{insertion_sort, insertion_sort_range};
pub use merge::{merge, merge_sort};
pub use timsort::{min_merge, min_run_length, min_run_length_with, set_min_merge, timsort, MIN_MERGE};

use crate::errors::{Exception, RtResult};
use crate::logging::perf;
use crate::objects::{new_list, List, ObjRef};
use crate::protocol::{self, CompareOp};

/// Fallible ordering used by the kernels
pub trait Comparator<T> {
    /// `a > b`
    fn gt(&mut self, a: &T, b: &T) -> RtResult<bool>;

    /// `a <= b`
    fn le(&mut self, a: &T, b: &T) -> RtResult<bool>;
}

/// Orders runtime values with `__gt__`/`__le__`
#[derive(Debug, Default, Clone, Copy)]
pub struct RichComparator;

impl Comparator<ObjRef> for RichComparator {
    fn gt(&mut self, a: &ObjRef, b: &ObjRef) -> RtResult<bool> {
        protocol::rich_compare(a, b, CompareOp::Gt)
    }

    fn le(&mut self, a: &ObjRef, b: &ObjRef) -> RtResult<bool> {
        protocol::rich_compare(a, b, CompareOp::Le)
    }
}

/// Orders `(key, value)` pairs by their precomputed key
#[derive(Debug, Default, Clone, Copy)]
pub struct KeyedComparator;

impl Comparator<(ObjRef, ObjRef)> for KeyedComparator {
    fn gt(&mut self, a: &(ObjRef, ObjRef), b: &(ObjRef, ObjRef)) -> RtResult<bool> {
        protocol::rich_compare(&a.0, &b.0, CompareOp::Gt)
    }

    fn le(&mut self, a: &(ObjRef, ObjRef), b: &(ObjRef, ObjRef)) -> RtResult<bool> {
        protocol::rich_compare(&a.0, &b.0, CompareOp::Le)
    }
}

/// `PartialOrd` ordering for plain Rust values
#[derive(Debug, Default, Clone, Copy)]
pub struct NaturalOrder;

impl<T: PartialOrd> Comparator<T> for NaturalOrder {
    fn gt(&mut self, a: &T, b: &T) -> RtResult<bool> {
        Ok(a > b)
    }

    fn le(&mut self, a: &T, b: &T) -> RtResult<bool> {
        Ok(a <= b)
    }
}

/// Orders by a projected key
pub struct ByKey<F>(pub F);

impl<T, K: PartialOrd, F: FnMut(&T) -> K> Comparator<T> for ByKey<F> {
    fn gt(&mut self, a: &T, b: &T) -> RtResult<bool> {
        Ok((self.0)(a) > (self.0)(b))
    }

    fn le(&mut self, a: &T, b: &T) -> RtResult<bool> {
        Ok((self.0)(a) <= (self.0)(b))
    }
}

/// The list an in-place sort may write back to
fn target_list<'a>(seq: &'a ObjRef, algorithm: &str) -> RtResult<&'a List> {
    if let Some(list) = seq.downcast_ref::<List>() {
        return Ok(list);
    }
    protocol::get_iter(seq)?;
    Err(Exception::type_error(format!(
        "'{}' object does not support item assignment ({}() sorts lists in place)",
        seq.type_name(),
        algorithm
    )))
}

fn bound(value: Option<i64>, len: usize, which: &str) -> RtResult<Option<usize>> {
    match value {
        None => Ok(None),
        Some(v) if v < 0 || v as u64 >= len as u64 => Err(Exception::index_error(format!(
            "insertion_sort() {} bound {} out of range for length {}",
            which, v, len
        ))),
        Some(v) => Ok(Some(v as usize)),
    }
}

/// Insertion-sort a list in place, optionally only `[left, right]`
pub fn insertion_sort_list(seq: &ObjRef, left: Option<i64>, right: Option<i64>) -> RtResult<()> {
    let list = target_list(seq, "insertion_sort")?;
    let mut items = list.snapshot();
    let len = items.len();

    let explicit = left.is_some() || right.is_some();
    let left = bound(left, len, "left")?.unwrap_or(0);
    let right = bound(right, len, "right")?.unwrap_or_else(|| len.saturating_sub(1));
    if explicit && left >= right {
        return Err(Exception::index_error(format!(
            "insertion_sort() left bound {} must be below right bound {}",
            left, right
        )));
    }

    crate::logging::log_sort_phase("insertion_sort", "start", len);
    insertion_sort_range(&mut items, left, right, &mut RichComparator)?;
    list.replace(items);
    Ok(())
}

/// Timsort a list in place
pub fn timsort_list(seq: &ObjRef) -> RtResult<()> {
    let list = target_list(seq, "timsort")?;
    let mut items = list.snapshot();
    let _guard = perf::track("timsort");
    timsort(&mut items, &mut RichComparator)?;
    list.replace(items);
    Ok(())
}

/// Merge-sort any iterable into a new list
pub fn merge_sort_iterable(seq: &ObjRef) -> RtResult<ObjRef> {
    let items = protocol::collect(seq)?;
    let _guard = perf::track("merge_sort");
    Ok(new_list(merge_sort(&items, &mut RichComparator)?))
}
