//! Range support - arithmetic progressions and their iterators
//!
//! Design: `Range` is a plain Rust iterator over `i64` (exact size, double
//! ended). `RangeObject` is the immutable `range` sequence exposed to the
//! runtime; each `iter()` hands out a fresh `RangeIter` wrapping a `Range`.

use std::cell::Cell;
use std::rc::Rc;

use super::{iter_self, next_impl, IteratorState};
use crate::errors::{Exception, RtResult};
use crate::logging::log_iterator_created;
use crate::objects::{
    native_type, new_int, new_str, normalize_index, ClassRef, FuncArgs, NativeType, ObjRef, Object,
};
use crate::protocol;

/// Remaining values `current, current + step, ...` short of `end`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    current: i64,
    end: i64,
    step: i64,
}

impl Range {
    /// Create new range; `step` must be non-zero
    #[inline]
    pub const fn new(start: i64, end: i64, step: i64) -> Self {
        Self {
            current: start,
            end,
            step,
        }
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        (self.step > 0 && self.current >= self.end) || (self.step < 0 && self.current <= self.end)
    }

    /// Remaining element count
    #[inline]
    pub const fn len(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        let span = self.end as i128 - self.current as i128;
        let step = self.step as i128;
        let count = if step > 0 {
            (span + step - 1) / step
        } else {
            (span + step + 1) / step
        };
        count as usize
    }

    /// Value at `index` without advancing
    pub fn get(&self, index: usize) -> Option<i64> {
        if index >= self.len() {
            return None;
        }
        Some((self.current as i128 + index as i128 * self.step as i128) as i64)
    }
}

impl Iterator for Range {
    type Item = i64;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.is_empty() {
            return None;
        }

        let val = self.current;
        self.current = self.current.checked_add(self.step).unwrap_or(self.end);
        Some(val)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = Range::len(self);
        (len, Some(len))
    }
}

impl ExactSizeIterator for Range {
    #[inline]
    fn len(&self) -> usize {
        Range::len(self)
    }
}

impl DoubleEndedIterator for Range {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        let len = Range::len(self);
        if len == 0 {
            return None;
        }

        let last = self.get(len - 1)?;
        self.end = last;
        Some(last)
    }
}

/// Safe Rust API - create range
#[inline]
pub const fn range(start: i64, end: i64, step: i64) -> Range {
    Range::new(start, end, step)
}

/// The `range` sequence object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeObject {
    start: i64,
    stop: i64,
    step: i64,
}

impl RangeObject {
    pub fn new(start: i64, stop: i64, step: i64) -> RtResult<Self> {
        if step == 0 {
            return Err(Exception::value_error("range() arg 3 must not be zero"));
        }
        Ok(Self { start, stop, step })
    }

    #[inline]
    pub fn values(&self) -> Range {
        range(self.start, self.stop, self.step)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values().is_empty()
    }
}

impl Object for RangeObject {
    fn class(&self) -> ClassRef {
        range_type()
    }
}

/// Iterator over a `range`, forwards or backwards
#[derive(Debug)]
pub struct RangeIter {
    values: Cell<Range>,
    reversed: bool,
}

impl RangeIter {
    pub fn new(values: Range, reversed: bool) -> Self {
        log_iterator_created("range_iterator");
        Self {
            values: Cell::new(values),
            reversed,
        }
    }
}

impl Object for RangeIter {
    fn class(&self) -> ClassRef {
        range_iterator_type()
    }
}

impl IteratorState for RangeIter {
    fn step(&self) -> RtResult<Option<ObjRef>> {
        let mut values = self.values.get();
        let next = if self.reversed {
            values.next_back()
        } else {
            values.next()
        };
        self.values.set(values);
        Ok(next.map(new_int))
    }
}

native_type!(pub fn range_type() = NativeType::new("range")
    .method("__len__", range_len)
    .method("__getitem__", range_getitem)
    .method("__iter__", range_iter)
    .method("__reversed__", range_reversed)
    .method("__repr__", range_repr)
    .constructor(range_new)
    .build());

native_type!(pub fn range_iterator_type() = NativeType::new("range_iterator")
    .method("__iter__", iter_self)
    .method("__next__", next_impl::<RangeIter>)
    .build());

/// `range(stop)` or `range(start, stop[, step])`
fn range_new(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_kwargs_empty("range")?;
    args.check_arity("range", 1, 3)?;
    let bounds = args
        .args
        .iter()
        .map(protocol::index)
        .collect::<RtResult<Vec<_>>>()?;
    let obj = match bounds.as_slice() {
        [stop] => RangeObject::new(0, *stop, 1)?,
        [start, stop] => RangeObject::new(*start, *stop, 1)?,
        [start, stop, step] => RangeObject::new(*start, *stop, *step)?,
        _ => return Err(Exception::type_error("range expected at most 3 arguments")),
    };
    Ok(Rc::new(obj))
}

fn range_len(args: FuncArgs) -> RtResult<ObjRef> {
    let r = args.receiver::<RangeObject>("__len__")?;
    let len = i64::try_from(r.len()).map_err(|_| {
        Exception::overflow("Python int too large to convert to C ssize_t")
    })?;
    Ok(new_int(len))
}

fn range_getitem(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_arity("__getitem__", 2, 2)?;
    let r = args.receiver::<RangeObject>("__getitem__")?;
    let index = protocol::index(&args.args[1])?;
    let pos = normalize_index(index, r.len(), "range object")?;
    r.values()
        .get(pos)
        .map(new_int)
        .ok_or_else(|| Exception::index_error("range object index out of range"))
}

fn range_iter(args: FuncArgs) -> RtResult<ObjRef> {
    let r = args.receiver::<RangeObject>("__iter__")?;
    Ok(Rc::new(RangeIter::new(r.values(), false)))
}

fn range_reversed(args: FuncArgs) -> RtResult<ObjRef> {
    let r = args.receiver::<RangeObject>("__reversed__")?;
    Ok(Rc::new(RangeIter::new(r.values(), true)))
}

fn range_repr(args: FuncArgs) -> RtResult<ObjRef> {
    let r = args.receiver::<RangeObject>("__repr__")?;
    let text = if r.step == 1 {
        format!("range({}, {})", r.start, r.stop)
    } else {
        format!("range({}, {}, {})", r.start, r.stop, r.step)
    };
    Ok(new_str(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_basic() {
        let mut r = range(0, 5, 1);
        assert_eq!(r.next(), Some(0));
        assert_eq!(r.next(), Some(1));
        assert_eq!(r.next(), Some(2));
        assert_eq!(r.next(), Some(3));
        assert_eq!(r.next(), Some(4));
        assert_eq!(r.next(), None);
    }

    #[test]
    fn test_range_step() {
        let r = range(0, 10, 3);
        assert_eq!(r.collect::<Vec<_>>(), vec![0, 3, 6, 9]);
    }

    #[test]
    fn test_range_negative_step() {
        let r = range(10, 0, -3);
        assert_eq!(r.len(), 4);
        assert_eq!(r.collect::<Vec<_>>(), vec![10, 7, 4, 1]);
    }

    #[test]
    fn test_range_len_rounds_up() {
        assert_eq!(range(0, 10, 1).len(), 10);
        assert_eq!(range(0, 10, 3).len(), 4);
        assert_eq!(range(10, 0, -1).len(), 10);
        assert_eq!(range(0, 0, 1).len(), 0);
        assert_eq!(range(i64::MIN, i64::MAX, i64::MAX).len(), 3);
    }

    #[test]
    fn test_range_double_ended() {
        let mut r = range(0, 10, 3);
        assert_eq!(r.next(), Some(0));
        assert_eq!(r.next_back(), Some(9));
        assert_eq!(r.next(), Some(3));
        assert_eq!(r.next_back(), Some(6));
        assert_eq!(r.next(), None);
        assert_eq!(r.next_back(), None);
    }

    #[test]
    fn test_range_no_overflow_at_end() {
        let r = range(i64::MAX - 2, i64::MAX, 1);
        assert_eq!(r.collect::<Vec<_>>(), vec![i64::MAX - 2, i64::MAX - 1]);
    }
}
