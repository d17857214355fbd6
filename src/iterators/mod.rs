//! Iterator types - small state machines driven by `__next__`
//!
//! Design: Each iterator is a struct holding its sources and counters in
//! `Cell`/`RefCell`, plus one transition function (`IteratorState::step`)
//! returning the next value or `None` at the end. Validation happens at
//! construction, so a bad callable or non-iterable fails immediately rather
//! than on the first `next`. The end of a sequence is `Ok(None)` internally
//! and only becomes StopIteration at the `__next__` boundary.

mod enumerate;
mod filter;
mod generic;
mod map;
mod range;
mod reversed;
mod zip;

#[cfg(test)]
mod tests;

pub use enumerate::{enumerate_type, Enumerate};
pub use filter::{filter_type, Filter};
pub use generic::{iterator_type, SeqIter};
pub use map::{map_type, Map};
pub use range::{range_iterator_type, range_type, Range, RangeIter, RangeObject};
pub use reversed::{reverse_iter, reversed_type, Reversed};
pub use zip::{zip_type, Zip};

use crate::errors::{Exception, RtResult};
use crate::logging::log_iterator_exhausted;
use crate::objects::{FuncArgs, ObjRef, Object};

/// One transition of an iterator state machine
pub trait IteratorState: Object + Sized {
    /// Next value, or `None` once the sequence has ended
    fn step(&self) -> RtResult<Option<ObjRef>>;
}

/// `__next__` for any `IteratorState`
pub fn next_impl<T: IteratorState>(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_arity("__next__", 1, 1)?;
    let state = args.receiver::<T>("__next__")?;
    match state.step()? {
        Some(value) => Ok(value),
        None => {
            log_iterator_exhausted(state.class().name());
            Err(Exception::stop_iteration())
        }
    }
}

/// `__iter__` returning the iterator itself
pub fn iter_self(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_arity("__iter__", 1, 1)?;
    Ok(args.args[0].clone())
}
