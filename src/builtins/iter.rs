//! `iter(obj[, sentinel])` and `next(iterator[, default])`

use std::rc::Rc;

use crate::errors::{Exception, RtResult};
use crate::iterators::SeqIter;
use crate::objects::{FuncArgs, ObjRef};
use crate::protocol;

/// An iterator over `obj`, or a callable iterator polled until `sentinel`
pub fn iter(obj: &ObjRef, sentinel: Option<ObjRef>) -> RtResult<ObjRef> {
    match sentinel {
        None => protocol::get_iter(obj),
        Some(sentinel) => Ok(Rc::new(SeqIter::callable(obj.clone(), sentinel)?)),
    }
}

/// Advance; on exhaustion return `default` or raise StopIteration
pub fn next(iterator: &ObjRef, default: Option<ObjRef>) -> RtResult<ObjRef> {
    match protocol::next(iterator)? {
        Some(value) => Ok(value),
        None => default.ok_or_else(Exception::stop_iteration),
    }
}

pub(super) fn builtin_iter(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_kwargs_empty("iter")?;
    args.check_arity("iter", 1, 2)?;
    iter(&args.args[0], args.optional(1))
}

pub(super) fn builtin_next(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_kwargs_empty("next")?;
    args.check_arity("next", 1, 2)?;
    next(&args.args[0], args.optional(1))
}
