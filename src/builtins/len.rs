//! Length operations - collection size queries
//!
//! Design: Native collections report their size directly through `HasLen`;
//! everything else goes through the `__len__` capability, whose result must
//! coerce to a non-negative integer.

use crate::errors::{Exception, RtResult};
use crate::iterators::RangeObject;
use crate::objects::{as_int, new_int, Dict, FuncArgs, List, ObjRef, Str, Tuple};
use crate::protocol;

/// Trait for types with computable length
pub trait HasLen {
    fn len(&self) -> usize;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl HasLen for Str {
    #[inline]
    fn len(&self) -> usize {
        self.char_len()
    }
}

impl HasLen for Tuple {
    #[inline]
    fn len(&self) -> usize {
        Tuple::len(self)
    }
}

impl HasLen for List {
    #[inline]
    fn len(&self) -> usize {
        List::len(self)
    }
}

impl HasLen for Dict {
    #[inline]
    fn len(&self) -> usize {
        Dict::len(self)
    }
}

impl HasLen for RangeObject {
    #[inline]
    fn len(&self) -> usize {
        RangeObject::len(self)
    }
}

/// Native fast path
fn native_len(obj: &ObjRef) -> Option<&dyn HasLen> {
    if let Some(s) = obj.downcast_ref::<Str>() {
        return Some(s);
    }
    if let Some(t) = obj.downcast_ref::<Tuple>() {
        return Some(t);
    }
    if let Some(l) = obj.downcast_ref::<List>() {
        return Some(l);
    }
    if let Some(d) = obj.downcast_ref::<Dict>() {
        return Some(d);
    }
    obj.downcast_ref::<RangeObject>().map(|r| r as &dyn HasLen)
}

/// `len(obj)` through the length capability
pub fn len_of(obj: &ObjRef) -> RtResult<usize> {
    if let Some(sized) = native_len(obj) {
        return Ok(sized.len());
    }

    let Some(result) = protocol::call_special(obj, "__len__", &[])? else {
        return Err(Exception::type_error(format!(
            "object of type '{}' has no len()",
            obj.type_name()
        )));
    };
    let length = match as_int(&result) {
        Some(length) => length,
        None => protocol::index(&result)?,
    };
    usize::try_from(length).map_err(|_| Exception::value_error("__len__() should return >= 0"))
}

pub(super) fn builtin_len(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_kwargs_empty("len")?;
    args.check_arity("len", 1, 1)?;
    let length = len_of(&args.args[0])?;
    let length = i64::try_from(length).map_err(|_| Exception::integer_overflow())?;
    Ok(new_int(length))
}
