//! Truth and callability: `all`, `any`, `bool`, `callable` and their API twins

use crate::errors::{Exception, RtResult};
use crate::objects::{new_bool, Bool, FuncArgs, ObjRef};
use crate::protocol;

use super::len::len_of;

/// `__bool__`, else `__len__` (truthy iff non-zero), else true
pub fn truthy(obj: &ObjRef) -> RtResult<bool> {
    if let Some(result) = protocol::call_special(obj, "__bool__", &[])? {
        return match result.downcast_ref::<Bool>() {
            Some(Bool(value)) => Ok(*value),
            None => Err(Exception::type_error(format!(
                "__bool__ should return bool, returned {}",
                result.type_name()
            ))),
        };
    }
    if protocol::lookup_special(obj, "__len__").is_some() {
        return Ok(len_of(obj)? > 0);
    }
    Ok(true)
}

/// False on the first falsy item
pub fn all(iterable: &ObjRef) -> RtResult<bool> {
    for item in protocol::iterate(iterable)? {
        if !protocol::is_truthy(&item?)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// True on the first truthy item
pub fn any(iterable: &ObjRef) -> RtResult<bool> {
    for item in protocol::iterate(iterable)? {
        if protocol::is_truthy(&item?)? {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Whether `obj` exposes a `__call__` attribute
pub fn callable(obj: &ObjRef) -> RtResult<bool> {
    protocol::has_attr(obj, "__call__")
}

fn single_arg(args: &FuncArgs, name: &str) -> RtResult<ObjRef> {
    args.check_kwargs_empty(name)?;
    args.check_arity(name, 1, 1)?;
    Ok(args.args[0].clone())
}

pub(super) fn builtin_all(args: FuncArgs) -> RtResult<ObjRef> {
    all(&single_arg(&args, "all")?).map(new_bool)
}

pub(super) fn builtin_any(args: FuncArgs) -> RtResult<ObjRef> {
    any(&single_arg(&args, "any")?).map(new_bool)
}

/// `bool()` is False
pub(super) fn builtin_bool(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_kwargs_empty("bool")?;
    args.check_arity("bool", 0, 1)?;
    match args.optional(0) {
        Some(obj) => truthy(&obj).map(new_bool),
        None => Ok(new_bool(false)),
    }
}

pub(super) fn builtin_bool_api(args: FuncArgs) -> RtResult<ObjRef> {
    protocol::is_truthy(&single_arg(&args, "bool_api")?).map(new_bool)
}

pub(super) fn builtin_callable(args: FuncArgs) -> RtResult<ObjRef> {
    callable(&single_arg(&args, "callable")?).map(new_bool)
}

pub(super) fn builtin_callable_api(args: FuncArgs) -> RtResult<ObjRef> {
    let obj = single_arg(&args, "callable_api")?;
    Ok(new_bool(protocol::is_callable(&obj)))
}
