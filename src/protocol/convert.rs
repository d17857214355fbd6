//! Truthiness, index coercion and text conversion

use crate::errors::{Exception, RtResult};
use crate::objects::{
    as_int, as_str, Bool, Dict, Float, Int, List, NoneObject, ObjRef, Str, Tuple,
};

use super::attr::{call_special, lookup_special};

/// Truth value: `__bool__`, then `__len__`, else true
pub fn is_truthy(obj: &ObjRef) -> RtResult<bool> {
    if let Some(Bool(b)) = obj.downcast_ref::<Bool>() {
        return Ok(*b);
    }
    if obj.is::<NoneObject>() {
        return Ok(false);
    }
    if let Some(Int(i)) = obj.downcast_ref::<Int>() {
        return Ok(*i != 0);
    }
    if let Some(Float(f)) = obj.downcast_ref::<Float>() {
        return Ok(*f != 0.0);
    }
    if let Some(s) = obj.downcast_ref::<Str>() {
        return Ok(!s.as_str().is_empty());
    }
    if let Some(t) = obj.downcast_ref::<Tuple>() {
        return Ok(!t.is_empty());
    }
    if let Some(l) = obj.downcast_ref::<List>() {
        return Ok(!l.is_empty());
    }
    if let Some(d) = obj.downcast_ref::<Dict>() {
        return Ok(!d.is_empty());
    }

    if let Some(result) = call_special(obj, "__bool__", &[])? {
        return match result.downcast_ref::<Bool>() {
            Some(Bool(b)) => Ok(*b),
            None => Err(Exception::type_error(format!(
                "__bool__ should return bool, returned {}",
                result.type_name()
            ))),
        };
    }
    if lookup_special(obj, "__len__").is_some() {
        return Ok(crate::builtins::len_of(obj)? > 0);
    }
    Ok(true)
}

/// Coerce to a machine integer through `__index__`
pub fn index(obj: &ObjRef) -> RtResult<i64> {
    if let Some(value) = as_int(obj) {
        return Ok(value);
    }
    match call_special(obj, "__index__", &[])? {
        Some(result) => as_int(&result).ok_or_else(|| {
            Exception::type_error(format!(
                "__index__ returned non-int (type {})",
                result.type_name()
            ))
        }),
        None => Err(Exception::not_an_integer(&obj.type_name())),
    }
}

/// `repr(obj)`
pub fn repr(obj: &ObjRef) -> RtResult<String> {
    match call_special(obj, "__repr__", &[])? {
        Some(result) => as_str(&result).map(str::to_string).ok_or_else(|| {
            Exception::type_error(format!(
                "__repr__ returned non-string (type {})",
                result.type_name()
            ))
        }),
        None => Ok(format!("<{} object>", obj.type_name())),
    }
}

/// `str(obj)`
pub fn to_str(obj: &ObjRef) -> RtResult<String> {
    if let Some(s) = as_str(obj) {
        return Ok(s.to_string());
    }
    match call_special(obj, "__str__", &[])? {
        Some(result) => as_str(&result).map(str::to_string).ok_or_else(|| {
            Exception::type_error(format!(
                "__str__ returned non-string (type {})",
                result.type_name()
            ))
        }),
        None => repr(obj),
    }
}

#[inline]
pub fn type_name(obj: &ObjRef) -> String {
    obj.type_name()
}
