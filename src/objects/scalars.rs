//! Scalar values - None, NotImplemented, bool, int, float

use super::types::native_type;
use super::{new_bool, new_float, new_int, new_str, ClassRef, FuncArgs, NativeType, ObjRef, Object};
use crate::errors::{Exception, RtResult};
use crate::numeric::ops::numeric_methods;
use crate::protocol;

#[derive(Debug)]
pub struct NoneObject;

#[derive(Debug)]
pub struct NotImplementedObject;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bool(pub bool);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Int(pub i64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Float(pub f64);

impl Object for NoneObject {
    fn class(&self) -> ClassRef {
        none_type()
    }
}

impl Object for NotImplementedObject {
    fn class(&self) -> ClassRef {
        not_implemented_type()
    }
}

impl Object for Bool {
    fn class(&self) -> ClassRef {
        bool_type()
    }
}

impl Object for Int {
    fn class(&self) -> ClassRef {
        int_type()
    }
}

impl Object for Float {
    fn class(&self) -> ClassRef {
        float_type()
    }
}

native_type!(pub fn none_type() = NativeType::new("NoneType")
    .method("__bool__", none_bool)
    .method("__repr__", none_repr)
    .build());

native_type!(pub fn not_implemented_type() = NativeType::new("NotImplementedType")
    .method("__repr__", not_implemented_repr)
    .build());

native_type!(pub fn int_type() = numeric_methods(NativeType::new("int"), true)
    .constructor(int_new)
    .build());

native_type!(pub fn bool_type() = numeric_methods(NativeType::new("bool").base(int_type()), true)
    .method("__repr__", bool_repr)
    .constructor(bool_new)
    .build());

native_type!(pub fn float_type() = numeric_methods(NativeType::new("float"), false)
    .constructor(float_new)
    .build());

fn none_bool(_args: FuncArgs) -> RtResult<ObjRef> {
    Ok(new_bool(false))
}

fn none_repr(_args: FuncArgs) -> RtResult<ObjRef> {
    Ok(new_str("None"))
}

fn not_implemented_repr(_args: FuncArgs) -> RtResult<ObjRef> {
    Ok(new_str("NotImplemented"))
}

fn bool_repr(args: FuncArgs) -> RtResult<ObjRef> {
    let Bool(value) = args.receiver::<Bool>("__repr__")?;
    Ok(new_str(if *value { "True" } else { "False" }))
}

fn bool_new(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_kwargs_empty("bool")?;
    args.check_arity("bool", 0, 1)?;
    match args.args.first() {
        Some(value) => Ok(new_bool(protocol::is_truthy(value)?)),
        None => Ok(new_bool(false)),
    }
}

/// `int(x=0)`: ints, bools, truncated floats, `__index__`, decimal strings
fn int_new(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_kwargs_empty("int")?;
    args.check_arity("int", 0, 1)?;
    let Some(value) = args.args.first() else {
        return Ok(new_int(0));
    };

    if let Some(f) = super::as_float(value) {
        if !f.is_finite() {
            return Err(Exception::overflow(
                "cannot convert float infinity or NaN to integer",
            ));
        }
        let truncated = f.trunc();
        if truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
            return Err(Exception::integer_overflow());
        }
        return Ok(new_int(truncated as i64));
    }

    if let Some(s) = super::as_str(value) {
        return s.trim().replace('_', "").parse::<i64>().map(new_int).map_err(|_| {
            Exception::value_error(format!(
                "invalid literal for int() with base 10: {}",
                protocol::repr(value).unwrap_or_else(|_| s.to_string())
            ))
        });
    }

    protocol::index(value).map(new_int).map_err(|err| {
        if err.is(crate::errors::ExceptionKind::TypeError) {
            Exception::type_error(format!(
                "int() argument must be a string, a bytes-like object or a real number, not '{}'",
                value.type_name()
            ))
        } else {
            err
        }
    })
}

/// `float(x=0.0)`
fn float_new(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_kwargs_empty("float")?;
    args.check_arity("float", 0, 1)?;
    let Some(value) = args.args.first() else {
        return Ok(new_float(0.0));
    };

    if let Some(f) = super::as_float(value) {
        return Ok(new_float(f));
    }
    if let Some(i) = super::as_int(value) {
        return Ok(new_float(i as f64));
    }
    if let Some(s) = super::as_str(value) {
        let text = s.trim();
        let parsed = match text.to_ascii_lowercase().as_str() {
            "inf" | "+inf" | "infinity" => Ok(f64::INFINITY),
            "-inf" | "-infinity" => Ok(f64::NEG_INFINITY),
            "nan" | "+nan" | "-nan" => Ok(f64::NAN),
            _ => text.parse::<f64>(),
        };
        return parsed.map(new_float).map_err(|_| {
            Exception::value_error(format!("could not convert string to float: '{}'", s))
        });
    }
    Err(Exception::type_error(format!(
        "float() argument must be a string or a real number, not '{}'",
        value.type_name()
    )))
}
