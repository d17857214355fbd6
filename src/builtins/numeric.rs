//! Numeric builtins: `abs`, `bin`/`oct`/`hex` (and `_api` twins), `divmod`, `pow`

use crate::errors::{Exception, RtResult};
use crate::numeric::{convert_to_base, convert_to_base_native, power, Base};
use crate::objects::{
    as_float, as_int, is_not_implemented, new_float, new_int, new_str, new_tuple, FuncArgs,
    ObjRef,
};
use crate::protocol;

/// Integers and floats directly, else the `__abs__` capability
pub fn abs(obj: &ObjRef) -> RtResult<ObjRef> {
    if let Some(i) = as_int(obj) {
        return i.checked_abs().map(new_int).ok_or_else(Exception::integer_overflow);
    }
    if let Some(f) = as_float(obj) {
        return Ok(new_float(f.abs()));
    }
    protocol::call_special(obj, "__abs__", &[])?.ok_or_else(|| {
        Exception::type_error(format!("bad operand type for abs(): '{}'", obj.type_name()))
    })
}

/// Prefixed digits of anything with an `__index__` capability
pub fn to_base(obj: &ObjRef, base: Base) -> RtResult<String> {
    protocol::index(obj).map(|n| convert_to_base(n, base))
}

/// Same result through the standard formatter
pub fn to_base_api(obj: &ObjRef, base: Base) -> RtResult<String> {
    protocol::index(obj).map(|n| convert_to_base_native(n, base))
}

/// One side's floor-division and modulo; `None` if either is missing
fn divmod_pair(
    receiver: &ObjRef,
    other: &ObjRef,
    div: &str,
    rem: &str,
) -> RtResult<Option<(ObjRef, ObjRef)>> {
    let quotient = match protocol::call_special(receiver, div, &[other.clone()])? {
        Some(q) if !is_not_implemented(&q) => q,
        _ => return Ok(None),
    };
    let remainder = match protocol::call_special(receiver, rem, &[other.clone()])? {
        Some(r) if !is_not_implemented(&r) => r,
        _ => return Ok(None),
    };
    Ok(Some((quotient, remainder)))
}

/// `(a // b, a % b)`, falling back to `b`'s reflected operators
pub fn divmod(a: &ObjRef, b: &ObjRef) -> RtResult<ObjRef> {
    let pair = match divmod_pair(a, b, "__floordiv__", "__mod__")? {
        Some(pair) => Some(pair),
        None => divmod_pair(b, a, "__rfloordiv__", "__rmod__")?,
    };
    match pair {
        Some((quotient, remainder)) => Ok(new_tuple(vec![quotient, remainder])),
        None => Err(Exception::type_error(format!(
            "unsupported operand type(s) for divmod(): '{}' and '{}'",
            a.type_name(),
            b.type_name()
        ))),
    }
}

pub fn pow(base: &ObjRef, exp: &ObjRef, modulus: Option<&ObjRef>) -> RtResult<ObjRef> {
    power(base, exp, modulus)
}

pub(super) fn builtin_abs(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_kwargs_empty("abs")?;
    args.check_arity("abs", 1, 1)?;
    abs(&args.args[0])
}

fn base_builtin(args: FuncArgs, name: &str, base: Base, native: bool) -> RtResult<ObjRef> {
    args.check_kwargs_empty(name)?;
    args.check_arity(name, 1, 1)?;
    let text = if native {
        to_base_api(&args.args[0], base)?
    } else {
        to_base(&args.args[0], base)?
    };
    Ok(new_str(text))
}

pub(super) fn builtin_bin(args: FuncArgs) -> RtResult<ObjRef> {
    base_builtin(args, "bin", Base::Binary, false)
}

pub(super) fn builtin_oct(args: FuncArgs) -> RtResult<ObjRef> {
    base_builtin(args, "oct", Base::Octal, false)
}

pub(super) fn builtin_hex(args: FuncArgs) -> RtResult<ObjRef> {
    base_builtin(args, "hex", Base::Hex, false)
}

pub(super) fn builtin_bin_api(args: FuncArgs) -> RtResult<ObjRef> {
    base_builtin(args, "bin_api", Base::Binary, true)
}

pub(super) fn builtin_oct_api(args: FuncArgs) -> RtResult<ObjRef> {
    base_builtin(args, "oct_api", Base::Octal, true)
}

pub(super) fn builtin_hex_api(args: FuncArgs) -> RtResult<ObjRef> {
    base_builtin(args, "hex_api", Base::Hex, true)
}

pub(super) fn builtin_divmod(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_kwargs_empty("divmod")?;
    args.check_arity("divmod", 2, 2)?;
    divmod(&args.args[0], &args.args[1])
}

/// `pow(base, exp, mod=None)`; `mod` may also be passed by name
pub(super) fn builtin_pow(mut args: FuncArgs) -> RtResult<ObjRef> {
    let keyword_mod = args.take_keyword("mod");
    args.check_kwargs_empty("pow")?;
    args.check_arity("pow", 2, 3)?;
    let modulus = args.optional(2).or(keyword_mod);
    pow(&args.args[0], &args.args[1], modulus.as_ref())
}
