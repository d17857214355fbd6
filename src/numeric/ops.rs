//! Numeric dunder methods shared by `int`, `bool` and `float`

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use super::arith::{floor_div_float, floor_div_int, mod_float, mod_int};
use super::{coerce_numeric, power, Numeric};
use crate::errors::{Exception, RtResult};
use crate::objects::{new_bool, new_int, new_str, not_implemented, FuncArgs, NativeType, ObjRef};
use crate::protocol::{BinaryOp, CompareOp};

/// Install the arithmetic and comparison protocol on a numeric type
pub(crate) fn numeric_methods(builder: NativeType, integral: bool) -> NativeType {
    let builder = builder
        .method("__add__", |args| arith(args, BinaryOp::Add, false))
        .method("__radd__", |args| arith(args, BinaryOp::Add, true))
        .method("__sub__", |args| arith(args, BinaryOp::Sub, false))
        .method("__rsub__", |args| arith(args, BinaryOp::Sub, true))
        .method("__mul__", |args| arith(args, BinaryOp::Mul, false))
        .method("__rmul__", |args| arith(args, BinaryOp::Mul, true))
        .method("__floordiv__", |args| arith(args, BinaryOp::FloorDiv, false))
        .method("__rfloordiv__", |args| arith(args, BinaryOp::FloorDiv, true))
        .method("__mod__", |args| arith(args, BinaryOp::Mod, false))
        .method("__rmod__", |args| arith(args, BinaryOp::Mod, true))
        .method("__pow__", num_pow)
        .method("__rpow__", num_rpow)
        .method("__neg__", num_neg)
        .method("__abs__", num_abs)
        .method("__bool__", num_bool)
        .method("__hash__", num_hash)
        .method("__repr__", num_repr)
        .method("__eq__", |args| compare(args, CompareOp::Eq))
        .method("__ne__", |args| compare(args, CompareOp::Ne))
        .method("__lt__", |args| compare(args, CompareOp::Lt))
        .method("__le__", |args| compare(args, CompareOp::Le))
        .method("__gt__", |args| compare(args, CompareOp::Gt))
        .method("__ge__", |args| compare(args, CompareOp::Ge));
    if integral {
        builder.method("__index__", num_index)
    } else {
        builder
    }
}

/// Apply `op` to two coerced operands
pub fn apply(op: BinaryOp, a: Numeric, b: Numeric) -> RtResult<Numeric> {
    if let (Numeric::Int(x), Numeric::Int(y)) = (a, b) {
        let result = match op {
            BinaryOp::Add => x.checked_add(y).ok_or_else(Exception::integer_overflow)?,
            BinaryOp::Sub => x.checked_sub(y).ok_or_else(Exception::integer_overflow)?,
            BinaryOp::Mul => x.checked_mul(y).ok_or_else(Exception::integer_overflow)?,
            BinaryOp::FloorDiv => floor_div_int(x, y)?,
            BinaryOp::Mod => mod_int(x, y)?,
        };
        return Ok(Numeric::Int(result));
    }

    let (x, y) = (a.as_f64(), b.as_f64());
    let result = match op {
        BinaryOp::Add => x + y,
        BinaryOp::Sub => x - y,
        BinaryOp::Mul => x * y,
        BinaryOp::FloorDiv => floor_div_float(x, y)?,
        BinaryOp::Mod => mod_float(x, y)?,
    };
    Ok(Numeric::Float(result))
}

fn operands(args: &FuncArgs, name: &str) -> RtResult<Option<(Numeric, Numeric)>> {
    args.check_arity(name, 2, 2)?;
    Ok(coerce_numeric(&args.args[0]).zip(coerce_numeric(&args.args[1])))
}

fn receiver(args: &FuncArgs, name: &str) -> RtResult<Numeric> {
    args.check_arity(name, 1, 1)?;
    coerce_numeric(&args.args[0]).ok_or_else(|| {
        Exception::type_error(format!(
            "descriptor '{}' requires a number, got '{}'",
            name,
            args.args[0].type_name()
        ))
    })
}

fn arith(args: FuncArgs, op: BinaryOp, reflected: bool) -> RtResult<ObjRef> {
    let name = if reflected { op.reflected() } else { op.dunder() };
    let Some((a, b)) = operands(&args, name)? else {
        return Ok(not_implemented());
    };
    let (a, b) = if reflected { (b, a) } else { (a, b) };
    apply(op, a, b).map(Numeric::into_obj)
}

fn num_pow(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_arity("__pow__", 2, 3)?;
    if coerce_numeric(&args.args[1]).is_none() {
        return Ok(not_implemented());
    }
    power(&args.args[0], &args.args[1], args.args.get(2))
}

fn num_rpow(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_arity("__rpow__", 2, 3)?;
    if coerce_numeric(&args.args[1]).is_none() {
        return Ok(not_implemented());
    }
    power(&args.args[1], &args.args[0], args.args.get(2))
}

fn num_neg(args: FuncArgs) -> RtResult<ObjRef> {
    let value = match receiver(&args, "__neg__")? {
        Numeric::Int(i) => Numeric::Int(i.checked_neg().ok_or_else(Exception::integer_overflow)?),
        Numeric::Float(f) => Numeric::Float(-f),
    };
    Ok(value.into_obj())
}

fn num_abs(args: FuncArgs) -> RtResult<ObjRef> {
    let value = match receiver(&args, "__abs__")? {
        Numeric::Int(i) => Numeric::Int(i.checked_abs().ok_or_else(Exception::integer_overflow)?),
        Numeric::Float(f) => Numeric::Float(f.abs()),
    };
    Ok(value.into_obj())
}

fn num_bool(args: FuncArgs) -> RtResult<ObjRef> {
    let truth = match receiver(&args, "__bool__")? {
        Numeric::Int(i) => i != 0,
        Numeric::Float(f) => f != 0.0,
    };
    Ok(new_bool(truth))
}

fn num_index(args: FuncArgs) -> RtResult<ObjRef> {
    match receiver(&args, "__index__")? {
        Numeric::Int(i) => Ok(new_int(i)),
        Numeric::Float(_) => Err(Exception::not_an_integer("float")),
    }
}

/// Integers hash to themselves; integral floats hash like the equal int
pub fn hash_numeric(value: Numeric) -> i64 {
    let hash = match value {
        Numeric::Int(i) => i,
        Numeric::Float(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
            f as i64
        }
        Numeric::Float(f) => {
            let mut hasher = DefaultHasher::new();
            f.to_bits().hash(&mut hasher);
            hasher.finish() as i64
        }
    };
    if hash == -1 {
        -2
    } else {
        hash
    }
}

fn num_hash(args: FuncArgs) -> RtResult<ObjRef> {
    Ok(new_int(hash_numeric(receiver(&args, "__hash__")?)))
}

/// Shortest round-trip float text with an exponent outside [1e-4, 1e16)
pub fn float_repr(f: f64) -> String {
    if f.is_nan() {
        return "nan".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let magnitude = f.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let text = format!("{:e}", f);
        return match text.split_once('e') {
            Some((mantissa, exp)) => {
                let (sign, digits) = match exp.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exp),
                };
                format!("{}e{}{:0>2}", mantissa, sign, digits)
            }
            None => text.clone(),
        };
    }
    if f.fract() == 0.0 {
        format!("{:.1}", f)
    } else {
        format!("{}", f)
    }
}

fn num_repr(args: FuncArgs) -> RtResult<ObjRef> {
    let text = match receiver(&args, "__repr__")? {
        Numeric::Int(i) => i.to_string(),
        Numeric::Float(f) => float_repr(f),
    };
    Ok(new_str(text))
}

fn compare(args: FuncArgs, op: CompareOp) -> RtResult<ObjRef> {
    let Some((a, b)) = operands(&args, op.dunder())? else {
        return Ok(not_implemented());
    };
    let ordering = match (a, b) {
        (Numeric::Int(x), Numeric::Int(y)) => Some(x.cmp(&y)),
        _ => a.as_f64().partial_cmp(&b.as_f64()),
    };
    Ok(new_bool(match ordering {
        Some(ordering) => op.holds(ordering),
        None => op == CompareOp::Ne,
    }))
}
