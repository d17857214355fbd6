//! Floor division, modulo and exponentiation with floor semantics

use num_traits::checked_pow;

use super::{coerce_numeric, Numeric};
use crate::errors::{Exception, RtResult};
use crate::objects::{is_none, ObjRef};

pub fn floor_div_int(a: i64, b: i64) -> RtResult<i64> {
    if b == 0 {
        return Err(Exception::zero_division("integer division or modulo by zero"));
    }
    let quotient = a.checked_div(b).ok_or_else(Exception::integer_overflow)?;
    if a.wrapping_rem(b) != 0 && ((a < 0) != (b < 0)) {
        Ok(quotient - 1)
    } else {
        Ok(quotient)
    }
}

/// Remainder taking the sign of the divisor
pub fn mod_int(a: i64, b: i64) -> RtResult<i64> {
    if b == 0 {
        return Err(Exception::zero_division("integer division or modulo by zero"));
    }
    let rem = a.wrapping_rem(b);
    if rem != 0 && ((rem < 0) != (b < 0)) {
        Ok(rem + b)
    } else {
        Ok(rem)
    }
}

/// Floor quotient and remainder of two floats
pub fn float_divmod(a: f64, b: f64, zero_message: &str) -> RtResult<(f64, f64)> {
    if b == 0.0 {
        return Err(Exception::zero_division(zero_message));
    }
    let mut rem = a % b;
    let mut div = (a - rem) / b;
    if rem != 0.0 {
        if (b < 0.0) != (rem < 0.0) {
            rem += b;
            div -= 1.0;
        }
    } else {
        rem = 0.0_f64.copysign(b);
    }

    let floor_div = if div != 0.0 {
        let floored = div.floor();
        if div - floored > 0.5 {
            floored + 1.0
        } else {
            floored
        }
    } else {
        0.0_f64.copysign(a / b)
    };
    Ok((floor_div, rem))
}

pub fn floor_div_float(a: f64, b: f64) -> RtResult<f64> {
    float_divmod(a, b, "float floor division by zero").map(|(q, _)| q)
}

pub fn mod_float(a: f64, b: f64) -> RtResult<f64> {
    float_divmod(a, b, "float modulo").map(|(_, r)| r)
}

/// `(base ** exp) % modulus`, result carrying the modulus's sign
pub fn mod_pow(base: i64, exp: i64, modulus: i64) -> RtResult<i64> {
    if modulus == 0 {
        return Err(Exception::type_error("pow() 3rd argument cannot be 0"));
    }
    let m = i128::from(modulus).abs();
    let (mut b, mut e) = if exp < 0 {
        (mod_inverse(i128::from(base), m)?, -i128::from(exp))
    } else {
        (i128::from(base), i128::from(exp))
    };
    b = b.rem_euclid(m);

    let mut result: i128 = 1 % m;
    while e > 0 {
        if e & 1 == 1 {
            result = result * b % m;
        }
        b = b * b % m;
        e >>= 1;
    }

    if modulus < 0 && result != 0 {
        result -= m;
    }
    Ok(result as i64)
}

/// Inverse of `a` modulo `m` by the extended Euclidean algorithm
fn mod_inverse(a: i128, m: i128) -> RtResult<i128> {
    let (mut old_r, mut r) = (a.rem_euclid(m), m);
    let (mut old_s, mut s) = (1_i128, 0_i128);
    while r != 0 {
        let q = old_r / r;
        (old_r, r) = (r, old_r - q * r);
        (old_s, s) = (s, old_s - q * s);
    }
    if old_r != 1 {
        return Err(Exception::value_error(
            "base is not invertible for the given modulus",
        ));
    }
    Ok(old_s.rem_euclid(m))
}

/// Two-operand power on coerced values
pub fn power_numeric(base: Numeric, exp: Numeric) -> RtResult<Numeric> {
    match (base, exp) {
        (Numeric::Int(b), Numeric::Int(e)) if e >= 0 => {
            let e = usize::try_from(e).map_err(|_| Exception::integer_overflow())?;
            checked_pow(b, e)
                .map(Numeric::Int)
                .ok_or_else(Exception::integer_overflow)
        }
        _ => {
            let (b, e) = (base.as_f64(), exp.as_f64());
            if b == 0.0 && e < 0.0 {
                return Err(Exception::zero_division(
                    "0.0 cannot be raised to a negative power",
                ));
            }
            if b < 0.0 && e.is_finite() && e.fract() != 0.0 {
                return Err(Exception::value_error(
                    "negative number cannot be raised to a fractional power",
                ));
            }
            let result = b.powf(e);
            if result.is_infinite() && b.is_finite() && e.is_finite() {
                return Err(Exception::overflow("numerical result out of range"));
            }
            Ok(Numeric::Float(result))
        }
    }
}

/// `pow(base, exp[, modulus])` over runtime values
pub fn power(base: &ObjRef, exp: &ObjRef, modulus: Option<&ObjRef>) -> RtResult<ObjRef> {
    let modulus = modulus.filter(|m| !is_none(m));
    let coerced = (coerce_numeric(base), coerce_numeric(exp));

    let Some(modulus) = modulus else {
        return match coerced {
            (Some(b), Some(e)) => power_numeric(b, e).map(Numeric::into_obj),
            _ => Err(Exception::type_error(format!(
                "unsupported operand type(s) for ** or pow(): '{}' and '{}'",
                base.type_name(),
                exp.type_name()
            ))),
        };
    };

    match (coerced, coerce_numeric(modulus)) {
        ((Some(Numeric::Int(b)), Some(Numeric::Int(e))), Some(Numeric::Int(m))) => {
            mod_pow(b, e, m).map(Numeric::Int).map(Numeric::into_obj)
        }
        ((Some(_), Some(_)), Some(_)) => Err(Exception::type_error(
            "pow() 3rd argument not allowed unless all arguments are integers",
        )),
        _ => Err(Exception::type_error(format!(
            "unsupported operand type(s) for pow(): '{}', '{}', '{}'",
            base.type_name(),
            exp.type_name(),
            modulus.type_name()
        ))),
    }
}
