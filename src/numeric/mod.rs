//! Numeric engine - base conversion, coercion and arithmetic
//!
//! Design: Values enter through `coerce_numeric`, which recognizes only the
//! two canonical representations (`int`, with `bool` as a subtype, and
//! `float`). Everything downstream works on the plain `Numeric` enum and
//! converts back to objects at the edge.

mod arith;
mod base;
pub(crate) mod ops;

pub use arith::{
    floor_div_float, floor_div_int, float_divmod, mod_float, mod_int, mod_pow, power,
    power_numeric,
};
pub use base::{convert_to_base, convert_to_base_native, Base};

use crate::objects::{as_float, as_int, new_float, new_int, ObjRef};

/// A coerced numeric operand
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    Int(i64),
    Float(f64),
}

impl Numeric {
    #[inline]
    pub fn is_int(self) -> bool {
        matches!(self, Self::Int(_))
    }

    #[inline]
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Int(i) => i as f64,
            Self::Float(f) => f,
        }
    }

    pub fn into_obj(self) -> ObjRef {
        match self {
            Self::Int(i) => new_int(i),
            Self::Float(f) => new_float(f),
        }
    }
}

/// Recognize an int (or bool) or a float; anything else is `None`
pub fn coerce_numeric(obj: &ObjRef) -> Option<Numeric> {
    if let Some(i) = as_int(obj) {
        return Some(Numeric::Int(i));
    }
    as_float(obj).map(Numeric::Float)
}
