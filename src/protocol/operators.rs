//! Rich comparison and binary arithmetic dispatch

use std::cmp::Ordering;
use std::rc::Rc;

use crate::errors::{Exception, RtResult};
use crate::objects::{is_not_implemented, is_same, new_bool, ObjRef};

use super::attr::call_special;
use super::convert::is_truthy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Lt,
    Le,
    Eq,
    Ne,
    Gt,
    Ge,
}

impl CompareOp {
    pub const fn dunder(self) -> &'static str {
        match self {
            Self::Lt => "__lt__",
            Self::Le => "__le__",
            Self::Eq => "__eq__",
            Self::Ne => "__ne__",
            Self::Gt => "__gt__",
            Self::Ge => "__ge__",
        }
    }

    /// Operator to try on the right operand with swapped arguments
    pub const fn reflected(self) -> Self {
        match self {
            Self::Lt => Self::Gt,
            Self::Le => Self::Ge,
            Self::Eq => Self::Eq,
            Self::Ne => Self::Ne,
            Self::Gt => Self::Lt,
            Self::Ge => Self::Le,
        }
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }

    /// Whether `ordering` satisfies this operator
    pub fn holds(self, ordering: Ordering) -> bool {
        match self {
            Self::Lt => ordering == Ordering::Less,
            Self::Le => ordering != Ordering::Greater,
            Self::Eq => ordering == Ordering::Equal,
            Self::Ne => ordering != Ordering::Equal,
            Self::Gt => ordering == Ordering::Greater,
            Self::Ge => ordering != Ordering::Less,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    FloorDiv,
    Mod,
}

impl BinaryOp {
    pub const fn dunder(self) -> &'static str {
        match self {
            Self::Add => "__add__",
            Self::Sub => "__sub__",
            Self::Mul => "__mul__",
            Self::FloorDiv => "__floordiv__",
            Self::Mod => "__mod__",
        }
    }

    pub const fn reflected(self) -> &'static str {
        match self {
            Self::Add => "__radd__",
            Self::Sub => "__rsub__",
            Self::Mul => "__rmul__",
            Self::FloorDiv => "__rfloordiv__",
            Self::Mod => "__rmod__",
        }
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::FloorDiv => "//",
            Self::Mod => "%",
        }
    }
}

/// Call `obj.name(other)`, mapping a missing method or NotImplemented to `None`
fn try_special(obj: &ObjRef, name: &str, other: &ObjRef) -> RtResult<Option<ObjRef>> {
    Ok(call_special(obj, name, &[other.clone()])?.filter(|r| !is_not_implemented(r)))
}

/// Right operand goes first when its type is a strict subclass of the left's
fn right_first(a: &ObjRef, b: &ObjRef) -> bool {
    let (a_cls, b_cls) = (a.class(), b.class());
    !Rc::ptr_eq(&a_cls, &b_cls) && b_cls.is_subclass(&a_cls)
}

/// Rich comparison returning whatever the special method returned
pub fn rich_compare_obj(a: &ObjRef, b: &ObjRef, op: CompareOp) -> RtResult<ObjRef> {
    let reflected_first = right_first(a, b);

    if reflected_first {
        if let Some(result) = try_special(b, op.reflected().dunder(), a)? {
            return Ok(result);
        }
    }
    if let Some(result) = try_special(a, op.dunder(), b)? {
        return Ok(result);
    }
    if !reflected_first {
        if let Some(result) = try_special(b, op.reflected().dunder(), a)? {
            return Ok(result);
        }
    }

    match op {
        CompareOp::Eq => Ok(new_bool(is_same(a, b))),
        CompareOp::Ne => Ok(new_bool(!is_same(a, b))),
        _ => Err(Exception::type_error(format!(
            "'{}' not supported between instances of '{}' and '{}'",
            op.symbol(),
            a.type_name(),
            b.type_name()
        ))),
    }
}

/// Rich comparison collapsed to a truth value
pub fn rich_compare(a: &ObjRef, b: &ObjRef, op: CompareOp) -> RtResult<bool> {
    let result = rich_compare_obj(a, b, op)?;
    is_truthy(&result)
}

/// Equality with the identity shortcut containers use
pub fn equals(a: &ObjRef, b: &ObjRef) -> RtResult<bool> {
    if is_same(a, b) {
        return Ok(true);
    }
    rich_compare(a, b, CompareOp::Eq)
}

/// `a <op> b` through `__op__`/`__rop__`
pub fn binary_op(a: &ObjRef, b: &ObjRef, op: BinaryOp) -> RtResult<ObjRef> {
    let reflected_first = right_first(a, b);

    if reflected_first {
        if let Some(result) = try_special(b, op.reflected(), a)? {
            return Ok(result);
        }
    }
    if let Some(result) = try_special(a, op.dunder(), b)? {
        return Ok(result);
    }
    if !reflected_first {
        if let Some(result) = try_special(b, op.reflected(), a)? {
            return Ok(result);
        }
    }

    Err(Exception::type_error(format!(
        "unsupported operand type(s) for {}: '{}' and '{}'",
        op.symbol(),
        a.type_name(),
        b.type_name()
    )))
}
