//! Text values

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use super::sequences::{normalize_index, SequenceIter};
use super::types::native_type;
use super::{new_bool, new_int, new_str, not_implemented, ClassRef, FuncArgs, NativeType, ObjRef, Object};
use crate::errors::{Exception, RtResult};
use crate::protocol::{self, CompareOp};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Str {
    value: String,
}

impl Str {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Length in characters
    pub fn char_len(&self) -> usize {
        self.value.chars().count()
    }

    /// Quoted form with escapes, preferring single quotes
    pub fn repr(&self) -> String {
        let quote = if self.value.contains('\'') && !self.value.contains('"') {
            '"'
        } else {
            '\''
        };
        let mut out = String::with_capacity(self.value.len() + 2);
        out.push(quote);
        for c in self.value.chars() {
            match c {
                '\\' => out.push_str("\\\\"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                c if c == quote => {
                    out.push('\\');
                    out.push(c);
                }
                c => out.push(c),
            }
        }
        out.push(quote);
        out
    }
}

impl Object for Str {
    fn class(&self) -> ClassRef {
        str_type()
    }
}

native_type!(pub fn str_type() = NativeType::new("str")
    .method("__len__", str_len)
    .method("__getitem__", str_getitem)
    .method("__iter__", str_iter)
    .method("__add__", str_add)
    .method("__hash__", str_hash)
    .method("__repr__", str_repr)
    .method("__str__", str_str)
    .method("__eq__", |args| str_compare(args, CompareOp::Eq))
    .method("__ne__", |args| str_compare(args, CompareOp::Ne))
    .method("__lt__", |args| str_compare(args, CompareOp::Lt))
    .method("__le__", |args| str_compare(args, CompareOp::Le))
    .method("__gt__", |args| str_compare(args, CompareOp::Gt))
    .method("__ge__", |args| str_compare(args, CompareOp::Ge))
    .method("join", str_join)
    .constructor(str_new)
    .build());

fn str_len(args: FuncArgs) -> RtResult<ObjRef> {
    let s = args.receiver::<Str>("__len__")?;
    Ok(new_int(s.char_len() as i64))
}

fn str_getitem(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_arity("__getitem__", 2, 2)?;
    let s = args.receiver::<Str>("__getitem__")?;
    let index = protocol::index(&args.args[1]).map_err(|_| {
        Exception::type_error(format!(
            "string indices must be integers, not '{}'",
            args.args[1].type_name()
        ))
    })?;
    let pos = normalize_index(index, s.char_len(), "string")?;
    s.value
        .chars()
        .nth(pos)
        .map(|c| new_str(c.to_string()))
        .ok_or_else(|| Exception::index_error("string index out of range"))
}

fn str_iter(args: FuncArgs) -> RtResult<ObjRef> {
    let s = args.receiver::<Str>("__iter__")?;
    let chars = s.value.chars().map(|c| new_str(c.to_string())).collect();
    Ok(Rc::new(SequenceIter::new(chars)))
}

fn str_add(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_arity("__add__", 2, 2)?;
    let s = args.receiver::<Str>("__add__")?;
    match super::as_str(&args.args[1]) {
        Some(other) => Ok(new_str(format!("{}{}", s.value, other))),
        None => Ok(not_implemented()),
    }
}

fn str_hash(args: FuncArgs) -> RtResult<ObjRef> {
    let s = args.receiver::<Str>("__hash__")?;
    let mut hasher = DefaultHasher::new();
    s.value.hash(&mut hasher);
    let hash = hasher.finish() as i64;
    Ok(new_int(if hash == -1 { -2 } else { hash }))
}

fn str_repr(args: FuncArgs) -> RtResult<ObjRef> {
    let s = args.receiver::<Str>("__repr__")?;
    Ok(new_str(s.repr()))
}

fn str_str(args: FuncArgs) -> RtResult<ObjRef> {
    args.receiver::<Str>("__str__")?;
    Ok(args.args[0].clone())
}

fn str_compare(args: FuncArgs, op: CompareOp) -> RtResult<ObjRef> {
    args.check_arity(op.dunder(), 2, 2)?;
    let s = args.receiver::<Str>(op.dunder())?;
    match super::as_str(&args.args[1]) {
        Some(other) => Ok(new_bool(op.holds(s.value.as_str().cmp(other)))),
        None => Ok(not_implemented()),
    }
}

/// `sep.join(iterable)`
fn str_join(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_arity("join", 2, 2)?;
    let sep = args.receiver::<Str>("join")?;
    let mut parts = Vec::new();
    for (i, item) in protocol::iterate(&args.args[1])?.enumerate() {
        let item = item?;
        let text = super::as_str(&item).ok_or_else(|| {
            Exception::type_error(format!(
                "sequence item {}: expected str instance, {} found",
                i,
                item.type_name()
            ))
        })?;
        parts.push(text.to_string());
    }
    Ok(new_str(parts.join(&sep.value)))
}

fn str_new(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_kwargs_empty("str")?;
    args.check_arity("str", 0, 1)?;
    match args.args.first() {
        Some(value) => Ok(new_str(protocol::to_str(value)?)),
        None => Ok(new_str("")),
    }
}
