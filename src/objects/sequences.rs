//! Ordered sequences - tuple, list and their iterator

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::types::native_type;
use super::{
    new_bool, new_int, new_list, new_str, new_tuple, none, not_implemented, ClassRef, FuncArgs,
    NativeType, ObjRef, Object,
};
use crate::errors::{Exception, RtResult};
use crate::iterators::{iter_self, next_impl, IteratorState};
use crate::protocol::{self, CompareOp};

#[derive(Debug)]
pub struct Tuple {
    items: Vec<ObjRef>,
}

impl Tuple {
    pub fn new(items: Vec<ObjRef>) -> Self {
        Self { items }
    }

    #[inline]
    pub fn items(&self) -> &[ObjRef] {
        &self.items
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Object for Tuple {
    fn class(&self) -> ClassRef {
        tuple_type()
    }
}

#[derive(Debug)]
pub struct List {
    items: RefCell<Vec<ObjRef>>,
}

impl List {
    pub fn new(items: Vec<ObjRef>) -> Self {
        Self {
            items: RefCell::new(items),
        }
    }

    /// Copy of the current contents
    pub fn snapshot(&self) -> Vec<ObjRef> {
        self.items.borrow().clone()
    }

    /// Replace the contents wholesale
    pub fn replace(&self, items: Vec<ObjRef>) {
        *self.items.borrow_mut() = items;
    }

    pub fn push(&self, item: ObjRef) {
        self.items.borrow_mut().push(item);
    }

    pub fn get(&self, index: usize) -> Option<ObjRef> {
        self.items.borrow().get(index).cloned()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl Object for List {
    fn class(&self) -> ClassRef {
        list_type()
    }
}

/// Iterator over a snapshot of a container's items
#[derive(Debug)]
pub struct SequenceIter {
    items: Vec<ObjRef>,
    pos: Cell<usize>,
}

impl SequenceIter {
    pub fn new(items: Vec<ObjRef>) -> Self {
        Self {
            items,
            pos: Cell::new(0),
        }
    }
}

impl Object for SequenceIter {
    fn class(&self) -> ClassRef {
        sequence_iter_type()
    }
}

impl IteratorState for SequenceIter {
    fn step(&self) -> RtResult<Option<ObjRef>> {
        let pos = self.pos.get();
        let item = self.items.get(pos).cloned();
        if item.is_some() {
            self.pos.set(pos + 1);
        }
        Ok(item)
    }
}

native_type!(pub fn sequence_iter_type() = NativeType::new("sequence_iterator")
    .method("__iter__", iter_self)
    .method("__next__", next_impl::<SequenceIter>)
    .build());

native_type!(pub fn tuple_type() = NativeType::new("tuple")
    .method("__len__", tuple_len)
    .method("__getitem__", tuple_getitem)
    .method("__iter__", tuple_iter)
    .method("__add__", tuple_add)
    .method("__hash__", tuple_hash)
    .method("__repr__", tuple_repr)
    .method("__eq__", |args| tuple_compare(args, CompareOp::Eq))
    .method("__ne__", |args| tuple_compare(args, CompareOp::Ne))
    .method("__lt__", |args| tuple_compare(args, CompareOp::Lt))
    .method("__le__", |args| tuple_compare(args, CompareOp::Le))
    .method("__gt__", |args| tuple_compare(args, CompareOp::Gt))
    .method("__ge__", |args| tuple_compare(args, CompareOp::Ge))
    .constructor(tuple_new)
    .build());

native_type!(pub fn list_type() = NativeType::new("list")
    .method("__len__", list_len)
    .method("__getitem__", list_getitem)
    .method("__setitem__", list_setitem)
    .method("__iter__", list_iter)
    .method("__add__", list_add)
    .method("__repr__", list_repr)
    .method("__eq__", |args| list_compare(args, CompareOp::Eq))
    .method("__ne__", |args| list_compare(args, CompareOp::Ne))
    .method("__lt__", |args| list_compare(args, CompareOp::Lt))
    .method("__le__", |args| list_compare(args, CompareOp::Le))
    .method("__gt__", |args| list_compare(args, CompareOp::Gt))
    .method("__ge__", |args| list_compare(args, CompareOp::Ge))
    .method("append", list_append)
    .method("sort", list_sort)
    .unhashable()
    .constructor(list_new)
    .build());

/// Resolve a possibly negative index against `len`
pub(crate) fn normalize_index(index: i64, len: usize, what: &str) -> RtResult<usize> {
    let len = len as i64;
    let resolved = if index < 0 { index + len } else { index };
    if resolved < 0 || resolved >= len {
        return Err(Exception::index_error(format!("{} index out of range", what)));
    }
    Ok(resolved as usize)
}

fn index_arg(obj: &ObjRef, what: &str) -> RtResult<i64> {
    protocol::index(obj).map_err(|_| {
        Exception::type_error(format!(
            "{} indices must be integers, not '{}'",
            what,
            obj.type_name()
        ))
    })
}

/// Lexicographic comparison of two item slices
pub(crate) fn compare_sequences(a: &[ObjRef], b: &[ObjRef], op: CompareOp) -> RtResult<bool> {
    for (x, y) in a.iter().zip(b.iter()) {
        if !protocol::equals(x, y)? {
            return match op {
                CompareOp::Eq => Ok(false),
                CompareOp::Ne => Ok(true),
                _ => protocol::rich_compare(x, y, op),
            };
        }
    }
    Ok(op.holds(a.len().cmp(&b.len())))
}

/// Comma-joined reprs of `items`
pub(crate) fn join_reprs(items: &[ObjRef]) -> RtResult<String> {
    let parts = items
        .iter()
        .map(protocol::repr)
        .collect::<RtResult<Vec<_>>>()?;
    Ok(parts.join(", "))
}

fn tuple_len(args: FuncArgs) -> RtResult<ObjRef> {
    let t = args.receiver::<Tuple>("__len__")?;
    Ok(new_int(t.len() as i64))
}

fn tuple_getitem(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_arity("__getitem__", 2, 2)?;
    let t = args.receiver::<Tuple>("__getitem__")?;
    let index = index_arg(&args.args[1], "tuple")?;
    let pos = normalize_index(index, t.len(), "tuple")?;
    Ok(t.items[pos].clone())
}

fn tuple_iter(args: FuncArgs) -> RtResult<ObjRef> {
    let t = args.receiver::<Tuple>("__iter__")?;
    Ok(Rc::new(SequenceIter::new(t.items.clone())))
}

fn tuple_add(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_arity("__add__", 2, 2)?;
    let t = args.receiver::<Tuple>("__add__")?;
    match args.args[1].downcast_ref::<Tuple>() {
        Some(other) => {
            let mut items = t.items.clone();
            items.extend(other.items.iter().cloned());
            Ok(new_tuple(items))
        }
        None => Ok(not_implemented()),
    }
}

fn tuple_hash(args: FuncArgs) -> RtResult<ObjRef> {
    let t = args.receiver::<Tuple>("__hash__")?;
    let mut acc: u64 = 0x345678;
    let mut mult: u64 = 1_000_003;
    for item in &t.items {
        let h = crate::builtins::hash_of(item)? as u64;
        acc = (acc ^ h).wrapping_mul(mult);
        mult = mult.wrapping_add(82_520 + 2 * t.items.len() as u64);
    }
    let hash = acc.wrapping_add(97_531) as i64;
    Ok(new_int(if hash == -1 { -2 } else { hash }))
}

fn tuple_repr(args: FuncArgs) -> RtResult<ObjRef> {
    let t = args.receiver::<Tuple>("__repr__")?;
    let inner = join_reprs(&t.items)?;
    if t.items.len() == 1 {
        Ok(new_str(format!("({},)", inner)))
    } else {
        Ok(new_str(format!("({})", inner)))
    }
}

fn tuple_compare(args: FuncArgs, op: CompareOp) -> RtResult<ObjRef> {
    args.check_arity(op.dunder(), 2, 2)?;
    let t = args.receiver::<Tuple>(op.dunder())?;
    match args.args[1].downcast_ref::<Tuple>() {
        Some(other) => Ok(new_bool(compare_sequences(&t.items, &other.items, op)?)),
        None => Ok(not_implemented()),
    }
}

fn tuple_new(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_kwargs_empty("tuple")?;
    args.check_arity("tuple", 0, 1)?;
    match args.args.first() {
        Some(iterable) => Ok(new_tuple(protocol::collect(iterable)?)),
        None => Ok(new_tuple(Vec::new())),
    }
}

fn list_len(args: FuncArgs) -> RtResult<ObjRef> {
    let l = args.receiver::<List>("__len__")?;
    Ok(new_int(l.len() as i64))
}

fn list_getitem(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_arity("__getitem__", 2, 2)?;
    let l = args.receiver::<List>("__getitem__")?;
    let index = index_arg(&args.args[1], "list")?;
    let pos = normalize_index(index, l.len(), "list")?;
    l.get(pos)
        .ok_or_else(|| Exception::index_error("list index out of range"))
}

fn list_setitem(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_arity("__setitem__", 3, 3)?;
    let l = args.receiver::<List>("__setitem__")?;
    let index = index_arg(&args.args[1], "list")?;
    let pos = normalize_index(index, l.len(), "list assignment")?;
    l.items.borrow_mut()[pos] = args.args[2].clone();
    Ok(none())
}

fn list_iter(args: FuncArgs) -> RtResult<ObjRef> {
    let l = args.receiver::<List>("__iter__")?;
    Ok(Rc::new(SequenceIter::new(l.snapshot())))
}

fn list_add(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_arity("__add__", 2, 2)?;
    let l = args.receiver::<List>("__add__")?;
    match args.args[1].downcast_ref::<List>() {
        Some(other) => {
            let mut items = l.snapshot();
            items.extend(other.snapshot());
            Ok(new_list(items))
        }
        None => Ok(not_implemented()),
    }
}

fn list_repr(args: FuncArgs) -> RtResult<ObjRef> {
    let l = args.receiver::<List>("__repr__")?;
    Ok(new_str(format!("[{}]", join_reprs(&l.snapshot())?)))
}

fn list_compare(args: FuncArgs, op: CompareOp) -> RtResult<ObjRef> {
    args.check_arity(op.dunder(), 2, 2)?;
    let l = args.receiver::<List>(op.dunder())?;
    match args.args[1].downcast_ref::<List>() {
        Some(other) => Ok(new_bool(compare_sequences(
            &l.snapshot(),
            &other.snapshot(),
            op,
        )?)),
        None => Ok(not_implemented()),
    }
}

fn list_append(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_arity("append", 2, 2)?;
    let l = args.receiver::<List>("append")?;
    l.push(args.args[1].clone());
    Ok(none())
}

/// `list.sort(*, key=None, reverse=False)`
fn list_sort(mut args: FuncArgs) -> RtResult<ObjRef> {
    let key = args.take_keyword("key");
    let reverse = args.take_keyword("reverse");
    args.check_kwargs_empty("sort")?;
    args.check_arity("sort", 1, 1)?;
    let l = args.receiver::<List>("sort")?;
    let sorted = crate::builtins::sort_items(l.snapshot(), key, reverse)?;
    l.replace(sorted);
    Ok(none())
}

fn list_new(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_kwargs_empty("list")?;
    args.check_arity("list", 0, 1)?;
    match args.args.first() {
        Some(iterable) => Ok(new_list(protocol::collect(iterable)?)),
        None => Ok(new_list(Vec::new())),
    }
}
