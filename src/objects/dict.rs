//! Mappings - insertion-ordered dictionary keyed by hash and equality

use std::cell::RefCell;
use std::rc::Rc;

use super::sequences::SequenceIter;
use super::types::native_type;
use super::{
    new_bool, new_int, new_list, new_str, new_tuple, none, ClassRef, FuncArgs, Namespace,
    NativeType, ObjRef, Object,
};
use crate::builtins::hash_of;
use crate::errors::{Exception, RtResult};
use crate::protocol;

#[derive(Debug, Clone)]
struct Entry {
    hash: i64,
    key: ObjRef,
    value: ObjRef,
}

#[derive(Debug, Default)]
pub struct Dict {
    entries: RefCell<Vec<Entry>>,
}

impl Dict {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dictionary view of an attribute namespace
    pub fn from_namespace(namespace: &Namespace) -> Self {
        let dict = Self::new();
        {
            let mut entries = dict.entries.borrow_mut();
            for (name, value) in namespace {
                let key = new_str(name.clone());
                entries.push(Entry {
                    hash: str_hash(name),
                    key,
                    value: value.clone(),
                });
            }
        }
        dict
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    fn snapshot(&self) -> Vec<Entry> {
        self.entries.borrow().clone()
    }

    /// Position of `key`, comparing hashes first and then equality
    fn find(&self, key: &ObjRef, hash: i64) -> RtResult<Option<usize>> {
        for (i, entry) in self.snapshot().iter().enumerate() {
            if entry.hash == hash && protocol::equals(&entry.key, key)? {
                return Ok(Some(i));
            }
        }
        Ok(None)
    }

    pub fn get_item(&self, key: &ObjRef) -> RtResult<Option<ObjRef>> {
        let hash = hash_of(key)?;
        Ok(self
            .find(key, hash)?
            .and_then(|i| self.entries.borrow().get(i).map(|e| e.value.clone())))
    }

    pub fn set_item(&self, key: ObjRef, value: ObjRef) -> RtResult<()> {
        let hash = hash_of(&key)?;
        match self.find(&key, hash)? {
            Some(i) => {
                if let Some(entry) = self.entries.borrow_mut().get_mut(i) {
                    entry.value = value;
                }
            }
            None => self.entries.borrow_mut().push(Entry { hash, key, value }),
        }
        Ok(())
    }

    pub fn del_item(&self, key: &ObjRef) -> RtResult<bool> {
        let hash = hash_of(key)?;
        match self.find(key, hash)? {
            Some(i) => {
                self.entries.borrow_mut().remove(i);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn set_str(&self, key: &str, value: ObjRef) -> RtResult<()> {
        self.set_item(new_str(key), value)
    }

    pub fn keys(&self) -> Vec<ObjRef> {
        self.entries.borrow().iter().map(|e| e.key.clone()).collect()
    }

    pub fn values(&self) -> Vec<ObjRef> {
        self.entries.borrow().iter().map(|e| e.value.clone()).collect()
    }

    pub fn items(&self) -> Vec<(ObjRef, ObjRef)> {
        self.entries
            .borrow()
            .iter()
            .map(|e| (e.key.clone(), e.value.clone()))
            .collect()
    }
}

impl Object for Dict {
    fn class(&self) -> ClassRef {
        dict_type()
    }
}

fn str_hash(s: &str) -> i64 {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    s.hash(&mut hasher);
    let hash = hasher.finish() as i64;
    if hash == -1 {
        -2
    } else {
        hash
    }
}

native_type!(pub fn dict_type() = NativeType::new("dict")
    .method("__len__", dict_len)
    .method("__getitem__", dict_getitem)
    .method("__setitem__", dict_setitem)
    .method("__delitem__", dict_delitem)
    .method("__contains__", dict_contains)
    .method("__iter__", dict_iter)
    .method("__repr__", dict_repr)
    .method("keys", dict_keys)
    .method("values", dict_values)
    .method("items", dict_items)
    .method("get", dict_get)
    .unhashable()
    .constructor(dict_new)
    .build());

pub(crate) fn key_error(key: &ObjRef) -> Exception {
    Exception::key_error(protocol::repr(key).unwrap_or_else(|_| key.type_name()))
}

fn dict_len(args: FuncArgs) -> RtResult<ObjRef> {
    let d = args.receiver::<Dict>("__len__")?;
    Ok(new_int(d.len() as i64))
}

fn dict_getitem(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_arity("__getitem__", 2, 2)?;
    let d = args.receiver::<Dict>("__getitem__")?;
    d.get_item(&args.args[1])?
        .ok_or_else(|| key_error(&args.args[1]))
}

fn dict_setitem(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_arity("__setitem__", 3, 3)?;
    let d = args.receiver::<Dict>("__setitem__")?;
    d.set_item(args.args[1].clone(), args.args[2].clone())?;
    Ok(none())
}

fn dict_delitem(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_arity("__delitem__", 2, 2)?;
    let d = args.receiver::<Dict>("__delitem__")?;
    if d.del_item(&args.args[1])? {
        Ok(none())
    } else {
        Err(key_error(&args.args[1]))
    }
}

fn dict_contains(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_arity("__contains__", 2, 2)?;
    let d = args.receiver::<Dict>("__contains__")?;
    Ok(new_bool(d.get_item(&args.args[1])?.is_some()))
}

fn dict_iter(args: FuncArgs) -> RtResult<ObjRef> {
    let d = args.receiver::<Dict>("__iter__")?;
    Ok(Rc::new(SequenceIter::new(d.keys())))
}

fn dict_repr(args: FuncArgs) -> RtResult<ObjRef> {
    let d = args.receiver::<Dict>("__repr__")?;
    let parts = d
        .items()
        .iter()
        .map(|(k, v)| Ok(format!("{}: {}", protocol::repr(k)?, protocol::repr(v)?)))
        .collect::<RtResult<Vec<_>>>()?;
    Ok(new_str(format!("{{{}}}", parts.join(", "))))
}

fn dict_keys(args: FuncArgs) -> RtResult<ObjRef> {
    let d = args.receiver::<Dict>("keys")?;
    Ok(new_list(d.keys()))
}

fn dict_values(args: FuncArgs) -> RtResult<ObjRef> {
    let d = args.receiver::<Dict>("values")?;
    Ok(new_list(d.values()))
}

fn dict_items(args: FuncArgs) -> RtResult<ObjRef> {
    let d = args.receiver::<Dict>("items")?;
    Ok(new_list(
        d.items()
            .into_iter()
            .map(|(k, v)| new_tuple(vec![k, v]))
            .collect(),
    ))
}

fn dict_get(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_arity("get", 2, 3)?;
    let d = args.receiver::<Dict>("get")?;
    Ok(d
        .get_item(&args.args[1])?
        .unwrap_or_else(|| args.optional(2).unwrap_or_else(none)))
}

/// `dict(**kwargs)` or `dict(pairs, **kwargs)`
fn dict_new(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_arity("dict", 0, 1)?;
    let dict = Dict::new();
    if let Some(source) = args.args.first() {
        if let Some(other) = source.downcast_ref::<Dict>() {
            for (k, v) in other.items() {
                dict.set_item(k, v)?;
            }
        } else {
            for pair in protocol::iterate(source)? {
                let pair = protocol::collect(&pair?)?;
                if pair.len() != 2 {
                    return Err(Exception::value_error(format!(
                        "dictionary update sequence element has length {}; 2 is required",
                        pair.len()
                    )));
                }
                dict.set_item(pair[0].clone(), pair[1].clone())?;
            }
        }
    }
    for (name, value) in &args.kwargs {
        dict.set_str(name, value.clone())?;
    }
    Ok(Rc::new(dict))
}
