//! Attribute builtins: `getattr`, `hasattr`, `setattr`, `dir`, `vars`

use std::collections::BTreeSet;
use std::rc::Rc;

use crate::errors::{Exception, ExceptionKind, RtResult};
use crate::objects::{
    as_class, as_str, new_bool, new_list, new_str, none, Dict, FuncArgs, Namespace, ObjRef,
};
use crate::protocol;
use crate::scope;

fn attr_name<'a>(name: &'a ObjRef, func: &str) -> RtResult<&'a str> {
    as_str(name).ok_or_else(|| {
        Exception::type_error(format!("{}(): attribute name must be string", func))
    })
}

/// `obj.name`, or `default` on any attribute miss
///
/// An AttributeError raised from inside a property getter also yields the
/// default; the two cases are not distinguished.
pub fn getattr(obj: &ObjRef, name: &str, default: Option<ObjRef>) -> RtResult<ObjRef> {
    match protocol::get_attr(obj, name) {
        Err(err) if err.is(ExceptionKind::AttributeError) => default.ok_or(err),
        result => result,
    }
}

pub fn hasattr(obj: &ObjRef, name: &str) -> RtResult<bool> {
    protocol::has_attr(obj, name)
}

pub fn setattr(obj: &ObjRef, name: &str, value: ObjRef) -> RtResult<()> {
    protocol::set_attr(obj, name, value)
}

fn sorted_names(names: BTreeSet<String>) -> ObjRef {
    new_list(names.into_iter().map(new_str).collect())
}

fn caller_names() -> BTreeSet<String> {
    scope::caller_locals()
        .map(|locals| locals.into_keys().collect())
        .unwrap_or_default()
}

/// String keys of an iterable of names
fn collect_names(names: &ObjRef, into: &mut BTreeSet<String>) -> RtResult<()> {
    for name in protocol::iterate(names)? {
        let name = name?;
        match as_str(&name) {
            Some(text) => {
                into.insert(text.to_string());
            }
            None => {
                return Err(Exception::type_error(format!(
                    "dir(): expected str names, got '{}'",
                    name.type_name()
                )))
            }
        }
    }
    Ok(())
}

/// Keys of `obj.__dict__`, when it has one
fn dict_names(obj: &ObjRef, into: &mut BTreeSet<String>) -> RtResult<()> {
    match protocol::get_attr(obj, "__dict__") {
        Ok(dict) => collect_names(&dict, into),
        Err(err) if err.is(ExceptionKind::AttributeError) => Ok(()),
        Err(err) => Err(err),
    }
}

/// Declared `__slots__`: a single name or an iterable of names
fn slot_names(obj: &ObjRef, into: &mut BTreeSet<String>) -> RtResult<()> {
    let slots = match protocol::get_attr(obj, "__slots__") {
        Ok(slots) => slots,
        Err(err) if err.is(ExceptionKind::AttributeError) => return Ok(()),
        Err(err) => return Err(err),
    };
    if let Some(single) = as_str(&slots) {
        into.insert(single.to_string());
        return Ok(());
    }
    collect_names(&slots, into)
}

/// Sorted unique attribute names
///
/// Without an argument: the caller's locals. Otherwise `__dir__` when the
/// type defines it, else the instance namespace plus declared slots.
pub fn dir(obj: Option<&ObjRef>) -> RtResult<ObjRef> {
    let Some(obj) = obj else {
        return Ok(sorted_names(caller_names()));
    };

    let mut names = BTreeSet::new();
    if let Some(listing) = protocol::call_special(obj, "__dir__", &[])? {
        collect_names(&listing, &mut names)?;
    } else {
        dict_names(obj, &mut names)?;
        slot_names(obj, &mut names)?;
    }
    Ok(sorted_names(names))
}

/// Full listing: own namespace plus every class along the resolution order
pub fn dir_api(obj: Option<&ObjRef>) -> RtResult<ObjRef> {
    let Some(obj) = obj else {
        return Ok(sorted_names(caller_names()));
    };

    let mut names = BTreeSet::new();
    if let Some(ns) = obj.namespace() {
        names.extend(ns.borrow().keys().cloned());
    }
    let classes = match as_class(obj) {
        Some(cls) => cls.mro(),
        None => obj.class().mro(),
    };
    for cls in classes {
        names.extend(cls.own_namespace().into_keys());
    }
    Ok(sorted_names(names))
}

fn namespace_dict(namespace: &Namespace) -> ObjRef {
    Rc::new(Dict::from_namespace(namespace))
}

/// `obj.__dict__`, or the caller's locals without an argument
pub fn vars(obj: Option<&ObjRef>) -> RtResult<ObjRef> {
    let Some(obj) = obj else {
        let locals = scope::caller_locals().unwrap_or_default();
        return Ok(namespace_dict(&locals));
    };
    match protocol::get_attr(obj, "__dict__") {
        Err(err) if err.is(ExceptionKind::AttributeError) => Err(Exception::type_error(
            "vars() argument must have __dict__ attribute",
        )),
        result => result,
    }
}

pub(super) fn builtin_getattr(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_kwargs_empty("getattr")?;
    args.check_arity("getattr", 2, 3)?;
    let name = attr_name(&args.args[1], "getattr")?;
    getattr(&args.args[0], name, args.optional(2))
}

pub(super) fn builtin_hasattr(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_kwargs_empty("hasattr")?;
    args.check_arity("hasattr", 2, 2)?;
    let name = attr_name(&args.args[1], "hasattr")?;
    hasattr(&args.args[0], name).map(new_bool)
}

pub(super) fn builtin_setattr(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_kwargs_empty("setattr")?;
    args.check_arity("setattr", 3, 3)?;
    let name = attr_name(&args.args[1], "setattr")?;
    setattr(&args.args[0], name, args.args[2].clone())?;
    Ok(none())
}

pub(super) fn builtin_dir(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_kwargs_empty("dir")?;
    args.check_arity("dir", 0, 1)?;
    dir(args.args.first())
}

pub(super) fn builtin_dir_api(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_kwargs_empty("dir_api")?;
    args.check_arity("dir_api", 0, 1)?;
    dir_api(args.args.first())
}

pub(super) fn builtin_vars(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_kwargs_empty("vars")?;
    args.check_arity("vars", 0, 1)?;
    vars(args.args.first())
}
