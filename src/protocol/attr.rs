//! Attribute access with the descriptor protocol

use std::rc::Rc;

use crate::errors::{Exception, ExceptionKind, RtResult};
use crate::objects::{
    as_class, class_tuple, is_none, new_str, none, type_type, BoundMethod, ClassRef,
    Dict, FuncArgs, Module, NativeFunction, ObjRef,
};

use super::call::{call, call_with};

/// Look a special method up on the value's type, skipping the instance
pub fn lookup_special(obj: &ObjRef, name: &str) -> Option<ObjRef> {
    obj.class().lookup(name).filter(|m| !is_none(m))
}

/// Invoke a special method if the type defines one
pub fn call_special(obj: &ObjRef, name: &str, args: &[ObjRef]) -> RtResult<Option<ObjRef>> {
    let Some(method) = lookup_special(obj, name) else {
        return Ok(None);
    };
    if let Some(func) = method.downcast_ref::<NativeFunction>() {
        let mut call_args = FuncArgs::positional(args);
        call_args.prepend(obj.clone());
        return func.invoke(call_args).map(Some);
    }
    let bound = bind_attr(&method, Some(obj), &obj.class())?;
    call(&bound, args).map(Some)
}

/// Apply `__get__` of a class attribute, if it has one
pub fn bind_attr(attr: &ObjRef, instance: Option<&ObjRef>, owner: &ClassRef) -> RtResult<ObjRef> {
    if attr.is::<NativeFunction>() {
        return Ok(match instance {
            Some(instance) => Rc::new(BoundMethod::new(instance.clone(), attr.clone())) as ObjRef,
            None => attr.clone(),
        });
    }
    match attr.class().lookup("__get__") {
        Some(get) if !is_none(&get) => {
            let instance = instance.cloned().unwrap_or_else(none);
            let owner: ObjRef = owner.clone();
            call_with(&get, FuncArgs::new([attr.clone(), instance, owner]))
        }
        _ => Ok(attr.clone()),
    }
}

fn is_data_descriptor(attr: &ObjRef) -> bool {
    let cls = attr.class();
    cls.lookup("__set__").is_some() || cls.lookup("__delete__").is_some()
}

/// `getattr(obj, name)` without a default
pub fn get_attr(obj: &ObjRef, name: &str) -> RtResult<ObjRef> {
    if let Some(cls) = as_class(obj) {
        return class_attr(&cls, obj, name);
    }
    if let Some(module) = obj.downcast_ref::<Module>() {
        return module_attr(module, obj, name);
    }
    instance_attr(obj, name)
}

fn class_attr(cls: &ClassRef, obj: &ObjRef, name: &str) -> RtResult<ObjRef> {
    match name {
        "__name__" => return Ok(new_str(cls.name())),
        "__mro__" => return Ok(class_tuple(cls.mro())),
        "__bases__" => return Ok(class_tuple(cls.bases().to_vec())),
        "__dict__" => return Ok(Rc::new(Dict::from_namespace(&cls.own_namespace()))),
        "__class__" => return Ok(type_type()),
        _ => {}
    }

    if let Some(attr) = cls.lookup(name) {
        return bind_attr(&attr, None, cls);
    }

    let meta = type_type();
    if let Some(attr) = meta.lookup(name) {
        return bind_attr(&attr, Some(obj), &meta);
    }

    Err(Exception::attribute_error(format!(
        "type object '{}' has no attribute '{}'",
        cls.name(),
        name
    )))
}

fn module_attr(module: &Module, obj: &ObjRef, name: &str) -> RtResult<ObjRef> {
    match name {
        "__name__" => return Ok(new_str(module.name())),
        "__class__" => return Ok(obj.class()),
        "__dict__" => {
            let ns = obj.namespace().map(|ns| ns.borrow().clone()).unwrap_or_default();
            return Ok(Rc::new(Dict::from_namespace(&ns)));
        }
        _ => {}
    }
    module.get(name).ok_or_else(|| {
        Exception::attribute_error(format!(
            "module '{}' has no attribute '{}'",
            module.name(),
            name
        ))
    })
}

fn instance_attr(obj: &ObjRef, name: &str) -> RtResult<ObjRef> {
    if name == "__class__" {
        return Ok(obj.class());
    }
    if name == "__dict__" {
        if let Some(ns) = obj.namespace() {
            let snapshot = ns.borrow().clone();
            return Ok(Rc::new(Dict::from_namespace(&snapshot)));
        }
    }

    let cls = obj.class();
    let class_attr = cls.lookup(name);

    if let Some(attr) = &class_attr {
        if is_data_descriptor(attr) {
            return bind_attr(attr, Some(obj), &cls);
        }
    }

    if let Some(ns) = obj.namespace() {
        let found = ns.borrow().get(name).cloned();
        if let Some(value) = found {
            return Ok(value);
        }
    }

    if let Some(attr) = &class_attr {
        return bind_attr(attr, Some(obj), &cls);
    }

    if name != "__getattr__" {
        if let Some(hook) = cls.lookup("__getattr__") {
            let hook = bind_attr(&hook, Some(obj), &cls)?;
            return call(&hook, &[new_str(name)]);
        }
    }

    Err(Exception::no_attribute(cls.name(), name))
}

/// `setattr(obj, name, value)`
pub fn set_attr(obj: &ObjRef, name: &str, value: ObjRef) -> RtResult<()> {
    if let Some(cls) = as_class(obj) {
        cls.set_attr(name, value);
        return Ok(());
    }

    let cls = obj.class();
    let class_attr = cls.lookup(name);
    if let Some(attr) = &class_attr {
        if let Some(set) = attr.class().lookup("__set__") {
            call_with(&set, FuncArgs::new([attr.clone(), obj.clone(), value]))?;
            return Ok(());
        }
    }

    if let Some(ns) = obj.namespace() {
        ns.borrow_mut().insert(name.to_string(), value);
        return Ok(());
    }

    match class_attr {
        Some(_) => Err(Exception::attribute_error(format!(
            "'{}' object attribute '{}' is read-only",
            cls.name(),
            name
        ))),
        None => Err(Exception::no_attribute(cls.name(), name)),
    }
}

/// `delattr(obj, name)`
pub fn del_attr(obj: &ObjRef, name: &str) -> RtResult<()> {
    if let Some(cls) = as_class(obj) {
        return if cls.del_attr(name) {
            Ok(())
        } else {
            Err(Exception::attribute_error(format!(
                "type object '{}' has no attribute '{}'",
                cls.name(),
                name
            )))
        };
    }

    let cls = obj.class();
    if let Some(attr) = cls.lookup(name) {
        if let Some(delete) = attr.class().lookup("__delete__") {
            call_with(&delete, FuncArgs::new([attr, obj.clone()]))?;
            return Ok(());
        }
    }

    let removed = obj
        .namespace()
        .map(|ns| ns.borrow_mut().remove(name).is_some())
        .unwrap_or(false);
    if removed {
        Ok(())
    } else {
        Err(Exception::no_attribute(cls.name(), name))
    }
}

/// Whether the fetch succeeds; only an attribute miss reads as `false`
pub fn has_attr(obj: &ObjRef, name: &str) -> RtResult<bool> {
    match get_attr(obj, name) {
        Ok(_) => Ok(true),
        Err(err) if err.is(ExceptionKind::AttributeError) => Ok(false),
        Err(err) => Err(err),
    }
}
