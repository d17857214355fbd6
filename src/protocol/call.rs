//! Dynamic calls

use std::rc::Rc;

use crate::errors::{Exception, RtResult};
use crate::objects::{
    as_class, is_none, BoundMethod, ClassKind, ClassRef, FuncArgs, Instance, NativeFunction,
    ObjRef,
};

use super::attr::{bind_attr, get_attr};

/// Call with positional arguments only
#[inline]
pub fn call(func: &ObjRef, args: &[ObjRef]) -> RtResult<ObjRef> {
    call_with(func, FuncArgs::positional(args))
}

pub fn call_with(func: &ObjRef, mut args: FuncArgs) -> RtResult<ObjRef> {
    if let Some(native) = func.downcast_ref::<NativeFunction>() {
        return native.invoke(args);
    }
    if let Some(method) = func.downcast_ref::<BoundMethod>() {
        args.prepend(method.receiver.clone());
        return call_with(&method.func, args);
    }
    if let Some(cls) = as_class(func) {
        return instantiate(&cls, args);
    }

    match func.class().lookup("__call__") {
        Some(call) if !is_none(&call) => {
            args.prepend(func.clone());
            call_with(&call, args)
        }
        _ => Err(Exception::not_callable(&func.type_name())),
    }
}

/// Create an instance of `cls`
pub fn instantiate(cls: &ClassRef, args: FuncArgs) -> RtResult<ObjRef> {
    if let Some(constructor) = cls.constructor() {
        return constructor(args);
    }
    if cls.kind() != ClassKind::User {
        return Err(Exception::type_error(format!(
            "cannot create '{}' instances",
            cls.name()
        )));
    }

    let instance: ObjRef = Rc::new(Instance::new(Rc::clone(cls)));
    match cls.lookup("__init__") {
        Some(init) => {
            let init = bind_attr(&init, Some(&instance), cls)?;
            let result = call_with(&init, args)?;
            if !is_none(&result) {
                return Err(Exception::type_error(format!(
                    "__init__() should return None, not '{}'",
                    result.type_name()
                )));
            }
        }
        None if !args.is_empty() => {
            return Err(Exception::type_error(format!(
                "{}() takes no arguments",
                cls.name()
            )));
        }
        None => {}
    }
    Ok(instance)
}

/// Fetch `obj.name` and call it
pub fn call_method(obj: &ObjRef, name: &str, args: &[ObjRef]) -> RtResult<ObjRef> {
    let method = get_attr(obj, name)?;
    call(&method, args)
}

/// Whether `obj` can be called at all
pub fn is_callable(obj: &ObjRef) -> bool {
    obj.is::<NativeFunction>()
        || obj.is::<BoundMethod>()
        || as_class(obj).is_some()
        || obj
            .class()
            .lookup("__call__")
            .map(|c| !is_none(&c))
            .unwrap_or(false)
}
