//! Callables and modules

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::types::native_type;
use super::{is_none, new_str, ClassRef, FuncArgs, Namespace, NativeType, ObjRef, Object};
use crate::errors::{Exception, RtResult};
use crate::protocol;

/// Plain function pointer used for native method tables
pub type NativeMethod = fn(FuncArgs) -> RtResult<ObjRef>;

/// Shared native callable, may capture state
pub type NativeFn = Rc<dyn Fn(FuncArgs) -> RtResult<ObjRef>>;

pub struct NativeFunction {
    name: String,
    func: NativeFn,
}

impl NativeFunction {
    pub fn new(name: impl Into<String>, func: NativeFn) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn invoke(&self, args: FuncArgs) -> RtResult<ObjRef> {
        (self.func)(args)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<built-in function {}>", self.name)
    }
}

impl Object for NativeFunction {
    fn class(&self) -> ClassRef {
        function_type()
    }
}

/// A callable with its first argument already bound
#[derive(Debug)]
pub struct BoundMethod {
    pub receiver: ObjRef,
    pub func: ObjRef,
}

impl BoundMethod {
    pub fn new(receiver: ObjRef, func: ObjRef) -> Self {
        Self { receiver, func }
    }
}

impl Object for BoundMethod {
    fn class(&self) -> ClassRef {
        method_type()
    }
}

/// Named namespace of functions and types
#[derive(Debug)]
pub struct Module {
    name: String,
    namespace: RefCell<Namespace>,
}

impl Module {
    pub fn new(name: impl Into<String>, namespace: Namespace) -> Self {
        Self {
            name: name.into(),
            namespace: RefCell::new(namespace),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, name: &str) -> Option<ObjRef> {
        self.namespace.borrow().get(name).cloned()
    }

    /// Exported names in sorted order
    pub fn names(&self) -> Vec<String> {
        self.namespace.borrow().keys().cloned().collect()
    }
}

impl Object for Module {
    fn class(&self) -> ClassRef {
        module_type()
    }

    fn namespace(&self) -> Option<&RefCell<Namespace>> {
        Some(&self.namespace)
    }
}

native_type!(pub fn function_type() = NativeType::new("builtin_function_or_method")
    .method("__call__", call_receiver)
    .method("__get__", function_get)
    .method("__repr__", function_repr)
    .build());

native_type!(pub fn method_type() = NativeType::new("method")
    .method("__call__", call_receiver)
    .method("__repr__", method_repr)
    .build());

native_type!(pub fn module_type() = NativeType::new("module")
    .method("__repr__", module_repr)
    .build());

/// `f.__call__(*args)`: forward to the receiver itself
fn call_receiver(mut args: FuncArgs) -> RtResult<ObjRef> {
    if args.args.is_empty() {
        return Err(Exception::type_error(
            "descriptor '__call__' needs an argument",
        ));
    }
    let func = args.args.remove(0);
    protocol::call_with(&func, args)
}

/// Functions bind to instances, and are returned unchanged from classes
fn function_get(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_arity("__get__", 2, 3)?;
    let func = args.args[0].clone();
    let instance = &args.args[1];
    if is_none(instance) {
        return Ok(func);
    }
    Ok(Rc::new(BoundMethod::new(instance.clone(), func)))
}

fn function_repr(args: FuncArgs) -> RtResult<ObjRef> {
    let f = args.receiver::<NativeFunction>("__repr__")?;
    Ok(new_str(format!("<built-in function {}>", f.name)))
}

fn method_repr(args: FuncArgs) -> RtResult<ObjRef> {
    let m = args.receiver::<BoundMethod>("__repr__")?;
    let name = m
        .func
        .downcast_ref::<NativeFunction>()
        .map(|f| f.name.clone())
        .unwrap_or_else(|| "?".to_string());
    Ok(new_str(format!(
        "<bound method {} of {}>",
        name,
        protocol::repr(&m.receiver)?
    )))
}

fn module_repr(args: FuncArgs) -> RtResult<ObjRef> {
    let m = args.receiver::<Module>("__repr__")?;
    Ok(new_str(format!("<module '{}'>", m.name)))
}
