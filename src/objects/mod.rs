//! Object system - the reference host object model
//!
//! Design: Every value is an `Rc<dyn Object>`. An object only knows its
//! class and (optionally) its attribute namespace; all behaviour lives in
//! dunder methods stored in class namespaces, so the builtins can discover
//! capabilities by attribute probing exactly as they would on a foreign host.
//! - Shared ownership, single-threaded (`Rc`/`RefCell`)
//! - Per-thread singletons for None/True/False/NotImplemented
//! - Native behaviour exposed as plain `fn(FuncArgs)` method tables

use std::any::Any;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

mod args;
mod descriptors;
mod dict;
mod function;
mod instance;
mod scalars;
mod sequences;
mod string;
mod types;

#[cfg(test)]
mod tests;

pub use args::FuncArgs;
pub use descriptors::{
    classmethod_type, member_type, property_type, staticmethod_type, ClassMethod, Property,
    SlotMember, StaticMethod,
};
pub use dict::{dict_type, Dict};
pub use function::{
    function_type, method_type, module_type, BoundMethod, Module, NativeFn, NativeFunction,
    NativeMethod,
};
pub use instance::{ClassBuilder, Instance};
pub use scalars::{
    bool_type, float_type, int_type, none_type, not_implemented_type, Bool, Float, Int,
    NoneObject, NotImplementedObject,
};
pub use sequences::{list_type, sequence_iter_type, tuple_type, List, SequenceIter, Tuple};
pub use string::{str_type, Str};
pub use types::{object_type, type_type, ClassKind, ClassObject, ClassRef, NativeType};

pub(crate) use dict::key_error;
pub(crate) use sequences::{compare_sequences, normalize_index};
pub(crate) use types::{class_tuple, native_type};

/// Shared reference to any runtime value
pub type ObjRef = Rc<dyn Object>;

/// Attribute namespace of classes, instances and modules
pub type Namespace = BTreeMap<String, ObjRef>;

/// Downcasting support, implemented for every sized `'static` type
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn into_any_rc(self: Rc<Self>) -> Rc<dyn Any>;
}

impl<T: Any> AsAny for T {
    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn into_any_rc(self: Rc<Self>) -> Rc<dyn Any> {
        self
    }
}

/// A runtime value
pub trait Object: AsAny + fmt::Debug {
    /// Dynamic type of this value
    fn class(&self) -> ClassRef;

    /// Per-instance attribute namespace, if the value carries one
    fn namespace(&self) -> Option<&RefCell<Namespace>> {
        None
    }
}

impl dyn Object {
    #[inline]
    pub fn downcast_ref<T: Object>(&self) -> Option<&T> {
        AsAny::as_any(self).downcast_ref::<T>()
    }

    #[inline]
    pub fn is<T: Object>(&self) -> bool {
        AsAny::as_any(self).is::<T>()
    }

    /// Name of this value's dynamic type
    pub fn type_name(&self) -> String {
        self.class().name().to_string()
    }
}

/// Recover the concrete `Rc` behind an object reference
pub fn downcast_rc<T: Object>(obj: &ObjRef) -> Option<Rc<T>> {
    AsAny::into_any_rc(Rc::clone(obj)).downcast::<T>().ok()
}

/// Identity comparison (`a is b`)
#[inline]
pub fn is_same(a: &ObjRef, b: &ObjRef) -> bool {
    std::ptr::eq(Rc::as_ptr(a) as *const (), Rc::as_ptr(b) as *const ())
}

struct Singletons {
    none: ObjRef,
    not_implemented: ObjRef,
    true_: ObjRef,
    false_: ObjRef,
}

thread_local! {
    static SINGLETONS: Singletons = Singletons {
        none: Rc::new(NoneObject),
        not_implemented: Rc::new(NotImplementedObject),
        true_: Rc::new(Bool(true)),
        false_: Rc::new(Bool(false)),
    };
}

pub fn none() -> ObjRef {
    SINGLETONS.with(|s| s.none.clone())
}

pub fn not_implemented() -> ObjRef {
    SINGLETONS.with(|s| s.not_implemented.clone())
}

pub fn new_bool(value: bool) -> ObjRef {
    SINGLETONS.with(|s| if value { s.true_.clone() } else { s.false_.clone() })
}

pub fn new_int(value: i64) -> ObjRef {
    Rc::new(Int(value))
}

pub fn new_float(value: f64) -> ObjRef {
    Rc::new(Float(value))
}

pub fn new_str(value: impl Into<String>) -> ObjRef {
    Rc::new(Str::new(value))
}

pub fn new_tuple(items: Vec<ObjRef>) -> ObjRef {
    Rc::new(Tuple::new(items))
}

pub fn new_list(items: Vec<ObjRef>) -> ObjRef {
    Rc::new(List::new(items))
}

pub fn new_dict() -> ObjRef {
    Rc::new(Dict::new())
}

/// Wrap a Rust closure as a callable object
pub fn new_function<F>(name: impl Into<String>, func: F) -> ObjRef
where
    F: Fn(FuncArgs) -> crate::errors::RtResult<ObjRef> + 'static,
{
    Rc::new(NativeFunction::new(name, Rc::new(func)))
}

#[inline]
pub fn is_none(obj: &ObjRef) -> bool {
    obj.is::<NoneObject>()
}

#[inline]
pub fn is_not_implemented(obj: &ObjRef) -> bool {
    obj.is::<NotImplementedObject>()
}

/// Integer value of an `int` or `bool`
pub fn as_int(obj: &ObjRef) -> Option<i64> {
    if let Some(Int(value)) = obj.downcast_ref::<Int>() {
        return Some(*value);
    }
    obj.downcast_ref::<Bool>().map(|Bool(b)| i64::from(*b))
}

pub fn as_float(obj: &ObjRef) -> Option<f64> {
    obj.downcast_ref::<Float>().map(|Float(f)| *f)
}

pub fn as_str(obj: &ObjRef) -> Option<&str> {
    obj.downcast_ref::<Str>().map(Str::as_str)
}

pub fn as_class(obj: &ObjRef) -> Option<ClassRef> {
    downcast_rc::<ClassObject>(obj)
}
