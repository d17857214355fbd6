//! Descriptor wrappers - classmethod, staticmethod, property, slot members
//!
//! Each exposes `__get__` (and the data descriptors `__set__`/`__delete__`)
//! so attribute lookup treats them exactly like user-written descriptors.

use std::rc::Rc;

use super::types::native_type;
use super::{
    is_none, none, BoundMethod, ClassRef, FuncArgs, Instance, NativeType, ObjRef, Object,
};
use crate::errors::{Exception, RtResult};
use crate::protocol;

/// Binds the wrapped callable to the owning class
#[derive(Debug)]
pub struct ClassMethod {
    func: ObjRef,
}

impl ClassMethod {
    pub fn new(func: ObjRef) -> Self {
        Self { func }
    }

    #[inline]
    pub fn func(&self) -> &ObjRef {
        &self.func
    }
}

impl Object for ClassMethod {
    fn class(&self) -> ClassRef {
        classmethod_type()
    }
}

/// Returns the wrapped callable unbound
#[derive(Debug)]
pub struct StaticMethod {
    func: ObjRef,
}

impl StaticMethod {
    pub fn new(func: ObjRef) -> Self {
        Self { func }
    }
}

impl Object for StaticMethod {
    fn class(&self) -> ClassRef {
        staticmethod_type()
    }
}

#[derive(Debug, Clone)]
pub struct Property {
    fget: Option<ObjRef>,
    fset: Option<ObjRef>,
    fdel: Option<ObjRef>,
}

impl Property {
    pub fn new(fget: Option<ObjRef>, fset: Option<ObjRef>, fdel: Option<ObjRef>) -> Self {
        Self { fget, fset, fdel }
    }

    pub fn getter(fget: ObjRef) -> Self {
        Self::new(Some(fget), None, None)
    }
}

impl Object for Property {
    fn class(&self) -> ClassRef {
        property_type()
    }
}

/// Storage slot declared through `__slots__`
#[derive(Debug)]
pub struct SlotMember {
    name: String,
    owner: String,
}

impl SlotMember {
    pub fn new(name: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            owner: owner.into(),
        }
    }
}

impl Object for SlotMember {
    fn class(&self) -> ClassRef {
        member_type()
    }
}

native_type!(pub fn classmethod_type() = NativeType::new("classmethod")
    .method("__get__", classmethod_get)
    .constructor(classmethod_new)
    .build());

native_type!(pub fn staticmethod_type() = NativeType::new("staticmethod")
    .method("__get__", staticmethod_get)
    .constructor(staticmethod_new)
    .build());

native_type!(pub fn property_type() = NativeType::new("property")
    .method("__get__", property_get)
    .method("__set__", property_set)
    .method("__delete__", property_delete)
    .method("getter", |args| property_with(args, "getter", 0))
    .method("setter", |args| property_with(args, "setter", 1))
    .method("deleter", |args| property_with(args, "deleter", 2))
    .constructor(property_new)
    .build());

native_type!(pub fn member_type() = NativeType::new("member_descriptor")
    .method("__get__", member_get)
    .method("__set__", member_set)
    .method("__delete__", member_delete)
    .build());

/// `(self, instance, owner=None)` of a `__get__` call
fn get_args(args: &FuncArgs) -> RtResult<(ObjRef, Option<ObjRef>)> {
    args.check_arity("__get__", 2, 3)?;
    let instance = &args.args[1];
    let owner = args.optional(2).filter(|o| !is_none(o));
    let owner = match owner {
        Some(owner) => Some(owner),
        None if !is_none(instance) => Some(instance.class() as ObjRef),
        None => None,
    };
    Ok((instance.clone(), owner))
}

fn classmethod_new(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_kwargs_empty("classmethod")?;
    args.check_arity("classmethod", 1, 1)?;
    Ok(Rc::new(ClassMethod::new(args.args[0].clone())))
}

fn classmethod_get(args: FuncArgs) -> RtResult<ObjRef> {
    let cm = args.receiver::<ClassMethod>("__get__")?;
    let (_, owner) = get_args(&args)?;
    let owner = owner.ok_or_else(|| Exception::type_error("__get__(None, None) is invalid"))?;
    Ok(Rc::new(BoundMethod::new(owner, cm.func.clone())))
}

fn staticmethod_new(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_kwargs_empty("staticmethod")?;
    args.check_arity("staticmethod", 1, 1)?;
    Ok(Rc::new(StaticMethod::new(args.args[0].clone())))
}

fn staticmethod_get(args: FuncArgs) -> RtResult<ObjRef> {
    let sm = args.receiver::<StaticMethod>("__get__")?;
    Ok(sm.func.clone())
}

/// `property(fget=None, fset=None, fdel=None)`
fn property_new(mut args: FuncArgs) -> RtResult<ObjRef> {
    args.check_arity("property", 0, 3)?;
    let mut slot = |i: usize, name: &str| {
        args.optional(i)
            .or_else(|| args.take_keyword(name))
            .filter(|f| !is_none(f))
    };
    let fget = slot(0, "fget");
    let fset = slot(1, "fset");
    let fdel = slot(2, "fdel");
    args.check_kwargs_empty("property")?;
    Ok(Rc::new(Property::new(fget, fset, fdel)))
}

fn property_get(args: FuncArgs) -> RtResult<ObjRef> {
    let prop = args.receiver::<Property>("__get__")?;
    let (instance, _) = get_args(&args)?;
    if is_none(&instance) {
        return Ok(args.args[0].clone());
    }
    match &prop.fget {
        Some(fget) => protocol::call(fget, &[instance]),
        None => Err(Exception::attribute_error("unreadable attribute")),
    }
}

fn property_set(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_arity("__set__", 3, 3)?;
    let prop = args.receiver::<Property>("__set__")?;
    match &prop.fset {
        Some(fset) => protocol::call(fset, &[args.args[1].clone(), args.args[2].clone()]),
        None => Err(Exception::attribute_error("can't set attribute")),
    }
}

fn property_delete(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_arity("__delete__", 2, 2)?;
    let prop = args.receiver::<Property>("__delete__")?;
    match &prop.fdel {
        Some(fdel) => protocol::call(fdel, &[args.args[1].clone()]),
        None => Err(Exception::attribute_error("can't delete attribute")),
    }
}

/// Copy of the property with one accessor replaced
fn property_with(args: FuncArgs, name: &str, which: usize) -> RtResult<ObjRef> {
    args.check_arity(name, 2, 2)?;
    let mut prop = args.receiver::<Property>(name)?.clone();
    let func = Some(args.args[1].clone());
    match which {
        0 => prop.fget = func,
        1 => prop.fset = func,
        _ => prop.fdel = func,
    }
    Ok(Rc::new(prop))
}

fn slot_instance<'a>(args: &'a FuncArgs, member: &SlotMember) -> RtResult<&'a Instance> {
    args.args[1].downcast_ref::<Instance>().ok_or_else(|| {
        Exception::type_error(format!(
            "descriptor '{}' for '{}' objects doesn't apply to a '{}' object",
            member.name,
            member.owner,
            args.args[1].type_name()
        ))
    })
}

fn member_get(args: FuncArgs) -> RtResult<ObjRef> {
    let member = args.receiver::<SlotMember>("__get__")?;
    let (instance, _) = get_args(&args)?;
    if is_none(&instance) {
        return Ok(args.args[0].clone());
    }
    slot_instance(&args, member)?
        .slot(&member.name)
        .ok_or_else(|| Exception::attribute_error(member.name.clone()))
}

fn member_set(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_arity("__set__", 3, 3)?;
    let member = args.receiver::<SlotMember>("__set__")?;
    slot_instance(&args, member)?.set_slot(&member.name, args.args[2].clone());
    Ok(none())
}

fn member_delete(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_arity("__delete__", 2, 2)?;
    let member = args.receiver::<SlotMember>("__delete__")?;
    if slot_instance(&args, member)?.del_slot(&member.name) {
        Ok(none())
    } else {
        Err(Exception::attribute_error(member.name.clone()))
    }
}
