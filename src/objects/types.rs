//! Class objects - names, bases, resolution order and method tables
//!
//! Design: A class owns its namespace and a precomputed C3 resolution order.
//! The order is stored without the class itself so no `Rc` cycle forms;
//! `mro()` prepends `self` on demand. Native types are built once per thread
//! by the `native_type!` accessors and cached for the life of the thread.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::{
    is_none, new_str, new_tuple, none, ClassMethod, FuncArgs, NativeFunction, NativeMethod,
    Namespace, ObjRef, Object,
};
use crate::errors::{Exception, RtResult};
use crate::protocol;

pub type ClassRef = Rc<ClassObject>;

/// Where a class came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    Native,
    User,
}

pub struct ClassObject {
    name: String,
    bases: Vec<ClassRef>,
    ancestors: Vec<ClassRef>,
    namespace: RefCell<Namespace>,
    constructor: Option<NativeMethod>,
    kind: ClassKind,
    instance_dict: bool,
}

impl fmt::Debug for ClassObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<class '{}'>", self.name)
    }
}

impl Object for ClassObject {
    fn class(&self) -> ClassRef {
        type_type()
    }

    fn namespace(&self) -> Option<&RefCell<Namespace>> {
        Some(&self.namespace)
    }
}

impl ClassObject {
    /// Create a user class, linearizing its bases
    pub fn new_user(
        name: impl Into<String>,
        bases: Vec<ClassRef>,
        namespace: Namespace,
        instance_dict: bool,
    ) -> RtResult<ClassRef> {
        let bases = if bases.is_empty() {
            vec![object_type()]
        } else {
            bases
        };
        let ancestors = linearize(&bases)?;
        let instance_dict = instance_dict
            || ancestors
                .iter()
                .any(|c| c.kind == ClassKind::User && c.instance_dict);

        Ok(Rc::new(Self {
            name: name.into(),
            bases,
            ancestors,
            namespace: RefCell::new(namespace),
            constructor: None,
            kind: ClassKind::User,
            instance_dict,
        }))
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn bases(&self) -> &[ClassRef] {
        &self.bases
    }

    #[inline]
    pub fn kind(&self) -> ClassKind {
        self.kind
    }

    /// Whether instances carry an attribute dictionary
    #[inline]
    pub fn instance_dict(&self) -> bool {
        self.instance_dict
    }

    #[inline]
    pub fn constructor(&self) -> Option<NativeMethod> {
        self.constructor
    }

    /// Resolution order, starting with this class
    pub fn mro(self: &Rc<Self>) -> Vec<ClassRef> {
        let mut order = Vec::with_capacity(self.ancestors.len() + 1);
        order.push(Rc::clone(self));
        order.extend(self.ancestors.iter().cloned());
        order
    }

    /// Look `name` up along the resolution order
    pub fn lookup(&self, name: &str) -> Option<ObjRef> {
        if let Some(value) = self.namespace.borrow().get(name) {
            return Some(value.clone());
        }
        self.ancestors
            .iter()
            .find_map(|cls| cls.namespace.borrow().get(name).cloned())
    }

    /// Snapshot of this class's own namespace
    pub fn own_namespace(&self) -> Namespace {
        self.namespace.borrow().clone()
    }

    pub fn set_attr(&self, name: impl Into<String>, value: ObjRef) {
        self.namespace.borrow_mut().insert(name.into(), value);
    }

    pub fn del_attr(&self, name: &str) -> bool {
        self.namespace.borrow_mut().remove(name).is_some()
    }

    pub fn is_subclass(&self, other: &ClassObject) -> bool {
        std::ptr::eq(self, other) || self.ancestors.iter().any(|c| std::ptr::eq(&**c, other))
    }
}

/// C3 linearization of `bases`, excluding the class being created
fn linearize(bases: &[ClassRef]) -> RtResult<Vec<ClassRef>> {
    let mut sequences: Vec<Vec<ClassRef>> = bases.iter().map(|b| b.mro()).collect();
    sequences.push(bases.to_vec());

    let mut result: Vec<ClassRef> = Vec::new();
    loop {
        sequences.retain(|seq| !seq.is_empty());
        if sequences.is_empty() {
            return Ok(result);
        }

        let candidate = sequences
            .iter()
            .map(|seq| &seq[0])
            .find(|head| {
                !sequences
                    .iter()
                    .any(|seq| seq[1..].iter().any(|c| Rc::ptr_eq(c, head)))
            })
            .cloned();

        let Some(candidate) = candidate else {
            return Err(Exception::type_error(
                "Cannot create a consistent method resolution order (MRO)",
            ));
        };

        for seq in &mut sequences {
            if Rc::ptr_eq(&seq[0], &candidate) {
                seq.remove(0);
            }
        }
        result.push(candidate);
    }
}

/// Builder for the method tables of native types
pub struct NativeType {
    name: &'static str,
    base: Option<ClassRef>,
    namespace: Namespace,
    constructor: Option<NativeMethod>,
}

impl NativeType {
    /// Native type deriving from `object`
    pub fn new(name: &'static str) -> Self {
        Self::root(name).base(object_type())
    }

    /// Native type without bases (only `object` itself)
    pub fn root(name: &'static str) -> Self {
        Self {
            name,
            base: None,
            namespace: Namespace::new(),
            constructor: None,
        }
    }

    pub fn base(mut self, base: ClassRef) -> Self {
        self.base = Some(base);
        self
    }

    pub fn method(mut self, name: &'static str, func: NativeMethod) -> Self {
        self.namespace
            .insert(name.to_string(), Rc::new(NativeFunction::new(name, Rc::new(func))));
        self
    }

    pub fn classmethod(mut self, name: &'static str, func: NativeMethod) -> Self {
        let func: ObjRef = Rc::new(NativeFunction::new(name, Rc::new(func)));
        self.namespace
            .insert(name.to_string(), Rc::new(ClassMethod::new(func)));
        self
    }

    pub fn attr(mut self, name: &'static str, value: ObjRef) -> Self {
        self.namespace.insert(name.to_string(), value);
        self
    }

    /// Mark instances unhashable
    pub fn unhashable(self) -> Self {
        self.attr("__hash__", none())
    }

    pub fn constructor(mut self, func: NativeMethod) -> Self {
        self.constructor = Some(func);
        self
    }

    pub fn build(self) -> ClassRef {
        let ancestors = self.base.as_ref().map(|b| b.mro()).unwrap_or_default();
        Rc::new(ClassObject {
            name: self.name.to_string(),
            bases: self.base.into_iter().collect(),
            ancestors,
            namespace: RefCell::new(self.namespace),
            constructor: self.constructor,
            kind: ClassKind::Native,
            instance_dict: false,
        })
    }
}

/// Define a per-thread cached native type accessor
macro_rules! native_type {
    ($vis:vis fn $accessor:ident() = $build:expr) => {
        $vis fn $accessor() -> $crate::objects::ClassRef {
            thread_local! {
                static TYPE: $crate::objects::ClassRef = $build;
            }
            TYPE.with(::std::rc::Rc::clone)
        }
    };
}
pub(crate) use native_type;

native_type!(pub fn object_type() = NativeType::root("object")
    .method("__eq__", object_eq)
    .method("__ne__", object_ne)
    .method("__hash__", object_hash)
    .method("__repr__", object_repr)
    .method("__str__", object_str)
    .constructor(object_new)
    .build());

native_type!(pub fn type_type() = NativeType::new("type")
    .method("__call__", type_call)
    .method("__repr__", type_repr)
    .method("mro", type_mro)
    .constructor(type_new)
    .build());

fn object_new(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_arity("object", 0, 0)?;
    Ok(Rc::new(super::Instance::new(object_type())))
}

fn object_eq(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_arity("__eq__", 2, 2)?;
    if super::is_same(&args.args[0], &args.args[1]) {
        Ok(super::new_bool(true))
    } else {
        Ok(super::not_implemented())
    }
}

fn object_ne(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_arity("__ne__", 2, 2)?;
    let eq = protocol::call_method(&args.args[0], "__eq__", &[args.args[1].clone()])?;
    if super::is_not_implemented(&eq) {
        return Ok(eq);
    }
    Ok(super::new_bool(!protocol::is_truthy(&eq)?))
}

fn object_hash(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_arity("__hash__", 1, 1)?;
    let addr = Rc::as_ptr(&args.args[0]) as *const () as usize;
    Ok(super::new_int((addr >> 4) as i64))
}

fn object_repr(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_arity("__repr__", 1, 1)?;
    let obj = &args.args[0];
    Ok(new_str(format!(
        "<{} object at {:#x}>",
        obj.type_name(),
        Rc::as_ptr(obj) as *const () as usize
    )))
}

fn object_str(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_arity("__str__", 1, 1)?;
    Ok(new_str(protocol::repr(&args.args[0])?))
}

fn type_call(mut args: FuncArgs) -> RtResult<ObjRef> {
    if args.args.is_empty() {
        return Err(Exception::type_error(
            "descriptor '__call__' of 'type' object needs an argument",
        ));
    }
    let cls = args.args.remove(0);
    protocol::call_with(&cls, args)
}

fn type_repr(args: FuncArgs) -> RtResult<ObjRef> {
    let cls = args.receiver::<ClassObject>("__repr__")?;
    Ok(new_str(format!("<class '{}'>", cls.name())))
}

fn type_mro(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_arity("mro", 1, 1)?;
    let cls = super::as_class(&args.args[0])
        .ok_or_else(|| Exception::type_error("descriptor 'mro' requires a 'type' object"))?;
    Ok(super::new_list(
        cls.mro().into_iter().map(|c| c as ObjRef).collect(),
    ))
}

/// `type(obj)` or `type(name, bases, dict)`
fn type_new(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_kwargs_empty("type")?;
    match args.args.len() {
        1 => Ok(args.args[0].class()),
        3 => {
            let name = super::as_str(&args.args[0])
                .ok_or_else(|| {
                    Exception::type_error(format!(
                        "type.__new__() argument 1 must be str, not {}",
                        args.args[0].type_name()
                    ))
                })?
                .to_string();
            let bases = match args.args[1].downcast_ref::<super::Tuple>() {
                Some(tuple) => tuple
                    .items()
                    .iter()
                    .map(|b| {
                        super::as_class(b).ok_or_else(|| {
                            Exception::type_error(format!(
                                "bases must be types, not '{}'",
                                b.type_name()
                            ))
                        })
                    })
                    .collect::<RtResult<Vec<_>>>()?,
                None => {
                    return Err(Exception::type_error(format!(
                        "type.__new__() argument 2 must be tuple, not {}",
                        args.args[1].type_name()
                    )))
                }
            };
            let dict = args.args[2].downcast_ref::<super::Dict>().ok_or_else(|| {
                Exception::type_error(format!(
                    "type.__new__() argument 3 must be dict, not {}",
                    args.args[2].type_name()
                ))
            })?;
            let mut namespace = Namespace::new();
            for (key, value) in dict.items() {
                let key = super::as_str(&key)
                    .ok_or_else(|| Exception::type_error("class namespace keys must be str"))?
                    .to_string();
                namespace.insert(key, value);
            }
            let has_slots = namespace
                .get("__slots__")
                .map(|s| !is_none(s))
                .unwrap_or(false);
            let cls = ClassObject::new_user(name, bases, namespace, !has_slots)?;
            Ok(cls)
        }
        _ => Err(Exception::type_error("type() takes 1 or 3 arguments")),
    }
}

/// Tuple of class objects, for `__mro__` and `__bases__`
pub(crate) fn class_tuple(classes: Vec<ClassRef>) -> ObjRef {
    new_tuple(classes.into_iter().map(|c| c as ObjRef).collect())
}
