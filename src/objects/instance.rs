//! User classes and their instances

use std::cell::RefCell;
use std::rc::Rc;

use super::{
    new_function, new_str, new_tuple, ClassMethod, ClassObject, ClassRef, FuncArgs, Namespace,
    ObjRef, Object, Property, SlotMember, StaticMethod,
};
use crate::errors::RtResult;

/// Instance of a user class
#[derive(Debug)]
pub struct Instance {
    class: ClassRef,
    dict: Option<RefCell<Namespace>>,
    slots: RefCell<Namespace>,
}

impl Instance {
    pub fn new(class: ClassRef) -> Self {
        let dict = class.instance_dict().then(|| RefCell::new(Namespace::new()));
        Self {
            class,
            dict,
            slots: RefCell::new(Namespace::new()),
        }
    }

    pub(crate) fn slot(&self, name: &str) -> Option<ObjRef> {
        self.slots.borrow().get(name).cloned()
    }

    pub(crate) fn set_slot(&self, name: &str, value: ObjRef) {
        self.slots.borrow_mut().insert(name.to_string(), value);
    }

    pub(crate) fn del_slot(&self, name: &str) -> bool {
        self.slots.borrow_mut().remove(name).is_some()
    }
}

impl Object for Instance {
    fn class(&self) -> ClassRef {
        Rc::clone(&self.class)
    }

    fn namespace(&self) -> Option<&RefCell<Namespace>> {
        self.dict.as_ref()
    }
}

/// Assembles a user class from Rust closures
///
/// ```ignore
/// let point = ClassBuilder::new("Point")
///     .method("__len__", |_args| Ok(new_int(2)))
///     .slots(&["x", "y"])
///     .build()?;
/// ```
pub struct ClassBuilder {
    name: String,
    bases: Vec<ClassRef>,
    namespace: Namespace,
    slots: Option<Vec<String>>,
}

impl ClassBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bases: Vec::new(),
            namespace: Namespace::new(),
            slots: None,
        }
    }

    pub fn base(mut self, base: ClassRef) -> Self {
        self.bases.push(base);
        self
    }

    /// Instance method; the receiver arrives as the first positional
    pub fn method<F>(mut self, name: &str, func: F) -> Self
    where
        F: Fn(FuncArgs) -> RtResult<ObjRef> + 'static,
    {
        self.namespace
            .insert(name.to_string(), new_function(name, func));
        self
    }

    pub fn classmethod<F>(mut self, name: &str, func: F) -> Self
    where
        F: Fn(FuncArgs) -> RtResult<ObjRef> + 'static,
    {
        let wrapped = ClassMethod::new(new_function(name, func));
        self.namespace.insert(name.to_string(), Rc::new(wrapped));
        self
    }

    pub fn staticmethod<F>(mut self, name: &str, func: F) -> Self
    where
        F: Fn(FuncArgs) -> RtResult<ObjRef> + 'static,
    {
        let wrapped = StaticMethod::new(new_function(name, func));
        self.namespace.insert(name.to_string(), Rc::new(wrapped));
        self
    }

    /// Read-only computed attribute
    pub fn property<F>(mut self, name: &str, getter: F) -> Self
    where
        F: Fn(FuncArgs) -> RtResult<ObjRef> + 'static,
    {
        let prop = Property::getter(new_function(name, getter));
        self.namespace.insert(name.to_string(), Rc::new(prop));
        self
    }

    pub fn attr(mut self, name: &str, value: ObjRef) -> Self {
        self.namespace.insert(name.to_string(), value);
        self
    }

    /// Fixed attribute storage; instances get no `__dict__`
    pub fn slots(mut self, names: &[&str]) -> Self {
        self.slots = Some(names.iter().map(|n| n.to_string()).collect());
        self
    }

    pub fn build(mut self) -> RtResult<ClassRef> {
        let instance_dict = match self.slots.take() {
            Some(slots) => {
                for slot in &slots {
                    let member = SlotMember::new(slot.clone(), self.name.clone());
                    self.namespace.insert(slot.clone(), Rc::new(member));
                }
                let names = slots.into_iter().map(new_str).collect();
                self.namespace
                    .insert("__slots__".to_string(), new_tuple(names));
                false
            }
            None => true,
        };
        ClassObject::new_user(self.name, self.bases, self.namespace, instance_dict)
    }
}
