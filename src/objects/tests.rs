use std::cell::Cell;
use std::rc::Rc;

use super::*;
use crate::errors::ExceptionKind;
use crate::protocol;

fn point_class() -> ClassRef {
    ClassBuilder::new("Point")
        .method("__init__", |args| {
            protocol::set_attr(&args.args[0], "x", args.args[1].clone())?;
            protocol::set_attr(&args.args[0], "y", args.args[2].clone())?;
            Ok(none())
        })
        .method("norm1", |args| {
            let x = protocol::get_attr(&args.args[0], "x")?;
            let y = protocol::get_attr(&args.args[0], "y")?;
            protocol::binary_op(&x, &y, protocol::BinaryOp::Add)
        })
        .build()
        .unwrap()
}

#[test]
fn test_singletons_are_shared() {
    assert!(is_same(&none(), &none()));
    assert!(is_same(&new_bool(true), &new_bool(true)));
    assert!(!is_same(&new_bool(true), &new_bool(false)));
    assert!(is_none(&none()));
    assert!(is_not_implemented(&not_implemented()));
}

#[test]
fn test_scalar_accessors() {
    assert_eq!(as_int(&new_int(7)), Some(7));
    assert_eq!(as_int(&new_bool(true)), Some(1));
    assert_eq!(as_int(&new_float(1.0)), None);
    assert_eq!(as_float(&new_float(2.5)), Some(2.5));
    assert_eq!(as_str(&new_str("hi")), Some("hi"));
    assert_eq!(new_bool(false).type_name(), "bool");
    assert_eq!(none().type_name(), "NoneType");
}

#[test]
fn test_instances_and_methods() {
    let point: ObjRef = point_class();
    let p = protocol::call(&point, &[new_int(3), new_int(4)]).unwrap();

    assert_eq!(p.type_name(), "Point");
    assert_eq!(as_int(&protocol::get_attr(&p, "x").unwrap()), Some(3));
    let total = protocol::call_method(&p, "norm1", &[]).unwrap();
    assert_eq!(as_int(&total), Some(7));

    let err = protocol::get_attr(&p, "z").unwrap_err();
    assert!(err.is(ExceptionKind::AttributeError));
    assert_eq!(err.message, "'Point' object has no attribute 'z'");
}

#[test]
fn test_init_arguments_checked() {
    let empty: ObjRef = ClassBuilder::new("Empty").build().unwrap();
    let err = protocol::call(&empty, &[new_int(1)]).unwrap_err();
    assert_eq!(err.message, "Empty() takes no arguments");
}

#[test]
fn test_mro_and_subclassing() {
    let base = ClassBuilder::new("Base")
        .method("who", |_| Ok(new_str("base")))
        .build()
        .unwrap();
    let left = ClassBuilder::new("Left").base(base.clone()).build().unwrap();
    let right = ClassBuilder::new("Right")
        .base(base.clone())
        .method("who", |_| Ok(new_str("right")))
        .build()
        .unwrap();
    let child = ClassBuilder::new("Child")
        .base(left.clone())
        .base(right.clone())
        .build()
        .unwrap();

    let names: Vec<String> = child.mro().iter().map(|c| c.name().to_string()).collect();
    assert_eq!(names, ["Child", "Left", "Right", "Base", "object"]);
    assert!(child.is_subclass(&base));
    assert!(!base.is_subclass(&child));

    let obj = protocol::call(&(child as ObjRef), &[]).unwrap();
    let who = protocol::call_method(&obj, "who", &[]).unwrap();
    assert_eq!(as_str(&who), Some("right"));
}

#[test]
fn test_inconsistent_mro_rejected() {
    let a = ClassBuilder::new("A").build().unwrap();
    let b = ClassBuilder::new("B").base(a.clone()).build().unwrap();
    let err = ClassBuilder::new("C").base(a).base(b).build().unwrap_err();
    assert!(err.is(ExceptionKind::TypeError));
}

#[test]
fn test_slots_have_no_dict() {
    let cls: ObjRef = ClassBuilder::new("Slotted").slots(&["a"]).build().unwrap();
    let obj = protocol::call(&cls, &[]).unwrap();

    assert!(obj.namespace().is_none());
    protocol::set_attr(&obj, "a", new_int(1)).unwrap();
    assert_eq!(as_int(&protocol::get_attr(&obj, "a").unwrap()), Some(1));

    let err = protocol::set_attr(&obj, "b", new_int(2)).unwrap_err();
    assert!(err.is(ExceptionKind::AttributeError));

    protocol::del_attr(&obj, "a").unwrap();
    assert!(!protocol::has_attr(&obj, "a").unwrap());
}

#[test]
fn test_descriptors() {
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let cls = ClassBuilder::new("Shape")
        .property("area", move |_| {
            counter.set(counter.get() + 1);
            Ok(new_int(12))
        })
        .classmethod("make", |args| Ok(args.args[0].clone()))
        .staticmethod("double", |args| {
            protocol::binary_op(&args.args[0], &args.args[0], protocol::BinaryOp::Add)
        })
        .build()
        .unwrap();
    let cls_obj: ObjRef = cls.clone();
    let shape = protocol::call(&cls_obj, &[]).unwrap();

    assert_eq!(as_int(&protocol::get_attr(&shape, "area").unwrap()), Some(12));
    assert_eq!(calls.get(), 1);
    assert!(protocol::set_attr(&shape, "area", new_int(1)).is_err());

    let made = protocol::call_method(&shape, "make", &[]).unwrap();
    assert!(is_same(&made, &cls_obj));

    let doubled = protocol::call_method(&cls_obj, "double", &[new_int(4)]).unwrap();
    assert_eq!(as_int(&doubled), Some(8));
}

#[test]
fn test_property_object_from_runtime() {
    let getter = new_function("get", |_args: FuncArgs| Ok(new_str("value")));
    let prop = protocol::call(&(property_type() as ObjRef), &[getter]).unwrap();
    let cls = ClassBuilder::new("Holder").attr("field", prop).build().unwrap();
    let holder = protocol::call(&(cls as ObjRef), &[]).unwrap();
    assert_eq!(
        as_str(&protocol::get_attr(&holder, "field").unwrap()),
        Some("value")
    );
}

#[test]
fn test_dict_by_value() {
    let dict = Dict::new();
    dict.set_item(new_int(1), new_str("one")).unwrap();
    dict.set_item(new_bool(true), new_str("uno")).unwrap();
    dict.set_str("k", new_int(5)).unwrap();

    assert_eq!(dict.len(), 2);
    let value = dict.get_item(&new_int(1)).unwrap().unwrap();
    assert_eq!(as_str(&value), Some("uno"));
    assert!(dict.del_item(&new_str("k")).unwrap());
    assert!(!dict.del_item(&new_str("k")).unwrap());

    let err = dict.set_item(new_list(vec![]), none()).unwrap_err();
    assert_eq!(err.message, "unhashable type: 'list'");
}

#[test]
fn test_reprs() {
    let list = new_list(vec![new_int(1), new_str("a"), none()]);
    assert_eq!(protocol::repr(&list).unwrap(), "[1, 'a', None]");
    assert_eq!(protocol::repr(&new_tuple(vec![new_int(1)])).unwrap(), "(1,)");
    assert_eq!(protocol::repr(&new_str("it's")).unwrap(), "\"it's\"");
    assert_eq!(protocol::repr(&new_float(2.0)).unwrap(), "2.0");
    assert_eq!(protocol::repr(&(int_type() as ObjRef)).unwrap(), "<class 'int'>");

    let dict = new_dict();
    protocol::call_method(&dict, "__setitem__", &[new_str("a"), new_int(1)]).unwrap();
    assert_eq!(protocol::repr(&dict).unwrap(), "{'a': 1}");
}

#[test]
fn test_native_constructors() {
    let int = protocol::call(&(int_type() as ObjRef), &[new_str(" 42 ")]).unwrap();
    assert_eq!(as_int(&int), Some(42));
    let truncated = protocol::call(&(int_type() as ObjRef), &[new_float(-2.7)]).unwrap();
    assert_eq!(as_int(&truncated), Some(-2));

    let err = protocol::call(&(int_type() as ObjRef), &[new_str("x")]).unwrap_err();
    assert_eq!(err.message, "invalid literal for int() with base 10: 'x'");

    let float = protocol::call(&(float_type() as ObjRef), &[new_int(3)]).unwrap();
    assert_eq!(as_float(&float), Some(3.0));

    let cls = protocol::call(&(type_type() as ObjRef), &[new_int(1)]).unwrap();
    assert!(is_same(&cls, &(int_type() as ObjRef)));
}

#[test]
fn test_dynamic_class_creation() {
    let ns = new_dict();
    protocol::call_method(&ns, "__setitem__", &[new_str("answer"), new_int(42)]).unwrap();
    let meta: ObjRef = type_type();
    let cls = protocol::call(&meta, &[new_str("Dyn"), new_tuple(vec![]), ns]).unwrap();

    let obj = protocol::call(&cls, &[]).unwrap();
    assert_eq!(obj.type_name(), "Dyn");
    assert_eq!(as_int(&protocol::get_attr(&obj, "answer").unwrap()), Some(42));
}

#[test]
fn test_func_args_helpers() {
    let mut args = FuncArgs::positional(&[new_int(1)]).with_kwarg("key", new_int(2));
    assert_eq!(args.len(), 1);
    assert!(args.check_kwargs_empty("f").is_err());
    assert!(args.take_keyword("key").is_some());
    assert!(args.check_kwargs_empty("f").is_ok());
    assert!(args.optional(3).is_none());

    let err = args.check_arity("f", 2, 2).unwrap_err();
    assert!(err.is(ExceptionKind::TypeError));
}

#[test]
fn test_module_names_sorted() {
    let mut ns = Namespace::new();
    ns.insert("zeta".to_string(), none());
    ns.insert("alpha".to_string(), none());
    let module: ObjRef = Rc::new(Module::new("m", ns));

    let m = module.downcast_ref::<Module>().unwrap();
    assert_eq!(m.names(), ["alpha", "zeta"]);
    assert!(protocol::get_attr(&module, "alpha").is_ok());
    let err = protocol::get_attr(&module, "beta").unwrap_err();
    assert_eq!(err.message, "module 'm' has no attribute 'beta'");
}
