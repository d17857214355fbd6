//! End-to-end builtin calls through the `builtins` module table

use proptest::prelude::*;
use pybuiltins::builtins;
use pybuiltins::objects::{
    as_int, as_str, is_none, is_same, new_bool, new_int, new_list, new_str, new_tuple, none,
    ClassBuilder, ClassRef, List, ObjRef, Tuple,
};
use pybuiltins::{protocol, ExceptionKind, FuncArgs, RtResult};

fn call(name: &str, args: &[ObjRef]) -> RtResult<ObjRef> {
    let func = builtins::lookup(name).unwrap_or_else(|| panic!("no builtin named {}", name));
    protocol::call(&func, args)
}

fn call_kw(name: &str, args: FuncArgs) -> RtResult<ObjRef> {
    let func = builtins::lookup(name).unwrap();
    protocol::call_with(&func, args)
}

fn ints(values: &[i64]) -> ObjRef {
    new_list(values.iter().copied().map(new_int).collect())
}

fn list_ints(obj: &ObjRef) -> Vec<i64> {
    obj.downcast_ref::<List>()
        .unwrap()
        .snapshot()
        .iter()
        .map(|v| as_int(v).unwrap())
        .collect()
}

const LEVELS: [&str; 6] = ["C0", "C1", "C2", "C3", "C4", "C5"];

/// Linear class chain, each level deriving from the previous one
fn class_chain(depth: usize) -> Vec<ClassRef> {
    let mut chain: Vec<ClassRef> = Vec::with_capacity(depth);
    for &name in &LEVELS[..depth] {
        let mut builder = ClassBuilder::new(name);
        if let Some(parent) = chain.last() {
            builder = builder.base(parent.clone());
        }
        chain.push(builder.build().unwrap());
    }
    chain
}

#[test]
fn test_module_exports_functions_and_types() {
    for name in ["len", "getattr", "divmod", "hex_api", "timsort", "range", "zip", "property"] {
        assert!(builtins::lookup(name).is_some(), "missing {}", name);
    }
    assert!(builtins::lookup("eval").is_none());
}

#[test]
fn test_len_and_truthiness_of_user_class() {
    let sized: ObjRef = ClassBuilder::new("Sized")
        .method("__len__", |_| Ok(new_int(0)))
        .build()
        .unwrap();
    let obj = protocol::call(&sized, &[]).unwrap();

    assert_eq!(as_int(&call("len", &[obj.clone()]).unwrap()), Some(0));
    let truth = call("bool", &[obj]).unwrap();
    assert!(is_same(&truth, &new_bool(false)));
}

#[test]
fn test_max_key_and_default() {
    let words = new_list(vec![new_str("bb"), new_str("a"), new_str("cc")]);
    let len = builtins::lookup("len").unwrap();
    let args = FuncArgs::positional(&[words]).with_kwarg("key", len);
    let longest = call_kw("max", args).unwrap();
    assert_eq!(as_str(&longest), Some("bb"));

    let args = FuncArgs::positional(&[ints(&[])]).with_kwarg("default", none());
    assert!(is_none(&call_kw("min", args).unwrap()));

    let err = call("max", &[ints(&[])]).unwrap_err();
    assert!(err.is(ExceptionKind::ValueError));
}

#[test]
fn test_sorted_reverse_keyword() {
    let args = FuncArgs::positional(&[ints(&[2, 9, 4])]).with_kwarg("reverse", new_bool(true));
    assert_eq!(list_ints(&call_kw("sorted", args).unwrap()), [9, 4, 2]);
}

#[test]
fn test_getattr_and_setattr_round_trip() {
    let bag: ObjRef = ClassBuilder::new("Bag").build().unwrap();
    let obj = protocol::call(&bag, &[]).unwrap();

    call("setattr", &[obj.clone(), new_str("size"), new_int(3)]).unwrap();
    assert_eq!(as_int(&call("getattr", &[obj.clone(), new_str("size")]).unwrap()), Some(3));

    let fallback = call("getattr", &[obj.clone(), new_str("color"), new_str("red")]).unwrap();
    assert_eq!(as_str(&fallback), Some("red"));

    let err = call("getattr", &[obj, new_str("color")]).unwrap_err();
    assert!(err.is(ExceptionKind::AttributeError));
}

#[test]
fn test_pow_three_argument_forms() {
    let r = call("pow", &[new_int(3), new_int(4), new_int(5)]).unwrap();
    assert_eq!(as_int(&r), Some(1));

    let err = call("pow", &[new_int(3), new_int(4), new_int(0)]).unwrap_err();
    assert_eq!(err.message, "pow() 3rd argument cannot be 0");

    let err = call("pow", &[new_str("x"), new_int(2)]).unwrap_err();
    assert_eq!(
        err.message,
        "unsupported operand type(s) for ** or pow(): 'str' and 'int'"
    );
}

#[test]
fn test_isinstance_tuple_and_issubclass_errors() {
    let chain = class_chain(2);
    let child: ObjRef = chain[1].clone();
    let obj = protocol::call(&child, &[]).unwrap();
    let int_cls = builtins::lookup("int").unwrap();

    let spec = new_tuple(vec![int_cls, chain[0].clone() as ObjRef]);
    assert!(protocol::is_truthy(&call("isinstance", &[obj.clone(), spec]).unwrap()).unwrap());

    let err = call("issubclass", &[obj, child]).unwrap_err();
    assert_eq!(err.message, "issubclass() arg 1 must be a class");
}

#[test]
fn test_bin_accepts_index_capability() {
    let seven: ObjRef = ClassBuilder::new("Seven")
        .method("__index__", |_| Ok(new_int(7)))
        .build()
        .unwrap();
    let obj = protocol::call(&seven, &[]).unwrap();
    assert_eq!(as_str(&call("bin", &[obj.clone()]).unwrap()), Some("0b111"));
    assert_eq!(as_str(&call("oct_api", &[obj]).unwrap()), Some("0o7"));

    let err = call("hex", &[new_str("7")]).unwrap_err();
    assert!(err.is(ExceptionKind::TypeError));
}

proptest! {
    #[test]
    fn divmod_matches_floor_semantics(a in -1_000_000i64..1_000_000, b in -1000i64..1000) {
        prop_assume!(b != 0);
        let pair = call("divmod", &[new_int(a), new_int(b)]).unwrap();
        let pair = pair.downcast_ref::<Tuple>().unwrap();
        let q = as_int(&pair.items()[0]).unwrap();
        let r = as_int(&pair.items()[1]).unwrap();

        prop_assert_eq!(q * b + r, a);
        prop_assert!(r.abs() < b.abs());
        prop_assert!(r == 0 || (r < 0) == (b < 0));
    }

    #[test]
    fn min_max_agree_with_iterator(values in prop::collection::vec(any::<i64>(), 1..50)) {
        let list = ints(&values);
        let lo = as_int(&call("min", &[list.clone()]).unwrap()).unwrap();
        let hi = as_int(&call("max", &[list]).unwrap()).unwrap();
        prop_assert_eq!(lo, *values.iter().min().unwrap());
        prop_assert_eq!(hi, *values.iter().max().unwrap());
    }

    #[test]
    fn sum_matches_iterator(values in prop::collection::vec(-1_000_000i64..1_000_000, 0..50)) {
        let total = as_int(&call("sum", &[ints(&values)]).unwrap()).unwrap();
        prop_assert_eq!(total, values.iter().sum::<i64>());
    }

    #[test]
    fn isinstance_follows_class_chain(depth in 1usize..6, pick in 0usize..6, level in 0usize..6) {
        let chain = class_chain(depth);
        let pick = pick % depth;
        let level = level % depth;
        let cls: ObjRef = chain[pick].clone();
        let obj = protocol::call(&cls, &[]).unwrap();
        let target: ObjRef = chain[level].clone();

        let result = call("isinstance", &[obj, target.clone()]).unwrap();
        prop_assert_eq!(protocol::is_truthy(&result).unwrap(), level <= pick);

        let sub = call("issubclass", &[cls, target]).unwrap();
        prop_assert_eq!(protocol::is_truthy(&sub).unwrap(), level <= pick);
    }
}
