use std::rc::Rc;

use super::*;
use crate::errors::ExceptionKind;
use crate::objects::{
    as_int, new_bool, new_function, new_int, new_list, new_str, none, FuncArgs, Module, ObjRef,
};
use crate::protocol;

fn ints(values: &[i64]) -> ObjRef {
    new_list(values.iter().copied().map(new_int).collect())
}

fn take_ints(iterator: &ObjRef, n: usize) -> Vec<i64> {
    (0..n)
        .map(|_| as_int(&protocol::next(iterator).unwrap().unwrap()).unwrap())
        .collect()
}

fn drain_ints(iterator: &ObjRef) -> Vec<i64> {
    protocol::collect(iterator)
        .unwrap()
        .iter()
        .map(|v| as_int(v).unwrap())
        .collect()
}

fn less_than(limit: i64) -> ObjRef {
    new_function("less_than", move |args| {
        Ok(new_bool(as_int(&args.args[0]).unwrap() < limit))
    })
}

#[test]
fn test_accumulate_default_add() {
    let it: ObjRef = Rc::new(Accumulate::new(&ints(&[1, 2, 3, 4]), None, None).unwrap());
    assert_eq!(drain_ints(&it), vec![1, 3, 6, 10]);
}

#[test]
fn test_accumulate_with_func_and_initial() {
    let mul = new_function("mul", |args| {
        protocol::binary_op(&args.args[0], &args.args[1], protocol::BinaryOp::Mul)
    });
    let it: ObjRef =
        Rc::new(Accumulate::new(&ints(&[2, 3, 4]), Some(mul), Some(new_int(10))).unwrap());
    assert_eq!(drain_ints(&it), vec![10, 20, 60, 240]);
}

#[test]
fn test_accumulate_empty() {
    let it: ObjRef = Rc::new(Accumulate::new(&ints(&[]), None, None).unwrap());
    assert!(protocol::next(&it).unwrap().is_none());

    let seeded: ObjRef = Rc::new(Accumulate::new(&ints(&[]), None, Some(new_int(7))).unwrap());
    assert_eq!(drain_ints(&seeded), vec![7]);
}

#[test]
fn test_accumulate_initial_keyword() {
    let cls: ObjRef = accumulate_type();
    let args = FuncArgs::positional(&[ints(&[1, 2])]).with_kwarg("initial", new_int(100));
    let it = protocol::call_with(&cls, args).unwrap();
    assert_eq!(drain_ints(&it), vec![100, 101, 103]);
}

#[test]
fn test_chain_concatenates() {
    let it: ObjRef = Rc::new(Chain::new(&[ints(&[1, 2]), ints(&[]), ints(&[3])]).unwrap());
    assert_eq!(drain_ints(&it), vec![1, 2, 3]);
}

#[test]
fn test_chain_from_iterable_classmethod() {
    let cls: ObjRef = chain_type();
    let from_iterable = protocol::get_attr(&cls, "from_iterable").unwrap();
    let nested = new_list(vec![ints(&[1]), ints(&[2, 3])]);
    let it = protocol::call(&from_iterable, &[nested]).unwrap();
    assert_eq!(drain_ints(&it), vec![1, 2, 3]);
}

#[test]
fn test_chain_rejects_non_iterable_member_lazily() {
    let it: ObjRef = Rc::new(Chain::new(&[ints(&[1]), new_int(5)]).unwrap());
    assert_eq!(take_ints(&it, 1), vec![1]);
    let err = protocol::next(&it).unwrap_err();
    assert!(err.is(ExceptionKind::TypeError));
}

#[test]
fn test_count_is_endless() {
    let it: ObjRef = Rc::new(Count::new(new_int(10), new_int(-2)).unwrap());
    assert_eq!(take_ints(&it, 4), vec![10, 8, 6, 4]);
}

#[test]
fn test_count_defaults_and_repr() {
    let cls: ObjRef = count_type();
    let it = protocol::call(&cls, &[]).unwrap();
    assert_eq!(take_ints(&it, 3), vec![0, 1, 2]);
    assert_eq!(protocol::repr(&it).unwrap(), "count(3)");
}

#[test]
fn test_count_requires_numbers() {
    let err = Count::new(new_str("a"), new_int(1)).unwrap_err();
    assert!(err.is(ExceptionKind::TypeError));
    assert_eq!(err.message, "a number is required");
}

#[test]
fn test_cycle_repeats() {
    let it: ObjRef = Rc::new(Cycle::new(&ints(&[1, 2, 3])).unwrap());
    assert_eq!(take_ints(&it, 7), vec![1, 2, 3, 1, 2, 3, 1]);
}

#[test]
fn test_cycle_empty_ends() {
    let it: ObjRef = Rc::new(Cycle::new(&ints(&[])).unwrap());
    assert!(protocol::next(&it).unwrap().is_none());
}

#[test]
fn test_dropwhile() {
    let it: ObjRef = Rc::new(DropWhile::new(&less_than(5), &ints(&[1, 4, 6, 4, 1])).unwrap());
    assert_eq!(drain_ints(&it), vec![6, 4, 1]);
}

#[test]
fn test_filterfalse() {
    let it: ObjRef = Rc::new(FilterFalse::new(&less_than(5), &ints(&[1, 4, 6, 4, 9])).unwrap());
    assert_eq!(drain_ints(&it), vec![6, 9]);

    let it: ObjRef = Rc::new(FilterFalse::new(&none(), &ints(&[0, 1, 0, 2])).unwrap());
    assert_eq!(drain_ints(&it), vec![0, 0]);
}

#[test]
fn test_compress_uses_selectors() {
    let it: ObjRef = Rc::new(Compress::new(&ints(&[1, 2, 3, 4, 5]), &ints(&[1, 0, 1, 0])).unwrap());
    assert_eq!(drain_ints(&it), vec![1, 3]);
}

fn reprs(iterator: &ObjRef) -> Vec<String> {
    protocol::collect(iterator)
        .unwrap()
        .iter()
        .map(|v| protocol::repr(v).unwrap())
        .collect()
}

#[test]
fn test_combinations_lexicographic() {
    let it: ObjRef = Rc::new(Combinations::new(&ints(&[1, 2, 3, 4]), 2).unwrap());
    assert_eq!(
        reprs(&it),
        ["(1, 2)", "(1, 3)", "(1, 4)", "(2, 3)", "(2, 4)", "(3, 4)"]
    );
}

#[test]
fn test_combinations_edge_lengths() {
    let too_long: ObjRef = Rc::new(Combinations::new(&ints(&[1, 2]), 3).unwrap());
    assert!(protocol::next(&too_long).unwrap().is_none());

    let empty_pick: ObjRef = Rc::new(Combinations::new(&ints(&[1, 2]), 0).unwrap());
    assert_eq!(reprs(&empty_pick), ["()"]);

    let whole: ObjRef = Rc::new(Combinations::new(&ints(&[5, 6, 7]), 3).unwrap());
    assert_eq!(reprs(&whole), ["(5, 6, 7)"]);
}

#[test]
fn test_combinations_with_replacement_order() {
    let it: ObjRef = Rc::new(CombinationsWithReplacement::new(&ints(&[1, 2, 3]), 2).unwrap());
    assert_eq!(
        reprs(&it),
        ["(1, 1)", "(1, 2)", "(1, 3)", "(2, 2)", "(2, 3)", "(3, 3)"]
    );
}

#[test]
fn test_combinations_with_replacement_edges() {
    let empty_pool: ObjRef = Rc::new(CombinationsWithReplacement::new(&ints(&[]), 2).unwrap());
    assert!(protocol::next(&empty_pool).unwrap().is_none());

    let nothing: ObjRef = Rc::new(CombinationsWithReplacement::new(&ints(&[]), 0).unwrap());
    assert_eq!(reprs(&nothing), ["()"]);

    let longer: ObjRef = Rc::new(CombinationsWithReplacement::new(&ints(&[0, 1]), 3).unwrap());
    assert_eq!(
        reprs(&longer),
        ["(0, 0, 0)", "(0, 0, 1)", "(0, 1, 1)", "(1, 1, 1)"]
    );
}

#[test]
fn test_combinations_constructor_arguments() {
    let cls: ObjRef = combinations_type();
    let args = FuncArgs::positional(&[ints(&[1, 2, 3])]).with_kwarg("r", new_int(2));
    let it = protocol::call_with(&cls, args).unwrap();
    assert_eq!(reprs(&it).len(), 3);

    let err = protocol::call(&cls, &[ints(&[1]), new_int(-1)]).unwrap_err();
    assert!(err.is(ExceptionKind::ValueError));
    assert_eq!(err.message, "r must be non-negative");

    let err = protocol::call(&cls, &[ints(&[1])]).unwrap_err();
    assert!(err.is(ExceptionKind::TypeError));

    let cls: ObjRef = combinations_with_replacement_type();
    let err = protocol::call(&cls, &[new_int(3), new_int(1)]).unwrap_err();
    assert_eq!(err.message, "'int' object is not iterable");
}

#[test]
fn test_module_exposes_all_types() {
    let module = module();
    let module = module.downcast_ref::<Module>().unwrap();
    assert_eq!(
        module.names(),
        vec![
            "accumulate",
            "chain",
            "combinations",
            "combinations_with_replacement",
            "compress",
            "count",
            "cycle",
            "dropwhile",
            "filterfalse"
        ]
    );
}
