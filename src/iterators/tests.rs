use std::cell::Cell;
use std::rc::Rc;

use super::*;
use crate::errors::{Exception, ExceptionKind, RtResult};
use crate::objects::{
    as_int, as_str, new_bool, new_dict, new_function, new_int, new_list, new_str, none,
    ClassBuilder, ClassRef, FuncArgs, ObjRef, Tuple,
};
use crate::protocol;

fn ints(values: &[i64]) -> ObjRef {
    new_list(values.iter().copied().map(new_int).collect())
}

fn drain_ints(iterator: &ObjRef) -> Vec<i64> {
    protocol::collect(iterator)
        .unwrap()
        .iter()
        .map(|v| as_int(v).unwrap())
        .collect()
}

fn construct(cls: ClassRef, args: &[ObjRef]) -> RtResult<ObjRef> {
    let cls: ObjRef = cls;
    protocol::call(&cls, args)
}

#[test]
fn test_enumerate_with_start() {
    let letters = new_list(vec![new_str("a"), new_str("b"), new_str("c")]);
    let it: ObjRef = Rc::new(Enumerate::new(&letters, 5).unwrap());

    let pairs = protocol::collect(&it).unwrap();
    assert_eq!(pairs.len(), 3);
    for (offset, pair) in pairs.iter().enumerate() {
        let pair = pair.downcast_ref::<Tuple>().unwrap();
        assert_eq!(as_int(&pair.items()[0]), Some(5 + offset as i64));
    }
    let last = pairs[2].downcast_ref::<Tuple>().unwrap();
    assert_eq!(as_str(&last.items()[1]), Some("c"));
}

#[test]
fn test_enumerate_empty() {
    let it: ObjRef = Rc::new(Enumerate::new(&ints(&[]), 0).unwrap());
    assert!(protocol::next(&it).unwrap().is_none());
}

#[test]
fn test_enumerate_start_keyword() {
    let cls: ObjRef = enumerate_type();
    let args = FuncArgs::positional(&[ints(&[7])]).with_kwarg("start", new_int(2));
    let it = protocol::call_with(&cls, args).unwrap();
    let first = protocol::next(&it).unwrap().unwrap();
    let first = first.downcast_ref::<Tuple>().unwrap();
    assert_eq!(as_int(&first.items()[0]), Some(2));
}

#[test]
fn test_enumerate_counter_at_i64_max() {
    let it: ObjRef = Rc::new(Enumerate::new(&ints(&[7, 8]), i64::MAX).unwrap());

    let first = protocol::next(&it).unwrap().unwrap();
    let first = first.downcast_ref::<Tuple>().unwrap();
    assert_eq!(as_int(&first.items()[0]), Some(i64::MAX));
    assert_eq!(as_int(&first.items()[1]), Some(7));

    let err = protocol::next(&it).unwrap_err();
    assert!(err.is(ExceptionKind::OverflowError));
}

#[test]
fn test_enumerate_overflow_leaves_source_unconsumed() {
    let source = protocol::get_iter(&ints(&[7, 8])).unwrap();
    let it: ObjRef = Rc::new(Enumerate::new(&source, i64::MAX).unwrap());
    protocol::next(&it).unwrap().unwrap();
    assert!(protocol::next(&it).is_err());

    assert_eq!(drain_ints(&source), vec![8]);
}

#[test]
fn test_enumerate_rejects_non_iterable() {
    let err = Enumerate::new(&new_int(3), 0).unwrap_err();
    assert!(err.is(ExceptionKind::TypeError));
    assert_eq!(err.message, "'int' object is not iterable");
}

#[test]
fn test_filter_none_uses_truthiness() {
    let data = new_list(vec![
        new_int(0),
        new_int(1),
        new_int(2),
        new_str(""),
        new_int(3),
    ]);
    let it: ObjRef = Rc::new(Filter::new(&none(), &data).unwrap());
    assert_eq!(drain_ints(&it), vec![1, 2, 3]);
}

#[test]
fn test_filter_calls_predicate_once_per_item() {
    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    let odd = new_function("odd", move |args| {
        counter.set(counter.get() + 1);
        Ok(new_bool(as_int(&args.args[0]).unwrap() % 2 == 1))
    });
    let it: ObjRef = Rc::new(Filter::new(&odd, &ints(&[1, 2, 3, 4, 5])).unwrap());
    assert_eq!(drain_ints(&it), vec![1, 3, 5]);
    assert_eq!(calls.get(), 5);
}

#[test]
fn test_filter_rejects_non_callable_predicate() {
    let err = Filter::new(&new_int(1), &ints(&[1])).unwrap_err();
    assert!(err.is(ExceptionKind::TypeError));
    assert_eq!(err.message, "'int' object is not callable");
}

#[test]
fn test_map_stops_at_shortest() {
    let add = new_function("add", |args| {
        protocol::binary_op(&args.args[0], &args.args[1], protocol::BinaryOp::Add)
    });
    let it: ObjRef = Rc::new(Map::new(&add, &[ints(&[1, 2, 3]), ints(&[10, 20])]).unwrap());
    assert_eq!(drain_ints(&it), vec![11, 22]);
}

#[test]
fn test_map_does_not_call_on_exhausted_step() {
    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    let ident = new_function("ident", move |args| {
        counter.set(counter.get() + 1);
        Ok(args.args[0].clone())
    });
    let it: ObjRef = Rc::new(Map::new(&ident, &[ints(&[4, 5])]).unwrap());
    assert_eq!(drain_ints(&it), vec![4, 5]);
    assert_eq!(calls.get(), 2);
}

#[test]
fn test_map_requires_a_sequence() {
    let cls = map_type();
    let ident = new_function("ident", |args| Ok(args.args[0].clone()));
    let err = construct(cls, &[ident]).unwrap_err();
    assert!(err.is(ExceptionKind::TypeError));
    assert_eq!(err.message, "map() must have at least two arguments.");
}

#[test]
fn test_map_rejects_non_callable() {
    let err = Map::new(&new_int(1), &[ints(&[1])]).unwrap_err();
    assert!(err.is(ExceptionKind::TypeError));
}

#[test]
fn test_callable_iterator_stops_at_sentinel() {
    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    let tick = new_function("tick", move |_| {
        counter.set(counter.get() + 1);
        Ok(new_int(counter.get()))
    });
    let it: ObjRef = Rc::new(SeqIter::callable(tick, new_int(4)).unwrap());
    assert_eq!(drain_ints(&it), vec![1, 2, 3]);
    assert_eq!(calls.get(), 4);

    assert!(protocol::next(&it).unwrap().is_none());
    assert_eq!(calls.get(), 4);
}

#[test]
fn test_callable_iterator_requires_callable() {
    let err = SeqIter::callable(new_int(1), new_int(0)).unwrap_err();
    assert!(err.is(ExceptionKind::TypeError));
    assert_eq!(err.message, "iter(v, w): v must be callable");
}

#[test]
fn test_indexed_iterator_over_getitem_class() {
    let cls = ClassBuilder::new("Squares")
        .method("__getitem__", |args| {
            let i = as_int(&args.args[1]).unwrap();
            if i >= 4 {
                return Err(Exception::index_error("done"));
            }
            Ok(new_int(i * i))
        })
        .build()
        .unwrap();
    let squares = construct(cls, &[]).unwrap();

    let it = protocol::get_iter(&squares).unwrap();
    assert_eq!(drain_ints(&it), vec![0, 1, 4, 9]);
}

#[test]
fn test_indexed_iterator_propagates_key_error() {
    let cls = ClassBuilder::new("Sparse")
        .method("__getitem__", |args| {
            let i = as_int(&args.args[1]).unwrap();
            if i >= 2 {
                return Err(Exception::key_error(i.to_string()));
            }
            Ok(new_int(i * 10))
        })
        .build()
        .unwrap();
    let sparse = construct(cls, &[]).unwrap();

    let it = protocol::get_iter(&sparse).unwrap();
    assert_eq!(as_int(&protocol::next(&it).unwrap().unwrap()), Some(0));
    assert_eq!(as_int(&protocol::next(&it).unwrap().unwrap()), Some(10));
    let err = protocol::next(&it).unwrap_err();
    assert!(err.is(ExceptionKind::KeyError));

    let err = protocol::collect(&protocol::get_iter(&sparse).unwrap()).unwrap_err();
    assert!(err.is(ExceptionKind::KeyError));
}

#[test]
fn test_indexed_iterator_key_error_at_first_index() {
    let cls = ClassBuilder::new("Keyed")
        .method("__getitem__", |_| Err(Exception::key_error("0")))
        .build()
        .unwrap();
    let keyed = construct(cls, &[]).unwrap();

    let it = protocol::get_iter(&keyed).unwrap();
    let err = protocol::next(&it).unwrap_err();
    assert!(err.is(ExceptionKind::KeyError));
    assert_eq!(err.message, "0");
}

#[test]
fn test_indexed_iterator_rewinds_on_iter() {
    let it: ObjRef = Rc::new(SeqIter::indexed(ints(&[1, 2])));
    assert_eq!(drain_ints(&it), vec![1, 2]);

    let again = protocol::get_iter(&it).unwrap();
    assert_eq!(drain_ints(&again), vec![1, 2]);
}

#[test]
fn test_zip_yields_tuples() {
    let it: ObjRef = Rc::new(Zip::new(&[ints(&[1, 2, 3]), ints(&[4, 5])]).unwrap());
    let rows = protocol::collect(&it).unwrap();
    assert_eq!(rows.len(), 2);
    let second = rows[1].downcast_ref::<Tuple>().unwrap();
    assert_eq!(as_int(&second.items()[0]), Some(2));
    assert_eq!(as_int(&second.items()[1]), Some(5));
}

#[test]
fn test_zip_without_sources_is_empty() {
    let it: ObjRef = Rc::new(Zip::new(&[]).unwrap());
    assert!(protocol::next(&it).unwrap().is_none());
}

#[test]
fn test_range_object_protocol() {
    let r = construct(range_type(), &[new_int(1), new_int(10), new_int(3)]).unwrap();
    assert_eq!(crate::builtins::len_of(&r).unwrap(), 3);
    assert_eq!(drain_ints(&protocol::get_iter(&r).unwrap()), vec![1, 4, 7]);
    assert_eq!(protocol::repr(&r).unwrap(), "range(1, 10, 3)");

    let last = protocol::call_special(&r, "__getitem__", &[new_int(-1)])
        .unwrap()
        .unwrap();
    assert_eq!(as_int(&last), Some(7));
}

#[test]
fn test_range_zero_step() {
    let err = construct(range_type(), &[new_int(0), new_int(5), new_int(0)]).unwrap_err();
    assert!(err.is(ExceptionKind::ValueError));
    assert_eq!(err.message, "range() arg 3 must not be zero");
}

#[test]
fn test_reversed_list_and_range() {
    assert_eq!(drain_ints(&reverse_iter(&ints(&[1, 2, 3])).unwrap()), vec![3, 2, 1]);

    let r = construct(range_type(), &[new_int(5)]).unwrap();
    assert_eq!(drain_ints(&reverse_iter(&r).unwrap()), vec![4, 3, 2, 1, 0]);
}

#[test]
fn test_reversed_rejects_dict_and_scalars() {
    let err = reverse_iter(&new_dict()).unwrap_err();
    assert_eq!(err.message, "'dict' object is not reversible");

    let err = reverse_iter(&new_int(3)).unwrap_err();
    assert!(err.is(ExceptionKind::TypeError));
    assert_eq!(err.message, "'int' object is not reversible");
}

#[test]
fn test_next_raises_stop_iteration() {
    let it: ObjRef = Rc::new(Zip::new(&[ints(&[])]).unwrap());
    let err = protocol::call_special(&it, "__next__", &[]).unwrap_err();
    assert!(err.is(ExceptionKind::StopIteration));
}
