//! Iterator pipelines built from the `builtins` and `itertools` tables

use proptest::prelude::*;
use pybuiltins::objects::{
    as_int, as_str, new_bool, new_function, new_int, new_list, new_str, none, Module, ObjRef, Tuple,
};
use pybuiltins::{builtins, itertools, protocol, ExceptionKind, FuncArgs, RtResult};

fn builtin(name: &str) -> ObjRef {
    builtins::lookup(name).unwrap_or_else(|| panic!("no builtin named {}", name))
}

fn tool(name: &str) -> ObjRef {
    let module = itertools::module();
    module
        .downcast_ref::<Module>()
        .and_then(|m| m.get(name))
        .unwrap_or_else(|| panic!("no itertools member {}", name))
}

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

fn take_ints(iterator: &ObjRef, n: usize) -> Vec<i64> {
    (0..n)
        .map(|_| as_int(&protocol::next(iterator).unwrap().unwrap()).unwrap())
        .collect()
}

fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    (0..k).fold(1, |acc, i| acc * (n - i) / (i + 1))
}

fn range(args: &[i64]) -> RtResult<ObjRef> {
    let args: Vec<ObjRef> = args.iter().copied().map(new_int).collect();
    protocol::call(&builtin("range"), &args)
}

#[test]
fn test_enumerate_then_zip() {
    let letters = new_list(vec![new_str("x"), new_str("y")]);
    let args = FuncArgs::positional(&[letters]).with_kwarg("start", new_int(5));
    let numbered = protocol::call_with(&builtin("enumerate"), args).unwrap();
    let zipped = protocol::call(&builtin("zip"), &[numbered, ints(&[10, 20, 30])]).unwrap();

    let rows = protocol::collect(&zipped).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(protocol::repr(&rows[1]).unwrap(), "((6, 'y'), 20)");
}

#[test]
fn test_filter_none_over_map() {
    let halve = new_function("halve", |args: FuncArgs| {
        Ok(new_int(as_int(&args.args[0]).unwrap_or(0) / 2))
    });
    let mapped = protocol::call(&builtin("map"), &[halve, ints(&[1, 2, 3, 4, 5])]).unwrap();
    let kept = protocol::call(&builtin("filter"), &[none(), mapped]).unwrap();
    assert_eq!(drain_ints(&kept), [1, 1, 2, 2]);
}

#[test]
fn test_iter_with_sentinel_through_builtin() {
    let source = protocol::get_iter(&ints(&[4, 7, 0, 9])).unwrap();
    let reader = new_function("read", move |_args: FuncArgs| {
        protocol::next(&source).map(|v| v.unwrap_or_else(none))
    });
    let it = protocol::call(&builtin("iter"), &[reader, new_int(0)]).unwrap();
    assert_eq!(drain_ints(&it), [4, 7]);
}

#[test]
fn test_next_default_after_exhaustion() {
    let it = protocol::call(&builtin("iter"), &[ints(&[1])]).unwrap();
    let next = builtin("next");
    assert_eq!(as_int(&protocol::call(&next, &[it.clone()]).unwrap()), Some(1));

    let fallback = protocol::call(&next, &[it.clone(), new_str("done")]).unwrap();
    assert_eq!(as_str(&fallback), Some("done"));

    let err = protocol::call(&next, &[it]).unwrap_err();
    assert!(err.is(ExceptionKind::StopIteration));
}

#[test]
fn test_range_edge_cases() {
    assert_eq!(drain_ints(&range(&[5]).unwrap()), [0, 1, 2, 3, 4]);
    assert_eq!(drain_ints(&range(&[10, 0, -3]).unwrap()), [10, 7, 4, 1]);
    assert!(drain_ints(&range(&[3, 3]).unwrap()).is_empty());

    let err = range(&[0, 5, 0]).unwrap_err();
    assert!(err.is(ExceptionKind::ValueError));
    assert_eq!(err.message, "range() arg 3 must not be zero");
}

#[test]
fn test_reversed_range_and_list() {
    let backwards = protocol::call(&builtin("reversed"), &[range(&[1, 8, 3]).unwrap()]).unwrap();
    assert_eq!(drain_ints(&backwards), [7, 4, 1]);

    let backwards = protocol::call(&builtin("reversed"), &[ints(&[1, 2, 3])]).unwrap();
    assert_eq!(drain_ints(&backwards), [3, 2, 1]);
}

#[test]
fn test_itertools_pipeline() {
    let counter = protocol::call(&tool("count"), &[new_int(1)]).unwrap();
    let small = new_function("small", |args: FuncArgs| {
        Ok(new_bool(as_int(&args.args[0]).unwrap_or(0) < 4))
    });
    let tail = protocol::call(&tool("dropwhile"), &[small, counter]).unwrap();
    assert_eq!(take_ints(&tail, 3), [4, 5, 6]);

    let joined = protocol::call(&tool("chain"), &[ints(&[1, 2]), ints(&[]), ints(&[3])]).unwrap();
    let totals = protocol::call(&tool("accumulate"), &[joined]).unwrap();
    assert_eq!(drain_ints(&totals), [1, 3, 6]);

    let selectors = ints(&[1, 0, 1]);
    let picked = protocol::call(&tool("compress"), &[ints(&[1, 2, 3, 4]), selectors]).unwrap();
    assert_eq!(drain_ints(&picked), [1, 3]);
}

#[test]
fn test_zip_pairs_are_tuples() {
    let zipped = protocol::call(&builtin("zip"), &[ints(&[1, 2]), ints(&[3, 4])]).unwrap();
    let first = protocol::next(&zipped).unwrap().unwrap();
    assert_eq!(first.downcast_ref::<Tuple>().unwrap().len(), 2);
}

proptest! {
    #[test]
    fn range_matches_step_by(start in -50i64..50, stop in -50i64..50, step in -7i64..7) {
        prop_assume!(step != 0);
        let expected: Vec<i64> = if step > 0 {
            (start..stop).step_by(step as usize).collect()
        } else {
            let mut values = Vec::new();
            let mut v = start;
            while v > stop {
                values.push(v);
                v += step;
            }
            values
        };

        let r = range(&[start, stop, step]).unwrap();
        let len = protocol::call(&builtin("len"), &[r.clone()]).unwrap();
        prop_assert_eq!(as_int(&len), Some(expected.len() as i64));
        prop_assert_eq!(drain_ints(&r), expected);
    }

    #[test]
    fn accumulate_yields_prefix_sums(values in prop::collection::vec(-1000i64..1000, 0..40)) {
        let totals = protocol::call(&tool("accumulate"), &[ints(&values)]).unwrap();
        let expected: Vec<i64> = values
            .iter()
            .scan(0, |acc, &v| {
                *acc += v;
                Some(*acc)
            })
            .collect();
        prop_assert_eq!(drain_ints(&totals), expected);
    }

    #[test]
    fn cycle_repeats_source(values in prop::collection::vec(any::<i64>(), 1..10), n in 0usize..40) {
        let cycled = protocol::call(&tool("cycle"), &[ints(&values)]).unwrap();
        let expected: Vec<i64> = values.iter().copied().cycle().take(n).collect();
        prop_assert_eq!(take_ints(&cycled, n), expected);
    }

    #[test]
    fn filterfalse_complements_filter(values in prop::collection::vec(-20i64..20, 0..40)) {
        let odd = new_function("odd", |args: FuncArgs| {
            Ok(new_int(as_int(&args.args[0]).unwrap_or(0).rem_euclid(2)))
        });
        let kept = protocol::call(&builtin("filter"), &[odd.clone(), ints(&values)]).unwrap();
        let dropped = protocol::call(&tool("filterfalse"), &[odd, ints(&values)]).unwrap();

        let kept = drain_ints(&kept);
        let dropped = drain_ints(&dropped);
        prop_assert_eq!(kept.len() + dropped.len(), values.len());
        prop_assert!(kept.iter().all(|v| v.rem_euclid(2) == 1));
        prop_assert!(dropped.iter().all(|v| v.rem_euclid(2) == 0));
    }

    #[test]
    fn combination_counts_are_binomial(n in 0usize..7, r in 0usize..5) {
        let pool: Vec<i64> = (0..n as i64).collect();
        let r_obj = new_int(r as i64);

        let plain = protocol::call(&tool("combinations"), &[ints(&pool), r_obj.clone()]).unwrap();
        let plain = protocol::collect(&plain).unwrap();
        prop_assert_eq!(plain.len(), binomial(n, r));

        let repeated = protocol::call(&tool("combinations_with_replacement"), &[ints(&pool), r_obj])
            .unwrap();
        let repeated = protocol::collect(&repeated).unwrap();
        let expected = if n == 0 { usize::from(r == 0) } else { binomial(n + r - 1, r) };
        prop_assert_eq!(repeated.len(), expected);

        for row in plain.iter().chain(repeated.iter()) {
            let values: Vec<i64> = row
                .downcast_ref::<Tuple>()
                .unwrap()
                .items()
                .iter()
                .map(|v| as_int(v).unwrap())
                .collect();
            prop_assert_eq!(values.len(), r);
            prop_assert!(values.windows(2).all(|w| w[0] <= w[1]));
        }
    }
}
