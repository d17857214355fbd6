//! Sequence builtins: `sum`, `sorted`, `reversed` and the list sort they share

use crate::errors::{Exception, RtResult};
use crate::iterators::reverse_iter;
use crate::logging::log_sort_phase;
use crate::objects::{is_none, new_int, new_list, FuncArgs, ObjRef, Str};
use crate::protocol::{self, BinaryOp};
use crate::sort::{timsort, KeyedComparator, RichComparator};

/// `start + item0 + item1 + ...` through the addition capability
pub fn sum(iterable: &ObjRef, start: Option<ObjRef>) -> RtResult<ObjRef> {
    let mut total = start.unwrap_or_else(|| new_int(0));
    if total.is::<Str>() {
        return Err(Exception::type_error(
            "sum() can't sum strings [use ''.join(seq) instead]",
        ));
    }
    for item in protocol::iterate(iterable)? {
        total = protocol::binary_op(&total, &item?, BinaryOp::Add)?;
    }
    Ok(total)
}

/// Stable Timsort of `items`, optionally by `key` and/or descending
///
/// Descending order reverses before and after sorting so equal elements
/// keep their original relative order.
pub fn sort_items(
    mut items: Vec<ObjRef>,
    key: Option<ObjRef>,
    reverse: Option<ObjRef>,
) -> RtResult<Vec<ObjRef>> {
    let key = key.filter(|k| !is_none(k));
    let descending = match reverse {
        Some(flag) => protocol::is_truthy(&flag)?,
        None => false,
    };
    log_sort_phase("sorted", "start", items.len());

    match key {
        None => {
            if descending {
                items.reverse();
            }
            timsort(&mut items, &mut RichComparator)?;
            if descending {
                items.reverse();
            }
            Ok(items)
        }
        Some(key) => {
            let mut pairs = items
                .into_iter()
                .map(|item| Ok((protocol::call(&key, &[item.clone()])?, item)))
                .collect::<RtResult<Vec<_>>>()?;
            if descending {
                pairs.reverse();
            }
            timsort(&mut pairs, &mut KeyedComparator)?;
            if descending {
                pairs.reverse();
            }
            Ok(pairs.into_iter().map(|(_, item)| item).collect())
        }
    }
}

/// New sorted list from any iterable
pub fn sorted(iterable: &ObjRef, key: Option<ObjRef>, reverse: Option<ObjRef>) -> RtResult<ObjRef> {
    let items = protocol::collect(iterable)?;
    sort_items(items, key, reverse).map(new_list)
}

pub fn reversed(seq: &ObjRef) -> RtResult<ObjRef> {
    reverse_iter(seq)
}

pub(super) fn builtin_sum(mut args: FuncArgs) -> RtResult<ObjRef> {
    let keyword_start = args.take_keyword("start");
    args.check_kwargs_empty("sum")?;
    args.check_arity("sum", 1, 2)?;
    let start = args.optional(1).or(keyword_start);
    sum(&args.args[0], start)
}

pub(super) fn builtin_sorted(mut args: FuncArgs) -> RtResult<ObjRef> {
    let key = args.take_keyword("key");
    let reverse = args.take_keyword("reverse");
    args.check_kwargs_empty("sorted")?;
    args.check_arity("sorted", 1, 1)?;
    sorted(&args.args[0], key, reverse)
}
