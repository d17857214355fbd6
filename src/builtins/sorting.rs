//! Sort entry points: `insertion_sort`, `merge_sort`, `timsort`

use crate::errors::RtResult;
use crate::objects::{is_none, none, FuncArgs, ObjRef};
use crate::protocol;
use crate::sort::{insertion_sort_list, merge_sort_iterable, timsort_list};

fn optional_bound(value: Option<ObjRef>) -> RtResult<Option<i64>> {
    match value {
        Some(v) if !is_none(&v) => protocol::index(&v).map(Some),
        _ => Ok(None),
    }
}

/// `insertion_sort(list, left=None, right=None)`, in place
pub(super) fn builtin_insertion_sort(mut args: FuncArgs) -> RtResult<ObjRef> {
    let keyword_left = args.take_keyword("left");
    let keyword_right = args.take_keyword("right");
    args.check_kwargs_empty("insertion_sort")?;
    args.check_arity("insertion_sort", 1, 3)?;
    let left = optional_bound(args.optional(1).or(keyword_left))?;
    let right = optional_bound(args.optional(2).or(keyword_right))?;
    insertion_sort_list(&args.args[0], left, right)?;
    Ok(none())
}

/// `merge_sort(iterable)`, returning a new list
pub(super) fn builtin_merge_sort(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_kwargs_empty("merge_sort")?;
    args.check_arity("merge_sort", 1, 1)?;
    merge_sort_iterable(&args.args[0])
}

/// `timsort(list)`, in place
pub(super) fn builtin_timsort(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_kwargs_empty("timsort")?;
    args.check_arity("timsort", 1, 1)?;
    timsort_list(&args.args[0])?;
    Ok(none())
}
