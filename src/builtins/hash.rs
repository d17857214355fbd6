//! `hash(obj)`

use crate::errors::{Exception, RtResult};
use crate::objects::{as_int, new_int, FuncArgs, ObjRef};
use crate::protocol;

fn unhashable(obj: &ObjRef) -> Exception {
    Exception::type_error(format!("unhashable type: '{}'", obj.type_name()))
}

/// Invoke the hash capability; absent or non-callable means unhashable
pub fn hash_of(obj: &ObjRef) -> RtResult<i64> {
    match protocol::lookup_special(obj, "__hash__") {
        Some(method) if protocol::is_callable(&method) => {}
        _ => return Err(unhashable(obj)),
    }
    let result = protocol::call_special(obj, "__hash__", &[])?.ok_or_else(|| unhashable(obj))?;
    as_int(&result)
        .ok_or_else(|| Exception::type_error("__hash__ method should return an integer"))
}

pub(super) fn builtin_hash(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_kwargs_empty("hash")?;
    args.check_arity("hash", 1, 1)?;
    hash_of(&args.args[0]).map(new_int)
}
