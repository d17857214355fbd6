//! `isinstance` and `issubclass`

use std::rc::Rc;

use crate::errors::{Exception, RtResult};
use crate::objects::{as_class, new_bool, ClassRef, FuncArgs, ObjRef, Tuple};

/// A single class or a flat tuple of classes
fn candidates(spec: &ObjRef, message: &str) -> RtResult<Vec<ClassRef>> {
    if let Some(cls) = as_class(spec) {
        return Ok(vec![cls]);
    }
    let Some(tuple) = spec.downcast_ref::<Tuple>() else {
        return Err(Exception::type_error(message));
    };
    tuple
        .items()
        .iter()
        .map(|item| as_class(item).ok_or_else(|| Exception::type_error(message)))
        .collect()
}

fn mro_contains(cls: &ClassRef, candidates: &[ClassRef]) -> bool {
    let mro = cls.mro();
    candidates
        .iter()
        .any(|candidate| mro.iter().any(|ancestor| Rc::ptr_eq(ancestor, candidate)))
}

/// Whether any candidate appears in the resolution order of `obj`'s type
pub fn isinstance(obj: &ObjRef, classinfo: &ObjRef) -> RtResult<bool> {
    let candidates = candidates(
        classinfo,
        "isinstance() arg 2 must be a type or tuple of types",
    )?;
    Ok(mro_contains(&obj.class(), &candidates))
}

pub fn issubclass(cls: &ObjRef, classinfo: &ObjRef) -> RtResult<bool> {
    let cls = as_class(cls).ok_or_else(|| Exception::type_error("issubclass() arg 1 must be a class"))?;
    let candidates = candidates(
        classinfo,
        "issubclass() arg 2 must be a class or tuple of classes",
    )?;
    Ok(mro_contains(&cls, &candidates))
}

pub(super) fn builtin_isinstance(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_kwargs_empty("isinstance")?;
    args.check_arity("isinstance", 2, 2)?;
    isinstance(&args.args[0], &args.args[1]).map(new_bool)
}

pub(super) fn builtin_issubclass(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_kwargs_empty("issubclass")?;
    args.check_arity("issubclass", 2, 2)?;
    issubclass(&args.args[0], &args.args[1]).map(new_bool)
}
