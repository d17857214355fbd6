//! `reversed(seq)`

use std::cell::Cell;
use std::rc::Rc;

use super::{iter_self, next_impl, IteratorState};
use crate::errors::{Exception, ExceptionKind, RtResult};
use crate::logging::log_iterator_created;
use crate::objects::{native_type, new_int, ClassRef, Dict, FuncArgs, NativeType, ObjRef, Object};
use crate::protocol;

/// Walks a sequence from `len - 1` down to 0 through `__getitem__`
#[derive(Debug)]
pub struct Reversed {
    target: ObjRef,
    /// Next index to fetch; negative once exhausted
    index: Cell<i64>,
}

impl Reversed {
    pub fn new(target: &ObjRef) -> RtResult<Self> {
        if target.is::<Dict>()
            || protocol::lookup_special(target, "__len__").is_none()
            || protocol::lookup_special(target, "__getitem__").is_none()
        {
            return Err(not_reversible(target));
        }
        let len = crate::builtins::len_of(target)?;
        let len = i64::try_from(len).map_err(|_| Exception::integer_overflow())?;
        log_iterator_created("reversed");
        Ok(Self {
            target: target.clone(),
            index: Cell::new(len - 1),
        })
    }
}

impl Object for Reversed {
    fn class(&self) -> ClassRef {
        reversed_type()
    }
}

impl IteratorState for Reversed {
    fn step(&self) -> RtResult<Option<ObjRef>> {
        let index = self.index.get();
        if index < 0 {
            return Ok(None);
        }
        match protocol::call_special(&self.target, "__getitem__", &[new_int(index)]) {
            Ok(Some(value)) => {
                self.index.set(index - 1);
                Ok(Some(value))
            }
            Ok(None) => Err(not_reversible(&self.target)),
            Err(err)
                if err.is(ExceptionKind::IndexError) || err.is(ExceptionKind::StopIteration) =>
            {
                self.index.set(-1);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}

fn not_reversible(target: &ObjRef) -> Exception {
    Exception::type_error(format!("'{}' object is not reversible", target.type_name()))
}

native_type!(pub fn reversed_type() = NativeType::new("reversed")
    .method("__iter__", iter_self)
    .method("__next__", next_impl::<Reversed>)
    .constructor(reversed_new)
    .build());

/// `__reversed__` when the type has one, else the sequence protocol
pub fn reverse_iter(seq: &ObjRef) -> RtResult<ObjRef> {
    if let Some(iterator) = protocol::call_special(seq, "__reversed__", &[])? {
        return Ok(iterator);
    }
    Ok(Rc::new(Reversed::new(seq)?))
}

fn reversed_new(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_kwargs_empty("reversed")?;
    args.check_arity("reversed", 1, 1)?;
    reverse_iter(&args.args[0])
}
