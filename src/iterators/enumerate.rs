//! `enumerate(iterable, start=0)`

use std::cell::Cell;
use std::rc::Rc;

use super::{iter_self, next_impl, IteratorState};
use crate::errors::{Exception, RtResult};
use crate::logging::log_iterator_created;
use crate::objects::{
    native_type, new_int, new_tuple, ClassRef, FuncArgs, NativeType, ObjRef, Object,
};
use crate::protocol;

/// Pairs each item with a running counter
///
/// The counter becomes `None` once it has passed `i64::MAX`; the overflow is
/// reported on the following step, before the source is advanced.
#[derive(Debug)]
pub struct Enumerate {
    source: ObjRef,
    counter: Cell<Option<i64>>,
}

impl Enumerate {
    pub fn new(iterable: &ObjRef, start: i64) -> RtResult<Self> {
        let source = protocol::get_iter(iterable)?;
        log_iterator_created("enumerate");
        Ok(Self {
            source,
            counter: Cell::new(Some(start)),
        })
    }
}

impl Object for Enumerate {
    fn class(&self) -> ClassRef {
        enumerate_type()
    }
}

impl IteratorState for Enumerate {
    fn step(&self) -> RtResult<Option<ObjRef>> {
        let index = self.counter.get().ok_or_else(Exception::integer_overflow)?;
        let Some(item) = protocol::next(&self.source)? else {
            return Ok(None);
        };
        self.counter.set(index.checked_add(1));
        Ok(Some(new_tuple(vec![new_int(index), item])))
    }
}

native_type!(pub fn enumerate_type() = NativeType::new("enumerate")
    .method("__iter__", iter_self)
    .method("__next__", next_impl::<Enumerate>)
    .constructor(enumerate_new)
    .build());

fn enumerate_new(mut args: FuncArgs) -> RtResult<ObjRef> {
    let keyword_start = args.take_keyword("start");
    args.check_kwargs_empty("enumerate")?;
    args.check_arity("enumerate", 1, 2)?;

    let start = match (args.optional(1), keyword_start) {
        (Some(_), Some(_)) => {
            return Err(Exception::type_error(
                "argument for enumerate() given by name ('start') and position (2)",
            ))
        }
        (Some(start), None) | (None, Some(start)) => protocol::index(&start)?,
        (None, None) => 0,
    };
    Ok(Rc::new(Enumerate::new(&args.args[0], start)?))
}
