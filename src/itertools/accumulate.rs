//! `accumulate(iterable, func=operator.add, *, initial=None)`

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::errors::{Exception, RtResult};
use crate::iterators::{iter_self, next_impl, IteratorState};
use crate::logging::log_iterator_created;
use crate::objects::{is_none, native_type, ClassRef, FuncArgs, NativeType, ObjRef, Object};
use crate::protocol::{self, BinaryOp};

/// Running totals; `initial` (when given) is yielded first
#[derive(Debug)]
pub struct Accumulate {
    source: ObjRef,
    func: Option<ObjRef>,
    total: RefCell<Option<ObjRef>>,
    started: Cell<bool>,
}

impl Accumulate {
    pub fn new(iterable: &ObjRef, func: Option<ObjRef>, initial: Option<ObjRef>) -> RtResult<Self> {
        let source = protocol::get_iter(iterable)?;
        if let Some(func) = &func {
            if !protocol::is_callable(func) {
                return Err(Exception::not_callable(&func.type_name()));
            }
        }
        log_iterator_created("accumulate");
        Ok(Self {
            source,
            func,
            total: RefCell::new(initial),
            started: Cell::new(false),
        })
    }

    fn combine(&self, total: &ObjRef, item: &ObjRef) -> RtResult<ObjRef> {
        match &self.func {
            Some(func) => protocol::call(func, &[total.clone(), item.clone()]),
            None => protocol::binary_op(total, item, BinaryOp::Add),
        }
    }
}

impl Object for Accumulate {
    fn class(&self) -> ClassRef {
        accumulate_type()
    }
}

impl IteratorState for Accumulate {
    fn step(&self) -> RtResult<Option<ObjRef>> {
        if !self.started.get() {
            self.started.set(true);
            if let Some(initial) = self.total.borrow().clone() {
                return Ok(Some(initial));
            }
        }

        let Some(item) = protocol::next(&self.source)? else {
            return Ok(None);
        };
        let current = self.total.borrow().clone();
        let next = match current {
            Some(total) => self.combine(&total, &item)?,
            None => item,
        };
        *self.total.borrow_mut() = Some(next.clone());
        Ok(Some(next))
    }
}

native_type!(pub fn accumulate_type() = NativeType::new("accumulate")
    .method("__iter__", iter_self)
    .method("__next__", next_impl::<Accumulate>)
    .constructor(accumulate_new)
    .build());

fn accumulate_new(mut args: FuncArgs) -> RtResult<ObjRef> {
    let keyword_func = args.take_keyword("func");
    let initial = args.take_keyword("initial").filter(|v| !is_none(v));
    args.check_kwargs_empty("accumulate")?;
    args.check_arity("accumulate", 1, 2)?;

    let func = match (args.optional(1), keyword_func) {
        (Some(_), Some(_)) => {
            return Err(Exception::type_error(
                "argument for accumulate() given by name ('func') and position (2)",
            ))
        }
        (Some(func), None) | (None, Some(func)) => Some(func).filter(|f| !is_none(f)),
        (None, None) => None,
    };
    Ok(Rc::new(Accumulate::new(&args.args[0], func, initial)?))
}
