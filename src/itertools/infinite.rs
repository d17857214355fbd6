//! Endless iterators: `count(start=0, step=1)` and `cycle(iterable)`

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::errors::{Exception, RtResult};
use crate::iterators::{iter_self, next_impl, IteratorState};
use crate::logging::log_iterator_created;
use crate::numeric::coerce_numeric;
use crate::objects::{
    native_type, new_int, new_str, ClassRef, FuncArgs, Int, NativeType, ObjRef, Object,
};
use crate::protocol::{self, BinaryOp};

/// `start, start + step, start + 2*step, ...`
#[derive(Debug)]
pub struct Count {
    current: RefCell<ObjRef>,
    step: ObjRef,
}

impl Count {
    pub fn new(start: ObjRef, step: ObjRef) -> RtResult<Self> {
        for value in [&start, &step] {
            if coerce_numeric(value).is_none() {
                return Err(Exception::type_error("a number is required"));
            }
        }
        log_iterator_created("count");
        Ok(Self {
            current: RefCell::new(start),
            step,
        })
    }
}

impl Object for Count {
    fn class(&self) -> ClassRef {
        count_type()
    }
}

impl IteratorState for Count {
    fn step(&self) -> RtResult<Option<ObjRef>> {
        let value = self.current.borrow().clone();
        let next = protocol::binary_op(&value, &self.step, BinaryOp::Add)?;
        *self.current.borrow_mut() = next;
        Ok(Some(value))
    }
}

native_type!(pub fn count_type() = NativeType::new("count")
    .method("__iter__", iter_self)
    .method("__next__", next_impl::<Count>)
    .method("__repr__", count_repr)
    .constructor(count_new)
    .build());

fn count_new(mut args: FuncArgs) -> RtResult<ObjRef> {
    let keyword_start = args.take_keyword("start");
    let keyword_step = args.take_keyword("step");
    args.check_kwargs_empty("count")?;
    args.check_arity("count", 0, 2)?;

    let start = args.optional(0).or(keyword_start).unwrap_or_else(|| new_int(0));
    let step = args.optional(1).or(keyword_step).unwrap_or_else(|| new_int(1));
    Ok(Rc::new(Count::new(start, step)?))
}

fn count_repr(args: FuncArgs) -> RtResult<ObjRef> {
    let count = args.receiver::<Count>("__repr__")?;
    let current = protocol::repr(&count.current.borrow())?;
    let text = match count.step.downcast_ref::<Int>() {
        Some(Int(1)) => format!("count({})", current),
        _ => format!("count({}, {})", current, protocol::repr(&count.step)?),
    };
    Ok(new_str(text))
}

/// Replays the items of the source forever, saving them on the first pass
#[derive(Debug)]
pub struct Cycle {
    source: ObjRef,
    saved: RefCell<Vec<ObjRef>>,
    source_done: Cell<bool>,
    position: Cell<usize>,
}

impl Cycle {
    pub fn new(iterable: &ObjRef) -> RtResult<Self> {
        let source = protocol::get_iter(iterable)?;
        log_iterator_created("cycle");
        Ok(Self {
            source,
            saved: RefCell::new(Vec::new()),
            source_done: Cell::new(false),
            position: Cell::new(0),
        })
    }
}

impl Object for Cycle {
    fn class(&self) -> ClassRef {
        cycle_type()
    }
}

impl IteratorState for Cycle {
    fn step(&self) -> RtResult<Option<ObjRef>> {
        if !self.source_done.get() {
            match protocol::next(&self.source)? {
                Some(item) => {
                    self.saved.borrow_mut().push(item.clone());
                    return Ok(Some(item));
                }
                None => self.source_done.set(true),
            }
        }

        let saved = self.saved.borrow();
        if saved.is_empty() {
            return Ok(None);
        }
        let position = self.position.get() % saved.len();
        self.position.set(position + 1);
        Ok(Some(saved[position].clone()))
    }
}

native_type!(pub fn cycle_type() = NativeType::new("cycle")
    .method("__iter__", iter_self)
    .method("__next__", next_impl::<Cycle>)
    .constructor(cycle_new)
    .build());

fn cycle_new(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_kwargs_empty("cycle")?;
    args.check_arity("cycle", 1, 1)?;
    Ok(Rc::new(Cycle::new(&args.args[0])?))
}
