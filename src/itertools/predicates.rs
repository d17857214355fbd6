//! Predicate-driven selection: `dropwhile`, `filterfalse`, `compress`

use std::cell::Cell;
use std::rc::Rc;

use crate::errors::{Exception, RtResult};
use crate::iterators::{iter_self, next_impl, IteratorState};
use crate::logging::log_iterator_created;
use crate::objects::{is_none, native_type, ClassRef, FuncArgs, NativeType, ObjRef, Object};
use crate::protocol;

fn callable_predicate(predicate: &ObjRef) -> RtResult<ObjRef> {
    if protocol::is_callable(predicate) {
        Ok(predicate.clone())
    } else {
        Err(Exception::not_callable(&predicate.type_name()))
    }
}

fn accepts(predicate: &ObjRef, item: &ObjRef) -> RtResult<bool> {
    let verdict = protocol::call(predicate, &[item.clone()])?;
    protocol::is_truthy(&verdict)
}

/// Skips items while the predicate holds, then yields everything
#[derive(Debug)]
pub struct DropWhile {
    predicate: ObjRef,
    source: ObjRef,
    dropping: Cell<bool>,
}

impl DropWhile {
    pub fn new(predicate: &ObjRef, iterable: &ObjRef) -> RtResult<Self> {
        let predicate = callable_predicate(predicate)?;
        let source = protocol::get_iter(iterable)?;
        log_iterator_created("dropwhile");
        Ok(Self {
            predicate,
            source,
            dropping: Cell::new(true),
        })
    }
}

impl Object for DropWhile {
    fn class(&self) -> ClassRef {
        dropwhile_type()
    }
}

impl IteratorState for DropWhile {
    fn step(&self) -> RtResult<Option<ObjRef>> {
        while self.dropping.get() {
            let Some(item) = protocol::next(&self.source)? else {
                return Ok(None);
            };
            if !accepts(&self.predicate, &item)? {
                self.dropping.set(false);
                return Ok(Some(item));
            }
        }
        protocol::next(&self.source)
    }
}

/// Yields the items the predicate rejects; `None` means plain truthiness
#[derive(Debug)]
pub struct FilterFalse {
    predicate: Option<ObjRef>,
    source: ObjRef,
}

impl FilterFalse {
    pub fn new(predicate: &ObjRef, iterable: &ObjRef) -> RtResult<Self> {
        let predicate = if is_none(predicate) {
            None
        } else {
            Some(callable_predicate(predicate)?)
        };
        let source = protocol::get_iter(iterable)?;
        log_iterator_created("filterfalse");
        Ok(Self { predicate, source })
    }
}

impl Object for FilterFalse {
    fn class(&self) -> ClassRef {
        filterfalse_type()
    }
}

impl IteratorState for FilterFalse {
    fn step(&self) -> RtResult<Option<ObjRef>> {
        while let Some(item) = protocol::next(&self.source)? {
            let keep = match &self.predicate {
                None => protocol::is_truthy(&item)?,
                Some(predicate) => accepts(predicate, &item)?,
            };
            if !keep {
                return Ok(Some(item));
            }
        }
        Ok(None)
    }
}

/// Yields `data` items whose paired selector is truthy
#[derive(Debug)]
pub struct Compress {
    data: ObjRef,
    selectors: ObjRef,
}

impl Compress {
    pub fn new(data: &ObjRef, selectors: &ObjRef) -> RtResult<Self> {
        let data = protocol::get_iter(data)?;
        let selectors = protocol::get_iter(selectors)?;
        log_iterator_created("compress");
        Ok(Self { data, selectors })
    }
}

impl Object for Compress {
    fn class(&self) -> ClassRef {
        compress_type()
    }
}

impl IteratorState for Compress {
    fn step(&self) -> RtResult<Option<ObjRef>> {
        loop {
            let Some(item) = protocol::next(&self.data)? else {
                return Ok(None);
            };
            let Some(selector) = protocol::next(&self.selectors)? else {
                return Ok(None);
            };
            if protocol::is_truthy(&selector)? {
                return Ok(Some(item));
            }
        }
    }
}

native_type!(pub fn dropwhile_type() = NativeType::new("dropwhile")
    .method("__iter__", iter_self)
    .method("__next__", next_impl::<DropWhile>)
    .constructor(dropwhile_new)
    .build());

native_type!(pub fn filterfalse_type() = NativeType::new("filterfalse")
    .method("__iter__", iter_self)
    .method("__next__", next_impl::<FilterFalse>)
    .constructor(filterfalse_new)
    .build());

native_type!(pub fn compress_type() = NativeType::new("compress")
    .method("__iter__", iter_self)
    .method("__next__", next_impl::<Compress>)
    .constructor(compress_new)
    .build());

fn dropwhile_new(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_kwargs_empty("dropwhile")?;
    args.check_arity("dropwhile", 2, 2)?;
    Ok(Rc::new(DropWhile::new(&args.args[0], &args.args[1])?))
}

fn filterfalse_new(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_kwargs_empty("filterfalse")?;
    args.check_arity("filterfalse", 2, 2)?;
    Ok(Rc::new(FilterFalse::new(&args.args[0], &args.args[1])?))
}

fn compress_new(mut args: FuncArgs) -> RtResult<ObjRef> {
    let data = args.take_keyword("data");
    let selectors = args.take_keyword("selectors");
    args.check_kwargs_empty("compress")?;
    args.check_arity("compress", 0, 2)?;
    let data = args.optional(0).or(data);
    let selectors = args.optional(1).or(selectors);
    match (data, selectors) {
        (Some(data), Some(selectors)) => Ok(Rc::new(Compress::new(&data, &selectors)?)),
        _ => Err(Exception::type_error(
            "compress() missing required argument 'data' or 'selectors'",
        )),
    }
}
