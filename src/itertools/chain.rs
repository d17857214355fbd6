//! `chain(*iterables)` and `chain.from_iterable(iterable)`

use std::cell::RefCell;
use std::rc::Rc;

use crate::errors::RtResult;
use crate::iterators::{iter_self, next_impl, IteratorState};
use crate::logging::log_iterator_created;
use crate::objects::{native_type, new_tuple, ClassRef, FuncArgs, NativeType, ObjRef, Object};
use crate::protocol;

/// Drains each iterable in turn
///
/// The outer iterable is consumed lazily, one inner iterable at a time.
#[derive(Debug)]
pub struct Chain {
    sources: ObjRef,
    active: RefCell<Option<ObjRef>>,
}

impl Chain {
    /// Chain over the items of `iterables`
    pub fn from_iterable(iterables: &ObjRef) -> RtResult<Self> {
        let sources = protocol::get_iter(iterables)?;
        log_iterator_created("chain");
        Ok(Self {
            sources,
            active: RefCell::new(None),
        })
    }

    pub fn new(iterables: &[ObjRef]) -> RtResult<Self> {
        Self::from_iterable(&new_tuple(iterables.to_vec()))
    }
}

impl Object for Chain {
    fn class(&self) -> ClassRef {
        chain_type()
    }
}

impl IteratorState for Chain {
    fn step(&self) -> RtResult<Option<ObjRef>> {
        loop {
            let active = self.active.borrow().clone();
            if let Some(active) = active {
                if let Some(item) = protocol::next(&active)? {
                    return Ok(Some(item));
                }
                *self.active.borrow_mut() = None;
            }

            match protocol::next(&self.sources)? {
                Some(iterable) => {
                    let iterator = protocol::get_iter(&iterable)?;
                    *self.active.borrow_mut() = Some(iterator);
                }
                None => return Ok(None),
            }
        }
    }
}

native_type!(pub fn chain_type() = NativeType::new("chain")
    .method("__iter__", iter_self)
    .method("__next__", next_impl::<Chain>)
    .classmethod("from_iterable", chain_from_iterable)
    .constructor(chain_new)
    .build());

fn chain_new(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_kwargs_empty("chain")?;
    Ok(Rc::new(Chain::new(&args.args)?))
}

/// Receives the class first, then the iterable of iterables
fn chain_from_iterable(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_kwargs_empty("from_iterable")?;
    args.check_arity("from_iterable", 2, 2)?;
    Ok(Rc::new(Chain::from_iterable(&args.args[1])?))
}
