//! `filter(predicate, iterable)`

use std::rc::Rc;

use super::{iter_self, next_impl, IteratorState};
use crate::errors::{Exception, RtResult};
use crate::logging::log_iterator_created;
use crate::objects::{is_none, native_type, ClassRef, FuncArgs, NativeType, ObjRef, Object};
use crate::protocol;

/// Yields the items the predicate accepts; `None` means plain truthiness
#[derive(Debug)]
pub struct Filter {
    source: ObjRef,
    predicate: Option<ObjRef>,
}

impl Filter {
    pub fn new(predicate: &ObjRef, iterable: &ObjRef) -> RtResult<Self> {
        let predicate = if is_none(predicate) {
            None
        } else if protocol::is_callable(predicate) {
            Some(predicate.clone())
        } else {
            return Err(Exception::not_callable(&predicate.type_name()));
        };
        let source = protocol::get_iter(iterable)?;
        log_iterator_created("filter");
        Ok(Self { source, predicate })
    }
}

impl Object for Filter {
    fn class(&self) -> ClassRef {
        filter_type()
    }
}

impl IteratorState for Filter {
    fn step(&self) -> RtResult<Option<ObjRef>> {
        while let Some(item) = protocol::next(&self.source)? {
            let keep = match &self.predicate {
                None => protocol::is_truthy(&item)?,
                Some(predicate) => {
                    let verdict = protocol::call(predicate, &[item.clone()])?;
                    protocol::is_truthy(&verdict)?
                }
            };
            if keep {
                return Ok(Some(item));
            }
        }
        Ok(None)
    }
}

native_type!(pub fn filter_type() = NativeType::new("filter")
    .method("__iter__", iter_self)
    .method("__next__", next_impl::<Filter>)
    .constructor(filter_new)
    .build());

fn filter_new(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_kwargs_empty("filter")?;
    args.check_arity("filter", 2, 2)?;
    Ok(Rc::new(Filter::new(&args.args[0], &args.args[1])?))
}
