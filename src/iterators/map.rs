//! `map(func, *iterables)`

use std::rc::Rc;

use smallvec::SmallVec;

use super::{iter_self, next_impl, IteratorState};
use crate::errors::{Exception, RtResult};
use crate::logging::log_iterator_created;
use crate::objects::{native_type, ClassRef, FuncArgs, NativeType, ObjRef, Object};
use crate::protocol;

/// Applies `func` to items drawn in lock-step from every source
#[derive(Debug)]
pub struct Map {
    func: ObjRef,
    sources: SmallVec<[ObjRef; 2]>,
}

impl Map {
    pub fn new(func: &ObjRef, iterables: &[ObjRef]) -> RtResult<Self> {
        if iterables.is_empty() {
            return Err(Exception::type_error("map() must have at least two arguments."));
        }
        if !protocol::is_callable(func) {
            return Err(Exception::not_callable(&func.type_name()));
        }
        let sources = iterables
            .iter()
            .map(protocol::get_iter)
            .collect::<RtResult<SmallVec<_>>>()?;
        log_iterator_created("map");
        Ok(Self {
            func: func.clone(),
            sources,
        })
    }
}

impl Object for Map {
    fn class(&self) -> ClassRef {
        map_type()
    }
}

impl IteratorState for Map {
    fn step(&self) -> RtResult<Option<ObjRef>> {
        let mut args = FuncArgs::default();
        for source in &self.sources {
            match protocol::next(source)? {
                Some(item) => args.args.push(item),
                None => return Ok(None),
            }
        }
        protocol::call_with(&self.func, args).map(Some)
    }
}

native_type!(pub fn map_type() = NativeType::new("map")
    .method("__iter__", iter_self)
    .method("__next__", next_impl::<Map>)
    .constructor(map_new)
    .build());

fn map_new(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_kwargs_empty("map")?;
    let Some((func, iterables)) = args.args.split_first() else {
        return Err(Exception::type_error("map() must have at least two arguments."));
    };
    Ok(Rc::new(Map::new(func, iterables)?))
}
