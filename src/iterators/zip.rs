//! `zip(*iterables)`

use std::rc::Rc;

use smallvec::SmallVec;

use super::{iter_self, next_impl, IteratorState};
use crate::errors::RtResult;
use crate::logging::log_iterator_created;
use crate::objects::{native_type, new_tuple, ClassRef, FuncArgs, NativeType, ObjRef, Object};
use crate::protocol;

/// Tuples of one item from each source, ending with the shortest
#[derive(Debug)]
pub struct Zip {
    sources: SmallVec<[ObjRef; 2]>,
}

impl Zip {
    pub fn new(iterables: &[ObjRef]) -> RtResult<Self> {
        let sources = iterables
            .iter()
            .map(protocol::get_iter)
            .collect::<RtResult<SmallVec<_>>>()?;
        log_iterator_created("zip");
        Ok(Self { sources })
    }
}

impl Object for Zip {
    fn class(&self) -> ClassRef {
        zip_type()
    }
}

impl IteratorState for Zip {
    fn step(&self) -> RtResult<Option<ObjRef>> {
        if self.sources.is_empty() {
            return Ok(None);
        }
        let mut items = Vec::with_capacity(self.sources.len());
        for source in &self.sources {
            match protocol::next(source)? {
                Some(item) => items.push(item),
                None => return Ok(None),
            }
        }
        Ok(Some(new_tuple(items)))
    }
}

native_type!(pub fn zip_type() = NativeType::new("zip")
    .method("__iter__", iter_self)
    .method("__next__", next_impl::<Zip>)
    .constructor(zip_new)
    .build());

fn zip_new(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_kwargs_empty("zip")?;
    Ok(Rc::new(Zip::new(&args.args)?))
}
