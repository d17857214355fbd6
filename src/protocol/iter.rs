//! Iteration protocol

use std::rc::Rc;

use crate::errors::{Exception, ExceptionKind, RtResult};
use crate::iterators::SeqIter;
use crate::objects::{List, ObjRef, Tuple};

use super::attr::{call_special, lookup_special};

/// `iter(obj)`: `__iter__`, else an indexed iterator over `__getitem__`
pub fn get_iter(obj: &ObjRef) -> RtResult<ObjRef> {
    if let Some(iterator) = call_special(obj, "__iter__", &[])? {
        if lookup_special(&iterator, "__next__").is_none() {
            return Err(Exception::type_error(format!(
                "iter() returned non-iterator of type '{}'",
                iterator.type_name()
            )));
        }
        return Ok(iterator);
    }
    if lookup_special(obj, "__getitem__").is_some() {
        return Ok(Rc::new(SeqIter::indexed(obj.clone())));
    }
    Err(Exception::not_iterable(&obj.type_name()))
}

/// Advance an iterator; `None` once it is exhausted
pub fn next(iterator: &ObjRef) -> RtResult<Option<ObjRef>> {
    if lookup_special(iterator, "__next__").is_none() {
        return Err(Exception::type_error(format!(
            "'{}' object is not an iterator",
            iterator.type_name()
        )));
    }
    match call_special(iterator, "__next__", &[]) {
        Ok(value) => Ok(value),
        Err(err) if err.is(ExceptionKind::StopIteration) => Ok(None),
        Err(err) => Err(err),
    }
}

/// Rust iterator over a runtime iterator
///
/// Yields each item or the first failure, then fuses.
#[derive(Debug)]
pub struct ObjIter {
    iterator: ObjRef,
    done: bool,
}

impl ObjIter {
    pub fn new(iterator: ObjRef) -> Self {
        Self {
            iterator,
            done: false,
        }
    }

    /// The wrapped runtime iterator
    pub fn as_obj(&self) -> &ObjRef {
        &self.iterator
    }
}

impl Iterator for ObjIter {
    type Item = RtResult<ObjRef>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match next(&self.iterator) {
            Ok(Some(value)) => Some(Ok(value)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

pub fn iterate(obj: &ObjRef) -> RtResult<ObjIter> {
    Ok(ObjIter::new(get_iter(obj)?))
}

/// Materialize any iterable into a vector
pub fn collect(obj: &ObjRef) -> RtResult<Vec<ObjRef>> {
    if let Some(list) = obj.downcast_ref::<List>() {
        return Ok(list.snapshot());
    }
    if let Some(tuple) = obj.downcast_ref::<Tuple>() {
        return Ok(tuple.items().to_vec());
    }
    iterate(obj)?.collect()
}
