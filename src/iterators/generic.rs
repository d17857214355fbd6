//! Generic `iterator`: indexed access or a callable polled until a sentinel

use std::cell::Cell;
use std::rc::Rc;

use super::{next_impl, IteratorState};
use crate::errors::{Exception, ExceptionKind, RtResult};
use crate::logging::log_iterator_created;
use crate::objects::{native_type, new_int, ClassRef, FuncArgs, NativeType, ObjRef, Object};
use crate::protocol;

#[derive(Debug)]
enum Mode {
    /// `target[0]`, `target[1]`, ... until IndexError
    Indexed { target: ObjRef },
    /// `func()` until it returns `sentinel`
    Callable { func: ObjRef, sentinel: ObjRef },
}

#[derive(Debug)]
pub struct SeqIter {
    mode: Mode,
    cursor: Cell<usize>,
    exhausted: Cell<bool>,
}

impl SeqIter {
    pub fn indexed(target: ObjRef) -> Self {
        log_iterator_created("iterator");
        Self {
            mode: Mode::Indexed { target },
            cursor: Cell::new(0),
            exhausted: Cell::new(false),
        }
    }

    pub fn callable(func: ObjRef, sentinel: ObjRef) -> RtResult<Self> {
        if !protocol::is_callable(&func) {
            return Err(Exception::type_error("iter(v, w): v must be callable"));
        }
        log_iterator_created("callable_iterator");
        Ok(Self {
            mode: Mode::Callable { func, sentinel },
            cursor: Cell::new(0),
            exhausted: Cell::new(false),
        })
    }

    /// Restart an indexed iterator from position 0
    fn rewind(&self) {
        if let Mode::Indexed { .. } = self.mode {
            self.cursor.set(0);
            self.exhausted.set(false);
        }
    }

    fn finish(&self) -> RtResult<Option<ObjRef>> {
        self.exhausted.set(true);
        Ok(None)
    }
}

impl Object for SeqIter {
    fn class(&self) -> ClassRef {
        iterator_type()
    }
}

impl IteratorState for SeqIter {
    fn step(&self) -> RtResult<Option<ObjRef>> {
        if self.exhausted.get() {
            return Ok(None);
        }

        match &self.mode {
            Mode::Indexed { target } => {
                let index = self.cursor.get();
                match protocol::call_special(target, "__getitem__", &[new_int(index as i64)]) {
                    Ok(Some(value)) => {
                        self.cursor.set(index + 1);
                        Ok(Some(value))
                    }
                    Ok(None) => Err(Exception::not_iterable(&target.type_name())),
                    Err(err)
                        if err.is(ExceptionKind::IndexError)
                            || err.is(ExceptionKind::StopIteration) =>
                    {
                        self.finish()
                    }
                    Err(err) => Err(err),
                }
            }
            Mode::Callable { func, sentinel } => {
                let value = protocol::call(func, &[])?;
                if protocol::equals(&value, sentinel)? {
                    self.finish()
                } else {
                    Ok(Some(value))
                }
            }
        }
    }
}

native_type!(pub fn iterator_type() = NativeType::new("iterator")
    .method("__iter__", iterator_iter)
    .method("__next__", next_impl::<SeqIter>)
    .constructor(iterator_new)
    .build());

/// Re-entering an indexed iterator starts it over
fn iterator_iter(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_arity("__iter__", 1, 1)?;
    args.receiver::<SeqIter>("__iter__")?.rewind();
    Ok(args.args[0].clone())
}

/// `iterator(sequence)` or `iterator(callable, sentinel)`
fn iterator_new(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_kwargs_empty("iterator")?;
    args.check_arity("iterator", 1, 2)?;
    let target = args.args[0].clone();
    match args.optional(1) {
        Some(sentinel) => Ok(Rc::new(SeqIter::callable(target, sentinel)?)),
        None => {
            if protocol::lookup_special(&target, "__getitem__").is_none() {
                return Err(Exception::not_iterable(&target.type_name()));
            }
            Ok(Rc::new(SeqIter::indexed(target)))
        }
    }
}
