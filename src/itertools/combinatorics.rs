//! `combinations(iterable, r)` and `combinations_with_replacement(iterable, r)`
//!
//! Both materialize the pool once and walk a vector of pool indices in
//! lexicographic order; each step yields the tuple the indices select.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::errors::{Exception, RtResult};
use crate::iterators::{iter_self, next_impl, IteratorState};
use crate::logging::log_iterator_created;
use crate::objects::{native_type, new_tuple, ClassRef, FuncArgs, NativeType, ObjRef, Object};
use crate::protocol;

#[derive(Debug)]
struct IndexWalk {
    pool: Vec<ObjRef>,
    indices: RefCell<Vec<usize>>,
    started: Cell<bool>,
    done: Cell<bool>,
}

impl IndexWalk {
    fn new(pool: Vec<ObjRef>, indices: Vec<usize>, empty: bool) -> Self {
        Self {
            pool,
            indices: RefCell::new(indices),
            started: Cell::new(false),
            done: Cell::new(empty),
        }
    }

    fn current(&self) -> ObjRef {
        let indices = self.indices.borrow();
        new_tuple(indices.iter().map(|&i| self.pool[i].clone()).collect())
    }

    /// First call yields the initial indices; later calls apply `advance`
    fn step_with(&self, advance: impl FnOnce(&mut [usize], usize) -> bool) -> Option<ObjRef> {
        if self.done.get() {
            return None;
        }
        if !self.started.get() {
            self.started.set(true);
            return Some(self.current());
        }
        let advanced = advance(&mut self.indices.borrow_mut(), self.pool.len());
        if !advanced {
            self.done.set(true);
            return None;
        }
        Some(self.current())
    }
}

/// Pool snapshot and a validated selection length
fn pool_and_length(name: &str, mut args: FuncArgs) -> RtResult<(Vec<ObjRef>, usize)> {
    let keyword_r = args.take_keyword("r");
    args.check_kwargs_empty(name)?;
    args.check_arity(name, 1, 2)?;

    let r = match (args.optional(1), keyword_r) {
        (Some(_), Some(_)) => {
            return Err(Exception::type_error(format!(
                "argument for {}() given by name ('r') and position (2)",
                name
            )))
        }
        (Some(r), None) | (None, Some(r)) => protocol::index(&r)?,
        (None, None) => {
            return Err(Exception::type_error(format!(
                "{}() missing required argument 'r' (pos 2)",
                name
            )))
        }
    };
    let r = usize::try_from(r).map_err(|_| Exception::value_error("r must be non-negative"))?;
    Ok((protocol::collect(&args.args[0])?, r))
}

/// `r`-length subsequences in pool order, no element repeated
#[derive(Debug)]
pub struct Combinations {
    walk: IndexWalk,
    r: usize,
}

impl Combinations {
    pub fn new(iterable: &ObjRef, r: usize) -> RtResult<Self> {
        let pool = protocol::collect(iterable)?;
        Ok(Self::from_pool(pool, r))
    }

    fn from_pool(pool: Vec<ObjRef>, r: usize) -> Self {
        log_iterator_created("combinations");
        let empty = r > pool.len();
        Self {
            walk: IndexWalk::new(pool, (0..r).collect(), empty),
            r,
        }
    }
}

impl Object for Combinations {
    fn class(&self) -> ClassRef {
        combinations_type()
    }
}

impl IteratorState for Combinations {
    fn step(&self) -> RtResult<Option<ObjRef>> {
        let r = self.r;
        Ok(self.walk.step_with(|indices, n| {
            // Rightmost index not yet at its maximum `i + n - r`
            let Some(i) = (0..r).rev().find(|&i| indices[i] != i + n - r) else {
                return false;
            };
            indices[i] += 1;
            for j in i + 1..r {
                indices[j] = indices[j - 1] + 1;
            }
            true
        }))
    }
}

/// `r`-length non-decreasing index selections, elements may repeat
#[derive(Debug)]
pub struct CombinationsWithReplacement {
    walk: IndexWalk,
    r: usize,
}

impl CombinationsWithReplacement {
    pub fn new(iterable: &ObjRef, r: usize) -> RtResult<Self> {
        let pool = protocol::collect(iterable)?;
        Ok(Self::from_pool(pool, r))
    }

    fn from_pool(pool: Vec<ObjRef>, r: usize) -> Self {
        log_iterator_created("combinations_with_replacement");
        let empty = pool.is_empty() && r > 0;
        Self {
            walk: IndexWalk::new(pool, vec![0; r], empty),
            r,
        }
    }
}

impl Object for CombinationsWithReplacement {
    fn class(&self) -> ClassRef {
        combinations_with_replacement_type()
    }
}

impl IteratorState for CombinationsWithReplacement {
    fn step(&self) -> RtResult<Option<ObjRef>> {
        let r = self.r;
        Ok(self.walk.step_with(|indices, n| {
            let Some(i) = (0..r).rev().find(|&i| indices[i] != n - 1) else {
                return false;
            };
            let next = indices[i] + 1;
            indices[i..].fill(next);
            true
        }))
    }
}

native_type!(pub fn combinations_type() = NativeType::new("combinations")
    .method("__iter__", iter_self)
    .method("__next__", next_impl::<Combinations>)
    .constructor(combinations_new)
    .build());

native_type!(pub fn combinations_with_replacement_type() =
    NativeType::new("combinations_with_replacement")
    .method("__iter__", iter_self)
    .method("__next__", next_impl::<CombinationsWithReplacement>)
    .constructor(combinations_with_replacement_new)
    .build());

fn combinations_new(args: FuncArgs) -> RtResult<ObjRef> {
    let (pool, r) = pool_and_length("combinations", args)?;
    Ok(Rc::new(Combinations::from_pool(pool, r)))
}

fn combinations_with_replacement_new(args: FuncArgs) -> RtResult<ObjRef> {
    let (pool, r) = pool_and_length("combinations_with_replacement", args)?;
    Ok(Rc::new(CombinationsWithReplacement::from_pool(pool, r)))
}
