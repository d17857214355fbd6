//! `itertools` - lazy iterator building blocks
//!
//! Design: Same state-machine shape as `crate::iterators`: each type owns
//! its source iterators and advances at most what one `next` needs. The
//! module object maps each public name to its type, so `itertools.chain`
//! is both the constructor and the class.

mod accumulate;
mod chain;
mod combinatorics;
mod infinite;
mod predicates;

#[cfg(test)]
mod tests;

pub use accumulate::{accumulate_type, Accumulate};
pub use chain::{chain_type, Chain};
pub use combinatorics::{
    combinations_type, combinations_with_replacement_type, Combinations,
    CombinationsWithReplacement,
};
pub use infinite::{count_type, cycle_type, Count, Cycle};
pub use predicates::{
    compress_type, dropwhile_type, filterfalse_type, Compress, DropWhile, FilterFalse,
};

use std::rc::Rc;

use crate::objects::{Module, Namespace, ObjRef};

fn build_module() -> ObjRef {
    let mut namespace = Namespace::new();
    let types = [
        accumulate_type(),
        chain_type(),
        combinations_type(),
        combinations_with_replacement_type(),
        compress_type(),
        count_type(),
        cycle_type(),
        dropwhile_type(),
        filterfalse_type(),
    ];
    for cls in types {
        namespace.insert(cls.name().to_string(), cls);
    }
    Rc::new(Module::new("itertools", namespace))
}

thread_local! {
    static MODULE: ObjRef = build_module();
}

/// The `itertools` module object
pub fn module() -> ObjRef {
    MODULE.with(Rc::clone)
}
