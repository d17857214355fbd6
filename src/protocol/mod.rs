//! Object protocol - the capability surface every builtin goes through
//!
//! Design: Builtins never match on concrete types to decide behaviour.
//! They ask for capabilities (attribute get/has, call, truthiness, rich
//! comparison, iteration, index coercion) and this module resolves them
//! through class-level dunder lookup, the same way for native and user
//! values. Native fast paths only skip the lookup, never change results.

mod attr;
mod call;
mod convert;
mod iter;
mod operators;

pub use attr::{bind_attr, call_special, del_attr, get_attr, has_attr, lookup_special, set_attr};
pub use call::{call, call_method, call_with, instantiate, is_callable};
pub use convert::{index, is_truthy, repr, to_str, type_name};
pub use iter::{collect, get_iter, iterate, next, ObjIter};
pub use operators::{binary_op, equals, rich_compare, rich_compare_obj, BinaryOp, CompareOp};
