//! Built-in functions - the protocol-emulating builtins
//!
//! Design: Each builtin family lives in a focused module and exposes a
//! typed Rust API (`len_of`, `getattr`, `divmod`, ...) plus a thin
//! `FuncArgs` adapter. The adapters are collected into the `builtins`
//! module object, which also carries the iterator and descriptor types.

mod attrs;
mod hash;
mod io;
mod iter;
mod len;
mod minmax;
mod numeric;
mod seq;
mod sorting;
mod truth;
mod types;


pub use attrs::{dir, dir_api, getattr, hasattr, setattr, vars};
pub use hash::hash_of;
pub use io::{
    format_print, input, input_from, print, print_to, set_input, set_output, set_strip_input,
    Output,
};
pub use iter::{iter, next};
pub use len::{len_of, HasLen};
pub use minmax::{extremum, max, min, Extremum};
pub use numeric::{abs, divmod, pow, to_base, to_base_api};
pub use seq::{reversed, sort_items, sorted, sum};
pub use truth::{all, any, callable, truthy};
pub use types::{isinstance, issubclass};

use std::rc::Rc;

use crate::errors::RtResult;
use crate::iterators::{
    enumerate_type, filter_type, iterator_type, map_type, range_type, reversed_type, zip_type,
};
use crate::logging::{debug, log_builtin_call};
use crate::objects::{
    classmethod_type, dict_type, float_type, int_type, list_type, new_function, object_type,
    property_type, staticmethod_type, str_type, tuple_type, type_type, FuncArgs, Module,
    Namespace, ObjRef,
};

type Builtin = fn(FuncArgs) -> RtResult<ObjRef>;

const FUNCTIONS: &[(&str, Builtin)] = &[
    ("abs", numeric::builtin_abs),
    ("all", truth::builtin_all),
    ("any", truth::builtin_any),
    ("bin", numeric::builtin_bin),
    ("bin_api", numeric::builtin_bin_api),
    ("bool", truth::builtin_bool),
    ("bool_api", truth::builtin_bool_api),
    ("callable", truth::builtin_callable),
    ("callable_api", truth::builtin_callable_api),
    ("dir", attrs::builtin_dir),
    ("dir_api", attrs::builtin_dir_api),
    ("divmod", numeric::builtin_divmod),
    ("getattr", attrs::builtin_getattr),
    ("hasattr", attrs::builtin_hasattr),
    ("hash", hash::builtin_hash),
    ("hex", numeric::builtin_hex),
    ("hex_api", numeric::builtin_hex_api),
    ("input", io::builtin_input),
    ("insertion_sort", sorting::builtin_insertion_sort),
    ("isinstance", types::builtin_isinstance),
    ("issubclass", types::builtin_issubclass),
    ("iter", iter::builtin_iter),
    ("len", len::builtin_len),
    ("max", minmax::builtin_max),
    ("merge_sort", sorting::builtin_merge_sort),
    ("min", minmax::builtin_min),
    ("next", iter::builtin_next),
    ("oct", numeric::builtin_oct),
    ("oct_api", numeric::builtin_oct_api),
    ("pow", numeric::builtin_pow),
    ("print", io::builtin_print),
    ("setattr", attrs::builtin_setattr),
    ("sorted", seq::builtin_sorted),
    ("sum", seq::builtin_sum),
    ("timsort", sorting::builtin_timsort),
    ("vars", attrs::builtin_vars),
];

/// Native function that logs each call before dispatching
fn wrap(name: &'static str, func: Builtin) -> ObjRef {
    new_function(name, move |args: FuncArgs| {
        log_builtin_call(name, args.len());
        func(args)
    })
}

fn build_module() -> ObjRef {
    let mut namespace = Namespace::new();
    for &(name, func) in FUNCTIONS {
        namespace.insert(name.to_string(), wrap(name, func));
    }

    let types = [
        classmethod_type(),
        dict_type(),
        enumerate_type(),
        filter_type(),
        float_type(),
        int_type(),
        iterator_type(),
        list_type(),
        map_type(),
        object_type(),
        property_type(),
        range_type(),
        reversed_type(),
        staticmethod_type(),
        str_type(),
        tuple_type(),
        type_type(),
        zip_type(),
    ];
    for cls in types {
        namespace.insert(cls.name().to_string(), cls);
    }

    debug!(
        event = "module_built",
        module = "builtins",
        names = namespace.len(),
        "builtins module ready"
    );
    Rc::new(Module::new("builtins", namespace))
}

thread_local! {
    static MODULE: ObjRef = build_module();
}

/// The `builtins` module object
pub fn module() -> ObjRef {
    MODULE.with(Rc::clone)
}

/// Look a builtin up by name
pub fn lookup(name: &str) -> Option<ObjRef> {
    MODULE.with(|module| {
        module
            .downcast_ref::<Module>()
            .and_then(|module| module.get(name))
    })
}
