//! pybuiltins - Python's builtin functions re-derived from the object protocol
//!
//! Architecture:
//! - `objects`: reference object model (classes, instances, natives)
//! - `protocol`: attribute probing, calls, conversion, iteration, operators
//! - `numeric`: capability detection, base conversion, `pow`
//! - `builtins`: the protocol-emulating builtin functions
//! - `iterators` / `itertools`: lazy iterator state machines
//! - `sort`: insertion sort, merge sort and Timsort over fallible comparisons
//! - `logging` / `config`: tracing setup and TOML configuration

pub mod builtins;
pub mod config;
pub mod errors;
pub mod iterators;
pub mod itertools;
pub mod logging;
pub mod numeric;
pub mod objects;
pub mod protocol;
pub mod scope;
pub mod sort;

pub use config::{Config, ConfigError};
pub use errors::{Exception, ExceptionKind, RtResult};
pub use logging::LogConfig;
pub use objects::{FuncArgs, Namespace, ObjRef, Object};

/// Initialize logging from `PYBUILTINS_LOG_*` and default runtime settings
pub fn init() {
    logging::init();
}

/// Initialize logging and install the runtime settings of `config`
pub fn init_with_config(config: &Config) {
    logging::init_with_config(config.log_config());
    config.apply();
}
