//! Call arguments - positional values plus named options

use smallvec::SmallVec;

use super::{ObjRef, Object};
use crate::errors::{Exception, RtResult};

/// Arguments of a native call
///
/// Most builtins take at most a handful of positionals, so they stay inline.
#[derive(Debug, Clone, Default)]
pub struct FuncArgs {
    pub args: SmallVec<[ObjRef; 4]>,
    pub kwargs: Vec<(String, ObjRef)>,
}

impl FuncArgs {
    pub fn new<I: IntoIterator<Item = ObjRef>>(args: I) -> Self {
        Self {
            args: args.into_iter().collect(),
            kwargs: Vec::new(),
        }
    }

    pub fn positional(args: &[ObjRef]) -> Self {
        Self::new(args.iter().cloned())
    }

    pub fn with_kwarg(mut self, name: impl Into<String>, value: ObjRef) -> Self {
        self.kwargs.push((name.into(), value));
        self
    }

    pub fn prepend(&mut self, value: ObjRef) {
        self.args.insert(0, value);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.args.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.args.is_empty() && self.kwargs.is_empty()
    }

    /// Validate the positional count
    pub fn check_arity(&self, name: &str, min: usize, max: usize) -> RtResult<()> {
        let given = self.args.len();
        if min == max && given != min {
            return Err(Exception::type_error(format!(
                "{}() takes exactly {} argument{} ({} given)",
                name,
                min,
                plural(min),
                given
            )));
        }
        if given < min {
            return Err(Exception::type_error(format!(
                "{} expected at least {} argument{}, got {}",
                name,
                min,
                plural(min),
                given
            )));
        }
        if given > max {
            return Err(Exception::type_error(format!(
                "{} expected at most {} argument{}, got {}",
                name,
                max,
                plural(max),
                given
            )));
        }
        Ok(())
    }

    /// Positional argument `index`, if supplied
    #[inline]
    pub fn optional(&self, index: usize) -> Option<ObjRef> {
        self.args.get(index).cloned()
    }

    /// Remove and return the keyword option `name`
    pub fn take_keyword(&mut self, name: &str) -> Option<ObjRef> {
        let pos = self.kwargs.iter().position(|(k, _)| k == name)?;
        Some(self.kwargs.remove(pos).1)
    }

    /// Fail on any keyword option left unconsumed
    pub fn check_kwargs_empty(&self, name: &str) -> RtResult<()> {
        match self.kwargs.first() {
            None => Ok(()),
            Some((key, _)) => Err(Exception::type_error(format!(
                "{}() got an unexpected keyword argument '{}'",
                name, key
            ))),
        }
    }

    /// The receiver of a native method, downcast to its concrete type
    pub fn receiver<T: Object>(&self, method: &str) -> RtResult<&T> {
        let first = self.args.first().ok_or_else(|| {
            Exception::type_error(format!("descriptor '{}' needs an argument", method))
        })?;
        first.downcast_ref::<T>().ok_or_else(|| {
            Exception::type_error(format!(
                "descriptor '{}' doesn't apply to a '{}' object",
                method,
                first.type_name()
            ))
        })
    }
}

impl From<Vec<ObjRef>> for FuncArgs {
    fn from(args: Vec<ObjRef>) -> Self {
        Self::new(args)
    }
}

#[inline]
fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}
