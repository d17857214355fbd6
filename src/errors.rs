//! Runtime exceptions - typed failures raised by builtins and the object model
//!
//! Design: A kind tag plus a message. Catch sites match on the kind
//! (`err.is(ExceptionKind::AttributeError)`) instead of exception identity,
//! and everything else propagates untouched.

use std::fmt;

/// Exception classes the core raises or intercepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExceptionKind {
    TypeError,
    ValueError,
    AttributeError,
    StopIteration,
    IndexError,
    KeyError,
    ZeroDivisionError,
    OverflowError,
    EOFError,
    OSError,
    NotImplementedError,
}

impl ExceptionKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::TypeError => "TypeError",
            Self::ValueError => "ValueError",
            Self::AttributeError => "AttributeError",
            Self::StopIteration => "StopIteration",
            Self::IndexError => "IndexError",
            Self::KeyError => "KeyError",
            Self::ZeroDivisionError => "ZeroDivisionError",
            Self::OverflowError => "OverflowError",
            Self::EOFError => "EOFError",
            Self::OSError => "OSError",
            Self::NotImplementedError => "NotImplementedError",
        }
    }
}

impl fmt::Display for ExceptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A raised exception
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exception {
    pub kind: ExceptionKind,
    pub message: String,
}

/// Result of any operation that may raise
pub type RtResult<T> = Result<T, Exception>;

impl Exception {
    pub fn new(kind: ExceptionKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    #[inline]
    pub fn is(&self, kind: ExceptionKind) -> bool {
        self.kind == kind
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new(ExceptionKind::TypeError, message)
    }

    pub fn value_error(message: impl Into<String>) -> Self {
        Self::new(ExceptionKind::ValueError, message)
    }

    pub fn attribute_error(message: impl Into<String>) -> Self {
        Self::new(ExceptionKind::AttributeError, message)
    }

    pub fn index_error(message: impl Into<String>) -> Self {
        Self::new(ExceptionKind::IndexError, message)
    }

    pub fn key_error(message: impl Into<String>) -> Self {
        Self::new(ExceptionKind::KeyError, message)
    }

    pub fn zero_division(message: impl Into<String>) -> Self {
        Self::new(ExceptionKind::ZeroDivisionError, message)
    }

    pub fn overflow(message: impl Into<String>) -> Self {
        Self::new(ExceptionKind::OverflowError, message)
    }

    /// End-of-sequence signal
    pub fn stop_iteration() -> Self {
        Self::new(ExceptionKind::StopIteration, "")
    }

    pub fn eof(message: impl Into<String>) -> Self {
        Self::new(ExceptionKind::EOFError, message)
    }

    pub fn not_implemented(message: impl Into<String>) -> Self {
        Self::new(ExceptionKind::NotImplementedError, message)
    }

    pub fn not_iterable(type_name: &str) -> Self {
        Self::type_error(format!("'{}' object is not iterable", type_name))
    }

    pub fn not_callable(type_name: &str) -> Self {
        Self::type_error(format!("'{}' object is not callable", type_name))
    }

    pub fn not_an_integer(type_name: &str) -> Self {
        Self::type_error(format!(
            "'{}' object cannot be interpreted as an integer",
            type_name
        ))
    }

    pub fn no_attribute(type_name: &str, attr: &str) -> Self {
        Self::attribute_error(format!(
            "'{}' object has no attribute '{}'",
            type_name, attr
        ))
    }

    pub fn integer_overflow() -> Self {
        Self::overflow("integer overflow")
    }
}

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.kind, self.message)
        }
    }
}

impl std::error::Error for Exception {}

impl From<std::io::Error> for Exception {
    fn from(err: std::io::Error) -> Self {
        Self::new(ExceptionKind::OSError, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_message() {
        let err = Exception::not_iterable("int");
        assert_eq!(err.to_string(), "TypeError: 'int' object is not iterable");
    }

    #[test]
    fn test_display_bare_kind() {
        assert_eq!(Exception::stop_iteration().to_string(), "StopIteration");
    }

    #[test]
    fn test_kind_matching() {
        let err = Exception::no_attribute("Foo", "bar");
        assert!(err.is(ExceptionKind::AttributeError));
        assert!(!err.is(ExceptionKind::TypeError));
        assert_eq!(err.message, "'Foo' object has no attribute 'bar'");
    }
}
