//! Call-frame scopes - the locals that `dir()` and `vars()` read
//!
//! Design: A per-thread stack of shared local namespaces. Hosts push one
//! frame per call with `enter_scope` and the returned guard pops it again,
//! so frames always unwind in order even on early return.

use std::cell::RefCell;
use std::rc::Rc;

use crate::objects::{Namespace, ObjRef};

/// Locals of one call frame
pub type Frame = Rc<RefCell<Namespace>>;

thread_local! {
    static FRAMES: RefCell<Vec<Frame>> = const { RefCell::new(Vec::new()) };
}

/// Pops its frame when dropped
#[must_use = "the scope ends when the guard is dropped"]
#[derive(Debug)]
pub struct ScopeGuard {
    frame: Frame,
    depth: usize,
}

impl ScopeGuard {
    /// Bind a local in this frame
    pub fn set(&self, name: impl Into<String>, value: ObjRef) {
        self.frame.borrow_mut().insert(name.into(), value);
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        FRAMES.with(|frames| frames.borrow_mut().truncate(self.depth));
    }
}

/// Push a frame holding `locals`
pub fn enter_scope(locals: Namespace) -> ScopeGuard {
    let frame = Rc::new(RefCell::new(locals));
    let depth = FRAMES.with(|frames| {
        let mut frames = frames.borrow_mut();
        frames.push(frame.clone());
        frames.len() - 1
    });
    ScopeGuard { frame, depth }
}

/// Number of live frames on this thread
pub fn depth() -> usize {
    FRAMES.with(|frames| frames.borrow().len())
}

/// Locals seen by a no-argument `dir()`/`vars()`
///
/// The frame below the innermost one when there is one, else the innermost.
pub fn caller_locals() -> Option<Namespace> {
    FRAMES.with(|frames| {
        let frames = frames.borrow();
        let frame = match frames.len() {
            0 => return None,
            1 => &frames[0],
            n => &frames[n - 2],
        };
        let locals = frame.borrow().clone();
        Some(locals)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::new_int;

    #[test]
    fn test_no_frames() {
        assert!(caller_locals().is_none());
    }

    #[test]
    fn test_single_frame_is_read() {
        let guard = enter_scope(Namespace::new());
        guard.set("x", new_int(1));
        let locals = caller_locals().unwrap();
        assert!(locals.contains_key("x"));
    }

    #[test]
    fn test_nested_frame_reads_enclosing() {
        let outer = enter_scope(Namespace::new());
        outer.set("outer_var", new_int(1));
        {
            let inner = enter_scope(Namespace::new());
            inner.set("inner_var", new_int(2));
            let locals = caller_locals().unwrap();
            assert!(locals.contains_key("outer_var"));
            assert!(!locals.contains_key("inner_var"));
            assert_eq!(depth(), 2);
        }
        assert_eq!(depth(), 1);
        drop(outer);
        assert_eq!(depth(), 0);
    }
}
