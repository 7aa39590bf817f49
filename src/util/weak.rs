//! Non-owning handles with a cleanup hook.
//!
//! A [`WeakHandle`] refers to a shared value without keeping it alive. Work
//! is only run while the value exists; the first attempt after it is gone
//! runs the deinit hook once instead.

use std::cell::Cell;
use std::fmt;
use std::rc::{Rc, Weak};

type Deinit = Box<dyn FnOnce()>;

pub struct WeakHandle<T> {
    target: Weak<T>,
    deinit: Cell<Option<Deinit>>,
}

impl<T> WeakHandle<T> {
    pub fn new(target: &Rc<T>, deinit: impl FnOnce() + 'static) -> Self {
        Self {
            target: Rc::downgrade(target),
            deinit: Cell::new(Some(Box::new(deinit))),
        }
    }

    /// A handle without a deinit hook.
    pub fn detached(target: &Rc<T>) -> Self {
        Self {
            target: Rc::downgrade(target),
            deinit: Cell::new(None),
        }
    }

    /// Run `action` against the value if it is still alive. Otherwise run the
    /// deinit hook (at most once over the handle's life) and return `None`.
    pub fn with_if_alive<R>(&self, action: impl FnOnce(&T) -> R) -> Option<R> {
        match self.target.upgrade() {
            Some(target) => Some(action(&target)),
            None => {
                if let Some(deinit) = self.deinit.take() {
                    tracing::trace!("weak handle target dropped, running deinit");
                    deinit();
                }
                None
            }
        }
    }

    pub fn is_alive(&self) -> bool {
        self.target.strong_count() > 0
    }

    pub fn upgrade(&self) -> Option<Rc<T>> {
        self.target.upgrade()
    }
}

impl<T> fmt::Debug for WeakHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakHandle")
            .field("alive", &self.is_alive())
            .finish()
    }
}

/// Shorthand for [`WeakHandle::new`].
pub fn weak<T>(target: &Rc<T>, deinit: impl FnOnce() + 'static) -> WeakHandle<T> {
    WeakHandle::new(target, deinit)
}
