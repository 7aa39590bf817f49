//! Wizard pages.
//!
//! A [`Page`] exposes a title, an observable completion flag, and lifecycle
//! hooks. The wizard holds pages through [`PageHandle`]s: shared references
//! compared by identity, so the same page object is recognised wherever it
//! appears.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use crate::dom::NodeId;
use crate::reactive::{Observable, Property};

/// One step of a wizard.
pub trait Page {
    fn title(&self) -> String;

    /// Whether the page's input is acceptable. The wizard observes this.
    fn complete(&self) -> Property<bool>;

    fn is_complete(&self) -> bool {
        self.complete().get()
    }

    /// Commit in-progress input. Called before leaving the page forward and
    /// before finishing.
    fn on_save(&self) {}

    /// The page became the current page and its controls are shown.
    fn on_dock(&self) {}

    /// The page stopped being the current page.
    fn on_undock(&self) {}

    /// Root control of the page, used to focus its first input on dock.
    fn root(&self) -> Option<NodeId> {
        None
    }
}

/// Shared, identity-compared reference to a [`Page`].
#[derive(Clone)]
pub struct PageHandle(Rc<dyn Page>);

impl PageHandle {
    pub fn new(page: impl Page + 'static) -> Self {
        Self(Rc::new(page))
    }

    /// Wrap a page the caller keeps its own handle to.
    pub fn from_rc<P: Page + 'static>(page: Rc<P>) -> Self {
        Self(page)
    }

    pub fn ptr_eq(&self, other: &PageHandle) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for PageHandle {
    type Target = dyn Page;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

impl PartialEq for PageHandle {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for PageHandle {}

impl fmt::Debug for PageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PageHandle").field(&self.0.title()).finish()
    }
}

// ---------------------------------------------------------------------------
// SimplePage
// ---------------------------------------------------------------------------

type Hook = Box<dyn Fn(&SimplePage)>;

/// A ready-made [`Page`] driven by closures. Counts its lifecycle calls,
/// which keeps headless flows easy to inspect.
pub struct SimplePage {
    title: String,
    complete: Property<bool>,
    root: Option<NodeId>,
    save_hook: Option<Hook>,
    dock_hook: Option<Hook>,
    undock_hook: Option<Hook>,
    saves: Cell<usize>,
    docks: Cell<usize>,
    undocks: Cell<usize>,
    notes: RefCell<Vec<String>>,
}

impl SimplePage {
    /// An incomplete page with no root control.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            complete: Property::new(false),
            root: None,
            save_hook: None,
            dock_hook: None,
            undock_hook: None,
            saves: Cell::new(0),
            docks: Cell::new(0),
            undocks: Cell::new(0),
            notes: RefCell::new(Vec::new()),
        }
    }

    pub fn with_complete(self, complete: bool) -> Self {
        self.set_complete(complete);
        self
    }

    pub fn with_root(mut self, root: NodeId) -> Self {
        self.root = Some(root);
        self
    }

    pub fn on_save_with(mut self, hook: impl Fn(&SimplePage) + 'static) -> Self {
        self.save_hook = Some(Box::new(hook));
        self
    }

    pub fn on_dock_with(mut self, hook: impl Fn(&SimplePage) + 'static) -> Self {
        self.dock_hook = Some(Box::new(hook));
        self
    }

    pub fn on_undock_with(mut self, hook: impl Fn(&SimplePage) + 'static) -> Self {
        self.undock_hook = Some(Box::new(hook));
        self
    }

    /// Mark the page complete or incomplete. Ignored while the completion
    /// flag is bound.
    pub fn set_complete(&self, complete: bool) {
        if let Err(err) = self.complete.set(complete) {
            tracing::debug!(title = %self.title, %err, "completion flag not writable");
        }
    }

    pub fn save_count(&self) -> usize {
        self.saves.get()
    }

    pub fn dock_count(&self) -> usize {
        self.docks.get()
    }

    pub fn undock_count(&self) -> usize {
        self.undocks.get()
    }

    /// Free-form log that hooks can append to.
    pub fn note(&self, entry: impl Into<String>) {
        self.notes.borrow_mut().push(entry.into());
    }

    pub fn notes(&self) -> Vec<String> {
        self.notes.borrow().clone()
    }
}

impl Page for SimplePage {
    fn title(&self) -> String {
        self.title.clone()
    }

    fn complete(&self) -> Property<bool> {
        self.complete
    }

    fn on_save(&self) {
        self.saves.set(self.saves.get() + 1);
        if let Some(hook) = &self.save_hook {
            hook(self);
        }
    }

    fn on_dock(&self) {
        self.docks.set(self.docks.get() + 1);
        if let Some(hook) = &self.dock_hook {
            hook(self);
        }
    }

    fn on_undock(&self) {
        self.undocks.set(self.undocks.get() + 1);
        if let Some(hook) = &self.undock_hook {
            hook(self);
        }
    }

    fn root(&self) -> Option<NodeId> {
        self.root
    }
}

impl fmt::Debug for SimplePage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimplePage")
            .field("title", &self.title)
            .field("complete", &self.complete.get())
            .finish()
    }
}
