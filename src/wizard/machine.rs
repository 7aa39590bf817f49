//! The wizard state machine.
//!
//! A [`Wizard`] owns an ordered list of pages and a current-page reference.
//! Navigation actions read and write those observables; everything a view
//! needs for enable/disable state (`has_next`, `can_finish`, `next_enabled`,
//! ...) is a derived observable recomputed from them.
//!
//! Page lifecycle: when the current page changes, the previous page is
//! undocked immediately, the wizard's `current_page_complete` is rebound to
//! the new page's completion flag, and the new page's dock hook is queued
//! until the next [`Wizard::run_deferred`].

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::dom::Toolkit;
use crate::event::{KeyEvent, KeyTarget};
use crate::reactive::{
    boolean_list_binding, BindError, Binding, BoolExpr, Observable, ObservableList, Property,
    StringExpr,
};

use super::config::{CommitKey, WizardConfig, WizardOptions, WizardTexts};
use super::dock::{DockEvent, DockTracker};
use super::flow::{LinearFlow, WizardFlow};
use super::keyboard::{commit_action, CommitAction, CommitGates, KeyOutcome};
use super::page::PageHandle;

// ---------------------------------------------------------------------------
// Errors + state
// ---------------------------------------------------------------------------

/// Failures of wizard navigation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    #[error("wizard has no current page")]
    NoCurrentPage,
    #[error("there is no page after the current one")]
    NoNextPage,
    #[error("there is no page before the current one")]
    NoPreviousPage,
    #[error("page index {index} out of bounds for {len} pages")]
    OutOfBounds { index: usize, len: usize },
    #[error("page is not part of this wizard")]
    UnknownPage,
    #[error("wizard is closed")]
    Closed,
    #[error(transparent)]
    Bind(#[from] BindError),
}

/// Coarse position of the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WizardState {
    NoCurrentPage,
    OnPage(usize),
    Closed,
}

/// Building blocks handed to custom gate constructors on the builder.
#[derive(Debug, Clone, Copy)]
pub struct Gates {
    pub pages: ObservableList<PageHandle>,
    pub current_page: Property<Option<PageHandle>>,
    pub has_next: Binding<bool>,
    pub has_previous: Binding<bool>,
    pub all_pages_complete: Binding<bool>,
    pub current_page_complete: Property<bool>,
}

type GateFn = Box<dyn FnOnce(&Gates) -> Binding<bool>>;

// ---------------------------------------------------------------------------
// Completion listeners
// ---------------------------------------------------------------------------

#[derive(Default)]
struct CompletionListeners {
    next_id: u64,
    entries: Vec<(u64, Rc<dyn Fn()>)>,
}

impl CompletionListeners {
    fn snapshot(&self) -> Vec<(u64, Rc<dyn Fn()>)> {
        self.entries
            .iter()
            .map(|(id, f)| (*id, Rc::clone(f)))
            .collect()
    }

    fn contains(&self, id: u64) -> bool {
        self.entries.iter().any(|(entry, _)| *entry == id)
    }
}

/// Registration returned by [`Wizard::on_complete`].
#[derive(Clone)]
pub struct CompletionHandle {
    id: u64,
    registry: Weak<RefCell<CompletionListeners>>,
}

impl CompletionHandle {
    /// Unregister the listener. Safe after the wizard is gone.
    pub fn dispose(self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().entries.retain(|(id, _)| *id != self.id);
        }
    }
}

impl fmt::Debug for CompletionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionHandle").field("id", &self.id).finish()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Configures and builds a [`Wizard`].
pub struct WizardBuilder {
    title: String,
    heading: Option<String>,
    config: WizardConfig,
    pages: Vec<PageHandle>,
    flow: Box<dyn WizardFlow>,
    can_finish: Option<GateFn>,
    can_go_next: Option<GateFn>,
    can_go_back: Option<GateFn>,
}

impl WizardBuilder {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            heading: None,
            config: WizardConfig::default(),
            pages: Vec::new(),
            flow: Box::new(LinearFlow),
            can_finish: None,
            can_go_next: None,
            can_go_back: None,
        }
    }

    /// Heading shown under the title. Without one the heading mirrors the
    /// title and is hidden.
    pub fn heading(mut self, heading: impl Into<String>) -> Self {
        self.heading = Some(heading.into());
        self
    }

    pub fn config(mut self, config: WizardConfig) -> Self {
        self.config = config;
        self
    }

    pub fn page(mut self, page: PageHandle) -> Self {
        self.pages.push(page);
        self
    }

    pub fn pages(mut self, pages: impl IntoIterator<Item = PageHandle>) -> Self {
        self.pages.extend(pages);
        self
    }

    pub fn flow(mut self, flow: impl WizardFlow + 'static) -> Self {
        self.flow = Box::new(flow);
        self
    }

    /// Replace the finish gate. Defaults to always `true`.
    pub fn can_finish(mut self, gate: impl FnOnce(&Gates) -> Binding<bool> + 'static) -> Self {
        self.can_finish = Some(Box::new(gate));
        self
    }

    /// Replace the forward gate. Defaults to `has_next`.
    pub fn can_go_next(mut self, gate: impl FnOnce(&Gates) -> Binding<bool> + 'static) -> Self {
        self.can_go_next = Some(Box::new(gate));
        self
    }

    /// Replace the backward gate. Defaults to `has_previous`.
    pub fn can_go_back(mut self, gate: impl FnOnce(&Gates) -> Binding<bool> + 'static) -> Self {
        self.can_go_back = Some(Box::new(gate));
        self
    }

    pub fn build(self) -> Wizard {
        let title = Property::new(self.title);
        let heading = Property::new(String::new());
        match self.heading {
            Some(text) => {
                if let Err(err) = heading.set(text) {
                    tracing::warn!(%err, "could not set wizard heading");
                }
            }
            None => {
                if let Err(err) = heading.bind(&title) {
                    tracing::warn!(%err, "could not bind heading to title");
                }
            }
        }

        let pages = ObservableList::from_vec(self.pages);
        let current_page: Property<Option<PageHandle>> = Property::new(None);

        let has_next = Binding::new(&[current_page.id(), pages.id()], move || {
            current_index(pages, current_page).is_some_and(|index| index + 1 < pages.len())
        });
        let has_previous = Binding::new(&[current_page.id(), pages.id()], move || {
            current_index(pages, current_page).is_some_and(|index| index > 0)
        });
        let all_pages_complete =
            boolean_list_binding(pages, false, |page: &PageHandle| page.complete());
        let current_page_complete = Property::new(false);

        let gates = Gates {
            pages,
            current_page,
            has_next,
            has_previous,
            all_pages_complete,
            current_page_complete,
        };
        let can_finish = match self.can_finish {
            Some(gate) => gate(&gates),
            None => Binding::constant(true),
        };
        let can_go_next = match self.can_go_next {
            Some(gate) => gate(&gates),
            None => has_next,
        };
        let can_go_back = match self.can_go_back {
            Some(gate) => gate(&gates),
            None => has_previous,
        };

        let next_enabled = can_go_next.and(&has_next).and(&current_page_complete);
        let heading_visible = title.is_not_equal_to(&heading);

        let docks = Rc::new(RefCell::new(DockTracker::new()));
        watch_current_page(current_page, current_page_complete, Rc::clone(&docks));
        watch_pages(pages, current_page);

        let options = WizardOptions::from_config(&self.config);
        let texts = WizardTexts::from_labels(&self.config.labels);

        Wizard {
            title,
            heading,
            pages,
            current_page,
            has_next,
            has_previous,
            all_pages_complete,
            current_page_complete,
            complete: Property::new(false),
            can_finish,
            can_go_next,
            can_go_back,
            next_enabled,
            heading_visible,
            open: Property::new(true),
            options,
            texts,
            commit_key: Cell::new(self.config.commit_key),
            flow: self.flow,
            docks,
            completion: Rc::new(RefCell::new(CompletionListeners::default())),
            docked: Cell::new(false),
        }
    }
}

fn current_index(
    pages: ObservableList<PageHandle>,
    current_page: Property<Option<PageHandle>>,
) -> Option<usize> {
    current_page.get().and_then(|page| pages.position(&page))
}

/// Rebind the completion mirror, queue the dock of the new page and undock
/// the old one whenever the current page changes.
fn watch_current_page(
    current_page: Property<Option<PageHandle>>,
    current_page_complete: Property<bool>,
    docks: Rc<RefCell<DockTracker>>,
) {
    current_page.add_listener(move |old, new| {
        match new {
            Some(page) => {
                if let Err(err) = current_page_complete.clean_bind(&page.complete()) {
                    tracing::warn!(%err, "could not mirror page completion");
                }
                docks.borrow_mut().schedule_dock(page.clone());
            }
            None => {
                current_page_complete.unbind();
                if let Err(err) = current_page_complete.set(false) {
                    tracing::warn!(%err, "could not reset page completion");
                }
            }
        }
        if let Some(old) = old {
            let undock = docks.borrow_mut().undock(old);
            if undock {
                tracing::debug!(page = %old.title(), "undocking page");
                old.on_undock();
            }
        }
    });
}

/// Keep the current page inside the page list.
fn watch_pages(pages: ObservableList<PageHandle>, current_page: Property<Option<PageHandle>>) {
    pages.on_change(move |items| {
        let Some(current) = current_page.get() else {
            return;
        };
        if items.contains(&current) {
            return;
        }
        let fallback = items.first().cloned();
        tracing::debug!(removed = %current.title(), "current page left the wizard");
        if let Err(err) = current_page.set(fallback) {
            tracing::warn!(%err, "could not move off a removed page");
        }
    });
}

// ---------------------------------------------------------------------------
// Wizard
// ---------------------------------------------------------------------------

/// A multi-step flow over [`Page`](super::Page)s.
pub struct Wizard {
    title: Property<String>,
    heading: Property<String>,
    pages: ObservableList<PageHandle>,
    current_page: Property<Option<PageHandle>>,
    has_next: Binding<bool>,
    has_previous: Binding<bool>,
    all_pages_complete: Binding<bool>,
    current_page_complete: Property<bool>,
    complete: Property<bool>,
    can_finish: Binding<bool>,
    can_go_next: Binding<bool>,
    can_go_back: Binding<bool>,
    next_enabled: Binding<bool>,
    heading_visible: Binding<bool>,
    open: Property<bool>,
    options: WizardOptions,
    texts: WizardTexts,
    commit_key: Cell<CommitKey>,
    flow: Box<dyn WizardFlow>,
    docks: Rc<RefCell<DockTracker>>,
    completion: Rc<RefCell<CompletionListeners>>,
    docked: Cell<bool>,
}

impl Wizard {
    /// A linear wizard with default configuration and no pages.
    pub fn new(title: impl Into<String>) -> Self {
        WizardBuilder::new(title).build()
    }

    pub fn builder(title: impl Into<String>) -> WizardBuilder {
        WizardBuilder::new(title)
    }

    // -- observables --------------------------------------------------------

    pub fn title(&self) -> Property<String> {
        self.title
    }

    pub fn heading(&self) -> Property<String> {
        self.heading
    }

    pub fn pages(&self) -> ObservableList<PageHandle> {
        self.pages
    }

    pub fn current_page(&self) -> Property<Option<PageHandle>> {
        self.current_page
    }

    pub fn has_next(&self) -> Binding<bool> {
        self.has_next
    }

    pub fn has_previous(&self) -> Binding<bool> {
        self.has_previous
    }

    pub fn all_pages_complete(&self) -> Binding<bool> {
        self.all_pages_complete
    }

    /// Mirrors the current page's completion flag.
    pub fn current_page_complete(&self) -> Property<bool> {
        self.current_page_complete
    }

    pub fn complete(&self) -> Property<bool> {
        self.complete
    }

    pub fn can_finish(&self) -> Binding<bool> {
        self.can_finish
    }

    pub fn can_go_next(&self) -> Binding<bool> {
        self.can_go_next
    }

    pub fn can_go_back(&self) -> Binding<bool> {
        self.can_go_back
    }

    pub fn options(&self) -> &WizardOptions {
        &self.options
    }

    pub fn texts(&self) -> &WizardTexts {
        &self.texts
    }

    pub fn commit_key(&self) -> CommitKey {
        self.commit_key.get()
    }

    pub fn set_commit_key(&self, key: CommitKey) {
        self.commit_key.set(key);
    }

    pub fn is_open(&self) -> bool {
        self.open.get()
    }

    pub fn is_docked(&self) -> bool {
        self.docked.get()
    }

    // -- queries ------------------------------------------------------------

    pub fn add_page(&self, page: PageHandle) {
        self.pages.push(page);
    }

    pub fn current(&self) -> Option<PageHandle> {
        self.current_page.get()
    }

    /// Position of the current page in `pages`.
    pub fn current_index(&self) -> Option<usize> {
        current_index(self.pages, self.current_page)
    }

    pub fn state(&self) -> WizardState {
        if !self.is_open() {
            return WizardState::Closed;
        }
        match self.current_index() {
            Some(index) => WizardState::OnPage(index),
            None => WizardState::NoCurrentPage,
        }
    }

    fn ensure_open(&self) -> Result<(), NavigationError> {
        if self.is_open() {
            Ok(())
        } else {
            Err(rejected(NavigationError::Closed))
        }
    }

    fn require_current(&self) -> Result<PageHandle, NavigationError> {
        self.current().ok_or_else(|| rejected(NavigationError::NoCurrentPage))
    }

    fn page_at(&self, index: usize) -> Result<PageHandle, NavigationError> {
        self.pages.get_at(index).ok_or_else(|| {
            rejected(NavigationError::OutOfBounds {
                index,
                len: self.pages.len(),
            })
        })
    }

    fn move_to(&self, page: PageHandle, action: &'static str) -> Result<(), NavigationError> {
        tracing::debug!(action, page = %page.title(), "changing page");
        self.current_page.set(Some(page))?;
        Ok(())
    }

    // -- lifecycle ----------------------------------------------------------

    /// Show the wizard: select the first page if none is current and start
    /// firing completion listeners. Only the first call does anything.
    pub fn dock(&self) -> Result<(), NavigationError> {
        if self.docked.replace(true) {
            return Ok(());
        }
        if self.current().is_none() {
            if let Some(first) = self.pages.first() {
                self.current_page.set(Some(first))?;
            }
        }
        let registry = Rc::clone(&self.completion);
        self.complete.on_change(move |done| {
            if !*done {
                return;
            }
            // Listeners added during the pass wait for the next one; listeners
            // disposed during the pass are skipped.
            let listeners = registry.borrow().snapshot();
            for (id, listener) in listeners {
                if registry.borrow().contains(id) {
                    listener();
                }
            }
        });
        tracing::debug!(title = %self.title.get(), pages = self.pages.len(), "wizard docked");
        Ok(())
    }

    /// Run queued page docks: focus each page's first focusable control,
    /// then call its dock hook. Returns how many pages were docked.
    pub fn run_deferred(&self, toolkit: &mut dyn Toolkit) -> usize {
        let pending = self.docks.borrow_mut().take_pending();
        let mut docked = 0;
        for page in pending {
            if self.current_page.with(|current| current.as_ref() != Some(&page)) {
                continue;
            }
            if let Some(target) = page.root().and_then(|root| toolkit.first_focusable(root)) {
                toolkit.request_focus(target);
            }
            self.docks.borrow_mut().mark_docked(page.clone());
            tracing::debug!(page = %page.title(), "docking page");
            page.on_dock();
            docked += 1;
        }
        docked
    }

    /// Dock events recorded since the last call.
    pub fn drain_dock_events(&self) -> Vec<DockEvent> {
        self.docks.borrow_mut().drain_events()
    }

    /// Register a listener fired each time the wizard becomes complete.
    pub fn on_complete(&self, listener: impl Fn() + 'static) -> CompletionHandle {
        let mut registry = self.completion.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.entries.push((id, Rc::new(listener)));
        CompletionHandle {
            id,
            registry: Rc::downgrade(&self.completion),
        }
    }

    // -- navigation ---------------------------------------------------------

    /// Save the current page and, if it is complete, move to the page the
    /// flow picks. Returns whether the wizard moved.
    pub fn next(&self) -> Result<bool, NavigationError> {
        self.ensure_open()?;
        let page = self.require_current()?;
        page.on_save();
        if !page.is_complete() {
            tracing::debug!(page = %page.title(), "page incomplete, staying");
            return Ok(false);
        }
        let index = self
            .flow
            .next_page(self)
            .ok_or_else(|| rejected(NavigationError::NoNextPage))?;
        let target = self.page_at(index)?;
        self.move_to(target, "next")?;
        Ok(true)
    }

    /// Move to the previous page. Never checks completion.
    pub fn back(&self) -> Result<(), NavigationError> {
        self.ensure_open()?;
        self.require_current()?;
        let index = self
            .flow
            .previous_page(self)
            .ok_or_else(|| rejected(NavigationError::NoPreviousPage))?;
        let target = self.page_at(index)?;
        self.move_to(target, "back")
    }

    /// Make `page` current without saving anything.
    pub fn jump_to(&self, page: &PageHandle) -> Result<(), NavigationError> {
        self.ensure_open()?;
        if !self.pages.contains(page) {
            return Err(rejected(NavigationError::UnknownPage));
        }
        self.move_to(page.clone(), "jump")
    }

    /// Follow the step link of `page`. Jumping forward saves the current
    /// page first and requires it to be complete while step links commit.
    /// Returns whether the wizard moved.
    pub fn click_step_link(&self, page: &PageHandle) -> Result<bool, NavigationError> {
        self.ensure_open()?;
        if !self.options.enable_step_links.get() {
            return Ok(false);
        }
        let target = self
            .pages
            .position(page)
            .ok_or_else(|| rejected(NavigationError::UnknownPage))?;
        if let Some(current) = self.current() {
            let forward = self.current_index().is_some_and(|index| target > index);
            if forward && self.options.step_links_commits.get() {
                current.on_save();
                if !current.is_complete() {
                    return Ok(false);
                }
            }
        }
        self.move_to(page.clone(), "step link")?;
        Ok(true)
    }

    /// Save the current page; if it is complete, save the wizard and close
    /// it once complete. Returns whether the wizard closed.
    pub fn finish(&self) -> Result<bool, NavigationError> {
        self.ensure_open()?;
        let page = self.require_current()?;
        page.on_save();
        if !page.is_complete() {
            return Ok(false);
        }
        self.on_save()?;
        if !self.complete.get() {
            tracing::debug!("wizard save declined, staying open");
            return Ok(false);
        }
        self.close()?;
        Ok(true)
    }

    /// Mark the wizard complete unless the flow declines.
    pub fn on_save(&self) -> Result<(), NavigationError> {
        if self.flow.on_save(self) {
            self.complete.set(true)?;
        }
        Ok(())
    }

    /// The cancel action: delegates to the flow, which closes by default.
    pub fn on_cancel(&self) -> Result<(), NavigationError> {
        self.flow.on_cancel(self)
    }

    pub fn cancel(&self) -> Result<(), NavigationError> {
        tracing::debug!(title = %self.title.get(), "wizard cancelled");
        self.close()
    }

    /// Close the wizard. Closing twice is a no-op.
    pub fn close(&self) -> Result<(), NavigationError> {
        if self.is_open() {
            self.open.set(false)?;
            tracing::debug!(
                title = %self.title.get(),
                complete = self.complete.get(),
                "wizard closed"
            );
        }
        Ok(())
    }

    /// Route a key press through commit-on-key handling.
    pub fn handle_key(
        &self,
        event: KeyEvent,
        target: KeyTarget,
    ) -> Result<KeyOutcome, NavigationError> {
        if !self.is_docked() || !self.is_open() {
            return Ok(KeyOutcome::Ignored);
        }
        let gates = CommitGates {
            enabled: self.options.enter_progresses.get(),
            all_pages_complete: self.all_pages_complete.get(),
            current_page_complete: self.current_page_complete.get(),
            can_go_next: self.can_go_next.get(),
        };
        let outcome = match commit_action(event, target, self.commit_key(), gates) {
            CommitAction::Ignore => KeyOutcome::Ignored,
            CommitAction::Nothing => KeyOutcome::Blocked,
            CommitAction::Finish => {
                if self.finish()? {
                    KeyOutcome::Finished
                } else {
                    KeyOutcome::Blocked
                }
            }
            CommitAction::Advance => {
                if self.next()? {
                    KeyOutcome::Advanced
                } else {
                    KeyOutcome::Blocked
                }
            }
        };
        Ok(outcome)
    }

    // -- presentation -------------------------------------------------------

    /// `can_go_next ∧ has_next ∧ current_page_complete`.
    pub fn next_enabled(&self) -> Binding<bool> {
        self.next_enabled
    }

    pub fn back_enabled(&self) -> Binding<bool> {
        self.can_go_back
    }

    pub fn finish_enabled(&self) -> Binding<bool> {
        self.can_finish
    }

    /// `true` while the heading differs from the title.
    pub fn heading_visible(&self) -> Binding<bool> {
        self.heading_visible
    }

    /// `true` while the heading is non-blank and differs from the title.
    pub fn heading_shown(&self) -> Binding<bool> {
        self.heading_visible.and(&self.heading.is_not_blank())
    }

    pub fn is_page_active(&self, page: &PageHandle) -> Binding<bool> {
        self.current_page.is_equal_to_value(Some(page.clone()))
    }

    /// Text of `page`'s step link: `"{n}. {title}"` while steps are numbered.
    pub fn step_label(&self, page: &PageHandle) -> Binding<String> {
        let pages = self.pages;
        let numbered = self.options.numbered_steps;
        let page = page.clone();
        Binding::new(&[pages.id(), numbered.id()], move || {
            step_text(pages.position(&page), numbered.get(), &page)
        })
    }

    /// Current step link texts in page order.
    pub fn step_labels(&self) -> Vec<String> {
        let numbered = self.options.numbered_steps.get();
        self.pages
            .get()
            .iter()
            .enumerate()
            .map(|(index, page)| step_text(Some(index), numbered, page))
            .collect()
    }
}

fn rejected(err: NavigationError) -> NavigationError {
    tracing::warn!(%err, "navigation rejected");
    err
}

fn step_text(position: Option<usize>, numbered: bool, page: &PageHandle) -> String {
    match position {
        Some(index) if numbered => format!("{}. {}", index + 1, page.title()),
        _ => page.title(),
    }
}

impl fmt::Debug for Wizard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wizard")
            .field("title", &self.title.get())
            .field("pages", &self.pages.len())
            .field("state", &self.state())
            .field("complete", &self.complete.get())
            .finish()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Dom, NodeData};
    use crate::event::{Key, Modifiers};
    use crate::reactive::runtime::reset_runtime;
    use crate::wizard::page::SimplePage;
    use tracing_test::traced_test;

    fn setup() {
        reset_runtime();
    }

    fn pages(titles: &[&str]) -> Vec<Rc<SimplePage>> {
        titles.iter().map(|t| Rc::new(SimplePage::new(*t))).collect()
    }

    fn handles(pages: &[Rc<SimplePage>]) -> Vec<PageHandle> {
        pages.iter().map(|p| PageHandle::from_rc(p.clone())).collect()
    }

    fn three() -> (Wizard, Vec<Rc<SimplePage>>, Vec<PageHandle>) {
        let raw = pages(&["A", "B", "C"]);
        let hs = handles(&raw);
        let wizard = Wizard::builder("Setup").pages(hs.clone()).build();
        wizard.dock().unwrap();
        (wizard, raw, hs)
    }

    #[test]
    fn dock_selects_first_page() {
        setup();
        let (wizard, _, hs) = three();
        assert_eq!(wizard.current(), Some(hs[0].clone()));
        assert_eq!(wizard.state(), WizardState::OnPage(0));
        assert!(wizard.has_next().get());
        assert!(!wizard.has_previous().get());
    }

    #[test]
    fn empty_wizard_has_no_current_page() {
        setup();
        let wizard = Wizard::new("Empty");
        wizard.dock().unwrap();
        assert_eq!(wizard.state(), WizardState::NoCurrentPage);
        assert!(!wizard.all_pages_complete().get());
        assert!(!wizard.has_next().get());
        assert_eq!(wizard.next(), Err(NavigationError::NoCurrentPage));
    }

    #[test]
    fn gates_follow_current_page() {
        setup();
        let (wizard, _, hs) = three();
        wizard.jump_to(&hs[1]).unwrap();
        assert!(wizard.has_next().get());
        assert!(wizard.has_previous().get());
        wizard.jump_to(&hs[2]).unwrap();
        assert!(!wizard.has_next().get());
        assert!(wizard.has_previous().get());
    }

    #[test]
    fn next_requires_complete_page() {
        setup();
        let (wizard, raw, hs) = three();
        assert_eq!(wizard.next(), Ok(false));
        assert_eq!(raw[0].save_count(), 1);
        assert_eq!(wizard.current(), Some(hs[0].clone()));

        raw[0].set_complete(true);
        assert_eq!(wizard.next(), Ok(true));
        assert_eq!(wizard.current(), Some(hs[1].clone()));
    }

    #[test]
    fn save_hook_can_complete_page() {
        setup();
        let page = Rc::new(SimplePage::new("Auto").on_save_with(|p| p.set_complete(true)));
        let wizard = Wizard::builder("Hook")
            .page(PageHandle::from_rc(page.clone()))
            .page(PageHandle::new(SimplePage::new("Next")))
            .build();
        wizard.dock().unwrap();
        assert_eq!(wizard.next(), Ok(true));
        assert_eq!(wizard.state(), WizardState::OnPage(1));
    }

    #[test]
    fn next_past_last_page_fails_loudly() {
        setup();
        let (wizard, raw, hs) = three();
        raw[2].set_complete(true);
        wizard.jump_to(&hs[2]).unwrap();
        assert_eq!(
            wizard.next(),
            Err(NavigationError::OutOfBounds { index: 3, len: 3 })
        );
    }

    #[test]
    fn back_ignores_completion() {
        setup();
        let (wizard, _, hs) = three();
        wizard.jump_to(&hs[2]).unwrap();
        wizard.back().unwrap();
        assert_eq!(wizard.current(), Some(hs[1].clone()));
        wizard.back().unwrap();
        assert_eq!(wizard.back(), Err(NavigationError::NoPreviousPage));
    }

    #[test]
    fn current_page_complete_mirrors_current_page() {
        setup();
        let (wizard, raw, hs) = three();
        let mirror = wizard.current_page_complete();
        assert!(!mirror.get());
        raw[0].set_complete(true);
        assert!(mirror.get());
        wizard.jump_to(&hs[1]).unwrap();
        assert!(!mirror.get());
        raw[1].set_complete(true);
        assert!(mirror.get());
        raw[0].set_complete(false);
        assert!(mirror.get());
    }

    #[test]
    fn all_pages_complete_tracks_each_page() {
        setup();
        let (wizard, raw, _) = three();
        raw[0].set_complete(true);
        raw[1].set_complete(true);
        assert!(!wizard.all_pages_complete().get());
        raw[2].set_complete(true);
        assert!(wizard.all_pages_complete().get());

        let late = Rc::new(SimplePage::new("D"));
        wizard.add_page(PageHandle::from_rc(late.clone()));
        assert!(!wizard.all_pages_complete().get());
        late.set_complete(true);
        assert!(wizard.all_pages_complete().get());
    }

    #[test]
    fn finish_saves_and_closes() {
        setup();
        let (wizard, raw, hs) = three();
        let fired = Rc::new(Cell::new(0));
        let fired_c = fired.clone();
        wizard.on_complete(move || fired_c.set(fired_c.get() + 1));

        wizard.jump_to(&hs[2]).unwrap();
        assert_eq!(wizard.finish(), Ok(false));
        assert!(wizard.is_open());

        raw[2].set_complete(true);
        assert_eq!(wizard.finish(), Ok(true));
        assert!(!wizard.is_open());
        assert!(wizard.complete().get());
        assert_eq!(wizard.state(), WizardState::Closed);
        assert_eq!(fired.get(), 1);
        assert_eq!(wizard.finish(), Err(NavigationError::Closed));
    }

    #[test]
    fn completion_listeners_fire_in_order_and_dispose() {
        setup();
        let (wizard, raw, _) = three();
        let log = Rc::new(RefCell::new(Vec::new()));
        let first = log.clone();
        let second = log.clone();
        let gone = log.clone();
        wizard.on_complete(move || first.borrow_mut().push("first"));
        let handle = wizard.on_complete(move || gone.borrow_mut().push("disposed"));
        wizard.on_complete(move || second.borrow_mut().push("second"));
        handle.dispose();

        raw[0].set_complete(true);
        assert_eq!(wizard.finish(), Ok(true));
        assert_eq!(*log.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn completion_listeners_ignore_repeated_true() {
        setup();
        let (wizard, raw, _) = three();
        let fired = Rc::new(Cell::new(0));
        let fired_c = fired.clone();
        wizard.on_complete(move || fired_c.set(fired_c.get() + 1));

        raw[0].set_complete(true);
        assert_eq!(wizard.finish(), Ok(true));
        assert_eq!(fired.get(), 1);

        wizard.complete().set(true).unwrap();
        wizard.on_save().unwrap();
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn completion_listeners_may_register_and_dispose_during_dispatch() {
        setup();
        let raw = pages(&["A"]);
        let wizard = Rc::new(Wizard::builder("Setup").pages(handles(&raw)).build());
        wizard.dock().unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));

        let victim_log = log.clone();
        let victim: Rc<RefCell<Option<CompletionHandle>>> = Rc::new(RefCell::new(None));
        let victim_slot = victim.clone();
        let owner = Rc::downgrade(&wizard);
        let first_log = log.clone();
        wizard.on_complete(move || {
            first_log.borrow_mut().push("first");
            if let Some(handle) = victim_slot.borrow_mut().take() {
                handle.dispose();
            }
            if let Some(wizard) = owner.upgrade() {
                let late_log = first_log.clone();
                wizard.on_complete(move || late_log.borrow_mut().push("late"));
            }
        });
        *victim.borrow_mut() =
            Some(wizard.on_complete(move || victim_log.borrow_mut().push("victim")));
        let last_log = log.clone();
        wizard.on_complete(move || last_log.borrow_mut().push("last"));

        wizard.complete().set(true).unwrap();
        assert_eq!(*log.borrow(), vec!["first", "last"]);

        log.borrow_mut().clear();
        wizard.complete().set(false).unwrap();
        wizard.complete().set(true).unwrap();
        assert_eq!(*log.borrow(), vec!["first", "last", "late"]);
    }

    #[test]
    fn next_enabled_notifies_late_subscribers() {
        setup();
        let (wizard, raw, _) = three();
        raw[0].set_complete(true);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_c = seen.clone();
        wizard
            .next_enabled()
            .on_change(move |enabled| seen_c.borrow_mut().push(*enabled));

        raw[0].set_complete(false);
        raw[0].set_complete(true);
        assert_eq!(*seen.borrow(), vec![false, true]);
    }

    #[test]
    fn flow_can_decline_save() {
        setup();
        struct Reluctant;
        impl WizardFlow for Reluctant {
            fn on_save(&self, _wizard: &Wizard) -> bool {
                false
            }
        }
        let page = Rc::new(SimplePage::new("Only").with_complete(true));
        let wizard = Wizard::builder("Reluctant")
            .page(PageHandle::from_rc(page.clone()))
            .flow(Reluctant)
            .build();
        wizard.dock().unwrap();
        assert_eq!(wizard.finish(), Ok(false));
        assert!(wizard.is_open());
        assert!(!wizard.complete().get());
    }

    #[test]
    fn custom_flow_skips_pages() {
        setup();
        struct SkipOne;
        impl WizardFlow for SkipOne {
            fn next_page(&self, wizard: &Wizard) -> Option<usize> {
                wizard.current_index().map(|index| index + 2)
            }
        }
        let raw = pages(&["A", "B", "C"]);
        raw[0].set_complete(true);
        let hs = handles(&raw);
        let wizard = Wizard::builder("Skip").pages(hs.clone()).flow(SkipOne).build();
        wizard.dock().unwrap();
        assert_eq!(wizard.next(), Ok(true));
        assert_eq!(wizard.current(), Some(hs[2].clone()));
    }

    #[test]
    fn cancel_and_on_cancel_close() {
        setup();
        let (wizard, _, _) = three();
        wizard.on_cancel().unwrap();
        assert!(!wizard.is_open());
        wizard.cancel().unwrap();
        assert!(!wizard.complete().get());
    }

    #[test]
    fn flow_can_veto_cancel() {
        setup();
        struct Confirming(Cell<bool>);
        impl WizardFlow for Confirming {
            fn on_cancel(&self, wizard: &Wizard) -> Result<(), NavigationError> {
                if self.0.get() {
                    wizard.cancel()
                } else {
                    Ok(())
                }
            }
        }
        let wizard = Wizard::builder("Careful")
            .page(PageHandle::new(SimplePage::new("A")))
            .flow(Confirming(Cell::new(false)))
            .build();
        wizard.on_cancel().unwrap();
        assert!(wizard.is_open());
    }

    #[test]
    fn step_links_disabled_by_default() {
        setup();
        let (wizard, _, hs) = three();
        assert_eq!(wizard.click_step_link(&hs[2]), Ok(false));
        assert_eq!(wizard.current(), Some(hs[0].clone()));
    }

    #[test]
    fn step_link_forward_commits() {
        setup();
        let (wizard, raw, hs) = three();
        wizard.options().enable_step_links.set(true).unwrap();
        assert_eq!(wizard.click_step_link(&hs[2]), Ok(false));
        assert_eq!(raw[0].save_count(), 1);

        raw[0].set_complete(true);
        assert_eq!(wizard.click_step_link(&hs[2]), Ok(true));
        assert_eq!(wizard.current(), Some(hs[2].clone()));

        // Backward never commits.
        assert_eq!(wizard.click_step_link(&hs[1]), Ok(true));
        assert_eq!(raw[2].save_count(), 0);
    }

    #[test]
    fn step_link_without_commit_jumps() {
        setup();
        let (wizard, raw, hs) = three();
        wizard.options().enable_step_links.set(true).unwrap();
        wizard.options().step_links_commits.set(false).unwrap();
        assert_eq!(wizard.click_step_link(&hs[2]), Ok(true));
        assert_eq!(raw[0].save_count(), 0);
        let stranger = PageHandle::new(SimplePage::new("X"));
        assert_eq!(
            wizard.click_step_link(&stranger),
            Err(NavigationError::UnknownPage)
        );
    }

    #[test]
    fn undock_is_immediate_and_dock_is_deferred() {
        setup();
        let (wizard, raw, hs) = three();
        let mut dom = Dom::new();
        assert_eq!(wizard.run_deferred(&mut dom), 1);
        assert_eq!(raw[0].dock_count(), 1);

        raw[0].set_complete(true);
        wizard.next().unwrap();
        assert_eq!(raw[0].undock_count(), 1);
        assert_eq!(raw[1].dock_count(), 0);
        assert_eq!(wizard.run_deferred(&mut dom), 1);
        assert_eq!(raw[1].dock_count(), 1);
        assert_eq!(
            wizard.drain_dock_events(),
            vec![
                DockEvent::Docked(hs[0].clone()),
                DockEvent::Undocked(hs[0].clone()),
                DockEvent::Docked(hs[1].clone()),
            ]
        );
    }

    #[test]
    fn page_left_before_deferred_dock_never_docks() {
        setup();
        let (wizard, raw, hs) = three();
        wizard.jump_to(&hs[1]).unwrap();
        let mut dom = Dom::new();
        assert_eq!(wizard.run_deferred(&mut dom), 1);
        assert_eq!(raw[0].dock_count(), 0);
        assert_eq!(raw[0].undock_count(), 0);
        assert_eq!(raw[1].dock_count(), 1);
    }

    #[test]
    fn deferred_dock_focuses_first_input() {
        setup();
        let mut dom = Dom::new();
        let root = dom.insert(NodeData::new("page"));
        dom.insert_child(root, NodeData::new("label"));
        let input = dom.insert_child(root, NodeData::new("input").focusable(true));
        let page = PageHandle::new(SimplePage::new("Form").with_root(root));
        let wizard = Wizard::builder("Focus").page(page).build();
        wizard.dock().unwrap();
        wizard.run_deferred(&mut dom);
        assert_eq!(dom.focused(), Some(input));
    }

    #[test]
    fn removing_current_page_falls_back_to_first() {
        setup();
        let (wizard, raw, hs) = three();
        wizard.jump_to(&hs[1]).unwrap();
        assert!(wizard.pages().remove_item(&hs[1]));
        assert_eq!(wizard.current(), Some(hs[0].clone()));
        wizard.pages().clear();
        assert_eq!(wizard.state(), WizardState::NoCurrentPage);
        raw[0].set_complete(true);
        assert!(!wizard.current_page_complete().get());
    }

    #[test]
    fn custom_gates_are_used() {
        setup();
        let raw = pages(&["A", "B"]);
        let wizard = Wizard::builder("Gated")
            .pages(handles(&raw))
            .can_finish(|gates| gates.all_pages_complete)
            .can_go_back(|_| Binding::constant(false))
            .build();
        wizard.dock().unwrap();
        assert!(!wizard.finish_enabled().get());
        raw[0].set_complete(true);
        raw[1].set_complete(true);
        assert!(wizard.finish_enabled().get());
        assert!(!wizard.back_enabled().get());
    }

    #[test]
    fn next_enabled_combines_gates() {
        setup();
        let (wizard, raw, hs) = three();
        let enabled = wizard.next_enabled();
        assert!(!enabled.get());
        raw[0].set_complete(true);
        assert!(enabled.get());
        raw[2].set_complete(true);
        wizard.jump_to(&hs[2]).unwrap();
        assert!(!enabled.get());
    }

    #[test]
    fn heading_defaults_to_title() {
        setup();
        let plain = Wizard::new("Install");
        assert_eq!(plain.heading().get(), "Install");
        assert!(!plain.heading_visible().get());
        plain.title().set("Setup".into()).unwrap();
        assert_eq!(plain.heading().get(), "Setup");

        let headed = Wizard::builder("Install").heading("Pick a folder").build();
        assert!(headed.heading_visible().get());
        assert!(headed.heading_shown().get());
        headed.heading().set(String::new()).unwrap();
        assert!(headed.heading_visible().get());
        assert!(!headed.heading_shown().get());
    }

    #[test]
    fn step_labels_follow_numbering() {
        setup();
        let (wizard, _, hs) = three();
        let label = wizard.step_label(&hs[1]);
        assert_eq!(label.get(), "2. B");
        wizard.options().numbered_steps.set(false).unwrap();
        assert_eq!(label.get(), "B");
        assert_eq!(wizard.step_labels(), vec!["A", "B", "C"]);
        let active = wizard.is_page_active(&hs[1]);
        assert!(!active.get());
        wizard.jump_to(&hs[1]).unwrap();
        assert!(active.get());
    }

    #[test]
    fn enter_advances_then_finishes() {
        setup();
        let raw = pages(&["A", "B"]);
        let hs = handles(&raw);
        let wizard = Wizard::builder("Keys")
            .config(WizardConfig::new().with_enter_progresses(true))
            .pages(hs.clone())
            .build();
        let enter = KeyEvent::plain(Key::Enter);
        assert_eq!(
            wizard.handle_key(enter, KeyTarget::plain()),
            Ok(KeyOutcome::Ignored)
        );
        wizard.dock().unwrap();

        assert_eq!(
            wizard.handle_key(enter, KeyTarget::plain()),
            Ok(KeyOutcome::Blocked)
        );
        raw[0].set_complete(true);
        assert_eq!(
            wizard.handle_key(enter, KeyTarget::plain()),
            Ok(KeyOutcome::Advanced)
        );
        raw[1].set_complete(true);
        assert_eq!(
            wizard.handle_key(enter, KeyTarget::multiline()),
            Ok(KeyOutcome::Ignored)
        );
        let ctrl_enter = KeyEvent::new(Key::Enter, Modifiers::CTRL);
        assert_eq!(
            wizard.handle_key(ctrl_enter, KeyTarget::multiline()),
            Ok(KeyOutcome::Finished)
        );
        assert!(!wizard.is_open());
    }

    #[test]
    fn enter_ignored_when_disabled() {
        setup();
        let (wizard, raw, _) = three();
        raw[0].set_complete(true);
        assert_eq!(
            wizard.handle_key(KeyEvent::plain(Key::Enter), KeyTarget::plain()),
            Ok(KeyOutcome::Ignored)
        );
        assert_eq!(wizard.state(), WizardState::OnPage(0));
    }

    #[test]
    fn dock_is_idempotent() {
        setup();
        let (wizard, raw, _) = three();
        let fired = Rc::new(Cell::new(0));
        let fired_c = fired.clone();
        wizard.on_complete(move || fired_c.set(fired_c.get() + 1));
        wizard.dock().unwrap();
        raw[0].set_complete(true);
        wizard.finish().unwrap();
        assert_eq!(fired.get(), 1);
    }

    #[test]
    #[traced_test]
    fn lifecycle_is_logged() {
        setup();
        let (wizard, raw, _) = three();
        assert!(logs_contain("wizard docked"));
        let mut dom = Dom::new();
        wizard.run_deferred(&mut dom);
        assert!(logs_contain("docking page"));
        assert_eq!(wizard.next(), Ok(false));
        assert!(logs_contain("page incomplete, staying"));
        raw[0].set_complete(true);
        wizard.next().unwrap();
        assert!(logs_contain("undocking page"));
        assert_eq!(wizard.back(), Ok(()));
        assert!(logs_contain("changing page"));
        assert!(wizard.back().is_err());
        assert!(logs_contain("navigation rejected"));
        wizard.close().unwrap();
        assert!(logs_contain("wizard closed"));
    }
}
