//! Pilot: programmatic interaction with a headless wizard.
//!
//! The `Pilot` owns a [`Wizard`] and the [`Dom`] its pages live in, and
//! simulates what a user does with a wizard view: pressing keys, clicking
//! buttons and step links. Deferred page docks are flushed after every
//! action, the way a UI loop would at the end of an update cycle.

use crate::dom::{Dom, NodeId, Toolkit};
use crate::event::{Key, KeyEvent, KeyTarget, Modifiers};
use crate::reactive::Observable;
use crate::wizard::{KeyOutcome, NavigationError, PageHandle, Wizard};

/// A headless wizard driver for testing.
///
/// # Examples
///
/// ```
/// use gilt_bind::dom::Dom;
/// use gilt_bind::testing::Pilot;
/// use gilt_bind::wizard::{PageHandle, SimplePage, Wizard};
///
/// let wizard = Wizard::builder("Setup")
///     .page(PageHandle::new(SimplePage::new("Only").with_complete(true)))
///     .build();
/// let mut pilot = Pilot::new(wizard, Dom::new()).unwrap();
/// assert!(pilot.click_finish().unwrap());
/// assert!(!pilot.wizard().is_open());
/// ```
pub struct Pilot {
    wizard: Wizard,
    dom: Dom,
}

impl Pilot {
    /// Dock `wizard` and run the first deferred page dock against `dom`.
    pub fn new(wizard: Wizard, dom: Dom) -> Result<Self, NavigationError> {
        wizard.dock()?;
        let mut pilot = Self { wizard, dom };
        pilot.process();
        Ok(pilot)
    }

    // ── Input simulation ─────────────────────────────────────────────

    /// Simulate a key press with no modifiers.
    pub fn press_key(&mut self, key: Key) -> Result<KeyOutcome, NavigationError> {
        self.press_key_with(key, Modifiers::NONE)
    }

    /// Simulate a key press with the given modifiers, aimed at whatever has
    /// focus in the dom.
    pub fn press_key_with(
        &mut self,
        key: Key,
        modifiers: Modifiers,
    ) -> Result<KeyOutcome, NavigationError> {
        let target = KeyTarget {
            multiline: self
                .dom
                .focused()
                .is_some_and(|node| self.dom.is_multiline(node)),
        };
        let outcome = self.wizard.handle_key(KeyEvent::new(key, modifiers), target)?;
        self.process();
        Ok(outcome)
    }

    /// Move focus to `node`, as a user clicking into a control would.
    pub fn focus(&mut self, node: NodeId) -> bool {
        self.dom.request_focus(node)
    }

    // ── Buttons ──────────────────────────────────────────────────────

    /// Click Next. Does nothing while the button is disabled.
    pub fn click_next(&mut self) -> Result<bool, NavigationError> {
        if !self.wizard.next_enabled().get() {
            return Ok(false);
        }
        let moved = self.wizard.next()?;
        self.process();
        Ok(moved)
    }

    /// Click Back. Does nothing while the button is disabled.
    pub fn click_back(&mut self) -> Result<bool, NavigationError> {
        if !self.wizard.back_enabled().get() {
            return Ok(false);
        }
        self.wizard.back()?;
        self.process();
        Ok(true)
    }

    /// Click Finish. Returns whether the wizard closed.
    pub fn click_finish(&mut self) -> Result<bool, NavigationError> {
        if !self.wizard.finish_enabled().get() {
            return Ok(false);
        }
        let closed = self.wizard.finish()?;
        self.process();
        Ok(closed)
    }

    pub fn click_cancel(&mut self) -> Result<(), NavigationError> {
        self.wizard.on_cancel()
    }

    /// Click the step link of `page`.
    pub fn click_step(&mut self, page: &PageHandle) -> Result<bool, NavigationError> {
        let moved = self.wizard.click_step_link(page)?;
        self.process();
        Ok(moved)
    }

    // ── Processing ───────────────────────────────────────────────────

    /// Flush deferred page docks. Returns how many pages docked.
    pub fn process(&mut self) -> usize {
        self.wizard.run_deferred(&mut self.dom)
    }

    // ── Query ────────────────────────────────────────────────────────

    pub fn wizard(&self) -> &Wizard {
        &self.wizard
    }

    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut Dom {
        &mut self.dom
    }

    /// Title of the current page.
    pub fn current_title(&self) -> Option<String> {
        self.wizard.current().map(|page| page.title())
    }
}

// ===========================================================================
// Tests
// ===========================================================================
