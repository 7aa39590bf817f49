//! Overridable navigation policy.
//!
//! A [`WizardFlow`] decides where Next and Back lead and what saving or
//! cancelling the whole wizard means. [`LinearFlow`] walks the pages in
//! order.

use super::machine::{NavigationError, Wizard};

pub trait WizardFlow {
    /// Index of the page Next leads to. `None` when there is none.
    fn next_page(&self, wizard: &Wizard) -> Option<usize> {
        wizard.current_index().map(|index| index + 1)
    }

    /// Index of the page Back leads to. `None` when there is none.
    fn previous_page(&self, wizard: &Wizard) -> Option<usize> {
        wizard.current_index().and_then(|index| index.checked_sub(1))
    }

    /// Called when the user cancels. Overrides may confirm first, but end
    /// in [`Wizard::cancel`] or [`Wizard::close`].
    fn on_cancel(&self, wizard: &Wizard) -> Result<(), NavigationError> {
        wizard.cancel()
    }

    /// Called once every page is saved during finish. Return `false` to keep
    /// the wizard incomplete and open.
    fn on_save(&self, _wizard: &Wizard) -> bool {
        true
    }
}

/// Pages in list order, closing on cancel.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearFlow;

impl WizardFlow for LinearFlow {}
