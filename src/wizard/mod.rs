//! Multi-step wizard: pages, navigation gates, dock lifecycle, commit key.
//!
//! - [`Wizard`] / [`WizardBuilder`]: the state machine.
//! - [`Page`], [`PageHandle`], [`SimplePage`]: the steps.
//! - [`WizardFlow`]: overridable navigation policy.
//! - [`WizardConfig`]: display toggles, labels, commit key.

pub mod config;
pub mod dock;
pub mod flow;
pub mod keyboard;
pub mod machine;
pub mod page;

pub use config::{CommitKey, WizardConfig, WizardLabels, WizardOptions, WizardTexts};
pub use dock::{DockEvent, DockTracker};
pub use flow::{LinearFlow, WizardFlow};
pub use keyboard::KeyOutcome;
pub use machine::{CompletionHandle, Gates, NavigationError, Wizard, WizardBuilder, WizardState};
pub use page::{Page, PageHandle, SimplePage};
