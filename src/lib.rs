//! # gilt-bind
//!
//! Observable properties with a binding algebra, and a multi-step wizard
//! state machine built on them.
//!
//! Application code declares values as [`Property`](reactive::Property)s,
//! derives everything else as [`Binding`](reactive::Binding)s, and lets the
//! runtime keep them in sync. The [`wizard`] module uses the same
//! observables for page sequencing, completion gating, step links and
//! keyboard-driven progression. Drawing is left to a [`Toolkit`](dom::Toolkit);
//! the crate ships a headless [`Dom`](dom::Dom) implementation.
//!
//! ## Core Systems
//!
//! - **[`reactive`]**: properties, bindings, observable lists, numeric/boolean/string algebra
//! - **[`wizard`]**: pages, navigation gates, dock lifecycle, commit key
//! - **[`util`]**: write-once cells and weak handles
//! - **[`dom`]**: headless control tree and the toolkit seam
//! - **[`event`]**: key events decoupled from crossterm
//! - **[`testing`]**: the headless [`Pilot`](testing::Pilot)

// Foundation
pub mod reactive;
pub mod util;

// Toolkit seam
pub mod dom;
pub mod event;

// Wizard
pub mod wizard;

// Headless driver
pub mod testing;

/// Everything needed to declare observables and build a wizard.
pub mod prelude {
    pub use crate::reactive::{
        and_all, binding, boolean_list_binding, or_any, Binding, BoolExpr, NumberExpr, Observable,
        ObservableList, Property, StringExpr,
    };
    pub use crate::wizard::{Page, PageHandle, SimplePage, Wizard, WizardConfig, WizardFlow};
}
