//! Headless testing support.
//!
//! Use the [`Pilot`] to drive a [`Wizard`](crate::wizard::Wizard) the way a
//! user would, without any view attached.

pub mod pilot;

pub use pilot::Pilot;
