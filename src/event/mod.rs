//! Keyboard input decoupled from the terminal backend.

pub mod input;

pub use input::{Key, KeyEvent, KeyTarget, Modifiers};
