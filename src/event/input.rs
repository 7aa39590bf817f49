//! Keyboard input types wrapping crossterm for decoupling.
//!
//! Defines [`Key`], [`Modifiers`], [`KeyEvent`] and [`KeyTarget`]. Crossterm
//! events are converted via `From` impls so the wizard never depends on
//! crossterm directly.

use std::ops::BitOr;

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// The keys wizard handling can tell apart. Everything else collapses into
/// [`Key::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Tab,
    BackTab,
    F(u8),
    Other,
}

// ---------------------------------------------------------------------------
// Modifiers
// ---------------------------------------------------------------------------

/// Held modifier keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
    };
    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ..Modifiers::NONE
    };
    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    };
    pub const ALT: Modifiers = Modifiers {
        alt: true,
        ..Modifiers::NONE
    };

    /// Every modifier held in `required` is held in `self` too.
    pub fn contains(self, required: Modifiers) -> bool {
        (self.shift || !required.shift)
            && (self.ctrl || !required.ctrl)
            && (self.alt || !required.alt)
    }

    pub fn is_empty(self) -> bool {
        self == Modifiers::NONE
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;
    fn bitor(self, rhs: Self) -> Self::Output {
        Modifiers {
            shift: self.shift || rhs.shift,
            ctrl: self.ctrl || rhs.ctrl,
            alt: self.alt || rhs.alt,
        }
    }
}

// ---------------------------------------------------------------------------
// KeyEvent
// ---------------------------------------------------------------------------

/// A key press with modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(code: Key, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    /// A press of `code` without modifiers.
    pub fn plain(code: Key) -> Self {
        Self::new(code, Modifiers::NONE)
    }

    /// Convert a crossterm event, dropping key releases.
    pub fn pressed(ct: crossterm::event::KeyEvent) -> Option<Self> {
        (ct.kind != crossterm::event::KeyEventKind::Release).then(|| Self::from(ct))
    }
}

// ---------------------------------------------------------------------------
// KeyTarget
// ---------------------------------------------------------------------------

/// What the key event was aimed at: the focused control, as far as keyboard
/// handling cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyTarget {
    /// The focused control is a multi-line text input.
    pub multiline: bool,
}

impl KeyTarget {
    pub fn plain() -> Self {
        Self { multiline: false }
    }

    pub fn multiline() -> Self {
        Self { multiline: true }
    }
}

// ---------------------------------------------------------------------------
// From<crossterm> conversions
// ---------------------------------------------------------------------------

fn convert_modifiers(m: crossterm::event::KeyModifiers) -> Modifiers {
    use crossterm::event::KeyModifiers;

    Modifiers {
        shift: m.contains(KeyModifiers::SHIFT),
        ctrl: m.contains(KeyModifiers::CONTROL),
        alt: m.contains(KeyModifiers::ALT),
    }
}

impl From<crossterm::event::KeyEvent> for KeyEvent {
    fn from(ct: crossterm::event::KeyEvent) -> Self {
        use crossterm::event::KeyCode;

        let code = match ct.code {
            KeyCode::Char(c) => Key::Char(c),
            KeyCode::Enter => Key::Enter,
            KeyCode::Esc => Key::Escape,
            KeyCode::Tab => Key::Tab,
            KeyCode::BackTab => Key::BackTab,
            KeyCode::F(n) => Key::F(n),
            _ => Key::Other,
        };
        KeyEvent::new(code, convert_modifiers(ct.modifiers))
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{
        KeyCode, KeyEvent as CtKeyEvent, KeyEventKind, KeyModifiers as CtModifiers,
    };

    #[test]
    fn modifiers_contains() {
        let m = Modifiers::CTRL | Modifiers::SHIFT;
        assert!(m.contains(Modifiers::CTRL));
        assert!(m.contains(Modifiers::SHIFT));
        assert!(!m.contains(Modifiers::ALT));
        assert!(m.contains(Modifiers::NONE));
        assert!(!Modifiers::NONE.contains(Modifiers::CTRL));
        assert!(Modifiers::default().is_empty());
    }

    #[test]
    fn from_crossterm_key_enter_with_ctrl() {
        let ev = KeyEvent::from(CtKeyEvent::new(KeyCode::Enter, CtModifiers::CONTROL));
        assert_eq!(ev, KeyEvent::new(Key::Enter, Modifiers::CTRL));
    }

    #[test]
    fn from_crossterm_key_with_shift_alt() {
        let ev = KeyEvent::from(CtKeyEvent::new(
            KeyCode::Char('n'),
            CtModifiers::SHIFT | CtModifiers::ALT,
        ));
        assert_eq!(ev.code, Key::Char('n'));
        assert!(ev.modifiers.contains(Modifiers::SHIFT | Modifiers::ALT));
        assert!(!ev.modifiers.contains(Modifiers::CTRL));
    }

    #[test]
    fn from_crossterm_unmapped_key() {
        let ev = KeyEvent::from(CtKeyEvent::new(KeyCode::PageDown, CtModifiers::NONE));
        assert_eq!(ev.code, Key::Other);
    }

    #[test]
    fn pressed_drops_releases() {
        let press = CtKeyEvent::new(KeyCode::Enter, CtModifiers::NONE);
        let release =
            CtKeyEvent::new_with_kind(KeyCode::Enter, CtModifiers::NONE, KeyEventKind::Release);
        assert_eq!(KeyEvent::pressed(press), Some(KeyEvent::plain(Key::Enter)));
        assert_eq!(KeyEvent::pressed(release), None);
    }

    #[test]
    fn key_targets() {
        assert!(!KeyTarget::plain().multiline);
        assert!(KeyTarget::multiline().multiline);
        assert_eq!(KeyTarget::default(), KeyTarget::plain());
    }
}
