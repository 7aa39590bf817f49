//! Commit-key handling.
//!
//! When commit-on-key is enabled, the commit key finishes the wizard once
//! every page is complete, and otherwise advances from a complete page. A
//! multi-line input keeps plain presses for itself; the configured modifier
//! must be held there.

use crate::event::{KeyEvent, KeyTarget};

use super::config::CommitKey;

/// What a key press did to the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyOutcome {
    /// Not a commit press, or commit-on-key is off.
    Ignored,
    /// Moved to the next page.
    Advanced,
    /// Finished and closed the wizard.
    Finished,
    /// A commit press with nothing allowed to happen.
    Blocked,
}

/// What a commit press should attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CommitAction {
    Ignore,
    Finish,
    Advance,
    Nothing,
}

/// Gate values read when a key arrives.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CommitGates {
    pub enabled: bool,
    pub all_pages_complete: bool,
    pub current_page_complete: bool,
    pub can_go_next: bool,
}

pub(crate) fn commit_action(
    event: KeyEvent,
    target: KeyTarget,
    key: CommitKey,
    gates: CommitGates,
) -> CommitAction {
    if !gates.enabled || event.code != key.key {
        return CommitAction::Ignore;
    }
    if target.multiline && !event.modifiers.contains(key.multiline_modifier) {
        return CommitAction::Ignore;
    }
    if gates.all_pages_complete {
        CommitAction::Finish
    } else if gates.current_page_complete && gates.can_go_next {
        CommitAction::Advance
    } else {
        CommitAction::Nothing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Key, Modifiers};

    const OPEN: CommitGates = CommitGates {
        enabled: true,
        all_pages_complete: false,
        current_page_complete: true,
        can_go_next: true,
    };

    fn enter() -> KeyEvent {
        KeyEvent::plain(Key::Enter)
    }

    #[test]
    fn disabled_or_other_keys_are_ignored() {
        let key = CommitKey::default();
        let off = CommitGates {
            enabled: false,
            ..OPEN
        };
        assert_eq!(
            commit_action(enter(), KeyTarget::plain(), key, off),
            CommitAction::Ignore
        );
        assert_eq!(
            commit_action(KeyEvent::plain(Key::Tab), KeyTarget::plain(), key, OPEN),
            CommitAction::Ignore
        );
    }

    #[test]
    fn multiline_needs_modifier() {
        let key = CommitKey::default();
        assert_eq!(
            commit_action(enter(), KeyTarget::multiline(), key, OPEN),
            CommitAction::Ignore
        );
        let ctrl_enter = KeyEvent::new(Key::Enter, Modifiers::CTRL);
        assert_eq!(
            commit_action(ctrl_enter, KeyTarget::multiline(), key, OPEN),
            CommitAction::Advance
        );
    }

    #[test]
    fn finish_wins_over_advance() {
        let all = CommitGates {
            all_pages_complete: true,
            ..OPEN
        };
        assert_eq!(
            commit_action(enter(), KeyTarget::plain(), CommitKey::default(), all),
            CommitAction::Finish
        );
    }

    #[test]
    fn incomplete_page_blocks() {
        let blocked = CommitGates {
            current_page_complete: false,
            ..OPEN
        };
        let stuck = CommitGates {
            can_go_next: false,
            ..OPEN
        };
        let key = CommitKey::default();
        assert_eq!(
            commit_action(enter(), KeyTarget::plain(), key, blocked),
            CommitAction::Nothing
        );
        assert_eq!(
            commit_action(enter(), KeyTarget::plain(), key, stuck),
            CommitAction::Nothing
        );
    }

    #[test]
    fn custom_commit_key() {
        let key = CommitKey {
            key: Key::F(2),
            multiline_modifier: Modifiers::ALT,
        };
        assert_eq!(
            commit_action(enter(), KeyTarget::plain(), key, OPEN),
            CommitAction::Ignore
        );
        let alt_f2 = KeyEvent::new(Key::F(2), Modifiers::ALT);
        assert_eq!(
            commit_action(alt_f2, KeyTarget::multiline(), key, OPEN),
            CommitAction::Advance
        );
    }
}
