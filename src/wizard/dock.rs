//! Page dock/undock bookkeeping.
//!
//! Docking is deferred: when a page becomes current it is queued, and its
//! dock hook runs on the next [`Wizard::run_deferred`](super::Wizard::run_deferred)
//! after the view had a chance to show it. Undocking is immediate. The
//! tracker records which page is docked and accumulates events that can be
//! drained for inspection.

use std::collections::VecDeque;

use super::page::PageHandle;

/// Something that happened to a page's dock state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DockEvent {
    Docked(PageHandle),
    Undocked(PageHandle),
}

#[derive(Debug, Default)]
pub struct DockTracker {
    docked: Option<PageHandle>,
    pending: VecDeque<PageHandle>,
    events: Vec<DockEvent>,
}

impl DockTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `page` for a deferred dock. Queuing twice is a no-op.
    pub fn schedule_dock(&mut self, page: PageHandle) {
        if !self.pending.contains(&page) {
            self.pending.push_back(page);
        }
    }

    /// Record that `page` stopped being current. Returns whether its undock
    /// hook should run: a page whose deferred dock never ran is simply
    /// dropped from the queue.
    pub fn undock(&mut self, page: &PageHandle) -> bool {
        if let Some(index) = self.pending.iter().position(|p| p == page) {
            self.pending.remove(index);
            return false;
        }
        if self.docked.as_ref() == Some(page) {
            self.docked = None;
            self.events.push(DockEvent::Undocked(page.clone()));
            return true;
        }
        false
    }

    /// Drain the deferred queue.
    pub fn take_pending(&mut self) -> Vec<PageHandle> {
        self.pending.drain(..).collect()
    }

    pub fn mark_docked(&mut self, page: PageHandle) {
        self.events.push(DockEvent::Docked(page.clone()));
        self.docked = Some(page);
    }

    pub fn docked(&self) -> Option<&PageHandle> {
        self.docked.as_ref()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Drain and return all recorded events.
    pub fn drain_events(&mut self) -> Vec<DockEvent> {
        std::mem::take(&mut self.events)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
