//! Wizard configuration: display toggles, labels, commit key.
//!
//! [`WizardConfig`] is the plain value handed to the wizard at construction.
//! The wizard turns it into observable [`WizardOptions`] and [`WizardTexts`]
//! so a view can react when they change later.

use crate::event::{Key, Modifiers};
use crate::reactive::Property;

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

/// Localizable button and header texts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardLabels {
    pub steps: String,
    pub back: String,
    pub next: String,
    pub finish: String,
    pub cancel: String,
}

impl Default for WizardLabels {
    fn default() -> Self {
        Self {
            steps: "Steps".into(),
            back: "< Back".into(),
            next: "Next >".into(),
            finish: "Finish".into(),
            cancel: "Cancel".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// CommitKey
// ---------------------------------------------------------------------------

/// Key that advances or finishes the wizard when commit-on-key is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommitKey {
    pub key: Key,
    /// Modifier that must be held when a multi-line input has focus.
    pub multiline_modifier: Modifiers,
}

impl Default for CommitKey {
    fn default() -> Self {
        Self {
            key: Key::Enter,
            multiline_modifier: Modifiers::CTRL,
        }
    }
}

// ---------------------------------------------------------------------------
// WizardConfig
// ---------------------------------------------------------------------------

/// Configuration for a wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardConfig {
    /// Commit key advances or finishes the wizard.
    pub enter_progresses: bool,
    pub show_steps_header: bool,
    pub show_steps: bool,
    /// Prefix step labels with their 1-based position.
    pub numbered_steps: bool,
    /// Step labels act as navigation links.
    pub enable_step_links: bool,
    /// Jumping forward through a step link saves and requires a complete
    /// current page.
    pub step_links_commits: bool,
    pub show_header: bool,
    pub labels: WizardLabels,
    pub commit_key: CommitKey,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            enter_progresses: false,
            show_steps_header: true,
            show_steps: true,
            numbered_steps: true,
            enable_step_links: false,
            step_links_commits: true,
            show_header: true,
            labels: WizardLabels::default(),
            commit_key: CommitKey::default(),
        }
    }
}

impl WizardConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_enter_progresses(mut self, enabled: bool) -> Self {
        self.enter_progresses = enabled;
        self
    }

    pub fn with_numbered_steps(mut self, numbered: bool) -> Self {
        self.numbered_steps = numbered;
        self
    }

    pub fn with_step_links(mut self, enabled: bool) -> Self {
        self.enable_step_links = enabled;
        self
    }

    pub fn with_step_links_commits(mut self, commits: bool) -> Self {
        self.step_links_commits = commits;
        self
    }

    pub fn with_show_steps(mut self, show: bool) -> Self {
        self.show_steps = show;
        self
    }

    pub fn with_show_steps_header(mut self, show: bool) -> Self {
        self.show_steps_header = show;
        self
    }

    pub fn with_show_header(mut self, show: bool) -> Self {
        self.show_header = show;
        self
    }

    pub fn with_labels(mut self, labels: WizardLabels) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_commit_key(mut self, commit_key: CommitKey) -> Self {
        self.commit_key = commit_key;
        self
    }
}

// ---------------------------------------------------------------------------
// Observable forms
// ---------------------------------------------------------------------------

/// Display toggles as observables.
#[derive(Debug, Clone, Copy)]
pub struct WizardOptions {
    pub enter_progresses: Property<bool>,
    pub show_steps_header: Property<bool>,
    pub show_steps: Property<bool>,
    pub numbered_steps: Property<bool>,
    pub enable_step_links: Property<bool>,
    pub step_links_commits: Property<bool>,
    pub show_header: Property<bool>,
}

impl WizardOptions {
    pub(crate) fn from_config(config: &WizardConfig) -> Self {
        Self {
            enter_progresses: Property::new(config.enter_progresses),
            show_steps_header: Property::new(config.show_steps_header),
            show_steps: Property::new(config.show_steps),
            numbered_steps: Property::new(config.numbered_steps),
            enable_step_links: Property::new(config.enable_step_links),
            step_links_commits: Property::new(config.step_links_commits),
            show_header: Property::new(config.show_header),
        }
    }
}

/// Labels as observables.
#[derive(Debug, Clone, Copy)]
pub struct WizardTexts {
    pub steps: Property<String>,
    pub back: Property<String>,
    pub next: Property<String>,
    pub finish: Property<String>,
    pub cancel: Property<String>,
}

impl WizardTexts {
    pub(crate) fn from_labels(labels: &WizardLabels) -> Self {
        Self {
            steps: Property::new(labels.steps.clone()),
            back: Property::new(labels.back.clone()),
            next: Property::new(labels.next.clone()),
            finish: Property::new(labels.finish.clone()),
            cancel: Property::new(labels.cancel.clone()),
        }
    }
}
