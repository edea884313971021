// src/report.rs
use serde::Serialize;
use std::sync::Mutex;

// =============================================================================
// NOTIFICATION CONSTANTS
// =============================================================================
pub const GROUP_ID: &str = "prepare-commit-msg";
pub const ERROR_TITLE: &str = "prepare-commit-msg: Error";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub group_id: String,
    pub title: String,
    pub body: String,
    pub severity: Severity,
}

// =============================================================================
// REPORTER
// =============================================================================

/// Receives the diagnostics a resolution produces. The resolver never
/// returns errors to its caller; everything that went wrong ends up here.
pub trait Reporter {
    fn report(&self, severity: Severity, title: &str, body: &str);
}

impl<T: Reporter + ?Sized> Reporter for &T {
    fn report(&self, severity: Severity, title: &str, body: &str) {
        (**self).report(severity, title, body)
    }
}

impl<T: Reporter + ?Sized> Reporter for Box<T> {
    fn report(&self, severity: Severity, title: &str, body: &str) {
        (**self).report(severity, title, body)
    }
}

/// Prints notifications to stderr, keeping stdout free for the message.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrReporter;

impl Reporter for StderrReporter {
    fn report(&self, severity: Severity, title: &str, body: &str) {
        tracing::debug!(group = GROUP_ID, ?severity, "notification");
        eprint!("{}", render_notification(title, body));
    }
}

/// Title line followed by the body, trailing whitespace dropped.
pub fn render_notification(title: &str, body: &str) -> String {
    format!("{}\n{}\n", title, body.trim_end())
}

/// Collects notifications in memory.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    notifications: Mutex<Vec<Notification>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.lock().clone()
    }

    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.lock())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Notification>> {
        self.notifications
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Reporter for MemoryReporter {
    fn report(&self, severity: Severity, title: &str, body: &str) {
        self.lock().push(Notification {
            group_id: GROUP_ID.to_string(),
            title: title.to_string(),
            body: body.to_string(),
            severity,
        });
    }
}
