//! User-facing notices and the collaborator that displays them.

use serde::{Deserialize, Serialize};
use std::sync::{Mutex, PoisonError};

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    /// Something the user asked for happened
    Success,
    /// A request was denied
    Error,
    /// Neutral information
    Info,
}

/// Notice payload handed to the display layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Severity
    pub kind: NoticeKind,
    /// Text to show
    pub text: String,
}

impl Notice {
    /// Success notice
    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    /// Error notice
    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }

    /// Info notice
    #[must_use]
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            text: text.into(),
        }
    }
}

/// Displays notices to the user
pub trait Notifier: Send + Sync {
    /// Show a notice
    fn notify(&self, notice: &Notice);
}

/// Writes notices to the tracing log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: &Notice) {
        match notice.kind {
            NoticeKind::Error => tracing::warn!(text = %notice.text, "Notice"),
            NoticeKind::Success | NoticeKind::Info => {
                tracing::info!(kind = ?notice.kind, text = %notice.text, "Notice");
            },
        }
    }
}

/// Keeps every notice it receives
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    /// Creates an empty recorder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Notices received so far, oldest first
    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Most recent notice
    #[must_use]
    pub fn last(&self) -> Option<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: &Notice) {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice.clone());
    }
}
