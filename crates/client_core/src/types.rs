use chrono::{DateTime, Utc};
use shared::domain::AdviceResult;

use crate::error::WorkflowError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Echo,
    Pending,
    Advice,
    Status,
    Warning,
    Error,
    SiteLink,
}

/// A message before it has been placed in the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub sender: Sender,
    pub kind: EntryKind,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            kind: EntryKind::Echo,
            content: content.into(),
        }
    }

    pub fn system(kind: EntryKind, content: impl Into<String>) -> Self {
        Self {
            sender: Sender::System,
            kind,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub ordinal: u64,
    pub sender: Sender,
    pub kind: EntryKind,
    pub content: String,
    pub recorded_at: DateTime<Utc>,
}

impl LogEntry {
    pub fn is_pending(&self) -> bool {
        self.kind == EntryKind::Pending
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEvent {
    Appended(LogEntry),
    PendingUpdated(LogEntry),
    PendingRemoved { ordinal: u64 },
}

/// Raw, unnormalized field values as the user typed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawForm {
    pub industry: String,
    pub goals: String,
    pub theme: String,
    /// Comma separated list.
    pub competitors: String,
    pub project_descriptions: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Another submission held the guard; nothing was sent.
    Dropped,
    AdviceReady(AdviceResult),
    Failed(WorkflowError),
}

impl SubmitOutcome {
    /// Whether the build step became available as a result of this submit.
    pub fn enables_build(&self) -> bool {
        matches!(self, Self::AdviceReady(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    Built {
        /// Value exactly as returned by the build service.
        site_url: String,
        /// `site_url` resolved against the backend base URL when relative.
        location: String,
    },
    Rejected(WorkflowError),
    Failed(WorkflowError),
}
