use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{broadcast, Mutex};

use crate::{
    types::{EntryKind, LogEntry, LogEvent, Message, Sender},
    MessageSink,
};

const EVENT_CAPACITY: usize = 256;

#[derive(Default)]
struct LogState {
    entries: Vec<LogEntry>,
    pending: Option<u64>,
    next_ordinal: u64,
}

impl LogState {
    fn push(&mut self, message: Message) -> LogEntry {
        let entry = LogEntry {
            ordinal: self.next_ordinal,
            sender: message.sender,
            kind: message.kind,
            content: message.content,
            recorded_at: Utc::now(),
        };
        self.next_ordinal += 1;
        self.entries.push(entry.clone());
        entry
    }
}

/// Ordered transcript shown to the user.
///
/// Entries are only ever appended. The single exception is the pending
/// entry, which can be updated in place or removed without moving anything
/// else. Every change is broadcast as a [`LogEvent`].
pub struct MessageLog {
    inner: Mutex<LogState>,
    events: broadcast::Sender<LogEvent>,
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageLog {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Mutex::new(LogState::default()),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LogEvent> {
        self.events.subscribe()
    }

    pub async fn entries(&self) -> Vec<LogEntry> {
        self.inner.lock().await.entries.clone()
    }

    pub async fn last_entry(&self) -> Option<LogEntry> {
        self.inner.lock().await.entries.last().cloned()
    }

    pub async fn has_pending(&self) -> bool {
        self.inner.lock().await.pending.is_some()
    }

    fn emit(&self, event: LogEvent) {
        // No subscribers is fine; the entries are still kept.
        let _ = self.events.send(event);
    }
}

#[async_trait]
impl MessageSink for MessageLog {
    async fn append(&self, message: Message) -> u64 {
        let mut inner = self.inner.lock().await;
        let entry = inner.push(message);
        let ordinal = entry.ordinal;
        self.emit(LogEvent::Appended(entry));
        ordinal
    }

    async fn append_pending(&self, content: String) -> u64 {
        let mut inner = self.inner.lock().await;
        if let Some(ordinal) = inner.pending {
            if let Some(entry) = inner.entries.iter_mut().find(|e| e.ordinal == ordinal) {
                entry.content = content;
                entry.recorded_at = Utc::now();
                let updated = entry.clone();
                self.emit(LogEvent::PendingUpdated(updated));
                return ordinal;
            }
        }

        let entry = inner.push(Message::system(EntryKind::Pending, content));
        let ordinal = entry.ordinal;
        inner.pending = Some(ordinal);
        self.emit(LogEvent::Appended(entry));
        ordinal
    }

    async fn remove_pending(&self) -> bool {
        let mut inner = self.inner.lock().await;
        let Some(ordinal) = inner.pending.take() else {
            return false;
        };
        inner.entries.retain(|entry| entry.ordinal != ordinal);
        self.emit(LogEvent::PendingRemoved { ordinal });
        true
    }
}

/// Renders one entry as terminal text. Embedded line breaks become separate,
/// indented lines under the sender label.
pub fn render_entry(entry: &LogEntry) -> String {
    let label = match (entry.sender, entry.kind) {
        (Sender::User, _) => "you",
        (Sender::System, EntryKind::Warning) => "warning",
        (Sender::System, EntryKind::Error) => "error",
        (Sender::System, _) => "assistant",
    };
    let stamp = entry.recorded_at.format("%H:%M:%S");
    let mut lines = entry.content.lines();
    let first = lines.next().unwrap_or_default();
    let mut rendered = format!("[{stamp}] {label}> {first}");
    let indent = " ".repeat(format!("[{stamp}] {label}> ").chars().count());
    for line in lines {
        rendered.push('\n');
        rendered.push_str(&indent);
        rendered.push_str(line);
    }
    rendered
}

#[cfg(test)]
#[path = "tests/message_log_tests.rs"]
mod tests;
