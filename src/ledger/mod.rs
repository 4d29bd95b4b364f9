//! Per-tab message ledger.
//!
//! Rows are appended in arrival order. A row written with a non-empty operation id can be
//! rewritten in place by a later write carrying the same operation id *and* handler name;
//! the rewritten row keeps its id and moves to the tail.

mod message_type;

pub use message_type::{combine, Fragment, MessageType};

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Local};

pub const DEFAULT_MAX_MESSAGES: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(u64);

impl MessageId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEntry {
    id: MessageId,
    pub timestamp: DateTime<Local>,
    pub content: String,
    pub kind: MessageType,
    pub operation_id: Option<String>,
    pub handler_name: String,
    pub is_progress: bool,
    pub is_complete: bool,
}

impl MessageEntry {
    pub fn id(&self) -> MessageId {
        self.id
    }

    fn matches(&self, operation_id: &str, handler_name: &str) -> bool {
        self.operation_id.as_deref() == Some(operation_id) && self.handler_name == handler_name
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    Created(MessageId),
    Updated(MessageId),
}

impl RecordOutcome {
    pub fn id(self) -> MessageId {
        match self {
            RecordOutcome::Created(id) | RecordOutcome::Updated(id) => id,
        }
    }

    pub fn is_update(self) -> bool {
        matches!(self, RecordOutcome::Updated(_))
    }
}

/// What a writer wants recorded.
#[derive(Debug, Clone)]
pub struct Record<'a> {
    pub kind: MessageType,
    pub content: &'a str,
    pub handler_name: &'a str,
    pub operation_id: &'a str,
    pub is_progress: bool,
}

impl<'a> Record<'a> {
    pub fn new(kind: MessageType, content: &'a str, handler_name: &'a str) -> Self {
        Self {
            kind,
            content,
            handler_name,
            operation_id: "",
            is_progress: false,
        }
    }

    pub fn operation(mut self, operation_id: &'a str) -> Self {
        self.operation_id = operation_id;
        self
    }

    pub fn progress(mut self, is_progress: bool) -> Self {
        self.is_progress = is_progress;
        self
    }
}

struct LedgerInner {
    entries: Vec<MessageEntry>,
    next_id: u64,
}

pub struct MessageLedger {
    inner: RwLock<LedgerInner>,
    max_messages: usize,
}

impl MessageLedger {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_MESSAGES)
    }

    /// `max_messages == 0` disables eviction.
    pub fn with_capacity(max_messages: usize) -> Self {
        Self {
            inner: RwLock::new(LedgerInner {
                entries: Vec::new(),
                next_id: 1,
            }),
            max_messages,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, LedgerInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, LedgerInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn record(&self, record: Record<'_>) -> RecordOutcome {
        let now = Local::now();
        let mut inner = self.write();

        if !record.operation_id.is_empty() {
            let found = inner
                .entries
                .iter()
                .position(|e| e.matches(record.operation_id, record.handler_name));
            if let Some(pos) = found {
                let mut entry = inner.entries.remove(pos);
                entry.content = record.content.to_string();
                entry.kind = record.kind;
                entry.timestamp = now;
                entry.is_progress = record.is_progress;
                entry.is_complete = !record.is_progress;
                let id = entry.id;
                inner.entries.push(entry);
                return RecordOutcome::Updated(id);
            }
        }

        let id = MessageId(inner.next_id);
        inner.next_id += 1;
        inner.entries.push(MessageEntry {
            id,
            timestamp: now,
            content: record.content.to_string(),
            kind: record.kind,
            operation_id: (!record.operation_id.is_empty())
                .then(|| record.operation_id.to_string()),
            handler_name: record.handler_name.to_string(),
            is_progress: record.is_progress,
            is_complete: !record.is_progress,
        });

        if self.max_messages > 0 && inner.entries.len() > self.max_messages {
            let excess = inner.entries.len() - self.max_messages;
            inner.entries.drain(..excess);
        }

        RecordOutcome::Created(id)
    }

    /// Marks the row of an operation terminal without touching its content.
    pub fn complete(&self, operation_id: &str, handler_name: &str) -> bool {
        if operation_id.is_empty() {
            return false;
        }
        let mut inner = self.write();
        match inner
            .entries
            .iter_mut()
            .find(|e| e.matches(operation_id, handler_name))
        {
            Some(entry) => {
                entry.is_progress = false;
                entry.is_complete = true;
                true
            }
            None => false,
        }
    }

    pub fn find(&self, operation_id: &str, handler_name: &str) -> Option<MessageEntry> {
        self.read()
            .entries
            .iter()
            .find(|e| e.matches(operation_id, handler_name))
            .cloned()
    }

    pub fn latest_for(&self, handler_name: &str) -> Option<MessageEntry> {
        self.read()
            .entries
            .iter()
            .rev()
            .find(|e| e.handler_name == handler_name)
            .cloned()
    }

    pub fn last(&self) -> Option<MessageEntry> {
        self.read().entries.last().cloned()
    }

    pub fn snapshot(&self) -> Vec<MessageEntry> {
        self.read().entries.clone()
    }

    pub fn len(&self) -> usize {
        self.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().entries.is_empty()
    }

    pub fn clear(&self) {
        self.write().entries.clear();
    }
}

impl Default for MessageLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MessageLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageLedger")
            .field("len", &self.len())
            .field("max_messages", &self.max_messages)
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ledger/ledger.rs"]
mod tests;
