//! A tab: ordered fields, their shared ledger and the named writer sinks logging into it.

use std::io;
use std::sync::{Arc, PoisonError, RwLock};

use rustc_hash::FxHashMap;

use crate::engine::{ExecutionEngine, TriggerOutcome};
use crate::field::{Field, FieldAddress};
use crate::handler::{
    DisplayHandler, EditHandler, ExecutionHandler, HandlerFacade, InteractiveHandler, Operation,
    TrackerWriterHandler, WriterHandler,
};
use crate::ledger::{MessageEntry, MessageLedger, MessageType, Record, RecordOutcome};

pub struct TabSection {
    title: String,
    description: String,
    fields: Vec<Field>,
    ledger: Arc<MessageLedger>,
    writers: Arc<RwLock<FxHashMap<String, HandlerFacade>>>,
    active_field: usize,
}

impl TabSection {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::with_ledger(title, description, MessageLedger::new())
    }

    pub fn with_ledger(
        title: impl Into<String>,
        description: impl Into<String>,
        ledger: MessageLedger,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            fields: Vec::new(),
            ledger: Arc::new(ledger),
            writers: Arc::new(RwLock::new(FxHashMap::default())),
            active_field: 0,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn ledger(&self) -> &Arc<MessageLedger> {
        &self.ledger
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    pub fn field_mut(&mut self, index: usize) -> Option<&mut Field> {
        self.fields.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn active_field(&self) -> usize {
        self.active_field
    }

    pub fn set_active_field(&mut self, index: usize) -> bool {
        if index >= self.fields.len() || index == self.active_field {
            return false;
        }
        self.active_field = index;
        true
    }

    pub fn focused(&self) -> Option<&Field> {
        self.fields.get(self.active_field)
    }

    pub fn focused_mut(&mut self) -> Option<&mut Field> {
        self.fields.get_mut(self.active_field)
    }

    /// Appends a field for `handler` and returns its index.
    pub fn add_field(&mut self, handler: HandlerFacade, color: Option<String>) -> usize {
        let index = self.fields.len();
        let mut field = Field::new(handler, index);
        if let Some(color) = color {
            field = field.with_color(color);
        }
        tracing::debug!(tab = %self.title, field = index, handler = %field.name(), "field added");
        self.fields.push(field);
        index
    }

    // The builders below only register shortcuts when the finished section is handed to
    // `DevDash::add_tab`; use `DevDash::add_field` for tabs already on a dashboard.
    pub fn add_display(&mut self, handler: Arc<dyn DisplayHandler>) -> &mut Self {
        self.add_field(HandlerFacade::display(handler), None);
        self
    }

    pub fn add_edit(&mut self, handler: Arc<dyn EditHandler>) -> &mut Self {
        self.add_field(HandlerFacade::edit(handler), None);
        self
    }

    pub fn add_execution(&mut self, handler: Arc<dyn ExecutionHandler>) -> &mut Self {
        self.add_field(HandlerFacade::execution(handler), None);
        self
    }

    pub fn add_interactive(&mut self, handler: Arc<dyn InteractiveHandler>) -> &mut Self {
        self.add_field(HandlerFacade::interactive(handler), None);
        self
    }

    /// Registers an append-only log sink.
    pub fn register_writer(&self, handler: Arc<dyn WriterHandler>) -> TabWriter {
        self.insert_writer(HandlerFacade::writer(handler))
    }

    /// Registers a log sink that rewrites its previous line while its token is unchanged.
    pub fn register_tracker_writer(&self, handler: Arc<dyn TrackerWriterHandler>) -> TabWriter {
        self.insert_writer(HandlerFacade::tracker_writer(handler))
    }

    fn insert_writer(&self, facade: HandlerFacade) -> TabWriter {
        let name = facade.name().to_string();
        let previous = self
            .writers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.clone(), facade.clone());
        if previous.is_some() {
            tracing::warn!(tab = %self.title, writer = %name, "writer replaced");
        }
        TabWriter::new(facade, Arc::clone(&self.ledger))
    }

    /// Looks up a registered writer by name.
    pub fn writer(&self, name: &str) -> Option<TabWriter> {
        let facade = self
            .writers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()?;
        Some(TabWriter::new(facade, Arc::clone(&self.ledger)))
    }

    pub fn writer_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .writers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Runs `op` on field `index` through `engine`. `None` when the index is out of range.
    pub fn trigger(
        &mut self,
        engine: &ExecutionEngine,
        tab_index: usize,
        index: usize,
        op: Operation,
    ) -> Option<TriggerOutcome> {
        let field = self.fields.get_mut(index)?;
        Some(engine.trigger(
            FieldAddress::new(tab_index, index),
            field,
            &self.ledger,
            op,
        ))
    }

    pub fn messages(&self) -> Vec<MessageEntry> {
        self.ledger.snapshot()
    }

    /// Writes a row on behalf of the dashboard itself.
    pub fn notify(&self, kind: MessageType, text: &str) -> RecordOutcome {
        self.ledger.record(Record::new(kind, text, &self.title))
    }
}

impl std::fmt::Debug for TabSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabSection")
            .field("title", &self.title)
            .field("fields", &self.fields.len())
            .field("active_field", &self.active_field)
            .field("ledger", &self.ledger)
            .finish()
    }
}

/// Handle a writer handler uses to log into its tab. Cloneable and usable from any thread.
///
/// Through `io::Write` every completed line becomes one message; a trailing partial line is
/// held until the next newline or `flush`.
pub struct TabWriter {
    handler: HandlerFacade,
    ledger: Arc<MessageLedger>,
    pending: Vec<u8>,
}

impl TabWriter {
    fn new(handler: HandlerFacade, ledger: Arc<MessageLedger>) -> Self {
        Self {
            handler,
            ledger,
            pending: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.handler.name()
    }

    /// Records one message. Plain writers always append; tracking writers rewrite the row
    /// of their current token, minting one on first use.
    pub fn write_message(&self, kind: MessageType, text: &str) -> RecordOutcome {
        let operation_id = if self.handler.has_tracker() {
            let current = self.handler.last_operation_id();
            if current.is_empty() {
                let fresh = uuid::Uuid::new_v4().simple().to_string();
                self.handler.set_last_operation_id(&fresh);
                fresh
            } else {
                current
            }
        } else {
            String::new()
        };

        self.ledger.record(
            Record::new(kind, text, self.handler.name()).operation(&operation_id),
        )
    }

    /// Classifies `text` by keyword and records it.
    pub fn log(&self, text: &str) -> RecordOutcome {
        self.write_message(MessageType::detect(text), text)
    }

    fn flush_lines(&mut self, include_partial: bool) {
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            self.emit(&line[..line.len() - 1]);
        }
        if include_partial && !self.pending.is_empty() {
            let line = std::mem::take(&mut self.pending);
            self.emit(&line);
        }
    }

    fn emit(&self, raw: &[u8]) {
        let text = String::from_utf8_lossy(raw);
        let text = text.trim_end_matches('\r');
        if text.trim().is_empty() {
            return;
        }
        self.log(text);
    }
}

impl Clone for TabWriter {
    fn clone(&self) -> Self {
        Self::new(self.handler.clone(), Arc::clone(&self.ledger))
    }
}

impl io::Write for TabWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        self.flush_lines(false);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flush_lines(true);
        Ok(())
    }
}

impl Drop for TabWriter {
    fn drop(&mut self) {
        self.flush_lines(true);
    }
}

impl std::fmt::Debug for TabWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabWriter")
            .field("handler", &self.handler)
            .finish()
    }
}

#[cfg(test)]
#[path = "../tests/unit/tab.rs"]
mod tests;
