//! Top-level dashboard state: tabs, focus, edit mode, shortcuts and the exit signal.
//!
//! `DevDash` is owned by the UI loop. Key handling lives in `input`, focus changes in
//! `navigation`; background completions are folded back in by [`DevDash::pump`].

mod input;
mod navigation;
pub mod shortcuts;
pub mod view;

pub use shortcuts::{ShortcutEntry, ShortcutRegistry};
pub use view::{DashView, FieldView, TabView};

use std::io;
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::DashConfig;
use crate::core::{ExitSignal, InputEvent};
use crate::engine::{
    engine_channel, AsyncExecutor, AsyncRuntime, EngineMessage, ExecutionEngine, TriggerOutcome,
};
use crate::handler::{HandlerFacade, Operation};
use crate::ledger::MessageLedger;
use crate::tab::TabSection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Consumed,
    Ignored,
    Quit,
}

impl EventResult {
    pub fn is_consumed(&self) -> bool {
        matches!(self, EventResult::Consumed)
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self, EventResult::Ignored)
    }

    pub fn is_quit(&self) -> bool {
        matches!(self, EventResult::Quit)
    }
}

pub struct DevDash {
    config: DashConfig,
    tabs: Vec<TabSection>,
    active_tab: usize,
    edit_mode: bool,
    shortcuts: Arc<ShortcutRegistry>,
    exit: ExitSignal,
    engine: ExecutionEngine,
    rx: Receiver<EngineMessage>,
    _runtime: Option<Arc<AsyncRuntime>>,
    viewport_width: usize,
}

impl DevDash {
    /// Builds a dashboard with its own tokio runtime for background operations.
    pub fn new(config: DashConfig) -> io::Result<Self> {
        let runtime = Arc::new(AsyncRuntime::new()?);
        let executor: Arc<dyn AsyncExecutor> = runtime.clone();
        let mut dash = Self::with_executor(config, executor);
        dash._runtime = Some(runtime);
        Ok(dash)
    }

    /// Builds a dashboard that schedules background operations on `executor`.
    pub fn with_executor(config: DashConfig, executor: Arc<dyn AsyncExecutor>) -> Self {
        let (tx, rx) = engine_channel();
        let viewport_width = config.viewport_width;
        Self {
            config,
            tabs: Vec::new(),
            active_tab: 0,
            edit_mode: false,
            shortcuts: Arc::new(ShortcutRegistry::new()),
            exit: ExitSignal::new(),
            engine: ExecutionEngine::new(executor, tx),
            rx,
            _runtime: None,
            viewport_width,
        }
    }

    pub fn config(&self) -> &DashConfig {
        &self.config
    }

    /// Creates an empty tab whose ledger uses the configured capacity.
    pub fn new_tab(&mut self, title: &str, description: &str) -> usize {
        let tab = TabSection::with_ledger(
            title,
            description,
            MessageLedger::with_capacity(self.config.max_messages),
        );
        self.add_tab(tab)
    }

    /// Adds a tab, registering the shortcuts its fields declare.
    pub fn add_tab(&mut self, tab: TabSection) -> usize {
        let tab_index = self.tabs.len();
        for field in tab.fields() {
            self.register_shortcuts(tab_index, field.index(), field.handler());
        }
        tracing::debug!(tab = %tab.title(), index = tab_index, "tab added");
        self.tabs.push(tab);
        tab_index
    }

    /// Adds a field to tab `tab_index`. `None` when the tab does not exist.
    pub fn add_field(
        &mut self,
        tab_index: usize,
        handler: HandlerFacade,
        color: Option<String>,
    ) -> Option<usize> {
        let tab = self.tabs.get_mut(tab_index)?;
        let field_index = tab.add_field(handler.clone(), color);
        self.register_shortcuts(tab_index, field_index, &handler);
        Some(field_index)
    }

    fn register_shortcuts(&self, tab_index: usize, field_index: usize, handler: &HandlerFacade) {
        for shortcut in handler.shortcuts() {
            self.shortcuts.register(ShortcutEntry {
                key: shortcut.key,
                description: shortcut.description,
                tab_index,
                field_index,
                handler_name: handler.name().to_string(),
                value: shortcut.value,
            });
        }
    }

    pub fn tabs(&self) -> &[TabSection] {
        &self.tabs
    }

    pub fn tab(&self, index: usize) -> Option<&TabSection> {
        self.tabs.get(index)
    }

    /// Crate-private: fields added to a placed tab must go through [`DevDash::add_field`] so
    /// their shortcuts are registered.
    pub(crate) fn tab_mut(&mut self, index: usize) -> Option<&mut TabSection> {
        self.tabs.get_mut(index)
    }

    pub fn active_tab(&self) -> usize {
        self.active_tab
    }

    pub fn active_tab_section(&self) -> Option<&TabSection> {
        self.tabs.get(self.active_tab)
    }

    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub fn shortcuts(&self) -> &Arc<ShortcutRegistry> {
        &self.shortcuts
    }

    pub fn exit_signal(&self) -> &ExitSignal {
        &self.exit
    }

    pub fn viewport_width(&self) -> usize {
        self.viewport_width
    }

    pub fn set_viewport_width(&mut self, width: usize) {
        self.viewport_width = width;
    }

    /// Runes the edit buffer may hold at the current viewport width.
    pub fn available_text_width(&self) -> usize {
        self.config.available_text_width(self.viewport_width)
    }

    /// Settles initial focus: auto content for the first tab and auto edit mode.
    pub fn activate(&mut self) {
        navigation::on_tab_entered(self);
    }

    pub fn handle_input(&mut self, event: &InputEvent) -> EventResult {
        match event {
            InputEvent::Key(key) => input::handle_key(self, key),
            InputEvent::Paste(text) => input::handle_paste(self, text),
            InputEvent::Resize(width, _) => {
                self.set_viewport_width(*width as usize);
                EventResult::Consumed
            }
        }
    }

    /// Runs `op` on a field through the engine.
    pub fn trigger(
        &mut self,
        tab_index: usize,
        field_index: usize,
        op: Operation,
    ) -> Option<TriggerOutcome> {
        let tab = self.tabs.get_mut(tab_index)?;
        tab.trigger(&self.engine, tab_index, field_index, op)
    }

    /// Drains completion messages from background operations and returns how many arrived.
    pub fn pump(&mut self) -> usize {
        let mut count = 0;
        while let Ok(message) = self.rx.try_recv() {
            count += 1;
            match message {
                EngineMessage::Finished {
                    target,
                    operation_id,
                    ..
                } => {
                    let Some(field) = self
                        .tabs
                        .get_mut(target.tab)
                        .and_then(|tab| tab.field_mut(target.field))
                    else {
                        tracing::warn!(
                            tab = target.tab,
                            field = target.field,
                            "completion for a field that no longer exists"
                        );
                        continue;
                    };
                    if field.async_state().operation_id() == operation_id {
                        field.async_state_mut().reset();
                    }
                }
            }
        }
        if count > 0 {
            navigation::refresh_auto_edit(self);
        }
        count
    }

    pub fn is_idle(&self) -> bool {
        self.tabs
            .iter()
            .all(|tab| tab.fields().iter().all(|f| !f.is_running()))
    }

    /// Pumps until every field is idle or `limit` passes.
    pub fn wait_idle(&mut self, limit: Duration) -> bool {
        let started = Instant::now();
        loop {
            self.pump();
            if self.is_idle() {
                return true;
            }
            if started.elapsed() >= limit {
                return false;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    pub fn view(&self) -> DashView {
        view::project(self)
    }
}

impl std::fmt::Debug for DevDash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DevDash")
            .field("tabs", &self.tabs.len())
            .field("active_tab", &self.active_tab)
            .field("edit_mode", &self.edit_mode)
            .field("shortcuts", &self.shortcuts.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/app/dashboard.rs"]
mod tests;
