//! Sample handlers wired into the demo binary, one per field kind.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use devdash::{
    DevDash, DisplayHandler, EditHandler, ExecutionHandler, Handler, HandlerError,
    HandlerFacade, InteractiveHandler, MessageLedger, MessageTracker, MessageType,
    OperationContext, Shortcut, TabSection, TabWriter, TrackerWriterHandler, WriterHandler,
};

/// Correlation token shared by the tracking handlers below.
#[derive(Default)]
struct LastOperation(Mutex<String>);

impl LastOperation {
    fn get(&self) -> String {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn set(&self, id: &str) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = id.to_string();
    }
}

struct About;

impl Handler for About {
    fn name(&self) -> String {
        "about".to_string()
    }
}

impl DisplayHandler for About {
    fn label(&self) -> String {
        "About".to_string()
    }

    fn content(&self) -> String {
        format!("devdash {} demo", env!("CARGO_PKG_VERSION"))
    }
}

struct Port {
    value: Mutex<String>,
    last: LastOperation,
}

impl Handler for Port {
    fn name(&self) -> String {
        "port".to_string()
    }

    fn tracker(self: Arc<Self>) -> Option<Arc<dyn MessageTracker>> {
        let tracker: Arc<dyn MessageTracker> = self;
        Some(tracker)
    }
}

impl MessageTracker for Port {
    fn last_operation_id(&self) -> String {
        self.last.get()
    }

    fn set_last_operation_id(&self, id: &str) {
        self.last.set(id);
    }
}

impl EditHandler for Port {
    fn label(&self) -> String {
        "Port".to_string()
    }

    fn value(&self) -> String {
        self.value
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn change(&self, value: &str, ctx: &OperationContext) -> Result<(), HandlerError> {
        let port: u16 = value
            .trim()
            .parse()
            .map_err(|_| HandlerError::validation(format!("{value:?} is not a port")))?;
        if port == 0 {
            return Err(HandlerError::validation("port 0 is reserved"));
        }
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = port.to_string();
        ctx.progress().success(format!("listening on :{port}"));
        Ok(())
    }

    fn shortcuts(&self) -> Vec<Shortcut> {
        vec![
            Shortcut::new('p', "8080", "port 8080"),
            Shortcut::new('d', "3000", "port 3000"),
        ]
    }
}

/// Slow build that reports each step and stops early when cancelled.
struct Build {
    steps: usize,
    runs: AtomicUsize,
}

impl Handler for Build {
    fn name(&self) -> String {
        "build".to_string()
    }
}

impl ExecutionHandler for Build {
    fn label(&self) -> String {
        "Build".to_string()
    }

    fn execute(&self, ctx: &OperationContext) -> Result<(), HandlerError> {
        let run = self.runs.fetch_add(1, Ordering::SeqCst) + 1;
        for step in 1..=self.steps {
            if ctx.is_cancelled() {
                return Ok(());
            }
            ctx.progress()
                .info(format!("build #{run}: compiling {step}/{}", self.steps));
            std::thread::sleep(Duration::from_millis(400));
        }
        ctx.progress().success(format!("build #{run} completed"));
        Ok(())
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(10)
    }
}

struct Deploy;

impl Handler for Deploy {
    fn name(&self) -> String {
        "deploy".to_string()
    }
}

impl ExecutionHandler for Deploy {
    fn label(&self) -> String {
        "Deploy".to_string()
    }

    fn execute(&self, _ctx: &OperationContext) -> Result<(), HandlerError> {
        Err(HandlerError::execution("registry unreachable"))
    }
}

/// Asks for a language until one is chosen.
struct Language {
    value: Mutex<String>,
    waiting: AtomicBool,
    last: LastOperation,
}

impl Handler for Language {
    fn name(&self) -> String {
        "language".to_string()
    }

    fn tracker(self: Arc<Self>) -> Option<Arc<dyn MessageTracker>> {
        let tracker: Arc<dyn MessageTracker> = self;
        Some(tracker)
    }
}

impl MessageTracker for Language {
    fn last_operation_id(&self) -> String {
        self.last.get()
    }

    fn set_last_operation_id(&self, id: &str) {
        self.last.set(id);
    }
}

impl InteractiveHandler for Language {
    fn label(&self) -> String {
        "Language".to_string()
    }

    fn value(&self) -> String {
        self.value
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn change(&self, value: &str, ctx: &OperationContext) -> Result<(), HandlerError> {
        let value = value.trim();
        if value.is_empty() {
            ctx.progress()
                .info("type a language code (en, es, fr) and press enter");
            return Ok(());
        }
        let code = value.to_ascii_uppercase();
        if !matches!(code.as_str(), "EN" | "ES" | "FR") {
            ctx.progress()
                .warning(format!("{value} is not supported, try en, es or fr"));
            return Ok(());
        }
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = code.clone();
        self.waiting.store(false, Ordering::SeqCst);
        ctx.progress().success(format!("language set to {code}"));
        Ok(())
    }

    fn waiting_for_user(&self) -> bool {
        self.waiting.load(Ordering::SeqCst)
    }
}

struct Named(&'static str);

impl Handler for Named {
    fn name(&self) -> String {
        self.0.to_string()
    }
}

impl WriterHandler for Named {}

struct Heartbeat {
    last: LastOperation,
}

impl Handler for Heartbeat {
    fn name(&self) -> String {
        "watcher".to_string()
    }
}

impl WriterHandler for Heartbeat {}

impl MessageTracker for Heartbeat {
    fn last_operation_id(&self) -> String {
        self.last.get()
    }

    fn set_last_operation_id(&self, id: &str) {
        self.last.set(id);
    }
}

impl TrackerWriterHandler for Heartbeat {}

/// Sinks the binary keeps feeding after setup.
pub struct DemoWriters {
    pub logs: TabWriter,
    pub watcher: TabWriter,
}

pub fn build(dash: &mut DevDash) -> DemoWriters {
    let project = dash.new_tab("Project", "settings and actions for the sample project");
    dash.add_field(project, HandlerFacade::display(Arc::new(About)), None);
    dash.add_field(
        project,
        HandlerFacade::edit(Arc::new(Port {
            value: Mutex::new("8080".to_string()),
            last: LastOperation::default(),
        })),
        None,
    );
    dash.add_field(
        project,
        HandlerFacade::execution(Arc::new(Build {
            steps: 8,
            runs: AtomicUsize::new(0),
        })),
        Some("green".to_string()),
    );
    dash.add_field(
        project,
        HandlerFacade::execution(Arc::new(Deploy)),
        Some("red".to_string()),
    );

    let setup = dash.new_tab("Setup", "interactive first-run questions");
    dash.add_field(
        setup,
        HandlerFacade::interactive(Arc::new(Language {
            value: Mutex::new(String::new()),
            waiting: AtomicBool::new(true),
            last: LastOperation::default(),
        })),
        None,
    );

    let mut logs = TabSection::with_ledger(
        "Logs",
        "application log and file watcher",
        MessageLedger::with_capacity(dash.config().max_messages),
    );
    logs.add_display(Arc::new(About));
    let log_writer = logs.register_writer(Arc::new(Named("log")));
    let watcher = logs.register_tracker_writer(Arc::new(Heartbeat {
        last: LastOperation::default(),
    }));
    watcher.write_message(MessageType::Info, "watching for changes");
    dash.add_tab(logs);

    DemoWriters {
        logs: log_writer,
        watcher,
    }
}
