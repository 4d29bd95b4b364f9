use std::io::{self, Write};
use std::time::Duration;

use devdash::config::{config_path, ensure_config_file, load_config};
use devdash::{logging, tui, DashConfig, DevDash};

mod demo;

const APP_NAME: &str = "devdash";
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(2);

fn load() -> DashConfig {
    let Some(path) = config_path(APP_NAME) else {
        return DashConfig::default();
    };
    if let Err(e) = ensure_config_file(&path) {
        tracing::warn!(path = %path.display(), error = %e, "could not write default config");
    }
    load_config(&path)
}

fn main() -> io::Result<()> {
    let mut logging = logging::init(APP_NAME);
    let config = load();
    let mut dash = DevDash::new(config)?;
    let writers = demo::build(&mut dash);

    if let Some(lines) = logging.as_mut().and_then(|guard| guard.take_mirror()) {
        let mut sink = writers.logs.clone();
        std::thread::spawn(move || {
            for line in lines {
                let _ = writeln!(sink, "{line}");
            }
        });
    }

    let watcher = writers.watcher.clone();
    let exit = dash.exit_signal().clone();
    std::thread::spawn(move || {
        let mut beats = 0u64;
        while !exit.is_closed() {
            std::thread::sleep(HEARTBEAT_INTERVAL);
            beats += 1;
            watcher.log(&format!("watching for changes ({beats} checks, no changes)"));
        }
    });

    tui::run(&mut dash)
}
