//! Tracing setup. Logs go to a daily rolling file (the terminal belongs to the dashboard) and
//! are mirrored line by line over a channel so a frontend can show them in a writer sink.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config;

pub struct LoggingGuard {
    _guard: WorkerGuard,
    log_dir: PathBuf,
    mirror_rx: Option<Receiver<String>>,
}

impl LoggingGuard {
    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// Formatted log lines, one per event. Can be taken once.
    pub fn take_mirror(&mut self) -> Option<Receiver<String>> {
        self.mirror_rx.take()
    }
}

/// Buffers one formatted event and forwards its lines when dropped.
struct MirrorWriter {
    buf: Vec<u8>,
    tx: Sender<String>,
}

impl Write for MirrorWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for MirrorWriter {
    fn drop(&mut self) {
        if self.buf.is_empty() {
            return;
        }
        for line in String::from_utf8_lossy(&self.buf).lines() {
            let _ = self.tx.send(line.to_string());
        }
    }
}

#[derive(Clone)]
struct MirroredFile {
    file: NonBlocking,
    tx: Sender<String>,
}

struct MirroredFileWriter {
    file: NonBlocking,
    mirror: MirrorWriter,
}

impl<'a> MakeWriter<'a> for MirroredFile {
    type Writer = MirroredFileWriter;

    fn make_writer(&'a self) -> Self::Writer {
        MirroredFileWriter {
            file: self.file.make_writer(),
            mirror: MirrorWriter {
                buf: Vec::with_capacity(256),
                tx: self.tx.clone(),
            },
        }
    }
}

impl Write for MirroredFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.file.write(buf)?;
        let _ = self.mirror.write_all(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()?;
        self.mirror.flush()
    }
}

fn resolve_log_dir(app_name: &str) -> io::Result<PathBuf> {
    let dir = config::log_dir(app_name)
        .unwrap_or_else(|| std::env::temp_dir().join(app_name).join("logs"));
    match std::fs::create_dir_all(&dir) {
        Ok(()) => Ok(dir),
        Err(_) => {
            let fallback = std::env::temp_dir().join(app_name).join("logs");
            std::fs::create_dir_all(&fallback)?;
            Ok(fallback)
        }
    }
}

/// Installs the global subscriber. `None` if the log directory is unusable or a subscriber
/// is already installed.
pub fn init(app_name: &str) -> Option<LoggingGuard> {
    let log_dir = resolve_log_dir(app_name).ok()?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, format!("{app_name}.log"));
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let (tx, mirror_rx) = mpsc::channel::<String>();
    let writer = MirroredFile {
        file: non_blocking,
        tx,
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}=info", env!("CARGO_CRATE_NAME"))));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(true),
    );

    if subscriber.try_init().is_err() {
        return None;
    }

    std::panic::set_hook(Box::new(|panic_info| {
        tracing::error!(panic = %panic_info, "panic");
    }));

    tracing::info!(log_dir = %log_dir.display(), "tracing initialized");

    Some(LoggingGuard {
        _guard: guard,
        log_dir,
        mirror_rx: Some(mirror_rx),
    })
}
