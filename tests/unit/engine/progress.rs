use super::*;
use std::thread;

fn sink(ledger: &Arc<MessageLedger>) -> ProgressSink {
    ProgressSink::new(Arc::clone(ledger), "slow", "op-1")
}

#[test]
fn writes_after_finish_are_dropped() {
    let ledger = Arc::new(MessageLedger::new());
    let progress = sink(&ledger);

    assert!(progress.info("step 1").is_some());
    assert!(progress
        .finish_with(MessageType::Error, "slow: operation timed out")
        .is_some());
    assert!(progress.info("step 2").is_none());
    assert!(progress.finish_with(MessageType::Warning, "again").is_none());

    let rows = ledger.snapshot();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].kind, MessageType::Error);
    assert!(rows[0].is_complete);
}

#[test]
fn finish_ok_completes_last_write() {
    let ledger = Arc::new(MessageLedger::new());
    let progress = sink(&ledger);

    progress.success("built");
    assert!(progress.finish_ok());
    assert!(!progress.finish_ok());

    let row = ledger.last().unwrap();
    assert_eq!(row.content, "built");
    assert!(row.is_complete);
    assert!(!row.is_progress);
}

#[test]
fn racing_write_never_replaces_terminal_row() {
    for _ in 0..2_000 {
        let ledger = Arc::new(MessageLedger::new());
        let progress = sink(&ledger);
        let writer = progress.clone();

        let handle = thread::spawn(move || {
            while !writer.is_closed() {
                writer.info("still working");
            }
            writer.info("still working");
        });
        thread::yield_now();
        progress.finish_with(MessageType::Error, "slow: operation timed out");
        handle.join().unwrap();

        let row = ledger.last().unwrap();
        assert_eq!(row.kind, MessageType::Error);
        assert_eq!(row.content, "slow: operation timed out");
        assert!(row.is_complete);
        assert_eq!(ledger.len(), 1);
    }
}
