use super::*;
use std::sync::Arc;

#[test]
fn record_without_operation_always_creates() {
    let ledger = MessageLedger::new();
    let a = ledger.record(Record::new(MessageType::Info, "one", "logs"));
    let b = ledger.record(Record::new(MessageType::Info, "one", "logs"));

    assert!(matches!(a, RecordOutcome::Created(_)));
    assert!(matches!(b, RecordOutcome::Created(_)));
    assert_ne!(a.id(), b.id());
    assert_eq!(ledger.len(), 2);
}

#[test]
fn same_operation_and_handler_updates_in_place() {
    let ledger = MessageLedger::new();
    let first = ledger.record(
        Record::new(MessageType::Info, "compiling", "build")
            .operation("op-1")
            .progress(true),
    );
    let before = ledger.find("op-1", "build").unwrap().timestamp;
    std::thread::sleep(std::time::Duration::from_millis(2));

    let second = ledger.record(
        Record::new(MessageType::Success, "compiled", "build").operation("op-1"),
    );

    assert!(second.is_update());
    assert_eq!(first.id(), second.id());
    assert_eq!(ledger.len(), 1);

    let row = ledger.find("op-1", "build").unwrap();
    assert_eq!(row.content, "compiled");
    assert_eq!(row.kind, MessageType::Success);
    assert!(row.is_complete);
    assert!(!row.is_progress);
    assert!(row.timestamp > before);
}

#[test]
fn shared_token_is_isolated_by_handler_name() {
    let ledger = MessageLedger::new();
    ledger.record(Record::new(MessageType::Info, "a", "alpha").operation("same"));
    ledger.record(Record::new(MessageType::Info, "b", "beta").operation("same"));
    ledger.record(Record::new(MessageType::Info, "a2", "alpha").operation("same"));

    assert_eq!(ledger.len(), 2);
    assert_eq!(ledger.find("same", "alpha").unwrap().content, "a2");
    assert_eq!(ledger.find("same", "beta").unwrap().content, "b");
}

#[test]
fn updated_row_moves_to_tail() {
    let ledger = MessageLedger::new();
    let tracked = ledger.record(Record::new(MessageType::Info, "v1", "lang").operation("t"));
    ledger.record(Record::new(MessageType::Info, "other", "logs"));
    ledger.record(Record::new(MessageType::Info, "v2", "lang").operation("t"));

    let rows = ledger.snapshot();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].content, "other");
    assert_eq!(rows[1].id(), tracked.id());
    assert_eq!(rows[1].content, "v2");
}

#[test]
fn complete_flips_flags_but_keeps_content() {
    let ledger = MessageLedger::new();
    ledger.record(
        Record::new(MessageType::Info, "50%", "build")
            .operation("op")
            .progress(true),
    );

    assert!(ledger.complete("op", "build"));
    assert!(!ledger.complete("op", "other"));
    assert!(!ledger.complete("", "build"));

    let row = ledger.find("op", "build").unwrap();
    assert_eq!(row.content, "50%");
    assert!(row.is_complete);
}

#[test]
fn capacity_evicts_oldest_rows() {
    let ledger = MessageLedger::with_capacity(3);
    for i in 0..5 {
        ledger.record(Record::new(MessageType::Info, &format!("m{i}"), "logs"));
    }

    let contents: Vec<_> = ledger.snapshot().into_iter().map(|e| e.content).collect();
    assert_eq!(contents, vec!["m2", "m3", "m4"]);
}

#[test]
fn latest_for_returns_newest_row_of_handler() {
    let ledger = MessageLedger::new();
    ledger.record(Record::new(MessageType::Info, "first", "port"));
    ledger.record(Record::new(MessageType::Info, "noise", "logs"));
    ledger.record(Record::new(MessageType::Error, "second", "port"));

    let latest = ledger.latest_for("port").unwrap();
    assert_eq!(latest.content, "second");
    assert!(ledger.latest_for("missing").is_none());
    assert_eq!(ledger.last().unwrap().content, "second");
}

#[test]
fn concurrent_writers_keep_one_row_per_operation() {
    let ledger = Arc::new(MessageLedger::new());
    let handles: Vec<_> = (0..4)
        .map(|n| {
            let ledger = Arc::clone(&ledger);
            std::thread::spawn(move || {
                let name = format!("worker-{n}");
                for step in 0..50 {
                    ledger.record(
                        Record::new(MessageType::Info, &format!("{step}"), &name).operation("op"),
                    );
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(ledger.len(), 4);
    for row in ledger.snapshot() {
        assert_eq!(row.content, "49");
    }
}
