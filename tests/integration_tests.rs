//! Integration tests for the logger actor
//!
//! These tests verify:
//! - Snapshot isolation of get_logger / set_logger
//! - The high-water-mark overflow policy
//! - Fatal paths: reply timeout, sink failure, exit_func
//! - Emission format and the byte-stream adapters

use crossbeam_channel::{bounded, Receiver};
use filtertag::core::command::Command;
use filtertag::prelude::*;
use filtertag::Actor;
use filtertag::sinks::{FileSink, MemorySink};
use std::io::{self, Write};
use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::TempDir;

fn recording_exit() -> (ExitHook, Arc<AtomicI32>) {
    let status = Arc::new(AtomicI32::new(-1));
    let status_clone = Arc::clone(&status);
    let hook: ExitHook = Arc::new(move |code: i32| status_clone.store(code, Ordering::SeqCst));
    (hook, status)
}

fn test_builder(sink: &MemorySink) -> (LoggerBuilder, Arc<AtomicI32>) {
    let (exit, status) = recording_exit();
    let builder = LoggerBuilder::new()
        .output(sink.clone())
        .filter(TagFilter::All)
        .exit_hook(exit)
        .host("test-host")
        .service("integration")
        .timezone(chrono_tz::UTC);
    (builder, status)
}

/// Wait until every command submitted before this call has been processed
fn sync(entry: &mut Entry) {
    let _ = entry.get_logger();
}

fn wait_until(timeout: Duration, mut done: impl FnMut() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if done() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    done()
}

#[test]
fn test_get_logger_returns_live_sink_and_independent_filter() {
    let sink = MemorySink::new();
    let (builder, _) = test_builder(&sink);
    let (mut entry, _handle) = builder
        .filter(TagFilter::enabled(["info"]))
        .build()
        .expect("Failed to build logger");

    let mut snapshot = entry.get_logger();
    snapshot
        .filter_mut()
        .enabled_tags_mut()
        .expect("static filter")
        .enable("debug");

    let live = entry.get_logger();
    assert!(snapshot.output().same_as(live.output()));
    assert!(!live.filter().enabled_tags().unwrap().is_enabled("DEBUG"));

    // The snapshot's output is the real destination.
    snapshot.output().write_line(b"direct\n").unwrap();
    assert_eq!(sink.contents(), "direct\n");
}

#[test]
fn test_set_logger_then_get_logger_reflects_new_fields() {
    let sink = MemorySink::new();
    let (builder, _) = test_builder(&sink);
    let (mut entry, _handle) = builder.build().expect("Failed to build logger");

    let before = entry.get_logger();

    let replacement = LoggerState::new(SharedOutput::new(Vec::new()))
        .with_filter(TagFilter::enabled(["audit"]));
    entry.set_logger(replacement);

    let after = entry.get_logger();
    let enabled = after.filter().enabled_tags().expect("static filter");
    assert_eq!(enabled.iter().collect::<Vec<_>>(), vec!["AUDIT"]);
    assert!(after.output().same_as(before.output()));

    entry.info("filtered out");
    entry.logft(["audit"], "kept");
    sync(&mut entry);

    let lines = sink.json_lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["msg"], "kept");
}

#[test]
fn test_modified_snapshot_round_trip() {
    let sink = MemorySink::new();
    let (builder, _) = test_builder(&sink);
    let (mut entry, _handle) = builder
        .filter(TagFilter::enabled(["info"]))
        .build()
        .expect("Failed to build logger");

    entry.debug("suppressed");

    let mut state = entry.get_logger();
    state.filter_mut().enabled_tags_mut().unwrap().enable("debug");
    entry.set_logger(state);

    entry.debug("emitted");
    sync(&mut entry);

    let lines = sink.json_lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["msg"], "emitted");
}

#[test]
fn test_set_output_migrates_sink() {
    let first = MemorySink::new();
    let second = MemorySink::new();
    let (builder, _) = test_builder(&first);
    let (mut entry, _handle) = builder.build().expect("Failed to build logger");

    entry.info("one");
    entry.set_output(SharedOutput::new(second.clone()));
    entry.info("two");
    sync(&mut entry);

    assert_eq!(first.json_lines()[0]["msg"], "one");
    assert_eq!(second.lines().len(), 1);
    assert_eq!(second.json_lines()[0]["msg"], "two");
}

#[test]
fn test_overflow_fires_once_before_eighth_line() {
    let sink = MemorySink::new();
    let (exit, status) = recording_exit();
    let fired = Arc::new(AtomicUsize::new(0));
    let lines_at_fire = Arc::new(AtomicUsize::new(usize::MAX));

    let fired_clone = Arc::clone(&fired);
    let lines_clone = Arc::clone(&lines_at_fire);
    let sink_clone = sink.clone();
    let state = LoggerState::new(SharedOutput::new(sink.clone()))
        .with_filter(TagFilter::All)
        .with_exit_hook(exit)
        .with_overflow_hook(Arc::new(move || {
            fired_clone.fetch_add(1, Ordering::SeqCst);
            lines_clone.store(sink_clone.lines().len(), Ordering::SeqCst);
        }));

    let (actor, sender) = Actor::new(state, 10, 8).expect("valid queue");
    let metrics = actor.metrics();

    for i in 0..8 {
        sender
            .try_send(Command::WriteLine {
                tags: TagSet::from_tags(["info"]),
                line: format!("{{\"n\":{}}}\n", i).into_bytes(),
            })
            .expect("channel has room");
    }
    drop(sender);
    actor.run();

    assert_eq!(fired.load(Ordering::SeqCst), 1);
    assert!(lines_at_fire.load(Ordering::SeqCst) < 8);
    assert_eq!(metrics.overflow_events(), 1);
    assert_eq!(sink.lines().len(), 8);
    assert_eq!(status.load(Ordering::SeqCst), -1);
}

#[test]
fn test_high_water_mark_leaves_headroom() {
    let sink = MemorySink::new();
    let (exit, _) = recording_exit();
    let fired = Arc::new(AtomicUsize::new(0));
    let fired_clone = Arc::clone(&fired);

    let state = LoggerState::new(SharedOutput::new(sink.clone()))
        .with_filter(TagFilter::All)
        .with_exit_hook(exit)
        .with_overflow_hook(Arc::new(move || {
            fired_clone.fetch_add(1, Ordering::SeqCst);
        }));
    let (actor, sender) = Actor::new(state, 10, 8).expect("valid queue");

    let line = || Command::WriteLine {
        tags: TagSet::from_tags(["info"]),
        line: b"{}\n".to_vec(),
    };
    for _ in 0..8 {
        sender.try_send(line()).expect("below the mark");
    }
    // The 9th and 10th still fit; the 11th does not.
    assert!(sender.try_send(line()).is_ok());
    assert!(sender.try_send(line()).is_ok());
    assert!(sender.try_send(line()).is_err());

    drop(sender);
    actor.run();

    // Backlogs of 10, 9 and 8 were observed at dequeue.
    assert_eq!(fired.load(Ordering::SeqCst), 3);
    assert_eq!(sink.lines().len(), 10);
}

#[test]
fn test_default_overflow_invokes_exit_hook() {
    let sink = MemorySink::new();
    let (exit, status) = recording_exit();
    let state = LoggerState::new(SharedOutput::new(sink.clone()))
        .with_filter(TagFilter::All)
        .with_exit_hook(exit);
    let (actor, sender) = Actor::new(state, 4, 2).expect("valid queue");

    for _ in 0..2 {
        sender
            .try_send(Command::WriteLine {
                tags: TagSet::from_tags(["info"]),
                line: b"{}\n".to_vec(),
            })
            .unwrap();
    }
    drop(sender);
    actor.run();

    assert_eq!(status.load(Ordering::SeqCst), 1);
}

#[derive(Debug)]
struct UncopyableRule;

impl FilterDecision for UncopyableRule {
    fn should_emit(&self, _tags: &TagSet) -> bool {
        true
    }

    fn duplicate(&self) -> filtertag::Result<Box<dyn FilterDecision>> {
        Err(LoggerError::SnapshotFailed("compiled rule".to_string()))
    }
}

/// Holds the first write until the gate opens, then forwards to memory
struct GateSink {
    gate: Receiver<()>,
    opened: bool,
    inner: MemorySink,
}

impl Write for GateSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !self.opened {
            let _ = self.gate.recv();
            self.opened = true;
        }
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[test]
fn test_late_reply_after_timeout_is_discarded() {
    let sink = MemorySink::new();
    let (gate_tx, gate_rx) = bounded::<()>(1);
    let (exit, _) = recording_exit();
    let (mut entry, handle) = LoggerBuilder::new()
        .output(GateSink {
            gate: gate_rx,
            opened: false,
            inner: sink.clone(),
        })
        .filter(TagFilter::All)
        .exit_hook(Arc::clone(&exit))
        .host("h")
        .service("s")
        .reply_timeout(Duration::from_millis(300))
        .build()
        .expect("Failed to build logger");

    // The actor stalls on this line, so the request below stays queued.
    entry.info("held at the gate");
    let err = entry.try_get_logger().unwrap_err();
    assert!(matches!(err, LoggerError::ReplyTimeout { .. }));

    entry.set_logger(
        LoggerState::default()
            .with_filter(TagFilter::enabled(["audit"]))
            .with_exit_hook(exit),
    );

    let opener = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(50));
        let _ = gate_tx.send(());
    });

    let state = entry.try_get_logger().expect("fresh snapshot");
    opener.join().expect("opener panicked");

    let enabled = state.filter().enabled_tags().expect("static filter");
    assert_eq!(enabled.iter().collect::<Vec<_>>(), vec!["AUDIT"]);
    assert_eq!(handle.metrics().snapshots_dropped(), 1);
    assert_eq!(sink.lines().len(), 1);
}

#[test]
fn test_dropped_snapshot_times_out() {
    let sink = MemorySink::new();
    let (builder, _) = test_builder(&sink);
    let (mut entry, handle) = builder
        .filter(TagFilter::rule(UncopyableRule))
        .reply_timeout(Duration::from_millis(100))
        .build()
        .expect("Failed to build logger");

    let start = Instant::now();
    let err = entry.try_get_logger().unwrap_err();
    assert!(matches!(err, LoggerError::ReplyTimeout { .. }));
    assert!(start.elapsed() >= Duration::from_millis(100));
    assert_eq!(handle.metrics().snapshots_dropped(), 1);

    // The actor itself keeps working.
    entry.info("still logging");
    assert!(wait_until(Duration::from_secs(2), || sink.lines().len() == 1));
}

#[test]
#[should_panic(expected = "get_logger failed")]
fn test_get_logger_aborts_on_timeout() {
    let sink = MemorySink::new();
    let (builder, _) = test_builder(&sink);
    let (mut entry, _handle) = builder
        .filter(TagFilter::rule(UncopyableRule))
        .reply_timeout(Duration::from_millis(50))
        .build()
        .expect("Failed to build logger");

    let _ = entry.get_logger();
}

#[test]
fn test_sequential_lines_carry_only_their_own_tags() {
    let sink = MemorySink::new();
    let (builder, _) = test_builder(&sink);
    let (mut entry, _handle) = builder.build().expect("Failed to build logger");

    entry.set_error("first failure");
    entry.logft(["info"], "first");
    entry.logft(["error"], "second");
    sync(&mut entry);

    let lines = sink.json_lines();
    assert_eq!(lines.len(), 2);

    assert_eq!(lines[0]["filtertags"], serde_json::json!(["INFO"]));
    assert_eq!(lines[0]["msg"], "first");
    assert_eq!(lines[0]["err"], "first failure");

    assert_eq!(lines[1]["filtertags"], serde_json::json!(["ERROR"]));
    assert_eq!(lines[1]["msg"], "second");
    assert_eq!(lines[1]["err"], "");

    let t0 = lines[0]["timestamp"].as_str().unwrap();
    let t1 = lines[1]["timestamp"].as_str().unwrap();
    assert!(t0 <= t1, "{} > {}", t0, t1);
    assert!(t0.ends_with(" UTC"));
}

#[test]
fn test_line_key_set() {
    let sink = MemorySink::new();
    let (builder, _) = test_builder(&sink);
    let (mut entry, _handle) = builder.subsystem("orders").build().expect("Failed to build logger");

    entry.set_field("order_id", 991).unwrap();
    entry.set_ctx_pretext("[req 7]");
    entry.notice("placed");
    sync(&mut entry);

    let line = &sink.json_lines()[0];
    let mut keys: Vec<&str> = line.as_object().unwrap().keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        vec![
            "ctxpretext",
            "err",
            "filtertags",
            "host",
            "msg",
            "order_id",
            "service",
            "subsystem",
            "timestamp"
        ]
    );
    assert_eq!(line["host"], "test-host");
    assert_eq!(line["service"], "integration");
    assert_eq!(line["subsystem"], "orders");
    assert_eq!(line["ctxpretext"], "[req 7]");
    assert_eq!(line["filtertags"], serde_json::json!(["NOTICE", "L3"]));
}

#[test]
fn test_exit_func_logs_then_exits() {
    let sink = MemorySink::new();
    let (builder, status) = test_builder(&sink);
    let (mut entry, handle) = builder.build().expect("Failed to build logger");

    entry.exit_func("unrecoverable state");

    assert!(wait_until(Duration::from_secs(2), || handle.is_finished()));
    assert_eq!(status.load(Ordering::SeqCst), 1);

    let lines = sink.json_lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["filtertags"], serde_json::json!(["EXITFUNC"]));

    // Nothing answers any more.
    assert!(matches!(entry.try_get_logger(), Err(LoggerError::ActorStopped)));
}

struct BrokenSink;

impl Write for BrokenSink {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "reader went away"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_sink_failure_is_fatal() {
    let (exit, status) = recording_exit();
    let (mut entry, handle) = LoggerBuilder::new()
        .output(BrokenSink)
        .filter(TagFilter::All)
        .exit_hook(exit)
        .host("h")
        .service("s")
        .build()
        .expect("Failed to build logger");

    entry.info("never lands");

    assert!(wait_until(Duration::from_secs(2), || handle.is_finished()));
    assert_eq!(status.load(Ordering::SeqCst), 1);
}

#[test]
fn test_shutdown_stops_request_response() {
    let sink = MemorySink::new();
    let (builder, _) = test_builder(&sink);
    let (mut entry, mut handle) = builder.build().expect("Failed to build logger");

    assert!(handle.shutdown(Duration::from_secs(2)));

    // Fire-and-forget submissions are dropped quietly.
    entry.info("after shutdown");
    assert!(matches!(entry.try_get_logger(), Err(LoggerError::ActorStopped)));
    assert!(sink.is_empty());
}

#[test]
fn test_writers_through_actor() {
    let sink = MemorySink::new();
    let (builder, _) = test_builder(&sink);
    let (mut entry, _handle) = builder.build().expect("Failed to build logger");

    write!(entry.writer(["stdout", "info"]), "child process said hi").unwrap();
    entry
        .writer_nested_json(["metrics"], "sample")
        .write_all(br#"{"cpu":0.42,"rss":1048576}"#)
        .unwrap();
    entry.info("after");
    sync(&mut entry);

    let lines = sink.json_lines();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["msg"], "child process said hi");
    assert_eq!(lines[1]["sample"]["rss"], 1048576);
    assert!(lines[2].get("sample").is_none());
}

#[test]
fn test_copies_share_one_actor() {
    let sink = MemorySink::new();
    let (builder, _) = test_builder(&sink);
    let (entry, _handle) = builder.build().expect("Failed to build logger");

    let workers: Vec<_> = (0..4)
        .map(|i| {
            let mut copy = entry.copy();
            std::thread::spawn(move || {
                copy.set_field("worker", i).unwrap();
                copy.info(format!("worker {} done", i));
                // Each copy has its own reply slot.
                copy.get_logger()
            })
        })
        .collect();

    for worker in workers {
        let state = worker.join().expect("worker panicked");
        assert!(matches!(state.filter(), TagFilter::All));
    }

    let lines = sink.json_lines();
    assert_eq!(lines.len(), 4);
    let mut workers: Vec<i64> = lines.iter().map(|l| l["worker"].as_i64().unwrap()).collect();
    workers.sort_unstable();
    assert_eq!(workers, vec![0, 1, 2, 3]);
}

#[test]
fn test_file_sink_end_to_end() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("service.jsonl");

    let (exit, _) = recording_exit();
    let (mut entry, mut handle) = LoggerBuilder::new()
        .output(FileSink::new(&log_file).expect("Failed to open sink"))
        .exit_hook(exit)
        .host("h")
        .service("s")
        .build()
        .expect("Failed to build logger");

    entry.info("persisted");
    entry.debug("suppressed by the default filter");
    entry.error("also persisted");
    sync(&mut entry);
    assert!(handle.shutdown(Duration::from_secs(2)));

    let content = std::fs::read_to_string(&log_file).expect("Failed to read log file");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("\"msg\":\"persisted\""));
    assert!(lines[1].contains("\"msg\":\"also persisted\""));
    assert_eq!(handle.metrics().lines_suppressed(), 1);
}
