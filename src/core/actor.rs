//! The actor that owns all logger state
//!
//! Exactly one thread runs the actor loop. It is the only code that reads or
//! mutates the live [`LoggerState`]; every other thread talks to it through a
//! bounded command channel and receives snapshots, never references.
//!
//! Before each dequeued command the loop measures the backlog (the dequeued
//! command plus everything still queued behind it). When the backlog reaches
//! the high-water mark the overflow hook runs, which by default terminates the
//! process instead of letting the queue stall its producers.

use super::{
    command::Command,
    error::{LoggerError, Result},
    metrics::LoggerMetrics,
    state::{LoggerState, FATAL_EXIT_STATUS},
};
use crossbeam_channel::{bounded, select, Receiver, Sender, TrySendError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Default command channel capacity
pub const DEFAULT_CAPACITY: usize = 502;

/// Default backlog at which the overflow hook fires
pub const DEFAULT_HIGH_WATER_MARK: usize = 500;

/// Default time an [`ActorHandle`] waits for the actor thread when dropped
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Whether the loop keeps going after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}

pub struct Actor {
    state: LoggerState,
    inbound: Receiver<Command>,
    shutdown: Receiver<()>,
    shutdown_tx: Option<Sender<()>>,
    high_water_mark: usize,
    metrics: Arc<LoggerMetrics>,
}

impl Actor {
    /// Create an actor and the sender its entries submit commands through.
    ///
    /// `high_water_mark` must be positive and strictly below `capacity`, so a
    /// few sends can still land while the overflow hook runs.
    pub fn new(
        state: LoggerState,
        capacity: usize,
        high_water_mark: usize,
    ) -> Result<(Self, Sender<Command>)> {
        validate_queue(capacity, high_water_mark)?;

        let (sender, inbound) = bounded(capacity);
        let (shutdown_tx, shutdown) = bounded(0);

        let actor = Self {
            state,
            inbound,
            shutdown,
            shutdown_tx: Some(shutdown_tx),
            high_water_mark,
            metrics: Arc::new(LoggerMetrics::new()),
        };
        Ok((actor, sender))
    }

    pub fn metrics(&self) -> Arc<LoggerMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn high_water_mark(&self) -> usize {
        self.high_water_mark
    }

    /// Run the loop on a dedicated thread.
    pub fn spawn(mut self) -> Result<ActorHandle> {
        let shutdown = self.shutdown_tx.take();
        let metrics = Arc::clone(&self.metrics);

        let join = thread::Builder::new()
            .name("filtertag-actor".to_string())
            .spawn(move || self.run())
            .map_err(|e| {
                LoggerError::io_operation("spawning actor thread", "thread creation failed", e)
            })?;

        Ok(ActorHandle {
            shutdown,
            join: Some(join),
            metrics,
        })
    }

    /// Run the loop on the current thread.
    ///
    /// Returns when every command sender is gone, when the cancellation
    /// signal fires, after `ExitProcess`, or after a failed output write.
    /// Commands still queued at that point are dropped.
    pub fn run(self) {
        let Actor {
            mut state,
            inbound,
            shutdown,
            shutdown_tx: _shutdown_tx,
            high_water_mark,
            metrics,
        } = self;

        loop {
            select! {
                recv(inbound) -> msg => {
                    let command = match msg {
                        Ok(command) => command,
                        Err(_) => return,
                    };
                    metrics.record_command();

                    let backlog = inbound.len() + 1;
                    if backlog >= high_water_mark {
                        metrics.record_overflow();
                        state.overflow();
                    }

                    if process(&mut state, &metrics, command) == Flow::Stop {
                        return;
                    }
                }
                recv(shutdown) -> _ => return,
            }
        }
    }
}

fn validate_queue(capacity: usize, high_water_mark: usize) -> Result<()> {
    if capacity == 0 {
        return Err(LoggerError::config("Actor", "capacity must be positive"));
    }
    if high_water_mark == 0 || high_water_mark >= capacity {
        return Err(LoggerError::config(
            "Actor",
            format!(
                "high_water_mark {} must be positive and below capacity {}",
                high_water_mark, capacity
            ),
        ));
    }
    Ok(())
}

fn process(state: &mut LoggerState, metrics: &LoggerMetrics, command: Command) -> Flow {
    match command {
        Command::WriteLine { tags, line } => {
            if !state.filter().should_emit(&tags) {
                metrics.record_suppressed();
                return Flow::Continue;
            }
            if let Err(e) = state.output().write_line(&line) {
                eprintln!("[FILTERTAG FATAL] Output write failed: {}", e);
                state.exit(FATAL_EXIT_STATUS);
                return Flow::Stop;
            }
            metrics.record_written();
        }

        Command::GetLogger { reply } => {
            let snapshot = match state.snapshot() {
                Ok(snapshot) => snapshot,
                Err(_) => {
                    // The caller observes this as a reply timeout.
                    metrics.record_snapshot_dropped();
                    return Flow::Continue;
                }
            };
            match reply.try_send(snapshot) {
                Ok(()) => {
                    metrics.record_snapshot_served();
                }
                Err(TrySendError::Full(_)) | Err(TrySendError::Disconnected(_)) => {
                    metrics.record_snapshot_dropped();
                }
            }
        }

        Command::SetLogger(incoming) => state.adopt(incoming),

        Command::SetOutput(output) => state.replace_output(output),

        Command::ExitProcess => {
            state.exit(FATAL_EXIT_STATUS);
            return Flow::Stop;
        }
    }
    Flow::Continue
}

/// Lifetime of a spawned actor.
///
/// Dropping the handle cancels the actor and waits (bounded by
/// [`DEFAULT_SHUTDOWN_TIMEOUT`]) for its thread to finish. Queued commands are
/// not drained.
pub struct ActorHandle {
    shutdown: Option<Sender<()>>,
    join: Option<thread::JoinHandle<()>>,
    metrics: Arc<LoggerMetrics>,
}

impl ActorHandle {
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Fire the cancellation signal without waiting
    pub fn cancel(&mut self) {
        drop(self.shutdown.take());
    }

    /// True once the actor thread has returned
    pub fn is_finished(&self) -> bool {
        self.join.as_ref().map_or(true, |join| join.is_finished())
    }

    /// Cancel the actor and wait for its thread
    ///
    /// # Returns
    ///
    /// `true` if the thread finished within `timeout`, `false` otherwise
    pub fn shutdown(&mut self, timeout: Duration) -> bool {
        self.cancel();

        let Some(handle) = self.join.take() else {
            return true;
        };
        let start = Instant::now();

        loop {
            if handle.is_finished() {
                if let Err(e) = handle.join() {
                    eprintln!("[FILTERTAG ERROR] Actor thread panicked: {:?}", e);
                    return false;
                }
                return true;
            }

            if start.elapsed() >= timeout {
                eprintln!(
                    "[FILTERTAG WARNING] Actor thread did not finish within {:?}",
                    timeout
                );
                return false;
            }

            thread::sleep(Duration::from_millis(10));
        }
    }
}

impl Drop for ActorHandle {
    fn drop(&mut self) {
        self.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);

        let overflows = self.metrics.overflow_events();
        if overflows > 0 {
            eprintln!(
                "[FILTERTAG WARNING] Actor stopped after {} overflow event(s)",
                overflows
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::TagFilter;
    use crate::core::output::SharedOutput;
    use crate::core::state::ExitHook;
    use crate::core::tag::TagSet;
    use crate::sinks::MemorySink;
    use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};

    fn quiet_state(sink: &MemorySink) -> (LoggerState, Arc<AtomicI32>) {
        let status = Arc::new(AtomicI32::new(-1));
        let status_clone = Arc::clone(&status);
        let exit: ExitHook = Arc::new(move |code: i32| status_clone.store(code, Ordering::SeqCst));
        let state = LoggerState::new(SharedOutput::new(sink.clone()))
            .with_filter(TagFilter::All)
            .with_exit_hook(exit);
        (state, status)
    }

    fn line(text: &str) -> Command {
        Command::WriteLine {
            tags: TagSet::from_tags(["info"]),
            line: format!("{}\n", text).into_bytes(),
        }
    }

    #[test]
    fn test_rejects_bad_queue_config() {
        let sink = MemorySink::new();
        assert!(Actor::new(quiet_state(&sink).0, 0, 0).is_err());
        assert!(Actor::new(quiet_state(&sink).0, 10, 10).is_err());
        assert!(Actor::new(quiet_state(&sink).0, 10, 0).is_err());
        assert!(Actor::new(quiet_state(&sink).0, 10, 9).is_ok());
    }

    #[test]
    fn test_run_returns_when_senders_drop() {
        let sink = MemorySink::new();
        let (state, _) = quiet_state(&sink);
        let (actor, sender) = Actor::new(state, 10, 8).unwrap();

        sender.send(line("a")).unwrap();
        sender.send(line("b")).unwrap();
        drop(sender);

        actor.run();
        assert_eq!(sink.contents(), "a\nb\n");
    }

    #[test]
    fn test_exit_process_is_terminal() {
        let sink = MemorySink::new();
        let (state, status) = quiet_state(&sink);
        let (actor, sender) = Actor::new(state, 10, 8).unwrap();

        sender.send(line("before")).unwrap();
        sender.send(Command::ExitProcess).unwrap();
        sender.send(line("after")).unwrap();

        actor.run();
        assert_eq!(status.load(Ordering::SeqCst), FATAL_EXIT_STATUS);
        assert_eq!(sink.contents(), "before\n");
    }

    #[test]
    fn test_overflow_below_mark_never_fires() {
        let sink = MemorySink::new();
        let (state, _) = quiet_state(&sink);
        let fired = Arc::new(AtomicUsize::new(0));
        let fired_clone = Arc::clone(&fired);
        let state = state.with_overflow_hook(Arc::new(move || {
            fired_clone.fetch_add(1, Ordering::SeqCst);
        }));
        let (actor, sender) = Actor::new(state, 10, 8).unwrap();
        let metrics = actor.metrics();

        for i in 0..7 {
            sender.send(line(&i.to_string())).unwrap();
        }
        drop(sender);
        actor.run();

        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert_eq!(metrics.overflow_events(), 0);
        assert_eq!(metrics.lines_written(), 7);
    }

    #[test]
    fn test_filter_suppresses_lines() {
        let sink = MemorySink::new();
        let (state, _) = quiet_state(&sink);
        let state = state.with_filter(TagFilter::enabled(["error"]));
        let (actor, sender) = Actor::new(state, 10, 8).unwrap();
        let metrics = actor.metrics();

        sender.send(line("dropped")).unwrap();
        sender
            .send(Command::WriteLine {
                tags: TagSet::from_tags(["ERROR", "L5"]),
                line: b"kept\n".to_vec(),
            })
            .unwrap();
        drop(sender);
        actor.run();

        assert_eq!(sink.contents(), "kept\n");
        assert_eq!(metrics.lines_suppressed(), 1);
        assert_eq!(metrics.lines_written(), 1);
    }

    #[test]
    fn test_handle_shutdown_stops_thread() {
        let sink = MemorySink::new();
        let (state, _) = quiet_state(&sink);
        let (actor, _sender) = Actor::new(state, 10, 8).unwrap();

        let mut handle = actor.spawn().unwrap();
        assert!(handle.shutdown(Duration::from_secs(2)));
        assert!(handle.is_finished());
    }
}
