//! Entry: the per-call-site handle over the shared actor
//!
//! An [`Entry`] bundles the record fields of one logical logger with the
//! command sender of the actor it talks to. Many entries may share one actor;
//! [`Entry::copy`] hands a concurrent call site its own field state.
//!
//! Emission is fire-and-forget: the line is formatted here, on the caller's
//! thread, and submitted as a `WriteLine` command. Only
//! [`get_logger`](Entry::get_logger) waits for an answer.

use super::{
    attachments::FieldValue,
    command::Command,
    error::{LoggerError, Result},
    output::SharedOutput,
    record::RecordFields,
    state::LoggerState,
    tag::{Category, Severity, TagSet},
    timestamp,
    writer::{NestedJsonWriter, TagWriter},
};
use chrono_tz::Tz;
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use std::fmt;
use std::time::Duration;

/// How long [`Entry::get_logger`] waits for the actor's reply
pub const DEFAULT_REPLY_TIMEOUT: Duration = Duration::from_millis(2000);

/// Single-slot reply channel, created on first use
#[derive(Debug)]
struct ReplySlot {
    tx: Sender<LoggerState>,
    rx: Receiver<LoggerState>,
}

impl ReplySlot {
    fn new() -> Self {
        let (tx, rx) = bounded(1);
        Self { tx, rx }
    }
}

#[derive(Debug)]
pub struct Entry {
    fields: RecordFields,
    sender: Sender<Command>,
    reply: Option<ReplySlot>,
    reply_timeout: Duration,
    zone: Tz,
}

impl Entry {
    pub(crate) fn new(fields: RecordFields, sender: Sender<Command>) -> Self {
        Self {
            fields,
            sender,
            reply: None,
            reply_timeout: DEFAULT_REPLY_TIMEOUT,
            zone: chrono_tz::UTC,
        }
    }

    #[must_use]
    pub(crate) fn with_reply_timeout(mut self, timeout: Duration) -> Self {
        self.reply_timeout = timeout;
        self
    }

    #[must_use]
    pub(crate) fn with_zone(mut self, zone: Tz) -> Self {
        self.zone = zone;
        self
    }

    pub fn fields(&self) -> &RecordFields {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut RecordFields {
        &mut self.fields
    }

    pub fn reply_timeout(&self) -> Duration {
        self.reply_timeout
    }

    pub fn zone(&self) -> Tz {
        self.zone
    }

    pub fn set_subsystem(&mut self, subsystem: impl Into<String>) {
        self.fields.subsystem = subsystem.into();
    }

    pub fn set_ctx_pretext(&mut self, pretext: impl Into<String>) {
        self.fields.ctxpretext = pretext.into();
    }

    /// Attach error text to the next emitted line only
    pub fn set_error(&mut self, err: impl fmt::Display) {
        self.fields.err = err.to_string();
    }

    /// Attach a field to every line this entry emits
    pub fn set_field<K, V>(&mut self, key: K, value: V) -> Result<()>
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.fields.attachments.insert(key, value)
    }

    pub fn with_field<K, V>(mut self, key: K, value: V) -> Result<Self>
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.set_field(key, value)?;
        Ok(self)
    }

    pub fn remove_field(&mut self, key: &str) -> Option<FieldValue> {
        self.fields.attachments.remove(key)
    }

    /// Independent copy of this entry talking to the same actor.
    ///
    /// The field state is duplicated. The copy gets its own reply slot, so
    /// the copy and the original may each call [`get_logger`](Self::get_logger)
    /// without stealing each other's replies.
    pub fn copy(&self) -> Entry {
        Entry {
            fields: self.fields.clone(),
            sender: self.sender.clone(),
            reply: None,
            reply_timeout: self.reply_timeout,
            zone: self.zone,
        }
    }

    /// Ask the actor for a snapshot of its state.
    ///
    /// Returns [`LoggerError::ReplyTimeout`] if no reply arrives within the
    /// reply timeout and [`LoggerError::ActorStopped`] if the actor is gone.
    pub fn try_get_logger(&mut self) -> Result<LoggerState> {
        let slot = self.reply.get_or_insert_with(ReplySlot::new);

        self.sender
            .send(Command::GetLogger {
                reply: slot.tx.clone(),
            })
            .map_err(|_| LoggerError::ActorStopped)?;

        match slot.rx.recv_timeout(self.reply_timeout) {
            Ok(state) => Ok(state),
            Err(RecvTimeoutError::Timeout) => {
                // The request may still be queued. Its late reply must land in
                // an orphaned slot, never in the one the next request reads.
                self.reply = None;
                Err(LoggerError::ReplyTimeout {
                    timeout: self.reply_timeout,
                })
            }
            Err(RecvTimeoutError::Disconnected) => Err(LoggerError::ActorStopped),
        }
    }

    /// Snapshot of the actor's state.
    ///
    /// # Panics
    ///
    /// Panics when the actor does not answer within the reply timeout or is
    /// no longer running. A missing reply means the logger is broken (or the
    /// same entry is used for request/response from two places at once), and
    /// returning stale configuration would hide that.
    pub fn get_logger(&mut self) -> LoggerState {
        match self.try_get_logger() {
            Ok(state) => state,
            Err(e) => panic!(
                "filtertag: get_logger failed: {}; get_logger must not run concurrently on one entry",
                e
            ),
        }
    }

    /// Install `state` in the actor. The live output sink is kept.
    pub fn set_logger(&self, state: LoggerState) {
        self.submit(Command::SetLogger(state));
    }

    /// Move all further output to `output`
    pub fn set_output(&self, output: SharedOutput) {
        self.submit(Command::SetOutput(output));
    }

    /// Emit one line carrying `tags`.
    ///
    /// Tags are canonicalized, the line is stamped and serialized here, then
    /// queued for the actor. The error field is cleared afterwards.
    pub fn logft<I, S>(&mut self, tags: I, message: impl Into<String>)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tags = TagSet::from_tags(tags);
        let message = message.into();
        let stamp = timestamp::now(&self.zone);

        match self.fields.record(stamp, &tags, &message).to_line() {
            Ok(line) => self.submit(Command::WriteLine { tags, line }),
            Err(e) => {
                eprintln!("[FILTERTAG FATAL] Failed to serialize log record: {}", e);
                self.submit(Command::ExitProcess);
            }
        }

        self.fields.clear_transient();
    }

    pub fn log(&mut self, severity: Severity, message: impl Into<String>) {
        self.logft(severity.tags(), message);
    }

    pub fn category(&mut self, category: Category, message: impl Into<String>) {
        self.logft([category.to_str()], message);
    }

    #[inline]
    pub fn trace(&mut self, message: impl Into<String>) {
        self.log(Severity::Trace, message);
    }

    #[inline]
    pub fn debug(&mut self, message: impl Into<String>) {
        self.log(Severity::Debug, message);
    }

    #[inline]
    pub fn info(&mut self, message: impl Into<String>) {
        self.log(Severity::Info, message);
    }

    #[inline]
    pub fn notice(&mut self, message: impl Into<String>) {
        self.log(Severity::Notice, message);
    }

    #[inline]
    pub fn informational(&mut self, message: impl Into<String>) {
        self.log(Severity::Informational, message);
    }

    #[inline]
    pub fn warning(&mut self, message: impl Into<String>) {
        self.log(Severity::Warning, message);
    }

    #[inline]
    pub fn warn(&mut self, message: impl Into<String>) {
        self.log(Severity::Warn, message);
    }

    #[inline]
    pub fn error(&mut self, message: impl Into<String>) {
        self.log(Severity::Error, message);
    }

    #[inline]
    pub fn alert(&mut self, message: impl Into<String>) {
        self.log(Severity::Alert, message);
    }

    #[inline]
    pub fn emergency(&mut self, message: impl Into<String>) {
        self.log(Severity::Emergency, message);
    }

    #[inline]
    pub fn critical(&mut self, message: impl Into<String>) {
        self.log(Severity::Critical, message);
    }

    pub fn in_test_env(&mut self, message: impl Into<String>) {
        self.category(Category::InTestEnv, message);
    }

    pub fn in_prod_env(&mut self, message: impl Into<String>) {
        self.category(Category::InProdEnv, message);
    }

    pub fn investigate_tomorrow(&mut self, message: impl Into<String>) {
        self.category(Category::InvestigateTomorrow, message);
    }

    pub fn wake_me_in_the_middle_of_the_night(&mut self, message: impl Into<String>) {
        self.category(Category::WakeMeInTheMiddleOfTheNight, message);
    }

    /// Log the fatal event, then ask the actor to run the exit hook.
    ///
    /// The line is queued ahead of the exit command, but may not be flushed
    /// if the exit hook terminates the process.
    pub fn exit_func(&mut self, message: impl Into<String>) {
        self.category(Category::ExitFunc, message);
        self.submit(Command::ExitProcess);
    }

    /// `io::Write` adapter logging each buffer as the message
    pub fn writer<I, S>(&mut self, tags: I) -> TagWriter<&mut Entry>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        TagWriter::new(self, tags)
    }

    /// `io::Write` adapter embedding each buffer as JSON under `key`
    pub fn writer_nested_json<I, S>(
        &mut self,
        tags: I,
        key: impl Into<String>,
    ) -> NestedJsonWriter<&mut Entry>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        NestedJsonWriter::new(self, tags, key)
    }

    /// Queue a command; blocks while the channel is full.
    ///
    /// Commands sent after the actor stopped are dropped.
    fn submit(&self, command: Command) {
        let _ = self.sender.send(command);
    }
}

impl Clone for Entry {
    fn clone(&self) -> Self {
        self.copy()
    }
}
