//! Logger construction: the primordial entry and its actor

use super::{
    actor::{Actor, ActorHandle, DEFAULT_CAPACITY, DEFAULT_HIGH_WATER_MARK},
    config::LoggerConfig,
    entry::{Entry, DEFAULT_REPLY_TIMEOUT},
    error::{LoggerError, Result},
    filter::TagFilter,
    output::SharedOutput,
    record::RecordFields,
    state::{ExitHook, LoggerState, OverflowHook},
    timestamp::zone_from_env,
};
use chrono_tz::Tz;
use std::io::Write;
use std::time::Duration;

/// Start a logger with every default: stderr output, the default enabled
/// tags, process-exiting hooks, discovered host and service.
///
/// The returned handle is the lifetime of the actor; dropping it stops
/// logging for every entry derived from the returned one.
///
/// ```no_run
/// let (mut log, _lifetime) = filtertag::primordial_entry().unwrap();
/// log.info("service started");
/// ```
pub fn primordial_entry() -> Result<(Entry, ActorHandle)> {
    LoggerBuilder::new().build()
}

/// Builder for an actor and its first entry
///
/// # Example
/// ```
/// use filtertag::prelude::*;
/// use filtertag::sinks::MemorySink;
/// use std::sync::Arc;
///
/// let sink = MemorySink::new();
/// let (mut log, _lifetime) = LoggerBuilder::new()
///     .output(sink.clone())
///     .filter(TagFilter::All)
///     .exit_hook(Arc::new(|status: i32| eprintln!("would exit with {}", status)))
///     .host("test-host")
///     .service("doc-test")
///     .build()
///     .unwrap();
///
/// log.info("hello");
/// ```
pub struct LoggerBuilder {
    capacity: usize,
    high_water_mark: usize,
    reply_timeout: Duration,
    output: Option<SharedOutput>,
    filter: Option<TagFilter>,
    exit_hook: Option<ExitHook>,
    overflow_hook: Option<OverflowHook>,
    host: Option<String>,
    service: Option<String>,
    subsystem: String,
    zone: Option<Tz>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            high_water_mark: DEFAULT_HIGH_WATER_MARK,
            reply_timeout: DEFAULT_REPLY_TIMEOUT,
            output: None,
            filter: None,
            exit_hook: None,
            overflow_hook: None,
            host: None,
            service: None,
            subsystem: String::new(),
            zone: None,
        }
    }

    /// Command channel capacity
    #[must_use = "builder methods return a new value"]
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Backlog at which the overflow hook fires; must be below capacity
    #[must_use = "builder methods return a new value"]
    pub fn high_water_mark(mut self, mark: usize) -> Self {
        self.high_water_mark = mark;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn reply_timeout(mut self, timeout: Duration) -> Self {
        self.reply_timeout = timeout;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn output<W: Write + Send + 'static>(mut self, writer: W) -> Self {
        self.output = Some(SharedOutput::new(writer));
        self
    }

    /// Use an existing output handle (shared with other holders)
    #[must_use = "builder methods return a new value"]
    pub fn shared_output(mut self, output: SharedOutput) -> Self {
        self.output = Some(output);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn filter(mut self, filter: TagFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn exit_hook(mut self, hook: ExitHook) -> Self {
        self.exit_hook = Some(hook);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn overflow_hook(mut self, hook: OverflowHook) -> Self {
        self.overflow_hook = Some(hook);
        self
    }

    /// Override the discovered hostname
    #[must_use = "builder methods return a new value"]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Override the discovered executable path
    #[must_use = "builder methods return a new value"]
    pub fn service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn subsystem(mut self, subsystem: impl Into<String>) -> Self {
        self.subsystem = subsystem.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn timezone(mut self, zone: Tz) -> Self {
        self.zone = Some(zone);
        self
    }

    /// Apply a loaded configuration
    pub fn config(mut self, config: &LoggerConfig) -> Result<Self> {
        config.validate()?;
        self.capacity = config.capacity;
        self.high_water_mark = config.high_water_mark;
        self.reply_timeout = config.reply_timeout();
        if let Some(filter) = config.filter() {
            self.filter = Some(filter);
        }
        if let Some(zone) = config.zone()? {
            self.zone = Some(zone);
        }
        if let Some(subsystem) = &config.subsystem {
            self.subsystem = subsystem.clone();
        }
        Ok(self)
    }

    /// Build the entry and the actor without starting it.
    ///
    /// Commands submitted before [`Actor::spawn`] or [`Actor::run`] wait in
    /// the channel.
    pub fn build_parts(self) -> Result<(Entry, Actor)> {
        if self.reply_timeout.is_zero() {
            return Err(LoggerError::config("LoggerBuilder", "reply timeout must be positive"));
        }

        let host = match self.host {
            Some(host) => host,
            None => discover_host()?,
        };
        let service = match self.service {
            Some(service) => service,
            None => discover_service()?,
        };

        let mut state = LoggerState::new(self.output.unwrap_or_default());
        if let Some(filter) = self.filter {
            state.set_filter(filter);
        }
        if let Some(hook) = self.exit_hook {
            state.set_exit_hook(hook);
        }
        if let Some(hook) = self.overflow_hook {
            state.set_overflow_hook(hook);
        }

        let (actor, sender) = Actor::new(state, self.capacity, self.high_water_mark)?;

        let mut fields = RecordFields::new(host, service);
        fields.subsystem = self.subsystem;
        let entry = Entry::new(fields, sender)
            .with_reply_timeout(self.reply_timeout)
            .with_zone(self.zone.unwrap_or_else(zone_from_env));

        Ok((entry, actor))
    }

    /// Build the entry and start the actor on its own thread
    pub fn build(self) -> Result<(Entry, ActorHandle)> {
        let (entry, actor) = self.build_parts()?;
        let handle = actor.spawn()?;
        Ok((entry, handle))
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn discover_host() -> Result<String> {
    hostname::get()
        .map(|h| h.to_string_lossy().into_owned())
        .map_err(|e| LoggerError::discovery("hostname", e.to_string()))
}

fn discover_service() -> Result<String> {
    std::env::current_exe()
        .map(|path| path.display().to_string())
        .map_err(|e| LoggerError::discovery("executable path", e.to_string()))
}
