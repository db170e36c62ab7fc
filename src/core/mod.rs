//! Core logger types: the actor, its state, and the entry API

pub mod actor;
pub mod attachments;
pub mod command;
pub mod config;
pub mod entry;
pub mod error;
pub mod filter;
pub mod logger;
pub mod metrics;
pub mod output;
pub mod record;
pub mod state;
pub mod tag;
pub mod timestamp;
pub mod writer;

pub use actor::{
    Actor, ActorHandle, DEFAULT_CAPACITY, DEFAULT_HIGH_WATER_MARK, DEFAULT_SHUTDOWN_TIMEOUT,
};
pub use attachments::{Attachments, FieldValue};
pub use command::Command;
pub use config::LoggerConfig;
pub use entry::{Entry, DEFAULT_REPLY_TIMEOUT};
pub use error::{LoggerError, Result};
pub use filter::{EnabledTags, FilterDecision, TagFilter, DEFAULT_ENABLED_TAGS};
pub use logger::{primordial_entry, LoggerBuilder};
pub use metrics::LoggerMetrics;
pub use output::SharedOutput;
pub use record::{LogRecord, RecordFields};
pub use state::{ExitHook, LoggerState, OverflowHook, FATAL_EXIT_STATUS, OVERFLOW_DIAGNOSTIC};
pub use tag::{Category, Severity, TagSet};
pub use writer::{NestedJsonWriter, TagWriter};
