//! # Filtertag
//!
//! A JSON-line logger where every record carries one or more filter tags, and
//! a single background actor owns all logger configuration.
//!
//! ## Design
//!
//! - **One owner**: the output sink, the enabled-tag filter and the exit and
//!   overflow hooks live inside the actor thread. Producers only submit
//!   commands over a bounded channel.
//! - **Snapshots**: [`Entry::get_logger`] returns an independent copy of the
//!   configuration; change it and hand it back with [`Entry::set_logger`].
//! - **Fail fast**: a saturated queue, a broken sink or a lost reply stops the
//!   process instead of losing lines silently.
//!
//! ```no_run
//! use filtertag::prelude::*;
//!
//! let (mut log, _lifetime) = filtertag::primordial_entry()?;
//! log.set_subsystem("billing");
//! log.info("invoice sent");
//! filtertag::logft!(log, ["billing", "audit"], "charged {} cents", 1250);
//! # Ok::<(), filtertag::LoggerError>(())
//! ```

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        primordial_entry, ActorHandle, Category, EnabledTags, Entry, ExitHook, FieldValue,
        FilterDecision, LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics, LoggerState,
        OverflowHook, Result, Severity, SharedOutput, TagFilter, TagSet,
    };
}

pub use crate::core::{
    primordial_entry, Actor, ActorHandle, Attachments, Category, EnabledTags, Entry, ExitHook,
    FieldValue, FilterDecision, LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics,
    LoggerState, NestedJsonWriter, OverflowHook, Result, Severity, SharedOutput, TagFilter,
    TagSet, TagWriter, DEFAULT_CAPACITY, DEFAULT_HIGH_WATER_MARK, DEFAULT_REPLY_TIMEOUT,
};
