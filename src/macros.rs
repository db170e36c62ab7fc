//! Formatting macros over [`Entry`](crate::Entry) emission.
//!
//! These macros format their arguments like `format!` and hand the message to
//! the matching `Entry` method.
//!
//! # Examples
//!
//! ```
//! use filtertag::prelude::*;
//! use filtertag::{info, logft};
//!
//! let (mut log, _lifetime) = LoggerBuilder::new()
//!     .output(filtertag::sinks::MemorySink::new())
//!     .host("docs")
//!     .service("macros")
//!     .build()?;
//!
//! // Severity shorthand
//! info!(log, "Server listening on port {}", 8080);
//!
//! // Arbitrary tags
//! logft!(log, ["http", "info"], "{} {} -> {}", "GET", "/health", 200);
//! # Ok::<(), filtertag::LoggerError>(())
//! ```

/// Emit a formatted message with an explicit tag list.
///
/// # Examples
///
/// ```
/// # use filtertag::prelude::*;
/// # let (mut log, _lifetime) = LoggerBuilder::new().output(filtertag::sinks::MemorySink::new()).host("h").service("s").build().unwrap();
/// use filtertag::logft;
/// logft!(log, ["db", "error"], "query failed after {} ms", 1200);
/// ```
#[macro_export]
macro_rules! logft {
    ($entry:expr, $tags:expr, $($arg:tt)+) => {
        $entry.logft($tags, format!($($arg)+))
    };
}

/// Emit a formatted message at a [`Severity`](crate::Severity).
///
/// # Examples
///
/// ```
/// # use filtertag::prelude::*;
/// # let (mut log, _lifetime) = LoggerBuilder::new().output(filtertag::sinks::MemorySink::new()).host("h").service("s").build().unwrap();
/// use filtertag::log;
/// log!(log, Severity::Notice, "Config reloaded");
/// log!(log, Severity::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($entry:expr, $severity:expr, $($arg:tt)+) => {
        $entry.log($severity, format!($($arg)+))
    };
}

/// Emit a trace-level message.
#[macro_export]
macro_rules! trace {
    ($entry:expr, $($arg:tt)+) => {
        $crate::log!($entry, $crate::Severity::Trace, $($arg)+)
    };
}

/// Emit a debug-level message.
#[macro_export]
macro_rules! debug {
    ($entry:expr, $($arg:tt)+) => {
        $crate::log!($entry, $crate::Severity::Debug, $($arg)+)
    };
}

/// Emit an info-level message.
///
/// # Examples
///
/// ```
/// # use filtertag::prelude::*;
/// # let (mut log, _lifetime) = LoggerBuilder::new().output(filtertag::sinks::MemorySink::new()).host("h").service("s").build().unwrap();
/// use filtertag::info;
/// info!(log, "Application started");
/// info!(log, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($entry:expr, $($arg:tt)+) => {
        $crate::log!($entry, $crate::Severity::Info, $($arg)+)
    };
}

/// Emit a notice-level message.
#[macro_export]
macro_rules! notice {
    ($entry:expr, $($arg:tt)+) => {
        $crate::log!($entry, $crate::Severity::Notice, $($arg)+)
    };
}

/// Emit a warning-level message.
///
/// # Examples
///
/// ```
/// # use filtertag::prelude::*;
/// # let (mut log, _lifetime) = LoggerBuilder::new().output(filtertag::sinks::MemorySink::new()).host("h").service("s").build().unwrap();
/// use filtertag::warning;
/// warning!(log, "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warning {
    ($entry:expr, $($arg:tt)+) => {
        $crate::log!($entry, $crate::Severity::Warning, $($arg)+)
    };
}

/// Emit an error-level message.
#[macro_export]
macro_rules! error {
    ($entry:expr, $($arg:tt)+) => {
        $crate::log!($entry, $crate::Severity::Error, $($arg)+)
    };
}

/// Emit an alert-level message.
#[macro_export]
macro_rules! alert {
    ($entry:expr, $($arg:tt)+) => {
        $crate::log!($entry, $crate::Severity::Alert, $($arg)+)
    };
}

/// Emit a critical-level message.
#[macro_export]
macro_rules! critical {
    ($entry:expr, $($arg:tt)+) => {
        $crate::log!($entry, $crate::Severity::Critical, $($arg)+)
    };
}

/// Emit an emergency-level message.
#[macro_export]
macro_rules! emergency {
    ($entry:expr, $($arg:tt)+) => {
        $crate::log!($entry, $crate::Severity::Emergency, $($arg)+)
    };
}
