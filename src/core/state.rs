//! Logger configuration owned by the actor
//!
//! A [`LoggerState`] lives inside the actor. Everything outside it only ever
//! holds snapshots: independent copies that share nothing mutable with the
//! live state except the output handle, which is re-attached by reference.

use super::error::Result;
use super::filter::TagFilter;
use super::output::SharedOutput;
use std::fmt;
use std::io::Write;
use std::sync::Arc;

/// Diagnostic written by the default overflow behaviour.
pub const OVERFLOW_DIAGNOSTIC: &str =
    "FATAL ERROR AT FILTERTAG: main channel overflow, system failure.\n";

/// Status passed to the exit hook on every fatal path.
pub const FATAL_EXIT_STATUS: i32 = 1;

/// Callback that terminates the process with the given status
pub type ExitHook = Arc<dyn Fn(i32) + Send + Sync>;

/// Callback invoked when the command backlog reaches the high-water mark
pub type OverflowHook = Arc<dyn Fn() + Send + Sync>;

/// Default exit hook: flush stderr, then exit.
pub fn default_exit_hook() -> ExitHook {
    Arc::new(|status: i32| {
        let _ = std::io::stderr().flush();
        std::process::exit(status);
    })
}

pub struct LoggerState {
    output: SharedOutput,
    filter: TagFilter,
    exit_hook: ExitHook,
    /// `None` selects the default: diagnostic on stderr, then the exit hook
    overflow_hook: Option<OverflowHook>,
}

impl LoggerState {
    pub fn new(output: SharedOutput) -> Self {
        Self {
            output,
            filter: TagFilter::default(),
            exit_hook: default_exit_hook(),
            overflow_hook: None,
        }
    }

    #[must_use]
    pub fn with_filter(mut self, filter: TagFilter) -> Self {
        self.filter = filter;
        self
    }

    #[must_use]
    pub fn with_exit_hook(mut self, hook: ExitHook) -> Self {
        self.exit_hook = hook;
        self
    }

    #[must_use]
    pub fn with_overflow_hook(mut self, hook: OverflowHook) -> Self {
        self.overflow_hook = Some(hook);
        self
    }

    pub fn output(&self) -> &SharedOutput {
        &self.output
    }

    pub fn filter(&self) -> &TagFilter {
        &self.filter
    }

    pub fn filter_mut(&mut self) -> &mut TagFilter {
        &mut self.filter
    }

    pub fn set_filter(&mut self, filter: TagFilter) {
        self.filter = filter;
    }

    pub fn exit_hook(&self) -> &ExitHook {
        &self.exit_hook
    }

    pub fn set_exit_hook(&mut self, hook: ExitHook) {
        self.exit_hook = hook;
    }

    pub fn overflow_hook(&self) -> Option<&OverflowHook> {
        self.overflow_hook.as_ref()
    }

    pub fn set_overflow_hook(&mut self, hook: OverflowHook) {
        self.overflow_hook = Some(hook);
    }

    /// Restore the default overflow behaviour
    pub fn clear_overflow_hook(&mut self) {
        self.overflow_hook = None;
    }

    /// Independent copy of this state.
    ///
    /// The filter is duplicated, hooks are shared by reference (they are
    /// immutable closures) and the output handle is re-attached, never copied.
    pub fn snapshot(&self) -> Result<LoggerState> {
        Ok(Self {
            output: self.output.clone(),
            filter: self.filter.try_clone()?,
            exit_hook: Arc::clone(&self.exit_hook),
            overflow_hook: self.overflow_hook.clone(),
        })
    }

    /// Adopt everything from `incoming` except the output, which stays ours.
    pub(crate) fn adopt(&mut self, incoming: LoggerState) {
        let LoggerState {
            output: _,
            filter,
            exit_hook,
            overflow_hook,
        } = incoming;
        self.filter = filter;
        self.exit_hook = exit_hook;
        self.overflow_hook = overflow_hook;
    }

    pub(crate) fn replace_output(&mut self, output: SharedOutput) {
        self.output = output;
    }

    pub(crate) fn exit(&self, status: i32) {
        (self.exit_hook)(status);
    }

    /// Run the overflow hook, or the default behaviour when none is set.
    pub(crate) fn overflow(&self) {
        match &self.overflow_hook {
            Some(hook) => hook(),
            None => {
                let mut stderr = std::io::stderr();
                let _ = stderr.write_all(OVERFLOW_DIAGNOSTIC.as_bytes());
                let _ = stderr.flush();
                self.exit(FATAL_EXIT_STATUS);
            }
        }
    }
}

impl Default for LoggerState {
    fn default() -> Self {
        Self::new(SharedOutput::stderr())
    }
}

impl fmt::Debug for LoggerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerState")
            .field("output", &self.output)
            .field("filter", &self.filter)
            .field("overflow_hook", &self.overflow_hook.is_some())
            .finish_non_exhaustive()
    }
}
