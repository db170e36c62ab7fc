//! Command envelope sent from entries to the actor

use super::output::SharedOutput;
use super::state::LoggerState;
use super::tag::TagSet;
use crossbeam_channel::Sender;
use std::fmt;

/// One operation for the actor. Each command is consumed exactly once.
pub enum Command {
    /// Write a fully formatted line if the filter admits `tags`
    WriteLine { tags: TagSet, line: Vec<u8> },
    /// Reply with a snapshot of the live state
    GetLogger { reply: Sender<LoggerState> },
    /// Install a new state; the live output is kept
    SetLogger(LoggerState),
    /// Replace the live output sink
    SetOutput(SharedOutput),
    /// Invoke the exit hook and stop
    ExitProcess,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::WriteLine { .. } => "WriteLine",
            Command::GetLogger { .. } => "GetLogger",
            Command::SetLogger(_) => "SetLogger",
            Command::SetOutput(_) => "SetOutput",
            Command::ExitProcess => "ExitProcess",
        }
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::WriteLine { tags, line } => f
                .debug_struct("WriteLine")
                .field("tags", tags)
                .field("bytes", &line.len())
                .finish(),
            other => f.write_str(other.name()),
        }
    }
}
