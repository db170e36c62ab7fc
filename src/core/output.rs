//! Shared output sink handle

use crate::sinks::ConsoleSink;
use parking_lot::Mutex;
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

/// Reference to the one destination every line is written to.
///
/// Cloning the handle never duplicates the underlying writer; all clones write
/// to the same destination. Snapshots of the logger state carry a clone of
/// the live handle so their writes still reach the real sink.
#[derive(Clone)]
pub struct SharedOutput {
    inner: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl SharedOutput {
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    pub fn stderr() -> Self {
        Self::new(ConsoleSink::stderr())
    }

    pub fn stdout() -> Self {
        Self::new(ConsoleSink::stdout())
    }

    /// True when both handles point at the same destination
    pub fn same_as(&self, other: &SharedOutput) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Write one complete line and flush it through.
    pub fn write_line(&self, line: &[u8]) -> io::Result<()> {
        let mut writer = self.inner.lock();
        writer.write_all(line)?;
        writer.flush()
    }
}

impl Default for SharedOutput {
    fn default() -> Self {
        Self::stderr()
    }
}

impl fmt::Debug for SharedOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedOutput")
            .field("ptr", &Arc::as_ptr(&self.inner))
            .finish()
    }
}

impl Write for SharedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.lock().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.lock().flush()
    }
}
