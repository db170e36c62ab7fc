//! Output sink implementations
//!
//! Any `io::Write + Send` type can back a logger; these cover the common
//! destinations.

pub mod console;
pub mod file;
pub mod memory;

pub use console::ConsoleSink;
pub use file::FileSink;
pub use memory::MemorySink;
