//! Logging abstractions
//!
//! The data source and transports log through a [`Logger`] handed in by the
//! host. The HTTP transport additionally writes wire-level detail to the
//! global debug file (see [`file_logger`]).

mod traits;
mod console;
mod memory;
pub mod file_logger;

pub use traits::{Logger, NoOpLogger, SharedLogger};
pub use console::ConsoleLogger;
pub use memory::MemoryLogger;

pub use file_logger::{log, trace, debug, info, warn, error, log_file_path, FileLogger, LogLevel};
