//! Console logger implementation

use super::file_logger::LogLevel;
use super::traits::Logger;

/// A logger that writes to stderr
///
/// Everything goes to stderr: plugin hosts typically own stdout.
#[derive(Debug, Clone)]
pub struct ConsoleLogger {
    prefix: String,
    min_level: LogLevel,
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleLogger {
    pub fn new() -> Self {
        Self {
            prefix: "[globalcred]".to_string(),
            min_level: LogLevel::Info,
        }
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Self::new()
        }
    }

    /// Drop messages below `level`
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    fn enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    fn line(&self, level: LogLevel, message: &str) -> String {
        format!("{} {}: {}", self.prefix, level.label(), message)
    }

    fn emit(&self, level: LogLevel, message: &str) {
        if self.enabled(level) {
            eprintln!("{}", self.line(level, message));
        }
    }
}

impl Logger for ConsoleLogger {
    fn debug(&self, message: &str) {
        self.emit(LogLevel::Debug, message);
    }

    fn info(&self, message: &str) {
        self.emit(LogLevel::Info, message);
    }

    fn warn(&self, message: &str) {
        self.emit(LogLevel::Warn, message);
    }

    fn error(&self, message: &str) {
        self.emit(LogLevel::Error, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_logger_creation() {
        let logger = ConsoleLogger::new();
        assert_eq!(logger.prefix, "[globalcred]");
        assert!(!logger.enabled(LogLevel::Debug));
        assert!(logger.enabled(LogLevel::Info));

        let custom = ConsoleLogger::with_prefix("[catalyst]").with_min_level(LogLevel::Trace);
        assert_eq!(custom.prefix, "[catalyst]");
        assert!(custom.enabled(LogLevel::Debug));
    }

    #[test]
    fn test_console_line_format() {
        let logger = ConsoleLogger::new();
        assert_eq!(logger.line(LogLevel::Info, "ready"), "[globalcred] INFO: ready");
        assert_eq!(logger.line(LogLevel::Warn, "slow"), "[globalcred] WARN: slow");
    }

    #[test]
    fn test_console_logger_logs() {
        // only checks nothing panics
        let logger = ConsoleLogger::new().with_min_level(LogLevel::Debug);
        logger.debug("debug message");
        logger.info("info message");
        logger.warn("warn message");
        logger.error("error message");
    }
}
