//! Logging collaborator for the sync engine
//!
//! The engine never touches a global logger directly. It reports through a
//! [`SyncLogger`] handed to it by the caller: the binary passes
//! [`TracingLogger`], tests usually pass a closure or a [`RecordingLogger`].

mod sink;

pub use sink::{init, LogGuard, DEFAULT_LOG_FILE};

use std::sync::Mutex;

/// Receives the engine's informational messages
pub trait SyncLogger {
    /// Record one informational message
    fn info(&self, message: &str);

    /// Diagnostic detail; dropped unless the logger cares
    fn debug(&self, _message: &str) {}

    /// Something was skipped or looks wrong but the cycle goes on
    fn warn(&self, message: &str) {
        self.info(message)
    }

    /// A cycle failed
    fn error(&self, message: &str) {
        self.warn(message)
    }
}

impl<F> SyncLogger for F
where
    F: Fn(&str),
{
    fn info(&self, message: &str) {
        self(message)
    }
}

/// Forwards engine messages to `tracing` at INFO level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl SyncLogger for TracingLogger {
    fn info(&self, message: &str) {
        tracing::info!(target: "treesync", "{message}");
    }

    fn debug(&self, message: &str) {
        tracing::debug!(target: "treesync", "{message}");
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: "treesync", "{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "treesync", "{message}");
    }
}

/// Keeps every message in memory
#[derive(Debug, Default)]
pub struct RecordingLogger {
    messages: Mutex<Vec<String>>,
}

impl RecordingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the messages recorded so far
    pub fn messages(&self) -> Vec<String> {
        match self.messages.lock() {
            Ok(messages) => messages.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Number of recorded messages containing `needle`
    pub fn count_containing(&self, needle: &str) -> usize {
        self.messages()
            .iter()
            .filter(|m| m.contains(needle))
            .count()
    }

    /// Drop everything recorded so far
    pub fn clear(&self) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.clear();
        }
    }
}

impl SyncLogger for RecordingLogger {
    fn info(&self, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_closure_is_a_logger() {
        let seen = RefCell::new(Vec::new());
        let logger = |m: &str| seen.borrow_mut().push(m.to_string());

        let dyn_logger: &dyn SyncLogger = &logger;
        dyn_logger.info("hello");

        assert_eq!(seen.into_inner(), vec!["hello".to_string()]);
    }

    #[test]
    fn test_recording_logger() {
        let logger = RecordingLogger::new();
        logger.info("Copying file a.txt");
        logger.info("Removing b.txt");
        logger.info("Copying file c.txt");

        assert_eq!(logger.messages().len(), 3);
        assert_eq!(logger.count_containing("Copying"), 2);

        logger.clear();
        assert!(logger.messages().is_empty());
    }

    #[test]
    fn test_default_levels() {
        let logger = RecordingLogger::new();
        logger.debug("digest details");
        logger.warn("skipping fifo");
        logger.error("cycle failed");

        assert_eq!(
            logger.messages(),
            vec!["skipping fifo".to_string(), "cycle failed".to_string()]
        );
    }

    #[test]
    fn test_tracing_logger_without_subscriber() {
        // No subscriber installed: must be a silent no-op
        TracingLogger.info("nobody is listening");
        TracingLogger.debug("nobody is listening");
        TracingLogger.warn("nobody is listening");
        TracingLogger.error("nobody is listening");
    }
}
