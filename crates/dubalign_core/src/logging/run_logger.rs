//! Run logger with in-memory accumulation and push-style emission.

use chrono::Local;
use parking_lot::Mutex;

use super::types::{LogSink, MessagePrefix};

/// Per-run logger.
///
/// Lines are kept in emission order and returned with the final report;
/// an optional sink receives each line the moment it is emitted. The
/// run identifier exists purely so multiplexed callers can correlate
/// events to the run that produced them.
pub struct RunLogger {
    run_id: String,
    lines: Mutex<Vec<String>>,
    sink: Option<LogSink>,
    show_timestamps: bool,
}

impl RunLogger {
    /// Create a logger for the given run identifier.
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            lines: Mutex::new(Vec::new()),
            sink: None,
            show_timestamps: true,
        }
    }

    /// Attach a sink that receives each line as it is emitted.
    pub fn with_sink(mut self, sink: LogSink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Enable or disable timestamps on emitted lines.
    pub fn with_timestamps(mut self, show: bool) -> Self {
        self.show_timestamps = show;
        self
    }

    /// The run identifier this logger belongs to.
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Log an informational message.
    pub fn info(&self, message: &str) {
        self.emit(MessagePrefix::None, message);
    }

    /// Log a warning.
    pub fn warn(&self, message: &str) {
        self.emit(MessagePrefix::Warning, message);
    }

    /// Log an error.
    pub fn error(&self, message: &str) {
        self.emit(MessagePrefix::Error, message);
    }

    /// Log a phase marker.
    pub fn phase(&self, phase_name: &str) {
        self.emit(MessagePrefix::Phase, phase_name);
    }

    /// Log a success message.
    pub fn success(&self, message: &str) {
        self.emit(MessagePrefix::Success, message);
    }

    /// Log a command being executed.
    pub fn command(&self, command: &str) {
        self.emit(MessagePrefix::Command, command);
    }

    /// Snapshot of all lines emitted so far, in order.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    fn emit(&self, prefix: MessagePrefix, message: &str) {
        let message = prefix.format(message);
        let formatted = if self.show_timestamps {
            format!("[{}] {}", Local::now().format("%H:%M:%S"), message)
        } else {
            message
        };

        self.lines.lock().push(formatted.clone());

        if let Some(ref sink) = self.sink {
            sink(&formatted);
        }
    }
}
