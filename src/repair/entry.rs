//! Operator-facing log lines emitted by the repair procedure
//!
//! The procedure never touches a widget. Callers hand in a [`RepairLog`]
//! sink: the terminal UI appends to its log pane, the headless CLI prints,
//! and tests collect into a `Vec`.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Step,
    Success,
    Warning,
    Error,
}

impl LogLevel {
    pub fn icon(&self) -> &'static str {
        match self {
            LogLevel::Info => "›",
            LogLevel::Step => "→",
            LogLevel::Success => "+",
            LogLevel::Warning => "!",
            LogLevel::Error => "x",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Info, message)
    }

    pub fn step(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Step, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Error, message)
    }

    /// Single-line rendering used by the headless CLI
    pub fn display_line(&self) -> String {
        format!("{} {}", self.level.icon(), self.message)
    }
}

pub trait RepairLog {
    fn record(&mut self, entry: LogEntry);
}

impl RepairLog for Vec<LogEntry> {
    fn record(&mut self, entry: LogEntry) {
        self.push(entry);
    }
}

impl<F: FnMut(LogEntry)> RepairLog for F {
    fn record(&mut self, entry: LogEntry) {
        self(entry)
    }
}

/// Record an entry and mirror it to tracing.
///
/// The sink already shows every line to the operator, so the mirror stays
/// at debug and only surfaces when `RUST_LOG` asks for it.
pub(crate) fn emit(log: &mut dyn RepairLog, entry: LogEntry) {
    tracing::debug!(level = ?entry.level, line = %entry.message, "repair log");
    log.record(entry);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_sink_receives_entries() {
        let mut seen = Vec::new();
        {
            let mut sink = |entry: LogEntry| seen.push(entry.message);
            emit(&mut sink, LogEntry::info("hello"));
            emit(&mut sink, LogEntry::error("boom"));
        }
        assert_eq!(seen, vec!["hello".to_string(), "boom".to_string()]);
    }

    #[test]
    fn test_display_line_prefixes_icon() {
        assert_eq!(LogEntry::success("done").display_line(), "+ done");
        assert_eq!(LogEntry::warning("careful").display_line(), "! careful");
    }

    #[derive(Clone, Default)]
    struct Captured(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn traced_output(max_level: tracing::Level) -> String {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(max_level)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            let mut entries: Vec<LogEntry> = Vec::new();
            emit(&mut entries, LogEntry::success("Repair completed successfully!"));
            emit(&mut entries, LogEntry::error("'backup' directory not found."));
            assert_eq!(entries.len(), 2);
        });
        let bytes = captured.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_default_filter_does_not_repeat_sink_lines() {
        assert_eq!(traced_output(tracing::Level::INFO), "");
    }

    #[test]
    fn test_debug_filter_mirrors_sink_lines() {
        let out = traced_output(tracing::Level::DEBUG);
        assert!(out.contains("Repair completed successfully!"));
        assert!(out.contains("'backup' directory not found."));
    }
}
