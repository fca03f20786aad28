//! Logging backend for brailledit.
//!
//! Library crates log through the `log` facade; this crate installs the
//! process-wide backend. Entries are kept in a bounded in-memory queue and,
//! if a file path is configured, appended to a log file.

use chrono::Local;
use std::collections::VecDeque;
use std::fs::{self, OpenOptions};
use std::io::Write as IoWrite;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

/// Log entry
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Timestamp in HH:MM:SS format
    pub timestamp: String,
    /// Message level
    pub level: LogLevel,
    /// Module that emitted the message
    pub target: String,
    /// Message text
    pub message: String,
}

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Convert log level to string
    pub fn to_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    /// Matching `log` crate filter
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Debug => log::LevelFilter::Trace,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
        }
    }
}

impl From<log::Level> for LogLevel {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => LogLevel::Error,
            log::Level::Warn => LogLevel::Warn,
            log::Level::Info => LogLevel::Info,
            log::Level::Debug | log::Level::Trace => LogLevel::Debug,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(format!("Unknown log level: {}", s)),
        }
    }
}

/// Logger state behind the global backend
#[derive(Debug)]
struct LoggerState {
    /// Last N messages
    entries: VecDeque<LogEntry>,
    /// Maximum number of entries in log
    max_entries: usize,
    /// Minimum log level to record
    min_level: LogLevel,
    /// Log file path
    file_path: Option<PathBuf>,
}

impl LoggerState {
    fn new(file_path: Option<PathBuf>, max_entries: usize, min_level: LogLevel) -> Self {
        if let Some(path) = &file_path {
            // Create parent directory if it doesn't exist
            if let Some(parent) = path.parent() {
                let _ = fs::create_dir_all(parent);
            }

            // Clear log file on startup
            if let Ok(mut file) = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(path)
            {
                let _ = writeln!(file, "=== brailledit log start ===");
            }
        }

        Self {
            entries: VecDeque::new(),
            max_entries,
            min_level,
            file_path,
        }
    }

    fn add_entry(&mut self, level: LogLevel, target: &str, message: String) {
        // Filter by minimum level
        if level < self.min_level {
            return;
        }

        let timestamp = Local::now().format("%H:%M:%S").to_string();

        // Write to file (create if deleted)
        if let Some(path) = &self.file_path {
            if let Ok(mut file) = OpenOptions::new().append(true).create(true).open(path) {
                let _ = writeln!(
                    file,
                    "[{}] {} {}: {}",
                    timestamp,
                    level.to_str(),
                    target,
                    message
                );
            }
        }

        self.entries.push_back(LogEntry {
            timestamp,
            level,
            target: target.to_string(),
            message,
        });

        // Limit queue size
        while self.entries.len() > self.max_entries {
            self.entries.pop_front();
        }
    }

    fn entries(&self) -> Vec<LogEntry> {
        self.entries.iter().cloned().collect()
    }
}

/// Global logger state that persists for the application lifetime.
static STATE: OnceLock<Mutex<LoggerState>> = OnceLock::new();

/// `log` facade backend forwarding into [`STATE`]
struct Backend;

static BACKEND: Backend = Backend;

impl log::Log for Backend {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        match STATE.get().and_then(|state| state.lock().ok()) {
            Some(state) => LogLevel::from(metadata.level()) >= state.min_level,
            None => false,
        }
    }

    fn log(&self, record: &log::Record) {
        if let Some(Ok(mut state)) = STATE.get().map(|state| state.lock()) {
            state.add_entry(
                record.level().into(),
                record.target(),
                record.args().to_string(),
            );
        }
    }

    fn flush(&self) {}
}

/// Initialize the global logger and install it as the `log` backend.
///
/// Must be called once at application startup. Fails if another backend
/// was already installed.
///
/// # Arguments
///
/// * `file_path` - Optional path to the log file (truncated on start)
/// * `max_entries` - Maximum number of log entries to keep in memory
/// * `min_level` - Minimum log level to record (Debug, Info, Warn, Error)
pub fn init(
    file_path: Option<PathBuf>,
    max_entries: usize,
    min_level: LogLevel,
) -> Result<(), log::SetLoggerError> {
    STATE.get_or_init(|| Mutex::new(LoggerState::new(file_path, max_entries, min_level)));
    log::set_logger(&BACKEND)?;
    log::set_max_level(min_level.to_level_filter());
    Ok(())
}

/// Set minimum log level dynamically
pub fn set_min_level(level: LogLevel) {
    if let Some(Ok(mut state)) = STATE.get().map(|state| state.lock()) {
        state.min_level = level;
        log::set_max_level(level.to_level_filter());
    }
}

/// Get all log entries currently stored in memory
pub fn entries() -> Vec<LogEntry> {
    match STATE.get().map(|state| state.lock()) {
        Some(Ok(state)) => state.entries(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_level_parsing() {
        assert_eq!("DEBUG".parse::<LogLevel>(), Ok(LogLevel::Debug));
        assert_eq!("warning".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_level_from_log_crate() {
        assert_eq!(LogLevel::from(log::Level::Trace), LogLevel::Debug);
        assert_eq!(LogLevel::from(log::Level::Warn), LogLevel::Warn);
        assert_eq!(LogLevel::Info.to_level_filter(), log::LevelFilter::Info);
    }

    #[test]
    fn test_entries_filtered_and_bounded() {
        let mut state = LoggerState::new(None, 2, LogLevel::Info);
        state.add_entry(LogLevel::Debug, "test", "hidden".to_string());
        state.add_entry(LogLevel::Info, "test", "one".to_string());
        state.add_entry(LogLevel::Warn, "test", "two".to_string());
        state.add_entry(LogLevel::Error, "test", "three".to_string());

        let messages: Vec<String> = state.entries().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["two", "three"]);
    }

    #[test]
    fn test_file_output() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logs").join("brailledit.log");
        let mut state = LoggerState::new(Some(path.clone()), 10, LogLevel::Debug);
        state.add_entry(LogLevel::Warn, "brailledit_format::bzy", "odd header".to_string());

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("=== brailledit log start ==="));
        assert!(content.contains("WARN brailledit_format::bzy: odd header"));
    }
}
