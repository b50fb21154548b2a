//! # Logger
//!
//! Installs the global `tracing` subscriber used by the club binaries.
//!
//! Output goes to the console (compact, colored) and optionally to a daily
//! rolling file in a configured directory, as plain text or JSON lines.
//! The minimum level can be refined with an explicit filter
//! (`"club_members=debug,tower_http=info"`) or through `RUST_LOG`.
//!
//! ## Example
//!
//! ```rust
//! use club_logger::{LevelFilter, Logger};
//!
//! let _logger = Logger::builder("club-server")
//!     .level(LevelFilter::DEBUG)
//!     .init()
//!     .unwrap();
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;

use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const MAX_LOG_FILES: usize = 14;
const LOG_FILE_SUFFIX: &str = "log";

/// Configures and installs the global subscriber. Created by [`Logger::builder`].
#[derive(Debug, Clone)]
pub struct LoggerBuilder {
    name: String,
    level: LevelFilter,
    filter: Option<String>,
    console: bool,
    directory: Option<PathBuf>,
    json: bool,
    max_files: usize,
}

impl LoggerBuilder {
    /// Minimum level for events not matched by a filter directive.
    #[must_use]
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// Extra `EnvFilter` directives applied on top of the level.
    #[must_use]
    pub fn filter(mut self, directives: impl Into<String>) -> Self {
        self.filter = Some(directives.into());
        self
    }

    #[must_use]
    pub const fn console(mut self, enabled: bool) -> Self {
        self.console = enabled;
        self
    }

    /// Writes a daily rolling log file named `<name>.<date>.log` into `directory`.
    #[must_use]
    pub fn directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = Some(directory.into());
        self
    }

    /// Formats the file output as JSON lines. Console output stays human-readable.
    #[must_use]
    pub const fn json(mut self, enabled: bool) -> Self {
        self.json = enabled;
        self
    }

    #[must_use]
    pub const fn max_files(mut self, max: usize) -> Self {
        self.max_files = max;
        self
    }

    /// Installs the subscriber.
    ///
    /// The returned [`Logger`] owns the background writer of the log file and
    /// must be kept alive until shutdown.
    ///
    /// # Errors
    /// [`LoggerError::InvalidConfiguration`] for an empty name, a bad filter or
    /// when no output is enabled, [`LoggerError::Subscriber`] when a global
    /// subscriber already exists.
    pub fn init(self) -> Result<Logger, LoggerError> {
        self.validate()?;
        let filter = self.env_filter()?;

        let mut layers = Vec::new();
        if self.console {
            layers.push(layer().compact().with_ansi(true).with_target(true).boxed());
        }

        let guard = match &self.directory {
            Some(directory) => {
                let (appender, guard) = self.file_writer(directory)?;
                let file_layer = layer().with_writer(appender).with_ansi(false);
                layers.push(if self.json { file_layer.json().boxed() } else { file_layer.boxed() });
                Some(guard)
            },
            None => None,
        };

        tracing_subscriber::registry().with(filter).with(layers).try_init()?;
        tracing::debug!(name = %self.name, file = self.directory.is_some(), "Logger initialized");

        Ok(Logger { guard, directory: self.directory })
    }

    fn validate(&self) -> Result<(), LoggerError> {
        let problem = if self.name.trim().is_empty() {
            Some("logger name cannot be empty")
        } else if self.max_files == 0 {
            Some("max_files must be greater than zero")
        } else if !self.console && self.directory.is_none() {
            Some("no output enabled; turn on the console or set a log directory")
        } else {
            None
        };

        problem.map_or(Ok(()), |message| {
            Err(LoggerError::InvalidConfiguration { message: message.into(), context: None })
        })
    }

    fn env_filter(&self) -> Result<EnvFilter, LoggerError> {
        let builder = EnvFilter::builder().with_default_directive(self.level.into());
        match self.filter.as_deref().map(str::trim) {
            Some(directives) if !directives.is_empty() => {
                builder.parse(directives).map_err(|e| LoggerError::InvalidConfiguration {
                    message: format!("invalid filter '{directives}': {e}").into(),
                    context: None,
                })
            },
            _ => Ok(builder.from_env_lossy()),
        }
    }

    fn file_writer(
        &self,
        directory: &Path,
    ) -> Result<(tracing_appender::non_blocking::NonBlocking, WorkerGuard), LoggerError> {
        std::fs::create_dir_all(directory)
            .context(format!("creating log directory {}", directory.display()))?;

        let appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix(&self.name)
            .filename_suffix(LOG_FILE_SUFFIX)
            .max_log_files(self.max_files)
            .build(directory)?;

        Ok(tracing_appender::non_blocking(appender))
    }
}

/// Handle to the installed subscriber.
///
/// Dropping it flushes and stops the file writer.
#[must_use = "Dropping this handle stops writing to the log file."]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
    directory: Option<PathBuf>,
}

impl Logger {
    /// Starts a builder. `name` prefixes the rolling log files.
    pub fn builder(name: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder {
            name: name.into(),
            level: LevelFilter::INFO,
            filter: None,
            console: true,
            directory: None,
            json: false,
            max_files: MAX_LOG_FILES,
        }
    }

    /// Whether a log file writer is running.
    #[must_use]
    pub const fn writes_file(&self) -> bool {
        self.guard.is_some()
    }

    #[must_use]
    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::info!("Logger shutting down, flushing log file");
        }
    }
}

/// Parses a level name such as `"info"` or `"DEBUG"`.
///
/// # Errors
/// [`LoggerError::InvalidConfiguration`] for unknown names.
pub fn parse_level(level: &str) -> Result<LevelFilter, LoggerError> {
    level.trim().parse::<LevelFilter>().map_err(|e| LoggerError::InvalidConfiguration {
        message: format!("unknown log level '{level}': {e}").into(),
        context: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let builder = Logger::builder("club-test");
        assert!(builder.console);
        assert!(!builder.json);
        assert_eq!(builder.level, LevelFilter::INFO);
        assert_eq!(builder.max_files, MAX_LOG_FILES);
        assert!(builder.directory.is_none());
    }

    #[test]
    fn builder_records_settings() {
        let builder = Logger::builder("club-test")
            .level(LevelFilter::WARN)
            .filter("club_members=debug")
            .directory("logs")
            .json(true)
            .console(false)
            .max_files(3);

        assert_eq!(builder.level, LevelFilter::WARN);
        assert_eq!(builder.filter.as_deref(), Some("club_members=debug"));
        assert_eq!(builder.directory.as_deref(), Some(Path::new("logs")));
        assert!(builder.json);
        assert!(!builder.console);
        assert_eq!(builder.max_files, 3);
    }

    #[test]
    fn validation_rejects_missing_outputs_and_names() {
        let no_output = Logger::builder("club-test").console(false).validate();
        assert!(matches!(no_output, Err(LoggerError::InvalidConfiguration { .. })));

        let blank = Logger::builder("  ").validate();
        assert!(matches!(blank, Err(LoggerError::InvalidConfiguration { .. })));

        let zero_files = Logger::builder("club-test").max_files(0).validate();
        assert!(matches!(zero_files, Err(LoggerError::InvalidConfiguration { .. })));
    }

    #[test]
    fn bad_filter_is_reported() {
        let result = Logger::builder("club-test").filter("club=notalevel").env_filter();
        assert!(matches!(result, Err(LoggerError::InvalidConfiguration { .. })));
    }

    #[test]
    fn level_names_parse_case_insensitively() {
        assert_eq!(parse_level("debug").ok(), Some(LevelFilter::DEBUG));
        assert_eq!(parse_level(" WARN ").ok(), Some(LevelFilter::WARN));
        assert!(parse_level("loud").is_err());
    }
}
